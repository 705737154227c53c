use super::engine::{names, RecordRule};
use super::issue::Issue;
use crate::types::*;

/// Value of the first TYPE sub-tag, upper-cased. Empty values count as absent.
fn marriage_type(marriage: &Node) -> Option<String> {
    marriage
        .first_child(tags::TYPE)
        .and_then(|node| node.value.as_deref())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_uppercase)
}

pub struct MarriageCountRule {
    max: usize,
}

impl MarriageCountRule {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl RecordRule for MarriageCountRule {
    fn name(&self) -> &str {
        names::MARRIAGE_COUNT
    }

    fn applies_to(&self) -> RecordKind {
        RecordKind::Family
    }

    fn check(&self, record: &Record) -> Vec<Issue> {
        let count = record.root.count_children(tags::MARRIAGE);
        if count > self.max {
            vec![Issue::TooManyMarriages {
                count,
                max: self.max,
            }]
        } else {
            Vec::new()
        }
    }
}

/// HUSB and WIFE are limited independently; a family needs at least one of them.
pub struct SpouseRule {
    max_per_role: usize,
}

impl SpouseRule {
    pub fn new(max_per_role: usize) -> Self {
        Self { max_per_role }
    }
}

impl RecordRule for SpouseRule {
    fn name(&self) -> &str {
        names::SPOUSES
    }

    fn applies_to(&self) -> RecordKind {
        RecordKind::Family
    }

    fn check(&self, record: &Record) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut total = 0;

        for role in [tags::HUSBAND, tags::WIFE] {
            let count = record.root.count_children(role);
            total += count;
            if count > self.max_per_role {
                issues.push(Issue::TooManySpouses {
                    tag: role.to_string(),
                    count,
                    max: self.max_per_role,
                });
            }
        }

        if total == 0 {
            issues.push(Issue::MissingSpouse);
        }
        issues
    }
}

/// MARR.TYPE must come from the allowed vocabulary.
pub struct MarriageTypeValueRule {
    allowed: Vec<String>,
}

impl MarriageTypeValueRule {
    pub fn new(allowed: &[String]) -> Self {
        Self {
            allowed: allowed.iter().map(|value| value.trim().to_uppercase()).collect(),
        }
    }
}

impl RecordRule for MarriageTypeValueRule {
    fn name(&self) -> &str {
        names::MARRIAGE_TYPE_VALUES
    }

    fn applies_to(&self) -> RecordKind {
        RecordKind::Family
    }

    fn check(&self, record: &Record) -> Vec<Issue> {
        record
            .root
            .children_tagged(tags::MARRIAGE)
            .enumerate()
            .filter_map(|(index, marriage)| {
                let value = marriage_type(marriage)?;
                (!self.allowed.contains(&value)).then_some(Issue::InvalidMarriageType {
                    ordinal: index + 1,
                    value,
                })
            })
            .collect()
    }
}

/// A family may record each limited marriage type (civil, religious) at most
/// `max` times.
pub struct MarriageTypeCategoryRule {
    limited: Vec<String>,
    max: usize,
}

impl MarriageTypeCategoryRule {
    pub fn new(limited: &[String], max: usize) -> Self {
        Self {
            limited: limited.iter().map(|value| value.trim().to_uppercase()).collect(),
            max,
        }
    }
}

impl RecordRule for MarriageTypeCategoryRule {
    fn name(&self) -> &str {
        names::MARRIAGE_TYPE_CATEGORIES
    }

    fn applies_to(&self) -> RecordKind {
        RecordKind::Family
    }

    fn check(&self, record: &Record) -> Vec<Issue> {
        let types: Vec<String> = record
            .root
            .children_tagged(tags::MARRIAGE)
            .filter_map(marriage_type)
            .collect();

        self.limited
            .iter()
            .filter_map(|category| {
                let count = types.iter().filter(|value| *value == category).count();
                (count > self.max).then(|| Issue::TooManyMarriagesOfType {
                    marriage_type: category.clone(),
                    count,
                    max: self.max,
                })
            })
            .collect()
    }
}
