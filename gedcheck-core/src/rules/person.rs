use super::engine::{names, RecordRule};
use super::issue::Issue;
use crate::config::TagLimit;
use crate::types::*;

/// BIRT, DEAT and NAME may each occur at most once (by default).
pub struct OccurrenceLimitRule {
    limits: Vec<TagLimit>,
}

impl OccurrenceLimitRule {
    /// Tags are matched upper-cased, like decoded lines.
    pub fn new(limits: Vec<TagLimit>) -> Self {
        let limits = limits
            .into_iter()
            .map(|limit| TagLimit {
                tag: limit.tag.trim().to_uppercase(),
                max: limit.max,
            })
            .collect();
        Self { limits }
    }
}

impl RecordRule for OccurrenceLimitRule {
    fn name(&self) -> &str {
        names::PERSON_OCCURRENCES
    }

    fn applies_to(&self) -> RecordKind {
        RecordKind::Person
    }

    fn check(&self, record: &Record) -> Vec<Issue> {
        self.limits
            .iter()
            .filter_map(|limit| {
                let count = record.root.count_children(&limit.tag);
                (count > limit.max).then(|| Issue::TooManyOccurrences {
                    tag: limit.tag.clone(),
                    count,
                    max: limit.max,
                })
            })
            .collect()
    }
}

/// At most one NAME without a TYPE sub-tag, and it has to be the first NAME.
pub struct CanonicalNameRule;

impl RecordRule for CanonicalNameRule {
    fn name(&self) -> &str {
        names::CANONICAL_NAME
    }

    fn applies_to(&self) -> RecordKind {
        RecordKind::Person
    }

    fn check(&self, record: &Record) -> Vec<Issue> {
        let mut name_nodes = record.root.children_tagged(tags::NAME).peekable();
        let first_is_untyped = name_nodes
            .peek()
            .is_some_and(|name| !name.has_child(tags::TYPE));
        let untyped = name_nodes.filter(|name| !name.has_child(tags::TYPE)).count();

        if untyped > 1 {
            vec![Issue::MultipleUntypedNames { count: untyped }]
        } else if untyped == 1 && !first_is_untyped {
            vec![Issue::UntypedNameNotFirst]
        } else {
            Vec::new()
        }
    }
}
