use crate::config::ValidationConfig;
use crate::types::*;

use super::events::EventDetailRule;
use super::family::{MarriageCountRule, MarriageTypeCategoryRule, MarriageTypeValueRule, SpouseRule};
use super::issue::Issue;
use super::person::{CanonicalNameRule, OccurrenceLimitRule};

/// Stable rule names, as used in the `pipeline` section of the config
pub mod names {
    pub const PERSON_OCCURRENCES: &str = "PersonOccurrences";
    pub const CANONICAL_NAME: &str = "CanonicalName";
    pub const PERSON_EVENT_DETAILS: &str = "PersonEventDetails";
    pub const MARRIAGE_COUNT: &str = "MarriageCount";
    pub const SPOUSES: &str = "Spouses";
    pub const MARRIAGE_EVENT_DETAILS: &str = "MarriageEventDetails";
    pub const MARRIAGE_TYPE_VALUES: &str = "MarriageTypeValues";
    pub const MARRIAGE_TYPE_CATEGORIES: &str = "MarriageTypeCategories";

    /// Default pipeline order
    pub const ALL: &[&str] = &[
        PERSON_OCCURRENCES,
        CANONICAL_NAME,
        PERSON_EVENT_DETAILS,
        MARRIAGE_COUNT,
        SPOUSES,
        MARRIAGE_EVENT_DETAILS,
        MARRIAGE_TYPE_VALUES,
        MARRIAGE_TYPE_CATEGORIES,
    ];
}

/// One independent check over a record tree.
///
/// Rules never see other records and never fail: a record either passes or
/// yields issues.
pub trait RecordRule: Send + Sync {
    fn name(&self) -> &str;

    /// The record kind this rule checks
    fn applies_to(&self) -> RecordKind;

    fn check(&self, record: &Record) -> Vec<Issue>;
}

/// Ordered checklist of rules
pub struct RuleEngine {
    rules: Vec<Box<dyn RecordRule>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

impl RuleEngine {
    /// Build the checklist from the enabled rules of the config pipeline.
    pub fn new(config: &ValidationConfig) -> Self {
        let mut rules = Vec::new();

        for rule_config in &config.pipeline.rules {
            if !rule_config.enabled {
                tracing::debug!(rule = %rule_config.name, "skipping disabled rule");
                continue;
            }

            match build_rule(&rule_config.name, config) {
                Some(rule) => rules.push(rule),
                None => tracing::warn!(rule = %rule_config.name, "unknown rule, skipping"),
            }
        }

        Self::with_rules(rules)
    }

    pub fn with_rules(rules: Vec<Box<dyn RecordRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Run every rule for the record's kind, in checklist order.
    pub fn validate(&self, classified: &ClassifiedRecord) -> Vec<Violation> {
        let ClassifiedRecord { kind, record } = classified;
        let mut violations = Vec::new();

        for rule in self.rules.iter().filter(|rule| rule.applies_to() == *kind) {
            let issues = rule.check(record);
            if !issues.is_empty() {
                tracing::trace!(
                    rule = rule.name(),
                    record = record.id(),
                    issues = issues.len(),
                    "rule reported issues"
                );
            }
            violations.extend(
                issues
                    .into_iter()
                    .map(|issue| Violation::new(*kind, record.id(), issue)),
            );
        }

        violations
    }

    /// Validate records in order, folding every violation into one list
    pub fn validate_all(&self, records: &[ClassifiedRecord]) -> Vec<Violation> {
        records.iter().fold(Vec::new(), |mut violations, record| {
            violations.extend(self.validate(record));
            violations
        })
    }
}

fn build_rule(name: &str, config: &ValidationConfig) -> Option<Box<dyn RecordRule>> {
    let limits = &config.limits;
    let marriage_types = &config.marriage_types;

    let rule: Box<dyn RecordRule> = match name {
        names::PERSON_OCCURRENCES => Box::new(OccurrenceLimitRule::new(limits.person_tags.clone())),
        names::CANONICAL_NAME => Box::new(CanonicalNameRule),
        names::PERSON_EVENT_DETAILS => Box::new(EventDetailRule::person(limits.max_event_details)),
        names::MARRIAGE_COUNT => Box::new(MarriageCountRule::new(limits.max_marriages)),
        names::SPOUSES => Box::new(SpouseRule::new(limits.max_spouses_per_role)),
        names::MARRIAGE_EVENT_DETAILS => {
            Box::new(EventDetailRule::marriage(limits.max_event_details))
        }
        names::MARRIAGE_TYPE_VALUES => {
            Box::new(MarriageTypeValueRule::new(&marriage_types.allowed))
        }
        names::MARRIAGE_TYPE_CATEGORIES => Box::new(MarriageTypeCategoryRule::new(
            &marriage_types.limited,
            marriage_types.max_per_type,
        )),
        _ => return None,
    };

    Some(rule)
}
