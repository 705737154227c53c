// Rule module - the record checklist
// - engine.rs: RecordRule trait, RuleEngine and the rule name registry
// - person.rs: INDI rules (occurrence limits, canonical name)
// - family.rs: FAM rules (marriages, spouses, marriage types)
// - events.rs: DATE/PLAC uniqueness inside events, shared by both kinds
// - issue.rs: rule findings and their report wording

pub mod engine;
pub mod events;
pub mod family;
pub mod issue;
pub mod person;

pub use engine::*;
pub use issue::Issue;
