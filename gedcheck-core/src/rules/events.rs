use super::engine::{names, RecordRule};
use super::issue::Issue;
use crate::types::*;

const DETAIL_TAGS: [&str; 2] = [tags::DATE, tags::PLACE];

/// DATE and PLAC may each appear at most `max` times inside an event.
/// Every event node is checked on its own.
pub struct EventDetailRule {
    name: &'static str,
    kind: RecordKind,
    events: &'static [&'static str],
    max: usize,
}

impl EventDetailRule {
    /// BIRT and DEAT events of a person
    pub fn person(max: usize) -> Self {
        Self {
            name: names::PERSON_EVENT_DETAILS,
            kind: RecordKind::Person,
            events: &[tags::BIRTH, tags::DEATH],
            max,
        }
    }

    /// MARR events of a family
    pub fn marriage(max: usize) -> Self {
        Self {
            name: names::MARRIAGE_EVENT_DETAILS,
            kind: RecordKind::Family,
            events: &[tags::MARRIAGE],
            max,
        }
    }
}

impl RecordRule for EventDetailRule {
    fn name(&self) -> &str {
        self.name
    }

    fn applies_to(&self) -> RecordKind {
        self.kind
    }

    fn check(&self, record: &Record) -> Vec<Issue> {
        let mut issues = Vec::new();

        for &event_tag in self.events {
            for (index, event) in record.root.children_tagged(event_tag).enumerate() {
                for detail in DETAIL_TAGS {
                    let count = event.count_children(detail);
                    if count > self.max {
                        issues.push(Issue::DuplicateEventDetail {
                            event: event_tag.to_string(),
                            ordinal: index + 1,
                            detail: detail.to_string(),
                            count,
                            max: self.max,
                        });
                    }
                }
            }
        }

        issues
    }
}
