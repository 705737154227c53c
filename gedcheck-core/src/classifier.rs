use crate::types::*;

pub struct RecordClassifier;

impl Default for RecordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Supported records in source order, plus how many were left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub records: Vec<ClassifiedRecord>,
    pub skipped: usize,
}

impl Classification {
    pub fn persons(&self) -> impl Iterator<Item = &Record> {
        self.of_kind(RecordKind::Person)
    }

    pub fn families(&self) -> impl Iterator<Item = &Record> {
        self.of_kind(RecordKind::Family)
    }

    fn of_kind(&self, kind: RecordKind) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(move |classified| classified.kind == kind)
            .map(|classified| &classified.record)
    }
}

impl RecordClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Keep `INDI` and `FAM` records, drop everything else without complaint.
    pub fn classify(&self, records: Vec<Record>) -> Classification {
        let mut classification = Classification::default();

        for record in records {
            match RecordKind::from_tag(record.tag()) {
                Some(kind) => classification
                    .records
                    .push(ClassifiedRecord { kind, record }),
                None => {
                    tracing::trace!(
                        tag = record.tag(),
                        line = record.line,
                        nodes = record.root.subtree_size(),
                        "skipping unsupported record"
                    );
                    classification.skipped += 1;
                }
            }
        }

        tracing::debug!(
            supported = classification.records.len(),
            skipped = classification.skipped,
            "classified records"
        );
        classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tag: &str, xref: &str) -> Record {
        Record {
            xref: Some(xref.to_string()),
            line: 1,
            root: Node::new(tag, None),
        }
    }

    #[test]
    fn partitions_by_kind_preserving_order() {
        let classification = RecordClassifier::new().classify(vec![
            record("HEAD", "@H@"),
            record("INDI", "@I1@"),
            record("FAM", "@F1@"),
            record("SOUR", "@S1@"),
            record("INDI", "@I2@"),
            record("FAM", "@F2@"),
            record("TRLR", "@T@"),
        ]);

        let persons: Vec<_> = classification.persons().map(Record::id).collect();
        let families: Vec<_> = classification.families().map(Record::id).collect();
        assert_eq!(persons, vec!["@I1@", "@I2@"]);
        assert_eq!(families, vec!["@F1@", "@F2@"]);
        assert_eq!(classification.skipped, 3);

        let interleaved: Vec<_> = classification
            .records
            .iter()
            .map(|c| c.record.id())
            .collect();
        assert_eq!(interleaved, vec!["@I1@", "@F1@", "@I2@", "@F2@"]);
    }

    #[test]
    fn nothing_supported() {
        let classification = RecordClassifier::new().classify(vec![record("NOTE", "@N1@")]);
        assert!(classification.records.is_empty());
        assert_eq!(classification.persons().count(), 0);
        assert_eq!(classification.skipped, 1);
    }
}
