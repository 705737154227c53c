use crate::error::{GedcomError, Result};
use crate::types::*;

/// Rebuilds record trees from the flat, leveled line sequence.
pub struct RecordAssembler;

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// The record currently being assembled.
/// `open[i]` is the innermost open node at level `i`.
struct OpenRecord {
    xref: Option<String>,
    line: usize,
    open: Vec<Node>,
}

impl OpenRecord {
    /// Close every node deeper than `level`, attaching each to its parent.
    fn close_to(&mut self, level: usize) {
        while self.open.len() > level + 1 {
            if let Some(node) = self.open.pop() {
                if let Some(parent) = self.open.last_mut() {
                    parent.children.push(node);
                }
            }
        }
    }

    fn finish(mut self) -> Option<Record> {
        self.close_to(0);
        let root = self.open.pop()?;
        Some(Record {
            xref: self.xref,
            line: self.line,
            root,
        })
    }
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Single left-to-right pass over `lines`. Returns the level-0 records in
    /// source order.
    pub fn assemble(&self, lines: Vec<Line>) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut current: Option<OpenRecord> = None;
        let mut previous_level = 0;

        for line in lines {
            let Line {
                number,
                level,
                xref,
                tag,
                value,
            } = line;

            if level == 0 {
                if let Some(record) = current.take().and_then(OpenRecord::finish) {
                    records.push(record);
                }
                current = Some(OpenRecord {
                    xref,
                    line: number,
                    open: vec![Node::new(tag, value)],
                });
                previous_level = 0;
                continue;
            }

            let Some(record) = current.as_mut() else {
                return Err(GedcomError::OrphanLine {
                    line: number,
                    level,
                });
            };

            if level > previous_level + 1 {
                return Err(GedcomError::LevelJump {
                    line: number,
                    from: previous_level,
                    to: level,
                });
            }

            // Siblings and shallower lines close the nodes they follow
            record.close_to(level - 1);
            record.open.push(Node::new(tag, value));
            previous_level = level;
        }

        if let Some(record) = current.and_then(OpenRecord::finish) {
            records.push(record);
        }

        tracing::debug!(records = records.len(), "assembled records");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::LineDecoder;
    use pretty_assertions::assert_eq;

    fn assemble(source: &str) -> Result<Vec<Record>> {
        let lines = LineDecoder::new().decode_source(source)?;
        RecordAssembler::new().assemble(lines)
    }

    fn tags(node: &Node) -> Vec<&str> {
        node.children.iter().map(|c| c.tag.as_str()).collect()
    }

    #[test]
    fn splits_records_at_level_zero() {
        let records = assemble(
            "0 HEAD\n1 CHAR UTF-8\n0 @I1@ INDI\n1 NAME A\n0 @F1@ FAM\n1 HUSB @I1@\n0 TRLR\n",
        )
        .unwrap();

        let ids: Vec<_> = records.iter().map(|r| (r.tag(), r.id())).collect();
        assert_eq!(
            ids,
            vec![("HEAD", ""), ("INDI", "@I1@"), ("FAM", "@F1@"), ("TRLR", "")]
        );
        assert_eq!(records[1].line, 3);
        assert_eq!(tags(&records[2].root), vec!["HUSB"]);
        assert!(records[3].root.children.is_empty());
    }

    #[test]
    fn nests_by_level_and_keeps_sibling_order() {
        let records = assemble(
            "0 @I1@ INDI\n\
             1 NAME A /B/\n\
             2 TYPE birth\n\
             2 GIVN A\n\
             1 BIRT\n\
             2 DATE 1900\n\
             2 PLAC X\n\
             3 MAP\n\
             4 LATI N1\n\
             2 NOTE n\n\
             1 NAME C\n",
        )
        .unwrap();

        let person = &records[0].root;
        assert_eq!(tags(person), vec!["NAME", "BIRT", "NAME"]);
        assert_eq!(tags(&person.children[0]), vec!["TYPE", "GIVN"]);

        let birth = &person.children[1];
        assert_eq!(tags(birth), vec!["DATE", "PLAC", "NOTE"]);
        assert_eq!(tags(&birth.children[1]), vec!["MAP"]);
        assert_eq!(tags(&birth.children[1].children[0]), vec!["LATI"]);
        assert_eq!(person.subtree_size(), 11);
    }

    #[test]
    fn empty_input_has_no_records() {
        assert_eq!(assemble("").unwrap(), Vec::new());
    }

    #[test]
    fn rejects_level_jumps() {
        let err = assemble("0 @I1@ INDI\n1 BIRT\n3 DATE 1900\n").unwrap_err();
        assert!(matches!(
            err,
            GedcomError::LevelJump {
                line: 3,
                from: 1,
                to: 3
            }
        ));
    }

    #[test]
    fn rejects_lines_before_first_record() {
        let err = assemble("1 NAME A\n0 @I1@ INDI\n").unwrap_err();
        assert!(matches!(err, GedcomError::OrphanLine { line: 1, level: 1 }));
    }

    #[test]
    fn returning_to_shallower_level_after_deep_nesting() {
        let records = assemble("0 @F1@ FAM\n1 MARR\n2 PLAC X\n3 FORM a\n1 WIFE @I2@\n").unwrap();
        assert_eq!(tags(&records[0].root), vec!["MARR", "WIFE"]);
        assert_eq!(tags(&records[0].root.children[0]), vec!["PLAC"]);
    }
}
