use serde::{Deserialize, Serialize};

/// GEDCOM tags the rule set looks at
pub mod tags {
    pub const PERSON: &str = "INDI";
    pub const FAMILY: &str = "FAM";

    pub const NAME: &str = "NAME";
    pub const TYPE: &str = "TYPE";
    pub const DATE: &str = "DATE";
    pub const PLACE: &str = "PLAC";

    pub const BIRTH: &str = "BIRT";
    pub const DEATH: &str = "DEAT";
    pub const MARRIAGE: &str = "MARR";

    pub const HUSBAND: &str = "HUSB";
    pub const WIFE: &str = "WIFE";
}

// ===== DECODED INPUT =====

/// One decoded input line: `<level> [<xref>] <tag> [<value>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// 1-based line number in the source
    pub number: usize,
    pub level: usize,
    pub xref: Option<String>,
    pub tag: String,
    pub value: Option<String>,
}

// ===== RECORD TREE =====

/// A tag with its optional value and its nested sub-tags in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub tag: String,
    pub value: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>, value: Option<String>) -> Self {
        Self {
            tag: tag.into(),
            value,
            children: Vec::new(),
        }
    }

    /// Direct children carrying `tag`, in document order
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    pub fn count_children(&self, tag: &str) -> usize {
        self.children_tagged(tag).count()
    }

    pub fn first_child(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.tag == tag)
    }

    pub fn has_child(&self, tag: &str) -> bool {
        self.first_child(tag).is_some()
    }

    /// Total number of nodes in this subtree, including self
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_size).sum::<usize>()
    }
}

/// A level-0 entry of the source together with its whole subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Cross-reference of the level-0 line, e.g. `@I1@`
    pub xref: Option<String>,
    /// Line number the record starts on
    pub line: usize,
    pub root: Node,
}

impl Record {
    /// Identifier used in reports. Records without a cross-reference get an empty id.
    pub fn id(&self) -> &str {
        self.xref.as_deref().unwrap_or("")
    }

    /// The level-0 tag, e.g. `INDI`
    pub fn tag(&self) -> &str {
        &self.root.tag
    }
}

// ===== CLASSIFICATION =====

/// The record kinds the validator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Person,
    Family,
}

impl RecordKind {
    /// Maps a level-0 tag to a supported kind. Every other tag is out of scope.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            tags::PERSON => Some(Self::Person),
            tags::FAMILY => Some(Self::Family),
            _ => None,
        }
    }

    /// Label written to the report's record-kind column
    pub fn label(&self) -> &'static str {
        match self {
            Self::Person => tags::PERSON,
            Self::Family => tags::FAMILY,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub kind: RecordKind,
    pub record: Record,
}

// ===== RESULTS =====

/// One rule breach, scoped to exactly one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: RecordKind,
    pub record_id: String,
    pub issue: crate::rules::Issue,
}

impl Violation {
    pub fn new(kind: RecordKind, record_id: impl Into<String>, issue: crate::rules::Issue) -> Self {
        Self {
            kind,
            record_id: record_id.into(),
            issue,
        }
    }

    /// Human-readable description in the report language
    pub fn description(&self, language: crate::config::Language) -> String {
        self.issue.describe(language)
    }
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub lines: usize,
    pub person_records: usize,
    pub family_records: usize,
    pub skipped_records: usize,
    pub violations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(tag: &str, children: Vec<Node>) -> Node {
        Node {
            tag: tag.to_string(),
            value: None,
            children,
        }
    }

    #[test]
    fn child_queries_follow_document_order() {
        let node = event(
            "BIRT",
            vec![
                Node::new("DATE", Some("1 JAN 1900".into())),
                Node::new("PLAC", Some("Berlin".into())),
                Node::new("DATE", Some("2 JAN 1900".into())),
            ],
        );

        assert_eq!(node.count_children("DATE"), 2);
        assert_eq!(
            node.first_child("DATE").and_then(|n| n.value.as_deref()),
            Some("1 JAN 1900")
        );
        assert!(node.has_child("PLAC"));
        assert!(!node.has_child("TYPE"));
        assert_eq!(node.subtree_size(), 4);
    }

    #[test]
    fn record_kind_from_tag() {
        assert_eq!(RecordKind::from_tag("INDI"), Some(RecordKind::Person));
        assert_eq!(RecordKind::from_tag("FAM"), Some(RecordKind::Family));
        assert_eq!(RecordKind::from_tag("SOUR"), None);
        assert_eq!(RecordKind::Family.to_string(), "FAM");
    }

    #[test]
    fn record_without_xref_has_empty_id() {
        let record = Record {
            xref: None,
            line: 1,
            root: Node::new("INDI", None),
        };
        assert_eq!(record.id(), "");
        assert_eq!(record.tag(), "INDI");
    }
}
