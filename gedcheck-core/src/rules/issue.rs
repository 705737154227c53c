use crate::config::Language;
use serde::{Deserialize, Serialize};

/// What a rule found. Rendered into a report description per language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum Issue {
    /// A single-occurrence person tag appears too often
    TooManyOccurrences {
        tag: String,
        count: usize,
        max: usize,
    },
    MultipleUntypedNames {
        count: usize,
    },
    UntypedNameNotFirst,
    /// DATE or PLAC repeated inside one event
    DuplicateEventDetail {
        event: String,
        ordinal: usize,
        detail: String,
        count: usize,
        max: usize,
    },
    TooManyMarriages {
        count: usize,
        max: usize,
    },
    TooManySpouses {
        tag: String,
        count: usize,
        max: usize,
    },
    MissingSpouse,
    InvalidMarriageType {
        ordinal: usize,
        value: String,
    },
    TooManyMarriagesOfType {
        marriage_type: String,
        count: usize,
        max: usize,
    },
}

impl Issue {
    pub fn describe(&self, language: Language) -> String {
        match language {
            Language::De => self.describe_de(),
            Language::En => self.describe_en(),
        }
    }

    fn describe_de(&self) -> String {
        match self {
            Issue::TooManyOccurrences { tag, count, max } => {
                format!("{tag} kommt mehrfach vor ({count}) – maximal {max} erlaubt.")
            }
            Issue::MultipleUntypedNames { count } => {
                format!("Mehr als ein untypisierter NAME-Tag ({count}).")
            }
            Issue::UntypedNameNotFirst => {
                "Untypisierter NAME-Tag ist nicht der erste NAME-Tag.".to_string()
            }
            Issue::DuplicateEventDetail {
                event,
                ordinal,
                detail,
                count,
                ..
            } => format!("{event} #{ordinal}.{detail} kommt mehrfach vor ({count})."),
            Issue::TooManyMarriages { count, max } => {
                format!("Es gibt {count} MARR-Tags – maximal {max} erlaubt.")
            }
            Issue::TooManySpouses { tag, count, max } => {
                format!("Es gibt {count} {tag}-Tags – maximal {max} erlaubt.")
            }
            Issue::MissingSpouse => {
                "Mindestens ein WIFE- oder ein HUSB-Tag muss vorhanden sein.".to_string()
            }
            Issue::InvalidMarriageType { ordinal, value } => {
                format!("MARR #{ordinal} hat einen nicht unterstützten TYPE '{value}'.")
            }
            Issue::TooManyMarriagesOfType {
                marriage_type,
                count,
                max,
            } => format!("{count} {marriage_type}-MARR-Tags – maximal {max} erlaubt."),
        }
    }

    fn describe_en(&self) -> String {
        match self {
            Issue::TooManyOccurrences { tag, count, max } => {
                format!("Tag {tag} occurs {count} times, maximum {max} allowed.")
            }
            Issue::MultipleUntypedNames { count } => {
                format!("Untyped NAME tag is not unique ({count} untyped NAME tags).")
            }
            Issue::UntypedNameNotFirst => "Untyped NAME tag must appear first.".to_string(),
            Issue::DuplicateEventDetail {
                event,
                ordinal,
                detail,
                count,
                max,
            } => format!("{event} #{ordinal}.{detail} occurs {count} times, maximum {max} allowed."),
            Issue::TooManyMarriages { count, max } => {
                format!("{count} MARR tags, maximum {max} allowed.")
            }
            Issue::TooManySpouses { tag, count, max } => {
                format!("{count} {tag} tags, maximum {max} allowed.")
            }
            Issue::MissingSpouse => "At least one spouse tag (HUSB or WIFE) required.".to_string(),
            Issue::InvalidMarriageType { ordinal, value } => {
                format!("MARR #{ordinal} has invalid TYPE value '{value}'.")
            }
            Issue::TooManyMarriagesOfType {
                marriage_type,
                count,
                max,
            } => format!(
                "More than one {} marriage: {count} {marriage_type} MARR tags, maximum {max} allowed.",
                marriage_type.to_lowercase()
            ),
        }
    }
}
