// gedcheck Core Library
//
// Structural validation of GEDCOM person (INDI) and family (FAM) records.
// Decodes leveled lines, rebuilds each record tree and runs the rule
// checklist over it. Rule violations are results, not errors.

pub mod types;
pub mod error;
pub mod decoder;
pub mod assembler;
pub mod classifier;
pub mod rules;
pub mod config;
pub mod report;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::{GedcomError, Result};
pub use config::{Language, ValidationConfig};
pub use processor::{PipelineStages, RecordProcessor, StepProfiler, ValidationOutcome};
pub use rules::{Issue, RecordRule, RuleEngine};
