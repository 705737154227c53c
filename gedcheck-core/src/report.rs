//! CSV violation report.
//!
//! Three columns per row: record kind, record identifier, description. A run
//! without violations still produces the header row.

use crate::config::Language;
use crate::error::Result;
use crate::types::Violation;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appended to the input file stem to name the report
pub const REPORT_SUFFIX: &str = "_syntaxcheck.csv";

pub fn header(language: Language) -> [&'static str; 3] {
    match language {
        Language::De => ["Datensatz-Typ", "Datensatz-ID", "Fehler"],
        Language::En => ["record-kind", "record-identifier", "description"],
    }
}

/// `family.ged` -> `family_syntaxcheck.csv`, placed in `dir`
pub fn report_path(input: &Path, dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gedcom".to_string());
    dir.join(format!("{stem}{REPORT_SUFFIX}"))
}

pub fn write_report<W: Write>(writer: W, violations: &[Violation], language: Language) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(header(language))?;

    for violation in violations {
        let description = violation.description(language);
        csv_writer.write_record([
            violation.kind.label(),
            violation.record_id.as_str(),
            description.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_file(path: &Path, violations: &[Violation], language: Language) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_report(std::io::BufWriter::new(file), violations, language)?;
    tracing::info!(path = %path.display(), rows = violations.len(), "wrote report");
    Ok(())
}
