// Pipeline stage dump
//
// Writes every intermediate result of one run as pretty JSON, plus a
// summary.json for quick inspection by scripts.

use anyhow::{Context, Result};
use gedcheck_core::PipelineStages;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the stage files into `output_dir`, returning the paths written.
pub fn save_stages(stages: &PipelineStages, input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let mut written = Vec::new();

    // Stage 1: decoded lines
    let path = output_dir.join("stage1_lines.json");
    write_json(&path, &stages.lines)?;
    println!("  💾 {} ({} lines)", path.display(), stages.lines.len());
    written.push(path);

    // Stage 2: assembled records
    let path = output_dir.join("stage2_records.json");
    write_json(&path, &stages.records)?;
    println!("  💾 {} ({} records)", path.display(), stages.records.len());
    written.push(path);

    // Stage 3: violations
    let path = output_dir.join("stage3_violations.json");
    write_json(&path, &stages.violations)?;
    println!("  💾 {} ({} violations)", path.display(), stages.violations.len());
    written.push(path);

    let summary = serde_json::json!({
        "input": input.display().to_string(),
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "lines": stages.summary.lines,
            "person_records": stages.summary.person_records,
            "family_records": stages.summary.family_records,
            "skipped_records": stages.summary.skipped_records,
            "violations": stages.summary.violations,
        }
    });
    let path = output_dir.join("summary.json");
    write_json(&path, &summary)?;
    println!("  💾 {}", path.display());
    written.push(path);

    Ok(written)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
