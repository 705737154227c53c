use crate::assembler::RecordAssembler;
use crate::classifier::{Classification, RecordClassifier};
use crate::config::ValidationConfig;
use crate::decoder::LineDecoder;
use crate::error::Result;
use crate::rules::RuleEngine;
use crate::types::*;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Captured intermediate outputs from each pipeline stage.
/// Used for diagnostics, to inspect each boundary
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub lines: Vec<Line>,
    pub records: Vec<Record>,
    pub violations: Vec<Violation>,
    pub summary: RunSummary,
}

/// Result of one validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub violations: Vec<Violation>,
    pub summary: RunSummary,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        tracing::debug!(step = step_name, elapsed_ms = elapsed.as_millis() as u64, "step finished");
        self.timings.push((step_name.to_string(), elapsed));

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            println!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        println!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

/// Decode → assemble → classify → validate, in one batch.
pub struct RecordProcessor {
    decoder: LineDecoder,
    assembler: RecordAssembler,
    classifier: RecordClassifier,
    rule_engine: RuleEngine,
    workers: usize,
}

impl Default for RecordProcessor {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

impl RecordProcessor {
    pub fn new(config: &ValidationConfig) -> Self {
        Self::with_engine(RuleEngine::new(config), config.workers)
    }

    pub fn with_engine(rule_engine: RuleEngine, workers: usize) -> Self {
        Self {
            decoder: LineDecoder::new(),
            assembler: RecordAssembler::new(),
            classifier: RecordClassifier::new(),
            rule_engine,
            workers: workers.max(1),
        }
    }

    pub fn rule_engine(&self) -> &RuleEngine {
        &self.rule_engine
    }

    pub fn process(&self, source: &str) -> Result<ValidationOutcome> {
        self.process_with_profiling(source, &mut StepProfiler::new(false))
    }

    /// Raw bytes must be UTF-8
    pub fn process_bytes(&self, bytes: Vec<u8>, profiler: &mut StepProfiler) -> Result<ValidationOutcome> {
        let lines = profiler.time_step("Decode", || self.decoder.decode_bytes(bytes))?;
        self.process_lines(lines, profiler)
    }

    pub fn process_with_profiling(
        &self,
        source: &str,
        profiler: &mut StepProfiler,
    ) -> Result<ValidationOutcome> {
        let lines = profiler.time_step("Decode", || self.decoder.decode_source(source))?;
        self.process_lines(lines, profiler)
    }

    fn process_lines(&self, lines: Vec<Line>, profiler: &mut StepProfiler) -> Result<ValidationOutcome> {
        let line_count = lines.len();
        let records = profiler.time_step("Assemble", || self.assembler.assemble(lines))?;
        let classification = profiler.time_step("Classify", || self.classifier.classify(records));
        let violations = profiler.time_step("Validate", || self.validate(&classification));

        let summary = summarize(line_count, &classification, &violations);
        tracing::info!(
            persons = summary.person_records,
            families = summary.family_records,
            skipped = summary.skipped_records,
            violations = summary.violations,
            "validation finished"
        );

        Ok(ValidationOutcome { violations, summary })
    }

    /// Run the pipeline and keep every intermediate result
    pub fn process_capture_stages(
        &self,
        source: &str,
        profiler: &mut StepProfiler,
    ) -> Result<PipelineStages> {
        let lines = profiler.time_step("Decode", || self.decoder.decode_source(source))?;
        let records = profiler.time_step("Assemble", || self.assembler.assemble(lines.clone()))?;
        let classification = profiler.time_step("Classify", || self.classifier.classify(records.clone()));
        let violations = profiler.time_step("Validate", || self.validate(&classification));
        let summary = summarize(lines.len(), &classification, &violations);

        Ok(PipelineStages {
            lines,
            records,
            violations,
            summary,
        })
    }

    /// Validate supported records. With more than one worker the records are
    /// checked on a rayon pool; `collect` keeps record order, so output
    /// matches the single-threaded run.
    pub fn validate(&self, classification: &Classification) -> Vec<Violation> {
        let records = &classification.records;
        if self.workers == 1 || records.len() < 2 {
            return self.rule_engine.validate_all(records);
        }

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, "cannot start worker pool, validating sequentially");
                return self.rule_engine.validate_all(records);
            }
        };
        tracing::debug!(workers = self.workers, records = records.len(), "validating in parallel");

        let per_record: Vec<Vec<Violation>> = pool.install(|| {
            records
                .par_iter()
                .map(|record| self.rule_engine.validate(record))
                .collect()
        });
        per_record.into_iter().flatten().collect()
    }
}

fn summarize(lines: usize, classification: &Classification, violations: &[Violation]) -> RunSummary {
    RunSummary {
        lines,
        person_records: classification.persons().count(),
        family_records: classification.families().count(),
        skipped_records: classification.skipped,
        violations: violations.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GedcomError;
    use crate::rules::Issue;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "0 HEAD\n\
                          1 CHAR UTF-8\n\
                          0 @I1@ INDI\n\
                          1 NAME Anna /Schmidt/\n\
                          1 BIRT\n\
                          2 DATE 1 JAN 1900\n\
                          2 DATE 2 JAN 1900\n\
                          0 @F1@ FAM\n\
                          1 MARR\n\
                          0 TRLR\n";

    #[test]
    fn processes_sample_source() {
        let outcome = RecordProcessor::default().process(SAMPLE).unwrap();

        assert_eq!(
            outcome.summary,
            RunSummary {
                lines: 10,
                person_records: 1,
                family_records: 1,
                skipped_records: 2,
                violations: 2,
            }
        );
        assert_eq!(
            outcome.violations,
            vec![
                Violation::new(
                    RecordKind::Person,
                    "@I1@",
                    Issue::DuplicateEventDetail {
                        event: "BIRT".into(),
                        ordinal: 1,
                        detail: "DATE".into(),
                        count: 2,
                        max: 1,
                    }
                ),
                Violation::new(RecordKind::Family, "@F1@", Issue::MissingSpouse),
            ]
        );
    }

    #[test]
    fn decode_failure_stops_processing() {
        let err = RecordProcessor::default()
            .process("0 @I1@ INDI\nNAME broken\n")
            .unwrap_err();
        assert!(matches!(err, GedcomError::Decode { line: 2, .. }));
    }

    #[test]
    fn profiler_records_each_step() {
        let mut profiler = StepProfiler::new(true);
        RecordProcessor::default()
            .process_with_profiling(SAMPLE, &mut profiler)
            .unwrap();

        let steps: Vec<_> = profiler.timings().iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(steps, vec!["Decode", "Assemble", "Classify", "Validate"]);
    }

    #[test]
    fn disabled_profiler_records_nothing() {
        let mut profiler = StepProfiler::new(false);
        RecordProcessor::default()
            .process_with_profiling(SAMPLE, &mut profiler)
            .unwrap();
        assert!(profiler.timings().is_empty());
    }

    #[test]
    fn profiler_times_stage_capture() {
        let mut profiler = StepProfiler::new(true);
        RecordProcessor::default()
            .process_capture_stages(SAMPLE, &mut profiler)
            .unwrap();

        let steps: Vec<_> = profiler.timings().iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(steps, vec!["Decode", "Assemble", "Classify", "Validate"]);
    }

    #[test]
    fn worker_pool_keeps_record_order() {
        let source: String = (1..=40)
            .map(|i| format!("0 @F{i}@ FAM\n1 MARR\n2 TYPE civil\n1 MARR\n2 TYPE CIVIL\n"))
            .collect();
        let sequential = RecordProcessor::default().process(&source).unwrap();

        for workers in [2, 5, 64] {
            let config = ValidationConfig {
                workers,
                ..ValidationConfig::default()
            };
            let parallel = RecordProcessor::new(&config).process(&source).unwrap();
            assert_eq!(parallel, sequential, "workers = {workers}");
        }
        assert_eq!(sequential.violations.len(), 80);
        assert_eq!(sequential.violations[2].record_id, "@F2@");
    }

    #[test]
    fn captured_stages_match_plain_run() {
        let processor = RecordProcessor::default();
        let stages = processor
            .process_capture_stages(SAMPLE, &mut StepProfiler::new(false))
            .unwrap();
        let outcome = processor.process(SAMPLE).unwrap();

        assert_eq!(stages.lines.len(), 10);
        assert_eq!(stages.records.len(), 4);
        assert_eq!(stages.violations, outcome.violations);
        assert_eq!(stages.summary, outcome.summary);
    }
}
