use std::fmt;

use log::{error, warn};

/// One unit (asset, script, scene, splash block) that failed without
/// stopping the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    pub unit: String,
    pub message: String,
}

/// What one compilation did, for the summary line and the exit code.
#[derive(Debug, Default)]
pub struct CompileReport {
    pub assets_embedded: usize,
    pub assets_copied: usize,
    pub scripts_compiled: usize,
    pub scenes_compiled: usize,
    pub warnings: Vec<String>,
    pub failures: Vec<UnitFailure>,
}

impl CompileReport {
    pub fn new() -> Self {
        CompileReport::default()
    }

    pub fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }

    /// Takes warnings accumulated elsewhere (document loading) into
    /// the report. They were already logged at the source.
    pub fn absorb_warnings(&mut self, warnings: Vec<String>) {
        self.warnings.extend(warnings);
    }

    pub fn fail_unit(&mut self, unit: &str, message: String) {
        error!("{unit}: {message}");
        self.failures.push(UnitFailure {
            unit: unit.to_string(),
            message,
        });
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for CompileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} asset(s) embedded, {} copied, {} script(s), {} scene(s), {} warning(s), {} failure(s)",
            self.assets_embedded,
            self.assets_copied,
            self.scripts_compiled,
            self.scenes_compiled,
            self.warnings.len(),
            self.failures.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_mark_report_dirty() {
        let mut report = CompileReport::new();
        assert!(report.is_clean());
        report.fail_unit("scene 'main'", "name mismatch".to_string());
        assert!(!report.is_clean());
        assert_eq!(report.failures[0].unit, "scene 'main'");
    }

    #[test]
    fn summary_counts_everything() {
        let mut report = CompileReport::new();
        report.assets_embedded = 2;
        report.assets_copied = 1;
        report.scripts_compiled = 3;
        report.scenes_compiled = 1;
        report.warn("w".to_string());
        let line = report.to_string();
        assert!(line.contains("2 asset(s) embedded"));
        assert!(line.contains("3 script(s)"));
        assert!(line.contains("1 warning(s)"));
    }
}
