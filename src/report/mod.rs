pub mod analysis;
pub mod csv;
pub mod graphite;
pub mod markdown;

pub use analysis::AnalysisReport;
pub use csv::MetricsCsv;
pub use graphite::GraphiteFeed;
pub use markdown::MarkdownReport;

use crate::model::Result;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::debug;

pub const METRICS_CSV: &str = "metrics.csv";
pub const GRAPHITE_DATA: &str = "graphite_data";
pub const ANALYSIS_REPORT: &str = "analysis_metrics_rule.txt";

/// Report files a run appends to, wiped by the collector before each run.
pub const OUTPUT_FILES: [&str; 3] = [ANALYSIS_REPORT, GRAPHITE_DATA, METRICS_CSV];

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Deletes the report files of a previous run; missing files are not an error.
pub fn remove_outputs(dir: &Path) -> Result<()> {
    for name in OUTPUT_FILES {
        let path = dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed previous report"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_previous_outputs_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(METRICS_CSV), "old").unwrap();
        fs::write(dir.path().join(GRAPHITE_DATA), "old").unwrap();
        fs::write(dir.path().join("teams.json"), "{}").unwrap();

        remove_outputs(dir.path()).unwrap();

        assert!(!dir.path().join(METRICS_CSV).exists());
        assert!(!dir.path().join(GRAPHITE_DATA).exists());
        assert!(dir.path().join("teams.json").exists());
    }

    #[test]
    fn open_append_keeps_existing_content() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ANALYSIS_REPORT);
        open_append(&path).unwrap().write_all(b"one\n").unwrap();
        open_append(&path).unwrap().write_all(b"two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }
}
