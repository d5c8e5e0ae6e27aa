use crate::analyze::StageMetricsAnalysis;
use crate::model::Result;
use crate::report::open_append;
use std::io::Write;
use std::path::{Path, PathBuf};

const RETENTION_NOTE: &str = "NOTE: TC keeps build data for the last 35 days. \
Keeps artifacts for 5 days from last build and last 5 successful builds";

/// Appends team analyses to the text report. The retention note is written
/// once, ahead of the first team of the run.
pub struct AnalysisReport {
    path: PathBuf,
    banner_written: bool,
}

impl AnalysisReport {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            banner_written: false,
        }
    }

    pub fn append(&mut self, analysis: &StageMetricsAnalysis) -> Result<()> {
        let text = render(analysis, !self.banner_written);
        let mut file = open_append(&self.path)?;
        file.write_all(text.as_bytes())?;
        self.banner_written = true;
        Ok(())
    }
}

pub fn render(analysis: &StageMetricsAnalysis, with_banner: bool) -> String {
    let mut text = String::new();
    if with_banner {
        text.push_str(RETENTION_NOTE);
        text.push_str("\n\n");
    }
    text.push_str(&format!("Team Name: {}\n", analysis.team_name));
    text.push_str("Well\n");
    for line in &analysis.well {
        text.push_str(line);
        text.push('\n');
    }
    text.push_str("Needs Improvement\n");
    for line in &analysis.needs_improvement {
        text.push_str(line);
        text.push('\n');
    }
    text.push_str("\n\n");
    text
}
