use crate::metrics::{percentage, BuildMetrics};
use crate::model::{Result, StageKey};
use crate::teamcity::BuildCountQuery;
use std::fmt;

/// Aggregate of the builds configured for one pipeline stage.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StageMetrics {
    pub stage_key: StageKey,
    pub stage_name: String,
    pub builds: Vec<BuildMetrics>,
    pub pass_count: u64,
    pub fail_count: u64,
    pub total_count: u64,
}

impl StageMetrics {
    pub fn new(stage_key: StageKey, build_ids: &[String]) -> Self {
        Self {
            stage_key,
            stage_name: stage_key.display_name().to_string(),
            builds: build_ids.iter().map(BuildMetrics::new).collect(),
            pass_count: 0,
            fail_count: 0,
            total_count: 0,
        }
    }

    /// Gathers every build in order, then sums their counts. An empty stage stays at zero.
    pub async fn gather(&mut self, query: &impl BuildCountQuery) -> Result<()> {
        for build in self.builds.iter_mut() {
            build.gather(query).await?;
        }
        self.pass_count = self.builds.iter().map(|b| b.pass_count).sum();
        self.fail_count = self.builds.iter().map(|b| b.fail_count).sum();
        self.total_count = self.pass_count + self.fail_count;
        Ok(())
    }

    pub fn pass_percentage(&self) -> f64 {
        percentage(self.pass_count, self.total_count)
    }

    pub fn fail_percentage(&self) -> f64 {
        percentage(self.fail_count, self.total_count)
    }

    /// Whether the stage aggregate exceeds its acceptable success rate.
    pub fn is_healthy(&self) -> bool {
        self.exceeds_threshold(self.pass_percentage())
    }

    /// Builds are held to the threshold of the stage they belong to.
    pub fn is_build_healthy(&self, build: &BuildMetrics) -> bool {
        self.exceeds_threshold(build.pass_percentage())
    }

    fn exceeds_threshold(&self, pass_percentage: f64) -> bool {
        pass_percentage > self.stage_key.acceptable_success_rate() as f64
    }
}

impl fmt::Display for StageMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stage Name: {}; Pass Count: {}; Fail Count: {}; Total Count: {}; Builds: {}",
            self.stage_name,
            self.pass_count,
            self.fail_count,
            self.total_count,
            self.builds.len()
        )
    }
}
