use crate::metrics::StageMetrics;
use crate::model::{Result, StageKey, Team};
use crate::teamcity::BuildCountQuery;
use indexmap::IndexMap;
use tracing::debug;

/// Gathered stages of a team, always in canonical stage order.
pub type StageMetricsMap = IndexMap<StageKey, StageMetrics>;

pub type StageProgress<'a> = Box<dyn FnMut(&StageMetrics) + 'a>;

#[derive(Debug, Clone)]
pub struct TeamMetrics {
    pub team_name: String,
    pub stages: StageMetricsMap,
}

impl TeamMetrics {
    pub fn new(team_name: impl ToString, stages: StageMetricsMap) -> Self {
        Self {
            team_name: team_name.to_string(),
            stages,
        }
    }

    /// Gathers the stages a team defines one after another; absent stages are skipped.
    pub async fn gather<'a>(
        team: &Team,
        query: &impl BuildCountQuery,
        mut cb: StageProgress<'a>,
    ) -> Result<Self> {
        let mut stages = StageMetricsMap::new();
        for stage_key in StageKey::ALL {
            let Some(build_ids) = team.builds(stage_key) else {
                continue;
            };
            let mut stage_metrics = StageMetrics::new(stage_key, build_ids);
            cb(&stage_metrics);
            stage_metrics.gather(query).await?;
            for build in &stage_metrics.builds {
                debug!(team = %team.name, "{build}");
            }
            debug!(team = %team.name, "{stage_metrics}");
            stages.insert(stage_key, stage_metrics);
        }
        Ok(Self::new(&team.name, stages))
    }
}
