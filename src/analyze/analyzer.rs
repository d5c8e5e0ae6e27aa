use crate::analyze::StageMetricsAnalysis;
use crate::metrics::{format_percentage, StageMetrics, TeamMetrics};
use crate::model::StageKey;

pub trait Analyzer {
    fn analyze(&self) -> StageMetricsAnalysis;
}

impl Analyzer for TeamMetrics {
    fn analyze(&self) -> StageMetricsAnalysis {
        let mut analysis = StageMetricsAnalysis::new(&self.team_name);
        self.all_stages_defined_rule(&mut analysis);
        self.stage_rules(&mut analysis);
        self.staging_vs_production_rule(&mut analysis);
        analysis
    }
}

trait TeamMetricsRules {
    fn all_stages_defined(&self) -> bool;
    fn all_stages_defined_rule(&self, analysis: &mut StageMetricsAnalysis);
    fn stage_rules(&self, analysis: &mut StageMetricsAnalysis);
    fn staging_vs_production_rule(&self, analysis: &mut StageMetricsAnalysis);
}

impl TeamMetricsRules for TeamMetrics {
    fn all_stages_defined(&self) -> bool {
        StageKey::REQUIRED
            .iter()
            .all(|stage| self.stages.contains_key(stage))
    }

    fn all_stages_defined_rule(&self, analysis: &mut StageMetricsAnalysis) {
        if self.all_stages_defined() {
            analysis.add_well("  - All stages defined");
        } else {
            analysis.add_needs_improvement("  - Stages are missing");
        }
    }

    fn stage_rules(&self, analysis: &mut StageMetricsAnalysis) {
        for stage_key in StageKey::ALL {
            let Some(stage) = self.stages.get(&stage_key) else {
                continue;
            };
            stage_aggregate_rule(stage, analysis);
            stage_builds_rule(stage, analysis);
        }
    }

    fn staging_vs_production_rule(&self, analysis: &mut StageMetricsAnalysis) {
        for (staging_key, production_key) in StageKey::REGION_PAIRS {
            let (Some(staging), Some(production)) =
                (self.stages.get(&staging_key), self.stages.get(&production_key))
            else {
                continue;
            };
            if staging.total_count >= production.total_count {
                analysis.add_well(format!(
                    "  - {} aggregate build counts greater or equal than {} build counts [{} - {}]",
                    staging.stage_name,
                    production.stage_name,
                    staging.total_count,
                    production.total_count
                ));
            } else {
                analysis.add_needs_improvement(format!(
                    "  - {} aggregate build counts should be greater or equal than {} build counts [{} - {}]",
                    staging.stage_name,
                    production.stage_name,
                    staging.total_count,
                    production.total_count
                ));
            }
        }
    }
}

fn stage_aggregate_rule(stage: &StageMetrics, analysis: &mut StageMetricsAnalysis) {
    let threshold = stage.stage_key.acceptable_success_rate();
    let pass_percentage = format_percentage(stage.pass_percentage());
    if stage.is_healthy() {
        analysis.add_well(format!(
            "  - {}: aggregate stage with high success rate, above {}% success rate [{}%]",
            stage.stage_name, threshold, pass_percentage
        ));
    } else {
        analysis.add_needs_improvement(format!(
            "  - {}: aggregate stage with high failure rate, below {}% success rate [{}%]",
            stage.stage_name, threshold, pass_percentage
        ));
    }
}

fn stage_builds_rule(stage: &StageMetrics, analysis: &mut StageMetricsAnalysis) {
    let threshold = stage.stage_key.acceptable_success_rate();
    let mut first_well_build = true;
    let mut first_improvement_build = true;
    for build in &stage.builds {
        let healthy = stage.is_build_healthy(build);
        let first = if healthy {
            &mut first_well_build
        } else {
            &mut first_improvement_build
        };
        if *first {
            let header = if healthy {
                format!(
                    "  - {} builds with high success rate, above {}% success rate",
                    stage.stage_name, threshold
                )
            } else {
                format!(
                    "  - {} builds with high failure rate, below {}% success rate",
                    stage.stage_name, threshold
                )
            };
            analysis.add(healthy, header);
            *first = false;
        }
        analysis.add(
            healthy,
            format!(
                "    - Build id: {} [{}%]",
                build.build_id,
                format_percentage(build.pass_percentage())
            ),
        );
    }
}
