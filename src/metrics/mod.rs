pub mod build;
pub mod stage;
pub mod team;

pub use build::BuildMetrics;
pub use stage::StageMetrics;
pub use team::{StageMetricsMap, StageProgress, TeamMetrics};

/// `count / total * 100` rounded to two decimals. A zero total yields 0%.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 10_000.0).round() / 100.0
}

/// Renders a percentage with at least one decimal: `90.0`, `86.36`.
pub fn format_percentage(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
