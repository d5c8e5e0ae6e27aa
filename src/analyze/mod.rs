pub mod analyzer;
pub mod model;

pub use analyzer::Analyzer;
pub use model::StageMetricsAnalysis;
