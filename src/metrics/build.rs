use crate::metrics::percentage;
use crate::model::Result;
use crate::teamcity::{BuildCountQuery, BuildStatus};
use std::fmt;

/// Pass/fail counts of one build configuration. Counts stay zero until gathered.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BuildMetrics {
    pub build_id: String,
    pub pass_count: u64,
    pub fail_count: u64,
    pub total_count: u64,
}

impl BuildMetrics {
    pub fn new(build_id: impl ToString) -> Self {
        Self {
            build_id: build_id.to_string(),
            pass_count: 0,
            fail_count: 0,
            total_count: 0,
        }
    }

    /// Errors count as failures. Any failed query aborts without touching the counts.
    pub async fn gather(&mut self, query: &impl BuildCountQuery) -> Result<()> {
        let pass_count = query.count(&self.build_id, BuildStatus::Success).await?;
        let failure_count = query.count(&self.build_id, BuildStatus::Failure).await?;
        let error_count = query.count(&self.build_id, BuildStatus::Error).await?;

        self.pass_count = pass_count;
        self.fail_count = failure_count + error_count;
        self.total_count = self.pass_count + self.fail_count;
        Ok(())
    }

    pub fn pass_percentage(&self) -> f64 {
        percentage(self.pass_count, self.total_count)
    }

    pub fn fail_percentage(&self) -> f64 {
        percentage(self.fail_count, self.total_count)
    }
}

impl fmt::Display for BuildMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Build Id: {}; Pass Count: {}; Fail Count: {}; Total Count: {}",
            self.build_id, self.pass_count, self.fail_count, self.total_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fakes::FakeCounts;
    use crate::model::Error;

    #[tokio::test]
    async fn folds_errors_into_failures() {
        let query = FakeCounts::new().with("bt102", 40, 7, 3);
        let mut build = BuildMetrics::new("bt102");
        build.gather(&query).await.unwrap();

        assert_eq!(build.pass_count, 40);
        assert_eq!(build.fail_count, 10);
        assert_eq!(build.total_count, 50);
        assert_eq!(build.pass_percentage(), 80.0);
        assert_eq!(build.fail_percentage(), 20.0);
        assert_eq!(
            *query.queries.borrow(),
            vec![
                ("bt102".to_string(), BuildStatus::Success),
                ("bt102".to_string(), BuildStatus::Failure),
                ("bt102".to_string(), BuildStatus::Error),
            ]
        );
    }

    #[tokio::test]
    async fn percentages_add_up_to_hundred() {
        for (pass, fail) in [(1, 2), (2, 1), (7, 6), (999, 1), (1, 0), (0, 5)] {
            let query = FakeCounts::new().with("b", pass, fail, 0);
            let mut build = BuildMetrics::new("b");
            build.gather(&query).await.unwrap();
            assert_eq!(build.pass_count + build.fail_count, build.total_count);
            let sum = build.pass_percentage() + build.fail_percentage();
            assert!((sum - 100.0).abs() < 0.011, "{pass}/{fail} -> {sum}");
        }
    }

    #[tokio::test]
    async fn failed_query_leaves_counts_untouched() {
        let query = FakeCounts::new().broken("bt1");
        let mut build = BuildMetrics::new("bt1");
        let err = build.gather(&query).await.unwrap_err();

        assert!(matches!(err, Error::NonNumericCount { .. }));
        assert_eq!(build, BuildMetrics::new("bt1"));
    }

    #[test]
    fn ungathered_build_reports_zero_percent() {
        let build = BuildMetrics::new("bt1");
        assert_eq!(build.pass_percentage(), 0.0);
        assert_eq!(build.fail_percentage(), 0.0);
    }

    #[test]
    fn display() {
        let build = BuildMetrics {
            build_id: "bt1".to_string(),
            pass_count: 3,
            fail_count: 1,
            total_count: 4,
        };
        assert_eq!(
            build.to_string(),
            "Build Id: bt1; Pass Count: 3; Fail Count: 1; Total Count: 4"
        );
    }
}
