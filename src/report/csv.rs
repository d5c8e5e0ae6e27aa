use crate::metrics::{format_percentage, TeamMetrics};
use crate::model::Result;
use crate::report::open_append;
use itertools::Itertools;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

pub type Row = Vec<String>;

pub trait MetricsCsv {
    fn stage_rows(&self) -> Vec<Row>;
    fn build_rows(&self) -> Vec<Row>;
    fn append_csv(&self, path: &Path) -> Result<()>;
}

impl MetricsCsv for TeamMetrics {
    fn stage_rows(&self) -> Vec<Row> {
        let mut header = vec![self.team_name.clone()];
        let mut pass = vec!["Pass".to_string()];
        let mut fail = vec!["Fail".to_string()];
        for stage in self.stages.values() {
            header.push(stage.stage_name.clone());
            pass.push(format!(
                "{} - {}%",
                stage.pass_count,
                format_percentage(stage.pass_percentage())
            ));
            fail.push(format!(
                "{} - {}%",
                stage.fail_count,
                format_percentage(stage.fail_percentage())
            ));
        }
        vec![header, pass, fail]
    }

    fn build_rows(&self) -> Vec<Row> {
        let mut stages = vec![self.team_name.clone()];
        let mut builds = vec![self.team_name.clone()];
        let mut pass = vec!["Pass".to_string()];
        let mut fail = vec!["Fail".to_string()];
        for stage in self.stages.values() {
            for build in &stage.builds {
                stages.push(stage.stage_name.clone());
                builds.push(build.build_id.clone());
                pass.push(format!(
                    "{} - {}%",
                    build.pass_count,
                    format_percentage(build.pass_percentage())
                ));
                fail.push(format!(
                    "{} - {}%",
                    build.fail_count,
                    format_percentage(build.fail_percentage())
                ));
            }
        }
        vec![stages, builds, pass, fail]
    }

    fn append_csv(&self, path: &Path) -> Result<()> {
        let mut rows = self.stage_rows();
        rows.push(vec![]);
        rows.extend(self.build_rows());
        rows.push(vec![]);
        rows.push(vec![]);

        let mut file = open_append(path)?;
        file.write_all(render_rows(&rows).as_bytes())?;
        Ok(())
    }
}

pub fn render_rows(rows: &[Row]) -> String {
    rows.iter()
        .map(|row| row.iter().map(|field| escape_field(field)).join(",") + "\n")
        .collect()
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{BuildMetrics, StageMetrics, StageMetricsMap};
    use crate::model::StageKey;

    fn stage(stage_key: StageKey, builds: &[(&str, u64, u64)]) -> StageMetrics {
        let mut stage = StageMetrics::new(stage_key, &[]);
        for (build_id, pass, fail) in builds {
            stage.builds.push(BuildMetrics {
                build_id: build_id.to_string(),
                pass_count: *pass,
                fail_count: *fail,
                total_count: pass + fail,
            });
            stage.pass_count += pass;
            stage.fail_count += fail;
        }
        stage.total_count = stage.pass_count + stage.fail_count;
        stage
    }

    fn team() -> TeamMetrics {
        let mut stages = StageMetricsMap::new();
        stages.insert(
            StageKey::Commit,
            stage(StageKey::Commit, &[("bt102", 9, 1)]),
        );
        stages.insert(
            StageKey::Acceptance,
            stage(StageKey::Acceptance, &[("bt238", 1, 1), ("bt601", 3, 0)]),
        );
        TeamMetrics::new("PCAL", stages)
    }

    #[test]
    fn stage_header_follows_stage_order() {
        let rows = team().stage_rows();
        assert_eq!(rows[0], vec!["PCAL", "Commit Stage", "Acceptance Stage"]);
        assert_eq!(rows[1], vec!["Pass", "9 - 90.0%", "4 - 80.0%"]);
        assert_eq!(rows[2], vec!["Fail", "1 - 10.0%", "1 - 20.0%"]);
    }

    #[test]
    fn build_rows_have_one_column_per_build() {
        let rows = team().build_rows();
        assert_eq!(
            rows[0],
            vec!["PCAL", "Commit Stage", "Acceptance Stage", "Acceptance Stage"]
        );
        assert_eq!(rows[1], vec!["PCAL", "bt102", "bt238", "bt601"]);
        assert_eq!(rows[2], vec!["Pass", "9 - 90.0%", "1 - 50.0%", "3 - 100.0%"]);
        assert_eq!(rows[3], vec!["Fail", "1 - 10.0%", "1 - 50.0%", "0 - 0.0%"]);
    }

    #[test]
    fn appends_team_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        team().append_csv(&path).unwrap();
        team().append_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let block = "PCAL,Commit Stage,Acceptance Stage\n\
                     Pass,9 - 90.0%,4 - 80.0%\n\
                     Fail,1 - 10.0%,1 - 20.0%\n\
                     \n\
                     PCAL,Commit Stage,Acceptance Stage,Acceptance Stage\n\
                     PCAL,bt102,bt238,bt601\n\
                     Pass,9 - 90.0%,1 - 50.0%,3 - 100.0%\n\
                     Fail,1 - 10.0%,1 - 50.0%,0 - 0.0%\n\
                     \n\
                     \n";
        assert_eq!(content, format!("{block}{block}"));
    }

    #[test]
    fn quotes_fields_with_separators() {
        let rows = vec![vec!["a,b".to_string(), "say \"hi\"".to_string(), "plain".to_string()]];
        assert_eq!(render_rows(&rows), "\"a,b\",\"say \"\"hi\"\"\",plain\n");
    }
}
