use crate::metrics::{format_percentage, TeamMetrics};
use crate::model::{Error, Result};
use crate::report::csv::{render_rows, Row};
use crate::report::{open_append, GRAPHITE_DATA};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Two-line feed per team (stage names, then pass percentages) read back by the collector.
pub trait GraphiteFeed {
    fn feed_rows(&self) -> Vec<Row>;
    fn append_feed(&self, path: &Path) -> Result<()>;
}

impl GraphiteFeed for TeamMetrics {
    fn feed_rows(&self) -> Vec<Row> {
        let mut header = vec![self.team_name.clone()];
        let mut pass = vec!["Pass".to_string()];
        for stage in self.stages.values() {
            header.push(stage.stage_name.clone());
            pass.push(format_percentage(stage.pass_percentage()));
        }
        vec![header, pass]
    }

    fn append_feed(&self, path: &Path) -> Result<()> {
        let mut file = open_append(path)?;
        file.write_all(render_rows(&self.feed_rows()).as_bytes())?;
        Ok(())
    }
}

/// Lower-case with spaces and slashes turned into underscores.
pub fn slug(name: &str) -> String {
    name.to_lowercase().replace([' ', '/'], "_")
}

/// Turns feed content into `<scheme>.<team>.<stage> <value> <timestamp>` lines.
pub fn metric_lines(feed: &str, scheme: &str, timestamp: i64) -> Result<Vec<String>> {
    let feed_lines = feed.lines().collect::<Vec<_>>();
    let mut lines = vec![];
    for (index, chunk) in feed_lines.chunks(2).enumerate() {
        let &[header, data] = chunk else {
            return Err(Error::MalformedFeed(format!(
                "team block {} has no value line",
                index + 1
            )));
        };
        let header = header.trim().split(',').collect::<Vec<_>>();
        let data = data.trim().split(',').collect::<Vec<_>>();
        if header.len() != data.len() {
            return Err(Error::MalformedFeed(format!(
                "team '{}' has {} stages but {} values",
                header[0],
                header.len() - 1,
                data.len().saturating_sub(1)
            )));
        }
        let team = slug(header[0]);
        for (stage, value) in header.iter().zip(&data).skip(1) {
            lines.push(format!(
                "{}.{}.{} {} {}",
                scheme,
                team,
                slug(stage),
                value,
                timestamp
            ));
        }
    }
    Ok(lines)
}

/// Reads the feed written to `dir` and converts it into metric lines.
pub fn read_metric_lines(dir: &Path, scheme: &str, timestamp: i64) -> Result<Vec<String>> {
    let feed = fs::read_to_string(dir.join(GRAPHITE_DATA))?;
    metric_lines(&feed, scheme, timestamp)
}
