use crate::utils::ProgressStyleTemplate;
use indicatif::{MultiProgress, ProgressBar};
use std::time::Duration;

pub trait MultiProgressNew {
    /// Spinner bar counting the stages of one team.
    fn add_team_bar(&self, team_name: &str, stages: usize) -> ProgressBar;
}

impl MultiProgressNew for MultiProgress {
    fn add_team_bar(&self, team_name: &str, stages: usize) -> ProgressBar {
        let pb = self.add(ProgressBar::new(stages as u64));
        pb.set_style(ProgressStyleTemplate::stage_bar());
        pb.set_message(team_name.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
