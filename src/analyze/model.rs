/// Outcome of the rule checks for one team.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StageMetricsAnalysis {
    pub team_name: String,
    pub well: Vec<String>,
    pub needs_improvement: Vec<String>,
}

impl StageMetricsAnalysis {
    pub fn new(team_name: impl ToString) -> Self {
        Self {
            team_name: team_name.to_string(),
            well: vec![],
            needs_improvement: vec![],
        }
    }

    pub fn add_well(&mut self, note: impl ToString) {
        self.well.push(note.to_string());
    }

    pub fn add_needs_improvement(&mut self, note: impl ToString) {
        self.needs_improvement.push(note.to_string());
    }

    pub fn add(&mut self, well: bool, note: impl ToString) {
        if well {
            self.add_well(note)
        } else {
            self.add_needs_improvement(note)
        }
    }
}
