use crate::model::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Canonical pipeline stages. Declaration order is the canonical report order.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum StageKey {
    Commit,
    Acceptance,
    DevQa,
    StagingMia,
    StagingAtl,
    StagingPhx,
    StagingTor,
    ProductionMia,
    ProductionAtl,
    ProductionPhx,
    ProductionTor,
}

impl StageKey {
    pub const ALL: [StageKey; 11] = [
        StageKey::Commit,
        StageKey::Acceptance,
        StageKey::DevQa,
        StageKey::StagingMia,
        StageKey::StagingAtl,
        StageKey::StagingPhx,
        StageKey::StagingTor,
        StageKey::ProductionMia,
        StageKey::ProductionAtl,
        StageKey::ProductionPhx,
        StageKey::ProductionTor,
    ];

    /// Stages a team must define to be considered complete. MIA is optional.
    pub const REQUIRED: [StageKey; 9] = [
        StageKey::Commit,
        StageKey::Acceptance,
        StageKey::DevQa,
        StageKey::StagingAtl,
        StageKey::StagingPhx,
        StageKey::StagingTor,
        StageKey::ProductionAtl,
        StageKey::ProductionPhx,
        StageKey::ProductionTor,
    ];

    /// Staging stage paired with the production stage of the same region.
    pub const REGION_PAIRS: [(StageKey, StageKey); 4] = [
        (StageKey::StagingMia, StageKey::ProductionMia),
        (StageKey::StagingAtl, StageKey::ProductionAtl),
        (StageKey::StagingPhx, StageKey::ProductionPhx),
        (StageKey::StagingTor, StageKey::ProductionTor),
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StageKey::Commit => "commit",
            StageKey::Acceptance => "acceptance",
            StageKey::DevQa => "devqa",
            StageKey::StagingMia => "staging_mia",
            StageKey::StagingAtl => "staging_atl",
            StageKey::StagingPhx => "staging_phx",
            StageKey::StagingTor => "staging_tor",
            StageKey::ProductionMia => "production_mia",
            StageKey::ProductionAtl => "production_atl",
            StageKey::ProductionPhx => "production_phx",
            StageKey::ProductionTor => "production_tor",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StageKey::Commit => "Commit Stage",
            StageKey::Acceptance => "Acceptance Stage",
            StageKey::DevQa => "Dev/QA Stage",
            StageKey::StagingMia => "Staging Stage MIA",
            StageKey::StagingAtl => "Staging Stage ATL",
            StageKey::StagingPhx => "Staging Stage PHX",
            StageKey::StagingTor => "Staging Stage TOR",
            StageKey::ProductionMia => "Production Stage MIA",
            StageKey::ProductionAtl => "Production Stage ATL",
            StageKey::ProductionPhx => "Production Stage PHX",
            StageKey::ProductionTor => "Production Stage TOR",
        }
    }

    /// Success rate (percent) a stage has to exceed to be considered healthy.
    pub fn acceptable_success_rate(&self) -> u32 {
        match self {
            StageKey::Commit => 90,
            StageKey::Acceptance => 60,
            StageKey::DevQa => 70,
            StageKey::StagingMia
            | StageKey::StagingAtl
            | StageKey::StagingPhx
            | StageKey::StagingTor => 55,
            StageKey::ProductionMia
            | StageKey::ProductionAtl
            | StageKey::ProductionPhx
            | StageKey::ProductionTor => 90,
        }
    }
}

impl FromStr for StageKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StageKey::ALL
            .iter()
            .find(|stage| stage.key() == s)
            .copied()
            .ok_or_else(|| Error::UnknownStage(s.to_string()))
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_declaration_order() {
        let mut sorted = StageKey::ALL;
        sorted.sort();
        assert_eq!(sorted, StageKey::ALL);
    }

    #[test]
    fn parses_every_key() {
        for stage in StageKey::ALL {
            assert_eq!(stage.key().parse::<StageKey>().unwrap(), stage);
        }
        assert!(matches!(
            "staging_nyc".parse::<StageKey>(),
            Err(Error::UnknownStage(key)) if key == "staging_nyc"
        ));
    }

    #[test]
    fn mia_stages_are_optional() {
        assert!(!StageKey::REQUIRED.contains(&StageKey::StagingMia));
        assert!(!StageKey::REQUIRED.contains(&StageKey::ProductionMia));
        assert_eq!(StageKey::REQUIRED.len(), 9);
    }

    #[test]
    fn thresholds() {
        assert_eq!(StageKey::Commit.acceptable_success_rate(), 90);
        assert_eq!(StageKey::Acceptance.acceptable_success_rate(), 60);
        assert_eq!(StageKey::DevQa.acceptable_success_rate(), 70);
        assert_eq!(StageKey::StagingTor.acceptable_success_rate(), 55);
        assert_eq!(StageKey::ProductionMia.acceptable_success_rate(), 90);
    }
}
