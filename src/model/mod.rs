mod error;
mod stage;
mod team;

pub use error::{Error, Result};
pub use stage::StageKey;
pub use team::{StageBuilds, Team};
