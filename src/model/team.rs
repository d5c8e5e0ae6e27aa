use crate::model::{Error, Result, StageKey};
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;

pub type StageBuilds = IndexMap<StageKey, Vec<String>>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Team {
    pub name: String,
    pub stages: StageBuilds,
}

// Create
impl Team {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn new(name: impl ToString, stages: StageBuilds) -> Self {
        Self {
            name: name.to_string(),
            stages,
        }
    }

    /// Build ids of a stage, `None` when the team does not define the stage.
    pub fn builds(&self, stage: StageKey) -> Option<&Vec<String>> {
        self.stages.get(&stage)
    }
}

// Parser
impl Team {
    fn parse(json_str: &str) -> Result<Vec<Self>> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut result = Vec::new();
        for (name, details) in elements {
            // The metric feed is comma separated and splits team names naively.
            if name.contains(',') {
                return Err(Error::Config(format!(
                    "Team name '{name}' must not contain a comma"
                )));
            }
            let Some(details) = details.as_object() else {
                return Err(Error::Config(format!("Team '{name}' is not an object")));
            };
            let mut stages = StageBuilds::new();
            for (stage_key, builds) in details {
                let stage = stage_key.parse::<StageKey>()?;
                let Some(builds) = builds.as_array() else {
                    return Err(Error::Config(format!(
                        "Stage '{stage_key}' of team '{name}' is not a list"
                    )));
                };
                let mut build_ids = Vec::with_capacity(builds.len());
                for build in builds {
                    let Some(build_id) = build.as_str() else {
                        return Err(Error::Config(format!(
                            "Build id {build} in stage '{stage_key}' of team '{name}' is not a string"
                        )));
                    };
                    build_ids.push(build_id.to_string());
                }
                stages.insert(stage, build_ids);
            }
            result.push(Self::new(name, stages));
        }
        Ok(result)
    }
}
