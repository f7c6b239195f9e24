use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::constants::defaults;

/// Identity the crew client is constructed with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CrewConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_description")]
    pub description: String,
}

fn default_name() -> String {
    defaults::CREW_NAME.to_string()
}

fn default_description() -> String {
    defaults::CREW_DESCRIPTION.to_string()
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: default_description(),
        }
    }
}

impl CrewConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("crew.name must not be empty");
        }
        if self.description.trim().is_empty() {
            bail!("crew.description must not be empty");
        }
        Ok(())
    }
}
