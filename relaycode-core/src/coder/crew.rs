//! Contracts for the external multi-agent orchestrator ("crew").

use async_trait::async_trait;
use relaycode_config::CrewConfig;
use thiserror::Error;

/// Output of [`NullCrew`].
pub const NULL_CREW_OUTPUT: &str = "Crew execution placeholder";

/// Name and description a crew is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewIdentity {
    pub name: String,
    pub description: String,
}

impl CrewIdentity {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl Default for CrewIdentity {
    fn default() -> Self {
        Self::from(&CrewConfig::default())
    }
}

impl From<&CrewConfig> for CrewIdentity {
    fn from(config: &CrewConfig) -> Self {
        Self::new(config.name.clone(), config.description.clone())
    }
}

#[derive(Debug, Error)]
pub enum CrewError {
    #[error("{0}")]
    Execution(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A connected crew. `run` takes the edit request and returns the crew's
/// answer verbatim.
#[async_trait]
pub trait CrewClient: Send + Sync {
    async fn run(&self, input: &str) -> Result<String, CrewError>;
}

/// Creates crew clients for an identity.
pub trait CrewProvider: Send + Sync {
    fn connect(&self, identity: &CrewIdentity) -> Box<dyn CrewClient>;
}

/// Provider used when no orchestrator is configured. Every run succeeds with
/// [`NULL_CREW_OUTPUT`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCrew;

#[async_trait]
impl CrewClient for NullCrew {
    async fn run(&self, _input: &str) -> Result<String, CrewError> {
        Ok(NULL_CREW_OUTPUT.to_string())
    }
}

impl CrewProvider for NullCrew {
    fn connect(&self, identity: &CrewIdentity) -> Box<dyn CrewClient> {
        tracing::debug!(target: "relaycode.coder", crew = %identity.name, "using null crew");
        Box::new(NullCrew)
    }
}
