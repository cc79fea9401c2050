use std::fmt;

use thiserror::Error;

/// Pipeline stage that talked to an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Initialize,
    List,
    Fetch,
    Embed,
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Initialize => "initialize",
            Stage::List => "list",
            Stage::Fetch => "fetch",
            Stage::Embed => "embed",
            Stage::Generate => "generate",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("No content available: {0}")]
    NoContentAvailable(String),

    #[error("Upstream failure during {stage} ({resource}): {source:#}")]
    UpstreamFailure {
        stage: Stage,
        resource: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Embedding requested for an empty input batch")]
    EmptyInput,
}

impl Error {
    pub fn upstream(stage: Stage, resource: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Error::UpstreamFailure { stage, resource: resource.into(), source: source.into() }
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidConfiguration(_) => "InvalidConfiguration",
            Error::NoContentAvailable(_) => "NoContentAvailable",
            Error::UpstreamFailure { .. } => "UpstreamFailure",
            Error::EmptyInput => "EmptyInput",
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::UpstreamFailure { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
