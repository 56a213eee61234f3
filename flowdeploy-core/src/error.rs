//! Error kinds raised while preparing, invoking and reporting a deployment

use thiserror::Error;

/// Result type alias for deployment operations
pub type Result<T> = std::result::Result<T, DeployError>;

/// Errors that abort one deployment attempt
#[derive(Debug, Error)]
pub enum DeployError {
    /// A required identity field is missing or empty
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The deploy-parameters document does not have the expected shape
    #[error("Malformed deploy parameters document: {0}")]
    MalformedParameterDocument(String),

    /// Starting the remote process failed
    #[error("Failed to run process: {0}")]
    RemoteInvocation(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The process was started but its metadata could not be read back
    #[error(
        "Process '{process}' of application '{application}' not found after start, cannot correlate the run"
    )]
    Correlation {
        /// Application that owns the process
        application: String,
        /// Application process name
        process: String,
    },

    /// The report could not be attached to the pipeline run
    #[error("Failed to attach deployment report: {0}")]
    Report(String),
}

impl DeployError {
    /// Wrap any remote failure as a [`DeployError::RemoteInvocation`]
    pub fn remote(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::RemoteInvocation(Box::new(err))
    }

    /// Whether the remote side effect may already have been committed
    pub fn after_remote_effect(&self) -> bool {
        matches!(
            self,
            Self::RemoteInvocation(_) | Self::Correlation { .. } | Self::Report(_)
        )
    }
}
