//! Deployment client for the Vercel static-hosting API.
//!
//! One outbound call does all the real work: the page content plus a
//! single-page hosting config are submitted as in-memory files and the
//! platform answers with the public URL.

mod vercel;

use async_trait::async_trait;
use thiserror::Error;

pub use vercel::{HttpVercelApi, sanitize_project_name};

/// A deployment request: the raw page content and the name the user asked for.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub desired_name: String,
    pub content: String,
}

/// Outcome of a successful deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct Deployment {
    /// Name actually submitted, after sanitization.
    pub name: String,
    /// Public URL of the deployment.
    pub url: String,
    /// Opaque deployment id assigned by the platform.
    pub deployment_id: String,
}

#[derive(Debug, Error)]
pub enum DeployError {
    /// The platform refused the name because it is taken or reserved.
    #[error("the name \"{name}\" is not available: {message}")]
    NameConflict { name: String, message: String },
    /// The platform rejected the deployment for any other reason.
    #[error("deployment rejected: {message}")]
    Upstream { message: String },
    /// The call exceeded the configured deadline.
    #[error("the deployment request timed out")]
    Timeout,
    /// The platform could not be reached at all.
    #[error("could not reach the deployment platform")]
    Transport(#[source] reqwest::Error),
    /// A success status whose body is missing the fields we need.
    #[error("unexpected deployment response: {0}")]
    UnexpectedResponse(String),
}

impl DeployError {
    /// Metrics label for the error class.
    pub fn outcome(&self) -> &'static str {
        match self {
            DeployError::NameConflict { .. } => "conflict",
            DeployError::Upstream { .. } => "upstream",
            DeployError::Timeout => "timeout",
            DeployError::Transport(_) => "transport",
            DeployError::UnexpectedResponse(_) => "unexpected",
        }
    }
}

/// The single network dependency beyond the messaging platform. Fallible,
/// slow (seconds) and non-idempotent: retrying with the same name after a
/// partial failure may itself collide.
#[async_trait]
pub trait DeployApi: Send + Sync {
    async fn publish(&self, request: PublishRequest) -> Result<Deployment, DeployError>;
}
