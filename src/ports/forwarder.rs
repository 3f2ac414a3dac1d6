use async_trait::async_trait;
use thiserror::Error;

use crate::core::gateway::{RequestDescriptor, ResponseDescriptor};

/// Custom error type for forwarding operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ForwardError {
    /// Error when the named upstream is not configured
    #[error("Unknown upstream: {0}")]
    UnknownUpstream(String),

    /// Error when the connection to the upstream fails
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error when the upstream does not answer in time
    #[error("Timeout error after {0} ms")]
    Timeout(u64),
}

/// Result type alias for forwarding operations
pub type ForwardResult<T> = Result<T, ForwardError>;

/// Forwarder defines the port (interface) for dispatching a matched
/// request to a named upstream.
#[async_trait]
pub trait Forwarder: Send + Sync + 'static {
    /// Forward a request to the named upstream
    ///
    /// # Arguments
    /// * `upstream` - The configured upstream name to resolve
    /// * `request` - The request descriptor to dispatch
    ///
    /// # Returns
    /// A future that resolves to the upstream's response or an error
    async fn forward(
        &self,
        upstream: &str,
        request: &RequestDescriptor,
    ) -> ForwardResult<ResponseDescriptor>;
}
