use thiserror::Error;

/// Errors from endpoint registration and resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("No endpoint named \"{0}\"")]
    UnknownEndpoint(String),

    #[error("Missing required argument \"{placeholder}\" for endpoint \"{endpoint}\"")]
    MissingArgument { endpoint: String, placeholder: String },

    #[error("Invalid value {value:?} for argument \"{placeholder}\" of endpoint \"{endpoint}\"")]
    InvalidArgument {
        endpoint: String,
        placeholder: String,
        value: String,
    },

    #[error("Endpoint \"{name}\" registered twice (by {existing} and {incoming})")]
    Collision {
        name: String,
        existing: String,
        incoming: String,
    },

    #[error("Malformed endpoint template {template:?}: {reason}")]
    MalformedTemplate { template: String, reason: String },
}
