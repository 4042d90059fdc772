use std::net::SocketAddr;

/// Errors while reading configuration from the environment
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid delay range: minimum {min} ms exceeds maximum {max} ms")]
    InvalidDelayRange { min: u64, max: u64 },

    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
}

/// Errors that stop the server from starting or keep it from serving
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
