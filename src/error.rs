use thiserror::Error;

/// Main error type for Interflat operations
#[derive(Error, Debug)]
pub enum InterflatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Frontend error: {0}")]
    Frontend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Root interface '{declaration}' could not be resolved in the snapshot")]
    UnresolvableRoot { declaration: String },

    #[error("Cyclic inheritance detected at '{declaration}' (chain depth {depth})")]
    CyclicInheritance { declaration: String, depth: usize },

    #[error("Interface '{declaration}' declares {count} bases; only single inheritance is supported")]
    MultipleBases { declaration: String, count: usize },

    #[error("Output name '{public_name}' is produced by both '{first}' and '{second}'")]
    NameCollision {
        public_name: String,
        first: String,
        second: String,
    },

    #[error("Generation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, InterflatError>;
