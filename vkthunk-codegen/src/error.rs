// Error types for the thunk generator.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a generation pass.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A strategy was handed a parameter shape it cannot translate
    /// (unknown type, wrong type category, unexpected pointer arity).
    /// An empty `param` means the function signature itself was rejected.
    #[error("{function}: unsupported {}: {reason}", subject(.param))]
    Unsupported {
        function: String,
        param: String,
        reason: String,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("verification failed:\n  - {}", .0.join("\n  - "))]
    Verify(Vec<String>),
}

impl CodegenError {
    pub fn unsupported(function: &str, param: &str, reason: impl Into<String>) -> Self {
        CodegenError::Unsupported {
            function: function.to_string(),
            param: param.to_string(),
            reason: reason.into(),
        }
    }
}

fn subject(param: &str) -> String {
    if param.is_empty() {
        "signature".to_string()
    } else {
        format!("parameter `{param}`")
    }
}

/// Convenience alias used throughout the generator.
pub type CodegenResult<T> = Result<T, CodegenError>;
