// src/error.rs

use thiserror::Error;

/// Recoverable failures: reported back to the user through the response
/// callback, never propagated to the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("The model is overloaded. Please try again later.")]
    ModelOverloaded,
    #[error("The model request failed: {0}")]
    Model(String),
    #[error("{field} could not be found in the message.")]
    MissingField { field: &'static str },
    #[error("{field} contains invalid characters! It should only contain hexadecimal characters (0-9 and A-F)!")]
    InvalidHex { field: &'static str },
    #[error("{field} has an invalid length! The length should be 66 characters including the '0x' prefix!")]
    InvalidLength { field: &'static str },
    #[error("{field} is not a valid address. The value you provided is {value}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("{field} must be an integer. The value you provided is {value}")]
    NotAnInteger { field: &'static str, value: String },
    #[error("Fee outside of valid range (0 - 1_000_000). The value you provided is {0}")]
    FeeOutOfRange(i128),
    #[error("tickSpacing outside of valid range (1 - 32_767). The value you provided is {0}")]
    TickSpacingOutOfRange(i128),
    #[error("startingPrice must be a sqrtPriceX96 between 4295128739 and 1461446703485210103287273052203988822378723970341. The value you provided is {0}")]
    StartingPriceOutOfRange(String),
    #[error("Error extracting chain id.")]
    InvalidChainId,
    #[error("No matching chain found for chainId: {0}")]
    NoMatchingChain(u64),
    #[error("No provider URL configured for {0}")]
    MissingProvider(String),
    #[error("EVM_PRIVATE_KEY is not configured, so transactions cannot be signed.")]
    MissingSigner,
}

/// Failures reported by the text-generation capability.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model overloaded (HTTP 503)")]
    Overloaded,
    #[error("model API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("model transport error: {0}")]
    Transport(String),
    #[error("model returned no content")]
    EmptyResponse,
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        ModelError::Transport(e.to_string())
    }
}

impl From<ModelError> for ExtractionError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Overloaded => ExtractionError::ModelOverloaded,
            other => ExtractionError::Model(other.to_string()),
        }
    }
}

/// Fatal failures: anything a handler did not turn into a user-facing reply.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("{context}")]
    Fatal {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ActionError {
    pub fn fatal(context: &'static str, source: anyhow::Error) -> Self {
        ActionError::Fatal { context, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overloaded_model_maps_to_retryable_message() {
        let err: ExtractionError = ModelError::Overloaded.into();
        assert_eq!(err.to_string(), "The model is overloaded. Please try again later.");
    }

    #[test]
    fn other_model_errors_keep_their_detail() {
        let err: ExtractionError = ModelError::Api { status: 401, body: "bad key".into() }.into();
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("bad key"));
    }

    #[test]
    fn fatal_error_displays_its_context() {
        let err = ActionError::fatal("Error fetching pool liquidity.", anyhow::anyhow!("rpc down"));
        assert_eq!(err.to_string(), "Error fetching pool liquidity.");
        assert_eq!(std::error::Error::source(&err).unwrap().to_string(), "rpc down");
    }
}
