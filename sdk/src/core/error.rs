//! SDK error types

use std::time::Duration;

use thiserror::Error;

use crate::upload::UploadError;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Request failed boundary validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage collaborator failed after all attempts
    #[error("Upload failed after {attempts} attempt(s): {source}")]
    Upload {
        attempts: u32,
        #[source]
        source: UploadError,
    },

    /// Ledger RPC call failed (blockhash or rent lookup)
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Message compilation, signing or serialization failed
    #[error("Compilation failed: {0}")]
    Compilation(String),

    /// Instruction sequence violates mint/authority ordering
    #[error("Authority ordering violated: {0}")]
    AuthorityOrdering(String),

    /// The end-to-end request deadline elapsed
    #[error("Deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

/// Coarse classification used by callers to pick retry and status behaviour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    UploadFailure,
    CompilationFailure,
    AuthorityOrderingFailure,
    Timeout,
}

impl SdkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SdkError::InvalidInput(_) => ErrorKind::InvalidInput,
            SdkError::Upload { .. } => ErrorKind::UploadFailure,
            SdkError::Ledger(_) | SdkError::Compilation(_) => ErrorKind::CompilationFailure,
            SdkError::AuthorityOrdering(_) => ErrorKind::AuthorityOrderingFailure,
            SdkError::DeadlineExceeded(_) => ErrorKind::Timeout,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SdkError::InvalidInput(msg.into())
    }
}

impl From<solana_client::client_error::ClientError> for SdkError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        SdkError::Ledger(err.to_string())
    }
}

impl From<solana_sdk::message::CompileError> for SdkError {
    fn from(err: solana_sdk::message::CompileError) -> Self {
        SdkError::Compilation(err.to_string())
    }
}

impl From<solana_program::program_error::ProgramError> for SdkError {
    fn from(err: solana_program::program_error::ProgramError) -> Self {
        SdkError::Compilation(err.to_string())
    }
}

impl From<bincode::Error> for SdkError {
    fn from(err: bincode::Error) -> Self {
        SdkError::Compilation(format!("Failed to serialize transaction: {}", err))
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
