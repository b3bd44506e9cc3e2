//! Errors returned by proof construction, verification and decoding.
use curve25519_dalek::scalar::Scalar;
use thiserror::Error;

/// Every way a proof computation or verification can fail. A verifier
/// reporting any of these has rejected the proof.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    #[error("set is too small")]
    SetIsTooSmall,
    #[error("set is too large")]
    SetIsTooLarge,
    #[error("index out of bounds")]
    IndexOutOfBounds,
    #[error("invalid proof parameters")]
    InvalidParameters,
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("invalid proof size")]
    InvalidProofSize,
    #[error("invalid scalar: {0:?}")]
    InvalidScalar(Scalar),
    #[error("invalid encoding")]
    InvalidEncoding,
    #[error("could not sample a group element")]
    SamplingFailed,
    /// A proof element was the identity, or a response was zero.
    #[error("verification error")]
    VerificationError,
    /// One of the verification equations does not hold.
    #[error("verification failed")]
    VerificationFailed,
}

pub type ProofResult<T> = core::result::Result<T, ProofError>;
