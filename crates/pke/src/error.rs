//! Error types for the encryption crate
//!
//! Wraps primitive-layer errors and adds scheme-level failure cases, with a
//! lossless bridge into the core API error type.

use gmcrypt_algorithms::error::Error as PrimitiveError;
use gmcrypt_api::Error as ApiError;

#[cfg(feature = "std")]
use std::string::String;

/// Encryption scheme errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Error from an underlying primitive
    Primitive(PrimitiveError),

    /// Error from the API layer
    Api(ApiError),

    /// Ciphertext structure is malformed
    InvalidCiphertextFormat(&'static str),

    /// Encryption could not be completed
    EncryptionFailed(&'static str),

    /// Decryption or tag verification failed
    DecryptionFailed(&'static str),

    /// The operation is not supported by this scheme
    UnsupportedOperation(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;

impl From<PrimitiveError> for Error {
    fn from(err: PrimitiveError) -> Self {
        Error::Primitive(err)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Primitive(e) => e.into(),
            Error::Api(e) => e,
            Error::InvalidCiphertextFormat(context) => ApiError::InvalidCiphertext {
                context,
                #[cfg(feature = "std")]
                message: String::new(),
            },
            Error::EncryptionFailed(context) => ApiError::Other {
                context,
                #[cfg(feature = "std")]
                message: String::new(),
            },
            Error::DecryptionFailed(context) => ApiError::DecryptionFailed {
                context,
                #[cfg(feature = "std")]
                message: String::new(),
            },
            Error::UnsupportedOperation(context) => ApiError::InvalidParameter {
                context,
                #[cfg(feature = "std")]
                message: String::new(),
            },
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Primitive(e) => write!(f, "Primitive error: {}", e),
            Error::Api(e) => write!(f, "API error: {}", e),
            Error::InvalidCiphertextFormat(msg) => write!(f, "Invalid ciphertext: {}", msg),
            Error::EncryptionFailed(msg) => write!(f, "Encryption failed: {}", msg),
            Error::DecryptionFailed(msg) => write!(f, "Decryption failed: {}", msg),
            Error::UnsupportedOperation(msg) => write!(f, "Unsupported operation: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
