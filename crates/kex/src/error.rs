//! Error types for the key exchange crate

use gmcrypt_algorithms::error::Error as PrimitiveError;
use gmcrypt_api::Error as ApiError;

#[cfg(feature = "std")]
use std::string::String;

/// Key exchange errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Error from an underlying primitive
    Primitive(PrimitiveError),

    /// Error from the API layer
    Api(ApiError),

    /// Peer key material is malformed or invalid
    InvalidPeerKey(&'static str),

    /// The exchange produced a degenerate result or a tag did not verify
    Authentication(&'static str),
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
            Error::InvalidPeerKey(context) => ApiError::InvalidKey {
                context,
                #[cfg(feature = "std")]
                message: String::new(),
            },
            Error::Authentication(context) => ApiError::AuthenticationFailed {
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
            Error::InvalidPeerKey(msg) => write!(f, "Invalid peer key: {}", msg),
            Error::Authentication(msg) => write!(f, "Key exchange failed: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
