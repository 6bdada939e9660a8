//! Error types for function resolution and execution.

/// Error raised while resolving or executing a function.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FunctionError {
    /// No function registered under the requested name.
    #[error("function [{0}] not found")]
    NotFound(String),

    /// Wrong number of parameters for the function.
    #[error("invalid parameter count, {expected} expected {provided} provided")]
    ParameterCount { expected: usize, provided: usize },

    /// Too few parameters for a variadic function.
    #[error("invalid parameter count, at least {expected} expected {provided} provided")]
    ParameterCountAtLeast { expected: usize, provided: usize },

    /// A parameter that must be an integer did not parse as one.
    #[error("invalid integer parameter [{value}]")]
    InvalidInteger {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// An empty `[min, max]` interval.
    #[error("max [{max}] must be bigger than min [{min}]")]
    InvalidRange { min: i64, max: i64 },

    /// A negative generated-string length.
    #[error("invalid length [{value}]")]
    InvalidLength { value: String },

    /// A generated-string length above the allowed maximum.
    #[error("provided length {provided} exceeds maximum length of {max} characters")]
    LengthLimit { provided: usize, max: usize },

    /// RSA key generation failed.
    #[error("RSA key generation failed")]
    Rsa(#[from] rsa::Error),

    /// Private key PEM encoding failed.
    #[error("private key encoding failed")]
    Pkcs8(#[from] rsa::pkcs8::Error),

    /// Public key PEM encoding failed.
    #[error("public key encoding failed")]
    Spki(#[from] rsa::pkcs8::spki::Error),
}
