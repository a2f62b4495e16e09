//! Error types for the relying-party protocol.

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while verifying an assertion or looking up a profile.
///
/// Every verification check is a hard gate: the first failing check
/// returns immediately and nothing after it runs. None of these are
/// retried here, and a failed verification must never be treated as an
/// authenticated identity.
#[derive(Debug, Error)]
pub enum Error {
    /// The assertion mode is absent or not the positive-assertion
    /// literal `id_res`.
    #[error("assertion mode must equal \"id_res\"")]
    UnknownMode,

    /// The `openid.return_to` echoed by the provider does not match the
    /// return url of the current request.
    #[error("the return_to url must match the url of the current request")]
    ReturnUrlMismatch,

    /// The verification response does not open with the expected
    /// OpenID 2.0 namespace line.
    #[error("wrong ns in the verification response")]
    WrongNamespace,

    /// The provider rejected the assertion: bad signature, expired
    /// association handle, or replay.
    #[error("the provider was unable to validate the assertion")]
    ValidationFailed,

    /// The claimed identity url is outside the Steam identity namespace.
    #[error("invalid steam id pattern")]
    InvalidIdPattern,

    /// Network, timeout, or body-read failure talking to the provider.
    #[error("transport failure talking to the provider: {0}")]
    Transport(#[from] reqwest::Error),

    /// The profile lookup returned an empty player list.
    #[error("no player found for the given steam id")]
    PlayerNotFound,
}
