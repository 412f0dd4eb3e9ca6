/// Core error type for the gatekeeper.
///
/// Adapter crates map their transport-specific errors into this type so the
/// poll loop can log failures consistently (remote-reported vs unreachable).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// The remote API answered but reported `ok: false`; carries the
    /// API-provided description.
    #[error("api error: {0}")]
    Api(String),

    /// The remote API could not be reached at all.
    #[error("transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, Error>;
