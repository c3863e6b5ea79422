use crate::format::Variant;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unrecognized hash format")]
    Unrecognized,

    #[error("malformed {variant} hash: {reason}")]
    Malformed {
        variant: Variant,
        reason: &'static str,
    },

    #[error("malformed iteration count: {0}")]
    Iterations(#[from] std::num::ParseIntError),

    #[error("malformed key encoding: {0}")]
    KeyEncoding(#[from] base64::DecodeError),

    #[error("invalid config: {0}")]
    Config(#[from] garde::Report),

    #[error(transparent)]
    Load(#[from] ratchet_fs::toml::Error),
}

impl Error {
    pub(crate) fn malformed(variant: Variant, reason: &'static str) -> Self {
        Error::Malformed { variant, reason }
    }
}
