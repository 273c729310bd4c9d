use std::io;
use std::path::PathBuf;

/// Error type for the PEM-to-keystore pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input contained no decodable PEM block.
    #[error("no PEM block found in input")]
    MalformedInput,

    /// The first PEM block carried a different label than the operation
    /// requires.
    #[error("expected a {expected} block, found {actual}")]
    UnexpectedBlockType {
        expected: &'static str,
        actual: String,
    },

    /// The certificate content did not parse as X.509 DER.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// Serialization was requested before both a private key and a
    /// certificate chain were supplied.
    #[error("entry is incomplete: a private key and at least one certificate are required")]
    IncompleteEntry,

    /// The output path's extension names no known keystore format.
    #[error("unsupported keystore extension for '{0}': expected .jks or .jceks")]
    UnsupportedFormat(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The container codec rejected the entry, the password, or the data
    /// being read back.
    #[error("keystore encoding failed: {0}")]
    Encoding(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
