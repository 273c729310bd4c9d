//! Convert PEM-encoded private keys and certificates into
//! password-protected Java keystore (JKS/JCEKS) files.
//!
//! The pipeline is linear: decode PEM inputs, assemble a single
//! private-key entry with its certificate chain, and serialize it into
//! a keystore container under a user-supplied password. Secret material
//! (passwords and key bytes) is zeroed on every exit path.
//!
//! ## Example
//!
//! ```no_run
//! use pem2keystore::Session;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), pem2keystore::Error> {
//! let mut session = Session::new();
//! session.read_certificate(Path::new("cert.pem"))?;
//! session.read_private_key(Path::new("key.pem"))?;
//!
//! let mut password = b"changeit".to_vec();
//! session.build_and_write(Path::new("keystore.jks"), &mut password)?;
//! // `password` is zeroed at this point.
//! # Ok(())
//! # }
//! ```

pub mod entropy;
pub mod entry;
pub mod error;
pub mod keystore;
pub mod pemfile;
pub mod secret;
pub mod session;
pub mod store;

pub use entropy::{EntropySource, FixedEntropy, SystemEntropy};
pub use entry::{Certificate, EntryBuilder, KeystoreEntry};
pub use error::{Error, Result};
pub use keystore::Format;
pub use secret::{with_secret, SecretBytes};
pub use session::{Session, ENTRY_ALIAS};
