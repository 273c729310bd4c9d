//! One interactive conversion session.
//!
//! A session holds the single entry-under-construction: the shell feeds
//! it file paths in whatever order the user picks them, possibly
//! overwriting earlier picks, and finally asks for the keystore to be
//! written.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use der::Decode;
use log::debug;

use crate::entropy::{EntropySource, SystemEntropy};
use crate::entry::{Certificate, EntryBuilder};
use crate::error::{Error, Result};
use crate::pemfile::{self, CERTIFICATE_LABEL, PRIVATE_KEY_LABEL};
use crate::secret::with_secret;
use crate::store;

/// Alias under which the private-key entry is stored. Fixed: this is a
/// single-entry workflow and the alias is not user-facing.
pub const ENTRY_ALIAS: &str = "pk";

/// Assembles one private-key entry from user-selected files and writes
/// it out as a keystore.
pub struct Session {
    builder: EntryBuilder,
    creation_time: SystemTime,
    entropy: Box<dyn EntropySource>,
}

impl Session {
    /// A new session using the system entropy source. The entry's
    /// creation time is fixed from this moment.
    pub fn new() -> Self {
        Self::with_entropy(Box::new(SystemEntropy))
    }

    /// A new session with an explicit entropy source, for reproducible
    /// output.
    pub fn with_entropy(entropy: Box<dyn EntropySource>) -> Self {
        Self {
            builder: EntryBuilder::new(),
            creation_time: SystemTime::now(),
            entropy,
        }
    }

    /// Read a PEM certificate file and make it the entry's chain,
    /// replacing any previous selection.
    ///
    /// The first PEM block must be labeled `CERTIFICATE` and its content
    /// must parse as X.509 DER.
    pub fn read_certificate(&mut self, path: &Path) -> Result<()> {
        debug!("reading certificate from {}", path.display());

        let data = fs::read(path).map_err(|e| Error::io(path, e))?;
        let der = pemfile::decode_labeled(&data, CERTIFICATE_LABEL)?;

        x509_cert::Certificate::from_der(&der)
            .map_err(|e| Error::InvalidCertificate(e.to_string()))?;

        self.builder
            .set_certificate_chain(vec![Certificate::x509(der)]);
        Ok(())
    }

    /// Read a PEM private key file and make it the entry's key,
    /// replacing any previous selection.
    ///
    /// The first PEM block must be labeled exactly `PRIVATE KEY`.
    pub fn read_private_key(&mut self, path: &Path) -> Result<()> {
        debug!("reading private key from {}", path.display());

        let data = fs::read(path).map_err(|e| Error::io(path, e))?;
        let key = pemfile::decode_labeled(&data, PRIVATE_KEY_LABEL)?;

        self.builder.set_private_key(key);
        Ok(())
    }

    /// True once both a private key and a certificate have been read.
    pub fn is_complete(&self) -> bool {
        self.builder.is_complete()
    }

    /// Finalize the entry and write it to `path` in the format named by
    /// the path's extension.
    ///
    /// The password buffer is zeroed before this returns, on every exit
    /// path. Fails with [`Error::IncompleteEntry`] if either input is
    /// still missing, and with [`Error::UnsupportedFormat`] before
    /// creating any file if the extension is unknown.
    pub fn build_and_write(&mut self, path: &Path, password: &mut [u8]) -> Result<()> {
        let builder = &self.builder;
        let creation_time = self.creation_time;
        let entropy = self.entropy.as_mut();

        with_secret(password, |pw| {
            let entry = builder.to_entry(ENTRY_ALIAS, creation_time)?;
            store::write_to_file_with_entropy(&entry, pw, path, entropy)
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
