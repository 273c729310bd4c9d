//! The private-key entry and its builder.

use std::time::SystemTime;

use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::secret::SecretBytes;

/// Certificate type tag stored alongside each chain element.
pub const CERTIFICATE_TYPE: &str = "X509";

/// A certificate in a keystore entry's chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Certificate type (always `X509` for chains built here).
    pub cert_type: String,

    /// DER-encoded certificate content.
    pub content: Vec<u8>,
}

impl Certificate {
    /// An X.509 certificate holding the given DER content.
    pub fn x509(content: Vec<u8>) -> Self {
        Self {
            cert_type: CERTIFICATE_TYPE.to_string(),
            content,
        }
    }
}

/// An immutable private-key entry, ready for serialization.
///
/// Produced by [`EntryBuilder::to_entry`]; the key buffer is zeroed
/// when the entry is dropped.
pub struct KeystoreEntry {
    alias: String,
    creation_time: SystemTime,
    private_key: SecretBytes,
    certificate_chain: Vec<Certificate>,
}

impl KeystoreEntry {
    pub(crate) fn from_parts(
        alias: String,
        creation_time: SystemTime,
        private_key: SecretBytes,
        certificate_chain: Vec<Certificate>,
    ) -> Self {
        Self {
            alias,
            creation_time,
            private_key,
            certificate_chain,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn creation_time(&self) -> SystemTime {
        self.creation_time
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    pub fn certificate_chain(&self) -> &[Certificate] {
        &self.certificate_chain
    }
}

/// Assembles a private-key entry from inputs that may arrive in any
/// order.
///
/// Each setter replaces whatever was held before, so the user can
/// reopen a file picker and overwrite a prior choice. Nothing is
/// committed until [`EntryBuilder::to_entry`] produces a snapshot.
#[derive(Default)]
pub struct EntryBuilder {
    private_key: Option<SecretBytes>,
    certificate_chain: Vec<Certificate>,
}

impl EntryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held certificate chain. Chain contents are not
    /// validated here; order is preserved as supplied.
    pub fn set_certificate_chain(&mut self, chain: Vec<Certificate>) {
        self.certificate_chain = chain;
    }

    /// Replace the held private key. The previous buffer, if any, is
    /// zeroed when it is dropped.
    pub fn set_private_key(&mut self, material: Vec<u8>) {
        self.private_key = Some(Zeroizing::new(material));
    }

    /// True once a non-empty private key and a non-empty chain are set.
    pub fn is_complete(&self) -> bool {
        self.private_key
            .as_ref()
            .is_some_and(|key| !key.is_empty())
            && !self.certificate_chain.is_empty()
    }

    /// Produce an immutable snapshot of the entry.
    ///
    /// Fails with [`Error::IncompleteEntry`] unless both the private
    /// key and at least one certificate have been supplied. The builder
    /// keeps its state, so the caller may continue replacing inputs.
    pub fn to_entry(&self, alias: &str, creation_time: SystemTime) -> Result<KeystoreEntry> {
        if !self.is_complete() {
            return Err(Error::IncompleteEntry);
        }

        let key = self
            .private_key
            .as_ref()
            .expect("is_complete checked the key");

        Ok(KeystoreEntry::from_parts(
            alias.to_string(),
            creation_time,
            key.clone(),
            self.certificate_chain.clone(),
        ))
    }
}
