//! Writing keystore entries to disk.
//!
//! Format selection happens before any file is created, and a failed
//! write never leaves a partial output file behind.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::entropy::{EntropySource, SystemEntropy};
use crate::entry::KeystoreEntry;
use crate::error::{Error, Result};
use crate::keystore::{self, Format};

/// Serialize an entry into keystore container bytes using the system
/// entropy source.
pub fn serialize(entry: &KeystoreEntry, password: &[u8], format: Format) -> Result<Vec<u8>> {
    serialize_with_entropy(entry, password, format, &mut SystemEntropy)
}

/// Serialize an entry with an explicit entropy source.
///
/// Passing a fixed source makes the output reproducible; see
/// [`crate::entropy::FixedEntropy`] for the caveats.
pub fn serialize_with_entropy(
    entry: &KeystoreEntry,
    password: &[u8],
    format: Format,
    entropy: &mut dyn EntropySource,
) -> Result<Vec<u8>> {
    keystore::marshal(entry, password, format, entropy)
}

/// Serialize an entry and write it to `path`, with the format selected
/// by the path's extension.
///
/// The extension is checked before anything touches the filesystem, so
/// an unsupported extension never creates a file. If the write itself
/// fails the partial output is removed.
pub fn write_to_file(entry: &KeystoreEntry, password: &[u8], path: &Path) -> Result<()> {
    write_to_file_with_entropy(entry, password, path, &mut SystemEntropy)
}

/// [`write_to_file`] with an explicit entropy source.
pub fn write_to_file_with_entropy(
    entry: &KeystoreEntry,
    password: &[u8],
    path: &Path,
    entropy: &mut dyn EntropySource,
) -> Result<()> {
    let format = Format::from_path(path)?;
    let bytes = serialize_with_entropy(entry, password, format, entropy)?;

    debug!("writing {} byte {} keystore", bytes.len(), format);

    if let Err(e) = fs::write(path, &bytes) {
        // Do not leave a half-written keystore in place.
        let _ = fs::remove_file(path);
        return Err(Error::io(path, e));
    }

    info!("wrote {} keystore to {}", format, path.display());
    Ok(())
}
