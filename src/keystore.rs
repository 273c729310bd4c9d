//! JKS/JCEKS container encoding and decoding.
//!
//! The container layout is the Sun keystore format: a magic/version
//! header, a single private-key entry (alias, creation time, protected
//! key, certificate chain), and a SHA-1 integrity trailer keyed on the
//! store password. Private keys are protected with Sun's proprietary
//! keystream scheme and wrapped in a DER `EncryptedPrivateKeyInfo`.
//!
//! The decoder exists for verification and tests; there is no import
//! workflow built on top of it.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use der::asn1::{Null, ObjectIdentifier, OctetStringRef};
use der::{Decode, Encode, Sequence};
use digest::Digest;
use sha1::Sha1;
use zeroize::Zeroizing;

use crate::entropy::EntropySource;
use crate::entry::{Certificate, KeystoreEntry};
use crate::error::{Error, Result};
use crate::secret::SecretBytes;

const MAGIC_JKS: u32 = 0xFEEDFEED;
const MAGIC_JCEKS: u32 = 0xCECECECE;
const VERSION: u32 = 2;
const TAG_PRIVATE_KEY: u32 = 1;
const SALT_LEN: usize = 20;
const DIGEST_LEN: usize = 20;
const SIGNATURE_WHITENER: &[u8] = b"Mighty Aphrodite";

/// Sun proprietary key-protection algorithm OID: 1.3.6.1.4.1.42.2.17.1.1
const SUN_KEY_PROTECTOR_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.42.2.17.1.1");

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct AlgorithmIdentifier {
    algorithm: ObjectIdentifier,
    parameters: Null,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct EncryptedPrivateKeyInfo<'a> {
    algorithm: AlgorithmIdentifier,
    encrypted_data: OctetStringRef<'a>,
}

/// Keystore container format, selected by the output file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Jks,
    Jceks,
}

impl Format {
    /// Resolve the format from a path's extension, case-insensitively.
    ///
    /// Anything other than `.jks` or `.jceks` fails with
    /// [`Error::UnsupportedFormat`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext.eq_ignore_ascii_case("jks") {
            Ok(Format::Jks)
        } else if ext.eq_ignore_ascii_case("jceks") {
            Ok(Format::Jceks)
        } else {
            Err(Error::UnsupportedFormat(path.display().to_string()))
        }
    }

    fn magic(self) -> u32 {
        match self {
            Format::Jks => MAGIC_JKS,
            Format::Jceks => MAGIC_JCEKS,
        }
    }

    fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            MAGIC_JKS => Some(Format::Jks),
            MAGIC_JCEKS => Some(Format::Jceks),
            _ => None,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Jks => write!(f, "JKS"),
            Format::Jceks => write!(f, "JCEKS"),
        }
    }
}

/// Serialize a single private-key entry into a keystore container.
///
/// Salt bytes for key protection are drawn from `entropy`; with a fixed
/// source the output is byte-for-byte reproducible for identical inputs.
pub fn marshal(
    entry: &KeystoreEntry,
    password: &[u8],
    format: Format,
    entropy: &mut dyn EntropySource,
) -> Result<Vec<u8>> {
    validate_entry(entry)?;

    let millis = epoch_millis(entry.creation_time())?;

    let mut buf: Vec<u8> = Vec::new();
    write_u32(&mut buf, format.magic());
    write_u32(&mut buf, VERSION);
    write_u32(&mut buf, 1);

    write_u32(&mut buf, TAG_PRIVATE_KEY);
    write_utf(&mut buf, entry.alias())?;
    write_i64(&mut buf, millis);

    let protected = protect_key(entry.private_key(), password, entropy);
    let encapsulated = encapsulate(&protected)?;
    write_byte_array(&mut buf, &encapsulated)?;

    write_u32(&mut buf, entry.certificate_chain().len() as u32);
    for cert in entry.certificate_chain() {
        write_utf(&mut buf, &cert.cert_type)?;
        write_byte_array(&mut buf, &cert.content)?;
    }

    let digest = integrity_digest(password, &buf);
    buf.extend_from_slice(&digest);

    Ok(buf)
}

/// Read a keystore container back, verifying its integrity trailer and
/// unprotecting the private key.
///
/// Accepts both container magics and requires exactly one private-key
/// entry, matching what [`marshal`] produces.
pub fn unmarshal(data: &[u8], password: &[u8]) -> Result<(Format, KeystoreEntry)> {
    if data.len() < DIGEST_LEN + 12 {
        return Err(Error::Encoding("keystore data too short".to_string()));
    }

    let (body, stored_digest) = data.split_at(data.len() - DIGEST_LEN);
    let computed = integrity_digest(password, body);
    if computed[..] != stored_digest[..] {
        return Err(Error::Encoding(
            "integrity check failed (wrong password?)".to_string(),
        ));
    }

    let mut cursor = body;

    let magic = read_u32(&mut cursor)?;
    let format = Format::from_magic(magic)
        .ok_or_else(|| Error::Encoding("unrecognized keystore magic".to_string()))?;

    let version = read_u32(&mut cursor)?;
    if version != VERSION {
        return Err(Error::Encoding(format!(
            "unsupported keystore version: {}",
            version
        )));
    }

    let count = read_u32(&mut cursor)?;
    if count != 1 {
        return Err(Error::Encoding(format!(
            "expected exactly one keystore entry, found {}",
            count
        )));
    }

    let tag = read_u32(&mut cursor)?;
    if tag != TAG_PRIVATE_KEY {
        return Err(Error::Encoding(format!("unexpected entry tag: {}", tag)));
    }

    let alias = read_utf(&mut cursor)?;
    let millis = read_i64(&mut cursor)?;
    if millis < 0 {
        return Err(Error::Encoding("negative entry timestamp".to_string()));
    }
    let creation_time = UNIX_EPOCH + Duration::from_millis(millis as u64);

    let encapsulated = read_byte_array(&mut cursor)?;
    let protected = decapsulate(&encapsulated)?;
    let private_key = unprotect_key(&protected, password)?;

    let chain_len = read_u32(&mut cursor)?;
    let mut chain = Vec::with_capacity(chain_len as usize);
    for _ in 0..chain_len {
        let cert_type = read_utf(&mut cursor)?;
        let content = read_byte_array(&mut cursor)?;
        chain.push(Certificate { cert_type, content });
    }

    let entry = KeystoreEntry::from_parts(alias, creation_time, private_key, chain);
    Ok((format, entry))
}

fn validate_entry(entry: &KeystoreEntry) -> Result<()> {
    if entry.alias().is_empty() {
        return Err(Error::Encoding("alias cannot be empty".to_string()));
    }
    if entry.private_key().is_empty() {
        return Err(Error::Encoding("private key cannot be empty".to_string()));
    }
    if entry.certificate_chain().is_empty() {
        return Err(Error::Encoding(
            "certificate chain cannot be empty".to_string(),
        ));
    }
    for (i, cert) in entry.certificate_chain().iter().enumerate() {
        if cert.cert_type.is_empty() {
            return Err(Error::Encoding(format!("certificate {}: empty type", i)));
        }
        if cert.content.is_empty() {
            return Err(Error::Encoding(format!("certificate {}: empty content", i)));
        }
    }
    Ok(())
}

fn epoch_millis(time: SystemTime) -> Result<i64> {
    let elapsed = time
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Encoding(format!("creation time before epoch: {}", e)))?;
    Ok(elapsed.as_millis() as i64)
}

// --- Binary helpers (big-endian) ---

fn write_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn write_i64(buf: &mut Vec<u8>, v: i64) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn write_utf(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    if s.len() > u16::MAX as usize {
        return Err(Error::Encoding(format!(
            "string too long: {} bytes",
            s.len()
        )));
    }
    buf.extend_from_slice(&(s.len() as u16).to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

fn write_byte_array(buf: &mut Vec<u8>, data: &[u8]) -> Result<()> {
    if data.len() > u32::MAX as usize {
        return Err(Error::Encoding(format!(
            "field too long: {} bytes",
            data.len()
        )));
    }
    buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
    buf.extend_from_slice(data);
    Ok(())
}

fn take<'a>(cursor: &mut &'a [u8], n: usize) -> Result<&'a [u8]> {
    if cursor.len() < n {
        return Err(Error::Encoding("truncated keystore data".to_string()));
    }
    let (head, rest) = cursor.split_at(n);
    *cursor = rest;
    Ok(head)
}

fn read_u32(cursor: &mut &[u8]) -> Result<u32> {
    let bytes = take(cursor, 4)?;
    Ok(u32::from_be_bytes(bytes.try_into().expect("4 bytes")))
}

fn read_i64(cursor: &mut &[u8]) -> Result<i64> {
    let bytes = take(cursor, 8)?;
    Ok(i64::from_be_bytes(bytes.try_into().expect("8 bytes")))
}

fn read_utf(cursor: &mut &[u8]) -> Result<String> {
    let len_bytes = take(cursor, 2)?;
    let len = u16::from_be_bytes(len_bytes.try_into().expect("2 bytes")) as usize;
    let bytes = take(cursor, len)?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::Encoding(format!("invalid UTF-8 in keystore: {}", e)))
}

fn read_byte_array(cursor: &mut &[u8]) -> Result<Vec<u8>> {
    let len = read_u32(cursor)? as usize;
    Ok(take(cursor, len)?.to_vec())
}

// --- Password transform ---

/// Interleave a zero byte before each password byte, the transform the
/// reference keystore library applies before hashing. For ASCII
/// passwords this coincides with the JVM's UTF-16BE conversion.
fn transformed_password(password: &[u8]) -> SecretBytes {
    let mut result = Vec::with_capacity(password.len() * 2);
    for &b in password {
        result.push(0);
        result.push(b);
    }
    Zeroizing::new(result)
}

// --- Integrity trailer ---

fn integrity_digest(password: &[u8], body: &[u8]) -> [u8; DIGEST_LEN] {
    let transformed = transformed_password(password);
    let mut hasher = Sha1::new();
    hasher.update(&*transformed);
    hasher.update(SIGNATURE_WHITENER);
    hasher.update(body);
    hasher.finalize().into()
}

// --- Sun key protector ---

fn protect_key(plain: &[u8], password: &[u8], entropy: &mut dyn EntropySource) -> Vec<u8> {
    let transformed = transformed_password(password);

    let mut salt = [0u8; SALT_LEN];
    entropy.fill(&mut salt);

    let encrypted = keystream_xor(&transformed, &salt, plain);

    let mut check = Sha1::new();
    check.update(&*transformed);
    check.update(plain);
    let check = check.finalize();

    let mut out = Vec::with_capacity(SALT_LEN + encrypted.len() + DIGEST_LEN);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&encrypted);
    out.extend_from_slice(&check);
    out
}

fn unprotect_key(data: &[u8], password: &[u8]) -> Result<SecretBytes> {
    if data.len() < SALT_LEN + DIGEST_LEN {
        return Err(Error::Encoding("protected key data too short".to_string()));
    }

    let transformed = transformed_password(password);
    let salt = &data[..SALT_LEN];
    let encrypted = &data[SALT_LEN..data.len() - DIGEST_LEN];
    let stored_check = &data[data.len() - DIGEST_LEN..];

    let plain = Zeroizing::new(keystream_xor(&transformed, salt, encrypted));

    let mut check = Sha1::new();
    check.update(&*transformed);
    check.update(&*plain);
    let computed = check.finalize();

    if computed[..] != stored_check[..] {
        return Err(Error::Encoding(
            "private key check failed (wrong password?)".to_string(),
        ));
    }

    Ok(plain)
}

/// XOR the input against an iterated-SHA-1 keystream seeded with the
/// salt. Symmetric, so it both protects and unprotects.
fn keystream_xor(transformed_password: &[u8], salt: &[u8], input: &[u8]) -> Vec<u8> {
    let mut output = vec![0u8; input.len()];
    let mut round = salt.to_vec();
    let mut pos = 0;

    while pos < input.len() {
        let mut hasher = Sha1::new();
        hasher.update(transformed_password);
        hasher.update(&round);
        round = hasher.finalize().to_vec();

        for &keystream_byte in round.iter() {
            if pos >= input.len() {
                break;
            }
            output[pos] = input[pos] ^ keystream_byte;
            pos += 1;
        }
    }

    output
}

// --- EncryptedPrivateKeyInfo encapsulation ---

fn encapsulate(protected: &[u8]) -> Result<Vec<u8>> {
    let octet_string =
        OctetStringRef::new(protected).map_err(|e| Error::Encoding(e.to_string()))?;
    let epki = EncryptedPrivateKeyInfo {
        algorithm: AlgorithmIdentifier {
            algorithm: SUN_KEY_PROTECTOR_OID,
            parameters: Null,
        },
        encrypted_data: octet_string,
    };
    epki.to_der().map_err(|e| Error::Encoding(e.to_string()))
}

fn decapsulate(data: &[u8]) -> Result<Vec<u8>> {
    let epki =
        EncryptedPrivateKeyInfo::from_der(data).map_err(|e| Error::Encoding(e.to_string()))?;

    if epki.algorithm.algorithm != SUN_KEY_PROTECTOR_OID {
        return Err(Error::Encoding(
            "unsupported key protection algorithm".to_string(),
        ));
    }

    Ok(epki.encrypted_data.as_bytes().to_vec())
}
