//! PEM input decoding.
//!
//! Only the first block of a file is inspected; trailing blocks are
//! ignored. Labels are matched exactly, so `RSA PRIVATE KEY` or
//! `ENCRYPTED PRIVATE KEY` blocks are rejected rather than converted.

use crate::error::{Error, Result};

/// Label of an unencrypted PKCS#8 private key block.
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

/// Label of an X.509 certificate block.
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Decode the first PEM block in `input` and return its binary content.
///
/// Fails with [`Error::MalformedInput`] if no block is present and with
/// [`Error::UnexpectedBlockType`] if the block's label differs from
/// `expected_label`. The content is returned exactly as embedded, with
/// no further transformation.
pub fn decode_labeled(input: &[u8], expected_label: &'static str) -> Result<Vec<u8>> {
    let blocks = pem::parse_many(input).map_err(|_| Error::MalformedInput)?;
    let block = blocks.first().ok_or(Error::MalformedInput)?;

    if block.tag() != expected_label {
        return Err(Error::UnexpectedBlockType {
            expected: expected_label,
            actual: block.tag().to_string(),
        });
    }

    Ok(block.contents().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_block(label: &str, content: &[u8]) -> Vec<u8> {
        pem::encode(&pem::Pem::new(label, content)).into_bytes()
    }

    #[test]
    fn test_decode_private_key_block() {
        let content = vec![1, 2, 3, 4, 5];
        let input = encode_block("PRIVATE KEY", &content);
        let decoded = decode_labeled(&input, PRIVATE_KEY_LABEL).unwrap();
        assert_eq!(decoded, content);
    }

    #[test]
    fn test_decode_certificate_block() {
        let content = vec![9, 8, 7];
        let input = encode_block("CERTIFICATE", &content);
        let decoded = decode_labeled(&input, CERTIFICATE_LABEL).unwrap();
        assert_eq!(decoded, content);
    }

    #[test]
    fn test_wrong_label_is_rejected() {
        let input = encode_block("CERTIFICATE", &[1, 2, 3]);
        let result = decode_labeled(&input, PRIVATE_KEY_LABEL);
        match result {
            Err(Error::UnexpectedBlockType { expected, actual }) => {
                assert_eq!(expected, "PRIVATE KEY");
                assert_eq!(actual, "CERTIFICATE");
            }
            other => panic!("expected UnexpectedBlockType, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_key_label_is_rejected() {
        let input = encode_block("RSA PRIVATE KEY", &[1, 2, 3]);
        let result = decode_labeled(&input, PRIVATE_KEY_LABEL);
        assert!(matches!(result, Err(Error::UnexpectedBlockType { .. })));
    }

    #[test]
    fn test_no_block_is_malformed() {
        let result = decode_labeled(b"not a pem file", PRIVATE_KEY_LABEL);
        assert!(matches!(result, Err(Error::MalformedInput)));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let result = decode_labeled(b"", CERTIFICATE_LABEL);
        assert!(matches!(result, Err(Error::MalformedInput)));
    }

    #[test]
    fn test_only_first_block_is_consumed() {
        let first = encode_block("CERTIFICATE", &[1, 1, 1]);
        let second = encode_block("PRIVATE KEY", &[2, 2, 2]);
        let mut input = first;
        input.extend_from_slice(&second);

        let decoded = decode_labeled(&input, CERTIFICATE_LABEL).unwrap();
        assert_eq!(decoded, vec![1, 1, 1]);

        // The trailing PRIVATE KEY block does not satisfy a PRIVATE KEY
        // request either; only the first block counts.
        let result = decode_labeled(&input, PRIVATE_KEY_LABEL);
        assert!(matches!(result, Err(Error::UnexpectedBlockType { .. })));
    }
}
