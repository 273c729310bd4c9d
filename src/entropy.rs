//! Entropy sources for keystore salt generation.

use rand::RngCore;

/// Source of the salt bytes consumed during private-key protection.
pub trait EntropySource {
    /// Fill `buf` entirely.
    fn fill(&mut self, buf: &mut [u8]);
}

/// Cryptographically secure source backed by the process RNG. This is
/// the default for all serialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEntropy;

impl EntropySource for SystemEntropy {
    fn fill(&mut self, buf: &mut [u8]) {
        rand::thread_rng().fill_bytes(buf);
    }
}

/// Source that emits the same byte for every position, making keystore
/// output byte-for-byte reproducible across runs.
///
/// A keystore produced this way offers materially weaker protection
/// than one built with [`SystemEntropy`]. Use it only for golden-file
/// comparisons, and only by explicit opt-in.
#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy(pub u8);

impl Default for FixedEntropy {
    fn default() -> Self {
        FixedEntropy(1)
    }
}

impl EntropySource for FixedEntropy {
    fn fill(&mut self, buf: &mut [u8]) {
        buf.fill(self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_entropy_default_is_ones() {
        let mut buf = [0u8; 20];
        FixedEntropy::default().fill(&mut buf);
        assert!(buf.iter().all(|&b| b == 1));
    }

    #[test]
    fn test_fixed_entropy_custom_byte() {
        let mut buf = [0u8; 8];
        FixedEntropy(0x42).fill(&mut buf);
        assert_eq!(buf, [0x42; 8]);
    }

    #[test]
    fn test_system_entropy_varies() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        let mut rng = SystemEntropy;
        rng.fill(&mut a);
        rng.fill(&mut b);
        assert_ne!(a, b);
    }
}
