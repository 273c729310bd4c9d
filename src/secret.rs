//! Scoped handling of secret bytes.
//!
//! Every password or key buffer flows through either [`with_secret`] or
//! the zero-on-drop [`SecretBytes`] alias, so secret material never
//! outlives its use.

use zeroize::{Zeroize, Zeroizing};

/// Owned secret material, overwritten with zeros when dropped.
pub type SecretBytes = Zeroizing<Vec<u8>>;

struct ZeroizeGuard<'a>(&'a mut [u8]);

impl Drop for ZeroizeGuard<'_> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Run `f` with access to `secret`, then overwrite the buffer with
/// zeros before returning.
///
/// The buffer is cleared on every exit path, including when `f`
/// unwinds.
pub fn with_secret<R>(secret: &mut [u8], f: impl FnOnce(&[u8]) -> R) -> R {
    let guard = ZeroizeGuard(secret);
    f(&*guard.0)
}
