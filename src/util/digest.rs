use sha2::{Digest, Sha256};

/// Width in bytes of the identity digest.
pub const DIGEST_LEN: usize = 16;

/// Computes a 128-bit digest of `data` (SHA-256 truncated to its first 16 bytes).
pub fn digest128(data: impl AsRef<[u8]>) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(data.as_ref());
    let result = hasher.finalize();
    let mut buf = [0u8; DIGEST_LEN];
    buf.copy_from_slice(&result[..DIGEST_LEN]);
    buf
}

/// Lowercase hex rendering of [`digest128`], always `2 * DIGEST_LEN` characters long.
pub fn digest128_hex(data: impl AsRef<[u8]>) -> String {
    let digest = digest128(data);
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Returns `true` when `value` looks like an output of [`digest128_hex`].
#[cfg(test)]
pub(crate) fn is_digest128_hex(value: &str) -> bool {
    value.len() == DIGEST_LEN * 2 && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
