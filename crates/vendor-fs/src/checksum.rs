//! Content fingerprints
//!
//! Every fingerprint in git-vendor (lock entries, the checksum cache and
//! extracted regions) has the form `sha256:<64 lowercase hex digits>`.

use sha2::{Digest, Sha256};

/// Prefix shared by all fingerprints.
pub const PREFIX: &str = "sha256:";

/// Fingerprint raw bytes.
pub fn compute_bytes_checksum(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    let mut out = String::with_capacity(PREFIX.len() + digest.len() * 2);
    out.push_str(PREFIX);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Whether `value` is a well-formed fingerprint.
pub fn is_valid_checksum(value: &str) -> bool {
    let Some(hex) = value.strip_prefix(PREFIX) else {
        return false;
    };
    hex.len() == 64 && hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
