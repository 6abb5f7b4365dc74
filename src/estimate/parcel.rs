// src/estimate/parcel.rs

use sha2::{Digest, Sha256};

/// `width` decimal digits derived from `input`, zero-padded.
///
/// Takes the first 8 bytes of the SHA-256 digest of the UTF-8 input as a
/// big-endian `u64` and reduces it modulo `10^width`, so the result is the same
/// on every run and every platform.
pub fn stable_digits(input: &str, width: u32) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);

    let n = u64::from_be_bytes(head) % 10u64.pow(width);
    format!("{n:0width$}", width = width as usize)
}

/// Placeholder assessor parcel number in the `PPAA-CCC-III` layout:
/// county prefix, then digits from the street address, city and record id.
pub fn synthesize_apn(prefix: &str, street: &str, city: &str, record_id: &str) -> String {
    format!(
        "{prefix}{}-{}-{}",
        stable_digits(street, 2),
        stable_digits(city, 3),
        stable_digits(record_id, 3)
    )
}
