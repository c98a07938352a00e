//! Incremental digest accumulation.
//!
//! The signature digest is MD5 (16 bytes): downstream loaders recompute it
//! bit-for-bit, so the algorithm is fixed. Bytes are fed in traversal order
//! and are never reordered, normalized or deduplicated.

use md5::{Digest, Md5};

/// Length in bytes of the signature digest and of the sidecar header.
pub const DIGEST_LEN: usize = 16;

/// Finalized 16-byte signature digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Md5Digest([u8; DIGEST_LEN]);

impl Md5Digest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Digest of a single byte slice.
    pub fn of(bytes: &[u8]) -> Self {
        let mut acc = DigestAccumulator::new();
        acc.update(bytes);
        acc.finalize()
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex (32 characters)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Uppercase hex, as used in archive listings
    pub fn to_hex_upper(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl std::fmt::Display for Md5Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Running hash state for one signing invocation.
///
/// `finalize` consumes the accumulator, so a finalized state can never be
/// fed again or finalized twice.
pub struct DigestAccumulator {
    hasher: Md5,
    bytes_fed: u64,
    updates: usize,
}

impl DigestAccumulator {
    pub fn new() -> Self {
        Self {
            hasher: Md5::new(),
            bytes_fed: 0,
            updates: 0,
        }
    }

    /// Append `bytes` to the running state.
    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
        self.bytes_fed += bytes.len() as u64;
        self.updates += 1;
    }

    /// Total number of bytes fed so far
    pub fn bytes_fed(&self) -> u64 {
        self.bytes_fed
    }

    /// Number of `update` calls so far
    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn finalize(self) -> Md5Digest {
        Md5Digest(self.hasher.finalize().into())
    }
}

/// Lets whole files be streamed in with `std::io::copy`.
impl std::io::Write for DigestAccumulator {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Default for DigestAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
