use std::ops::*;
use std::*;

pub const SM3_DIGEST_SIZE: usize = 32;
pub const SM3_BLOCK_SIZE: usize = 64;
pub const SM4_KEY_SIZE: usize = 16;
pub const SM4_BLOCK_SIZE: usize = 16;

/// An SM3 digest (256 bits).
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Digest {
    pub(crate) buf: [u8; SM3_DIGEST_SIZE],
}

impl Digest {
    /// Serialize a folded state, each word big endian.
    pub(crate) fn from_state(state: &[u32; 8]) -> Digest {
        let mut buf = [0u8; SM3_DIGEST_SIZE];
        for (chunk, word) in buf.chunks_exact_mut(4).zip(state.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Digest { buf }
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.buf)
    }
}

impl Deref for Digest {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        &self.buf
    }
}

impl AsRef<[u8]> for Digest {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.deref()
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(&self.to_hex())
    }
}

pub type Hash = fn(input: &[u8]) -> Digest;

pub mod error;
pub mod sbox;
pub mod sm3_chunked;
pub mod sm3_impl;
pub mod sm4_impl;
pub mod sm4_key;
pub mod sm4_x4;

pub use error::{Error, Result};
pub use sm3_chunked::{hash_chunked, ChunkConfig};
pub use sm3_impl::{hash_sm3, pad_message, sm3};
pub use sm4_impl::{transform_block, Sm4};
pub use sm4_key::{expand_key, Direction, RoundKeys};
pub use sm4_x4::{select_backend, supports_vectorized_transform, BlockBackend};

/// Standard sequential SM3.
pub const SM3: Hash = sm3_impl::HASH;
/// Partitioned SM3 with the default [`ChunkConfig`]; diverges from [`SM3`]
/// once a message is split across two or more partitions.
pub const SM3_CHUNKED: Hash = sm3_chunked::HASH;
