//! Four-block SM4 backends.
//!
//! Both backends compute exactly what four independent calls to
//! [`transform_block`](crate::transform_block) compute. The vectorized one
//! keeps word `k` of all four blocks in one SSE2 register, so the XORs and the
//! rotations of L run on four lanes at once; the S-box lookup stays scalar.

use crate::sm4_impl::{load_block, store_block, transform_words, Block};
use crate::*;
use log::*;

pub trait BlockBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Transform four independent blocks with the same round keys.
    fn transform_x4(&self, blocks: &[Block; 4], rk: &RoundKeys) -> [Block; 4];
}

/// Four sequential single-block transforms.
pub struct ScalarBackend;

impl BlockBackend for ScalarBackend {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn transform_x4(&self, blocks: &[Block; 4], rk: &RoundKeys) -> [Block; 4] {
        let mut out = [[0u8; SM4_BLOCK_SIZE]; 4];
        for (o, b) in out.iter_mut().zip(blocks.iter()) {
            *o = store_block(&transform_words(load_block(b), rk));
        }
        out
    }
}

/// Lane-parallel transform over SSE2 registers.
///
/// Only obtainable through [`VectorBackend::detect`], which checks the CPU.
pub struct VectorBackend {
    _detected: (),
}

impl VectorBackend {
    pub fn detect() -> Option<VectorBackend> {
        if supports_vectorized_transform() {
            Some(VectorBackend { _detected: () })
        } else {
            None
        }
    }
}

impl BlockBackend for VectorBackend {
    fn name(&self) -> &'static str {
        "sse2"
    }

    fn transform_x4(&self, blocks: &[Block; 4], rk: &RoundKeys) -> [Block; 4] {
        let words = [
            load_block(&blocks[0]),
            load_block(&blocks[1]),
            load_block(&blocks[2]),
            load_block(&blocks[3]),
        ];
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        // SAFETY: a VectorBackend only exists once sse2 was detected.
        let out = unsafe { x86::transform_x4_sse2(&words, rk) };
        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        let out = [
            transform_words(words[0], rk),
            transform_words(words[1], rk),
            transform_words(words[2], rk),
            transform_words(words[3], rk),
        ];
        [
            store_block(&out[0]),
            store_block(&out[1]),
            store_block(&out[2]),
            store_block(&out[3]),
        ]
    }
}

/// Whether the host can run [`VectorBackend`].
pub fn supports_vectorized_transform() -> bool {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        is_x86_feature_detected!("sse2")
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        false
    }
}

static SCALAR: ScalarBackend = ScalarBackend;
static VECTOR: VectorBackend = VectorBackend { _detected: () };

/// The fastest backend this host supports.
pub fn select_backend() -> &'static dyn BlockBackend {
    let backend: &'static dyn BlockBackend = if supports_vectorized_transform() {
        &VECTOR
    } else {
        &SCALAR
    };
    debug!("Using {} sm4 backend", backend.name());
    backend
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86 {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    use crate::sbox::substitute;
    use crate::sm4_key::SM4_ROUNDS;
    use crate::RoundKeys;

    macro_rules! rotl {
        ($x:expr, $n:literal) => {
            _mm_or_si128(_mm_slli_epi32($x, $n), _mm_srli_epi32($x, 32 - $n))
        };
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn tau(x: __m128i) -> __m128i {
        let mut lanes = [0u32; 4];
        _mm_storeu_si128(lanes.as_mut_ptr() as *mut __m128i, x);
        for lane in lanes.iter_mut() {
            *lane = substitute(*lane);
        }
        _mm_loadu_si128(lanes.as_ptr() as *const __m128i)
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn diffuse_round(b: __m128i) -> __m128i {
        let t = _mm_xor_si128(b, rotl!(b, 2));
        let t = _mm_xor_si128(t, rotl!(b, 10));
        let t = _mm_xor_si128(t, rotl!(b, 18));
        _mm_xor_si128(t, rotl!(b, 24))
    }

    /// `words[b][k]` is word `k` of block `b`; lane `b` of register `k`
    /// carries it through the rounds.
    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn transform_x4_sse2(words: &[[u32; 4]; 4], rk: &RoundKeys) -> [[u32; 4]; 4] {
        let mut x = [_mm_setzero_si128(); 4];
        for (k, reg) in x.iter_mut().enumerate() {
            *reg = _mm_set_epi32(
                words[3][k] as i32,
                words[2][k] as i32,
                words[1][k] as i32,
                words[0][k] as i32,
            );
        }

        for i in 0..SM4_ROUNDS {
            let t = _mm_xor_si128(_mm_xor_si128(x[1], x[2]), x[3]);
            let t = _mm_xor_si128(t, _mm_set1_epi32(rk[i] as i32));
            let next = _mm_xor_si128(x[0], diffuse_round(tau(t)));
            x = [x[1], x[2], x[3], next];
        }

        // lanes of X_35, X_34, X_33, X_32
        let mut cols = [[0u32; 4]; 4];
        for (col, reg) in cols.iter_mut().zip([x[3], x[2], x[1], x[0]].iter()) {
            _mm_storeu_si128(col.as_mut_ptr() as *mut __m128i, *reg);
        }

        let mut out = [[0u32; 4]; 4];
        for (b, block) in out.iter_mut().enumerate() {
            for (k, word) in block.iter_mut().enumerate() {
                *word = cols[k][b];
            }
        }
        out
    }
}
