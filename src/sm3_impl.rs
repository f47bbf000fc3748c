use crate::*;
use byteorder::{BigEndian, ByteOrder};

// reference:
// https://tools.ietf.org/html/draft-oscca-cfrg-sm3-02

// 4.1.  Initial Value IV
pub const IV: [u32; 8] = [
    0x7380166f, 0x4914b2b9, 0x172442d7, 0xda8a0600, 0xa96f30bc, 0x163138aa, 0xe38dee4d,
    0xb0fb0e4e,
];

// 4.2.  Constants T_j
const T_0_15: u32 = 0x79cc4519;
const T_16_63: u32 = 0x7a879d8a;

// 4.4.  Permutation Functions P_0 and P_1
#[inline]
fn p_0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

#[inline]
fn p_1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

/// Length of `input_len` bytes once padded.
// 9: 8-byte length + 0x80
#[inline]
pub fn padded_len(input_len: usize) -> usize {
    (input_len + 9 + 63) & !63usize
}

/// 5.2.  Padding
///
/// padding: 80 00 00 00 ... [64-bit length], the whole a multiple of 64 bytes.
pub fn pad_message(input: &[u8]) -> Vec<u8> {
    let real_length = padded_len(input.len());
    let mut preprocessed: Vec<u8> = Vec::with_capacity(real_length);
    preprocessed.extend_from_slice(input);
    preprocessed.push(0x80);
    preprocessed.resize(real_length - 8, 0);
    // bit length mod 2^64, big endian
    let bit_length = (input.len() as u64).wrapping_mul(8);
    preprocessed.extend_from_slice(&bit_length.to_be_bytes());
    preprocessed
}

/// The per-block message schedule, W_0..W_67 and W'_0..W'_63.
pub struct MessageSchedule {
    pub w: [u32; 68],
    pub w1: [u32; 64],
}

/// 5.3.2.  Message Expansion Function ME
pub fn expand_message(block: &[u8; SM3_BLOCK_SIZE]) -> MessageSchedule {
    let mut w = [0u32; 68];
    let mut w1 = [0u32; 64];

    // B_i = W_0 || ... || W_15
    BigEndian::read_u32_into(block, &mut w[..16]);

    // extend 16 words to w[16..67]
    for i in 16..68 {
        // W_j = P_1(W_{j - 16} xor W_{j - 9} xor (W_{j - 3} <<< 15)) xor
        // (W_{j - 13} <<< 7) xor W_{ j - 6 }
        w[i] = p_1(w[i - 16] ^ w[i - 9] ^ w[i - 3].rotate_left(15))
            ^ w[i - 13].rotate_left(7)
            ^ w[i - 6];
    }

    for i in 0..64 {
        // W'_j = W_j xor W_{j + 4}
        w1[i] = w[i] ^ w[i + 4];
    }

    MessageSchedule { w, w1 }
}

/// 5.3.3.  Compression Function CF
///
/// Folds one 64-byte block into the state `V`.
#[allow(non_snake_case)]
pub fn compress(V: &mut [u32; 8], block: &[u8; SM3_BLOCK_SIZE]) {
    let MessageSchedule { w, w1 } = expand_message(block);

    let mut a = V[0];
    let mut b = V[1];
    let mut c = V[2];
    let mut d = V[3];
    let mut e = V[4];
    let mut f = V[5];
    let mut g = V[6];
    let mut h = V[7];

    // compression main loop
    for i in 0..64 {
        let tj: u32 = if i <= 15 { T_0_15 } else { T_16_63 };
        let a12 = a.rotate_left(12);
        let ss1 = a12
            .wrapping_add(e)
            .wrapping_add(tj.rotate_left(i as u32 % 32))
            .rotate_left(7);
        let ss2 = ss1 ^ a12;
        // 4.3. Boolean Functions FF_j and GG_j
        let tt1 = if i <= 15 {
            a ^ b ^ c
        } else {
            (a & b) | (a & c) | (b & c)
        }
        .wrapping_add(d)
        .wrapping_add(ss2)
        .wrapping_add(w1[i]);
        let tt2 = if i <= 15 {
            e ^ f ^ g
        } else {
            (e & f) | ((!e) & g)
        }
        .wrapping_add(h)
        .wrapping_add(ss1)
        .wrapping_add(w[i]);

        d = c;
        c = b.rotate_left(9);
        b = a;
        a = tt1;
        h = g;
        g = f.rotate_left(19);
        f = e;
        e = p_0(tt2);
    }

    V[0] ^= a;
    V[1] ^= b;
    V[2] ^= c;
    V[3] ^= d;
    V[4] ^= e;
    V[5] ^= f;
    V[6] ^= g;
    V[7] ^= h;
}

/// Fold consecutive blocks of a padded message into `state`.
pub(crate) fn compress_blocks(state: &mut [u32; 8], blocks: &[u8]) {
    for block in blocks.chunks_exact(SM3_BLOCK_SIZE) {
        let mut buf = [0u8; SM3_BLOCK_SIZE];
        buf.copy_from_slice(block);
        compress(state, &buf);
    }
}

/// Standard SM3 digest of `input`.
pub fn sm3(input: &[u8]) -> Digest {
    let preprocessed = pad_message(input);
    let mut state = IV;
    compress_blocks(&mut state, &preprocessed);
    Digest::from_state(&state)
}

/// Standard SM3 digest of `input` as 64 lowercase hex digits.
pub fn hash_sm3(input: &[u8]) -> String {
    sm3(input).to_hex()
}

pub const HASH: Hash = sm3;
