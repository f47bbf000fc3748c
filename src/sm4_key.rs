use crate::sbox::key_t;
use crate::*;
use byteorder::{BigEndian, ByteOrder};
use log::*;

// 7.3.1.  Family Key FK
const FK: [u32; 4] = [0xa3b1bac6, 0x56aa3350, 0x677d9197, 0xb27022dc];

// 7.3.2.  Constant Key CK
// ck_{i,j} = (4i + j) * 7 mod 256
#[rustfmt::skip]
const CK: [u32; 32] = [
    0x00070e15, 0x1c232a31, 0x383f464d, 0x545b6269,
    0x70777e85, 0x8c939aa1, 0xa8afb6bd, 0xc4cbd2d9,
    0xe0e7eef5, 0xfc030a11, 0x181f262d, 0x343b4249,
    0x50575e65, 0x6c737a81, 0x888f969d, 0xa4abb2b9,
    0xc0c7ced5, 0xdce3eaf1, 0xf8ff060d, 0x141b2229,
    0x30373e45, 0x4c535a61, 0x686f767d, 0x848b9299,
    0xa0a7aeb5, 0xbcc3cad1, 0xd8dfe6ed, 0xf4fb0209,
    0x10171e25, 0x2c333a41, 0x484f565d, 0x646b7279,
];

pub const SM4_ROUNDS: usize = 32;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// The 32 round keys of one key, in the order the block transform consumes them.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RoundKeys(pub [u32; SM4_ROUNDS]);

impl Deref for RoundKeys {
    type Target = [u32; SM4_ROUNDS];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl RoundKeys {
    /// The same keys consumed in the opposite direction.
    pub fn reversed(&self) -> RoundKeys {
        let mut rk = self.0;
        rk.reverse();
        RoundKeys(rk)
    }
}

/// Derive the round keys of `key` for one direction.
///
/// K_0..K_3 are the key words mixed with FK; every round appends one word,
/// rk_i = K_{i+4} = K_i ^ T'(K_{i+1} ^ K_{i+2} ^ K_{i+3} ^ CK_i), so each
/// round reads the window K_i..K_{i+3} of what has been produced so far.
pub fn expand_key(key: &[u8; SM4_KEY_SIZE], direction: Direction) -> RoundKeys {
    let mut k = [0u32; SM4_ROUNDS + 4];
    for i in 0..4 {
        k[i] = BigEndian::read_u32(&key[4 * i..4 * i + 4]) ^ FK[i];
    }

    for i in 0..SM4_ROUNDS {
        k[i + 4] = k[i] ^ key_t(k[i + 1] ^ k[i + 2] ^ k[i + 3] ^ CK[i]);
    }

    let mut rk = [0u32; SM4_ROUNDS];
    rk.copy_from_slice(&k[4..]);
    if direction == Direction::Decrypt {
        rk.reverse();
    }
    trace!("Expanded {:?} round keys", direction);
    RoundKeys(rk)
}

/// [`expand_key`] for keys of unchecked length.
pub fn expand_key_slice(key: &[u8], direction: Direction) -> Result<RoundKeys> {
    let key: &[u8; SM4_KEY_SIZE] = key.try_into().map_err(|_| Error::InvalidLength {
        what: "sm4 key",
        expected: SM4_KEY_SIZE,
        got: key.len(),
    })?;
    Ok(expand_key(key, direction))
}
