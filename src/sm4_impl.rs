use crate::sbox::round_t;
use crate::sm4_key::SM4_ROUNDS;
use crate::*;
use byteorder::{BigEndian, ByteOrder};

pub type Block = [u8; SM4_BLOCK_SIZE];

// 6.3.  Round Function F, 32 times
// X_{i+4} = X_i ^ T(X_{i+1} ^ X_{i+2} ^ X_{i+3} ^ rk_i)
// (Y_0, Y_1, Y_2, Y_3) = (X_35, X_34, X_33, X_32)
#[inline]
pub(crate) fn transform_words(input: [u32; 4], rk: &RoundKeys) -> [u32; 4] {
    let mut x = [0u32; SM4_ROUNDS + 4];
    x[..4].copy_from_slice(&input);

    for i in 0..SM4_ROUNDS {
        x[i + 4] = x[i] ^ round_t(x[i + 1] ^ x[i + 2] ^ x[i + 3] ^ rk[i]);
    }

    [x[35], x[34], x[33], x[32]]
}

#[inline]
pub(crate) fn load_block(block: &Block) -> [u32; 4] {
    let mut words = [0u32; 4];
    BigEndian::read_u32_into(block, &mut words);
    words
}

#[inline]
pub(crate) fn store_block(words: &[u32; 4]) -> Block {
    let mut block = [0u8; SM4_BLOCK_SIZE];
    BigEndian::write_u32_into(words, &mut block);
    block
}

/// Run the 32 rounds over one block.
///
/// Encryption and decryption are the same transform; which one happens
/// depends only on the order of `rk`.
pub fn transform_block(input: &Block, rk: &RoundKeys) -> Block {
    store_block(&transform_words(load_block(input), rk))
}

/// [`transform_block`] for blocks of unchecked length.
pub fn transform_block_slice(input: &[u8], rk: &RoundKeys) -> Result<Block> {
    let block: &Block = input.try_into().map_err(|_| Error::InvalidLength {
        what: "sm4 block",
        expected: SM4_BLOCK_SIZE,
        got: input.len(),
    })?;
    Ok(transform_block(block, rk))
}

/// Both round key sequences of one SM4 key.
#[derive(Clone)]
pub struct Sm4 {
    enc: RoundKeys,
    dec: RoundKeys,
}

impl Sm4 {
    pub fn new(key: &[u8; SM4_KEY_SIZE]) -> Sm4 {
        let enc = expand_key(key, Direction::Encrypt);
        Sm4 {
            dec: enc.reversed(),
            enc,
        }
    }

    pub fn from_slice(key: &[u8]) -> Result<Sm4> {
        let enc = sm4_key::expand_key_slice(key, Direction::Encrypt)?;
        Ok(Sm4 {
            dec: enc.reversed(),
            enc,
        })
    }

    pub fn round_keys(&self, direction: Direction) -> &RoundKeys {
        match direction {
            Direction::Encrypt => &self.enc,
            Direction::Decrypt => &self.dec,
        }
    }

    pub fn encrypt_block(&self, block: &Block) -> Block {
        transform_block(block, &self.enc)
    }

    pub fn decrypt_block(&self, block: &Block) -> Block {
        transform_block(block, &self.dec)
    }

    /// Encrypt independent raw blocks in place, four at a time on the
    /// fastest available backend.
    pub fn encrypt_blocks(&self, blocks: &mut [Block]) {
        process_blocks(select_backend(), blocks, &self.enc);
    }

    pub fn decrypt_blocks(&self, blocks: &mut [Block]) {
        process_blocks(select_backend(), blocks, &self.dec);
    }
}

impl fmt::Debug for Sm4 {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str("Sm4 { .. }")
    }
}

/// Feed `blocks` through `backend` in groups of four, the tail one by one.
pub fn process_blocks(backend: &dyn BlockBackend, blocks: &mut [Block], rk: &RoundKeys) {
    let mut groups = blocks.chunks_exact_mut(4);
    for group in &mut groups {
        let input = [group[0], group[1], group[2], group[3]];
        group.copy_from_slice(&backend.transform_x4(&input, rk));
    }
    for block in groups.into_remainder() {
        *block = transform_block(block, rk);
    }
}
