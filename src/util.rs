use sm::{Error, Result};

// parse hex into a fixed-size array, e.g. keys and blocks
pub fn decode_hex_array<const N: usize>(what: &'static str, input: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(input.trim())?;
    let got = bytes.len();
    bytes.try_into().map_err(|_| Error::InvalidLength {
        what,
        expected: N,
        got,
    })
}
