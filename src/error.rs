/// Errors raised at the slice-taking boundary of the cipher and hash APIs.
///
/// The core functions take fixed-size arrays and cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{what}: invalid length, expected {expected} bytes, got {got}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

pub type Result<T> = std::result::Result<T, Error>;
