// Errors returned by the codecs, the oracle and the recovery engine
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid pkcs7 padding")]
    InvalidPadding,
    #[error("key must be {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
    #[error("iv must be {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },
    #[error("ciphertext of {len} bytes is not a whole number of {block_size}-byte blocks")]
    TruncatedCiphertext { len: usize, block_size: usize },
    #[error("block must be {expected} bytes, got {actual}")]
    InvalidBlockLength { expected: usize, actual: usize },
    #[error("oracle output length never grew; cannot determine block size")]
    BlockSizeNotFound,
    #[error("no repeated {block_size}-byte blocks found; oracle does not look like ECB")]
    AlignmentNotFound { block_size: usize },
    #[error("could not recover byte {position} of the hidden suffix")]
    ByteNotRecoverable { position: usize },
}
