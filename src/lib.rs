mod attack;
mod block;
mod cbc;
mod detect;
mod ecb;
mod error;
mod oracle;
mod padding;
#[cfg(test)]
mod testing;
mod xor;

pub use attack::{
    discover_layout, guess_block_size, next_byte, recover_suffix, BlockSizeProbe,
    ByteRecoveryEngine, CandidateDictionary, Lookup, OracleLayout, RecoveredSecret, Step,
    DEFAULT_FILLER, MAX_BLOCK_SIZE,
};
pub use block::{AesBlock, BlockCipher};
pub use cbc::{decrypt_aes_128_cbc, decrypt_cbc, encrypt_aes_128_cbc, encrypt_cbc};
pub use detect::{
    count_repeated_blocks, detect_mode, first_repeated_pair, looks_like_ecb, most_likely_ecb,
    score_ecb_likelihood,
};
pub use ecb::{decrypt_aes_128_ecb, decrypt_ecb, encrypt_aes_128_ecb, encrypt_ecb};
pub use error::{Error, Result};
pub use oracle::{encrypt_with_random_mode, EncryptionOracle, Mode, Oracle, OracleConfig};
pub use padding::{pkcs7_pad, pkcs7_unpad, pkcs7_unpad_in_place, validate_pkcs7};
pub use xor::xor_bytes;
