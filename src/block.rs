// The single-block primitive the modes of operation are built on.
use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};

use crate::{Error, Result};

/// A keyed permutation over fixed-size blocks.
///
/// Implementations must reject any block that is not exactly
/// [`block_size`](BlockCipher::block_size) bytes long.
pub trait BlockCipher {
    fn block_size(&self) -> usize;

    fn encrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>>;

    fn decrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>>;
}

/// AES-128 on a single 16-byte block.
#[derive(Debug, Default, Clone, Copy)]
pub struct AesBlock;

impl AesBlock {
    pub const BLOCK_SIZE: usize = 16;

    fn cipher(key: &[u8]) -> Result<aes::Aes128> {
        aes::Aes128::new_from_slice(key).map_err(|_| Error::InvalidKeyLength {
            expected: Self::BLOCK_SIZE,
            actual: key.len(),
        })
    }

    fn check_block(block: &[u8]) -> Result<()> {
        if block.len() != Self::BLOCK_SIZE {
            return Err(Error::InvalidBlockLength {
                expected: Self::BLOCK_SIZE,
                actual: block.len(),
            });
        }
        Ok(())
    }
}

impl BlockCipher for AesBlock {
    fn block_size(&self) -> usize {
        Self::BLOCK_SIZE
    }

    fn encrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>> {
        Self::check_block(block)?;
        let cipher = Self::cipher(key)?;
        let mut buf = GenericArray::clone_from_slice(block);
        cipher.encrypt_block(&mut buf);
        Ok(buf.to_vec())
    }

    fn decrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>> {
        Self::check_block(block)?;
        let cipher = Self::cipher(key)?;
        let mut buf = GenericArray::clone_from_slice(block);
        cipher.decrypt_block(&mut buf);
        Ok(buf.to_vec())
    }
}

pub(crate) fn check_key<C: BlockCipher>(cipher: &C, key: &[u8]) -> Result<()> {
    if key.len() != cipher.block_size() {
        return Err(Error::InvalidKeyLength {
            expected: cipher.block_size(),
            actual: key.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_ciphertext<C: BlockCipher>(cipher: &C, ciphertext: &[u8]) -> Result<()> {
    let block_size = cipher.block_size();
    if ciphertext.is_empty() || ciphertext.len() % block_size != 0 {
        return Err(Error::TruncatedCiphertext {
            len: ciphertext.len(),
            block_size,
        });
    }
    Ok(())
}
