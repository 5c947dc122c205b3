// Helpers shared by the unit tests.
use crate::{xor_bytes, BlockCipher, Error, Result};

pub const ROLLIN: &[u8] = b"Rollin' in my 5.0\n\
With my rag-top down so my hair can blow\n\
The girlies on standby waving just to say hi\n\
Did you stop? No, I just drove by\n";

/// A "block cipher" that XORs each block with the key.
///
/// Useless as encryption, but a permutation for any block size, which is
/// all the modes and the attack rely on.
#[derive(Debug, Clone, Copy)]
pub struct XorBlock(pub usize);

impl XorBlock {
    fn apply(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>> {
        if block.len() != self.0 {
            return Err(Error::InvalidBlockLength {
                expected: self.0,
                actual: block.len(),
            });
        }
        xor_bytes(block, key).map_err(|_| Error::InvalidKeyLength {
            expected: self.0,
            actual: key.len(),
        })
    }
}

impl BlockCipher for XorBlock {
    fn block_size(&self) -> usize {
        self.0
    }

    fn encrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>> {
        self.apply(key, block)
    }

    fn decrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>> {
        self.apply(key, block)
    }
}
