// Find the block size from jumps in ciphertext length
use tracing::{debug, instrument};

use crate::{Error, Oracle, Result};

/// Largest block size looked for before giving up.
pub const MAX_BLOCK_SIZE: usize = 256;

/// What feeding an oracle ever longer inputs revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSizeProbe {
    pub block_size: usize,
    /// Ciphertext length for an empty input.
    pub empty_len: usize,
    /// Shortest input for which the ciphertext grew.
    pub jump_input_len: usize,
}

impl BlockSizeProbe {
    /// Combined length of everything the oracle adds around the input.
    ///
    /// The output first grows exactly when `hidden + input` fills the last
    /// block, i.e. when it reaches `empty_len`.
    pub fn hidden_len(&self) -> usize {
        self.empty_len.saturating_sub(self.jump_input_len)
    }
}

/// Find the block size by growing the input one byte at a time.
///
/// Padding means the ciphertext only grows when the plaintext crosses a
/// block boundary, and then by exactly one block.
#[instrument(skip_all)]
pub fn guess_block_size<O: Oracle + ?Sized>(oracle: &O) -> Result<BlockSizeProbe> {
    let empty_len = oracle.query(&[])?.len();
    let mut input = Vec::with_capacity(MAX_BLOCK_SIZE);
    for jump_input_len in 1..=MAX_BLOCK_SIZE {
        input.push(b'A');
        let ciphertext_len = oracle.query(&input)?.len();
        if ciphertext_len > empty_len {
            let probe = BlockSizeProbe {
                block_size: ciphertext_len - empty_len,
                empty_len,
                jump_input_len,
            };
            debug!(
                block_size = probe.block_size,
                hidden_len = probe.hidden_len(),
                "found block size"
            );
            return Ok(probe);
        }
    }
    Err(Error::BlockSizeNotFound)
}
