// Detect ECB mode from ciphertext alone

use std::collections::HashSet;

use crate::{Mode, Oracle, Result};

/// Report whether any two blocks of `ciphertext` are byte-identical.
///
/// ECB maps equal plaintext blocks to equal ciphertext blocks, so a repeat
/// is strong evidence of ECB. The converse does not hold: an ECB ciphertext
/// whose plaintext has no repeated aligned blocks is indistinguishable from
/// random, and this returns `false`. A trailing partial block is ignored.
pub fn looks_like_ecb(ciphertext: &[u8], block_size: usize) -> bool {
    count_repeated_blocks(ciphertext, block_size) > 0
}

/// Count the blocks that duplicate an earlier block.
pub fn count_repeated_blocks(ciphertext: &[u8], block_size: usize) -> usize {
    if block_size == 0 {
        return 0;
    }
    let mut seen_blocks = HashSet::new();
    ciphertext
        .chunks_exact(block_size)
        .filter(|block| !seen_blocks.insert(*block))
        .count()
}

/// Return a score for how likely some bytes were encrypted using ECB.
///
/// The score is the ratio of repeated blocks to blocks. It is between 0 and
/// 1, but is not a probability.
pub fn score_ecb_likelihood(ciphertext: &[u8], block_size: usize) -> f64 {
    let n_blocks = match ciphertext.len().checked_div(block_size) {
        Some(0) | None => return 0.,
        Some(n) => n,
    };
    count_repeated_blocks(ciphertext, block_size) as f64 / n_blocks as f64
}

/// Pick the candidate ciphertext most likely to have been encrypted with ECB.
///
/// Returns `None` if none of the candidates contains a repeated block.
pub fn most_likely_ecb<T: AsRef<[u8]>>(candidates: &[T], block_size: usize) -> Option<usize> {
    candidates
        .iter()
        .map(|c| score_ecb_likelihood(c.as_ref(), block_size))
        .enumerate()
        .filter(|(_, score)| *score > 0.)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

/// Index of the first block that is equal to the block after it.
pub fn first_repeated_pair(ciphertext: &[u8], block_size: usize) -> Option<usize> {
    if block_size == 0 {
        return None;
    }
    let blocks = ciphertext.chunks_exact(block_size);
    blocks
        .clone()
        .zip(blocks.skip(1))
        .position(|(a, b)| a == b)
}

/// Ask `oracle` to encrypt three blocks of identical bytes and classify it.
///
/// Three blocks guarantee two aligned copies whatever the oracle puts in
/// front of the input.
pub fn detect_mode<O: Oracle + ?Sized>(oracle: &O, block_size: usize) -> Result<Mode> {
    let ciphertext = oracle.query(&vec![b'A'; 3 * block_size])?;
    if looks_like_ecb(&ciphertext, block_size) {
        Ok(Mode::Ecb)
    } else {
        Ok(Mode::Cbc)
    }
}
