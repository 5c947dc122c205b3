// Find where the hidden prefix ends and how long the suffix is
use tracing::{debug, instrument, trace};

use super::{dictionary::nth_block, BlockSizeProbe};
use crate::{looks_like_ecb, Error, Oracle, Result};

/// Filler bytes used while hunting for the end of the prefix.
///
/// A hidden prefix ending in, or suffix starting with, the filler byte makes
/// the filler run look longer than it is. Each hidden neighbour can spoil at
/// most one byte value, so one of three is always honest.
const ALIGNMENT_FILLERS: [u8; 3] = [b'A', b'B', b'C'];

/// Where the attacker's bytes land inside the oracle's plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleLayout {
    pub block_size: usize,
    pub prefix_len: usize,
    pub suffix_len: usize,
    /// Filler bytes needed to finish the prefix's last partial block.
    pub alignment: usize,
    /// Index of the first block that starts right after the alignment filler.
    pub first_block: usize,
}

impl OracleLayout {
    /// Layout of an oracle that only appends a suffix.
    pub fn suffix_only(probe: &BlockSizeProbe) -> Self {
        Self {
            block_size: probe.block_size,
            prefix_len: 0,
            suffix_len: probe.hidden_len(),
            alignment: 0,
            first_block: 0,
        }
    }
}

/// Measure the hidden prefix and suffix of a deterministic (ECB) oracle.
///
/// Two one-byte inputs that differ first change the block the input starts
/// in. A run of `2 * block_size + a` identical bytes then produces two equal
/// blocks right after the prefix once `a` bytes are enough to complete the
/// prefix's last block. The smallest such `a` is the alignment.
#[instrument(skip_all, fields(block_size = probe.block_size))]
pub fn discover_layout<O: Oracle + ?Sized>(
    oracle: &O,
    probe: &BlockSizeProbe,
) -> Result<OracleLayout> {
    let block_size = probe.block_size;
    let not_found = Error::AlignmentNotFound { block_size };
    if block_size == 0 {
        return Err(not_found);
    }

    // The longest run always contains two aligned filler blocks.
    let widest = oracle.query(&vec![ALIGNMENT_FILLERS[0]; 3 * block_size - 1])?;
    if !looks_like_ecb(&widest, block_size) {
        return Err(not_found);
    }
    let input_block = first_input_block(oracle, block_size)?.ok_or(not_found.clone())?;

    let mut best: Option<(usize, usize)> = None;
    for filler in ALIGNMENT_FILLERS {
        let found = find_alignment(oracle, block_size, input_block, filler)?;
        trace!(filler, ?found, "alignment probe");
        best = best.max(found);
    }
    let (alignment, first_block) = best.ok_or(not_found.clone())?;

    let prefix_len = (first_block * block_size)
        .checked_sub(alignment)
        .ok_or(not_found.clone())?;
    let suffix_len = probe
        .hidden_len()
        .checked_sub(prefix_len)
        .ok_or(not_found)?;
    let layout = OracleLayout {
        block_size,
        prefix_len,
        suffix_len,
        alignment,
        first_block,
    };
    debug!(prefix_len, suffix_len, alignment, first_block, "found layout");
    Ok(layout)
}

/// Index of the block holding the first byte of the attacker's input.
fn first_input_block<O: Oracle + ?Sized>(oracle: &O, block_size: usize) -> Result<Option<usize>> {
    let first = oracle.query(&[ALIGNMENT_FILLERS[0]])?;
    let second = oracle.query(&[ALIGNMENT_FILLERS[1]])?;
    Ok(first
        .chunks(block_size)
        .zip(second.chunks(block_size))
        .position(|(a, b)| a != b))
}

/// Smallest extra run length for which `filler` fills the two blocks after
/// the prefix, and the index of the first of them.
fn find_alignment<O: Oracle + ?Sized>(
    oracle: &O,
    block_size: usize,
    input_block: usize,
    filler: u8,
) -> Result<Option<(usize, usize)>> {
    for alignment in 0..block_size {
        // Without alignment filler the prefix ends on a block boundary, so
        // the input starts a fresh block.
        let first_block = if alignment == 0 {
            input_block
        } else {
            input_block + 1
        };
        let ciphertext = oracle.query(&vec![filler; 2 * block_size + alignment])?;
        let first = nth_block(&ciphertext, first_block, block_size);
        let second = nth_block(&ciphertext, first_block + 1, block_size);
        if first.is_some() && first == second {
            return Ok(Some((alignment, first_block)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{rngs::StdRng, Rng, SeedableRng};
    use rstest::rstest;

    use crate::{guess_block_size, testing::XorBlock, EncryptionOracle, Mode, OracleConfig};

    fn ecb_oracle(prefix: &[u8], suffix: &[u8], seed: u64) -> EncryptionOracle {
        let config = OracleConfig::default()
            .with_mode(Mode::Ecb)
            .with_prefix(prefix)
            .with_suffix(suffix);
        EncryptionOracle::from_config(config, StdRng::seed_from_u64(seed))
    }

    fn layout_of<O: Oracle>(oracle: &O) -> Result<OracleLayout> {
        discover_layout(oracle, &guess_block_size(oracle)?)
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(1, 15, 1)]
    #[case(15, 1, 1)]
    #[case(16, 0, 1)]
    #[case(17, 15, 2)]
    #[case(100, 12, 7)]
    fn discover_layout_measures_prefix(
        #[case] prefix_len: usize,
        #[case] alignment: usize,
        #[case] first_block: usize,
    ) {
        let mut rng = StdRng::seed_from_u64(prefix_len as u64);
        let prefix: Vec<u8> = (0..prefix_len).map(|_| rng.gen()).collect();
        let oracle = ecb_oracle(&prefix, b"hidden suffix", 1);

        let layout = layout_of(&oracle).unwrap();

        assert_eq!(
            layout,
            OracleLayout {
                block_size: 16,
                prefix_len,
                suffix_len: 13,
                alignment,
                first_block,
            }
        );
    }

    #[rstest]
    #[case(b"xyzAAAA".as_slice(), b"suffix".as_slice())]
    #[case(b"xyz".as_slice(), b"AAAAsuffix".as_slice())]
    #[case(b"xyzAA".as_slice(), b"Bsuffix".as_slice())]
    #[case(b"AAAAAAAAAAAAAAAA".as_slice(), b"AAAAAAAAAAAAAAAAAAAA".as_slice())]
    #[case(b"AAAAAAAAAAAAAAAAABBB".as_slice(), b"CCCsuffix".as_slice())]
    fn discover_layout_is_not_fooled_by_filler_lookalikes(
        #[case] prefix: &[u8],
        #[case] suffix: &[u8],
    ) {
        let oracle = ecb_oracle(prefix, suffix, 2);

        let layout = layout_of(&oracle).unwrap();

        assert_eq!(layout.prefix_len, prefix.len());
        assert_eq!(layout.suffix_len, suffix.len());
    }

    #[test]
    fn discover_layout_ignores_repeated_blocks_in_hidden_bytes() {
        let prefix = [b'Z'; 40];
        let suffix = [b'Q'; 50];
        let oracle = ecb_oracle(&prefix, &suffix, 3);

        let layout = layout_of(&oracle).unwrap();

        assert_eq!(layout.prefix_len, 40);
        assert_eq!(layout.alignment, 8);
        assert_eq!(layout.first_block, 3);
        assert_eq!(layout.suffix_len, 50);
    }

    #[test]
    fn discover_layout_matches_random_prefixes() {
        for seed in 0..10 {
            let config = OracleConfig::default().with_mode(Mode::Ecb);
            let oracle = EncryptionOracle::from_config(config, StdRng::seed_from_u64(seed));
            let probe = guess_block_size(&oracle).unwrap();

            let layout = discover_layout(&oracle, &probe).unwrap();

            assert_eq!(layout.prefix_len + layout.suffix_len, probe.hidden_len());
            assert_eq!(
                (layout.prefix_len + layout.alignment) % 16,
                0,
                "seed {seed}: {layout:?}"
            );
            assert_eq!(
                layout.first_block * 16,
                layout.prefix_len + layout.alignment
            );
        }
    }

    #[test]
    fn discover_layout_works_for_other_block_sizes() {
        let config = OracleConfig::default()
            .with_mode(Mode::Ecb)
            .with_prefix(b"0123456789".to_vec())
            .with_suffix(b"abc".to_vec());
        let oracle = EncryptionOracle::with_cipher(XorBlock(8), config, StdRng::seed_from_u64(3));

        let layout = layout_of(&oracle).unwrap();

        assert_eq!(layout.block_size, 8);
        assert_eq!(layout.prefix_len, 10);
        assert_eq!(layout.alignment, 6);
        assert_eq!(layout.first_block, 2);
        assert_eq!(layout.suffix_len, 3);
    }

    #[test]
    fn discover_layout_rejects_cbc_oracle() {
        let config = OracleConfig::default().with_mode(Mode::Cbc);
        let oracle = EncryptionOracle::from_config(config, StdRng::seed_from_u64(4));

        assert_eq!(
            layout_of(&oracle),
            Err(Error::AlignmentNotFound { block_size: 16 })
        );
    }

    #[test]
    fn discover_layout_rejects_zero_block_size() {
        let oracle = ecb_oracle(b"", b"suffix", 5);
        let probe = BlockSizeProbe {
            block_size: 0,
            empty_len: 16,
            jump_input_len: 10,
        };

        assert_eq!(
            discover_layout(&oracle, &probe),
            Err(Error::AlignmentNotFound { block_size: 0 })
        );
    }

    #[test]
    fn suffix_only_layout_uses_all_hidden_bytes_as_suffix() {
        let probe = BlockSizeProbe {
            block_size: 16,
            empty_len: 32,
            jump_input_len: 5,
        };

        let layout = OracleLayout::suffix_only(&probe);

        assert_eq!(layout.suffix_len, 27);
        assert_eq!(layout.alignment, 0);
        assert_eq!(layout.first_block, 0);
    }
}
