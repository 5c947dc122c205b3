// Dictionary of candidate last bytes for one recovery step
use std::collections::{hash_map::Entry, HashMap};

use rayon::prelude::*;

use crate::{Oracle, Result};

/// Outcome of looking a ciphertext block up in a [`CandidateDictionary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hit(u8),
    Miss,
    /// More than one candidate byte encrypted to this block.
    Ambiguous,
}

/// Map from the ciphertext block produced by each of the 256 possible last
/// bytes back to that byte.
#[derive(Debug, Clone, Default)]
pub struct CandidateDictionary {
    entries: HashMap<Vec<u8>, Option<u8>>,
}

impl CandidateDictionary {
    /// Query `oracle` with `known || candidate` for every byte value and
    /// record block `block_index` of each ciphertext.
    ///
    /// The queries are independent and run in parallel.
    pub fn build<O: Oracle + Sync + ?Sized>(
        oracle: &O,
        known: &[u8],
        block_index: usize,
        block_size: usize,
    ) -> Result<Self> {
        let pairs = (0..=u8::MAX)
            .into_par_iter()
            .map(|candidate| -> Result<Option<(Vec<u8>, u8)>> {
                let mut input = Vec::with_capacity(known.len() + 1);
                input.extend_from_slice(known);
                input.push(candidate);
                let ciphertext = oracle.query(&input)?;
                Ok(nth_block(&ciphertext, block_index, block_size)
                    .map(|block| (block.to_vec(), candidate)))
            })
            .collect::<Result<Vec<_>>>()?;
        // Candidates whose ciphertext stops short of the block cannot match.
        Ok(Self::from_pairs(pairs.into_iter().flatten()))
    }

    /// Build a dictionary from `(block, byte)` pairs; blocks seen more than
    /// once become ambiguous.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Vec<u8>, u8)>) -> Self {
        let mut entries = HashMap::new();
        for (block, candidate) in pairs {
            match entries.entry(block) {
                Entry::Vacant(entry) => {
                    entry.insert(Some(candidate));
                }
                Entry::Occupied(mut entry) => {
                    entry.insert(None);
                }
            }
        }
        Self { entries }
    }

    pub fn lookup(&self, block: &[u8]) -> Lookup {
        match self.entries.get(block) {
            Some(Some(byte)) => Lookup::Hit(*byte),
            Some(None) => Lookup::Ambiguous,
            None => Lookup::Miss,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn nth_block(bytes: &[u8], index: usize, block_size: usize) -> Option<&[u8]> {
    let start = index.checked_mul(block_size)?;
    bytes.get(start..start.checked_add(block_size)?)
}
