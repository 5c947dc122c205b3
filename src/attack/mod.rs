// Byte-at-a-time recovery of the secret an ECB oracle appends to its input
mod block_size;
mod dictionary;
mod layout;

pub use block_size::{guess_block_size, BlockSizeProbe, MAX_BLOCK_SIZE};
pub use dictionary::{CandidateDictionary, Lookup};
pub use layout::{discover_layout, OracleLayout};

use tracing::{debug, instrument, trace};

use crate::{Error, Oracle, Result};
use dictionary::nth_block;

/// The filler byte used for the dictionary queries unless told otherwise.
pub const DEFAULT_FILLER: u8 = b'A';

/// Bytes of the hidden suffix recovered so far, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveredSecret(Vec<u8>);

impl RecoveredSecret {
    pub fn push(&mut self, byte: u8) {
        self.0.push(byte);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for RecoveredSecret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Result of one round of the recovery loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Byte(u8),
    /// Every byte of the suffix has been recovered.
    Complete,
}

/// Recover the suffix byte that follows `recovered`.
///
/// The oracle is fed just enough filler that the unknown byte becomes the
/// last byte of a block whose other bytes are all known. That block is then
/// compared against the blocks obtained by trying every possible last byte.
pub fn next_byte<O: Oracle + Sync + ?Sized>(
    oracle: &O,
    layout: &OracleLayout,
    filler: u8,
    recovered: &[u8],
) -> Result<Step> {
    let position = recovered.len();
    if position >= layout.suffix_len {
        return Ok(Step::Complete);
    }
    let block_size = layout.block_size;
    if block_size == 0 {
        return Err(Error::AlignmentNotFound { block_size });
    }
    let unrecoverable = Error::ByteNotRecoverable { position };

    let fill_len = block_size - 1 - position % block_size;
    let probe = vec![filler; layout.alignment + fill_len];
    let block_index = layout.first_block + position / block_size;

    let ciphertext = oracle.query(&probe)?;
    let target = nth_block(&ciphertext, block_index, block_size).ok_or(unrecoverable.clone())?;

    let known = [probe.as_slice(), recovered].concat();
    let dictionary = CandidateDictionary::build(oracle, &known, block_index, block_size)?;
    match dictionary.lookup(target) {
        Lookup::Hit(byte) => Ok(Step::Byte(byte)),
        Lookup::Miss | Lookup::Ambiguous => Err(unrecoverable),
    }
}

/// Drives the whole attack against a single oracle.
#[derive(Debug)]
pub struct ByteRecoveryEngine<'a, O: ?Sized> {
    oracle: &'a O,
    filler: u8,
}

impl<'a, O: Oracle + Sync + ?Sized> ByteRecoveryEngine<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self {
            oracle,
            filler: DEFAULT_FILLER,
        }
    }

    pub fn with_filler(mut self, filler: u8) -> Self {
        self.filler = filler;
        self
    }

    pub fn block_size(&self) -> Result<BlockSizeProbe> {
        guess_block_size(self.oracle)
    }

    pub fn layout(&self) -> Result<OracleLayout> {
        let probe = self.block_size()?;
        discover_layout(self.oracle, &probe)
    }

    /// Measure the oracle, then recover its suffix byte by byte.
    #[instrument(skip_all)]
    pub fn recover(&self) -> Result<RecoveredSecret> {
        let layout = self.layout()?;
        self.recover_with_layout(&layout)
    }

    /// Recover the suffix of an oracle whose layout is already known.
    #[instrument(skip_all, fields(suffix_len = layout.suffix_len))]
    pub fn recover_with_layout(&self, layout: &OracleLayout) -> Result<RecoveredSecret> {
        let mut secret = RecoveredSecret(Vec::with_capacity(layout.suffix_len));
        loop {
            match next_byte(self.oracle, layout, self.filler, secret.as_bytes())? {
                Step::Byte(byte) => {
                    trace!(position = secret.len(), byte, "recovered byte");
                    secret.push(byte);
                }
                Step::Complete => break,
            }
        }
        debug!(len = secret.len(), "recovered hidden suffix");
        Ok(secret)
    }
}

/// Recover the hidden suffix of a deterministic block cipher oracle.
pub fn recover_suffix<O: Oracle + Sync + ?Sized>(oracle: &O) -> Result<Vec<u8>> {
    ByteRecoveryEngine::new(oracle)
        .recover()
        .map(RecoveredSecret::into_bytes)
}
