// Encryption oracles with a hidden key, mode, prefix and suffix.
use std::{
    fmt,
    ops::RangeInclusive,
    sync::{Mutex, PoisonError},
};

use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

use crate::{encrypt_cbc, encrypt_ecb, AesBlock, BlockCipher, Result};

/// Something an attacker can feed chosen plaintext to and get ciphertext back.
pub trait Oracle {
    fn query(&self, input: &[u8]) -> Result<Vec<u8>>;
}

impl<F> Oracle for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>>,
{
    fn query(&self, input: &[u8]) -> Result<Vec<u8>> {
        self(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ecb,
    Cbc,
}

/// Construction parameters for an [`EncryptionOracle`].
///
/// Anything left unset is drawn from the oracle's random number generator
/// when it is built, and then fixed for the oracle's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    pub mode: Option<Mode>,
    pub prefix: Option<Vec<u8>>,
    pub suffix: Option<Vec<u8>>,
    pub prefix_len: RangeInclusive<usize>,
    pub suffix_len: RangeInclusive<usize>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            mode: None,
            prefix: None,
            suffix: None,
            prefix_len: 0..=256,
            suffix_len: 0..=256,
        }
    }
}

impl OracleConfig {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<Vec<u8>>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_prefix_len(mut self, range: RangeInclusive<usize>) -> Self {
        self.prefix_len = range;
        self
    }

    pub fn with_suffix_len(mut self, range: RangeInclusive<usize>) -> Self {
        self.suffix_len = range;
        self
    }
}

/// Encrypts `prefix || input || suffix` under a key and mode the caller
/// never gets to see.
///
/// The configuration is frozen at construction. In ECB mode the same input
/// always gives the same ciphertext; in CBC mode every query draws a fresh
/// IV, which is not returned.
pub struct EncryptionOracle<R = StdRng, C = AesBlock> {
    cipher: C,
    key: Vec<u8>,
    mode: Mode,
    prefix: Vec<u8>,
    suffix: Vec<u8>,
    rng: Mutex<R>,
}

impl EncryptionOracle {
    /// Build an oracle with every secret drawn from the operating system's
    /// entropy source.
    pub fn new() -> Self {
        Self::from_config(OracleConfig::default(), StdRng::from_entropy())
    }
}

impl Default for EncryptionOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> EncryptionOracle<R> {
    /// Build an AES oracle from `config`, drawing unset secrets from `rng`.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`EncryptionOracle::with_cipher`].
    pub fn from_config(config: OracleConfig, rng: R) -> Self {
        Self::with_cipher(AesBlock, config, rng)
    }
}

impl<R: RngCore, C: BlockCipher> EncryptionOracle<R, C> {
    /// Build an oracle around `cipher`, drawing unset secrets from `rng`.
    ///
    /// # Panics
    ///
    /// Panics if a random prefix or suffix is needed and its configured
    /// length range is empty, e.g. `10..=5`.
    pub fn with_cipher(cipher: C, config: OracleConfig, mut rng: R) -> Self {
        assert!(
            config.prefix.is_some() || !config.prefix_len.is_empty(),
            "prefix length range {:?} is empty",
            config.prefix_len
        );
        assert!(
            config.suffix.is_some() || !config.suffix_len.is_empty(),
            "suffix length range {:?} is empty",
            config.suffix_len
        );
        let mut key = vec![0u8; cipher.block_size()];
        rng.fill_bytes(&mut key);
        let mode = config.mode.unwrap_or_else(|| {
            if rng.gen_bool(0.5) {
                Mode::Ecb
            } else {
                Mode::Cbc
            }
        });
        let prefix = config
            .prefix
            .unwrap_or_else(|| random_bytes(&mut rng, config.prefix_len));
        let suffix = config
            .suffix
            .unwrap_or_else(|| random_bytes(&mut rng, config.suffix_len));
        Self {
            cipher,
            key,
            mode,
            prefix,
            suffix,
            rng: Mutex::new(rng),
        }
    }

    fn encrypt_with_iv(&self, input: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        let plaintext = [self.prefix.as_slice(), input, self.suffix.as_slice()].concat();
        match self.mode {
            Mode::Ecb => encrypt_ecb(&self.cipher, &plaintext, &self.key),
            Mode::Cbc => encrypt_cbc(&self.cipher, &plaintext, &self.key, iv),
        }
    }

    fn fresh_iv(&self) -> Vec<u8> {
        let mut iv = vec![0u8; self.cipher.block_size()];
        if self.mode == Mode::Cbc {
            // Poisoning cannot leave the generator half-updated.
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rng.fill_bytes(&mut iv);
        }
        iv
    }
}

impl<R: RngCore, C: BlockCipher> Oracle for EncryptionOracle<R, C> {
    fn query(&self, input: &[u8]) -> Result<Vec<u8>> {
        let iv = self.fresh_iv();
        self.encrypt_with_iv(input, &iv)
    }
}

impl<R, C> fmt::Debug for EncryptionOracle<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionOracle").finish_non_exhaustive()
    }
}

/// Encrypt `input` once under a brand new key and a randomly chosen mode,
/// surrounded by 5-10 random bytes on each side.
///
/// The chosen mode is returned alongside the ciphertext so a detector's
/// guess can be graded.
pub fn encrypt_with_random_mode<R: RngCore>(rng: &mut R, input: &[u8]) -> Result<(Vec<u8>, Mode)> {
    let config = OracleConfig::default()
        .with_prefix_len(5..=10)
        .with_suffix_len(5..=10);
    let oracle = EncryptionOracle::from_config(config, &mut *rng);
    let ciphertext = oracle.query(input)?;
    Ok((ciphertext, oracle.mode))
}

fn random_bytes<R: RngCore>(rng: &mut R, len: RangeInclusive<usize>) -> Vec<u8> {
    let mut bytes = vec![0u8; rng.gen_range(len)];
    rng.fill_bytes(&mut bytes);
    bytes
}
