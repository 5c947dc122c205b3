// PKCS#7 padding
use crate::{Error, Result};

/// Pad `bytes` up to the next multiple of `block_size`.
///
/// A buffer that is already a multiple of the block size gains a whole
/// block of padding, so the result is always strictly longer than the input.
///
/// # Panics
///
/// Panics if `block_size` is zero or does not fit in a byte.
pub fn pkcs7_pad(bytes: &[u8], block_size: usize) -> Vec<u8> {
    assert!(
        (1..=u8::MAX as usize).contains(&block_size),
        "pkcs7 block size must be in 1..=255, got {block_size}"
    );
    let n_pad = block_size - (bytes.len() % block_size);
    let mut out = Vec::with_capacity(bytes.len() + n_pad);
    out.extend_from_slice(bytes);
    out.resize(bytes.len() + n_pad, n_pad as u8);
    out
}

/// Return the number of padding bytes on the end of `bytes`.
pub fn validate_pkcs7(bytes: &[u8], block_size: usize) -> Result<u8> {
    let n_pad = *bytes.last().ok_or(Error::InvalidPadding)?;
    let n = n_pad as usize;
    if n == 0 || n > block_size || n > bytes.len() {
        return Err(Error::InvalidPadding);
    }
    if !bytes[(bytes.len() - n)..].iter().all(|&b| b == n_pad) {
        return Err(Error::InvalidPadding);
    }
    Ok(n_pad)
}

pub fn pkcs7_unpad(bytes: &[u8], block_size: usize) -> Result<&[u8]> {
    let n_pad = validate_pkcs7(bytes, block_size)?;
    Ok(&bytes[..(bytes.len() - n_pad as usize)])
}

pub fn pkcs7_unpad_in_place(bytes: &mut Vec<u8>, block_size: usize) -> Result<()> {
    let n_pad = validate_pkcs7(bytes, block_size)?;
    bytes.truncate(bytes.len() - n_pad as usize);
    Ok(())
}
