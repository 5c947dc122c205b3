// Cipher block chaining mode built by hand on top of the block primitive.
use crate::{
    block::{check_ciphertext, check_key},
    pkcs7_pad, pkcs7_unpad_in_place, xor_bytes, AesBlock, BlockCipher, Error, Result,
};

/// Encrypt `plaintext` in cipher block chaining mode.
///
/// The plaintext is PKCS#7 padded first. Each padded block is XOR-ed with the
/// previous ciphertext block (the IV for the first block) before being passed
/// through the block cipher.
pub fn encrypt_cbc<C: BlockCipher>(
    cipher: &C,
    plaintext: &[u8],
    key: &[u8],
    iv: &[u8],
) -> Result<Vec<u8>> {
    check_key(cipher, key)?;
    check_iv(cipher, iv)?;
    let block_size = cipher.block_size();
    let padded = pkcs7_pad(plaintext, block_size);

    let mut ciphertext = Vec::with_capacity(padded.len());
    let mut last_block = iv.to_vec();
    for plaintext_block in padded.chunks_exact(block_size) {
        let message_buf = xor_bytes(plaintext_block, &last_block)?;
        let ciphertext_buf = cipher.encrypt_block(key, &message_buf)?;
        ciphertext.extend_from_slice(&ciphertext_buf);
        last_block = ciphertext_buf;
    }
    Ok(ciphertext)
}

/// Decrypt CBC `ciphertext` and strip its PKCS#7 padding.
///
/// Block `i` is recovered as `D(c[i]) ^ c[i - 1]`, the chain value being the
/// previous *ciphertext* block rather than the previous plaintext.
pub fn decrypt_cbc<C: BlockCipher>(
    cipher: &C,
    ciphertext: &[u8],
    key: &[u8],
    iv: &[u8],
) -> Result<Vec<u8>> {
    check_key(cipher, key)?;
    check_iv(cipher, iv)?;
    check_ciphertext(cipher, ciphertext)?;
    let block_size = cipher.block_size();

    let mut message = Vec::with_capacity(ciphertext.len());
    let mut last_block = iv;
    for ciphertext_block in ciphertext.chunks_exact(block_size) {
        let message_buf = cipher.decrypt_block(key, ciphertext_block)?;
        message.extend(xor_bytes(&message_buf, last_block)?);
        last_block = ciphertext_block;
    }
    pkcs7_unpad_in_place(&mut message, block_size)?;
    Ok(message)
}

pub fn encrypt_aes_128_cbc(plaintext: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Result<Vec<u8>> {
    encrypt_cbc(&AesBlock, plaintext, key, iv)
}

pub fn decrypt_aes_128_cbc(ciphertext: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Result<Vec<u8>> {
    decrypt_cbc(&AesBlock, ciphertext, key, iv)
}

fn check_iv<C: BlockCipher>(cipher: &C, iv: &[u8]) -> Result<()> {
    if iv.len() != cipher.block_size() {
        return Err(Error::InvalidIvLength {
            expected: cipher.block_size(),
            actual: iv.len(),
        });
    }
    Ok(())
}
