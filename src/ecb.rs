// Electronic codebook mode: every block is encrypted on its own.
use crate::{
    block::{check_ciphertext, check_key},
    pkcs7_pad, pkcs7_unpad_in_place, AesBlock, BlockCipher, Result,
};

pub fn encrypt_ecb<C: BlockCipher>(cipher: &C, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key(cipher, key)?;
    let block_size = cipher.block_size();
    let padded = pkcs7_pad(plaintext, block_size);
    let mut ciphertext = Vec::with_capacity(padded.len());
    for block in padded.chunks_exact(block_size) {
        ciphertext.extend(cipher.encrypt_block(key, block)?);
    }
    Ok(ciphertext)
}

pub fn decrypt_ecb<C: BlockCipher>(cipher: &C, ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key(cipher, key)?;
    check_ciphertext(cipher, ciphertext)?;
    let block_size = cipher.block_size();
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    for block in ciphertext.chunks_exact(block_size) {
        plaintext.extend(cipher.decrypt_block(key, block)?);
    }
    pkcs7_unpad_in_place(&mut plaintext, block_size)?;
    Ok(plaintext)
}

pub fn encrypt_aes_128_ecb(plaintext: &[u8], key: &[u8; 16]) -> Result<Vec<u8>> {
    encrypt_ecb(&AesBlock, plaintext, key)
}

pub fn decrypt_aes_128_ecb(ciphertext: &[u8], key: &[u8; 16]) -> Result<Vec<u8>> {
    decrypt_ecb(&AesBlock, ciphertext, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::Error;

    const KEY: &[u8; 16] = b"YELLOW SUBMARINE";

    #[test]
    fn identical_plaintext_blocks_encrypt_identically() {
        let plaintext = b"0123456789abcdef".repeat(3);

        let ciphertext = encrypt_aes_128_ecb(&plaintext, KEY).unwrap();

        assert_eq!(ciphertext.len(), 64);
        assert_eq!(ciphertext[0..16], ciphertext[16..32]);
        assert_eq!(ciphertext[16..32], ciphertext[32..48]);
        assert_ne!(ciphertext[32..48], ciphertext[48..64]);
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(16)]
    #[case(43)]
    fn decrypt_then_encrypt_returns_original_plaintext(#[case] len: usize) {
        let plaintext: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();

        let ciphertext = encrypt_aes_128_ecb(&plaintext, KEY).unwrap();

        assert_eq!(ciphertext.len(), (len / 16 + 1) * 16);
        assert_eq!(decrypt_aes_128_ecb(&ciphertext, KEY).unwrap(), plaintext);
    }

    #[rstest]
    #[case(0)]
    #[case(15)]
    #[case(33)]
    fn decrypt_rejects_partial_blocks(#[case] len: usize) {
        let result = decrypt_aes_128_ecb(&vec![0u8; len], KEY);

        assert_eq!(
            result,
            Err(Error::TruncatedCiphertext {
                len,
                block_size: 16
            })
        );
    }

    #[test]
    fn encrypt_rejects_short_key() {
        let result = encrypt_ecb(&AesBlock, b"hello", b"short key");

        assert_eq!(
            result,
            Err(Error::InvalidKeyLength {
                expected: 16,
                actual: 9
            })
        );
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"YELLOW".as_slice())]
    #[case(b"YELLOW SUBMARINE!".as_slice())]
    fn decrypt_rejects_bad_key(#[case] key: &[u8]) {
        let ciphertext = encrypt_aes_128_ecb(b"hello", KEY).unwrap();

        let result = decrypt_ecb(&AesBlock, &ciphertext, key);

        assert_eq!(
            result,
            Err(Error::InvalidKeyLength {
                expected: 16,
                actual: key.len()
            })
        );
    }
}
