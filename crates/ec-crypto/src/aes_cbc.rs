//! AES-128-CBC with PKCS#7 padding.
//!
//! The upstream protocol uses unauthenticated CBC with 16-byte keys. There is no tag, so a
//! wrong key or IV is only detected when the padding or the plaintext does not make sense.

use crate::constants::{IV_LEN, KEY_LEN};
use crate::{Error, Result};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Encrypt `plaintext` with AES-128-CBC and PKCS#7 padding.
///
/// # Returns
/// Raw ciphertext; length is the padded plaintext length (a multiple of 16).
///
/// # Example
/// ```
/// use ec_crypto::aes_cbc::encrypt;
///
/// let ciphertext = encrypt(&[0x42; 16], &[0x01; 16], b"hello").unwrap();
/// assert_eq!(ciphertext.len(), 16);
/// ```
pub fn encrypt(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes128CbcEnc::new_from_slices(key, iv)
        .map_err(|_| Error::InvalidKeyLength("AES-128-CBC expects a 16-byte key and IV".into()))?;

    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt AES-128-CBC ciphertext and strip PKCS#7 padding.
///
/// # Errors
/// Returns `Error::Decryption` if the ciphertext is not block aligned or the padding is invalid.
pub fn decrypt(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes128CbcDec::new_from_slices(key, iv)
        .map_err(|_| Error::InvalidKeyLength("AES-128-CBC expects a 16-byte key and IV".into()))?;

    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| Error::Decryption("invalid block alignment or padding".into()))
}
