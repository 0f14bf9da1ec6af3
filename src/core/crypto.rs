use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use keyring::Entry;
use rand::RngCore;

// ── Sealed text (AES-256-GCM) ────────────────────────────────────────────────
//
// Wire layout: base64( nonce[12] ‖ ciphertext ).  A fresh nonce is drawn for
// every seal, so sealing the same plaintext twice never repeats output.

pub const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

const KEYCHAIN_SERVICE: &str = "styledesk_desktop";
const KEYCHAIN_ARCHIVE_KEY: &str = "archive-key";

pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<String, String> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| "Encryption failed".to_string())?;

    let mut buf = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    buf.extend_from_slice(&nonce);
    buf.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(buf))
}

pub fn open(key: &[u8; KEY_LEN], sealed: &str) -> Result<Vec<u8>, String> {
    let raw = STANDARD
        .decode(sealed.trim())
        .map_err(|e| format!("Invalid sealed data: {}", e))?;
    if raw.len() < NONCE_LEN {
        return Err("Sealed data is too short".to_string());
    }
    let (nonce, ciphertext) = raw.split_at(NONCE_LEN);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| "Decryption failed: wrong key or corrupted data".to_string())
}

/// Returns the archive key from the system keychain, generating and storing
/// a fresh one on first use.  Sealed archives are therefore only readable on
/// machines that share this keychain entry.
pub fn get_or_create_archive_key() -> Result<[u8; KEY_LEN], String> {
    let entry = Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_ARCHIVE_KEY).map_err(|e| e.to_string())?;
    match entry.get_password() {
        Ok(stored) => {
            let bytes = hex::decode(stored.trim())
                .map_err(|e| format!("Invalid stored archive key: {}", e))?;
            bytes
                .try_into()
                .map_err(|_| "Stored archive key has the wrong length".to_string())
        }
        Err(keyring::Error::NoEntry) => {
            let mut key = [0u8; KEY_LEN];
            rand::rng().fill_bytes(&mut key);
            entry
                .set_password(&hex::encode(key))
                .map_err(|e| e.to_string())?;
            Ok(key)
        }
        Err(e) => Err(e.to_string()),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [7u8; KEY_LEN];

    #[test]
    fn test_seal_open_round_trip() {
        let sealed = seal(&KEY, b"body { background: #111; }").unwrap();
        let opened = open(&KEY, &sealed).unwrap();
        assert_eq!(opened, b"body { background: #111; }");
    }

    #[test]
    fn test_seal_is_randomised() {
        let a = seal(&KEY, b"same input").unwrap();
        let b = seal(&KEY, b"same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_open_rejects_wrong_key() {
        let sealed = seal(&KEY, b"secret").unwrap();
        let other = [9u8; KEY_LEN];
        assert!(open(&other, &sealed).is_err());
    }

    #[test]
    fn test_open_rejects_tampered_data() {
        let sealed = seal(&KEY, b"secret").unwrap();
        let mut raw = STANDARD.decode(&sealed).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = STANDARD.encode(raw);
        assert!(open(&KEY, &tampered).is_err());
    }

    #[test]
    fn test_open_rejects_garbage() {
        assert!(open(&KEY, "not base64 at all!").is_err());
        assert!(open(&KEY, "AAAA").is_err());
    }
}
