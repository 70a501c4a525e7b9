use crate::entity::PayError;
use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bip39::Language;
use data_encoding::BASE32_NOPAD;
use ed25519_dalek::SigningKey;
use rand::{rng, RngCore};
use sha2::{Digest, Sha512_256};

const CHECKSUM_LEN: usize = 4;
const MNEMONIC_LEN: usize = 25;
const ADDRESS_LEN: usize = 58;

/// Generate new wallet. Returns (25-word mnemonic, address).
pub fn generate_wallet() -> Result<(String, String)> {
    // 32 bytes of entropy is the whole Ed25519 seed
    let mut seed = [0u8; 32];
    rng().fill_bytes(&mut seed);

    let signing_key = SigningKey::from_bytes(&seed);
    let address = encode_address(signing_key.verifying_key().as_bytes());
    let mnemonic = seed_to_mnemonic(&seed);

    Ok((mnemonic, address))
}

/// Address = base32(public key || last 4 bytes of SHA-512/256(public key)).
pub fn encode_address(public_key: &[u8; 32]) -> String {
    let digest = Sha512_256::digest(public_key);
    let mut bytes = [0u8; 36];
    bytes[..32].copy_from_slice(public_key);
    bytes[32..].copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    BASE32_NOPAD.encode(&bytes)
}

/// Decode an address into its public key, verifying the checksum.
pub fn decode_address(address: &str) -> Result<[u8; 32]> {
    if address.len() != ADDRESS_LEN {
        return Err(PayError::InvalidAddress.into());
    }

    let bytes = BASE32_NOPAD
        .decode(address.as_bytes())
        .map_err(|_| PayError::InvalidAddress)?;
    if bytes.len() != 32 + CHECKSUM_LEN {
        return Err(PayError::InvalidAddress.into());
    }

    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(&bytes[..32]);

    let digest = Sha512_256::digest(public_key);
    if digest[digest.len() - CHECKSUM_LEN..] != bytes[32..] {
        return Err(PayError::InvalidAddress.into());
    }

    Ok(public_key)
}

/// Encode a 32-byte seed as 24 data words plus one checksum word.
pub fn seed_to_mnemonic(seed: &[u8; 32]) -> String {
    let words = Language::English.word_list();

    let mut indices = to_u11(seed);
    let digest = Sha512_256::digest(seed);
    indices.push(to_u11(&digest[..2])[0]);

    indices
        .iter()
        .map(|i| words[*i as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recover the 32-byte seed from a 25-word mnemonic.
pub fn mnemonic_to_seed(mnemonic: &str) -> Result<[u8; 32]> {
    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    if words.len() != MNEMONIC_LEN {
        return Err(PayError::InvalidMnemonic(format!(
            "expected {} words, got {}",
            MNEMONIC_LEN,
            words.len()
        ))
        .into());
    }

    let mut indices = Vec::with_capacity(MNEMONIC_LEN);
    for word in &words {
        let index = Language::English
            .find_word(&word.to_lowercase())
            .ok_or_else(|| PayError::InvalidMnemonic(format!("unknown word '{}'", word)))?;
        indices.push(index);
    }

    let checksum = indices.pop().ok_or_else(|| anyhow!("empty mnemonic"))?;
    let bytes = from_u11(&indices);

    // 24 words carry 264 bits: 256 bits of seed and 8 zero bits
    if bytes.len() != 33 || bytes[32] != 0 {
        return Err(PayError::InvalidMnemonic("malformed key data".to_string()).into());
    }

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes[..32]);

    let digest = Sha512_256::digest(seed);
    if to_u11(&digest[..2])[0] != checksum {
        return Err(PayError::InvalidMnemonic("checksum mismatch".to_string()).into());
    }

    Ok(seed)
}

/// Restore signing key and address from a mnemonic
pub fn account_from_mnemonic(mnemonic: &str) -> Result<(SigningKey, String)> {
    let seed = mnemonic_to_seed(mnemonic)?;
    let signing_key = SigningKey::from_bytes(&seed);
    let address = encode_address(signing_key.verifying_key().as_bytes());
    Ok((signing_key, address))
}

/// Base64 wrapping used for the stored mnemonic column. This is not encryption.
pub fn obfuscate_mnemonic(mnemonic: &str) -> String {
    BASE64.encode(mnemonic.as_bytes())
}

pub fn reveal_mnemonic(stored: &str) -> Result<String> {
    let bytes = BASE64
        .decode(stored.trim())
        .map_err(|e| PayError::InvalidMnemonic(format!("stored value is not base64: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| PayError::InvalidMnemonic(format!("stored value is not utf-8: {}", e)).into())
}

// Little-endian regrouping of bytes into 11-bit word indices
fn to_u11(bytes: &[u8]) -> Vec<u16> {
    let mut out = Vec::new();
    let mut acc: u32 = 0;
    let mut bits = 0;

    for byte in bytes {
        acc |= (*byte as u32) << bits;
        bits += 8;
        if bits >= 11 {
            out.push((acc & 0x7ff) as u16);
            acc >>= 11;
            bits -= 11;
        }
    }
    if bits != 0 {
        out.push(acc as u16);
    }

    out
}

fn from_u11(indices: &[u16]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut acc: u32 = 0;
    let mut bits = 0;

    for index in indices {
        acc |= (*index as u32) << bits;
        bits += 11;
        while bits >= 8 {
            out.push((acc & 0xff) as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits != 0 {
        out.push(acc as u8);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::is_valid_algorand_address;

    const RFC8032_SEED: [u8; 32] = [
        0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c,
        0xc4, 0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae,
        0x7f, 0x60,
    ];

    #[test]
    fn test_address_from_known_key() {
        let key = SigningKey::from_bytes(&RFC8032_SEED);
        assert_eq!(
            encode_address(key.verifying_key().as_bytes()),
            "25NJQAMCWEFLPVKL73J4SZAHHIHOC4XT3KTCGJNPAINGR5YHKENMEF5QTE"
        );
    }

    #[test]
    fn test_decode_known_address() {
        let public_key =
            decode_address("7ZUECA7HFLZTXENRV24SHLU4AVPUTMTTDUFUBNBD64C73F3UHRTHAIOF6Q").unwrap();
        assert_eq!(public_key[0], 0xfe);
        assert_eq!(public_key[31], 0x66);
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        // last character changed, still well-formed base32
        let err = decode_address("7ZUECA7HFLZTXENRV24SHLU4AVPUTMTTDUFUBNBD64C73F3UHRTHAIOF6A")
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PayError>(),
            Some(PayError::InvalidAddress)
        ));
    }

    #[test]
    fn test_generated_wallet_is_consistent() {
        let (mnemonic, address) = generate_wallet().unwrap();
        assert_eq!(mnemonic.split_whitespace().count(), 25);
        assert!(is_valid_algorand_address(&address));

        let (_, restored) = account_from_mnemonic(&mnemonic).unwrap();
        assert_eq!(restored, address);
    }

    #[test]
    fn test_mnemonic_recovers_seed() {
        let mnemonic = seed_to_mnemonic(&RFC8032_SEED);
        assert_eq!(mnemonic_to_seed(&mnemonic).unwrap(), RFC8032_SEED);
    }

    #[test]
    fn test_mnemonic_rejects_swapped_checksum_word() {
        let mnemonic = seed_to_mnemonic(&RFC8032_SEED);
        let mut words: Vec<&str> = mnemonic.split_whitespace().collect();
        let replacement = if words[24] == "abandon" { "zoo" } else { "abandon" };
        words[24] = replacement;
        assert!(mnemonic_to_seed(&words.join(" ")).is_err());
    }

    #[test]
    fn test_mnemonic_rejects_wrong_length() {
        assert!(mnemonic_to_seed("abandon abandon abandon").is_err());
    }

    #[test]
    fn test_obfuscation_is_reversible_base64() {
        let stored = obfuscate_mnemonic("word word word");
        assert_eq!(stored, "d29yZCB3b3JkIHdvcmQ=");
        assert_eq!(reveal_mnemonic(&stored).unwrap(), "word word word");
    }
}
