use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use crate::utils::errors::AccountError;

pub const RESET_TOKEN_BYTES: usize = 32;

///
/// A hex-encoded token from the OS random source. If the OS can't provide entropy this fails
/// rather than falling back to a weaker source.
///
pub fn generate() -> Result<String, AccountError> {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(hex::encode(bytes))
}

///
/// The one-way form of a token that is stored and searched on.
///
pub fn hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_sha256_hex() {
        assert_eq!(hash("abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn test_generated_tokens_are_64_hex_chars() -> Result<(), AccountError> {
        let token = generate()?;
        assert_eq!(token.len(), RESET_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(generate()?, token);
        Ok(())
    }
}
