//! OS-entropy-backed initial password generation.

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::domain::ports::{PasswordGenerator, PasswordGeneratorError};
use crate::domain::{INITIAL_PASSWORD_LEN, InitialPassword};

/// Alphanumeric alphabet with the easily confused characters (`0`, `O`,
/// `1`, `l`, `I`) removed; these passwords are read out of a welcome email
/// and typed once.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

/// Password generator drawing from the operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandomPasswordGenerator;

impl OsRandomPasswordGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self
    }
}

impl PasswordGenerator for OsRandomPasswordGenerator {
    fn generate(&self) -> Result<InitialPassword, PasswordGeneratorError> {
        let mut rng = OsRng;
        let len = ALPHABET.len() as u32;
        // Rejection sampling keeps the character distribution uniform.
        let bound = u32::MAX - u32::MAX % len;

        let mut out = String::with_capacity(INITIAL_PASSWORD_LEN);
        while out.len() < INITIAL_PASSWORD_LEN {
            let sample = rng
                .try_next_u32()
                .map_err(|err| PasswordGeneratorError::entropy(err.to_string()))?;
            if sample >= bound {
                continue;
            }
            out.push(char::from(ALPHABET[(sample % len) as usize]));
        }
        Ok(InitialPassword::new(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_passwords_of_contract_length() {
        let password = OsRandomPasswordGenerator::new()
            .generate()
            .expect("entropy available");
        assert_eq!(password.reveal().chars().count(), INITIAL_PASSWORD_LEN);
    }

    #[test]
    fn draws_only_from_the_alphabet() {
        let password = OsRandomPasswordGenerator::new()
            .generate()
            .expect("entropy available");
        for byte in password.reveal().bytes() {
            assert!(ALPHABET.contains(&byte), "unexpected character {byte}");
        }
    }

    #[test]
    fn successive_passwords_differ() {
        let generator = OsRandomPasswordGenerator::new();
        let first = generator.generate().expect("entropy available");
        let second = generator.generate().expect("entropy available");
        // 57^8 possibilities; a collision here means the source is broken.
        assert_ne!(first.reveal(), second.reveal());
    }
}
