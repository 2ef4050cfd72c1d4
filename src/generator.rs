// src/generator.rs
use crate::error::{GeneratorError, GeneratorResult};
use rand::{thread_rng, Rng};

const UPPERCASE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const NUMBER_CHARS: &[u8] = b"0123456789";

pub const MIN_LENGTH: usize = 6;
pub const MAX_LENGTH: usize = 30;
pub const DEFAULT_LENGTH: usize = 12;

fn alphabet() -> Vec<u8> {
    [UPPERCASE_CHARS, LOWERCASE_CHARS, NUMBER_CHARS].concat()
}

/// Random alphanumeric password; every character is drawn independently.
pub fn generate_password(length: usize) -> GeneratorResult<String> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        log::warn!("Rejected password length {}", length);
        return Err(GeneratorError::LengthOutOfRange {
            length,
            min: MIN_LENGTH,
            max: MAX_LENGTH,
        });
    }

    let charset = alphabet();
    let mut rng = thread_rng();
    let password: String = (0..length)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect();

    log::debug!("Generated a password of length {}", length);
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_has_62_distinct_chars() {
        let mut chars = alphabet();
        chars.sort_unstable();
        chars.dedup();
        assert_eq!(chars.len(), 62);
    }

    #[test]
    fn test_generate_password_lengths_in_range() {
        for length in MIN_LENGTH..=MAX_LENGTH {
            let password = generate_password(length).unwrap();
            assert_eq!(password.len(), length);
            assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_generate_password_draws_from_whole_alphabet() {
        let mut seen: Vec<u8> = (0..200)
            .flat_map(|_| generate_password(MAX_LENGTH).unwrap().into_bytes())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, {
            let mut all = alphabet();
            all.sort_unstable();
            all
        });
    }

    #[test]
    fn test_generate_password_rejects_out_of_range() {
        for length in [0, MIN_LENGTH - 1, MAX_LENGTH + 1, 100] {
            assert_eq!(
                generate_password(length),
                Err(GeneratorError::LengthOutOfRange {
                    length,
                    min: MIN_LENGTH,
                    max: MAX_LENGTH
                })
            );
        }
    }

    #[test]
    fn test_generate_password_allows_repeated_chars() {
        // 30 draws from 62 symbols repeat a character with overwhelming probability.
        let repeated = (0..20).any(|_| {
            let mut bytes = generate_password(MAX_LENGTH).unwrap().into_bytes();
            bytes.sort_unstable();
            bytes.windows(2).any(|w| w[0] == w[1])
        });
        assert!(repeated);
    }

    #[test]
    fn test_generate_password_randomness() {
        let password_1 = generate_password(DEFAULT_LENGTH).unwrap();
        let password_2 = generate_password(DEFAULT_LENGTH).unwrap();
        assert_ne!(password_1, password_2, "Two generated passwords should generally differ.");
    }
}
