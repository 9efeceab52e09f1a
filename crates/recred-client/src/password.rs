//! Password policy generation and the batch assignment strategy.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::PolicyError;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";

/// Symbol set accepted by the remote password policy.
pub const SYMBOLS: &[u8] = b"!@#$%^&*";

/// Minimum length able to hold all four mandatory character classes.
pub const MIN_LENGTH: usize = 4;

/// Generate a random credential of exactly `length` characters.
///
/// The output always contains at least one uppercase letter, one lowercase
/// letter, one digit and one symbol from [`SYMBOLS`]; the remaining
/// characters are drawn uniformly from the union alphabet and the whole
/// sequence is shuffled so the mandatory classes are not positionally
/// fixed. Randomness comes from the operating system CSPRNG since
/// generated values are live credentials.
pub fn generate(length: usize) -> Result<String, PolicyError> {
    if length < MIN_LENGTH {
        return Err(PolicyError::TooShort(length));
    }

    let mut rng = OsRng;
    let mut chars = vec![
        UPPER[rng.gen_range(0..UPPER.len())],
        LOWER[rng.gen_range(0..LOWER.len())],
        DIGITS[rng.gen_range(0..DIGITS.len())],
        SYMBOLS[rng.gen_range(0..SYMBOLS.len())],
    ];

    let union: Vec<u8> = [UPPER, LOWER, DIGITS, SYMBOLS].concat();
    for _ in MIN_LENGTH..length {
        chars.push(union[rng.gen_range(0..union.len())]);
    }
    chars.shuffle(&mut rng);

    Ok(String::from_utf8(chars).expect("password alphabets are ASCII"))
}

/// How new secrets are assigned across the batch.
///
/// Exactly one variant is active per run: a non-blank operator-supplied
/// password becomes `Common`, otherwise every record receives an
/// independently generated secret.
#[derive(Clone)]
pub enum PasswordAssignment {
    /// One shared secret applied to every record.
    Common(String),
    /// A fresh secret of `length` characters per record.
    PerUser { length: usize },
}

impl PasswordAssignment {
    /// Select the strategy from operator input.
    #[must_use]
    pub fn from_operator_input(supplied: Option<&str>, length: usize) -> Self {
        match supplied {
            Some(p) if !p.trim().is_empty() => Self::Common(p.to_string()),
            _ => Self::PerUser { length },
        }
    }

    /// Resolve the secret for the next record.
    ///
    /// Generated lazily under `PerUser` so two records never share a value.
    pub fn next_secret(&self) -> Result<String, PolicyError> {
        match self {
            Self::Common(secret) => Ok(secret.clone()),
            Self::PerUser { length } => generate(*length),
        }
    }

    #[must_use]
    pub fn is_common(&self) -> bool {
        matches!(self, Self::Common(_))
    }
}

impl std::fmt::Debug for PasswordAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Common(_) => f.debug_tuple("Common").field(&"[REDACTED]").finish(),
            Self::PerUser { length } => {
                f.debug_struct("PerUser").field("length", length).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn class_counts(password: &str) -> (usize, usize, usize, usize) {
        let upper = password.chars().filter(char::is_ascii_uppercase).count();
        let lower = password.chars().filter(char::is_ascii_lowercase).count();
        let digit = password.chars().filter(char::is_ascii_digit).count();
        let symbol = password
            .chars()
            .filter(|c| SYMBOLS.contains(&(*c as u8)))
            .count();
        (upper, lower, digit, symbol)
    }

    #[test]
    fn generated_password_has_requested_length() {
        for length in [4, 8, 12, 32] {
            assert_eq!(generate(length).unwrap().chars().count(), length);
        }
    }

    #[test]
    fn generated_password_covers_all_classes() {
        for _ in 0..200 {
            let password = generate(12).unwrap();
            let (upper, lower, digit, symbol) = class_counts(&password);
            assert!(upper >= 1, "no uppercase in {password:?}");
            assert!(lower >= 1, "no lowercase in {password:?}");
            assert!(digit >= 1, "no digit in {password:?}");
            assert!(symbol >= 1, "no symbol in {password:?}");
        }
    }

    #[test]
    fn minimum_length_password_is_one_of_each_class() {
        let password = generate(4).unwrap();
        let (upper, lower, digit, symbol) = class_counts(&password);
        assert_eq!((upper, lower, digit, symbol), (1, 1, 1, 1));
    }

    #[test]
    fn length_below_minimum_is_rejected() {
        for length in 0..4 {
            assert_eq!(generate(length).unwrap_err(), PolicyError::TooShort(length));
        }
    }

    #[test]
    fn thousand_generated_passwords_are_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate(12).unwrap()));
        }
    }

    #[test]
    fn supplied_password_selects_common() {
        let assignment = PasswordAssignment::from_operator_input(Some("Fixed#1pw"), 12);
        assert!(assignment.is_common());
        assert_eq!(assignment.next_secret().unwrap(), "Fixed#1pw");
        assert_eq!(assignment.next_secret().unwrap(), "Fixed#1pw");
    }

    #[test]
    fn blank_password_selects_per_user() {
        for supplied in [None, Some(""), Some("   ")] {
            let assignment = PasswordAssignment::from_operator_input(supplied, 12);
            assert!(!assignment.is_common());
        }
    }

    #[test]
    fn per_user_secrets_differ_between_calls() {
        let assignment = PasswordAssignment::from_operator_input(None, 12);
        let first = assignment.next_secret().unwrap();
        let second = assignment.next_secret().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn debug_never_shows_the_common_secret() {
        let assignment = PasswordAssignment::from_operator_input(Some("TopSecret1!"), 12);
        let rendered = format!("{assignment:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("TopSecret1!"));
    }
}
