//! Input checks for animal records.
//!
//! These are pure functions: they never touch the store, so the repository
//! can run them before any write and handlers can reuse the same codes.

use serde::{Serialize, Serializer};

pub const NAME_TOO_SHORT: &str = "name_too_short";
pub const AGE_IS_NOT_A_NUMBER: &str = "age_is_not_a_number";
pub const AGE_IS_NOT_POSITIVE: &str = "age_is_not_positive";
pub const BREED_TOO_SHORT: &str = "breed_too_short";

const MIN_TEXT_LEN: usize = 4;

/// Error code to user-facing message, one entry per failed check, kept in
/// the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<(String, String)>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure. A repeated code keeps its position and takes the
    /// new message.
    pub fn insert(&mut self, code: &str, message: &str) {
        match self.0.iter_mut().find(|(c, _)| c == code) {
            Some(entry) => entry.1 = message.to_string(),
            None => self.0.push((code.to_string(), message.to_string())),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|(c, _)| c == code)
    }

    pub fn message(&self, code: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, m)| m.as_str())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(c, _)| c.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(c, m)| (c, m)))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let codes: Vec<&str> = self.codes().collect();
        f.write_str(&codes.join(", "))
    }
}

/// Outcome of reading an age field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeCheck {
    NotANumber,
    NotPositive,
    Valid,
}

/// Classifies an age string.
///
/// A single leading `-` is allowed; the rest must be ASCII digits. Positivity
/// is decided from the sign and digits, so values wider than `i64` are
/// still classified.
pub fn check_age(age: &str) -> AgeCheck {
    let (negative, digits) = match age.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, age),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return AgeCheck::NotANumber;
    }
    let is_zero = digits.bytes().all(|b| b == b'0');
    if negative || is_zero {
        AgeCheck::NotPositive
    } else {
        AgeCheck::Valid
    }
}

/// Validates the fields of an animal. An empty result means the input is
/// acceptable.
pub fn validate_animal_input(name: &str, breed: &str, age: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if name.chars().count() < MIN_TEXT_LEN {
        errors.insert(
            NAME_TOO_SHORT,
            "Please ensure that name has more than 3 characters",
        );
    }

    match check_age(age) {
        AgeCheck::NotANumber => {
            errors.insert(AGE_IS_NOT_A_NUMBER, "Please ensure that age is a number")
        }
        AgeCheck::NotPositive => {
            errors.insert(AGE_IS_NOT_POSITIVE, "Please ensure that age is positive")
        }
        AgeCheck::Valid => {}
    }

    if breed.chars().count() < MIN_TEXT_LEN {
        errors.insert(
            BREED_TOO_SHORT,
            "Please ensure breed is more than 3 characters",
        );
    }

    errors
}
