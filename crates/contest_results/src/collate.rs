//! Locale-aware name ordering.

use crate::error::{Result, ResultsError};
use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use std::cmp::Ordering;
use std::fmt;

/// English collation for team names.
pub struct NameCollator {
    collator: Collator,
}

impl NameCollator {
    /// Loads the English collator at tertiary strength.
    pub fn english() -> Result<Self> {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);

        let collator = Collator::try_new(&locale!("en").into(), options)
            .map_err(|e| ResultsError::Collation(e.to_string()))?;

        Ok(Self { collator })
    }

    /// Compares two names.
    ///
    /// Names the collator considers equal fall back to byte order, so two
    /// distinct names never compare equal.
    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        self.collator
            .compare(left, right)
            .then_with(|| left.cmp(right))
    }
}

impl fmt::Debug for NameCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameCollator").field("locale", &"en").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_does_not_dominate() {
        let collator = NameCollator::english().unwrap();
        assert_eq!(collator.compare("alpha", "Beta"), Ordering::Less);
        assert_eq!(collator.compare("Beta", "alpha"), Ordering::Greater);
    }

    #[test]
    fn test_accents_sort_with_base_letter() {
        let collator = NameCollator::english().unwrap();
        assert_eq!(collator.compare("Álvarez", "Bakker"), Ordering::Less);
        assert_ne!(collator.compare("Álvarez", "Alvarez"), Ordering::Equal);
    }

    #[test]
    fn test_identical_names_are_equal() {
        let collator = NameCollator::english().unwrap();
        assert_eq!(collator.compare("Gamma", "Gamma"), Ordering::Equal);
    }
}
