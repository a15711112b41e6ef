//! Sample-code validation.
//!
//! Which strings count as sample codes is a deployment decision; the codec
//! only asks a validator.

use regex::Regex;

/// Decides whether a cell value is a sample code.
pub trait SampleCodeValidator {
    fn is_valid(&self, code: &str) -> bool;
}

/// Accepts any non-blank code.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyCode;

impl SampleCodeValidator for NonEmptyCode {
    fn is_valid(&self, code: &str) -> bool {
        !code.trim().is_empty()
    }
}

/// Accepts non-blank codes matching a regular expression.
#[derive(Debug, Clone)]
pub struct PatternCode {
    pattern: Regex,
}

impl PatternCode {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl SampleCodeValidator for PatternCode {
    fn is_valid(&self, code: &str) -> bool {
        let code = code.trim();
        !code.is_empty() && self.pattern.is_match(code)
    }
}

impl<F> SampleCodeValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid(&self, code: &str) -> bool {
        self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_rejects_blank() {
        assert!(NonEmptyCode.is_valid("100001"));
        assert!(!NonEmptyCode.is_valid(""));
        assert!(!NonEmptyCode.is_valid("   "));
    }

    #[test]
    fn pattern_matches_trimmed_code() {
        let validator = PatternCode::new("^[0-9]{6}$").expect("pattern");
        assert!(validator.is_valid("100001"));
        assert!(validator.is_valid(" 100001 "));
        assert!(!validator.is_valid("10001"));
        assert!(!validator.is_valid("ABCDEF"));
    }

    #[test]
    fn closures_are_validators() {
        let starts_with_s = |code: &str| code.starts_with('S');
        assert!(starts_with_s.is_valid("S5"));
        assert!(!starts_with_s.is_valid("X5"));
    }
}
