//! Type System for stop
//!
//! The language has two value types. Statements that produce no value
//! (blocks) are typed as [`Type::Unit`].

use std::fmt;

/// Opening and closing marker of a string literal.
pub const STRING_DELIMITER: char = '|';

/// Resolved type of an expression or binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    String,
    Int,
    /// Marker for statements used where a type is asked for
    Unit,
}

impl Type {
    /// Classify a literal by its surface form.
    ///
    /// Text wrapped in a matching delimiter pair is a string, even when the
    /// inner text is all digits. Otherwise base-10 integer text is an int.
    /// Anything else is malformed and has no type.
    pub fn classify_literal(raw: &str) -> Option<Type> {
        let delimited = raw.len() >= 2
            && raw.starts_with(STRING_DELIMITER)
            && raw.ends_with(STRING_DELIMITER);
        if delimited {
            Some(Type::String)
        } else if raw.parse::<i64>().is_ok() {
            Some(Type::Int)
        } else {
            None
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::String => write!(f, "string"),
            Type::Int => write!(f, "int"),
            Type::Unit => write!(f, "no value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_digits_are_string() {
        assert_eq!(Type::classify_literal("|123|"), Some(Type::String));
        assert_eq!(Type::classify_literal("||"), Some(Type::String));
    }

    #[test]
    fn test_bare_digits_are_int() {
        assert_eq!(Type::classify_literal("42"), Some(Type::Int));
        assert_eq!(Type::classify_literal("007"), Some(Type::Int));
        assert_eq!(Type::classify_literal("2147483648"), Some(Type::Int));
    }

    #[test]
    fn test_int_range_is_64_bit() {
        assert_eq!(Type::classify_literal("9223372036854775807"), Some(Type::Int));
        assert_eq!(Type::classify_literal("9223372036854775808"), None);
    }

    #[test]
    fn test_malformed_literals() {
        assert_eq!(Type::classify_literal("abc"), None);
        assert_eq!(Type::classify_literal("|open"), None);
        assert_eq!(Type::classify_literal("|"), None);
        assert_eq!(Type::classify_literal(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::String.to_string(), "string");
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(Type::Unit.to_string(), "no value");
    }
}
