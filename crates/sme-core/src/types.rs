//! Channel type descriptors and the compact type-tag grammar.
//!
//! A type tag is one of:
//!
//! ```text
//! b          boolean
//! i<width>   signed integer of <width> bits
//! u<width>   unsigned integer of <width> bits
//! ```
//!
//! `<width>` is a positive decimal integer. Anything else (`"u"`, `"i-1"`,
//! `"x3"`, `"i0"`) is rejected with [`TypeError::InvalidType`] when the
//! descriptor is built, never later.

use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;
use crate::value::Value;

/// Width and signedness of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A single bit.
    Boolean,
    /// Two's-complement signed integer.
    Signed {
        /// Bit width, always at least 1.
        width: u32,
    },
    /// Unsigned integer.
    Unsigned {
        /// Bit width, always at least 1.
        width: u32,
    },
}

impl TypeKind {
    /// Bit width, or `None` for [`TypeKind::Boolean`].
    pub fn width(self) -> Option<u32> {
        match self {
            Self::Boolean => None,
            Self::Signed { width } | Self::Unsigned { width } => Some(width),
        }
    }

    /// Whether `value` is representable in this type.
    ///
    /// Booleans accept `Bool` and the integers 0 and 1. Integer types
    /// accept any value whose integer reading fits the width.
    pub fn admits(self, value: Value) -> bool {
        let v = value.as_int();
        match self {
            Self::Boolean => v == 0 || v == 1,
            Self::Unsigned { width } => v >= 0 && (width >= 127 || v < (1i128 << width)),
            Self::Signed { width } => {
                if width >= 128 {
                    return true;
                }
                let half = 1i128 << (width - 1);
                (-half..half).contains(&v)
            }
        }
    }
}

impl FromStr for TypeKind {
    type Err = TypeError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeError::InvalidType {
            tag: tag.to_string(),
        };
        if tag == "b" {
            return Ok(Self::Boolean);
        }

        let (signed, digits) = match tag.split_at_checked(1) {
            Some(("i", rest)) => (true, rest),
            Some(("u", rest)) => (false, rest),
            _ => return Err(invalid()),
        };
        // `u32::from_str` tolerates a leading '+', the grammar does not.
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let width: u32 = digits.parse().map_err(|_| invalid())?;
        if width == 0 {
            return Err(invalid());
        }

        Ok(if signed {
            Self::Signed { width }
        } else {
            Self::Unsigned { width }
        })
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "b"),
            Self::Signed { width } => write!(f, "i{width}"),
            Self::Unsigned { width } => write!(f, "u{width}"),
        }
    }
}

/// A named, immutable channel type.
///
/// # Examples
///
/// ```
/// use sme_core::{TypeDescriptor, TypeKind};
///
/// let data = TypeDescriptor::parse("data", "u8").unwrap();
/// assert_eq!(data.kind(), TypeKind::Unsigned { width: 8 });
/// assert!(TypeDescriptor::parse("bad", "x3").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
}

impl TypeDescriptor {
    /// Build a descriptor from a type tag.
    pub fn parse(name: impl Into<String>, tag: &str) -> Result<Self, TypeError> {
        Ok(Self {
            name: name.into(),
            kind: tag.parse()?,
        })
    }

    /// Build a descriptor from an already-validated kind.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// The descriptor's name (usually the channel it types).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width and signedness.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_tag_forms() {
        assert_eq!("b".parse::<TypeKind>().unwrap(), TypeKind::Boolean);
        assert_eq!(
            "u8".parse::<TypeKind>().unwrap(),
            TypeKind::Unsigned { width: 8 }
        );
        assert_eq!(
            "i16".parse::<TypeKind>().unwrap(),
            TypeKind::Signed { width: 16 }
        );
    }

    #[test]
    fn rejects_malformed_tags() {
        for tag in ["u", "i", "x3", "i-1", "i0", "u+8", "", "b1", "U8", "i 8", "u99999999999"] {
            assert_eq!(
                tag.parse::<TypeKind>(),
                Err(TypeError::InvalidType {
                    tag: tag.to_string()
                }),
                "tag {tag:?} should be rejected"
            );
        }
    }

    #[test]
    fn unsigned_range_check() {
        let u8_ = TypeKind::Unsigned { width: 8 };
        assert!(u8_.admits(Value::Int(0)));
        assert!(u8_.admits(Value::Int(255)));
        assert!(!u8_.admits(Value::Int(256)));
        assert!(!u8_.admits(Value::Int(-1)));
    }

    #[test]
    fn signed_range_check() {
        let i4 = TypeKind::Signed { width: 4 };
        assert!(i4.admits(Value::Int(-8)));
        assert!(i4.admits(Value::Int(7)));
        assert!(!i4.admits(Value::Int(8)));
        assert!(!i4.admits(Value::Int(-9)));
        assert!(TypeKind::Signed { width: 128 }.admits(Value::Int(i128::MIN)));
    }

    #[test]
    fn wide_unsigned_admits_any_non_negative() {
        let u127 = TypeKind::Unsigned { width: 127 };
        assert!(u127.admits(Value::Int(i128::MAX)));
        assert!(!u127.admits(Value::Int(-1)));
    }

    #[test]
    fn boolean_admits_bits_only() {
        assert!(TypeKind::Boolean.admits(Value::Bool(true)));
        assert!(TypeKind::Boolean.admits(Value::Int(1)));
        assert!(!TypeKind::Boolean.admits(Value::Int(2)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn display_parses_back(width in 1u32..=4096, signed in any::<bool>()) {
                let kind = if signed {
                    TypeKind::Signed { width }
                } else {
                    TypeKind::Unsigned { width }
                };
                prop_assert_eq!(kind.to_string().parse::<TypeKind>().unwrap(), kind);
            }

            #[test]
            fn unsigned_bound_is_exact(width in 1u32..=64) {
                let kind = TypeKind::Unsigned { width };
                let max = (1i128 << width) - 1;
                prop_assert!(kind.admits(Value::Int(max)));
                prop_assert!(!kind.admits(Value::Int(max + 1)));
            }
        }
    }
}
