//! The value carried by a channel for one clock cycle.

use std::fmt;

/// A value driven onto a channel.
///
/// Hardware nets in SME carry either a single bit or a fixed-width
/// integer. Widths and signedness are not part of the value itself;
/// they belong to the channel's [`TypeKind`](crate::TypeKind), which
/// checks range on write.
///
/// `Display` renders booleans as `0`/`1` and integers in base 10, which
/// is exactly the trace-file encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    /// A single-bit value.
    Bool(bool),
    /// An integer value of at most 128 bits.
    Int(i128),
}

impl Value {
    /// The value as a boolean.
    ///
    /// Integers are truthy when non-zero, matching how a one-bit wire is
    /// read by downstream logic.
    pub fn as_bool(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Int(i) => i != 0,
        }
    }

    /// The value as an integer (`false` = 0, `true` = 1).
    pub fn as_int(self) -> i128 {
        match self {
            Self::Bool(b) => i128::from(b),
            Self::Int(i) => i,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_int())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(i128::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);
