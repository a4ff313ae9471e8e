//! Leaf values

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Value carried by a leaf, leaf-list entry or key leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum LeafValue {
    /// Value of an `empty`-typed leaf
    Empty,
    Bool(bool),
    Int(i64),
    Uint(u64),
    String(String),
    Binary(Vec<u8>),
}

impl LeafValue {
    /// Canonical text form
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafValue::Empty => Ok(()),
            LeafValue::Bool(v) => write!(f, "{}", v),
            LeafValue::Int(v) => write!(f, "{}", v),
            LeafValue::Uint(v) => write!(f, "{}", v),
            LeafValue::String(v) => f.write_str(v),
            LeafValue::Binary(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for LeafValue {
    fn from(v: bool) -> Self {
        LeafValue::Bool(v)
    }
}

impl From<String> for LeafValue {
    fn from(v: String) -> Self {
        LeafValue::String(v)
    }
}

impl From<&str> for LeafValue {
    fn from(v: &str) -> Self {
        LeafValue::String(v.to_string())
    }
}

impl From<Vec<u8>> for LeafValue {
    fn from(v: Vec<u8>) -> Self {
        LeafValue::Binary(v)
    }
}

macro_rules! signed_leaf_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LeafValue {
                fn from(v: $ty) -> Self {
                    LeafValue::Int(i64::from(v))
                }
            }

            impl FromLeafValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_leaf_value(value: &LeafValue) -> Result<Self, FieldError> {
                    let converted = match value {
                        LeafValue::Int(v) => <$ty>::try_from(*v).ok(),
                        LeafValue::Uint(v) => <$ty>::try_from(*v).ok(),
                        LeafValue::String(s) => s.trim().parse().ok(),
                        _ => None,
                    };
                    converted.ok_or_else(|| invalid::<Self>(value))
                }
            }
        )*
    };
}

macro_rules! unsigned_leaf_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LeafValue {
                fn from(v: $ty) -> Self {
                    LeafValue::Uint(u64::from(v))
                }
            }

            impl FromLeafValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_leaf_value(value: &LeafValue) -> Result<Self, FieldError> {
                    let converted = match value {
                        LeafValue::Uint(v) => <$ty>::try_from(*v).ok(),
                        LeafValue::Int(v) => <$ty>::try_from(*v).ok(),
                        LeafValue::String(s) => s.trim().parse().ok(),
                        _ => None,
                    };
                    converted.ok_or_else(|| invalid::<Self>(value))
                }
            }
        )*
    };
}

/// Conversion from a [`LeafValue`] into the native type of a generated field
///
/// Canonical string forms are accepted so that values decoded by text
/// serializers can be stored on typed fields.
pub trait FromLeafValue: Sized {
    /// Type name used in diagnostics
    const TYPE_NAME: &'static str;

    fn from_leaf_value(value: &LeafValue) -> Result<Self, FieldError>;
}

fn invalid<T: FromLeafValue>(value: &LeafValue) -> FieldError {
    FieldError::InvalidValue {
        value: format!("{:?}", value),
        expected: T::TYPE_NAME,
    }
}

signed_leaf_value!(i8, i16, i32, i64);
unsigned_leaf_value!(u8, u16, u32, u64);

impl FromLeafValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_leaf_value(value: &LeafValue) -> Result<Self, FieldError> {
        match value {
            LeafValue::Bool(v) => Ok(*v),
            LeafValue::String(s) if s == "true" => Ok(true),
            LeafValue::String(s) if s == "false" => Ok(false),
            _ => Err(invalid::<Self>(value)),
        }
    }
}

impl FromLeafValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_leaf_value(value: &LeafValue) -> Result<Self, FieldError> {
        match value {
            LeafValue::String(s) => Ok(s.clone()),
            LeafValue::Empty | LeafValue::Binary(_) => Err(invalid::<Self>(value)),
            other => Ok(other.to_string()),
        }
    }
}

impl FromLeafValue for Vec<u8> {
    const TYPE_NAME: &'static str = "binary";

    fn from_leaf_value(value: &LeafValue) -> Result<Self, FieldError> {
        match value {
            LeafValue::Binary(bytes) => Ok(bytes.clone()),
            _ => Err(invalid::<Self>(value)),
        }
    }
}

impl FromLeafValue for () {
    const TYPE_NAME: &'static str = "empty";

    fn from_leaf_value(value: &LeafValue) -> Result<Self, FieldError> {
        match value {
            LeafValue::Empty => Ok(()),
            LeafValue::String(s) if s.is_empty() => Ok(()),
            _ => Err(invalid::<Self>(value)),
        }
    }
}

impl From<()> for LeafValue {
    fn from(_: ()) -> Self {
        LeafValue::Empty
    }
}
