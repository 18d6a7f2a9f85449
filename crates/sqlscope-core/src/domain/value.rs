//! Bound SQL parameter values

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use std::fmt;
use std::sync::Arc;

/// Boxed error returned by [`DriverValue`] implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A custom column type that can produce its own canonical scalar on demand.
pub trait DriverValue: fmt::Debug + Send + Sync {
    /// Produce the scalar stored in the database, `None` for SQL NULL.
    fn driver_value(&self) -> Result<Option<ScalarValue>, BoxError>;
}

/// One bound parameter of a traced statement.
///
/// Populated once at the adapter boundary; everything downstream matches on
/// the variant instead of inspecting runtime types.
#[derive(Debug, Clone)]
pub enum ScalarValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    /// `None` is the zero/unset timestamp
    Timestamp(Option<NaiveDateTime>),
    Driver(Arc<dyn DriverValue>),
}

impl ScalarValue {
    /// The zero/unset timestamp.
    pub fn zero_timestamp() -> Self {
        Self::Timestamp(None)
    }

    /// Wrap a custom value type.
    pub fn driver(value: impl DriverValue + 'static) -> Self {
        Self::Driver(Arc::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
            Self::Bytes(v) => f.write_str(&String::from_utf8_lossy(v)),
            Self::Timestamp(None) => f.write_str("0000-00-00 00:00:00"),
            Self::Timestamp(Some(ts)) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            Self::Driver(v) => write!(f, "{:?}", v),
        }
    }
}

macro_rules! scalar_from {
    ($variant:ident, $target:ty => $($source:ty),+) => {
        $(
            impl From<$source> for ScalarValue {
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

scalar_from!(Int, i64 => i8, i16, i32, i64);
scalar_from!(UInt, u64 => u8, u16, u32, u64);
scalar_from!(Float, f64 => f32, f64);
scalar_from!(Bool, bool => bool);
scalar_from!(Text, String => String, &str);
scalar_from!(Bytes, Vec<u8> => Vec<u8>, &[u8]);

impl From<usize> for ScalarValue {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<isize> for ScalarValue {
    fn from(value: isize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<NaiveDateTime> for ScalarValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(Some(value))
    }
}

impl From<NaiveDate> for ScalarValue {
    fn from(value: NaiveDate) -> Self {
        Self::Timestamp(Some(value.and_time(chrono::NaiveTime::MIN)))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ScalarValue {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Timestamp(Some(value.naive_local()))
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
