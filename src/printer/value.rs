//! Printable values
//!
//! `PrintableValue` is the closed set of literal kinds the printer renders.
//! `Printable` is the compile-time gate: only types implementing it can be
//! passed to the printer macros or packed into a `PrintArgs` tuple.

use std::fmt;

/// One rendered argument
#[derive(Debug, Clone, PartialEq)]
pub enum PrintableValue {
    Text(String),
    Integer(i128),
    Float(f64),
}

impl PrintableValue {
    /// Classify a runtime token: integer, then float, otherwise text
    pub fn parse(token: &str) -> Self {
        if let Ok(n) = token.parse::<i128>() {
            return PrintableValue::Integer(n);
        }
        if let Ok(f) = token.parse::<f64>() {
            // Keep words like "inf" and "nan" as text; only digit-bearing
            // tokens count as numbers.
            if token.bytes().any(|b| b.is_ascii_digit()) {
                return PrintableValue::Float(f);
            }
        }
        PrintableValue::Text(token.to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PrintableValue::Text(_) => "text",
            PrintableValue::Integer(_) => "integer",
            PrintableValue::Float(_) => "float",
        }
    }
}

impl fmt::Display for PrintableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintableValue::Text(s) => f.write_str(s),
            PrintableValue::Integer(n) => write!(f, "{}", n),
            PrintableValue::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Types the printer accepts
pub trait Printable {
    fn to_printable(&self) -> PrintableValue;
}

impl Printable for str {
    fn to_printable(&self) -> PrintableValue {
        PrintableValue::Text(self.to_owned())
    }
}

impl Printable for String {
    fn to_printable(&self) -> PrintableValue {
        PrintableValue::Text(self.clone())
    }
}

impl Printable for char {
    fn to_printable(&self) -> PrintableValue {
        PrintableValue::Text(self.to_string())
    }
}

impl Printable for PrintableValue {
    fn to_printable(&self) -> PrintableValue {
        self.clone()
    }
}

impl<T: Printable + ?Sized> Printable for &T {
    fn to_printable(&self) -> PrintableValue {
        (**self).to_printable()
    }
}

macro_rules! impl_printable_integer {
    ($($ty:ty),*) => {
        $(
            impl Printable for $ty {
                fn to_printable(&self) -> PrintableValue {
                    PrintableValue::Integer(i128::from(*self))
                }
            }
        )*
    };
}

impl_printable_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl Printable for isize {
    fn to_printable(&self) -> PrintableValue {
        PrintableValue::Integer(*self as i128)
    }
}

impl Printable for usize {
    fn to_printable(&self) -> PrintableValue {
        PrintableValue::Integer(*self as i128)
    }
}

impl Printable for f64 {
    fn to_printable(&self) -> PrintableValue {
        PrintableValue::Float(*self)
    }
}

impl Printable for f32 {
    fn to_printable(&self) -> PrintableValue {
        // Widening directly would print 6.1f32 as 6.099999904632568.
        let widened = self.to_string().parse::<f64>().unwrap_or(f64::from(*self));
        PrintableValue::Float(widened)
    }
}
