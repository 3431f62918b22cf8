//! Variadic printer
//!
//! Renders each argument as ` [value]` in order, then a line break.
//!
//! ```
//! assert_eq!(idiomlab::format_values!("a", "b", "c", 5, 6.1), " [a] [b] [c] [5] [6.1]\n");
//! assert_eq!(idiomlab::format_values!(), "\n");
//! ```
//!
//! Arguments are checked at compile time; a type without a `Printable`
//! impl is rejected before the program runs:
//!
//! ```compile_fail
//! struct Opaque;
//! idiomlab::format_values!("a", Opaque);
//! ```
//!
//! ```compile_fail
//! idiomlab::printer::render_args(("a", vec![1, 2]));
//! ```

pub mod value;

pub use value::{Printable, PrintableValue};

use crate::config::types::Result;
use crate::observability::metrics::get_metrics;
use std::io::Write;

/// Write the bracketed values and a trailing newline to `out`
pub fn write_values<W: Write + ?Sized>(out: &mut W, values: &[PrintableValue]) -> Result<()> {
    for value in values {
        write!(out, " [{}]", value)?;
    }
    writeln!(out)?;

    let metrics = get_metrics();
    metrics.print_calls.inc();
    metrics.values_printed.add(values.len() as u64);
    Ok(())
}

/// Render to a string instead of a sink
pub fn render_values(values: &[PrintableValue]) -> String {
    let mut rendered = String::new();
    for value in values {
        rendered.push_str(&format!(" [{}]", value));
    }
    rendered.push('\n');
    rendered
}

/// Write to stdout, flushing before returning
pub fn print_values(values: &[PrintableValue]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_values(&mut lock, values)?;
    lock.flush()?;
    Ok(())
}

/// Heterogeneous argument packs expressed as tuples
pub trait PrintArgs {
    fn collect_values(&self, out: &mut Vec<PrintableValue>);

    fn to_values(&self) -> Vec<PrintableValue> {
        let mut out = Vec::new();
        self.collect_values(&mut out);
        out
    }
}

impl PrintArgs for () {
    fn collect_values(&self, _out: &mut Vec<PrintableValue>) {}
}

macro_rules! impl_print_args {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Printable),+> PrintArgs for ($($name,)+) {
            fn collect_values(&self, out: &mut Vec<PrintableValue>) {
                $(out.push(self.$idx.to_printable());)+
            }
        }
    };
}

impl_print_args!(A: 0);
impl_print_args!(A: 0, B: 1);
impl_print_args!(A: 0, B: 1, C: 2);
impl_print_args!(A: 0, B: 1, C: 2, D: 3);
impl_print_args!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_print_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_print_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_print_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
impl_print_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8);
impl_print_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9);
impl_print_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10);
impl_print_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11);

/// Render a tuple pack
pub fn render_args<A: PrintArgs>(args: A) -> String {
    render_values(&args.to_values())
}

/// Print a tuple pack to stdout
pub fn print_args<A: PrintArgs>(args: A) -> Result<()> {
    print_values(&args.to_values())
}

/// Print any number of `Printable` arguments to stdout
#[macro_export]
macro_rules! print_values {
    ($($value:expr),* $(,)?) => {
        $crate::printer::print_values(&[$($crate::printer::Printable::to_printable(&$value)),*])
    };
}

/// Write any number of `Printable` arguments to an `io::Write` sink
#[macro_export]
macro_rules! write_values {
    ($out:expr $(, $value:expr)* $(,)?) => {
        $crate::printer::write_values($out, &[$($crate::printer::Printable::to_printable(&$value)),*])
    };
}

/// Render any number of `Printable` arguments to a `String`
#[macro_export]
macro_rules! format_values {
    ($($value:expr),* $(,)?) => {
        $crate::printer::render_values(&[$($crate::printer::Printable::to_printable(&$value)),*])
    };
}
