//! Integration tests for the variadic printer

use idiomlab::printer::{render_args, render_values, write_values};
use idiomlab::{format_values, write_values, PrintableValue};

#[test]
fn test_documented_outputs() {
    assert_eq!(format_values!(), "\n");
    assert_eq!(format_values!("a", "b", "c"), " [a] [b] [c]\n");
    assert_eq!(format_values!("a", "b", "c", 5, 6.1), " [a] [b] [c] [5] [6.1]\n");
}

#[test]
fn test_macro_and_tuple_forms_agree() {
    let name = String::from("idiom");
    let count: u32 = 3;
    let ratio = 0.25f32;

    assert_eq!(
        format_values!(name, count, ratio, 'z'),
        render_args((&name, count, ratio, 'z'))
    );
    assert_eq!(render_args((&name, count, ratio, 'z')), " [idiom] [3] [0.25] [z]\n");
}

#[test]
fn test_argument_order_preserved() {
    let values: Vec<PrintableValue> = (0..10).map(PrintableValue::Integer).collect();
    assert_eq!(
        render_values(&values),
        " [0] [1] [2] [3] [4] [5] [6] [7] [8] [9]\n"
    );
}

#[test]
fn test_write_values_macro_and_fn_match() {
    let mut from_macro: Vec<u8> = Vec::new();
    write_values!(&mut from_macro, "x", -1, 2.5).unwrap();

    let mut from_fn: Vec<u8> = Vec::new();
    write_values(
        &mut from_fn,
        &[
            PrintableValue::Text("x".into()),
            PrintableValue::Integer(-1),
            PrintableValue::Float(2.5),
        ],
    )
    .unwrap();

    assert_eq!(from_macro, from_fn);
    assert_eq!(from_macro, b" [x] [-1] [2.5]\n");
}

#[test]
fn test_zero_arguments_to_sink() {
    let mut buf: Vec<u8> = Vec::new();
    write_values!(&mut buf).unwrap();
    assert_eq!(buf, b"\n");
}
