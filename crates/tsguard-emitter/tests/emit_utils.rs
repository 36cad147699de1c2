use super::*;

#[test]
fn quote_string_escapes_specials() {
    assert_eq!(quote_string("plain"), "\"plain\"");
    assert_eq!(quote_string("a\"b"), "\"a\\\"b\"");
    assert_eq!(quote_string("back\\slash"), "\"back\\\\slash\"");
    assert_eq!(quote_string("line\nbreak"), "\"line\\nbreak\"");
    assert_eq!(quote_string("\u{1}"), "\"\\u0001\"");
}

#[test]
fn format_number_matches_js_string_conversion() {
    assert_eq!(format_number(0.0), "0");
    assert_eq!(format_number(-0.0), "0");
    assert_eq!(format_number(42.0), "42");
    assert_eq!(format_number(-7.0), "-7");
    assert_eq!(format_number(1.5), "1.5");
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::INFINITY), "Infinity");
}
