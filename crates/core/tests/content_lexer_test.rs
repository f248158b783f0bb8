//! Tests for ContentParser - content stream bytes to operator events.
//!
//! Covers operands (numbers, names, strings, arrays), the quote operators,
//! and the constructs that are skipped: comments, dictionaries and inline
//! images.

use textrun_core::interp::{Operand, RawEvent};
use textrun_core::parser::ContentParser;

fn parse(data: &[u8]) -> Vec<RawEvent> {
    ContentParser::new(data).collect()
}

fn kinds(events: &[RawEvent]) -> Vec<&str> {
    events.iter().map(|event| event.kind.as_str()).collect()
}

fn num(v: f64) -> Operand {
    Operand::Number(v)
}

fn text(v: &str) -> Operand {
    Operand::Str(v.to_string())
}

#[test]
fn test_content_parser_basic_operators() {
    let events = parse(b"BT /F1 12 Tf 72 712 Td (Hello) Tj ET");

    assert_eq!(
        events,
        vec![
            RawEvent::new("BT", vec![]),
            RawEvent::new("Tf", vec![Operand::Name("F1".into()), num(12.0)]),
            RawEvent::new("Td", vec![num(72.0), num(712.0)]),
            RawEvent::new("Tj", vec![text("Hello")]),
            RawEvent::new("ET", vec![]),
        ]
    );
}

#[test]
fn test_content_parser_quote_operators() {
    let events = parse(b"14 TL T* (a) ' 1 0.5 (b) \"");
    assert_eq!(kinds(&events), vec!["TL", "T*", "'", "\""]);
    assert_eq!(events[2].operands, vec![text("a")]);
    assert_eq!(events[3].operands, vec![num(1.0), num(0.5), text("b")]);
}

#[test]
fn test_content_parser_string_escapes() {
    let events = parse(br"(a\(b\)c\\d\n\101\7) Tj");
    assert_eq!(events[0].operands, vec![text("a(b)c\\d\nA\u{7}")]);
}

#[test]
fn test_content_parser_nested_parens() {
    let events = parse(b"(outer (inner) tail) Tj");
    assert_eq!(events[0].operands, vec![text("outer (inner) tail")]);
}

#[test]
fn test_content_parser_line_continuation() {
    let events = parse(b"(split\\\nline) Tj");
    assert_eq!(events[0].operands, vec![text("splitline")]);
}

#[test]
fn test_content_parser_hex_strings() {
    let events = parse(b"<48 65 6C6c6F> Tj <414> Tj");
    assert_eq!(events[0].operands, vec![text("Hello")]);
    // Odd digit count: the last nibble is padded with zero.
    assert_eq!(events[1].operands, vec![text("A@")]);
}

#[test]
fn test_content_parser_latin1_bytes() {
    let events = parse(b"(\xe9t\xe9) Tj");
    assert_eq!(events[0].operands, vec![text("\u{e9}t\u{e9}")]);
}

#[test]
fn test_content_parser_positioning_array() {
    let events = parse(b"[(A) -120 (W) 30.5 (AY)] TJ");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, "TJ");
    assert_eq!(
        events[0].operands,
        vec![Operand::Array(vec![
            text("A"),
            num(-120.0),
            text("W"),
            num(30.5),
            text("AY"),
        ])]
    );
}

#[test]
fn test_content_parser_skips_dictionaries() {
    let events = parse(b"/Span <</ActualText (x) /Nested <</A 1>> >> BDC (y) Tj EMC");
    assert_eq!(kinds(&events), vec!["BDC", "Tj", "EMC"]);
    assert_eq!(events[0].operands, vec![Operand::Name("Span".into())]);
    assert_eq!(events[1].operands, vec![text("y")]);
}

#[test]
fn test_content_parser_skips_inline_images() {
    let data = b"BT (a) Tj ET BI /W 2 /H 1 /BPC 8 /CS /G ID \x00EI\xff\nEI Q BT (b) Tj ET";
    let events = parse(data);
    assert_eq!(kinds(&events), vec!["BT", "Tj", "ET", "Q", "BT", "Tj", "ET"]);
    assert_eq!(events[5].operands, vec![text("b")]);
}

#[test]
fn test_content_parser_comments() {
    let events = parse(b"% leading comment\nBT % trailing\r(x) Tj ET");
    assert_eq!(kinds(&events), vec!["BT", "Tj", "ET"]);
}

#[test]
fn test_content_parser_numbers() {
    let events = parse(b"1 0 0 1 -.5 +3. Tm 0.001 Tc");
    assert_eq!(
        events[0].operands,
        vec![num(1.0), num(0.0), num(0.0), num(1.0), num(-0.5), num(3.0)]
    );
    assert_eq!(events[1].operands, vec![num(0.001)]);
}

#[test]
fn test_content_parser_name_escapes() {
    let events = parse(b"/F#201 9 Tf");
    assert_eq!(events[0].operands[0], Operand::Name("F 1".into()));
}

#[test]
fn test_content_parser_booleans() {
    let events = parse(b"true false op");
    assert_eq!(
        events[0].operands,
        vec![Operand::Bool(true), Operand::Bool(false)]
    );
}

#[test]
fn test_content_parser_recovers_from_bad_tokens() {
    let events = parse(b"- > (a) Tj");
    assert_eq!(kinds(&events), vec!["Tj"]);
    assert_eq!(events[0].operands, vec![text("a")]);
}

#[test]
fn test_content_parser_unterminated_string() {
    let events = parse(b"BT (never closed Tj ET");
    assert_eq!(kinds(&events), vec!["BT"]);
}

#[test]
fn test_content_parser_empty_input() {
    assert!(parse(b"").is_empty());
    assert!(parse(b"  \n\t % only a comment").is_empty());
}
