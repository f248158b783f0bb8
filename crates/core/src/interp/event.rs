//! Operator events consumed by the interpreter.
//!
//! A tokenizer hands the interpreter `RawEvent`s: a kind tag plus the
//! positional operands that preceded it. `Operator::from_event` validates a
//! raw event against the operand shape its kind expects and produces the
//! typed `Operator` the dispatcher executes.
//!
//! Kinds are accepted by descriptive name (`show_text`) or by PDF operator
//! spelling (`Tj`). Unknown kinds validate to `None` and are ignored.

use smol_str::SmolStr;

use crate::error::{InterpError, Result};
use crate::model::state::FontHandle;
use crate::utils::Matrix3;

/// A positional operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Bool(bool),
    /// Name object (e.g. `/F1`), without the slash
    Name(SmolStr),
    /// Decoded string contents
    Str(String),
    Array(Vec<Operand>),
}

impl Operand {
    const fn type_name(&self) -> &'static str {
        match self {
            Operand::Number(_) => "number",
            Operand::Bool(_) => "bool",
            Operand::Name(_) => "name",
            Operand::Str(_) => "string",
            Operand::Array(_) => "array",
        }
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Number(value)
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Str(value.to_string())
    }
}

/// One untyped event from the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub kind: SmolStr,
    pub operands: Vec<Operand>,
}

impl RawEvent {
    pub fn new(kind: impl Into<SmolStr>, operands: Vec<Operand>) -> Self {
        Self {
            kind: kind.into(),
            operands,
        }
    }
}

/// Item of a TJ positioning array.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSeqItem {
    /// Positioning adjustment in thousandths of text space
    Number(f64),
    Text(String),
}

/// Sequence of text elements shown by TJ.
pub type TextSeq = Vec<TextSeqItem>;

/// Every event kind the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BeginPage,
    EndPage,
    BeginTextObject,
    EndTextObject,
    SetTextLeading,
    SetTextRise,
    SetCharacterSpacing,
    SetWordSpacing,
    SetHorizontalTextScaling,
    MoveTextPosition,
    MoveTextPositionAndSetLeading,
    SetTextFontAndSize,
    SetTextMatrixAndTextLineMatrix,
    MoveToStartOfNextLine,
    SetSpacingNextLineShowText,
    MoveToNextLineAndShowText,
    ShowText,
    ShowTextWithPositioning,
}

impl EventKind {
    pub const ALL: [EventKind; 18] = [
        EventKind::BeginPage,
        EventKind::EndPage,
        EventKind::BeginTextObject,
        EventKind::EndTextObject,
        EventKind::SetTextLeading,
        EventKind::SetTextRise,
        EventKind::SetCharacterSpacing,
        EventKind::SetWordSpacing,
        EventKind::SetHorizontalTextScaling,
        EventKind::MoveTextPosition,
        EventKind::MoveTextPositionAndSetLeading,
        EventKind::SetTextFontAndSize,
        EventKind::SetTextMatrixAndTextLineMatrix,
        EventKind::MoveToStartOfNextLine,
        EventKind::SetSpacingNextLineShowText,
        EventKind::MoveToNextLineAndShowText,
        EventKind::ShowText,
        EventKind::ShowTextWithPositioning,
    ];

    /// Descriptive snake_case name.
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::BeginPage => "begin_page",
            EventKind::EndPage => "end_page",
            EventKind::BeginTextObject => "begin_text_object",
            EventKind::EndTextObject => "end_text_object",
            EventKind::SetTextLeading => "set_text_leading",
            EventKind::SetTextRise => "set_text_rise",
            EventKind::SetCharacterSpacing => "set_character_spacing",
            EventKind::SetWordSpacing => "set_word_spacing",
            EventKind::SetHorizontalTextScaling => "set_horizontal_text_scaling",
            EventKind::MoveTextPosition => "move_text_position",
            EventKind::MoveTextPositionAndSetLeading => "move_text_position_and_set_leading",
            EventKind::SetTextFontAndSize => "set_text_font_and_size",
            EventKind::SetTextMatrixAndTextLineMatrix => "set_text_matrix_and_text_line_matrix",
            EventKind::MoveToStartOfNextLine => "move_to_start_of_next_line",
            EventKind::SetSpacingNextLineShowText => "set_spacing_next_line_show_text",
            EventKind::MoveToNextLineAndShowText => "move_to_next_line_and_show_text",
            EventKind::ShowText => "show_text",
            EventKind::ShowTextWithPositioning => "show_text_with_positioning",
        }
    }

    /// PDF operator spelling, if the kind is a content-stream operator.
    pub const fn pdf_operator(self) -> Option<&'static str> {
        match self {
            EventKind::BeginPage | EventKind::EndPage => None,
            EventKind::BeginTextObject => Some("BT"),
            EventKind::EndTextObject => Some("ET"),
            EventKind::SetTextLeading => Some("TL"),
            EventKind::SetTextRise => Some("Ts"),
            EventKind::SetCharacterSpacing => Some("Tc"),
            EventKind::SetWordSpacing => Some("Tw"),
            EventKind::SetHorizontalTextScaling => Some("Tz"),
            EventKind::MoveTextPosition => Some("Td"),
            EventKind::MoveTextPositionAndSetLeading => Some("TD"),
            EventKind::SetTextFontAndSize => Some("Tf"),
            EventKind::SetTextMatrixAndTextLineMatrix => Some("Tm"),
            EventKind::MoveToStartOfNextLine => Some("T*"),
            EventKind::SetSpacingNextLineShowText => Some("\""),
            EventKind::MoveToNextLineAndShowText => Some("'"),
            EventKind::ShowText => Some("Tj"),
            EventKind::ShowTextWithPositioning => Some("TJ"),
        }
    }

    /// Looks a kind up by descriptive name or PDF operator spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name || kind.pdf_operator() == Some(name))
    }
}

/// A validated operator, one variant per event kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    BeginPage { page: Option<u32> },
    EndPage,
    BeginText,
    EndText,
    SetLeading(f64),
    SetRise(f64),
    SetCharSpacing(f64),
    SetWordSpacing(f64),
    SetHorizontalScaling(f64),
    MoveText { dx: f64, dy: f64 },
    MoveTextSetLeading { dx: f64, dy: f64 },
    SetFont { font: FontHandle, size: f64 },
    SetTextMatrix(Matrix3),
    NextLine,
    SetSpacingNextLineShowText {
        word_spacing: f64,
        char_spacing: f64,
        text: String,
    },
    NextLineShowText(String),
    ShowText(String),
    ShowTextWithPositioning(TextSeq),
}

impl Operator {
    /// Validates a raw event.
    ///
    /// Returns `Ok(None)` for kinds the interpreter does not handle and
    /// `MalformedOperator` when the operands do not fit the kind.
    pub fn from_event(event: &RawEvent) -> Result<Option<Operator>> {
        let Some(kind) = EventKind::from_name(&event.kind) else {
            return Ok(None);
        };
        let args = Args {
            kind: &event.kind,
            operands: &event.operands,
        };

        let op = match kind {
            EventKind::BeginPage => {
                args.expect_at_most(1)?;
                let page = match event.operands.first() {
                    Some(_) => Some(args.page_number(0)?),
                    None => None,
                };
                Operator::BeginPage { page }
            }
            EventKind::EndPage => {
                args.expect_len(0)?;
                Operator::EndPage
            }
            EventKind::BeginTextObject => {
                args.expect_len(0)?;
                Operator::BeginText
            }
            EventKind::EndTextObject => {
                args.expect_len(0)?;
                Operator::EndText
            }
            EventKind::SetTextLeading => Operator::SetLeading(args.single_number()?),
            EventKind::SetTextRise => Operator::SetRise(args.single_number()?),
            EventKind::SetCharacterSpacing => Operator::SetCharSpacing(args.single_number()?),
            EventKind::SetWordSpacing => Operator::SetWordSpacing(args.single_number()?),
            EventKind::SetHorizontalTextScaling => {
                Operator::SetHorizontalScaling(args.single_number()?)
            }
            EventKind::MoveTextPosition => {
                let (dx, dy) = args.point()?;
                Operator::MoveText { dx, dy }
            }
            EventKind::MoveTextPositionAndSetLeading => {
                let (dx, dy) = args.point()?;
                Operator::MoveTextSetLeading { dx, dy }
            }
            EventKind::SetTextFontAndSize => {
                args.expect_len(2)?;
                Operator::SetFont {
                    font: args.name(0)?,
                    size: args.number(1)?,
                }
            }
            EventKind::SetTextMatrixAndTextLineMatrix => {
                args.expect_len(6)?;
                Operator::SetTextMatrix(Matrix3::from_components(
                    args.number(0)?,
                    args.number(1)?,
                    args.number(2)?,
                    args.number(3)?,
                    args.number(4)?,
                    args.number(5)?,
                ))
            }
            EventKind::MoveToStartOfNextLine => {
                args.expect_len(0)?;
                Operator::NextLine
            }
            EventKind::SetSpacingNextLineShowText => {
                args.expect_len(3)?;
                Operator::SetSpacingNextLineShowText {
                    word_spacing: args.number(0)?,
                    char_spacing: args.number(1)?,
                    text: args.text(2)?,
                }
            }
            EventKind::MoveToNextLineAndShowText => {
                args.expect_len(1)?;
                Operator::NextLineShowText(args.text(0)?)
            }
            EventKind::ShowText => {
                args.expect_len(1)?;
                Operator::ShowText(args.text(0)?)
            }
            EventKind::ShowTextWithPositioning => {
                args.expect_len(1)?;
                Operator::ShowTextWithPositioning(args.text_seq(0)?)
            }
        };
        Ok(Some(op))
    }

    /// The kind this operator was validated from.
    pub const fn kind(&self) -> EventKind {
        match self {
            Operator::BeginPage { .. } => EventKind::BeginPage,
            Operator::EndPage => EventKind::EndPage,
            Operator::BeginText => EventKind::BeginTextObject,
            Operator::EndText => EventKind::EndTextObject,
            Operator::SetLeading(_) => EventKind::SetTextLeading,
            Operator::SetRise(_) => EventKind::SetTextRise,
            Operator::SetCharSpacing(_) => EventKind::SetCharacterSpacing,
            Operator::SetWordSpacing(_) => EventKind::SetWordSpacing,
            Operator::SetHorizontalScaling(_) => EventKind::SetHorizontalTextScaling,
            Operator::MoveText { .. } => EventKind::MoveTextPosition,
            Operator::MoveTextSetLeading { .. } => EventKind::MoveTextPositionAndSetLeading,
            Operator::SetFont { .. } => EventKind::SetTextFontAndSize,
            Operator::SetTextMatrix(_) => EventKind::SetTextMatrixAndTextLineMatrix,
            Operator::NextLine => EventKind::MoveToStartOfNextLine,
            Operator::SetSpacingNextLineShowText { .. } => EventKind::SetSpacingNextLineShowText,
            Operator::NextLineShowText(_) => EventKind::MoveToNextLineAndShowText,
            Operator::ShowText(_) => EventKind::ShowText,
            Operator::ShowTextWithPositioning(_) => EventKind::ShowTextWithPositioning,
        }
    }
}

/// Typed access to an event's operands.
struct Args<'a> {
    kind: &'a str,
    operands: &'a [Operand],
}

impl Args<'_> {
    fn expect_len(&self, n: usize) -> Result<()> {
        if self.operands.len() == n {
            Ok(())
        } else {
            Err(InterpError::malformed(
                self.kind,
                format!("expected {n} operands, got {}", self.operands.len()),
            ))
        }
    }

    fn expect_at_most(&self, n: usize) -> Result<()> {
        if self.operands.len() <= n {
            Ok(())
        } else {
            Err(InterpError::malformed(
                self.kind,
                format!("expected at most {n} operands, got {}", self.operands.len()),
            ))
        }
    }

    fn get(&self, i: usize) -> Result<&Operand> {
        self.operands
            .get(i)
            .ok_or_else(|| InterpError::malformed(self.kind, format!("missing operand {i}")))
    }

    fn mismatch(&self, i: usize, expected: &str, got: &Operand) -> InterpError {
        InterpError::malformed(
            self.kind,
            format!("operand {i}: expected {expected}, got {}", got.type_name()),
        )
    }

    fn number(&self, i: usize) -> Result<f64> {
        match self.get(i)? {
            Operand::Number(n) if n.is_finite() => Ok(*n),
            Operand::Number(_) => Err(InterpError::malformed(
                self.kind,
                format!("operand {i}: non-finite number"),
            )),
            other => Err(self.mismatch(i, "number", other)),
        }
    }

    fn page_number(&self, i: usize) -> Result<u32> {
        let n = self.number(i)?;
        if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) {
            Ok(n as u32)
        } else {
            Err(InterpError::malformed(
                self.kind,
                format!("operand {i}: invalid page number {n}"),
            ))
        }
    }

    fn name(&self, i: usize) -> Result<FontHandle> {
        match self.get(i)? {
            Operand::Name(name) => Ok(name.clone()),
            other => Err(self.mismatch(i, "name", other)),
        }
    }

    fn text(&self, i: usize) -> Result<String> {
        match self.get(i)? {
            Operand::Str(s) => Ok(s.clone()),
            other => Err(self.mismatch(i, "string", other)),
        }
    }

    fn single_number(&self) -> Result<f64> {
        self.expect_len(1)?;
        self.number(0)
    }

    fn point(&self) -> Result<(f64, f64)> {
        self.expect_len(2)?;
        Ok((self.number(0)?, self.number(1)?))
    }

    fn text_seq(&self, i: usize) -> Result<TextSeq> {
        let items = match self.get(i)? {
            Operand::Array(items) => items,
            other => return Err(self.mismatch(i, "array", other)),
        };
        items
            .iter()
            .map(|item| match item {
                Operand::Number(n) if n.is_finite() => Ok(TextSeqItem::Number(*n)),
                Operand::Str(s) => Ok(TextSeqItem::Text(s.clone())),
                other => Err(InterpError::malformed(
                    self.kind,
                    format!("array item: expected number or string, got {}", other.type_name()),
                )),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_name(kind.name()), Some(kind));
            if let Some(op) = kind.pdf_operator() {
                assert_eq!(EventKind::from_name(op), Some(kind));
            }
        }
        assert_eq!(EventKind::from_name("re"), None);
    }

    #[test]
    fn test_unknown_kind_is_ignored() {
        let event = RawEvent::new("cm", vec![1.0.into(); 6]);
        assert_eq!(Operator::from_event(&event), Ok(None));
    }

    #[test]
    fn test_arity_mismatch_is_malformed() {
        let event = RawEvent::new("Td", vec![1.0.into()]);
        let err = Operator::from_event(&event).unwrap_err();
        assert!(matches!(
            err,
            InterpError::MalformedOperator { ref kind, .. } if kind == "Td"
        ));
    }

    #[test]
    fn test_type_mismatch_is_malformed() {
        let event = RawEvent::new("show_text", vec![Operand::Number(3.0)]);
        assert!(Operator::from_event(&event).is_err());
    }

    #[test]
    fn test_text_seq_items() {
        let event = RawEvent::new(
            "TJ",
            vec![Operand::Array(vec!["A".into(), (-120.0).into(), "B".into()])],
        );
        assert_eq!(
            Operator::from_event(&event).unwrap(),
            Some(Operator::ShowTextWithPositioning(vec![
                TextSeqItem::Text("A".to_string()),
                TextSeqItem::Number(-120.0),
                TextSeqItem::Text("B".to_string()),
            ]))
        );
    }

    #[test]
    fn test_begin_page_with_id() {
        let event = RawEvent::new("begin_page", vec![Operand::Number(3.0)]);
        assert_eq!(
            Operator::from_event(&event).unwrap(),
            Some(Operator::BeginPage { page: Some(3) })
        );
        let bad = RawEvent::new("begin_page", vec![Operand::Number(-1.0)]);
        assert!(Operator::from_event(&bad).is_err());
    }
}
