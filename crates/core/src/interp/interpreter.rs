//! Text run interpreter.
//!
//! `TextRunInterpreter` owns the text state stack for one interpretation
//! pass. It validates incoming events, dispatches them to the `do_*` operator
//! implementations in `ops::text`, and collects the runs they emit.
//!
//! Error policy:
//! - a malformed operator is logged, recorded in `diagnostics()`, and skipped
//! - a state underflow aborts the page and is returned with the page id and
//!   operator index, so the caller can move on to the next page

use tracing::{trace, warn};

use super::device::RunBuilder;
use super::event::{Operator, RawEvent};
use super::params::InterpretOptions;
use crate::error::{InterpError, Result};
use crate::font::metrics::{GlyphMetrics, ZeroMetrics};
use crate::model::run::SpatialObject;
use crate::model::state::{TextState, TextStateStack};
use crate::utils::rect_contains;

/// Executes text operator events for one page at a time.
///
/// Each instance owns its own stack; run one instance per page or document
/// when interpreting in parallel.
pub struct TextRunInterpreter<M: GlyphMetrics = ZeroMetrics> {
    /// Glyph metrics backend
    pub(crate) metrics: M,
    /// Interpretation parameters
    pub(crate) options: InterpretOptions,
    /// Text state stack; empty outside a page
    pub(crate) stack: TextStateStack,
    /// Id of the current page, if begin_page carried one
    pub(crate) page: Option<u32>,
    /// Index of the next event, counted from the latest begin_page
    pub(crate) operator_index: usize,
    /// Runs emitted since the page began
    pub(crate) runs: Vec<SpatialObject>,
    /// Operator-level errors recorded since the page began
    pub(crate) diagnostics: Vec<InterpError>,
}

impl TextRunInterpreter<ZeroMetrics> {
    /// Interpreter with the zero-metrics placeholder.
    pub fn with_zero_metrics() -> Self {
        Self::new(ZeroMetrics)
    }
}

impl Default for TextRunInterpreter<ZeroMetrics> {
    fn default() -> Self {
        Self::with_zero_metrics()
    }
}

impl<M: GlyphMetrics> TextRunInterpreter<M> {
    pub fn new(metrics: M) -> Self {
        Self::with_options(metrics, InterpretOptions::default())
    }

    pub fn with_options(metrics: M, options: InterpretOptions) -> Self {
        Self {
            metrics,
            options,
            stack: TextStateStack::new(),
            page: None,
            operator_index: 0,
            runs: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub const fn options(&self) -> &InterpretOptions {
        &self.options
    }

    pub const fn metrics(&self) -> &M {
        &self.metrics
    }

    pub const fn stack(&self) -> &TextStateStack {
        &self.stack
    }

    /// Current top frame, None outside a page.
    pub fn textstate(&self) -> Option<&TextState> {
        self.stack.top().ok()
    }

    pub const fn page(&self) -> Option<u32> {
        self.page
    }

    /// Runs emitted since the current page began.
    pub fn runs(&self) -> &[SpatialObject] {
        &self.runs
    }

    /// Takes the runs collected so far, leaving the buffer empty.
    pub fn take_runs(&mut self) -> Vec<SpatialObject> {
        std::mem::take(&mut self.runs)
    }

    /// Operator-level errors skipped since the current page began.
    pub fn diagnostics(&self) -> &[InterpError] {
        &self.diagnostics
    }

    /// Processes one raw event.
    ///
    /// Returns the runs this event emitted. Malformed operators yield an
    /// empty result and are recorded; only `StateUnderflow` is returned as
    /// an error.
    pub fn process_event(&mut self, event: &RawEvent) -> Result<Vec<SpatialObject>> {
        let mut index = self.operator_index;
        self.operator_index += 1;

        let op = match Operator::from_event(event) {
            Ok(Some(op @ Operator::BeginPage { .. })) => {
                index = 0;
                self.operator_index = 1;
                op
            }
            Ok(Some(op)) => op,
            Ok(None) => {
                trace!(kind = %event.kind, "ignoring operator");
                return Ok(Vec::new());
            }
            Err(err) => {
                warn!(page = ?self.page, operator_index = index, %err, "skipping malformed operator");
                self.diagnostics.push(err);
                return Ok(Vec::new());
            }
        };

        match self.dispatch_operator(&op) {
            Ok(runs) => Ok(runs),
            Err(InterpError::StateUnderflow { .. }) => {
                let err = InterpError::StateUnderflow {
                    page: self.page,
                    operator_index: index,
                };
                warn!(%err, kind = ?op.kind(), "aborting page");
                Err(err)
            }
            Err(err) => {
                warn!(page = ?self.page, operator_index = index, %err, "operator failed");
                self.diagnostics.push(err);
                Ok(Vec::new())
            }
        }
    }

    /// Processes events in order until they run out or the page aborts.
    ///
    /// On success returns every run emitted by these events. On
    /// `StateUnderflow` the runs emitted before the failure stay available
    /// through `runs()`.
    pub fn execute<'e, I>(&mut self, events: I) -> Result<Vec<SpatialObject>>
    where
        I: IntoIterator<Item = &'e RawEvent>,
    {
        let mut emitted = Vec::new();
        for event in events {
            emitted.extend(self.process_event(event)?);
        }
        Ok(emitted)
    }

    /// Executes a validated operator against the stack.
    ///
    /// Errors are returned without page context; `process_event` adds it.
    pub fn dispatch_operator(&mut self, op: &Operator) -> Result<Vec<SpatialObject>> {
        let runs = match op {
            Operator::BeginPage { page } => {
                self.do_begin_page(*page);
                Vec::new()
            }
            Operator::EndPage => {
                self.do_end_page()?;
                Vec::new()
            }
            Operator::BeginText => {
                self.do_BT()?;
                Vec::new()
            }
            Operator::EndText => {
                self.do_ET()?;
                Vec::new()
            }
            Operator::SetLeading(v) => {
                self.do_TL(*v)?;
                Vec::new()
            }
            Operator::SetRise(v) => {
                self.do_Ts(*v)?;
                Vec::new()
            }
            Operator::SetCharSpacing(v) => {
                self.do_Tc(*v)?;
                Vec::new()
            }
            Operator::SetWordSpacing(v) => {
                self.do_Tw(*v)?;
                Vec::new()
            }
            Operator::SetHorizontalScaling(v) => {
                self.do_Tz(*v)?;
                Vec::new()
            }
            Operator::MoveText { dx, dy } => {
                self.do_Td(*dx, *dy)?;
                Vec::new()
            }
            Operator::MoveTextSetLeading { dx, dy } => {
                self.do_TD(*dx, *dy)?;
                Vec::new()
            }
            Operator::SetFont { font, size } => {
                self.do_Tf(font, *size)?;
                Vec::new()
            }
            Operator::SetTextMatrix(matrix) => {
                self.do_Tm(*matrix)?;
                Vec::new()
            }
            Operator::NextLine => {
                self.do_T_star()?;
                Vec::new()
            }
            Operator::SetSpacingNextLineShowText {
                word_spacing,
                char_spacing,
                text,
            } => self.do_doublequote(*word_spacing, *char_spacing, text)?,
            Operator::NextLineShowText(text) => self.do_quote(text)?,
            Operator::ShowText(text) => self.do_Tj(text)?,
            Operator::ShowTextWithPositioning(seq) => self.do_TJ(seq)?,
        };

        let runs = self.clip(runs);
        self.runs.extend(runs.iter().cloned());
        Ok(runs)
    }

    /// Renders a string against the current top frame.
    pub(crate) fn show(&mut self, text: &str) -> Result<Vec<SpatialObject>> {
        RunBuilder::new(&self.metrics)
            .with_word_separator(self.options.word_separator)
            .show(&mut self.stack, text)
    }

    fn clip(&self, runs: Vec<SpatialObject>) -> Vec<SpatialObject> {
        match self.options.media_box {
            Some(media_box) => runs
                .into_iter()
                .filter(|run| rect_contains(media_box, run.origin()))
                .collect(),
            None => runs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::event::Operand;

    fn ev(kind: &str, operands: Vec<Operand>) -> RawEvent {
        RawEvent::new(kind, operands)
    }

    #[test]
    fn test_malformed_operator_is_recorded_and_skipped() {
        let mut interp = TextRunInterpreter::with_zero_metrics();
        let events = vec![
            ev("begin_page", vec![]),
            ev("Tc", vec![]),
            ev("Tj", vec!["ab".into()]),
        ];
        let runs = interp.execute(&events).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(interp.diagnostics().len(), 1);
    }

    #[test]
    fn test_underflow_carries_position() {
        let mut interp = TextRunInterpreter::with_zero_metrics();
        let events = vec![
            ev("begin_page", vec![Operand::Number(7.0)]),
            ev("Tj", vec!["a".into()]),
            ev("ET", vec![]),
        ];
        let err = interp.execute(&events).unwrap_err();
        assert_eq!(
            err,
            InterpError::StateUnderflow {
                page: Some(7),
                operator_index: 2,
            }
        );
        assert_eq!(interp.runs().len(), 1);
    }

    #[test]
    fn test_media_box_filters_runs() {
        let options = InterpretOptions::default().with_media_box((0.0, 0.0, 100.0, 100.0));
        let mut interp = TextRunInterpreter::with_options(ZeroMetrics, options);
        let events = vec![
            ev("begin_page", vec![]),
            ev("Tc", vec![Operand::Number(0.6)]),
            ev("Tj", vec!["abc".into()]),
        ];
        // Advances of 60 put the third glyph at x=120.
        let runs = interp.execute(&events).unwrap();
        assert_eq!(runs.len(), 2);
    }
}
