//! High-level run extraction API.
//!
//! Provides the main entry points for callers that hold decoded content
//! streams rather than pre-tokenized events:
//! - `extract_runs()` - Runs of a single page
//! - `interpret_pages()` - Runs of many pages, skipping pages that underflow
//! - `interpret_pages_parallel()` - Same, one interpreter per page on rayon

use rayon::prelude::*;
use tracing::warn;

use crate::error::{InterpError, Result};
use crate::font::metrics::{GlyphMetrics, ZeroMetrics};
use crate::interp::event::{Operand, RawEvent};
use crate::interp::interpreter::TextRunInterpreter;
use crate::interp::params::InterpretOptions;
use crate::model::run::SpatialObject;
use crate::parser::content::ContentParser;

/// Outcome of interpreting one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRuns {
    /// Zero-based page index
    pub page: u32,
    /// Runs in emission order. When the page aborted, the runs emitted
    /// before the failing operator.
    pub runs: Vec<SpatialObject>,
    /// Malformed operators that were skipped
    pub skipped: Vec<InterpError>,
    /// The structural error that ended the page early, if any
    pub aborted: Option<InterpError>,
}

impl PageRuns {
    pub const fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }

    /// Concatenated run contents in emission order.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.content.as_str()).collect()
    }
}

/// Wraps a page's content-stream events in begin_page/end_page.
pub fn page_events(page: u32, content: &[u8]) -> Vec<RawEvent> {
    let mut events = vec![RawEvent::new(
        "begin_page",
        vec![Operand::Number(f64::from(page))],
    )];
    events.extend(ContentParser::new(content));
    events.push(RawEvent::new("end_page", Vec::new()));
    events
}

/// Extract the runs of a single page's content stream with zero metrics.
///
/// Fails with `StateUnderflow` if the stream pops more text objects than it
/// opens.
pub fn extract_runs(content: &[u8], options: Option<InterpretOptions>) -> Result<Vec<SpatialObject>> {
    extract_runs_with(content, ZeroMetrics, options)
}

/// Extract the runs of a single page's content stream with a metrics backend.
pub fn extract_runs_with<M: GlyphMetrics>(
    content: &[u8],
    metrics: M,
    options: Option<InterpretOptions>,
) -> Result<Vec<SpatialObject>> {
    let mut interp = TextRunInterpreter::with_options(metrics, options.unwrap_or_default());
    interp.execute(&page_events(0, content))
}

fn interpret_page<M: GlyphMetrics>(
    interp: &mut TextRunInterpreter<M>,
    page: u32,
    content: &[u8],
) -> PageRuns {
    let aborted = interp.execute(&page_events(page, content)).err();
    if let Some(err) = &aborted {
        warn!(page, %err, "page skipped after structural error");
    }
    PageRuns {
        page,
        runs: interp.take_runs(),
        skipped: interp.diagnostics().to_vec(),
        aborted,
    }
}

/// Interpret a sequence of pages, one content stream per page.
///
/// A page that underflows is reported in its `PageRuns::aborted` and the
/// next page starts from a clean stack.
pub fn interpret_pages<'c, M, I>(pages: I, metrics: &M, options: &InterpretOptions) -> Vec<PageRuns>
where
    M: GlyphMetrics,
    I: IntoIterator<Item = &'c [u8]>,
{
    let mut interp = TextRunInterpreter::with_options(metrics, options.clone());
    pages
        .into_iter()
        .zip(0u32..)
        .map(|(content, page)| interpret_page(&mut interp, page, content))
        .collect()
}

/// Parallel variant of `interpret_pages`.
///
/// Every page gets its own interpreter and stack; only the metrics backend
/// is shared. Results come back in page order.
pub fn interpret_pages_parallel<M>(
    pages: &[&[u8]],
    metrics: &M,
    options: &InterpretOptions,
) -> Vec<PageRuns>
where
    M: GlyphMetrics + Sync,
{
    pages
        .par_iter()
        .enumerate()
        .map(|(index, content)| {
            let page = u32::try_from(index).unwrap_or(u32::MAX);
            let mut interp = TextRunInterpreter::with_options(metrics, options.clone());
            interpret_page(&mut interp, page, content)
        })
        .collect()
}
