//! textruns - Dump positioned text runs from PDF content streams
//!
//! Each input file holds one page's decoded content stream. Runs are printed
//! one per line, or as a JSON array of pages.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use textrun_core::api::{PageRuns, interpret_pages};
use textrun_core::font::ZeroMetrics;
use textrun_core::interp::InterpretOptions;
use textrun_core::model::SpatialObject;
use textrun_core::utils::Rect;
use tracing_subscriber::EnvFilter;

/// Output type for the extracted runs.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputType {
    /// One run per line: page, x, y, width, height, content
    #[default]
    Text,
    /// JSON array of pages
    Json,
}

/// Dump positioned text runs from decoded PDF content streams.
#[derive(Parser, Debug)]
#[command(name = "textruns")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One content-stream file per page, in page order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Output type
    #[arg(short = 't', long = "output-type", value_enum, default_value_t = OutputType::Text)]
    output_type: OutputType,

    /// Output file name ("-" for stdout)
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Character that receives word spacing
    #[arg(long = "word-separator", default_value_t = ' ')]
    word_separator: char,

    /// Drop runs whose origin is outside "x0,y0,x1,y1"
    #[arg(long = "media-box")]
    media_box: Option<String>,
}

#[derive(Serialize)]
struct PageOutput<'a> {
    page: u32,
    runs: &'a [SpatialObject],
    skipped: Vec<String>,
    aborted: Option<String>,
}

impl<'a> From<&'a PageRuns> for PageOutput<'a> {
    fn from(page: &'a PageRuns) -> Self {
        Self {
            page: page.page,
            runs: &page.runs,
            skipped: page.skipped.iter().map(ToString::to_string).collect(),
            aborted: page.aborted.as_ref().map(ToString::to_string),
        }
    }
}

fn parse_media_box(spec: &str) -> Result<Rect> {
    let values = spec
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid media box value: {part:?}"))
        })
        .collect::<Result<Vec<_>>>()?;
    match values.as_slice() {
        &[x0, y0, x1, y1] => Ok((x0, y0, x1, y1)),
        _ => bail!("media box needs 4 comma-separated numbers, got {}", values.len()),
    }
}

fn build_options(args: &Args) -> Result<InterpretOptions> {
    let mut options = InterpretOptions::default().with_word_separator(args.word_separator);
    if let Some(spec) = &args.media_box {
        options = options.with_media_box(parse_media_box(spec)?);
    }
    Ok(options)
}

fn write_text<W: Write>(out: &mut W, pages: &[PageRuns]) -> Result<()> {
    for page in pages {
        for run in &page.runs {
            writeln!(
                out,
                "{}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{}",
                page.page, run.x, run.y, run.width, run.height, run.content
            )?;
        }
    }
    Ok(())
}

fn write_json<W: Write>(out: &mut W, pages: &[PageRuns]) -> Result<()> {
    let pages: Vec<PageOutput<'_>> = pages.iter().map(PageOutput::from).collect();
    serde_json::to_writer_pretty(&mut *out, &pages)?;
    writeln!(out)?;
    Ok(())
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let options = build_options(&args)?;

    let contents = args
        .files
        .iter()
        .map(|path| fs::read(path).with_context(|| format!("failed to read {}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    let pages = interpret_pages(contents.iter().map(Vec::as_slice), &ZeroMetrics, &options);
    for page in pages.iter().filter(|page| !page.is_complete()) {
        tracing::warn!(page = page.page, "page ended early");
    }

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    match args.output_type {
        OutputType::Text => write_text(&mut output, &pages)?,
        OutputType::Json => write_json(&mut output, &pages)?,
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use textrun_core::error::InterpError;

    fn sample_pages() -> Vec<PageRuns> {
        vec![
            PageRuns {
                page: 0,
                runs: vec![
                    SpatialObject::new((72.0, 700.0), 0.0, 0.0, "H"),
                    SpatialObject::new((78.5, 700.0), 12.25, 10.0, "i"),
                ],
                skipped: Vec::new(),
                aborted: None,
            },
            PageRuns {
                page: 1,
                runs: Vec::new(),
                skipped: Vec::new(),
                aborted: Some(InterpError::StateUnderflow {
                    page: Some(1),
                    operator_index: 1,
                }),
            },
        ]
    }

    #[test]
    fn test_write_text() {
        let mut out = Vec::new();
        write_text(&mut out, &sample_pages()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0\t72.000\t700.000\t0.000\t0.000\tH\n0\t78.500\t700.000\t12.250\t10.000\ti\n"
        );
    }

    #[test]
    fn test_write_json() {
        let pages = sample_pages();
        let mut out = Vec::new();
        write_json(&mut out, &pages).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[0]["page"], 0);
        assert_eq!(value[0]["runs"][1]["content"], "i");
        assert_eq!(value[0]["runs"][1]["width"], 12.25);
        assert!(value[0]["aborted"].is_null());
        assert_eq!(
            value[1]["aborted"],
            pages[1].aborted.as_ref().unwrap().to_string()
        );
    }

    #[test]
    fn test_parse_media_box() {
        assert_eq!(
            parse_media_box("0, 0, 612, 792").unwrap(),
            (0.0, 0.0, 612.0, 792.0)
        );
        assert!(parse_media_box("0,0,612").is_err());
        assert!(parse_media_box("a,b,c,d").is_err());
    }
}
