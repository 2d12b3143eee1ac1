//! Command line front end acting as the editor host.

use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use crate::app::command::FileOffsetCommand;
use crate::app::host::View;
use crate::app::report::{ReportFormat, ReportOptions};
use crate::domain::encoding::Encoding;
use crate::domain::errors::DomainError;
use crate::domain::model::Region;
use crate::infra::buffer::BufferView;
use crate::infra::config::Config;
use crate::infra::terminal::TerminalSurface;

#[derive(Debug, Parser)]
#[command(
    name = "file-offset",
    author,
    version,
    about = "Report byte offsets of selections in a text file",
    long_about = None
)]
pub struct Cli {
    /// File backing the document. Without it the buffer is read from stdin as unsaved text.
    pub file: Option<PathBuf>,

    /// Selection as ROW:COL, ROW:COL-ROW:COL, @POS or @POS-POS (zero-based). Repeatable.
    #[arg(short, long = "selection", value_name = "SPEC")]
    pub selections: Vec<SelectionSpec>,

    /// Declared encoding of the document, e.g. "UTF-8" or "UTF-16 LE with BOM".
    #[arg(short, long)]
    pub encoding: Option<String>,

    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Treat the document as unsaved, reporting character positions instead of byte offsets.
    #[arg(long)]
    pub unsaved: bool,

    /// Directory receiving the scratch document of multi-selection reports.
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Increase log verbosity.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// A selection as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSpec {
    RowCol {
        begin: (usize, usize),
        end: Option<(usize, usize)>,
    },
    Raw {
        begin: usize,
        end: Option<usize>,
    },
}

impl Default for SelectionSpec {
    fn default() -> Self {
        SelectionSpec::RowCol {
            begin: (0, 0),
            end: None,
        }
    }
}

impl SelectionSpec {
    pub fn to_region<V: View + ?Sized>(&self, view: &V) -> Region {
        match *self {
            SelectionSpec::RowCol { begin, end } => {
                let a = view.text_point(begin.0, begin.1);
                let b = end.map_or(a, |(row, col)| view.text_point(row, col));
                Region::new(a, b)
            }
            SelectionSpec::Raw { begin, end } => Region::new(begin, end.unwrap_or(begin)),
        }
    }
}

impl FromStr for SelectionSpec {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidSelection(value.to_string());
        let trimmed = value.trim();

        if let Some(raw) = trimmed.strip_prefix('@') {
            let (begin, end) = match raw.split_once('-') {
                Some((begin, end)) => (begin, Some(end.trim_start_matches('@'))),
                None => (raw, None),
            };
            let begin: usize = begin.parse().map_err(|_| invalid())?;
            let end = end
                .map(|end| end.parse::<usize>().map_err(|_| invalid()))
                .transpose()?;
            return Ok(SelectionSpec::Raw { begin, end });
        }

        let (begin, end) = match trimmed.split_once('-') {
            Some((begin, end)) => (begin, Some(end)),
            None => (trimmed, None),
        };
        let begin = parse_rowcol(begin).ok_or_else(invalid)?;
        let end = match end {
            Some(end) => Some(parse_rowcol(end).ok_or_else(invalid)?),
            None => None,
        };
        Ok(SelectionSpec::RowCol { begin, end })
    }
}

fn parse_rowcol(input: &str) -> Option<(usize, usize)> {
    let (row, col) = input.split_once(':')?;
    Some((row.trim().parse().ok()?, col.trim().parse().ok()?))
}

/// Execute the command for parsed arguments, reading unsaved buffers from `input` and writing
/// the report to `out`.
pub fn run<R: Read, W: Write>(cli: Cli, input: R, out: W) -> Result<()> {
    let config = Config::load()?;
    let encoding = match &cli.encoding {
        Some(name) => name.parse::<Encoding>()?,
        None => config.defaults.encoding()?,
    };

    let mut options = ReportOptions::from_config(&config);
    if let Some(format) = cli.format {
        options.format = format;
    }

    let mut view = load_view(&cli, input, encoding)?;
    if cli.selections.is_empty() {
        view.add_selection(SelectionSpec::default().to_region(&view));
    }
    for spec in &cli.selections {
        let region = spec.to_region(&view);
        view.add_selection(region);
    }

    let scratch_dir = cli.scratch_dir.or(config.scratch.directory);
    let mut surface = TerminalSurface::new(out).with_scratch_dir(scratch_dir);
    let outcome = FileOffsetCommand::new(options).run(&view, &mut surface)?;
    tracing::info!(presentation = ?outcome.presentation, "report delivered");
    Ok(())
}

fn load_view<R: Read>(cli: &Cli, mut input: R, encoding: Encoding) -> Result<BufferView> {
    let bytes = match (&cli.file, cli.unsaved) {
        (Some(path), false) => return BufferView::open(path, encoding),
        (Some(path), true) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        (None, _) => {
            let mut bytes = Vec::new();
            input
                .read_to_end(&mut bytes)
                .context("failed to read unsaved buffer from stdin")?;
            bytes
        }
    };

    let text = encoding
        .decode_document(&bytes)
        .ok_or_else(|| DomainError::Decode {
            row: 0,
            encoding: encoding.label().to_string(),
        })?;
    Ok(BufferView::from_text(&text, None, encoding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_row_col_specs() {
        assert_eq!(
            "3:4".parse::<SelectionSpec>(),
            Ok(SelectionSpec::RowCol {
                begin: (3, 4),
                end: None
            })
        );
        assert_eq!(
            "0:1-2:0".parse::<SelectionSpec>(),
            Ok(SelectionSpec::RowCol {
                begin: (0, 1),
                end: Some((2, 0))
            })
        );
    }

    #[test]
    fn parses_raw_position_specs() {
        assert_eq!(
            "@7".parse::<SelectionSpec>(),
            Ok(SelectionSpec::Raw {
                begin: 7,
                end: None
            })
        );
        assert_eq!(
            "@7-@12".parse::<SelectionSpec>(),
            Ok(SelectionSpec::Raw {
                begin: 7,
                end: Some(12)
            })
        );
    }

    #[test]
    fn rejects_malformed_specs() {
        for spec in ["", "3", "a:b", "1:2-", "@x", "@1-y"] {
            assert_eq!(
                spec.parse::<SelectionSpec>(),
                Err(DomainError::InvalidSelection(spec.to_string())),
                "{spec}"
            );
        }
    }

    #[test]
    fn specs_resolve_against_the_view() {
        let view = BufferView::unsaved("line1\nline2\n");
        assert_eq!(SelectionSpec::default().to_region(&view), Region::caret(0));
        let spec: SelectionSpec = "1:2-1:4".parse().unwrap();
        assert_eq!(spec.to_region(&view), Region::new(8, 10));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
