//! Translating selections into byte offsets.

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};

use crate::domain::encoding::Encoding;
use crate::domain::errors::DomainError;
use crate::domain::model::{Backing, OffsetPair, Selection};
use crate::infra::lines::EncodedLines;

/// One decoded line and the absolute byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub start: u64,
    pub text: String,
}

/// Forward-only supply of decoded lines.
pub trait LineSource {
    /// The next line, or `None` once the source is exhausted.
    fn next_line(&mut self) -> Result<Option<SourceLine>>;

    /// Byte offset just past everything read so far.
    fn position(&self) -> u64;
}

/// Incremental scan over a [`LineSource`], shared by every endpoint of one computation so the
/// file is read at most once.
#[derive(Debug)]
pub struct ScanState<S> {
    source: S,
    encoding: Encoding,
    consumed: usize,
    line_start: u64,
    line: String,
    exhausted: bool,
}

impl<S: LineSource> ScanState<S> {
    pub fn new(source: S, encoding: Encoding) -> Self {
        Self {
            source,
            encoding,
            consumed: 0,
            line_start: 0,
            line: String::new(),
            exhausted: false,
        }
    }

    /// Row of the line currently held, `None` before the first read.
    pub fn current_row(&self) -> Option<usize> {
        self.consumed.checked_sub(1)
    }

    /// Byte offset of `(row, col)`. Rows must not decrease between calls.
    ///
    /// Columns count characters of the decoded line; a column past the end of the line is
    /// clamped to it. Rows past the end of the file resolve to the file length.
    pub fn offset_at(&mut self, row: usize, col: usize) -> Result<u64> {
        if let Some(current) = self.current_row()
            && row < current
        {
            return Err(DomainError::BackwardScan { row, current }.into());
        }

        while self.consumed <= row {
            self.advance(row)?;
        }

        let prefix = match self.line.char_indices().nth(col) {
            Some((index, _)) => &self.line[..index],
            None => self.line.as_str(),
        };
        Ok(self.line_start + self.encoding.encoded_len(prefix))
    }

    fn advance(&mut self, target: usize) -> Result<()> {
        if !self.exhausted
            && let Some(line) = self.source.next_line()?
        {
            self.line_start = line.start;
            self.line = line.text;
            self.consumed += 1;
            return Ok(());
        }

        self.exhausted = true;
        self.line_start = self.source.position();
        self.line.clear();
        self.consumed = target + 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Begin,
    End,
}

/// Compute one [`OffsetPair`] per selection, in input order.
pub fn compute_offsets(selections: &[Selection], backing: &Backing) -> Result<Vec<OffsetPair>> {
    tracing::info!(
        selections = selections.len(),
        backing = backing.kind(),
        "computing offsets"
    );

    match backing {
        Backing::FileBacked { path, encoding } => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            let lines = EncodedLines::new(BufReader::new(file), *encoding);
            offsets_from_lines(selections, lines, *encoding)
                .with_context(|| format!("failed to read {} as {encoding}", path.display()))
        }
        Backing::Unbacked => Ok(offsets_from_positions(selections)),
    }
}

/// Offsets for a document without a file: raw host positions pass through unchanged.
pub fn offsets_from_positions(selections: &[Selection]) -> Vec<OffsetPair> {
    selections
        .iter()
        .map(|selection| OffsetPair::new(selection.begin.pos as u64, selection.end.pos as u64))
        .collect()
}

/// Offsets by scanning `source` once.
///
/// Endpoints are visited in ascending `(row, col)` order whatever order the selections arrive
/// in, then reported back in input order.
pub fn offsets_from_lines<S: LineSource>(
    selections: &[Selection],
    source: S,
    encoding: Encoding,
) -> Result<Vec<OffsetPair>> {
    let mut endpoints = Vec::with_capacity(selections.len() * 2);
    for (index, selection) in selections.iter().enumerate() {
        endpoints.push((selection.begin.rowcol(), index, Side::Begin));
        if !selection.is_empty() {
            endpoints.push((selection.end.rowcol(), index, Side::End));
        }
    }
    endpoints.sort_by_key(|(rowcol, _, _)| *rowcol);

    let mut scan = ScanState::new(source, encoding);
    let mut begins = vec![0u64; selections.len()];
    let mut ends: Vec<Option<u64>> = vec![None; selections.len()];
    for ((row, col), index, side) in endpoints {
        let offset = scan.offset_at(row, col)?;
        tracing::debug!(row, col, offset, "resolved endpoint");
        match side {
            Side::Begin => begins[index] = offset,
            Side::End => ends[index] = Some(offset),
        }
    }

    Ok(begins
        .into_iter()
        .zip(ends)
        .map(|(begin, end)| OffsetPair::new(begin, end.unwrap_or(begin)))
        .collect())
}
