//! Domain models for selections and computed offsets.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::encoding::Encoding;

/// A half-open span of raw host positions. `a` is the anchor and `b` the caret, so `a` may be
/// greater than `b` for backwards selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub a: usize,
    pub b: usize,
}

impl Region {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    pub fn caret(point: usize) -> Self {
        Self { a: point, b: point }
    }

    pub fn begin(&self) -> usize {
        self.a.min(self.b)
    }

    pub fn end(&self) -> usize {
        self.a.max(self.b)
    }

    pub fn is_empty(&self) -> bool {
        self.a == self.b
    }
}

/// One side of a selection in both coordinate systems the host offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub row: usize,
    pub col: usize,
    pub pos: usize,
}

impl Endpoint {
    pub fn new(row: usize, col: usize, pos: usize) -> Self {
        Self { row, col, pos }
    }

    pub fn rowcol(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub begin: Endpoint,
    pub end: Endpoint,
}

impl Selection {
    pub fn new(begin: Endpoint, end: Endpoint) -> Self {
        Self { begin, end }
    }

    pub fn caret(at: Endpoint) -> Self {
        Self { begin: at, end: at }
    }

    /// A selection is a caret when both endpoints land on the same row and column.
    pub fn is_empty(&self) -> bool {
        self.begin.rowcol() == self.end.rowcol()
    }
}

/// Begin and end offsets of one selection. Equal for carets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OffsetPair {
    pub begin: u64,
    pub end: u64,
}

impl OffsetPair {
    pub fn new(begin: u64, end: u64) -> Self {
        Self { begin, end }
    }

    pub fn at(offset: u64) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_range(&self) -> bool {
        self.begin != self.end
    }
}

/// Where offsets come from: a file on disk read under its declared encoding, or nothing, in
/// which case raw host positions are reported as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backing {
    FileBacked { path: PathBuf, encoding: Encoding },
    Unbacked,
}

impl Backing {
    pub fn kind(&self) -> &'static str {
        match self {
            Backing::FileBacked { .. } => "file",
            Backing::Unbacked => "unbacked",
        }
    }
}
