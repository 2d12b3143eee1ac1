//! In-memory text model standing in for an editor view.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::app::host::View;
use crate::domain::encoding::Encoding;
use crate::domain::errors::DomainError;
use crate::domain::model::Region;

/// Decoded document text addressed by character position, with its selections.
///
/// Line endings are normalised to `\n` the way editor buffers hold them, so rows and columns
/// match what an editor would show.
#[derive(Debug, Clone, Default)]
pub struct BufferView {
    chars: Vec<char>,
    line_starts: Vec<usize>,
    file_name: Option<PathBuf>,
    encoding: Encoding,
    selections: Vec<Region>,
}

impl BufferView {
    /// Load `path` decoded with `encoding`.
    pub fn open(path: &Path, encoding: Encoding) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let text = encoding
            .decode_document(&bytes)
            .ok_or_else(|| DomainError::Decode {
                row: 0,
                encoding: encoding.label().to_string(),
            })
            .with_context(|| format!("failed to decode {}", path.display()))?;
        Ok(Self::from_text(&text, Some(path.to_path_buf()), encoding))
    }

    /// A buffer with no file behind it.
    pub fn unsaved(text: &str) -> Self {
        Self::from_text(text, None, Encoding::default())
    }

    pub fn from_text(text: &str, file_name: Option<PathBuf>, encoding: Encoding) -> Self {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let chars: Vec<char> = normalized.chars().collect();
        let line_starts = std::iter::once(0)
            .chain(
                chars
                    .iter()
                    .enumerate()
                    .filter(|(_, ch)| **ch == '\n')
                    .map(|(index, _)| index + 1),
            )
            .collect();

        Self {
            chars,
            line_starts,
            file_name,
            encoding,
            selections: Vec::new(),
        }
    }

    /// Number of characters in the buffer.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn add_selection(&mut self, region: Region) {
        self.selections.push(region);
    }

    /// Last position on `row` before its newline.
    fn line_end(&self, row: usize) -> usize {
        self.line_starts
            .get(row + 1)
            .map_or(self.chars.len(), |next| next - 1)
    }
}

impl View for BufferView {
    fn selections(&self) -> Vec<Region> {
        self.selections.clone()
    }

    fn rowcol(&self, point: usize) -> (usize, usize) {
        let point = point.min(self.chars.len());
        let row = self.line_starts.partition_point(|start| *start <= point) - 1;
        (row, point - self.line_starts[row])
    }

    fn text_point(&self, row: usize, col: usize) -> usize {
        match self.line_starts.get(row) {
            Some(start) => (start + col).min(self.line_end(row)),
            None => self.chars.len(),
        }
    }

    fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn substr(&self, region: Region) -> String {
        let len = self.chars.len();
        self.chars[region.begin().min(len)..region.end().min(len)]
            .iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rowcol_and_text_point_agree() {
        let view = BufferView::unsaved("ab\ncdé\n\nlast");
        for point in 0..=view.len() {
            let (row, col) = view.rowcol(point);
            assert_eq!(view.text_point(row, col), point);
        }
        assert_eq!(view.rowcol(5), (1, 2));
        assert_eq!(view.rowcol(7), (2, 0));
        assert_eq!(view.line_count(), 4);
    }

    #[test]
    fn text_point_clamps_to_line_end() {
        let view = BufferView::unsaved("ab\ncd");
        assert_eq!(view.text_point(0, 10), 2);
        assert_eq!(view.text_point(1, 10), 5);
        assert_eq!(view.text_point(9, 0), 5);
    }

    #[test]
    fn crlf_is_a_single_newline() {
        let view = BufferView::unsaved("ab\r\ncd\rx");
        assert_eq!(view.rowcol(3), (1, 0));
        assert_eq!(view.rowcol(6), (2, 0));
        assert_eq!(view.substr(Region::new(0, 100)), "ab\ncd\nx");
    }

    #[test]
    fn open_decodes_with_declared_encoding() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("latin.txt");
        fs::write(&path, [b'c', b'a', b'f', 0xE9])?;

        let view = BufferView::open(&path, Encoding::Latin1)?;
        assert_eq!(view.substr(Region::new(0, 4)), "café");
        assert_eq!(view.file_name(), Some(path.as_path()));
        assert!(BufferView::open(&path, Encoding::Utf8).is_err());
        Ok(())
    }
}
