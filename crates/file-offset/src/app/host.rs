//! Capabilities the pipeline needs from the editor hosting it.

use std::path::Path;

use anyhow::Result;

use crate::domain::encoding::Encoding;
use crate::domain::model::Region;

/// Read access to the active document.
pub trait View {
    /// Current selections, in the order the host keeps them.
    fn selections(&self) -> Vec<Region>;

    /// Zero-based row and column of a raw position.
    fn rowcol(&self, point: usize) -> (usize, usize);

    /// Raw position of a row and column.
    fn text_point(&self, row: usize, col: usize) -> usize;

    /// Path of the file backing the document, `None` for unsaved buffers.
    fn file_name(&self) -> Option<&Path>;

    fn encoding(&self) -> Encoding;

    fn substr(&self, region: Region) -> String;
}

/// Where results are shown.
pub trait Surface {
    /// Show a short modal message.
    fn message_dialog(&mut self, text: &str) -> Result<()>;

    /// Open a new unsaved scratch document with `text` inserted at its start.
    fn new_scratch_document(&mut self, text: &str) -> Result<()>;
}
