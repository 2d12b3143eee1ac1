//! Terminal stand-in for the editor's dialogs and scratch documents.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::app::host::Surface;

/// Prints dialogs to `out`. Scratch documents become `offsets-*.txt` files under the scratch
/// directory when one is set, and are printed to `out` otherwise.
#[derive(Debug)]
pub struct TerminalSurface<W> {
    out: W,
    scratch_dir: Option<PathBuf>,
    scratch_documents: Vec<PathBuf>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            scratch_dir: None,
            scratch_documents: Vec::new(),
        }
    }

    pub fn with_scratch_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.scratch_dir = dir;
        self
    }

    /// Files created for scratch documents so far.
    pub fn scratch_documents(&self) -> &[PathBuf] {
        &self.scratch_documents
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_scratch_file(dir: &Path, text: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create scratch directory {}", dir.display()))?;
        let mut file = tempfile::Builder::new()
            .prefix("offsets-")
            .suffix(".txt")
            .tempfile_in(dir)
            .with_context(|| format!("failed to create scratch document in {}", dir.display()))?;
        file.write_all(text.as_bytes())
            .context("failed to write scratch document")?;
        let (_, path) = file.keep().context("failed to keep scratch document")?;
        Ok(path)
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn message_dialog(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(text.as_bytes())
            .context("failed to write report")?;
        self.out.flush().context("failed to flush report")
    }

    fn new_scratch_document(&mut self, text: &str) -> Result<()> {
        match self.scratch_dir.clone() {
            Some(dir) => {
                let path = Self::write_scratch_file(&dir, text)?;
                tracing::info!(path = %path.display(), "wrote scratch document");
                writeln!(self.out, "scratch document: {}", path.display())
                    .context("failed to announce scratch document")?;
                self.scratch_documents.push(path);
                Ok(())
            }
            None => self.message_dialog(text),
        }
    }
}
