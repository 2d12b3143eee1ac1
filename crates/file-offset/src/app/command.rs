//! The file offset command: collect, compute, format, present.

use anyhow::Result;

use crate::app::host::{Surface, View};
use crate::app::offsets::compute_offsets;
use crate::app::present::{Presentation, present};
use crate::app::report::{Report, ReportOptions};
use crate::app::selection::collect_selections;
use crate::domain::model::Backing;

/// Result of one command invocation.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub report: Report,
    pub rendered: String,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, Default)]
pub struct FileOffsetCommand {
    options: ReportOptions,
}

impl FileOffsetCommand {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Run against the host's active document and show the result.
    pub fn run<V, S>(&self, view: &V, surface: &mut S) -> Result<CommandOutcome>
    where
        V: View + ?Sized,
        S: Surface + ?Sized,
    {
        let selections = collect_selections(view);
        let offsets = compute_offsets(&selections, &backing_for(view))?;
        let report = Report::build(view, &selections, &offsets, &self.options);
        let rendered = report.render(&self.options)?;
        let presentation = present(surface, &rendered, offsets.len())?;

        Ok(CommandOutcome {
            report,
            rendered,
            presentation,
        })
    }
}

/// File-backed when the view has a path, otherwise raw positions are used.
pub fn backing_for<V: View + ?Sized>(view: &V) -> Backing {
    match view.file_name() {
        Some(path) => Backing::FileBacked {
            path: path.to_path_buf(),
            encoding: view.encoding(),
        },
        None => Backing::Unbacked,
    }
}
