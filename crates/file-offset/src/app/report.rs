//! Formatting computed offsets for display.

use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::app::host::View;
use crate::domain::model::{OffsetPair, Region, Selection};
use crate::infra::config::Config;

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Header plus one hex/decimal line per selection.
    #[default]
    Text,
    /// Machine readable report.
    Json,
}

impl FromStr for ReportFormat {
    type Err = ReportFormatParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(ReportFormatParseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Error returned when parsing a [`ReportFormat`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ReportFormatParseError {
    #[error("unknown report format '{0}'")]
    UnknownFormat(String),
}

/// Knobs controlling report contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub format: ReportFormat,
    /// Maximum characters of selected text shown next to each offset.
    pub excerpt_chars: usize,
    /// Also show excerpts for carets, not only for ranges.
    pub excerpt_carets: bool,
    /// Header value used for documents without a file.
    pub unsaved_label: String,
}

impl ReportOptions {
    /// Build options from configuration defaults.
    pub fn from_config(config: &Config) -> Self {
        let name = config.defaults.format();
        let format = <ReportFormat as FromStr>::from_str(&name).unwrap_or_else(|err| {
            tracing::warn!(format = %name, error = %err, "falling back to text report");
            ReportFormat::default()
        });
        Self {
            format,
            excerpt_chars: config.report.excerpt_chars(),
            excerpt_carets: config.report.excerpt_carets(),
            unsaved_label: config.report.unsaved_label(),
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub offsets: OffsetPair,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// Offsets of every selection of one document, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub file_name: Option<String>,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Pair offsets with their selections. Excerpts are only attached when there is more than
    /// one selection.
    pub fn build<V: View + ?Sized>(
        view: &V,
        selections: &[Selection],
        offsets: &[OffsetPair],
        options: &ReportOptions,
    ) -> Self {
        let multi = offsets.len() > 1;
        let entries = offsets
            .iter()
            .zip(selections)
            .map(|(pair, selection)| {
                let wants_excerpt = multi && (pair.is_range() || options.excerpt_carets);
                ReportEntry {
                    offsets: *pair,
                    excerpt: wants_excerpt
                        .then(|| excerpt_at(view, selection, options.excerpt_chars)),
                }
            })
            .collect();

        Self {
            file_name: view.file_name().map(|path| path.display().to_string()),
            entries,
        }
    }

    pub fn is_multi(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn render(&self, options: &ReportOptions) -> Result<String> {
        match options.format {
            ReportFormat::Text => Ok(self.to_text(&options.unsaved_label)),
            ReportFormat::Json => self.to_json(),
        }
    }

    pub fn to_text(&self, unsaved_label: &str) -> String {
        let file_name = self.file_name.as_deref().unwrap_or(unsaved_label);
        let mut text = format!("File name: {file_name}\n\n");
        for entry in &self.entries {
            let OffsetPair { begin, end } = entry.offsets;
            if entry.offsets.is_range() {
                let _ = write!(text, "{} - {}", format_offset(begin), format_offset(end));
            } else {
                text.push_str(&format_offset(begin));
            }
            if let Some(excerpt) = &entry.excerpt {
                text.push('\t');
                text.push_str(excerpt);
            }
            text.push('\n');
        }
        text
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize offset report")
    }
}

/// `0x0000002A (42)`
pub fn format_offset(offset: u64) -> String {
    format!("0x{offset:08X} ({offset})")
}

/// Up to `max_chars` characters from the selection's begin, cut at the first newline.
pub fn excerpt_at<V: View + ?Sized>(view: &V, selection: &Selection, max_chars: usize) -> String {
    let point = view.text_point(selection.begin.row, selection.begin.col);
    let text = view.substr(Region::new(point, point + max_chars));
    text.split('\n').next().unwrap_or_default().to_string()
}
