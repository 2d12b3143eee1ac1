//! Delivering a rendered report to the host.

use anyhow::Result;

use crate::app::host::Surface;

/// How a report reached the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Dialog,
    Scratch,
}

/// A single selection is shown as a dialog; several go to a new scratch document.
pub fn present<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    selection_count: usize,
) -> Result<Presentation> {
    if selection_count > 1 {
        tracing::info!(selection_count, "opening scratch document");
        surface.new_scratch_document(text)?;
        Ok(Presentation::Scratch)
    } else {
        surface.message_dialog(text)?;
        Ok(Presentation::Dialog)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Surface that remembers what it was asked to show.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub dialogs: Vec<String>,
        pub scratch: Vec<String>,
    }

    impl Surface for RecordingSurface {
        fn message_dialog(&mut self, text: &str) -> Result<()> {
            self.dialogs.push(text.to_string());
            Ok(())
        }

        fn new_scratch_document(&mut self, text: &str) -> Result<()> {
            self.scratch.push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn one_selection_uses_a_dialog() -> Result<()> {
        let mut surface = RecordingSurface::default();
        assert_eq!(present(&mut surface, "x", 1)?, Presentation::Dialog);
        assert_eq!(surface.dialogs, vec!["x".to_string()]);
        assert!(surface.scratch.is_empty());
        Ok(())
    }

    #[test]
    fn several_selections_open_a_scratch_document() -> Result<()> {
        let mut surface = RecordingSurface::default();
        assert_eq!(present(&mut surface, "y", 3)?, Presentation::Scratch);
        assert_eq!(surface.scratch, vec!["y".to_string()]);
        assert!(surface.dialogs.is_empty());
        Ok(())
    }
}
