//! Reading the host's selections into row/column form.

use crate::app::host::View;
use crate::domain::model::{Endpoint, Selection};

/// Resolve every selection of `view` to both coordinate systems, keeping the host's order.
pub fn collect_selections<V: View + ?Sized>(view: &V) -> Vec<Selection> {
    view.selections()
        .into_iter()
        .map(|region| {
            let (begin_pos, end_pos) = (region.begin(), region.end());
            let (row, col) = view.rowcol(begin_pos);
            let begin = Endpoint::new(row, col, begin_pos);
            if region.is_empty() {
                Selection::caret(begin)
            } else {
                let (end_row, end_col) = view.rowcol(end_pos);
                Selection::new(begin, Endpoint::new(end_row, end_col, end_pos))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::model::Region;
    use crate::infra::buffer::BufferView;

    #[test]
    fn carets_share_one_endpoint() {
        let mut view = BufferView::unsaved("line1\nline2\n");
        view.add_selection(Region::caret(8));

        let selections = collect_selections(&view);
        assert_eq!(selections.len(), 1);
        assert!(selections[0].is_empty());
        assert_eq!(selections[0].begin, Endpoint::new(1, 2, 8));
        assert_eq!(selections[0].begin, selections[0].end);
    }

    #[test]
    fn backwards_ranges_are_normalised_and_order_is_kept() {
        let mut view = BufferView::unsaved("line1\nline2\n");
        view.add_selection(Region::new(9, 7));
        view.add_selection(Region::new(1, 3));

        let selections = collect_selections(&view);
        assert_eq!(selections[0].begin, Endpoint::new(1, 1, 7));
        assert_eq!(selections[0].end, Endpoint::new(1, 3, 9));
        assert_eq!(selections[1].begin, Endpoint::new(0, 1, 1));
        assert!(!selections[1].is_empty());
    }
}
