use file_offset::app::report::{Report, ReportOptions};
use file_offset::domain::model::{Endpoint, OffsetPair, Selection};
use file_offset::infra::buffer::BufferView;
use insta::assert_snapshot;

#[test]
fn multi_selection_report_renders() {
    let view = BufferView::unsaved("fn main() {\n    println!(\"hello\");\n}\n");
    let selections = [
        Selection::new(Endpoint::new(0, 3, 3), Endpoint::new(0, 7, 7)),
        Selection::new(Endpoint::new(1, 4, 16), Endpoint::new(2, 1, 36)),
        Selection::caret(Endpoint::new(2, 0, 35)),
    ];
    let offsets = [
        OffsetPair::new(3, 7),
        OffsetPair::new(16, 36),
        OffsetPair::at(35),
    ];

    let report = Report::build(&view, &selections, &offsets, &ReportOptions::default());
    assert_snapshot!("multi_selection_report", report.to_text("None"));
}
