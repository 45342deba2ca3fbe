use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Color;
use ratatui::text::Span;

use crate::tree::{ChildDestination, RootState};
use crate::tui::component::Component;
use crate::tui::sheet::Sheet;

const ROOT_HINTS: &[&str] = &["p  present child", "q  quit"];
const CHILD_HINTS: &[&str] = &[
    "1  present first grandchild",
    "2  present second grandchild",
    "d  dismiss child (when no grandchild is showing)",
];
const GRANDCHILD_HINTS: &[&str] = &["d  dismiss"];

/// Draws every presented level from the given snapshot, outermost first.
pub fn draw_ui(frame: &mut Frame, state: &RootState, status: &str) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Min(0), Length(1)]);
    let [main_area, status_area] = layout.areas(frame.area());

    Sheet {
        title: "Root",
        generation: 0,
        hints: ROOT_HINTS,
        accent: Color::White,
    }
    .render(frame, main_area);

    frame.render_widget(Span::raw(status), status_area);

    let Some(child) = state.child() else {
        return;
    };
    let child_area = Sheet::inset(body(main_area), 85);
    Sheet {
        title: "Child",
        generation: state.destination.generation(),
        hints: CHILD_HINTS,
        accent: Color::Cyan,
    }
    .render(frame, child_area);

    let Some(grandchild) = child.grandchild() else {
        return;
    };
    let accent = match grandchild {
        ChildDestination::FirstGrandchild(_) => Color::Yellow,
        ChildDestination::SecondGrandchild(_) => Color::Magenta,
    };
    Sheet {
        title: grandchild.label(),
        generation: child.destination.generation(),
        hints: GRANDCHILD_HINTS,
        accent,
    }
    .render(frame, Sheet::inset(body(child_area), 70));
}

/// Area under a sheet's hint lines, where a nested sheet goes.
fn body(area: Rect) -> Rect {
    let [_, rest] = Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);
    rest
}
