use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components receive their data via props (struct fields) and render to a
/// `Frame` within a given `Rect`. The `render` method takes `&mut self` so a
/// component can adjust its own layout (e.g. shrink to fit) while drawing.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
