//! # Sheet Component
//!
//! One presented level, drawn as a bordered panel that covers whatever is
//! beneath it. Nested levels are drawn as smaller sheets inside the body
//! of their parent.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

use crate::tui::component::Component;

pub struct Sheet<'a> {
    pub title: &'a str,
    pub generation: u64,
    pub hints: &'a [&'a str],
    pub accent: Color,
}

impl Sheet<'_> {
    /// The area left for a nested sheet, `percent` of this sheet's body.
    pub fn inset(area: Rect, percent: u16) -> Rect {
        let [vertical] = Layout::vertical([Constraint::Percentage(percent)])
            .flex(Flex::Center)
            .areas(area);
        let [inner] = Layout::horizontal([Constraint::Percentage(percent)])
            .flex(Flex::Center)
            .areas(vertical);
        inner
    }
}

impl Component for Sheet<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = Style::default().fg(self.accent);
        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" {} ", self.title),
                border.add_modifier(Modifier::BOLD),
            )))
            .title_bottom(Line::from(format!(" gen {} ", self.generation)).right_aligned())
            .border_style(border);

        let lines: Vec<Line> = self
            .hints
            .iter()
            .map(|hint| Line::from(Span::styled(*hint, Style::default().fg(Color::Gray))))
            .collect();

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}
