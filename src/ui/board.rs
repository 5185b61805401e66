use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
};

/// Widget for the text of the current page.
pub struct Board<'a> {
    text: &'a str,
    scroll_offset: u16,
    line_spacing: u8,
}

impl<'a> Board<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            scroll_offset: 0,
            line_spacing: 0,
        }
    }

    pub fn with_scroll_offset(mut self, scroll_offset: u16) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    pub fn with_line_spacing(mut self, line_spacing: u8) -> Self {
        self.line_spacing = line_spacing;
        self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.text.trim().is_empty() {
            self.render_empty(frame, area);
            return;
        }

        let lines = wrapped_lines(self.text, area.width as usize, self.line_spacing);
        let start = (self.scroll_offset as usize).min(lines.len().saturating_sub(1));
        let visible: Vec<Line> = lines
            .into_iter()
            .skip(start)
            .take(area.height as usize)
            .map(Line::from)
            .collect();

        frame.render_widget(Paragraph::new(visible), area);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new("This page is empty")
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

/// Wrap `text` to `width` columns, adding `line_spacing` blank lines after each
/// wrapped line.
pub fn wrapped_lines(text: &str, width: usize, line_spacing: u8) -> Vec<String> {
    let mut lines = Vec::new();
    for line in textwrap::wrap(text, width.max(1)) {
        lines.push(line.into_owned());
        lines.extend((0..line_spacing).map(|_| String::new()));
    }
    lines
}
