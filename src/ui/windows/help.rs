use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub struct HelpWindow;

const HELP_TEXT: &[&str] = &[
    " Pages:",
    "   l / Right         Next Page",
    "   h / Left          Previous Page",
    "   L / H             Forward / Back 10 Pages",
    "   g / Home          First Page",
    "   G / End           Last Page",
    "   j / k             Scroll Page Down / Up",
    "",
    " Slider:",
    "   ] / [             Scrub Forward / Back",
    "   Enter             Jump To Scrubbed Page",
    "   Mouse             Drag The Slider",
    "",
    " Reading:",
    "   r                 Start / Pause Reading Timer",
    "   s                 Save Progress",
    "   b                 Add To Bookshelf",
    "",
    " Display:",
    "   f                 Toggle Fullscreen",
    "   Esc               Leave Fullscreen",
    "   + / -             More / Fewer Words Per Page",
    "   i                 Book Info",
    "   ?                 Help",
    "   q                 Quit / Close Window",
];

impl HelpWindow {
    pub fn render(frame: &mut Frame, area: Rect) {
        let help_content: Vec<Line> = HELP_TEXT.iter().map(|&s| Line::from(s)).collect();

        let max_width = help_content.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let width = (max_width + 4).min(area.width);
        let height = (help_content.len() as u16 + 2).min(area.height);

        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);

        let help_paragraph =
            Paragraph::new(help_content).block(Block::default().title("Help").borders(Borders::ALL));

        frame.render_widget(help_paragraph, popup_area);
    }
}
