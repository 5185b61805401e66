use crate::models::{Book, BookStatus};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct InfoWindow;

impl InfoWindow {
    pub fn render(frame: &mut Frame, area: Rect, book: Option<&Book>, status: Option<&BookStatus>) {
        let popup_area = super::centered_popup_area(area, 60, 80);

        frame.render_widget(Clear, popup_area);

        let Some(book) = book else {
            let content = vec![
                Line::from("No book information available"),
                Line::from(""),
                Line::from(Span::styled(
                    "Press any key to close",
                    Style::default().add_modifier(Modifier::ITALIC),
                )),
            ];

            let paragraph = Paragraph::new(content)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title("Book Info").borders(Borders::ALL));

            frame.render_widget(paragraph, popup_area);
            return;
        };

        let shelf = match status {
            Some(status) if status.in_bookshelf => {
                status.shelf.clone().unwrap_or_else(|| "bookshelf".to_string())
            }
            Some(_) => "Not on your bookshelf".to_string(),
            None => "Unknown".to_string(),
        };

        let content = vec![
            Line::from(Span::styled(
                book.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Author: {}", non_empty(&book.author))),
            Line::from(format!(
                "Gutenberg ID: {}",
                book.gutenberg_id.as_deref().unwrap_or("Unknown")
            )),
            Line::from(format!("Shelf: {shelf}")),
            Line::from(""),
            Line::from("Summary:"),
            Line::from(
                book.summary
                    .as_deref()
                    .unwrap_or("No summary available"),
            ),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to close",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];

        let paragraph = Paragraph::new(content)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Book Info").borders(Borders::ALL));

        frame.render_widget(paragraph, popup_area);
    }
}

fn non_empty(value: &str) -> &str {
    if value.trim().is_empty() { "Unknown" } else { value }
}
