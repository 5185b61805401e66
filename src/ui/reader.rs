use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::debug;

use crate::config::Config;
use crate::engine::worker::Worker;
use crate::engine::{BookReader, Command, DEFAULT_SHELF, LoadStatus, MessageType};
use crate::settings::{Action, MAX_WORDS_PER_PAGE, MIN_WORDS_PER_PAGE, WORDS_PER_PAGE_STEP};
use crate::ui::board::Board;
use crate::ui::windows::{help::HelpWindow, info::InfoWindow};

/// Longest the loop sleeps, so worker responses are picked up promptly.
const RESPONSE_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub show_help: bool,
    pub show_info: bool,
    pub should_quit: bool,
    pub page_area: Rect,
    pub slider_area: Rect,
}

pub struct Reader {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    engine: BookReader,
    worker: Worker,
    config: Config,
    ui_state: UiState,
}

impl Reader {
    pub fn new(engine: BookReader, worker: Worker, config: Config) -> eyre::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            engine,
            worker,
            config,
            ui_state: UiState::default(),
        })
    }

    pub fn run(&mut self) -> eyre::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::event::EnableMouseCapture
        )?;

        self.terminal.clear()?;
        self.terminal.hide_cursor()?;

        let commands = self.engine.open();
        self.dispatch(commands);
        if self.config.settings.start_fullscreen {
            self.engine.enter_fullscreen(Instant::now());
        }

        let result = self.event_loop();

        self.engine.teardown();

        self.terminal.clear()?;
        self.terminal.show_cursor()?;
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        )?;
        crossterm::terminal::disable_raw_mode()?;

        result
    }

    fn event_loop(&mut self) -> eyre::Result<()> {
        while !self.ui_state.should_quit {
            while let Some(response) = self.worker.try_recv() {
                let commands = self.engine.apply(response, Instant::now());
                self.dispatch(commands);
            }

            let commands = self.engine.tick(Instant::now());
            self.dispatch(commands);

            let mut areas = (Rect::default(), Rect::default());
            {
                let engine = &self.engine;
                let ui_state = &self.ui_state;
                let config = &self.config;
                self.terminal.draw(|frame| {
                    areas = Self::render(frame, engine, ui_state, config);
                })?;
            }
            (self.ui_state.page_area, self.ui_state.slider_area) = areas;

            let poll_timeout = self
                .engine
                .next_wakeup(Instant::now())
                .map_or(RESPONSE_POLL, |wakeup| wakeup.min(RESPONSE_POLL));
            if !crossterm::event::poll(poll_timeout)? {
                continue;
            }

            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
                Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                _ => {}
            }
        }
        Ok(())
    }

    fn dispatch(&self, commands: Vec<Command>) {
        for command in commands {
            debug!(?command, "dispatching");
            self.worker.dispatch(command);
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.ui_state.show_help || self.ui_state.show_info {
            self.ui_state.show_help = false;
            self.ui_state.show_info = false;
            return;
        }

        let action = match key.code {
            KeyCode::Right | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Left | KeyCode::PageUp => Some(Action::PrevPage),
            KeyCode::Home => Some(Action::FirstPage),
            KeyCode::End => Some(Action::LastPage),
            KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Enter => {
                if self.engine.slider().is_dragging() {
                    let commands = self.engine.release_scrub(None, Instant::now());
                    self.dispatch(commands);
                }
                None
            }
            KeyCode::Esc => {
                self.engine.clear_message();
                self.engine.exit_fullscreen();
                None
            }
            KeyCode::Char(c) => self.config.keymap.action_for(c),
            _ => None,
        };

        if let Some(action) = action {
            self.perform(action);
        }
    }

    fn perform(&mut self, action: Action) {
        let now = Instant::now();
        let commands = match action {
            Action::NextPage => self.engine.next_page(now),
            Action::PrevPage => self.engine.previous_page(now),
            Action::ForwardTen => self.engine.forward_ten(now),
            Action::BackTen => self.engine.back_ten(now),
            Action::FirstPage => self.engine.first_page(now),
            Action::LastPage => self.engine.last_page(now),
            Action::ScrollDown => {
                self.engine.scroll_by(1);
                Vec::new()
            }
            Action::ScrollUp => {
                self.engine.scroll_by(-1);
                Vec::new()
            }
            Action::ScrubForward => {
                self.engine.scrub_by(1, now);
                Vec::new()
            }
            Action::ScrubBack => {
                self.engine.scrub_by(-1, now);
                Vec::new()
            }
            Action::ToggleReading => {
                self.engine.toggle_reading(now);
                Vec::new()
            }
            Action::SaveProgress => self.engine.save_progress(now),
            Action::AddToBookshelf => self.engine.add_to_bookshelf(DEFAULT_SHELF, now),
            Action::Fullscreen => {
                self.engine.toggle_fullscreen(now);
                Vec::new()
            }
            Action::MoreWords | Action::FewerWords => {
                let current = self.engine.pagination().words_per_page();
                let next = if action == Action::MoreWords {
                    current.saturating_add(WORDS_PER_PAGE_STEP)
                } else {
                    current.saturating_sub(WORDS_PER_PAGE_STEP)
                };
                self.engine
                    .set_words_per_page(next.clamp(MIN_WORDS_PER_PAGE, MAX_WORDS_PER_PAGE), now)
            }
            Action::BookInfo => {
                self.ui_state.show_info = true;
                Vec::new()
            }
            Action::Help => {
                self.ui_state.show_help = true;
                Vec::new()
            }
            Action::Quit => {
                self.ui_state.should_quit = true;
                Vec::new()
            }
        };
        self.dispatch(commands);
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let now = Instant::now();
        let position = Position::new(mouse.column, mouse.row);
        let on_slider = self.ui_state.slider_area.contains(position);
        let total = self.engine.pagination().total_pages();
        let page = slider_page_at(self.ui_state.slider_area, mouse.column, total);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if on_slider => {
                self.engine.begin_scrub(page, now);
            }
            MouseEventKind::Down(MouseButton::Left)
                if self.ui_state.page_area.contains(position) =>
            {
                self.engine.tap_viewport(now);
            }
            MouseEventKind::Drag(MouseButton::Left) if self.engine.slider().is_dragging() => {
                self.engine.scrub_to(page, now);
            }
            MouseEventKind::Up(MouseButton::Left) if self.engine.slider().is_dragging() => {
                let commands = self.engine.release_scrub(Some(page), now);
                self.dispatch(commands);
            }
            MouseEventKind::ScrollDown => self.engine.scroll_by(1),
            MouseEventKind::ScrollUp => self.engine.scroll_by(-1),
            _ => {}
        }
    }

    /// Draw one frame; returns the page and slider areas for mouse hit tests.
    fn render(
        frame: &mut Frame,
        engine: &BookReader,
        ui_state: &UiState,
        config: &Config,
    ) -> (Rect, Rect) {
        let fullscreen = engine.dock().is_fullscreen();
        let dock_visible = engine.dock().is_visible();

        let chunks = Layout::vertical([
            Constraint::Length(if fullscreen { 0 } else { 1 }),
            Constraint::Min(0),
            Constraint::Length(if dock_visible { 4 } else { 0 }),
        ])
        .split(frame.area());

        if !fullscreen {
            Self::render_header(frame, chunks[0], engine);
        }

        let page_area = padded(chunks[1]);
        Self::render_page(frame, page_area, engine, config);

        let slider_area = if dock_visible {
            Self::render_dock(frame, chunks[2], engine, config)
        } else {
            Rect::default()
        };

        if ui_state.show_help {
            HelpWindow::render(frame, frame.area());
        } else if ui_state.show_info {
            InfoWindow::render(frame, frame.area(), engine.book(), engine.shelf_status());
        }

        if let Some(message) = engine.message() {
            Self::render_message(frame, &message.text, message.kind);
        }

        (page_area, slider_area)
    }

    fn render_header(frame: &mut Frame, area: Rect, engine: &BookReader) {
        let title = match engine.book() {
            Some(book) if !book.author.is_empty() => format!("{} by {}", book.title, book.author),
            Some(book) => book.title.clone(),
            None => format!("tome: {}", engine.key()),
        };
        let mut spans = vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if !engine.is_authenticated() {
            spans.push(Span::styled(
                "  (not logged in)",
                Style::default().fg(Color::DarkGray),
            ));
        }
        let header = Paragraph::new(Line::from(spans));
        frame.render_widget(header, area);
    }

    fn render_page(frame: &mut Frame, area: Rect, engine: &BookReader, config: &Config) {
        let notice = |title: &str, body: &str, color: Color| {
            Paragraph::new(vec![
                Line::from(Span::styled(
                    title.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(body.to_string()),
            ])
            .wrap(Wrap { trim: true })
        };

        match engine.status() {
            LoadStatus::Idle | LoadStatus::LoadingBook | LoadStatus::LoadingContent => {
                frame.render_widget(notice("Loading...", "", Color::DarkGray), area);
            }
            LoadStatus::BookNotFound(reason) => {
                let body = format!("{reason}\n\nPress q to quit.");
                frame.render_widget(notice("Book Not Found", &body, Color::Red), area);
            }
            LoadStatus::ContentUnavailable(reason) => match engine.display_text() {
                Some(summary) => {
                    frame.render_widget(notice("Content Unavailable", summary, Color::Yellow), area);
                }
                None => {
                    frame.render_widget(notice("Content Unavailable", reason, Color::Yellow), area);
                }
            },
            LoadStatus::Ready => {
                Board::new(engine.display_text().unwrap_or_default())
                    .with_scroll_offset(engine.pagination().scroll_offset())
                    .with_line_spacing(config.settings.line_spacing)
                    .render(frame, area);
            }
        }
    }

    /// Draw the dock; returns the slider row.
    fn render_dock(frame: &mut Frame, area: Rect, engine: &BookReader, config: &Config) -> Rect {
        let block = Block::default().borders(Borders::TOP);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let pagination = engine.pagination();
        let session = engine.session();
        let mut spans = vec![Span::raw(format!(
            " Page {} of {}",
            engine.slider_value(),
            pagination.total_pages()
        ))];
        if config.settings.show_progress_indicator {
            spans.push(Span::raw(format!(
                " ({}%)",
                crate::engine::session::progress_percent(
                    pagination.current_page(),
                    pagination.total_pages()
                )
            )));
        }
        let (label, color) = if session.is_active() {
            ("Reading", Color::Green)
        } else {
            ("Paused", Color::DarkGray)
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{label} {} min", session.accumulated_minutes()),
            Style::default().fg(color),
        ));
        spans.push(Span::raw(format!("  {} words/page", pagination.words_per_page())));
        if let Some(mode) = pagination.mode() {
            spans.push(Span::styled(
                format!("  [{mode}]"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

        let slider_area = rows[1];
        let bar = slider_bar(
            slider_area.width as usize,
            engine.slider_value(),
            pagination.total_pages(),
        );
        let style = if engine.slider().is_dragging() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Blue)
        };
        frame.render_widget(Paragraph::new(bar).style(style), slider_area);
        slider_area
    }

    fn render_message(frame: &mut Frame, message: &str, message_type: MessageType) {
        let color = match message_type {
            MessageType::Info => Color::Blue,
            MessageType::Warning => Color::Yellow,
            MessageType::Error => Color::Red,
        };

        let message_paragraph = Paragraph::new(message)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        let frame_area = frame.area();
        let area = Rect {
            x: frame_area.x + 2,
            y: frame_area.y + 2,
            width: frame_area.width.saturating_sub(4),
            height: 3,
        };

        frame.render_widget(Clear, area);
        frame.render_widget(message_paragraph, area);
    }
}

fn padded(area: Rect) -> Rect {
    let margin = if area.width <= 20 { 0 } else { (area.width / 10).clamp(2, 12) };
    Rect {
        x: area.x + margin,
        y: area.y + 1.min(area.height),
        width: area.width.saturating_sub(margin * 2),
        height: area.height.saturating_sub(1),
    }
}

/// Page under column `x` of the slider row.
pub fn slider_page_at(area: Rect, x: u16, total_pages: u32) -> u32 {
    if total_pages <= 1 || area.width <= 1 {
        return 1;
    }
    let offset = x.saturating_sub(area.x).min(area.width - 1) as u64;
    let span = (area.width - 1) as u64;
    1 + ((offset * (total_pages as u64 - 1) + span / 2) / span) as u32
}

/// Text rendering of the slider: filled up to the thumb, empty after it.
pub fn slider_bar(width: usize, value: u32, total_pages: u32) -> String {
    if width == 0 {
        return String::new();
    }
    let thumb = if total_pages <= 1 {
        0
    } else {
        ((value.saturating_sub(1) as u64 * (width as u64 - 1) + (total_pages as u64 - 1) / 2)
            / (total_pages as u64 - 1)) as usize
    };
    let thumb = thumb.min(width - 1);
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat_n('━', thumb));
    bar.push('●');
    bar.extend(std::iter::repeat_n('─', width - thumb - 1));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_maps_columns_to_pages() {
        let area = Rect::new(10, 0, 11, 1);
        assert_eq!(slider_page_at(area, 10, 101), 1);
        assert_eq!(slider_page_at(area, 15, 101), 51);
        assert_eq!(slider_page_at(area, 20, 101), 101);
        assert_eq!(slider_page_at(area, 0, 101), 1);
        assert_eq!(slider_page_at(area, 80, 101), 101);
        assert_eq!(slider_page_at(area, 15, 0), 1);
    }

    #[test]
    fn slider_bar_places_thumb() {
        assert_eq!(slider_bar(5, 1, 9), "●────");
        assert_eq!(slider_bar(5, 5, 9), "━━●──");
        assert_eq!(slider_bar(5, 9, 9), "━━━━●");
        assert_eq!(slider_bar(3, 1, 0), "●──");
        assert_eq!(slider_bar(0, 1, 9), "");
    }
}
