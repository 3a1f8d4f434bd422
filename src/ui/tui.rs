use std::cell::RefCell;
use std::io::{Stdout, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
};

use crate::application::state::ViewState;
use crate::core::events::UiEvent;
use crate::core::models::MediaKind;
use crate::core::traits::UiRenderer;
use crate::utils::{APP_NAME, amplitude_to_volume, format_duration};

const SEEK_STEP_SECONDS: f64 = 5.0;
const VOLUME_STEP: u8 = 5;

pub struct TuiRenderer {
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
    list_state: RefCell<ListState>,

    // Input state synced from the last rendered view
    kind: MediaKind,
    track_count: usize,
    volume_percent: u8,
}

impl TuiRenderer {
    pub fn new() -> Self {
        Self {
            terminal: None,
            list_state: RefCell::new(ListState::default()),
            kind: MediaKind::Audio,
            track_count: 0,
            volume_percent: 100,
        }
    }

    fn sync_from_view(&mut self, view: &ViewState) {
        self.kind = view.kind;
        self.track_count = view.tracks.len();
        self.volume_percent = amplitude_to_volume(view.playback.volume);
        self.list_state.borrow_mut().select(Some(view.selected_index));
    }

    fn draw_ui(&self, f: &mut Frame, view: &ViewState) {
        if view.kind == MediaKind::Video && view.fullscreen {
            self.draw_zen(f, view);
            return;
        }

        // Video sessions drop the transport rows once the idle window runs
        // out; the stage takes the whole area below the header.
        if view.kind == MediaKind::Video && !view.controls_visible {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(f.area());
            self.draw_header(f, chunks[0], view);
            self.draw_stage(f, chunks[1], view);
            return;
        }

        let constraints = vec![
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Track list or stage
            Constraint::Length(3), // Now playing
            Constraint::Length(3), // Progress
            Constraint::Length(3), // Controls
        ];
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(f.area());

        self.draw_header(f, chunks[0], view);
        match view.kind {
            MediaKind::Audio => self.draw_track_list(f, chunks[1], view),
            MediaKind::Video => self.draw_stage(f, chunks[1], view),
        }
        self.draw_now_playing(f, chunks[2], view);
        self.draw_progress(f, chunks[3], view);
        self.draw_controls(f, chunks[4], view);
    }

    /// Exclusive presentation: the stage fills the viewport, the transport
    /// rows only appear while the controls are visible.
    fn draw_zen(&self, f: &mut Frame, view: &ViewState) {
        if !view.controls_visible {
            self.draw_stage(f, f.area(), view);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Stage
                Constraint::Length(3), // Progress
                Constraint::Length(3), // Controls
            ])
            .split(f.area());

        self.draw_stage(f, chunks[0], view);
        self.draw_progress(f, chunks[1], view);
        self.draw_controls(f, chunks[2], view);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect, view: &ViewState) {
        let kind_label = match view.kind {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        };
        let title = Paragraph::new(format!("♪ {} ♪ - {} session", APP_NAME, kind_label))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn draw_track_list(&self, f: &mut Frame, area: Rect, view: &ViewState) {
        let items: Vec<ListItem> = view
            .tracks
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let marker = if i == view.active_index { "▶" } else { " " };
                let style = if i == view.active_index {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{marker} {:3}. {row}", i + 1)).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Playlist ({} files) ", view.tracks.len())),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        f.render_stateful_widget(list, area, &mut *self.list_state.borrow_mut());
    }

    /// Video placeholder: a terminal cannot raster frames, so the stage
    /// shows the title card where the picture would be.
    fn draw_stage(&self, f: &mut Frame, area: Rect, view: &ViewState) {
        let symbol = if view.playback.is_playing() { "▶" } else { "⏸" };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{symbol}  {}", view.now_playing),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "(audio track only - no picture in a terminal)",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let stage = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Stage "));
        f.render_widget(stage, area);
    }

    fn draw_now_playing(&self, f: &mut Frame, area: Rect, view: &ViewState) {
        let status = if view.playback.is_playing() {
            Span::styled("▶ PLAYING", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            Span::styled("⏸ PAUSED ", Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))
        };
        let mute_indicator = if view.playback.muted { " 🔇" } else { "" };

        let mut spans = vec![
            status,
            Span::raw("  "),
            Span::styled(view.now_playing.clone(), Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("  vol {}%{}", self.volume_percent, mute_indicator),
                Style::default().fg(Color::Cyan),
            ),
        ];
        if let Some(error) = &view.error_message {
            spans.push(Span::styled(
                format!("  ✗ {error}"),
                Style::default().fg(Color::Red),
            ));
        } else if !view.status_message.is_empty() {
            spans.push(Span::styled(
                format!("  {}", view.status_message),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title(" Now Playing "));
        f.render_widget(paragraph, area);
    }

    fn draw_progress(&self, f: &mut Frame, area: Rect, view: &ViewState) {
        let position = view.playback.position;
        let duration = view.playback.duration;
        let ratio = if duration.as_secs_f64() > 0.0 {
            (position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(ratio)
            .label(format!(
                "{} / {}",
                format_duration(position),
                format_duration(duration)
            ));
        f.render_widget(gauge, area);
    }

    fn draw_controls(&self, f: &mut Frame, area: Rect, view: &ViewState) {
        let mut spans = vec![
            Span::raw("Space: Pause/Play • "),
            Span::raw("←/→: Seek • "),
            Span::raw("+/-: Volume • "),
            Span::raw("m: Mute • "),
        ];
        match view.kind {
            MediaKind::Audio => {
                spans.insert(0, Span::raw("↑/↓: Navigate • "));
                spans.insert(1, Span::raw("Enter: Play • "));
                spans.push(Span::raw("n: Next • "));
                spans.push(Span::raw("b: Previous • "));
            }
            MediaKind::Video => {
                spans.push(Span::styled("f: Fullscreen • ", Style::default().fg(Color::Cyan)));
            }
        }
        spans.push(Span::raw("q: Quit"));

        let controls = Paragraph::new(vec![Line::from(spans)])
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title(" Controls "));
        f.render_widget(controls, area);
    }

    fn navigate_up(&mut self) -> Option<usize> {
        if self.track_count == 0 {
            return None;
        }
        let mut state = self.list_state.borrow_mut();
        let new_idx = match state.selected() {
            Some(0) | None => self.track_count - 1,
            Some(i) => i - 1,
        };
        state.select(Some(new_idx));
        Some(new_idx)
    }

    fn navigate_down(&mut self) -> Option<usize> {
        if self.track_count == 0 {
            return None;
        }
        let mut state = self.list_state.borrow_mut();
        let new_idx = match state.selected() {
            Some(i) if i + 1 < self.track_count => i + 1,
            _ => 0,
        };
        state.select(Some(new_idx));
        Some(new_idx)
    }
}

impl Default for TuiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UiRenderer for TuiRenderer {
    fn init(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        self.terminal = Some(Terminal::new(backend)?);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        if let Some(mut terminal) = self.terminal.take() {
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
        }
        Ok(())
    }

    fn render(&mut self, view: &ViewState) -> Result<()> {
        self.sync_from_view(view);

        let mut terminal = match self.terminal.take() {
            Some(t) => t,
            None => return Ok(()),
        };

        terminal.draw(|f| self.draw_ui(f, view))?;
        self.terminal = Some(terminal);
        Ok(())
    }

    fn poll_input(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        events.push(UiEvent::QuitRequested);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        events.push(UiEvent::QuitRequested);
                    }
                    KeyCode::Char(' ') | KeyCode::Char('p') => {
                        events.push(UiEvent::TogglePlayPauseRequested);
                    }
                    KeyCode::Char('n') if self.kind == MediaKind::Audio => {
                        events.push(UiEvent::NextTrackRequested);
                    }
                    KeyCode::Char('b') if self.kind == MediaKind::Audio => {
                        events.push(UiEvent::PreviousTrackRequested);
                    }
                    KeyCode::Left => {
                        events.push(UiEvent::SeekBy { delta_seconds: -SEEK_STEP_SECONDS });
                    }
                    KeyCode::Right => {
                        events.push(UiEvent::SeekBy { delta_seconds: SEEK_STEP_SECONDS });
                    }
                    KeyCode::Up | KeyCode::Char('k') if self.kind == MediaKind::Audio => {
                        if let Some(index) = self.navigate_up() {
                            events.push(UiEvent::SelectionChanged { index });
                        }
                    }
                    KeyCode::Down | KeyCode::Char('j') if self.kind == MediaKind::Audio => {
                        if let Some(index) = self.navigate_down() {
                            events.push(UiEvent::SelectionChanged { index });
                        }
                    }
                    KeyCode::Enter if self.kind == MediaKind::Audio => {
                        if let Some(index) = self.list_state.borrow().selected() {
                            events.push(UiEvent::SelectTrackRequested { index });
                        }
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        let volume = self.volume_percent.saturating_add(VOLUME_STEP).min(100);
                        events.push(UiEvent::VolumeChangeRequested { volume });
                    }
                    KeyCode::Char('-') => {
                        let volume = self.volume_percent.saturating_sub(VOLUME_STEP);
                        events.push(UiEvent::VolumeChangeRequested { volume });
                    }
                    KeyCode::Char('m') => {
                        events.push(UiEvent::MuteToggled);
                    }
                    KeyCode::Char('f') if self.kind == MediaKind::Video => {
                        events.push(UiEvent::FullscreenToggled);
                    }
                    _ => {}
                }
            }
        }

        Ok(events)
    }
}
