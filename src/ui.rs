use crate::app::{App, Overlay};
use crate::entry_controller::EntryView;
use crate::journal_entry::MOOD_VOCABULARY;
use crate::theme::{Palette, Theme};
use crate::utils::capitalize;
use color_eyre::Result;
use crossterm::{
    event::{DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{stdout, Stdout};

const TOAST_WIDTH: u16 = 44;

/// Owns the terminal for the lifetime of the app and restores it on drop.
pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        execute!(
            stdout(),
            EnterAlternateScreen,
            EnableBracketedPaste,
            EnableFocusChange
        )?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI { terminal })
    }

    pub fn display(&mut self, app: &App) -> Result<()> {
        self.terminal.draw(|f| render(f, app))?;
        Ok(())
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableFocusChange,
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

pub fn render(f: &mut Frame, app: &App) {
    let palette = app.themes.current_theme().palette();
    let base = Style::default().bg(palette.background).fg(palette.foreground);
    f.render_widget(Block::default().style(base), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let date = app.editor().map(|v| v.date_label()).unwrap_or_default();
    let title = Paragraph::new(format!("Daily Journal · {}", date))
        .style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    render_selectors(f, app, &palette, chunks[1]);
    render_editor(f, app, &palette, chunks[2]);
    render_status(f, app, &palette, chunks[3]);

    let help = help_line(app);
    let help = Paragraph::new(help)
        .style(Style::default().fg(palette.muted))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[4]);

    if let Some(overlay) = app.overlay() {
        render_overlay(f, overlay, &palette);
    }
    render_toasts(f, app, &palette);
}

fn key_span(key: &str) -> Span<'_> {
    Span::styled(key, Style::default().add_modifier(Modifier::BOLD))
}

fn selected(palette: &Palette, on: bool) -> Style {
    if on {
        Style::default()
            .fg(palette.background)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.foreground)
    }
}

fn render_selectors(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let bar = app.themes.target();
    let mut themes = Vec::new();
    for (key, theme) in ["d", "l", "b"].into_iter().zip(Theme::ALL) {
        let pressed = bar.is_some_and(|b| b.is_pressed(theme));
        themes.push(key_span(key));
        themes.push(Span::styled(
            format!(" {} ", capitalize(theme.name())),
            selected(palette, pressed),
        ));
        themes.push(Span::raw("  "));
    }
    let info = app.themes.theme_info(&app.state);
    let origin = match info.saved {
        Some(_) => "saved",
        None if info.current == info.default => "default",
        None => "system",
    };
    let theme_block = Paragraph::new(Line::from(themes)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(format!("Theme ({})", origin)),
    );
    f.render_widget(theme_block, halves[0]);

    let active = app.editor().and_then(|v| v.active_mood());
    let mut moods = Vec::new();
    for (i, mood) in MOOD_VOCABULARY.iter().enumerate() {
        moods.push(key_span(["1", "2", "3"][i]));
        moods.push(Span::styled(
            format!(" {} ", mood.label()),
            selected(palette, active == Some(i)),
        ));
        moods.push(Span::raw("  "));
    }
    let mood_block = Paragraph::new(Line::from(moods)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title("Mood"),
    );
    f.render_widget(mood_block, halves[1]);
}

fn render_editor(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let Some(view) = app.editor() else {
        return;
    };
    let editing = app.editing();
    let border = if editing { palette.accent } else { palette.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(if editing { "Entry (Esc to leave)" } else { "Entry" });
    let inner = block.inner(area);

    let text = view.text();
    let (line, column) = view.cursor_line_col();
    let scroll = line.saturating_sub(inner.height.saturating_sub(1) as usize) as u16;

    let body = if text.is_empty() && !editing {
        Paragraph::new(Span::styled(
            "How was your day? Press Enter to start writing.",
            Style::default().fg(palette.muted),
        ))
    } else {
        Paragraph::new(text).scroll((scroll, 0))
    };
    f.render_widget(body.block(block), area);

    if editing && app.overlay().is_none() && inner.width > 0 && inner.height > 0 {
        let x = inner.x + (column as u16).min(inner.width - 1);
        let y = inner.y + (line as u16 - scroll).min(inner.height - 1);
        f.set_cursor_position((x, y));
    }
}

fn render_status(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let Some(view) = app.editor() else {
        return;
    };
    let (words, chars) = view.counts();
    let submit = if view.submit_enabled() {
        Span::styled("ready to save", Style::default().fg(palette.accent))
    } else {
        Span::styled("nothing to save", Style::default().fg(palette.muted))
    };
    let status = Line::from(vec![
        Span::raw(format!("Words: {}  Characters: {}  ", words, chars)),
        submit,
        Span::raw(format!("  Saved this session: {}", app.saved_this_session())),
    ]);
    f.render_widget(Paragraph::new(status), area);
}

fn help_line(app: &App) -> Line<'static> {
    if app.editing() {
        Line::from(vec![
            Span::styled("Ctrl+S", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" save, "),
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" indent, "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" leave editor"),
        ])
    } else {
        Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" write, "),
            Span::styled("t/T", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cycle/dark-light, "),
            Span::styled("0", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" reset theme, "),
            Span::styled("x", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" export, "),
            Span::styled("s", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" stats, "),
            Span::styled("r", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" reopen, "),
            Span::styled("p", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" print, "),
            Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ])
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical[1])[1]
}

fn render_overlay(f: &mut Frame, overlay: &Overlay, palette: &Palette) {
    let area = centered_rect(70, 70, f.area());
    let (title, body) = match overlay {
        Overlay::Export(text) => ("Export preview (Esc to close)", text.clone()),
        Overlay::Stats(stats) => {
            let mood = stats
                .mood
                .as_ref()
                .map(|m| capitalize(m.label()))
                .unwrap_or_else(|| "not set".to_string());
            (
                "Entry statistics (Esc to close)",
                format!(
                    "Words: {}\nCharacters: {}\nCharacters (no spaces): {}\nParagraphs: {}\nAverage words per paragraph: {}\nMood: {}",
                    stats.word_count,
                    stats.char_count,
                    stats.char_count_no_spaces,
                    stats.paragraph_count,
                    stats.avg_words_per_paragraph,
                    mood
                ),
            )
        }
    };
    let widget = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(palette.background).fg(palette.foreground))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(title),
        );
    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

fn render_toasts(f: &mut Frame, app: &App, palette: &Palette) {
    let screen = f.area();
    let width = TOAST_WIDTH.min(screen.width);
    let mut y = screen.y;
    for toast in app.state.notifications.visible() {
        if y + 3 > screen.y + screen.height {
            break;
        }
        let area = Rect::new(screen.x + screen.width - width, y, width, 3);
        let widget = Paragraph::new(toast.message.as_str())
            .style(Style::default().bg(palette.background).fg(palette.foreground))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(toast.severity.color())),
            );
        f.render_widget(Clear, area);
        f.render_widget(widget, area);
        y += 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(
            &Config::default(),
            Box::new(ManualClock::at(2026, 10, 16, 9)),
            None,
        )
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn renders_title_selectors_and_help() {
        let app = app();
        let screen = draw(&app);
        assert!(screen.contains("Daily Journal · Friday, October 16, 2026"));
        assert!(screen.contains("Brown"));
        assert!(screen.contains("neutral"));
        assert!(screen.contains("nothing to save"));
        assert!(screen.contains("Enter write"));
        assert!(screen.contains("0 reset theme"));
        assert!(screen.contains("Theme (default)"));
    }

    #[test]
    fn theme_title_shows_saved_choice() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        assert!(draw(&app).contains("Theme (saved)"));
    }

    #[test]
    fn renders_typed_text_and_counts() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        for c in "Hi there".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        let screen = draw(&app);
        assert!(screen.contains("Hi there"));
        assert!(screen.contains("ready to save"));
        assert!(screen.contains("Esc leave editor"));
    }

    #[test]
    fn renders_toast_and_overlay() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Char('s'));
        let screen = draw(&app);
        assert!(screen.contains("No saved entry yet"));
        assert!(screen.contains("Entry statistics"));
        assert!(screen.contains("Mood: not set"));
    }
}
