use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::renderer::centered;
use crate::auth::{AuthMode, AuthScreen, MessageKind};

/// Draw the login/signup form
pub fn render_auth(frame: &mut Frame, screen: &AuthScreen) {
    let form = screen.form();
    let fields = form.fields();

    let area = centered(frame.area(), 54, fields.len() as u16 * 3 + 10);
    let title = match screen.mode() {
        AuthMode::Login => " Snake - Login ",
        AuthMode::Signup => " Snake - Create Account ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightGreen))
        .title(title)
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
    constraints.extend([
        Constraint::Length(2), // Message
        Constraint::Min(0),    // Hints
    ]);
    let rows = Layout::vertical(constraints).split(inner);

    for (i, &field) in fields.iter().enumerate() {
        let focused = screen.focused() == field;
        let raw = form.value(field);
        let shown = if field.is_secret() {
            "*".repeat(raw.chars().count())
        } else {
            raw.to_string()
        };
        let cursor = if focused { "_" } else { "" };

        let border = if focused {
            Style::default().fg(Color::LightGreen)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(format!("{shown}{cursor}")).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(field.label()),
        );
        frame.render_widget(input, rows[i + 1]);
    }

    if let Some(message) = screen.message() {
        let color = match message.kind {
            MessageKind::Info => Color::Gray,
            MessageKind::Success => Color::LightGreen,
            MessageKind::Error => Color::LightRed,
        };
        let line = Paragraph::new(Line::from(Span::styled(
            message.text.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(line, rows[fields.len() + 1]);
    }

    let switch_hint = match screen.mode() {
        AuthMode::Login => " no account? sign up",
        AuthMode::Signup => " back to login",
    };
    let hints = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("TAB", Style::default().fg(Color::Cyan)),
            Span::raw(" next field | "),
            Span::styled("ENTER", Style::default().fg(Color::Cyan)),
            Span::raw(" submit | "),
            Span::styled("ESC", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ]),
        Line::from(vec![
            Span::styled("F2", Style::default().fg(Color::Cyan)),
            Span::raw(switch_hint),
        ]),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(hints, rows[fields.len() + 2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthKey;
    use crate::store::MemoryStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(screen: &AuthScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("test terminal");
        terminal
            .draw(|frame| render_auth(frame, screen))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_password_is_masked() {
        let mut store = MemoryStore::new();
        let mut screen = AuthScreen::new();
        screen.handle(AuthKey::NextField, &mut store);
        for c in "hunter2".chars() {
            screen.handle(AuthKey::Insert(c), &mut store);
        }

        let output = draw(&screen);
        assert!(output.contains("Login"));
        assert!(output.contains("*******_"));
        assert!(!output.contains("hunter2"));
    }

    #[test]
    fn test_signup_shows_all_fields() {
        let mut store = MemoryStore::new();
        let mut screen = AuthScreen::new();
        screen.handle(AuthKey::SwitchMode, &mut store);

        let output = draw(&screen);
        assert!(output.contains("Create Account"));
        assert!(output.contains("Email"));
        assert!(output.contains("Confirm Password"));
    }
}
