//! Shared UI components (status bar, popups).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};
use crate::profile::MemberProfile;

/// Render the bottom status bar with mode, counts and the last message.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
    };
    let hint = |action: KeyAction, label: &str| {
        app.keymap
            .key_for(action)
            .map(|k| format!("{k}: {label}"))
            .unwrap_or_default()
    };
    let hints = [
        hint(KeyAction::Press, "select"),
        hint(KeyAction::LongPress, "profile"),
        hint(KeyAction::StartSearch, "search"),
        hint(KeyAction::Quit, "quit"),
    ]
    .into_iter()
    .filter(|h| !h.is_empty())
    .collect::<Vec<_>>()
    .join("  ");
    let msg = format!(
        "mode: {mode}  loaded:{}  selected:{}/{}  {}{}",
        app.loaded.len(),
        app.list.selection.len(),
        crate::list::MAX_USERS_IN_GM,
        hints,
        app.status.as_deref().map(|s| format!("  | {s}")).unwrap_or_default(),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Width and height of the info popup for `message` inside `area`.
fn info_popup_size(message: &str, area: Rect) -> (u16, u16) {
    let max_w = area.width.saturating_sub(6).max(30);
    let width = 40u16.min(max_w);
    let len = u16::try_from(message.len()).unwrap_or(u16::MAX);
    let approx_lines = (len / width.saturating_sub(4).max(10)).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = approx_lines.saturating_add(4).min(max_h).max(5);
    (width, height)
}

/// Render a wrapped informational popup.
pub fn render_info_popup(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let (width, height) = info_popup_size(message, area);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the profile card opened by a long press.
pub fn render_profile_popup(f: &mut Frame, area: Rect, app: &AppState, item: &MemberProfile) {
    let rect = centered_rect(50, 11, area);
    let p = &item.profile;
    let label = Style::default().fg(app.theme.muted);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name:<10}"), label), Span::raw(value)])
    };
    let mut lines = vec![
        Line::from(Span::styled(
            p.display_name(app.list.name_display),
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Username", format!("@{}", p.username)),
        field("Name", p.full_name()),
        field("Nickname", p.nickname.clone()),
        field("Id", p.id.clone()),
    ];
    if let Some(m) = &item.membership {
        let role = if m.scheme_admin { app.list.labels.admins.clone() } else { app.list.labels.members.clone() };
        lines.push(field("Role", role));
    }
    let para = Paragraph::new(lines).block(
        Block::default()
            .title("Profile")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(para, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_popup_grows_with_message_and_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let (w, short) = info_popup_size("done", area);
        assert_eq!((w, short), (40, 5));
        let (_, medium) = info_popup_size(&"x".repeat(360), area);
        assert_eq!(medium, 14);
        // longer than u16::MAX bytes must not wrap to a tiny popup
        let (_, huge) = info_popup_size(&"x".repeat(65_540), area);
        assert_eq!(huge, 34);
    }
}
