pub mod components;
pub mod list;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, Popup};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let prompt = match app.input_mode {
        InputMode::Normal if app.list.is_searching() => format!("  term: {}", app.list.term),
        InputMode::Normal => String::new(),
        InputMode::Search => format!("  Search: {}\u{258f}", app.search_query),
    };
    let p = Paragraph::new(format!("roster ({})  profiles:{}{prompt}", app.current_user, app.list.profiles.len()))
        .block(
            Block::default()
                .title("roster")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.title));
    f.render_widget(p, root[0]);

    list::render_member_list(f, root[1], app);
    components::render_status_bar(f, root[2], app);

    let area = f.area();
    match app.popup.clone() {
        Some(Popup::Profile(item)) => components::render_profile_popup(f, area, app, &item),
        Some(Popup::Info(message)) => components::render_info_popup(f, area, app, &message),
        None => {}
    }
}
