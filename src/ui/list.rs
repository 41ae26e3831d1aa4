use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;
use crate::list::{ListData, RowState};
use crate::profile::MemberProfile;

/// Render the member list: section headers and rows, or flat search results.
pub fn render_member_list(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(2) as usize;
    if body_height > 0 { app.rows_per_page = body_height; }

    let (lines, cursor_line) = build_lines(app);
    let start = if cursor_line >= body_height { cursor_line + 1 - body_height } else { 0 };
    let visible: Vec<Line> = lines.into_iter().skip(start).take(body_height.max(1)).collect();

    let title = if app.list.is_searching() {
        format!("Search results: {}", app.list.term)
    } else {
        "Members".to_string()
    };
    let p = Paragraph::new(visible).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

/// All list lines plus the line index of the cursor row.
fn build_lines(app: &AppState) -> (Vec<Line<'static>>, usize) {
    let mut lines = Vec::new();
    let mut cursor_line = 0;
    let mut row = 0usize;

    match &app.data {
        ListData::Flat(items) => {
            for (index, profile) in items.iter().enumerate() {
                let item = MemberProfile::profile_only(profile.clone());
                let state = app.list.row_state(&item, index, None);
                if row == app.cursor { cursor_line = lines.len(); }
                lines.push(row_line(app, &item, &state, row == app.cursor));
                row += 1;
            }
        }
        ListData::Sections(sections) => {
            for section in sections {
                lines.push(Line::from(Span::styled(
                    format!(" {} ", section.id),
                    Style::default()
                        .fg(app.theme.section_fg)
                        .bg(app.theme.section_bg)
                        .add_modifier(Modifier::BOLD),
                )));
                for (index, item) in section.data.iter().enumerate() {
                    let state = app.list.row_state(item, index, Some(section));
                    if row == app.cursor { cursor_line = lines.len(); }
                    lines.push(row_line(app, item, &state, row == app.cursor));
                    row += 1;
                }
            }
        }
    }

    if app.list.show_no_results(&app.data) {
        lines.push(Line::from(Span::styled(
            format!("No results for \u{201c}{}\u{201d}", app.list.term),
            Style::default().fg(app.theme.muted),
        )));
    }
    if app.list.show_loading_footer() {
        lines.push(Line::from(Span::styled("Loading\u{2026}", Style::default().fg(app.theme.muted))));
    }
    (lines, cursor_line)
}

fn row_line(app: &AppState, item: &MemberProfile, state: &RowState, at_cursor: bool) -> Line<'static> {
    let theme = &app.theme;
    let marker = if at_cursor { "\u{25b6} " } else { "  " };
    let check = if state.selected {
        "[x] "
    } else if state.selectable {
        "[ ] "
    } else {
        "    "
    };
    let mut name_style = Style::default().fg(if state.disabled && !state.selected { theme.muted } else { theme.text });
    if state.highlight || at_cursor {
        name_style = name_style.add_modifier(Modifier::BOLD);
    }
    if at_cursor {
        name_style = name_style.fg(theme.highlight_fg).bg(theme.highlight_bg);
    }

    let mut spans = vec![
        Span::raw(marker),
        Span::styled(check, Style::default().fg(theme.selected)),
        Span::styled(state.display_name.clone(), name_style),
    ];
    if state.display_name != item.profile.username {
        spans.push(Span::styled(format!("  @{}", item.profile.username), Style::default().fg(theme.muted)));
    }
    if state.is_my_user {
        spans.push(Span::styled(" (you)", Style::default().fg(theme.muted)));
    }
    if state.is_channel_admin {
        spans.push(Span::styled("  admin", Style::default().fg(theme.admin)));
    }
    Line::from(spans)
}
