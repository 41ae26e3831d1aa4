use anyhow::{Context as _, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;

use crate::app::{AppState, InputMode, Popup};
use crate::ui;

/// How long to wait for a key before redrawing.
const INPUT_POLL: Duration = Duration::from_millis(100);

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui::render(f, app))
            .context("draw frame")?;

        // The frame above showed the loading footer; now do the fetch.
        if app.list.loading {
            if let Err(e) = app.fetch_pending() {
                tracing::error!(error = %e, "fetching profiles failed");
                app.popup = Some(Popup::Info(format!("Could not load more profiles: {e}")));
                app.has_more = false;
            }
            continue;
        }

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    match app.input_mode {
        InputMode::Normal => {
            if let Some(action) = app.keymap.resolve(&key) {
                app.handle_action(action);
            } else if app.popup.is_some() {
                app.popup = None;
            }
        }
        InputMode::Search => match key.code {
            KeyCode::Enter => {
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                app.input_mode = InputMode::Normal;
                app.search_query.clear();
                app.set_term(String::new());
            }
            KeyCode::Backspace => {
                app.search_query.pop();
                app.set_term(app.search_query.clone());
            }
            KeyCode::Char(c) => {
                app.search_query.push(c);
                app.set_term(app.search_query.clone());
            }
            _ => {}
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::keymap::Keymap;
    use crate::config::RosterConfig;
    use crate::list::ListData;
    use crate::profile::UserProfile;
    use crate::sys::JsonSource;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn key_poll_has_its_own_interval() {
        assert_eq!(INPUT_POLL, Duration::from_millis(100));
        assert_ne!(INPUT_POLL, Duration::from_millis(crate::list::SCROLL_EVENT_THROTTLE_MS));
    }

    #[test]
    fn typing_in_search_mode_filters_live() {
        let profiles = vec![UserProfile::new("1", "amy"), UserProfile::new("2", "bob")];
        let mut app = AppState::new(
            Box::new(JsonSource::from_parts(profiles, None)),
            &RosterConfig::default(),
            Keymap::default(),
        )
        .unwrap();

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        press(&mut app, KeyCode::Char('b'));
        match &app.data {
            ListData::Flat(items) => assert_eq!(items[0].username, "bob"),
            other => panic!("expected flat list, got {other:?}"),
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.list.term, "b");

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert!(app.list.term.is_empty());
        assert!(matches!(app.data, ListData::Sections(_)));

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
