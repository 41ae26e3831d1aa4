//! Application state for the terminal member browser.
//!
//! `AppState` owns the profile source, the paged profiles loaded so far and
//! the [`UserList`] view model. Key handling in `update` drives it through
//! [`KeyAction`]s; rendering in `ui` only reads it.

pub mod keymap;
pub mod update;

use ratatui::style::Color;

use crate::config::RosterConfig;
use crate::error::Result;
use crate::list::{INITIAL_BATCH_TO_RENDER, ListData, ListEvent, SelectionChange, UserList, UserListHandler};
use crate::profile::{MemberProfile, UserProfile};
use crate::search::filter_profiles;
use crate::sections::Section;
use crate::sys::ProfileSource;
use keymap::{KeyAction, Keymap};

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Color palette (Catppuccin Mocha).
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub section_bg: Color,
    pub section_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub admin: Color,
    pub selected: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            section_bg: Color::Rgb(0x31, 0x32, 0x44),   // surface0
            section_fg: Color::Rgb(0xb4, 0xbe, 0xfe),   // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            admin: Color::Rgb(0xfa, 0xb3, 0x87),        // peach
            selected: Color::Rgb(0xa6, 0xe3, 0xa1),     // green
        }
    }
}

/// Overlay shown above the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Popup {
    Profile(MemberProfile),
    Info(String),
}

/// Side effects requested by list interactions, applied after dispatch.
#[derive(Debug, Default)]
struct Effects {
    select: Vec<UserProfile>,
    open: Vec<UserProfile>,
    fetch_more: bool,
}

impl UserListHandler for Effects {
    fn select_profile(&mut self, profile: &UserProfile) {
        self.select.push(profile.clone());
    }

    fn open_profile(&mut self, profile: &UserProfile) {
        self.open.push(profile.clone());
    }

    fn fetch_more(&mut self) {
        self.fetch_more = true;
    }
}

pub struct AppState {
    source: Box<dyn ProfileSource>,
    /// Every profile fetched so far, in source order.
    pub loaded: Vec<UserProfile>,
    pub list: UserList,
    pub data: ListData,
    pub page: usize,
    pub per_page: usize,
    pub has_more: bool,
    pub cursor: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub search_query: String,
    pub popup: Option<Popup>,
    pub status: Option<String>,
    /// Header label for the signed-in user, resolved once at startup.
    pub current_user: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub should_quit: bool,
}

impl AppState {
    /// Build state over `source` and load its membership and first page.
    pub fn new(mut source: Box<dyn ProfileSource>, config: &RosterConfig, keymap: Keymap) -> Result<Self> {
        let members = source.channel_members()?;
        let mut list = UserList::new(Vec::new(), members);
        list.current_user_id = source.current_user_id().unwrap_or_default();
        list.name_display = config.name_display;
        list.labels = config.labels.clone();
        list.loading = true;

        let mut app = Self {
            source,
            loaded: Vec::new(),
            list,
            data: ListData::Sections(Vec::new()),
            page: 0,
            per_page: config.page_size.max(1),
            has_more: true,
            cursor: 0,
            rows_per_page: INITIAL_BATCH_TO_RENDER,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            popup: None,
            status: None,
            current_user: String::new(),
            theme: Theme::default(),
            keymap,
            should_quit: false,
        };
        app.fetch_pending()?;
        app.current_user = app.current_user_label();
        Ok(app)
    }

    fn current_user_label(&self) -> String {
        let id = &self.list.current_user_id;
        if id.is_empty() {
            return "unknown".to_string();
        }
        self.loaded
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.username.clone())
            .unwrap_or_else(|| id.clone())
    }

    /// Run the fetch requested by an end-of-list event, if any.
    pub fn fetch_pending(&mut self) -> Result<()> {
        if !self.list.loading {
            return Ok(());
        }
        let batch = self.source.fetch_page(self.page, self.per_page);
        self.list.loading = false;
        let batch = batch?;
        tracing::info!(page = self.page, count = batch.len(), "fetched profiles");
        self.has_more = batch.len() == self.per_page;
        self.page += 1;
        self.loaded.extend(batch);
        self.refresh();
        Ok(())
    }

    /// Recompute list contents from the loaded profiles and the search term.
    pub fn refresh(&mut self) {
        self.list.profiles = if self.list.is_searching() {
            filter_profiles(&self.loaded, &self.list.term)
        } else {
            self.loaded.clone()
        };
        self.data = match self.list.data() {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "cannot section profiles; showing a flat list");
                self.status = Some(e.to_string());
                ListData::Flat(self.list.profiles.clone())
            }
        };
        let rows = self.data.row_count();
        if self.cursor >= rows {
            self.cursor = rows.saturating_sub(1);
        }
    }

    /// Item under row `index` with its position inside its section.
    pub fn item_at(&self, index: usize) -> Option<(MemberProfile, usize, Option<&Section>)> {
        match &self.data {
            ListData::Flat(items) => items
                .get(index)
                .map(|p| (MemberProfile::profile_only(p.clone()), index, None)),
            ListData::Sections(sections) => {
                let mut offset = index;
                for section in sections {
                    if offset < section.data.len() {
                        return Some((section.data[offset].clone(), offset, Some(section)));
                    }
                    offset -= section.data.len();
                }
                None
            }
        }
    }

    fn selected_id(&self) -> Option<String> {
        self.item_at(self.cursor).map(|(item, _, _)| item.profile.id)
    }

    /// Apply a resolved key action in normal mode.
    pub fn handle_action(&mut self, action: KeyAction) {
        if self.popup.is_some() {
            self.popup = None;
            return;
        }
        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::StartSearch => {
                self.search_query = self.list.term.clone();
                self.input_mode = InputMode::Search;
            }
            KeyAction::ClearSearch => self.set_term(String::new()),
            KeyAction::Press => {
                if let Some(id) = self.selected_id() {
                    self.dispatch(ListEvent::Press(id));
                }
            }
            KeyAction::LongPress => {
                if let Some(id) = self.selected_id() {
                    self.dispatch(ListEvent::LongPress(id));
                }
            }
            KeyAction::MoveUp => self.move_cursor(-1),
            KeyAction::MoveDown => self.move_cursor(1),
            KeyAction::PageUp => self.move_cursor(-(self.rows_per_page.max(1) as isize)),
            KeyAction::PageDown => self.move_cursor(self.rows_per_page.max(1) as isize),
            KeyAction::Ignore => {}
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let rows = self.data.row_count();
        if rows == 0 {
            self.cursor = 0;
            return;
        }
        let last = rows - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        if self.cursor == last && delta > 0 && self.has_more && !self.list.loading {
            self.dispatch(ListEvent::EndReached);
        }
    }

    pub fn set_term(&mut self, term: String) {
        self.list.term = term;
        self.cursor = 0;
        self.refresh();
    }

    fn dispatch(&mut self, event: ListEvent) {
        let mut effects = Effects::default();
        self.list.dispatch(&event, &mut effects);
        for profile in effects.select {
            self.toggle_selection(&profile);
        }
        if let Some(profile) = effects.open.pop() {
            let item = self
                .item_at(self.cursor)
                .map(|(item, _, _)| item)
                .filter(|item| item.profile.id == profile.id)
                .unwrap_or_else(|| MemberProfile::profile_only(profile));
            self.popup = Some(Popup::Profile(item));
        }
        if effects.fetch_more {
            tracing::debug!(page = self.page, "end of list reached; fetching more");
            self.list.loading = true;
        }
    }

    fn toggle_selection(&mut self, profile: &UserProfile) {
        let max = crate::list::MAX_USERS_IN_GM;
        self.status = Some(match self.list.selection.toggle(profile) {
            SelectionChange::Added => format!("selected {} ({}/{max})", profile.username, self.list.selection.len()),
            SelectionChange::Removed => format!("removed {} ({}/{max})", profile.username, self.list.selection.len()),
            SelectionChange::Rejected => format!("selection is full ({max})"),
        });
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
