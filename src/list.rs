//! User list view model.
//!
//! Holds what a rendering host needs to draw a user picker: whether the data
//! is a flat search result or a sectioned list, per-row state, the current
//! selection, and the loading / no-results flags. Interaction events are
//! forwarded to a [`UserListHandler`].

use crate::error::SectionError;
use crate::profile::{ChannelMember, MemberProfile, NameDisplay, UserProfile};
use crate::sections::{RoleLabels, Section, section_profiles};

/// Upper bound on users picked for a group message.
pub const MAX_USERS_IN_GM: usize = 7;
pub const INITIAL_BATCH_TO_RENDER: usize = 15;
pub const SCROLL_EVENT_THROTTLE_MS: u64 = 60;

/// Shaped list contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListData {
    /// Search results, in source order.
    Flat(Vec<UserProfile>),
    Sections(Vec<Section>),
}

impl ListData {
    pub fn is_empty(&self) -> bool {
        match self {
            ListData::Flat(items) => items.is_empty(),
            ListData::Sections(sections) => sections.iter().all(|s| s.data.is_empty()),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            ListData::Flat(items) => items.len(),
            ListData::Sections(sections) => sections.iter().map(|s| s.data.len()).sum(),
        }
    }
}

/// Outcome of a selection toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
    Rejected,
}

/// Selected profiles in the order they were picked.
#[derive(Clone, Debug)]
pub struct Selection {
    max: usize,
    picked: Vec<UserProfile>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::with_max(MAX_USERS_IN_GM)
    }
}

impl Selection {
    pub fn with_max(max: usize) -> Self {
        Self { max, picked: Vec::new() }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.picked.iter().any(|p| p.id == id)
    }

    pub fn can_add(&self) -> bool {
        self.picked.len() < self.max
    }

    pub fn len(&self) -> usize {
        self.picked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }

    pub fn profiles(&self) -> &[UserProfile] {
        &self.picked
    }

    pub fn toggle(&mut self, profile: &UserProfile) -> SelectionChange {
        if let Some(pos) = self.picked.iter().position(|p| p.id == profile.id) {
            self.picked.remove(pos);
            SelectionChange::Removed
        } else if self.can_add() {
            self.picked.push(profile.clone());
            SelectionChange::Added
        } else {
            SelectionChange::Rejected
        }
    }

    pub fn clear(&mut self) {
        self.picked.clear();
    }
}

/// Everything a host needs to draw one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowState {
    pub id: String,
    pub display_name: String,
    pub highlight: bool,
    pub is_channel_admin: bool,
    pub is_my_user: bool,
    pub selectable: bool,
    pub disabled: bool,
    pub selected: bool,
    pub manage_mode: bool,
    pub show_manage_mode: bool,
    pub tutorial_watched: bool,
}

/// User interaction on the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListEvent {
    Press(String),
    LongPress(String),
    EndReached,
}

/// Receives interaction events from the list.
pub trait UserListHandler {
    fn select_profile(&mut self, profile: &UserProfile);
    fn open_profile(&mut self, profile: &UserProfile);
    fn fetch_more(&mut self);
}

/// List state and derived presentation data.
#[derive(Clone, Debug, Default)]
pub struct UserList {
    pub profiles: Vec<UserProfile>,
    pub channel_members: Option<Vec<ChannelMember>>,
    pub current_user_id: String,
    pub name_display: NameDisplay,
    pub loading: bool,
    pub manage_mode: bool,
    pub show_manage_mode: bool,
    pub show_no_results: bool,
    pub term: String,
    pub tutorial_watched: bool,
    pub labels: RoleLabels,
    pub selection: Selection,
}

impl UserList {
    pub fn new(profiles: Vec<UserProfile>, channel_members: Option<Vec<ChannelMember>>) -> Self {
        Self { profiles, channel_members, show_no_results: true, ..Self::default() }
    }

    pub fn is_searching(&self) -> bool {
        !self.term.is_empty()
    }

    /// Shape the profiles for display.
    pub fn data(&self) -> Result<ListData, SectionError> {
        if self.profiles.is_empty() && !self.loading {
            return Ok(ListData::Sections(Vec::new()));
        }
        if self.is_searching() {
            return Ok(ListData::Flat(self.profiles.clone()));
        }
        let sections =
            section_profiles(&self.profiles, self.channel_members.as_deref(), &self.labels)?;
        Ok(ListData::Sections(sections))
    }

    /// Row state for `item` at `index` inside `section` (`None` in flat mode).
    pub fn row_state(&self, item: &MemberProfile, index: usize, section: Option<&Section>) -> RowState {
        let can_add = self.selection.can_add();
        RowState {
            id: item.profile.id.clone(),
            display_name: item.profile.display_name(self.name_display),
            highlight: section.is_some_and(|s| s.first) && index == 0,
            is_channel_admin: item.is_channel_admin(),
            is_my_user: item.profile.id == self.current_user_id,
            selectable: self.manage_mode || can_add,
            disabled: !can_add,
            selected: self.selection.contains(&item.profile.id),
            manage_mode: self.manage_mode,
            show_manage_mode: self.show_manage_mode,
            tutorial_watched: self.tutorial_watched,
        }
    }

    pub fn show_loading_footer(&self) -> bool {
        self.loading
    }

    pub fn show_no_results(&self, data: &ListData) -> bool {
        self.show_no_results && self.is_searching() && data.is_empty()
    }

    pub fn find_profile(&self, id: &str) -> Option<&UserProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Forward an interaction to `handler`.
    pub fn dispatch<H: UserListHandler>(&self, event: &ListEvent, handler: &mut H) {
        match event {
            ListEvent::Press(id) => match self.find_profile(id) {
                Some(profile) => handler.select_profile(profile),
                None => tracing::warn!(id = %id, "press on unknown profile ignored"),
            },
            ListEvent::LongPress(id) => match self.find_profile(id) {
                Some(profile) => handler.open_profile(profile),
                None => tracing::warn!(id = %id, "long press on unknown profile ignored"),
            },
            ListEvent::EndReached => {
                if self.is_searching() {
                    tracing::trace!("end reached on search results; not fetching");
                } else {
                    handler.fetch_more();
                }
            }
        }
    }
}
