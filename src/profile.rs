//! Profile and channel membership records.
//!
//! `UserProfile` and `ChannelMember` come straight from a data source.
//! `MemberProfile` is what list sections carry: the profile together with the
//! membership record it was matched to, when membership data was supplied.

use serde::{Deserialize, Serialize};

/// A user identity with display attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nickname: String,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            nickname: String::new(),
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    /// First and last name joined by a space, skipping empty parts.
    pub fn full_name(&self) -> String {
        match (self.first_name.trim(), self.last_name.trim()) {
            ("", "") => String::new(),
            (first, "") => first.to_string(),
            ("", last) => last.to_string(),
            (first, last) => format!("{first} {last}"),
        }
    }

    /// Name to show in a list row for the given display setting.
    ///
    /// Falls back to the username whenever the preferred fields are empty.
    pub fn display_name(&self, display: NameDisplay) -> String {
        let preferred = match display {
            NameDisplay::Username => String::new(),
            NameDisplay::FullName => self.full_name(),
            NameDisplay::NicknameFullName => {
                let nick = self.nickname.trim();
                if nick.is_empty() { self.full_name() } else { nick.to_string() }
            }
        };
        if preferred.is_empty() { self.username.clone() } else { preferred }
    }
}

/// Per-channel association of a profile with role information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMember {
    pub user_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub roles: String,
    #[serde(default)]
    pub scheme_admin: bool,
}

impl ChannelMember {
    pub fn new(user_id: impl Into<String>, scheme_admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            channel_id: String::new(),
            roles: String::new(),
            scheme_admin,
        }
    }
}

/// A profile paired with its channel membership, if any was supplied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberProfile {
    pub profile: UserProfile,
    pub membership: Option<ChannelMember>,
}

impl MemberProfile {
    pub fn merge(profile: UserProfile, membership: ChannelMember) -> Self {
        Self { profile, membership: Some(membership) }
    }

    pub fn profile_only(profile: UserProfile) -> Self {
        Self { profile, membership: None }
    }

    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn is_channel_admin(&self) -> bool {
        self.membership.as_ref().is_some_and(|m| m.scheme_admin)
    }
}

/// Teammate name display setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NameDisplay {
    #[default]
    Username,
    FullName,
    NicknameFullName,
}

impl NameDisplay {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "username" => Some(Self::Username),
            "full_name" | "fullname" => Some(Self::FullName),
            "nickname_full_name" | "nickname" => Some(Self::NicknameFullName),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::FullName => "full_name",
            Self::NicknameFullName => "nickname_full_name",
        }
    }
}
