//! Profile sectioning: split a flat profile list into display groups.
//!
//! With channel membership data the profiles are grouped by role (admins
//! first, then members). Without it they are grouped by the upper-cased first
//! character of the username, in the order those characters are first seen.
//! Within every group the input order is kept; nothing is sorted.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::SectionError;
use crate::profile::{ChannelMember, MemberProfile, UserProfile};

/// A named group of profiles ready for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: String,
    /// Only the first section of a list carries this; hosts use it to
    /// suppress the top divider and highlight the first row.
    pub first: bool,
    pub data: Vec<MemberProfile>,
}

/// Group keys used for role sections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleLabels {
    pub admins: String,
    pub members: String,
}

impl Default for RoleLabels {
    fn default() -> Self {
        Self {
            admins: "Admins".to_string(),
            members: "Members".to_string(),
        }
    }
}

/// Accumulates entries per key, remembering the order keys were first seen.
struct OrderedGroups<T> {
    groups: Vec<(String, Vec<T>)>,
    index: HashMap<String, usize>,
}

impl<T> OrderedGroups<T> {
    fn new() -> Self {
        Self { groups: Vec::new(), index: HashMap::new() }
    }

    fn push(&mut self, key: &str, item: T) {
        match self.index.get(key) {
            Some(&pos) => self.groups[pos].1.push(item),
            None => {
                self.index.insert(key.to_string(), self.groups.len());
                self.groups.push((key.to_string(), vec![item]));
            }
        }
    }

    fn take(&mut self, key: &str) -> Option<(String, Vec<T>)> {
        let pos = self.index.remove(key)?;
        Some((key.to_string(), std::mem::take(&mut self.groups[pos].1)))
    }

    fn into_ordered(self) -> Vec<(String, Vec<T>)> {
        self.groups
    }
}

/// Group `profiles` into sections.
///
/// When `members` is present and non-empty every profile must have a
/// matching membership record; otherwise every username must be non-empty.
/// Membership records for profiles not in the list are ignored, and the last
/// record wins when a user id repeats.
pub fn section_profiles(
    profiles: &[UserProfile],
    members: Option<&[ChannelMember]>,
    labels: &RoleLabels,
) -> Result<Vec<Section>, SectionError> {
    if profiles.is_empty() {
        return Ok(Vec::new());
    }

    let groups = match members {
        Some(members) if !members.is_empty() => group_by_role(profiles, members, labels)?,
        _ => group_alphabetically(profiles)?,
    };

    let sections: Vec<Section> = groups
        .into_iter()
        .filter(|(_, data)| !data.is_empty())
        .enumerate()
        .map(|(pos, (id, data))| Section { id, first: pos == 0, data })
        .collect();

    tracing::debug!(
        profiles = profiles.len(),
        sections = sections.len(),
        by_role = members.is_some_and(|m| !m.is_empty()),
        "grouped profiles into sections"
    );
    Ok(sections)
}

fn group_by_role(
    profiles: &[UserProfile],
    members: &[ChannelMember],
    labels: &RoleLabels,
) -> Result<Vec<(String, Vec<MemberProfile>)>, SectionError> {
    let by_user: HashMap<&str, &ChannelMember> =
        members.iter().map(|m| (m.user_id.as_str(), m)).collect();

    let mut groups = OrderedGroups::new();
    for profile in profiles {
        let member = by_user.get(profile.id.as_str()).ok_or_else(|| {
            SectionError::MissingMembership { user_id: profile.id.clone() }
        })?;
        let key = if member.scheme_admin { &labels.admins } else { &labels.members };
        groups.push(key, MemberProfile::merge(profile.clone(), (*member).clone()));
    }

    // Admins always lead, whatever order the roles were encountered in.
    let mut ordered = Vec::with_capacity(2);
    ordered.extend(groups.take(&labels.admins));
    if labels.members != labels.admins {
        ordered.extend(groups.take(&labels.members));
    }
    Ok(ordered)
}

fn group_alphabetically(
    profiles: &[UserProfile],
) -> Result<Vec<(String, Vec<MemberProfile>)>, SectionError> {
    let mut groups = OrderedGroups::new();
    for profile in profiles {
        let key = section_key(profile)?;
        groups.push(&key, MemberProfile::profile_only(profile.clone()));
    }
    Ok(groups.into_ordered())
}

/// Upper-cased first character of the username.
pub fn section_key(profile: &UserProfile) -> Result<String, SectionError> {
    let first = profile
        .username
        .chars()
        .next()
        .ok_or_else(|| SectionError::MalformedUsername { user_id: profile.id.clone() })?;
    Ok(first.to_uppercase().collect())
}
