//! Profile sources.
//!
//! `SystemAdapter` turns local Unix accounts into profiles, optionally scoped
//! to the members of one group with admins taken from another. `JsonSource`
//! reads exported profile and membership lists from disk.

use crate::error::{Context, Result, simple_error};
use crate::profile::{ChannelMember, UserProfile};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ADMIN_GROUP: &str = "wheel";

/// Supplies profiles page by page plus optional channel membership.
pub trait ProfileSource {
    /// Profiles for zero-based `page`; an empty or short page means the end.
    fn fetch_page(&mut self, page: usize, per_page: usize) -> Result<Vec<UserProfile>>;

    /// Membership for the whole channel, or `None` for a plain directory.
    fn channel_members(&mut self) -> Result<Option<Vec<ChannelMember>>>;

    /// Id of the signed-in user, if the source knows it.
    fn current_user_id(&self) -> Option<String> {
        None
    }
}

#[derive(Clone, Debug)]
pub struct SystemUser {
    pub uid: u32,
    pub name: String,
    pub primary_gid: u32,
    pub full_name: Option<String>,
}

impl SystemUser {
    /// Profile view of this account. The first GECOS field is split into
    /// first and last name at the first space.
    pub fn to_profile(&self) -> UserProfile {
        let gecos = self
            .full_name
            .as_deref()
            .and_then(|g| g.split(',').next())
            .unwrap_or("")
            .trim();
        let (first, last) = match gecos.split_once(' ') {
            Some((f, l)) => (f.trim(), l.trim()),
            None => (gecos, ""),
        };
        UserProfile::new(self.uid.to_string(), self.name.clone()).with_name(first, last)
    }
}

#[derive(Clone, Debug)]
pub struct SystemGroup {
    pub gid: u32,
    pub name: String,
    pub members: Vec<String>,
}

impl SystemGroup {
    pub fn has_member(&self, user: &SystemUser) -> bool {
        self.gid == user.primary_gid || self.members.iter().any(|m| m == &user.name)
    }
}

/// Local accounts read from passwd/group files.
pub struct SystemAdapter {
    passwd_path: PathBuf,
    group_path: PathBuf,
    channel_group: Option<String>,
    admin_group: String,
    users: Option<Vec<SystemUser>>,
}

impl Default for SystemAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemAdapter {
    pub fn new() -> Self {
        Self::with_paths("/etc/passwd", "/etc/group")
    }

    pub fn with_paths(passwd: impl Into<PathBuf>, group: impl Into<PathBuf>) -> Self {
        Self {
            passwd_path: passwd.into(),
            group_path: group.into(),
            channel_group: None,
            admin_group: DEFAULT_ADMIN_GROUP.to_string(),
            users: None,
        }
    }

    /// Scope profiles to members of `group`; admins are members of `admin_group`.
    pub fn for_group(mut self, group: impl Into<String>, admin_group: impl Into<String>) -> Self {
        self.channel_group = Some(group.into());
        self.admin_group = admin_group.into();
        self
    }

    pub fn list_users(&self) -> Result<Vec<SystemUser>> {
        parse_passwd(&self.passwd_path)
    }

    pub fn list_groups(&self) -> Result<Vec<SystemGroup>> {
        parse_group(&self.group_path)
    }

    fn find_group(&self, groups: &[SystemGroup], name: &str) -> Result<SystemGroup> {
        groups
            .iter()
            .find(|g| g.name == name)
            .cloned()
            .ok_or_else(|| simple_error(format!("group {name} not found in {}", self.group_path.display())))
    }

    /// Accounts in scope, sorted by uid. Loaded once and cached.
    fn scoped_users(&mut self) -> Result<&[SystemUser]> {
        if self.users.is_none() {
            let mut users = self.list_users()?;
            if let Some(name) = self.channel_group.clone() {
                let groups = self.list_groups()?;
                let channel = self.find_group(&groups, &name)?;
                users.retain(|u| channel.has_member(u));
            }
            users.sort_by_key(|u| u.uid);
            tracing::info!(count = users.len(), group = ?self.channel_group, "loaded local accounts");
            self.users = Some(users);
        }
        Ok(self.users.as_deref().unwrap_or_default())
    }
}

impl ProfileSource for SystemAdapter {
    fn fetch_page(&mut self, page: usize, per_page: usize) -> Result<Vec<UserProfile>> {
        let users = self.scoped_users()?;
        Ok(users
            .iter()
            .skip(page.saturating_mul(per_page))
            .take(per_page)
            .map(SystemUser::to_profile)
            .collect())
    }

    fn channel_members(&mut self) -> Result<Option<Vec<ChannelMember>>> {
        let Some(channel) = self.channel_group.clone() else {
            return Ok(None);
        };
        let groups = self.list_groups()?;
        // A missing admin group just means nobody is an admin.
        let admins = groups.iter().find(|g| g.name == self.admin_group).cloned();
        let users = self.scoped_users()?;
        let members = users
            .iter()
            .map(|u| {
                let mut m = ChannelMember::new(
                    u.uid.to_string(),
                    admins.as_ref().is_some_and(|g| g.has_member(u)),
                );
                m.channel_id = channel.clone();
                m
            })
            .collect();
        Ok(Some(members))
    }

    fn current_user_id(&self) -> Option<String> {
        Some(current_uid().to_string())
    }
}

/// Profiles (and optionally members) exported as JSON arrays.
pub struct JsonSource {
    profiles: Vec<UserProfile>,
    members: Option<Vec<ChannelMember>>,
    current_user_id: Option<String>,
}

impl JsonSource {
    pub fn from_files(profiles: &Path, members: Option<&Path>) -> Result<Self> {
        let profiles: Vec<UserProfile> = read_json(profiles)?;
        let members = match members {
            Some(path) => Some(read_json::<Vec<ChannelMember>>(path)?),
            None => None,
        };
        tracing::info!(
            profiles = profiles.len(),
            members = members.as_ref().map(Vec::len),
            "loaded profiles from json"
        );
        Ok(Self { profiles, members, current_user_id: None })
    }

    pub fn from_parts(profiles: Vec<UserProfile>, members: Option<Vec<ChannelMember>>) -> Self {
        Self { profiles, members, current_user_id: None }
    }

    pub fn with_current_user(mut self, id: impl Into<String>) -> Self {
        self.current_user_id = Some(id.into());
        self
    }
}

impl ProfileSource for JsonSource {
    fn fetch_page(&mut self, page: usize, per_page: usize) -> Result<Vec<UserProfile>> {
        Ok(self
            .profiles
            .iter()
            .skip(page.saturating_mul(per_page))
            .take(per_page)
            .cloned()
            .collect())
    }

    fn channel_members(&mut self) -> Result<Option<Vec<ChannelMember>>> {
        Ok(self.members.clone())
    }

    fn current_user_id(&self) -> Option<String> {
        self.current_user_id.clone()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).with_ctx(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_ctx(|| format!("parse {}", path.display()))
}

fn parse_passwd<P: AsRef<Path>>(path: P) -> Result<Vec<SystemUser>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).with_ctx(|| format!("read {}", path.display()))?;
    let mut users = Vec::new();
    for line in contents.lines() {
        if line.is_empty() || line.starts_with('#') { continue; }
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() < 7 { continue; }
        let name = parts[0].to_string();
        let uid = parts[2].parse::<u32>().unwrap_or(0);
        let gid = parts[3].parse::<u32>().unwrap_or(0);
        let full_name = if parts[4].is_empty() { None } else { Some(parts[4].to_string()) };
        users.push(SystemUser { uid, name, primary_gid: gid, full_name });
    }
    Ok(users)
}

fn parse_group<P: AsRef<Path>>(path: P) -> Result<Vec<SystemGroup>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).with_ctx(|| format!("read {}", path.display()))?;
    let mut groups = Vec::new();
    for line in contents.lines() {
        if line.is_empty() || line.starts_with('#') { continue; }
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() < 3 { continue; }
        let name = parts[0].to_string();
        let gid = parts[2].parse::<u32>().unwrap_or(0);
        let members = if parts.len() >= 4 && !parts[3].is_empty() {
            parts[3].split(',').filter(|s| !s.is_empty()).map(|s| s.to_string()).collect()
        } else { Vec::new() };
        groups.push(SystemGroup { gid, name, members });
    }
    Ok(groups)
}

fn current_uid() -> u32 {
    // Linux: read from /proc; fallback to 0 if parsing fails
    if let Ok(contents) = std::fs::read_to_string("/proc/self/status") {
        for line in contents.lines() {
            if let Some(rest) = line.strip_prefix("Uid:") {
                if let Some(first) = rest.split_whitespace().next() {
                    if let Ok(uid) = first.parse() { return uid; }
                }
            }
        }
    }
    0
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::{path::PathBuf, time::{SystemTime, UNIX_EPOCH}};

	fn tmp_path(tag: &str) -> PathBuf {
		let mut p = std::env::temp_dir();
		let n = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
		p.push(format!("roster_rs_{tag}_{}_{}", std::process::id(), n));
		p
	}

	const PASSWD: &str = "\
root:x:0:0:root:/root:/bin/bash
jdoe:x:1000:1000:John Doe,,,:/home/jdoe:/bin/zsh
amy:x:1001:1001::/home/amy:/bin/bash
svc:x:998:100:Service:/:/usr/bin/nologin
";

	const GROUP: &str = "\
root:x:0:
wheel:x:998:root,jdoe
devs:x:2000:jdoe,amy
";

	fn write_fixtures() -> (PathBuf, PathBuf) {
		let passwd = tmp_path("passwd");
		let group = tmp_path("group");
		fs::write(&passwd, PASSWD).unwrap();
		fs::write(&group, GROUP).unwrap();
		(passwd, group)
	}

	#[test]
	fn parse_passwd_basic() {
		let (passwd, group) = write_fixtures();
		let users = parse_passwd(&passwd).unwrap();
		fs::remove_file(&passwd).ok();
		fs::remove_file(&group).ok();

		assert_eq!(users.len(), 4);
		assert_eq!(users[0].name, "root");
		assert_eq!(users[1].uid, 1000);
		assert_eq!(users[1].full_name.as_deref(), Some("John Doe,,,"));
		assert_eq!(users[2].full_name, None);
	}

	#[test]
	fn parse_group_basic() {
		let (passwd, group) = write_fixtures();
		let groups = parse_group(&group).unwrap();
		fs::remove_file(&passwd).ok();
		fs::remove_file(&group).ok();

		assert_eq!(groups.len(), 3);
		assert!(groups[0].members.is_empty());
		assert_eq!(groups[1].members, vec!["root".to_string(), "jdoe".to_string()]);
	}

	#[test]
	fn gecos_splits_into_names() {
		let u = SystemUser {
			uid: 1000,
			name: "jdoe".into(),
			primary_gid: 1000,
			full_name: Some("John van Doe,Room 1,,".into()),
		};
		let p = u.to_profile();
		assert_eq!(p.id, "1000");
		assert_eq!(p.username, "jdoe");
		assert_eq!(p.first_name, "John");
		assert_eq!(p.last_name, "van Doe");
	}

	#[test]
	fn system_source_pages_sorted_by_uid() {
		let (passwd, group) = write_fixtures();
		let mut src = SystemAdapter::with_paths(&passwd, &group);
		let first = src.fetch_page(0, 2).unwrap();
		let second = src.fetch_page(1, 2).unwrap();
		let third = src.fetch_page(2, 2).unwrap();
		let members = src.channel_members().unwrap();
		fs::remove_file(&passwd).ok();
		fs::remove_file(&group).ok();

		let ids: Vec<&str> = first.iter().chain(second.iter()).map(|p| p.id.as_str()).collect();
		assert_eq!(ids, vec!["0", "998", "1000", "1001"]);
		assert!(third.is_empty());
		assert!(members.is_none());
	}

	#[test]
	fn group_scope_marks_admins() {
		let (passwd, group) = write_fixtures();
		let mut src = SystemAdapter::with_paths(&passwd, &group).for_group("devs", "wheel");
		let profiles = src.fetch_page(0, 10).unwrap();
		let members = src.channel_members().unwrap().unwrap();
		fs::remove_file(&passwd).ok();
		fs::remove_file(&group).ok();

		let names: Vec<&str> = profiles.iter().map(|p| p.username.as_str()).collect();
		assert_eq!(names, vec!["jdoe", "amy"]);
		assert_eq!(members.len(), 2);
		assert!(members.iter().find(|m| m.user_id == "1000").unwrap().scheme_admin);
		assert!(!members.iter().find(|m| m.user_id == "1001").unwrap().scheme_admin);
		assert!(members.iter().all(|m| m.channel_id == "devs"));
	}

	#[test]
	fn unknown_group_is_an_error() {
		let (passwd, group) = write_fixtures();
		let mut src = SystemAdapter::with_paths(&passwd, &group).for_group("nope", "wheel");
		let err = src.fetch_page(0, 10).unwrap_err();
		fs::remove_file(&passwd).ok();
		fs::remove_file(&group).ok();
		assert!(err.to_string().contains("group nope not found"));
	}

	#[test]
	fn json_source_reads_files() {
		let profiles = tmp_path("profiles.json");
		let members = tmp_path("members.json");
		fs::write(&profiles, r#"[{"id":"a","username":"amy"},{"id":"b","username":"bob","first_name":"Bob"}]"#).unwrap();
		fs::write(&members, r#"[{"user_id":"a","scheme_admin":true},{"user_id":"b"}]"#).unwrap();
		let mut src = JsonSource::from_files(&profiles, Some(members.as_path())).unwrap();
		fs::remove_file(&profiles).ok();
		fs::remove_file(&members).ok();

		assert_eq!(src.fetch_page(0, 1).unwrap()[0].id, "a");
		assert_eq!(src.fetch_page(1, 1).unwrap()[0].first_name, "Bob");
		let m = src.channel_members().unwrap().unwrap();
		assert!(m[0].scheme_admin);
		assert!(!m[1].scheme_admin);
	}

	#[test]
	fn json_parse_error_names_the_file() {
		let profiles = tmp_path("bad.json");
		fs::write(&profiles, "not json").unwrap();
		let err = JsonSource::from_files(&profiles, None).err().unwrap();
		fs::remove_file(&profiles).ok();
		assert!(err.to_string().starts_with("parse "));
	}
}
