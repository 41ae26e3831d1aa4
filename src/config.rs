//! Settings file: parse/write `roster.conf`.
//!
//! The file is a list of `key = value` lines. Lines starting with `#` and
//! unknown keys are ignored; unparsable values keep the default and are
//! logged.

use std::path::PathBuf;

use crate::emoji::SkinTone;
use crate::profile::NameDisplay;
use crate::sections::RoleLabels;
use crate::sys::DEFAULT_ADMIN_GROUP;

pub const CONFIG_FILE_NAME: &str = "roster.conf";
pub const DEFAULT_PAGE_SIZE: usize = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterConfig {
    /// Unix group whose members are shown as admins.
    pub admin_group: String,
    pub name_display: NameDisplay,
    pub skin_tone: SkinTone,
    /// Profiles requested per fetch.
    pub page_size: usize,
    pub labels: RoleLabels,
    pub log_file: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            admin_group: DEFAULT_ADMIN_GROUP.to_string(),
            name_display: NameDisplay::default(),
            skin_tone: SkinTone::default(),
            page_size: DEFAULT_PAGE_SIZE,
            labels: RoleLabels::default(),
            log_file: "roster.log".to_string(),
        }
    }
}

impl RosterConfig {
    /// Load from `path`; otherwise from a standard config location;
    /// otherwise write defaults to `path` and return them.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = config_file_read_path(CONFIG_FILE_NAME) {
            return Self::from_file(&existing.to_string_lossy()).unwrap_or_default();
        }
        let cfg = Self::default();
        if let Err(e) = cfg.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default config");
        }
        cfg
    }

    /// `None` if the file cannot be read.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            match key {
                "admin_group" => cfg.admin_group = val.to_string(),
                "name_display" => match NameDisplay::parse(val) {
                    Some(d) => cfg.name_display = d,
                    None => tracing::warn!(value = val, "unknown name_display"),
                },
                "skin_tone" => match SkinTone::parse(val) {
                    Some(t) => cfg.skin_tone = t,
                    None => tracing::warn!(value = val, "unknown skin_tone"),
                },
                "page_size" => match val.parse::<usize>() {
                    Ok(n) if n > 0 => cfg.page_size = n,
                    _ => tracing::warn!(value = val, "page_size must be a positive integer"),
                },
                "admins_label" => cfg.labels.admins = val.to_string(),
                "members_label" => cfg.labels.members = val.to_string(),
                "log_file" => cfg.log_file = val.to_string(),
                _ => {}
            }
        }
        cfg
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# roster configuration\n");
        buf.push_str("# name_display: username|full_name|nickname_full_name\n");
        buf.push_str("# skin_tone: default|1F3FB|1F3FC|1F3FD|1F3FE|1F3FF\n\n");

        let mut kv = |k: &str, v: &str| {
            let _ = writeln!(&mut buf, "{k} = {v}");
        };
        kv("admin_group", &self.admin_group);
        kv("name_display", self.name_display.as_str());
        kv("skin_tone", self.skin_tone.code());
        kv("page_size", &self.page_size.to_string());
        kv("admins_label", &self.labels.admins);
        kv("members_label", &self.labels.members);
        kv("log_file", &self.log_file);

        std::fs::write(path, buf)
    }
}

/// First existing `name` under `$XDG_CONFIG_HOME/roster` or `$HOME/.config/roster`.
pub fn config_file_read_path(name: &str) -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        dirs.push(PathBuf::from(xdg).join("roster"));
    }
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home).join(".config").join("roster"));
    }
    dirs.into_iter().map(|d| d.join(name)).find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_overrides_known_keys() {
        let cfg = RosterConfig::parse(
            "# comment\n\
             admin_group = sudo\n\
             name_display = full_name\n\
             skin_tone = 1F3FE\n\
             page_size = 25\n\
             admins_label = CHANNEL ADMINS\n\
             unknown = value\n\
             members_label =\n",
        );
        assert_eq!(cfg.admin_group, "sudo");
        assert_eq!(cfg.name_display, NameDisplay::FullName);
        assert_eq!(cfg.skin_tone, SkinTone::MediumDark);
        assert_eq!(cfg.page_size, 25);
        assert_eq!(cfg.labels.admins, "CHANNEL ADMINS");
        assert_eq!(cfg.labels.members, "Members");
    }

    #[test]
    fn bad_values_keep_defaults() {
        let cfg = RosterConfig::parse("page_size = 0\nskin_tone = teal\nname_display = ???\n");
        assert_eq!(cfg, RosterConfig::default());
    }
}
