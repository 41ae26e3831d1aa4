//! Skin-tone aware emoji names.
//!
//! A picker shows base emoji names; when the user has a skin tone preference
//! the press reports the skinned variant instead, provided that variant is a
//! known emoji. Otherwise the base name is reported unchanged.

use std::collections::HashSet;
use std::time::Instant;

use crate::tap::TapGuard;

pub const DEFAULT_EMOJI_SIZE: u16 = 30;

/// Skinnable gestures shipped with the built-in catalog.
const BUILTIN_SKINNABLE: &[&str] = &[
    "+1", "-1", "thumbsup", "thumbsdown", "wave", "clap", "raised_hands", "ok_hand",
    "pray", "muscle", "point_up", "point_down", "point_left", "point_right", "v",
    "raised_hand", "fist", "facepunch", "metal", "call_me_hand", "writing_hand",
];

const BUILTIN_PLAIN: &[&str] = &["smile", "heart", "tada", "rocket", "eyes", "white_check_mark"];

/// User preference for skinned emoji variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SkinTone {
    #[default]
    Default,
    Light,
    MediumLight,
    Medium,
    MediumDark,
    Dark,
}

impl SkinTone {
    pub const ALL_SKINNED: [SkinTone; 5] = [
        SkinTone::Light,
        SkinTone::MediumLight,
        SkinTone::Medium,
        SkinTone::MediumDark,
        SkinTone::Dark,
    ];

    /// Parse a stored preference: `default` or a modifier code such as `1F3FB`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEFAULT" | "" => Some(Self::Default),
            "1F3FB" => Some(Self::Light),
            "1F3FC" => Some(Self::MediumLight),
            "1F3FD" => Some(Self::Medium),
            "1F3FE" => Some(Self::MediumDark),
            "1F3FF" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Light => "1F3FB",
            Self::MediumLight => "1F3FC",
            Self::Medium => "1F3FD",
            Self::MediumDark => "1F3FE",
            Self::Dark => "1F3FF",
        }
    }

    /// Name suffix of the skinned variant; `None` for the default tone.
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Light => Some("light_skin_tone"),
            Self::MediumLight => Some("medium_light_skin_tone"),
            Self::Medium => Some("medium_skin_tone"),
            Self::MediumDark => Some("medium_dark_skin_tone"),
            Self::Dark => Some("dark_skin_tone"),
        }
    }
}

/// Set of emoji names that can be rendered.
#[derive(Clone, Debug, Default)]
pub struct EmojiCatalog {
    names: HashSet<String>,
}

impl EmojiCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: names.into_iter().map(Into::into).collect() }
    }

    /// Register every base name together with all of its skinned variants.
    pub fn with_skin_variants<I, S>(bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::default();
        for base in bases {
            catalog.insert_skinnable(base.as_ref());
        }
        catalog
    }

    pub fn builtin() -> Self {
        let mut catalog = Self::with_skin_variants(BUILTIN_SKINNABLE);
        for name in BUILTIN_PLAIN {
            catalog.insert(*name);
        }
        catalog
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn insert_skinnable(&mut self, base: &str) {
        self.names.insert(base.to_string());
        for tone in SkinTone::ALL_SKINNED {
            if let Some(suffix) = tone.suffix() {
                self.names.insert(format!("{base}_{suffix}"));
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Name to report for `name` under `tone`.
pub fn resolve_emoji_name(name: &str, tone: SkinTone, catalog: &EmojiCatalog) -> String {
    let Some(suffix) = tone.suffix() else {
        return name.to_string();
    };
    let skinned = format!("{name}_{suffix}");
    if catalog.contains(&skinned) { skinned } else { name.to_string() }
}

/// A pressable emoji cell in a picker.
#[derive(Clone, Debug)]
pub struct SkinnedEmoji {
    pub name: String,
    pub size: u16,
    resolved: String,
    guard: TapGuard,
}

impl SkinnedEmoji {
    pub fn new(name: impl Into<String>, tone: SkinTone, catalog: &EmojiCatalog) -> Self {
        let name = name.into();
        let resolved = resolve_emoji_name(&name, tone, catalog);
        Self { name, size: DEFAULT_EMOJI_SIZE, resolved, guard: TapGuard::default() }
    }

    pub fn with_size(mut self, size: u16) -> Self {
        self.size = size;
        self
    }

    /// Re-resolve after the tone preference changed.
    pub fn set_tone(&mut self, tone: SkinTone, catalog: &EmojiCatalog) {
        self.resolved = resolve_emoji_name(&self.name, tone, catalog);
    }

    pub fn emoji_name(&self) -> &str {
        &self.resolved
    }

    /// Report the resolved name to `on_press`, unless this is a double tap.
    pub fn press(&mut self, now: Instant, on_press: impl FnOnce(&str)) -> bool {
        let resolved = &self.resolved;
        self.guard.guard(now, || on_press(resolved)).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_tone_keeps_base_name() {
        let catalog = EmojiCatalog::builtin();
        assert_eq!(resolve_emoji_name("wave", SkinTone::Default, &catalog), "wave");
    }

    #[test]
    fn known_variant_is_used() {
        let catalog = EmojiCatalog::builtin();
        assert_eq!(resolve_emoji_name("wave", SkinTone::Dark, &catalog), "wave_dark_skin_tone");
        assert_eq!(
            resolve_emoji_name("thumbsup", SkinTone::MediumLight, &catalog),
            "thumbsup_medium_light_skin_tone"
        );
    }

    #[test]
    fn unknown_variant_falls_back() {
        let catalog = EmojiCatalog::builtin();
        assert_eq!(resolve_emoji_name("rocket", SkinTone::Light, &catalog), "rocket");
        assert_eq!(resolve_emoji_name("not_an_emoji", SkinTone::Light, &catalog), "not_an_emoji");
    }

    #[test]
    fn skin_tone_parses_codes() {
        assert_eq!(SkinTone::parse("default"), Some(SkinTone::Default));
        assert_eq!(SkinTone::parse("1f3fd"), Some(SkinTone::Medium));
        assert_eq!(SkinTone::parse("1F3FF"), Some(SkinTone::Dark));
        assert_eq!(SkinTone::parse("purple"), None);
        for tone in SkinTone::ALL_SKINNED {
            assert_eq!(SkinTone::parse(tone.code()), Some(tone));
        }
    }

    #[test]
    fn press_reports_resolved_name_once() {
        let catalog = EmojiCatalog::with_skin_variants(["clap"]);
        let mut emoji = SkinnedEmoji::new("clap", SkinTone::Medium, &catalog);
        let mut seen = Vec::new();
        let t0 = Instant::now();
        assert!(emoji.press(t0, |n| seen.push(n.to_string())));
        assert!(!emoji.press(t0 + Duration::from_millis(200), |n| seen.push(n.to_string())));
        assert_eq!(seen, vec!["clap_medium_skin_tone".to_string()]);

        emoji.set_tone(SkinTone::Default, &catalog);
        assert_eq!(emoji.emoji_name(), "clap");
        assert_eq!(emoji.size, DEFAULT_EMOJI_SIZE);
    }
}
