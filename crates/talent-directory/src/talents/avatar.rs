//! Avatar resolution for profiles without a custom upload.

use super::domain::Profile;
use super::storage::FileStore;

pub const AVATAR_PRESET_MIN: i32 = 1;
pub const AVATAR_PRESET_MAX: i32 = 11;
pub const DEFAULT_AVATAR_PRESET: i32 = AVATAR_PRESET_MIN;

const PRESET_PATH_PREFIX: &str = "/static/talents/avatars";

/// Parse the form's preset selector, falling back to the default on absent or malformed input.
pub fn parse_avatar_preset(raw: Option<&str>) -> i32 {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<i32>().ok())
        .unwrap_or(DEFAULT_AVATAR_PRESET)
}

pub fn clamp_preset(preset: i32) -> i32 {
    preset.clamp(AVATAR_PRESET_MIN, AVATAR_PRESET_MAX)
}

pub fn preset_path(preset: i32) -> String {
    format!("{PRESET_PATH_PREFIX}/{}.png", clamp_preset(preset))
}

/// Displayable image reference for a profile. Never fails.
pub fn resolve_avatar(profile: &Profile, store: &dyn FileStore) -> String {
    match &profile.avatar {
        Some(stored) => store.url(stored),
        None => preset_path(profile.avatar_preset),
    }
}
