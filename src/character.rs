use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One selectable skin variant. `hex` marks a color-only variant with no
/// dedicated raster asset; `force` bypasses the named-image branch when
/// resolving browser sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
}

impl SkinRef {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            hex: None,
            force: false,
        }
    }
}

/// Thumbnail placement hint for a skin entry. `skin` may be `"*"` to apply
/// to every skin of the character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiPlacement {
    pub skin: String,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for GuiPlacement {
    fn default() -> Self {
        Self {
            skin: "*".to_owned(),
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CharacterInfo {
    #[serde(alias = "skinList")]
    pub skin_list: Vec<SkinRef>,
    pub gui: Vec<GuiPlacement>,
    #[serde(alias = "ogColor")]
    pub og_color: Option<String>,
    #[serde(alias = "colorRange")]
    pub color_range: Option<f32>,
}

impl CharacterInfo {
    /// Substitute used when a character has no `_Info.json`. A defined
    /// degraded mode, not an error.
    pub fn placeholder() -> Self {
        Self {
            skin_list: vec![SkinRef::named("Default")],
            gui: Vec::new(),
            og_color: None,
            color_range: None,
        }
    }

    pub fn default_skin(&self) -> SkinRef {
        self.skin_list
            .first()
            .cloned()
            .unwrap_or_else(|| SkinRef::named("Default"))
    }

    pub fn placement_for(&self, skin_name: &str) -> Option<&GuiPlacement> {
        self.gui
            .iter()
            .find(|placement| placement.skin == skin_name)
            .or_else(|| self.gui.iter().find(|placement| placement.skin == "*"))
    }
}

/// Loads `<char_root>/<name>/_Info.json`. Absence (missing directory or
/// file) yields `None`; an unreadable or unparseable file also yields
/// `None` after logging, so callers always fall back the same way.
pub fn load_character_info(char_root: &Path, name: &str) -> Option<CharacterInfo> {
    let path = char_root.join(name).join("_Info.json");
    if !path.is_file() {
        return None;
    }
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            warn!(?err, path = %path.display(), "failed reading character info");
            return None;
        }
    };
    match serde_json::from_str::<CharacterInfo>(&text) {
        Ok(info) => Some(info),
        Err(err) => {
            warn!(?err, path = %path.display(), "invalid character info json");
            None
        }
    }
}

/// Character folders under the active characters root, sorted by name.
pub fn list_characters(char_root: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(char_root) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('_') && name != "Random")
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{list_characters, load_character_info, CharacterInfo, SkinRef};

    #[test]
    fn parses_original_info_shape() {
        let raw = r##"{
            "skinList": [
                {"name": "Default"},
                {"name": "Crimson", "hex": "#d03030"},
                {"name": "LoA", "force": true}
            ],
            "gui": [{"skin": "*", "x": -8.0, "y": 4.0, "scale": 1.2}],
            "ogColor": "#3aa03a",
            "colorRange": 35.0
        }"##;
        let info: CharacterInfo = serde_json::from_str(raw).expect("info should parse");
        assert_eq!(info.skin_list.len(), 3);
        assert_eq!(info.skin_list[0], SkinRef::named("Default"));
        assert_eq!(info.skin_list[1].hex.as_deref(), Some("#d03030"));
        assert!(info.skin_list[2].force);
        assert_eq!(info.og_color.as_deref(), Some("#3aa03a"));
        assert_eq!(info.color_range, Some(35.0));
        let placement = info.placement_for("Crimson").expect("wildcard placement");
        assert_eq!(placement.x, -8.0);
        assert_eq!(placement.scale, 1.2);
    }

    #[test]
    fn placeholder_has_single_default_skin() {
        let info = CharacterInfo::placeholder();
        assert_eq!(info.skin_list, vec![SkinRef::named("Default")]);
        assert!(info.gui.is_empty());
        assert_eq!(info.default_skin().name, "Default");
    }

    #[test]
    fn missing_info_yields_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_character_info(dir.path(), "Ghost").is_none());
        fs::create_dir_all(dir.path().join("Ghost")).expect("mkdir");
        assert!(load_character_info(dir.path(), "Ghost").is_none());
    }

    #[test]
    fn unparseable_info_yields_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let char_dir = dir.path().join("Broken");
        fs::create_dir_all(&char_dir).expect("mkdir");
        fs::write(char_dir.join("_Info.json"), "{not json").expect("write");
        assert!(load_character_info(dir.path(), "Broken").is_none());
    }

    #[test]
    fn lists_character_directories_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["Zelda", "Fox", "Random", "_Workshop"] {
            fs::create_dir_all(dir.path().join(name)).expect("mkdir");
        }
        fs::write(dir.path().join("notes.txt"), "x").expect("write");
        assert_eq!(list_characters(dir.path()), vec!["Fox", "Zelda"]);
    }
}
