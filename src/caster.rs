use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const PRESET_DIR: &str = "Commentator Info";

/// Persisted body of a commentator preset. The caster name is the file
/// stem, never part of the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasterPreset {
    pub twitter: String,
    pub twitch: String,
    pub youtube: String,
}

/// One commentator info panel. Social getters resolve empty fields to the
/// literal `"-"` used on stream; the name is returned raw.
#[derive(Debug, Clone)]
pub struct CasterPanel {
    pub number: usize,
    name: String,
    twitter: String,
    twitch: String,
    youtube: String,
}

impl CasterPanel {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            name: String::new(),
            twitter: String::new(),
            twitch: String::new(),
            youtube: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn twitter(&self) -> &str {
        display_or_dash(&self.twitter)
    }
    pub fn twitch(&self) -> &str {
        display_or_dash(&self.twitch)
    }
    pub fn youtube(&self) -> &str {
        display_or_dash(&self.youtube)
    }

    pub fn set_name(&mut self, text: &str) {
        self.name = text.to_owned();
    }
    pub fn set_twitter(&mut self, text: &str) {
        self.twitter = text.to_owned();
    }
    pub fn set_twitch(&mut self, text: &str) {
        self.twitch = text.to_owned();
    }
    pub fn set_youtube(&mut self, text: &str) {
        self.youtube = text.to_owned();
    }

    pub fn name_mut(&mut self) -> &mut String {
        &mut self.name
    }
    pub fn twitter_mut(&mut self) -> &mut String {
        &mut self.twitter
    }
    pub fn twitch_mut(&mut self) -> &mut String {
        &mut self.twitch
    }
    pub fn youtube_mut(&mut self) -> &mut String {
        &mut self.youtube
    }

    /// Saving is gated on a non-empty name; the save button renders
    /// disabled otherwise.
    pub fn save_enabled(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn preset(&self) -> CasterPreset {
        CasterPreset {
            twitter: self.twitter().to_owned(),
            twitch: self.twitch().to_owned(),
            youtube: self.youtube().to_owned(),
        }
    }

    /// Writes the preset to `<text_root>/Commentator Info/<name>.json`,
    /// silently overwriting an existing file.
    pub fn save_preset(&self, text_root: &Path) -> Result<PathBuf> {
        if !self.save_enabled() {
            anyhow::bail!("cannot save a commentator preset without a name");
        }
        let dir = text_root.join(PRESET_DIR);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed creating preset dir at {}", dir.display()))?;
        let path = dir.join(format!("{}.json", self.name));
        let payload = serde_json::to_string_pretty(&self.preset())
            .context("failed serializing commentator preset")?;
        fs::write(&path, payload)
            .with_context(|| format!("failed writing preset at {}", path.display()))?;
        Ok(path)
    }

    /// Fills the panel from a stored preset. The `"-"` sentinel folds back
    /// to an empty field so the inputs stay clean for editing.
    pub fn apply_preset(&mut self, name: &str, preset: &CasterPreset) {
        self.name = name.to_owned();
        self.twitter = stored_or_empty(&preset.twitter);
        self.twitch = stored_or_empty(&preset.twitch);
        self.youtube = stored_or_empty(&preset.youtube);
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn stored_or_empty(value: &str) -> String {
    if value == "-" {
        String::new()
    } else {
        value.to_owned()
    }
}

/// Names of all saved presets, sorted, for the finder suggestion list.
pub fn list_presets(text_root: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(text_root.join(PRESET_DIR)) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .filter_map(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names
}

pub fn load_preset(text_root: &Path, name: &str) -> Option<CasterPreset> {
    let path = text_root.join(PRESET_DIR).join(format!("{name}.json"));
    let text = fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{list_presets, load_preset, CasterPanel, CasterPreset};

    #[test]
    fn social_getters_resolve_empty_to_dash() {
        let mut caster = CasterPanel::new(1);
        assert_eq!(caster.twitter(), "-");
        assert_eq!(caster.twitch(), "-");
        assert_eq!(caster.youtube(), "-");
        caster.set_twitch("alicelive");
        assert_eq!(caster.twitch(), "alicelive");
        assert_eq!(caster.twitter(), "-");
    }

    #[test]
    fn name_is_returned_raw() {
        let mut caster = CasterPanel::new(1);
        assert_eq!(caster.name(), "");
        caster.set_name("Alice");
        assert_eq!(caster.name(), "Alice");
    }

    #[test]
    fn setters_round_trip_non_empty_values() {
        let mut caster = CasterPanel::new(2);
        caster.set_twitter("@ali");
        caster.set_twitch("alicelive");
        caster.set_youtube("AliceVids");
        assert_eq!(caster.twitter(), "@ali");
        assert_eq!(caster.twitch(), "alicelive");
        assert_eq!(caster.youtube(), "AliceVids");
    }

    #[test]
    fn save_is_gated_on_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let caster = CasterPanel::new(1);
        assert!(!caster.save_enabled());
        assert!(caster.save_preset(dir.path()).is_err());
    }

    #[test]
    fn save_writes_name_keyed_pretty_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut caster = CasterPanel::new(1);
        caster.set_name("Alice");
        caster.set_twitch("alicelive");
        let path = caster.save_preset(dir.path()).expect("save should succeed");
        assert!(path.ends_with("Commentator Info/Alice.json"));

        let body = fs::read_to_string(&path).expect("preset should exist");
        let parsed: serde_json::Value = serde_json::from_str(&body).expect("valid json");
        assert_eq!(parsed["twitter"], "-");
        assert_eq!(parsed["twitch"], "alicelive");
        assert_eq!(parsed["youtube"], "-");
        // pretty-printed, not a single line
        assert!(body.contains('\n'));
    }

    #[test]
    fn save_overwrites_existing_preset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut caster = CasterPanel::new(1);
        caster.set_name("Alice");
        caster.set_twitter("old");
        caster.save_preset(dir.path()).expect("first save");
        caster.set_twitter("new");
        caster.save_preset(dir.path()).expect("second save");
        let loaded = load_preset(dir.path(), "Alice").expect("preset should load");
        assert_eq!(loaded.twitter, "new");
    }

    #[test]
    fn apply_preset_folds_dash_back_to_empty() {
        let mut caster = CasterPanel::new(1);
        let preset = CasterPreset {
            twitter: "-".to_owned(),
            twitch: "alicelive".to_owned(),
            youtube: "-".to_owned(),
        };
        caster.apply_preset("Alice", &preset);
        assert_eq!(caster.name(), "Alice");
        assert_eq!(caster.twitter(), "-");
        assert_eq!(caster.twitch(), "alicelive");
        assert!(caster.twitter_mut().is_empty());
    }

    #[test]
    fn lists_saved_presets_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["Zoe", "Alice"] {
            let mut caster = CasterPanel::new(1);
            caster.set_name(name);
            caster.save_preset(dir.path()).expect("save");
        }
        fs::write(
            dir.path().join("Commentator Info").join("readme.txt"),
            "ignored",
        )
        .expect("write");
        assert_eq!(list_presets(dir.path()), vec!["Alice", "Zoe"]);
        assert!(list_presets(&dir.path().join("missing")).is_empty());
    }
}
