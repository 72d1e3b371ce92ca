use std::path::Path;

use crate::caster;

/// Which dropdown is currently open, and for which panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinderAnchor {
    CasterPreset { caster: usize },
    Character { player: usize },
    Skin { player: usize },
}

/// Shared dropdown state. `pointer_over` replaces the original shared
/// "mouse is inside a finder" global: focus-out handlers consult it before
/// hiding the dropdown, so a click on a suggestion is never swallowed.
#[derive(Debug, Default)]
pub struct FinderState {
    open: Option<FinderAnchor>,
    pub pointer_over: bool,
    pub suggestions: Vec<String>,
    pub filter: String,
    focus_filter: bool,
}

impl FinderState {
    pub fn open_for(&mut self, anchor: FinderAnchor) {
        if self.open != Some(anchor) {
            self.filter.clear();
            self.focus_filter = true;
        }
        self.open = Some(anchor);
    }

    /// One-shot: true on the first frame after opening, so the page can
    /// move keyboard focus into the filter box.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_filter)
    }

    pub fn close(&mut self) {
        self.open = None;
        self.pointer_over = false;
        self.suggestions.clear();
    }

    pub fn is_open_for(&self, anchor: FinderAnchor) -> bool {
        self.open == Some(anchor)
    }

    pub fn anchor(&self) -> Option<FinderAnchor> {
        self.open
    }

    /// Rebuilds the caster-preset suggestion list for the current name
    /// input. Pure side effect; callers do not consume a return value.
    pub fn refresh_caster_suggestions(&mut self, text_root: &Path, query: &str) {
        self.suggestions = filter_names(caster::list_presets(text_root), query);
    }
}

/// Case-insensitive substring filter, preserving input order.
pub fn filter_names(names: Vec<String>, query: &str) -> Vec<String> {
    if query.is_empty() {
        return names;
    }
    let needle = query.to_lowercase();
    names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_names, FinderAnchor, FinderState};
    use crate::caster::CasterPanel;

    #[test]
    fn filters_names_case_insensitively() {
        let names = vec!["Alice".to_owned(), "Malice".to_owned(), "Bob".to_owned()];
        assert_eq!(filter_names(names.clone(), "ali"), vec!["Alice", "Malice"]);
        assert_eq!(filter_names(names.clone(), ""), names);
        assert!(filter_names(names, "zzz").is_empty());
    }

    #[test]
    fn open_state_tracks_one_anchor() {
        let mut finder = FinderState::default();
        finder.open_for(FinderAnchor::CasterPreset { caster: 1 });
        assert!(finder.is_open_for(FinderAnchor::CasterPreset { caster: 1 }));
        assert!(!finder.is_open_for(FinderAnchor::CasterPreset { caster: 2 }));
        finder.close();
        assert!(finder.anchor().is_none());
        assert!(!finder.pointer_over);
    }

    #[test]
    fn suggestions_come_from_saved_presets() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["Alice", "Aline", "Bob"] {
            let mut caster = CasterPanel::new(1);
            caster.set_name(name);
            caster.save_preset(dir.path()).expect("save");
        }
        let mut finder = FinderState::default();
        finder.refresh_caster_suggestions(dir.path(), "ali");
        assert_eq!(finder.suggestions, vec!["Alice", "Aline"]);
        finder.refresh_caster_suggestions(dir.path(), "");
        assert_eq!(finder.suggestions.len(), 3);
    }
}
