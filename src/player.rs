use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc::{self, Receiver, TryRecvError},
        Arc,
    },
    thread,
};

use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    character::{self, CharacterInfo, GuiPlacement, SkinRef},
    recolor,
    scoreboard::ScoreboardCommand,
};

pub const SKIN_SUBFOLDER: &str = "Skins";
pub const ICON_SUBFOLDER: &str = "Icons";
pub const SKIN_FALLBACK_TAG: &str = "P2";
pub const ICON_FALLBACK_TAG: &str = "Icon";
pub const CUSTOM_SKIN_LABEL: &str = "Custom Skin";

/// Active character asset location. Workshop mode swaps the base
/// characters path for every branch of browser-source resolution.
#[derive(Debug, Clone)]
pub struct CharSource {
    root: PathBuf,
    workshop: bool,
}

impl CharSource {
    pub fn new(character_root: PathBuf, workshop: bool) -> Self {
        Self {
            root: character_root,
            workshop,
        }
    }

    /// On-disk directory probed for character folders and images.
    pub fn fs_root(&self) -> PathBuf {
        if self.workshop {
            self.root.join("_Workshop")
        } else {
            self.root.clone()
        }
    }

    /// Path prefix handed to browser sources, relative to the overlay.
    pub fn label_root(&self) -> &'static str {
        if self.workshop {
            "Resources/Characters/_Workshop"
        } else {
            "Resources/Characters"
        }
    }
}

/// Image path for overlay browser sources. First match wins:
/// the skin's own image (unless forced), then `Default.png` (but no image
/// at all for hex-only variants), then the shared random fallback.
pub fn resolve_browser_source(
    src: &CharSource,
    character: &str,
    skin: &SkinRef,
    subfolder: &str,
    fallback_name: &str,
) -> Option<String> {
    let dir = src.fs_root().join(character).join(subfolder);
    let label = src.label_root();

    if dir.join(format!("{}.png", skin.name)).is_file() && !skin.force {
        return Some(format!(
            "{label}/{character}/{subfolder}/{}.png",
            skin.name
        ));
    }
    if dir.join("Default.png").is_file() {
        if skin.hex.is_some() {
            return None;
        }
        return Some(format!("{label}/{character}/{subfolder}/Default.png"));
    }
    Some(format!("{label}/Random/{fallback_name}.png"))
}

pub fn custom_skin(hex: &str) -> SkinRef {
    SkinRef {
        name: "Custom".to_owned(),
        hex: Some(hex.to_owned()),
        force: true,
    }
}

/// One selectable row of the skin finder: label plus a thumbnail slot
/// that fills in as loads complete. The final entry is the synthetic
/// custom-skin row.
pub struct SkinEntry {
    pub skin: SkinRef,
    pub label: String,
    pub custom: bool,
    pub texture: Option<TextureHandle>,
    pub placement: GuiPlacement,
}

struct InfoFetch {
    generation: u64,
    info: Option<CharacterInfo>,
    keep_current_skin: bool,
}

struct ThumbReady {
    generation: u64,
    index: usize,
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

pub struct PlayerPanel {
    pub number: usize,
    pub name: String,
    pub tag: String,
    character: String,
    skin: SkinRef,
    char_info: CharacterInfo,
    ready: bool,
    /// Bumped on every character change. Async completions carry the
    /// generation they were issued under and are dropped on mismatch.
    live_generation: Arc<AtomicU64>,
    skin_select_visible: bool,
    skin_entries: Vec<SkinEntry>,
    icon_texture: Option<TextureHandle>,
    icon_browser_src: Option<String>,
    skin_browser_src: Option<String>,
    info_rx: Option<Receiver<InfoFetch>>,
    thumb_rx: Option<Receiver<ThumbReady>>,
    ready_tx: UnboundedSender<ScoreboardCommand>,
}

impl PlayerPanel {
    pub fn new(number: usize, ready_tx: UnboundedSender<ScoreboardCommand>) -> Self {
        Self {
            number,
            name: String::new(),
            tag: String::new(),
            character: String::new(),
            skin: SkinRef::named("Default"),
            char_info: CharacterInfo::default(),
            ready: true,
            live_generation: Arc::new(AtomicU64::new(0)),
            skin_select_visible: false,
            skin_entries: Vec::new(),
            icon_texture: None,
            icon_browser_src: None,
            skin_browser_src: None,
            info_rx: None,
            thumb_rx: None,
            ready_tx,
        }
    }

    pub fn character(&self) -> &str {
        &self.character
    }
    pub fn skin(&self) -> &SkinRef {
        &self.skin
    }
    pub fn char_info(&self) -> &CharacterInfo {
        &self.char_info
    }
    pub fn is_ready(&self) -> bool {
        self.ready
    }
    pub fn skin_select_visible(&self) -> bool {
        self.skin_select_visible
    }
    pub fn skin_entries(&self) -> &[SkinEntry] {
        &self.skin_entries
    }
    pub fn icon_texture(&self) -> Option<&TextureHandle> {
        self.icon_texture.as_ref()
    }
    pub fn icon_browser_src(&self) -> Option<&str> {
        self.icon_browser_src.as_deref()
    }
    pub fn skin_browser_src(&self) -> Option<&str> {
        self.skin_browser_src.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.live_generation.load(Ordering::Relaxed)
    }

    fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
        let _ = self.ready_tx.send(ScoreboardCommand::SetReady {
            player: self.number,
            ready,
        });
    }

    /// Starts a character change: marks the panel busy, bumps the
    /// generation (invalidating every in-flight load for the previous
    /// character) and kicks off the metadata fetch. Readiness comes back
    /// through the skin-change path once the fetch lands.
    pub fn begin_character_change(
        &mut self,
        character: &str,
        keep_current_skin: bool,
        src: &CharSource,
    ) {
        self.set_ready(false);
        let generation = self.live_generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.character = character.to_owned();
        self.skin_entries.clear();
        self.thumb_rx = None;

        let (tx, rx) = mpsc::channel();
        self.info_rx = Some(rx);
        let root = src.fs_root();
        let name = character.to_owned();
        thread::spawn(move || {
            let info = character::load_character_info(&root, &name);
            let _ = tx.send(InfoFetch {
                generation,
                info,
                keep_current_skin,
            });
        });
    }

    /// Called once per frame: applies a landed metadata fetch and attaches
    /// any completed thumbnails, dropping everything stale.
    pub fn poll(&mut self, src: &CharSource, ctx: &Context) {
        if let Some(rx) = self.info_rx.take() {
            match rx.try_recv() {
                Ok(fetch) => {
                    if fetch.generation == self.generation() {
                        self.apply_character_info(fetch.info, fetch.keep_current_skin, src, ctx);
                    }
                }
                Err(TryRecvError::Empty) => self.info_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {}
            }
        }

        if let Some(rx) = self.thumb_rx.take() {
            let mut disconnected = false;
            loop {
                match rx.try_recv() {
                    Ok(thumb) => self.attach_thumbnail(thumb, ctx),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
            if !disconnected {
                self.thumb_rx = Some(rx);
            }
        }
    }

    fn apply_character_info(
        &mut self,
        info: Option<CharacterInfo>,
        keep_current_skin: bool,
        src: &CharSource,
        ctx: &Context,
    ) {
        self.char_info = info.unwrap_or_else(CharacterInfo::placeholder);
        self.skin = self.char_info.default_skin();
        self.skin_select_visible = self.char_info.skin_list.len() > 1;
        if !keep_current_skin {
            let skin = self.skin.clone();
            self.change_skin(skin, src, ctx);
        }
        if self.char_info.skin_list.len() > 1 {
            self.generate_skin_entries(src);
        }
    }

    /// Applies a skin: selector icon, browser sources, and the readiness
    /// transition that lets the scoreboard writer read this panel again.
    pub fn change_skin(&mut self, skin: SkinRef, src: &CharSource, ctx: &Context) {
        self.skin = skin;
        self.icon_texture = recolor::resolve_panel_image(
            &src.fs_root(),
            &self.character,
            &self.skin,
            &self.char_info,
            ICON_SUBFOLDER,
            ICON_FALLBACK_TAG,
        )
        .map(|img| {
            let size = [img.width() as usize, img.height() as usize];
            ctx.load_texture(
                format!("icon://p{}/{}/{}", self.number, self.character, self.skin.name),
                ColorImage::from_rgba_unmultiplied(size, img.as_raw()),
                TextureOptions::LINEAR,
            )
        });
        self.icon_browser_src =
            resolve_browser_source(src, &self.character, &self.skin, ICON_SUBFOLDER, ICON_FALLBACK_TAG);
        self.skin_browser_src =
            resolve_browser_source(src, &self.character, &self.skin, SKIN_SUBFOLDER, SKIN_FALLBACK_TAG);
        self.set_ready(true);
    }

    /// Rebuilds the selectable skin list and spawns the thumbnail loader
    /// for it. Thumbnails resolve in list order but attach whenever they
    /// land; the only ordering contract is the generation check.
    pub fn generate_skin_entries(&mut self, src: &CharSource) {
        let generation = self.generation();
        self.skin_entries = self
            .char_info
            .skin_list
            .iter()
            .map(|skin| SkinEntry {
                skin: skin.clone(),
                label: skin.name.clone(),
                custom: false,
                texture: None,
                placement: self
                    .char_info
                    .placement_for(&skin.name)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();
        self.skin_entries.push(SkinEntry {
            skin: SkinRef::named("Custom"),
            label: CUSTOM_SKIN_LABEL.to_owned(),
            custom: true,
            texture: None,
            placement: GuiPlacement::default(),
        });

        let (tx, rx) = mpsc::channel();
        self.thumb_rx = Some(rx);
        let live = Arc::clone(&self.live_generation);
        let root = src.fs_root();
        let character = self.character.clone();
        let info = self.char_info.clone();
        let skins = self.char_info.skin_list.clone();
        thread::spawn(move || {
            for (index, skin) in skins.iter().enumerate() {
                // a character change mid-loop abandons the rest; loads are
                // never cancelled, their results just stop mattering
                if live.load(Ordering::Relaxed) != generation {
                    break;
                }
                let Some(img) = recolor::resolve_panel_image(
                    &root,
                    &character,
                    skin,
                    &info,
                    SKIN_SUBFOLDER,
                    SKIN_FALLBACK_TAG,
                ) else {
                    continue;
                };
                let thumb = ThumbReady {
                    generation,
                    index,
                    width: img.width() as usize,
                    height: img.height() as usize,
                    rgba: img.into_raw(),
                };
                if tx.send(thumb).is_err() {
                    break;
                }
            }
        });
    }

    fn attach_thumbnail(&mut self, thumb: ThumbReady, ctx: &Context) {
        if thumb.generation != self.generation() {
            return;
        }
        let number = self.number;
        let character = self.character.clone();
        let Some(entry) = self.skin_entries.get_mut(thumb.index) else {
            return;
        };
        let image = ColorImage::from_rgba_unmultiplied([thumb.width, thumb.height], &thumb.rgba);
        entry.texture = Some(ctx.load_texture(
            format!("skin://p{number}/{character}/{}", entry.skin.name),
            image,
            TextureOptions::LINEAR,
        ));
    }
}
