//! `settings.json` (§6): key bindings plus render/quality settings, loaded
//! with `serde_json` the same way the engine already serializes its other
//! persisted records. Unknown actions are migrated to defaults and the
//! normalized file is rewritten, matching §7 error-handling kind 5.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadowQuality {
    Off,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PbrQuality {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub primary: String,
    pub alternate: Option<String>,
}

impl Binding {
    fn single(primary: &str) -> Self {
        Self { primary: primary.to_string(), alternate: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_bindings")]
    pub bindings: BTreeMap<String, Binding>,
    #[serde(default = "default_render_distance")]
    pub render_distance: u32,
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_sensitivity")]
    pub mouse_sensitivity: f32,
    #[serde(default = "default_true")]
    pub vsync: bool,
    #[serde(default = "default_shadow_quality")]
    pub shadow_quality: ShadowQuality,
    #[serde(default = "default_pbr_quality")]
    pub pbr_quality: PbrQuality,
    #[serde(default = "default_msaa")]
    pub msaa_samples: u32,
    #[serde(default = "default_anisotropy")]
    pub anisotropy_cap: u32,
    #[serde(default = "default_volumetric_density")]
    pub volumetric_density: f32,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_resource_pack")]
    pub active_resource_pack: String,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_bindings() -> BTreeMap<String, Binding> {
    [
        ("move_forward", "KeyW"),
        ("move_back", "KeyS"),
        ("move_left", "KeyA"),
        ("move_right", "KeyD"),
        ("jump", "Space"),
        ("crouch", "ShiftLeft"),
        ("sprint", "ControlLeft"),
        ("interact_primary", "MouseLeft"),
        ("interact_secondary", "MouseRight"),
    ]
    .into_iter()
    .map(|(action, key)| (action.to_string(), Binding::single(key)))
    .collect()
}

fn default_render_distance() -> u32 {
    12
}
fn default_fov() -> f32 {
    80.0
}
fn default_sensitivity() -> f32 {
    0.5
}
fn default_true() -> bool {
    true
}
fn default_shadow_quality() -> ShadowQuality {
    ShadowQuality::Medium
}
fn default_pbr_quality() -> PbrQuality {
    PbrQuality::Medium
}
fn default_msaa() -> u32 {
    1
}
fn default_anisotropy() -> u32 {
    8
}
fn default_volumetric_density() -> f32 {
    0.3
}
fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_resource_pack() -> String {
    "default".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            bindings: default_bindings(),
            render_distance: default_render_distance(),
            fov_degrees: default_fov(),
            mouse_sensitivity: default_sensitivity(),
            vsync: default_true(),
            shadow_quality: default_shadow_quality(),
            pbr_quality: default_pbr_quality(),
            msaa_samples: default_msaa(),
            anisotropy_cap: default_anisotropy(),
            volumetric_density: default_volumetric_density(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            active_resource_pack: default_resource_pack(),
        }
    }
}

impl Settings {
    /// Loads `path`, migrating any missing action bindings to their
    /// defaults. On a parse failure, logs a warning, falls back to
    /// defaults, and immediately persists them.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                let settings = Self::default();
                settings.save(path);
                return settings;
            }
        };

        let mut settings: Settings = match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("settings.json failed to parse ({e}); replacing with defaults");
                let settings = Self::default();
                settings.save(path);
                return settings;
            }
        };

        let migrated = settings.migrate_bindings();
        if migrated || settings.version != CURRENT_VERSION {
            settings.version = CURRENT_VERSION;
            settings.save(path);
        }
        settings
    }

    /// Fills in any action missing from `bindings` with its default.
    /// Returns `true` if anything was added.
    fn migrate_bindings(&mut self) -> bool {
        let mut changed = false;
        for (action, binding) in default_bindings() {
            self.bindings.entry(action).or_insert_with(|| {
                changed = true;
                binding
            });
        }
        changed
    }

    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(text) => {
                if let Err(e) = std::fs::write(path, text) {
                    log::warn!("failed to write settings.json: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialize settings: {e}"),
        }
    }
}
