//! Display preferences and their persistence.
//!
//! The blob is stored as camelCase JSON (`{"nodeSize": 6, "showIds": false,
//! ...}`). Loading is best effort and per field: a missing or mistyped field
//! keeps its default while the valid ones are still restored.

use crate::config::VizConfig;
use crate::error::{VizError, VizResult};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacketStyle {
    /// Square marker travelling from source to each destination.
    Packet,
    /// Ring expanding from the source up to the communication radius.
    #[default]
    Wave,
}

impl PacketStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "packet" => Some(PacketStyle::Packet),
            "wave" => Some(PacketStyle::Wave),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Node radius in screen pixels.
    pub node_size: f64,
    pub show_ids: bool,
    pub show_graph: bool,
    pub show_sprites: bool,
    pub show_trails: bool,
    pub packet_style: PacketStyle,
    pub trail_alpha: f64,
    pub trail_width: f64,
    pub trail_fade: bool,
    /// Minimum on-screen distance between kept trail points.
    pub trail_min_screen_step: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            node_size: 6.0,
            show_ids: false,
            show_graph: false,
            show_sprites: false,
            show_trails: false,
            packet_style: PacketStyle::Wave,
            trail_alpha: 0.6,
            trail_width: 2.0,
            trail_fade: true,
            trail_min_screen_step: 2.0,
        }
    }
}

/// One user-initiated preference edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrefChange {
    ShowIds(bool),
    ShowGraph(bool),
    ShowSprites(bool),
    ShowTrails(bool),
    PacketStyle(PacketStyle),
    GrowNodes,
    ShrinkNodes,
    ResetNodeSize,
}

/// Allowed node sizes and the reset value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSizeLimits {
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for NodeSizeLimits {
    fn default() -> Self {
        Self {
            default: 6.0,
            min: 2.0,
            max: 24.0,
        }
    }
}

impl From<&VizConfig> for NodeSizeLimits {
    fn from(config: &VizConfig) -> Self {
        Self {
            default: config.default_node_size,
            min: config.min_node_size,
            max: config.max_node_size,
        }
    }
}

impl Preferences {
    pub fn with_limits(limits: NodeSizeLimits) -> Self {
        Self {
            node_size: limits.default,
            ..Self::default()
        }
    }

    /// Apply one edit; returns whether anything changed.
    pub fn apply(&mut self, change: PrefChange, limits: NodeSizeLimits) -> bool {
        let before = self.clone();
        match change {
            PrefChange::ShowIds(on) => self.show_ids = on,
            PrefChange::ShowGraph(on) => self.show_graph = on,
            PrefChange::ShowSprites(on) => self.show_sprites = on,
            PrefChange::ShowTrails(on) => self.show_trails = on,
            PrefChange::PacketStyle(style) => self.packet_style = style,
            PrefChange::GrowNodes => self.node_size = (self.node_size + 1.0).min(limits.max),
            PrefChange::ShrinkNodes => self.node_size = (self.node_size - 1.0).max(limits.min),
            PrefChange::ResetNodeSize => self.node_size = limits.default,
        }
        *self != before
    }

    pub fn to_json(&self) -> VizResult<String> {
        serde_json::to_string(self).map_err(Into::into)
    }

    /// Restore from a stored blob. Anything unreadable falls back to the
    /// defaults in `base`, field by field.
    pub fn from_stored(raw: &str, base: Preferences, limits: NodeSizeLimits) -> Self {
        let mut prefs = base;
        let Ok(JsonValue::Object(map)) = serde_json::from_str::<JsonValue>(raw) else {
            tracing::debug!("Stored preferences are not a JSON object, using defaults");
            return prefs;
        };
        let number = |key: &str| map.get(key).and_then(JsonValue::as_f64).filter(|v| v.is_finite());
        let flag = |key: &str| map.get(key).and_then(JsonValue::as_bool);

        if let Some(v) = number("nodeSize") {
            prefs.node_size = v.clamp(limits.min, limits.max);
        }
        if let Some(v) = flag("showIds") {
            prefs.show_ids = v;
        }
        if let Some(v) = flag("showGraph") {
            prefs.show_graph = v;
        }
        if let Some(v) = flag("showSprites") {
            prefs.show_sprites = v;
        }
        if let Some(v) = flag("showTrails") {
            prefs.show_trails = v;
        }
        if let Some(style) = map
            .get("packetStyle")
            .and_then(JsonValue::as_str)
            .and_then(PacketStyle::from_name)
        {
            prefs.packet_style = style;
        }
        if let Some(v) = number("trailAlpha") {
            prefs.trail_alpha = v.clamp(0.0, 1.0);
        }
        if let Some(v) = number("trailWidth").filter(|v| *v > 0.0) {
            prefs.trail_width = v;
        }
        if let Some(v) = flag("trailFade") {
            prefs.trail_fade = v;
        }
        if let Some(v) = number("trailMinScreenStep").filter(|v| *v >= 0.0) {
            prefs.trail_min_screen_step = v;
        }
        prefs
    }
}

/// Durable key/value storage for the preference blob.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> VizResult<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> VizResult<()>;
}

/// In-memory store, used when the browser denies access to local storage
/// and by tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    /// A store that rejects every write, like a full or disabled storage.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> VizResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> VizResult<()> {
        if self.read_only {
            return Err(VizError::Storage("store is read-only".to_string()));
        }
        self.insert(key, value);
        Ok(())
    }
}

/// Load preferences from `store`; storage errors and bad blobs yield the
/// defaults.
pub fn load_preferences(store: &dyn PreferenceStore, config: &VizConfig) -> Preferences {
    let limits = NodeSizeLimits::from(config);
    let base = Preferences::with_limits(limits);
    match store.load(&config.storage_key) {
        Ok(Some(raw)) => Preferences::from_stored(&raw, base, limits),
        Ok(None) => base,
        Err(e) => {
            tracing::debug!(error = %e, "Preference storage unavailable");
            base
        }
    }
}

/// Persist `prefs`; failures are logged and otherwise ignored.
pub fn save_preferences(store: &mut dyn PreferenceStore, config: &VizConfig, prefs: &Preferences) {
    let result = prefs
        .to_json()
        .and_then(|blob| store.save(&config.storage_key, &blob));
    if let Err(e) = result {
        tracing::debug!(error = %e, "Failed to persist preferences");
    }
}
