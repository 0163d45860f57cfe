use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

/// Anchor padding used when the host does not configure one, in device pixels.
pub const DEFAULT_ANCHOR_PADDING: f64 = 10.0;
pub const DEFAULT_TOOLBAR_WIDTH: f64 = 350.0;
pub const DEFAULT_TOOLBAR_HEIGHT: f64 = 43.0;

/// Activation policy for the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TriggerMode {
    /// Show on every selection the hook reports.
    #[default]
    Selected,
    /// Show when the control key gesture fires.
    CtrlKey,
    /// Show when the host's global shortcut fires.
    Shortcut,
}

impl std::fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerMode::Selected => write!(f, "selected"),
            TriggerMode::CtrlKey => write!(f, "ctrlKey"),
            TriggerMode::Shortcut => write!(f, "shortcut"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Blacklist,
    Whitelist,
}

/// Which foreground programs may raise the toolbar, and how it is triggered.
///
/// All program names and list entries are expected in lowercase; use
/// [`FilterConfig::normalized`] on values coming from user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    /// Programs that never raise the toolbar, matched exactly.
    pub blacklist: BTreeSet<String>,
    pub filter_mode: FilterMode,
    /// Substrings matched against the program name according to `filter_mode`.
    pub filter_list: Vec<String>,
    pub trigger_mode: TriggerMode,
}

impl FilterConfig {
    /// Parse the toolbar section of a host settings blob.
    pub fn from_value(value: &serde_json::Value) -> anyhow::Result<Self> {
        let config: FilterConfig = serde_json::from_value(value.clone())
            .context("deserialize selection toolbar filter settings")?;
        Ok(config.normalized())
    }

    /// Lowercase and trim every entry, dropping the ones left empty.
    pub fn normalized(mut self) -> Self {
        self.blacklist = self
            .blacklist
            .iter()
            .filter_map(|entry| normalize_entry(entry))
            .collect();
        self.filter_list = self
            .filter_list
            .iter()
            .filter_map(|entry| normalize_entry(entry))
            .collect();
        self
    }
}

fn normalize_entry(entry: &str) -> Option<String> {
    let trimmed = entry.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Toolbar size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolbarSize {
    pub width: f64,
    pub height: f64,
}

impl ToolbarSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Geometry inputs that persist across events and change on explicit reports
/// from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolbarGeometry {
    pub size: ToolbarSize,
    pub zoom_factor: f64,
    /// Gap between the selection and the toolbar, in device pixels before zoom.
    pub padding: f64,
}

impl Default for ToolbarGeometry {
    fn default() -> Self {
        Self {
            size: ToolbarSize::new(DEFAULT_TOOLBAR_WIDTH, DEFAULT_TOOLBAR_HEIGHT),
            zoom_factor: 1.0,
            padding: DEFAULT_ANCHOR_PADDING,
        }
    }
}

struct SharedConfigInner {
    filter: RwLock<Arc<FilterConfig>>,
    geometry: RwLock<ToolbarGeometry>,
}

/// Configuration shared between the host's settings loader and the event path.
///
/// Every write swaps in a whole value. Readers take a snapshot per event.
#[derive(Clone)]
pub struct SharedConfig {
    inner: Arc<SharedConfigInner>,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(FilterConfig::default(), ToolbarGeometry::default())
    }
}

impl SharedConfig {
    pub fn new(filter: FilterConfig, geometry: ToolbarGeometry) -> Self {
        Self {
            inner: Arc::new(SharedConfigInner {
                filter: RwLock::new(Arc::new(filter)),
                geometry: RwLock::new(geometry),
            }),
        }
    }

    pub fn filter(&self) -> Arc<FilterConfig> {
        match self.inner.filter.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => {
                tracing::error!("filter config lock poisoned; using last committed value");
                Arc::clone(&poisoned.into_inner())
            }
        }
    }

    /// Swap in a new filter config and return the one it replaced.
    pub fn replace_filter(&self, config: FilterConfig) -> Arc<FilterConfig> {
        let next = Arc::new(config);
        match self.inner.filter.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => {
                tracing::error!("filter config lock poisoned; overwriting");
                std::mem::replace(&mut *poisoned.into_inner(), next)
            }
        }
    }

    pub fn geometry(&self) -> ToolbarGeometry {
        match self.inner.geometry.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn update_geometry<F>(&self, f: F)
    where
        F: FnOnce(&mut ToolbarGeometry),
    {
        let mut guard = match self.inner.geometry.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("toolbar geometry lock poisoned; overwriting");
                poisoned.into_inner()
            }
        };
        let mut next = *guard;
        f(&mut next);
        *guard = next;
    }
}
