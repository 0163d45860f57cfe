pub mod clipboard;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod selection;
pub mod settings;

pub use error::ToolbarError;
pub use selection::{SelectionService, ServiceStatus};
pub use settings::{FilterConfig, FilterMode, SharedConfig, ToolbarGeometry, TriggerMode};
