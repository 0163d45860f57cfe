pub mod bounds;
pub mod event;
pub mod filter;
pub mod gesture;
pub mod host;
pub mod listeners;
mod overlay;
pub mod resolver;
mod service;
pub mod state;

pub use bounds::compute_bounds;
pub use event::{
    HookEvent, KeyEvent, MouseButton, MouseEvent, Point, PositionLevel, SelectionEvent,
    WheelEvent,
};
pub use gesture::{GestureDetector, GestureOutcome, GestureState, GESTURE_WINDOW};
pub use host::{
    DefaultWindowingHost, MockHookHandle, MockSelectionHook, OverlayRenderer, SelectionHook,
    StaticWindowingHost, UnsupportedSelectionHook, WindowingHost,
};
pub use listeners::{Listener, ListenerSet};
pub use overlay::{OverlayCommand, OverlayWindow, RecordingOverlay, ShowRequest};
pub use resolver::{resolve, AnchorResolution, Orientation};
pub use service::{SelectionService, ServiceStatus};
pub use state::ServiceLifecycle;
