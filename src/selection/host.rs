use crate::monitor::{self, Rect};
use crate::selection::event::{HookEvent, Point, SelectionEvent};
use crate::selection::listeners::ListenerSet;
use anyhow::anyhow;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

/// Display geometry services of the windowing host.
pub trait WindowingHost: Send + Sync {
    /// Convert a physical screen point into the coordinate space overlay
    /// bounds are expressed in.
    fn screen_to_logical(&self, point: Point) -> Point;
    fn cursor_position(&self) -> Option<Point>;
    /// Usable area of the display nearest to `point`, in the same space as
    /// [`WindowingHost::screen_to_logical`] returns.
    fn work_area_for_point(&self, point: Point) -> Option<Rect>;
}

/// The OS-level selection hook.
///
/// `install` must forward every event kind in `listeners` through `sender`
/// serially, in arrival order.
pub trait SelectionHook: Send {
    fn is_supported(&self) -> bool;
    fn install(&mut self, sender: Sender<HookEvent>, listeners: ListenerSet) -> anyhow::Result<()>;
    fn uninstall(&mut self) -> anyhow::Result<()>;
    fn is_installed(&self) -> bool;
    fn current_selection(&self) -> Option<SelectionEvent>;
    fn write_clipboard(&self, text: &str) -> bool;
    /// Free the native resource for good. Called once on quit.
    fn release(&mut self) {}
}

/// The renderer owning the actual overlay surface.
pub trait OverlayRenderer: Send {
    /// Start creating the overlay surface. Completion is reported back through
    /// [`crate::selection::SelectionService::overlay_ready`].
    fn create(&mut self) -> anyhow::Result<()>;
    fn show(&mut self, bounds: Rect, text: &str, program: &str);
    fn hide(&mut self);
    fn destroy(&mut self) {}
}

/// Hook used when the host has no native selection hook to offer.
#[derive(Debug, Default)]
pub struct UnsupportedSelectionHook;

impl SelectionHook for UnsupportedSelectionHook {
    fn is_supported(&self) -> bool {
        false
    }

    fn install(
        &mut self,
        _sender: Sender<HookEvent>,
        _listeners: ListenerSet,
    ) -> anyhow::Result<()> {
        Err(anyhow!("selection hooks are not supported on this platform"))
    }

    fn uninstall(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn is_installed(&self) -> bool {
        false
    }

    fn current_selection(&self) -> Option<SelectionEvent> {
        None
    }

    fn write_clipboard(&self, _text: &str) -> bool {
        false
    }
}

/// Windowing host backed by the OS monitor APIs.
#[derive(Debug, Default)]
pub struct DefaultWindowingHost;

#[cfg(windows)]
impl WindowingHost for DefaultWindowingHost {
    fn screen_to_logical(&self, point: Point) -> Point {
        let displays = monitor::enumerate_displays();
        match monitor::select_display_for_point(&displays, point) {
            Some(display) => display.to_logical(point),
            None => point,
        }
    }

    fn cursor_position(&self) -> Option<Point> {
        monitor::resolve_cursor_position()
    }

    fn work_area_for_point(&self, point: Point) -> Option<Rect> {
        let areas: Vec<Rect> = monitor::enumerate_displays()
            .iter()
            .map(|display| display.logical_work_area())
            .collect();
        monitor::select_work_area_for_point(&areas, point)
    }
}

#[cfg(not(windows))]
impl WindowingHost for DefaultWindowingHost {
    fn screen_to_logical(&self, point: Point) -> Point {
        point
    }

    fn cursor_position(&self) -> Option<Point> {
        None
    }

    fn work_area_for_point(&self, _point: Point) -> Option<Rect> {
        None
    }
}

/// Windowing host over a fixed display layout. Physical and logical
/// coordinates coincide.
#[derive(Debug, Clone, Default)]
pub struct StaticWindowingHost {
    pub work_areas: Vec<Rect>,
    pub cursor: Option<Point>,
}

impl StaticWindowingHost {
    pub fn new(work_areas: Vec<Rect>) -> Self {
        Self {
            work_areas,
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, cursor: impl Into<Point>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl WindowingHost for StaticWindowingHost {
    fn screen_to_logical(&self, point: Point) -> Point {
        point
    }

    fn cursor_position(&self) -> Option<Point> {
        self.cursor
    }

    fn work_area_for_point(&self, point: Point) -> Option<Rect> {
        monitor::select_work_area_for_point(&self.work_areas, point)
    }
}

/// In-process hook for tests and host integration checks.
#[derive(Clone)]
pub struct MockSelectionHook {
    state: Arc<MockHookState>,
}

struct MockHookState {
    supported: AtomicBool,
    fail_install: AtomicBool,
    clipboard_ok: AtomicBool,
    install_count: AtomicUsize,
    uninstall_count: AtomicUsize,
    release_count: AtomicUsize,
    sender: Mutex<Option<Sender<HookEvent>>>,
    listeners: Mutex<Option<ListenerSet>>,
    current: Mutex<Option<SelectionEvent>>,
    clipboard: Mutex<Vec<String>>,
}

impl MockSelectionHook {
    pub fn new() -> (Self, MockHookHandle) {
        let state = Arc::new(MockHookState {
            supported: AtomicBool::new(true),
            fail_install: AtomicBool::new(false),
            clipboard_ok: AtomicBool::new(true),
            install_count: AtomicUsize::new(0),
            uninstall_count: AtomicUsize::new(0),
            release_count: AtomicUsize::new(0),
            sender: Mutex::new(None),
            listeners: Mutex::new(None),
            current: Mutex::new(None),
            clipboard: Mutex::new(Vec::new()),
        });
        (
            Self {
                state: Arc::clone(&state),
            },
            MockHookHandle { state },
        )
    }
}

impl SelectionHook for MockSelectionHook {
    fn is_supported(&self) -> bool {
        self.state.supported.load(Ordering::SeqCst)
    }

    fn install(&mut self, sender: Sender<HookEvent>, listeners: ListenerSet) -> anyhow::Result<()> {
        if self.state.fail_install.load(Ordering::SeqCst) {
            return Err(anyhow!("mock hook refused to install"));
        }
        let mut guard = self.state.sender.lock().map_err(|_| anyhow!("lock"))?;
        if guard.is_none() {
            self.state.install_count.fetch_add(1, Ordering::SeqCst);
        }
        *guard = Some(sender);
        if let Ok(mut attached) = self.state.listeners.lock() {
            *attached = Some(listeners);
        }
        Ok(())
    }

    fn uninstall(&mut self) -> anyhow::Result<()> {
        let mut guard = self.state.sender.lock().map_err(|_| anyhow!("lock"))?;
        if guard.take().is_some() {
            self.state.uninstall_count.fetch_add(1, Ordering::SeqCst);
        }
        if let Ok(mut attached) = self.state.listeners.lock() {
            *attached = None;
        }
        Ok(())
    }

    fn is_installed(&self) -> bool {
        self.state
            .sender
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    fn current_selection(&self) -> Option<SelectionEvent> {
        self.state.current.lock().ok().and_then(|c| c.clone())
    }

    fn write_clipboard(&self, text: &str) -> bool {
        if !self.state.clipboard_ok.load(Ordering::SeqCst) {
            return false;
        }
        if let Ok(mut writes) = self.state.clipboard.lock() {
            writes.push(text.to_string());
        }
        true
    }

    fn release(&mut self) {
        self.state.release_count.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockHookHandle {
    state: Arc<MockHookState>,
}

impl MockHookHandle {
    pub fn set_supported(&self, supported: bool) {
        self.state.supported.store(supported, Ordering::SeqCst);
    }

    pub fn set_fail_install(&self, fail: bool) {
        self.state.fail_install.store(fail, Ordering::SeqCst);
    }

    pub fn set_clipboard_ok(&self, ok: bool) {
        self.state.clipboard_ok.store(ok, Ordering::SeqCst);
    }

    pub fn set_current_selection(&self, selection: Option<SelectionEvent>) {
        if let Ok(mut current) = self.state.current.lock() {
            *current = selection;
        }
    }

    pub fn install_count(&self) -> usize {
        self.state.install_count.load(Ordering::SeqCst)
    }

    pub fn uninstall_count(&self) -> usize {
        self.state.uninstall_count.load(Ordering::SeqCst)
    }

    pub fn release_count(&self) -> usize {
        self.state.release_count.load(Ordering::SeqCst)
    }

    pub fn listeners(&self) -> Option<ListenerSet> {
        self.state.listeners.lock().ok().and_then(|l| *l)
    }

    pub fn clipboard_writes(&self) -> Vec<String> {
        self.state
            .clipboard
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    /// Push an event as the native hook would. Returns `false` when no hook
    /// is installed.
    pub fn emit(&self, event: HookEvent) -> bool {
        match self.state.sender.lock() {
            Ok(guard) => guard
                .as_ref()
                .map(|sender| sender.send(event).is_ok())
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}
