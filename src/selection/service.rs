use crate::error::ToolbarError;
use crate::selection::bounds::compute_bounds;
use crate::selection::event::{
    is_tracked_modifier, HookEvent, KeyEvent, MouseEvent, SelectionEvent,
};
use crate::selection::filter;
use crate::selection::gesture::{GestureDetector, GestureOutcome};
use crate::selection::host::{OverlayRenderer, SelectionHook, WindowingHost};
use crate::selection::listeners::ListenerSet;
use crate::selection::overlay::{OverlayWindow, ShowRequest};
use crate::selection::resolver;
use crate::selection::state::{can_transition, ServiceLifecycle};
use crate::settings::{FilterConfig, SharedConfig, ToolbarSize, TriggerMode};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatus {
    pub lifecycle: ServiceLifecycle,
    pub trigger_mode: TriggerMode,
    pub overlay_visible: bool,
    pub hook_installed: bool,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "selection toolbar {} (trigger: {}, hook: {}, overlay: {})",
            self.lifecycle,
            self.trigger_mode,
            if self.hook_installed { "installed" } else { "not installed" },
            if self.overlay_visible { "visible" } else { "hidden" },
        )
    }
}

struct Attachment {
    mode: TriggerMode,
    listeners: ListenerSet,
    events: Receiver<HookEvent>,
}

/// Turns the global hook's event stream into overlay show/hide commands.
///
/// Owns the hook, the overlay and the gesture detector. Every event is
/// handled to completion before the next one, on the thread that calls
/// [`SelectionService::pump`] or [`SelectionService::handle_event`].
pub struct SelectionService {
    hook: Box<dyn SelectionHook>,
    host: Arc<dyn WindowingHost>,
    overlay: OverlayWindow,
    config: SharedConfig,
    gesture: GestureDetector,
    lifecycle: ServiceLifecycle,
    attachment: Option<Attachment>,
    capability_lost: bool,
    released: bool,
}

impl SelectionService {
    pub fn new(
        hook: Box<dyn SelectionHook>,
        host: Arc<dyn WindowingHost>,
        renderer: Box<dyn OverlayRenderer>,
    ) -> Self {
        Self::with_config(hook, host, renderer, SharedConfig::default())
    }

    pub fn with_config(
        hook: Box<dyn SelectionHook>,
        host: Arc<dyn WindowingHost>,
        renderer: Box<dyn OverlayRenderer>,
        config: SharedConfig,
    ) -> Self {
        Self {
            hook,
            host,
            overlay: OverlayWindow::new(renderer),
            config,
            gesture: GestureDetector::new(),
            lifecycle: ServiceLifecycle::Stopped,
            attachment: None,
            capability_lost: false,
            released: false,
        }
    }

    /// Handle for the host's settings loader. Writes through it take effect
    /// from the next event on.
    pub fn config(&self) -> SharedConfig {
        self.config.clone()
    }

    pub fn lifecycle(&self) -> ServiceLifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    pub fn is_overlay_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    pub fn overlay(&self) -> &OverlayWindow {
        &self.overlay
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            lifecycle: self.lifecycle,
            trigger_mode: self.config.filter().trigger_mode,
            overlay_visible: self.overlay.is_visible(),
            hook_installed: self.hook.is_installed(),
        }
    }

    pub fn start(&mut self) -> Result<(), ToolbarError> {
        if self.lifecycle != ServiceLifecycle::Stopped {
            return Err(ToolbarError::AlreadyRunning);
        }
        if self.capability_lost || self.released {
            return Err(ToolbarError::CapabilityUnavailable);
        }
        if !self.hook.is_supported() {
            tracing::warn!("global selection hook unavailable; selection toolbar disabled");
            self.capability_lost = true;
            return Err(ToolbarError::CapabilityUnavailable);
        }

        self.transition(ServiceLifecycle::Starting);
        let mode = self.config.filter().trigger_mode;
        if let Err(err) = self.attach(mode) {
            self.transition(ServiceLifecycle::Stopped);
            return Err(err);
        }
        self.transition(ServiceLifecycle::Running);
        tracing::info!(%mode, "selection service started");
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.lifecycle == ServiceLifecycle::Stopped {
            self.overlay.hide();
            return;
        }

        self.transition(ServiceLifecycle::Stopping);
        self.detach();
        self.overlay.hide();
        self.transition(ServiceLifecycle::Stopped);
        tracing::info!("selection service stopped");
    }

    /// Stop, tear down the overlay and release the native hook. Safe to call
    /// from an exit handler; never panics.
    pub fn quit(&mut self) {
        if self.released {
            return;
        }
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.stop();
            self.overlay.destroy();
            self.hook.release();
        }));
        self.released = true;
        if let Err(payload) = result {
            let message = if let Some(message) = payload.downcast_ref::<&str>() {
                (*message).to_string()
            } else if let Some(message) = payload.downcast_ref::<String>() {
                message.clone()
            } else {
                "unknown panic payload".to_string()
            };
            tracing::error!(panic = %message, "selection service panicked during quit");
        }
    }

    /// Replace the filter configuration. A trigger mode change while running
    /// reattaches the hook with the new listener set.
    pub fn update_config(&mut self, config: FilterConfig) {
        let config = config.normalized();
        let mode = config.trigger_mode;
        self.config.replace_filter(config);
        tracing::debug!(%mode, "selection filter config replaced");
        self.sync_listeners();
    }

    pub fn set_toolbar_size(&self, width: f64, height: f64) {
        let size = ToolbarSize::new(width, height);
        if !size.is_valid() {
            tracing::debug!(width, height, "ignoring invalid toolbar size");
            return;
        }
        self.config.update_geometry(|geometry| geometry.size = size);
    }

    pub fn set_zoom_factor(&self, zoom_factor: f64) {
        if !zoom_factor.is_finite() || zoom_factor <= 0.0 {
            tracing::debug!(zoom_factor, "ignoring invalid zoom factor");
            return;
        }
        self.config
            .update_geometry(|geometry| geometry.zoom_factor = zoom_factor);
    }

    /// Copy `text` through the native hook. An error means the caller should
    /// fall back to a generic clipboard.
    pub fn write_to_clipboard(&self, text: &str) -> Result<(), ToolbarError> {
        if !self.is_running() {
            return Err(ToolbarError::NotRunning);
        }
        if self.hook.write_clipboard(text) {
            Ok(())
        } else {
            tracing::warn!("native clipboard write failed");
            Err(ToolbarError::ClipboardWriteFailure)
        }
    }

    /// Entry point for the host's global shortcut in `shortcut` mode.
    pub fn trigger_shortcut(&mut self) {
        if !self.is_running() {
            return;
        }
        if self.attachment.as_ref().map(|a| a.mode) != Some(TriggerMode::Shortcut) {
            tracing::debug!("shortcut ignored outside shortcut trigger mode");
            return;
        }
        self.show_current_selection();
    }

    /// The renderer finished loading the overlay content.
    pub fn overlay_ready(&mut self) {
        self.overlay.mark_ready();
    }

    pub fn hide_overlay(&mut self) {
        self.overlay.hide();
    }

    /// Process every event the hook has queued. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        self.sync_listeners();
        let mut handled = 0;
        while let Some(event) = self.next_event() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Like [`SelectionService::pump`], but waits up to `timeout` for the
    /// first event.
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        self.sync_listeners();
        let first = match &self.attachment {
            Some(attachment) => match attachment.events.recv_timeout(timeout) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => return 0,
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::warn!("selection hook event channel closed");
                    return 0;
                }
            },
            None => return 0,
        };
        self.handle_event(first);
        1 + self.pump()
    }

    pub fn handle_event(&mut self, event: HookEvent) {
        self.sync_listeners();
        if !self.is_running() {
            return;
        }
        let Some((mode, listeners)) = self.attachment.as_ref().map(|a| (a.mode, a.listeners))
        else {
            return;
        };
        if !listeners.accepts(&event) {
            return;
        }

        match event {
            HookEvent::Selection(selection) => {
                // Passive hooks only answer polls; a pushed selection has not
                // passed the gesture or shortcut gate.
                if listeners.passive {
                    tracing::debug!(%mode, "ignoring pushed selection in passive trigger mode");
                    return;
                }
                self.show_selection(selection);
            }
            HookEvent::MouseDown(mouse) => self.dismiss_on_mouse_down(mouse),
            HookEvent::MouseWheel(_) => self.dismiss("wheel"),
            HookEvent::KeyDown(key) => self.on_key_down(key, listeners),
            HookEvent::KeyUp(key) => {
                if listeners.gesture {
                    self.gesture.on_key_up(key);
                }
            }
        }
    }

    fn on_key_down(&mut self, key: KeyEvent, listeners: ListenerSet) {
        if !is_tracked_modifier(key.vk_code) {
            self.dismiss("key");
        }
        if listeners.gesture && self.gesture.on_key_down(key) == GestureOutcome::Fired {
            tracing::debug!("control key gesture fired");
            self.show_current_selection();
        }
    }

    fn dismiss_on_mouse_down(&mut self, mouse: MouseEvent) {
        if !self.overlay.is_active() {
            return;
        }
        let point = self.host.screen_to_logical(mouse.point);
        if !self.overlay.contains(point) {
            self.dismiss("outside click");
        }
    }

    fn dismiss(&mut self, reason: &'static str) {
        if self.overlay.is_active() {
            tracing::debug!(reason, "hiding selection toolbar");
            self.overlay.hide();
        }
    }

    fn show_current_selection(&mut self) {
        match self.hook.current_selection() {
            Some(selection) => self.show_selection(selection),
            None => tracing::debug!("no current selection to show"),
        }
    }

    fn show_selection(&mut self, selection: SelectionEvent) {
        if selection.text.trim().is_empty() {
            return;
        }
        let config = self.config.filter();
        let attached = self.attachment.as_ref().map(|a| a.mode);
        if attached != Some(config.trigger_mode) {
            tracing::debug!(
                mode = %config.trigger_mode,
                "trigger mode changed while handling selection; dropping it"
            );
            return;
        }
        if !filter::accept(&selection, &config) {
            tracing::debug!(program = %selection.program_name, "selection rejected by filter");
            return;
        }
        match self.place(selection) {
            Some(request) => self.overlay.show(request),
            None => self.overlay.hide(),
        }
    }

    fn place(&self, selection: SelectionEvent) -> Option<ShowRequest> {
        let geometry = self.config.geometry();
        let host = &self.host;
        let Some(anchor) = resolver::resolve(
            &selection,
            geometry.padding,
            geometry.zoom_factor,
            || host.cursor_position(),
        ) else {
            tracing::debug!(
                level = ?selection.position_level,
                program = %selection.program_name,
                "selection event lacks geometry for its position level"
            );
            return None;
        };

        let point = host.screen_to_logical(anchor.point);
        let Some(work_area) = host.work_area_for_point(point) else {
            tracing::warn!(
                x = point.x,
                y = point.y,
                "no display work area for toolbar anchor"
            );
            return None;
        };
        let bounds = compute_bounds(
            point,
            anchor.orientation,
            geometry.size,
            geometry.zoom_factor,
            work_area,
        );
        Some(ShowRequest {
            bounds,
            text: selection.text,
            program: selection.program_name,
        })
    }

    fn next_event(&self) -> Option<HookEvent> {
        self.attachment
            .as_ref()
            .and_then(|attachment| attachment.events.try_recv().ok())
    }

    fn sync_listeners(&mut self) {
        if !self.is_running() {
            return;
        }
        let mode = self.config.filter().trigger_mode;
        if self.attachment.as_ref().map(|a| a.mode) == Some(mode) {
            return;
        }

        tracing::info!(%mode, "trigger mode changed; reattaching selection hook");
        self.overlay.hide();
        self.detach();
        if self.attach(mode).is_err() {
            self.transition(ServiceLifecycle::Stopping);
            self.transition(ServiceLifecycle::Stopped);
        }
    }

    fn attach(&mut self, mode: TriggerMode) -> Result<(), ToolbarError> {
        let listeners = ListenerSet::for_mode(mode);
        let (sender, events) = mpsc::channel();
        if let Err(err) = self.hook.install(sender, listeners) {
            tracing::error!(?err, "failed to install selection hook");
            return Err(ToolbarError::HookStartFailure(format!("{err:#}")));
        }
        self.gesture.reset();
        self.attachment = Some(Attachment {
            mode,
            listeners,
            events,
        });
        Ok(())
    }

    fn detach(&mut self) {
        if self.attachment.take().is_some() || self.hook.is_installed() {
            if let Err(err) = self.hook.uninstall() {
                tracing::error!(?err, "failed to uninstall selection hook");
            }
        }
        self.gesture.reset();
    }

    fn transition(&mut self, next: ServiceLifecycle) {
        if !can_transition(self.lifecycle, next) {
            tracing::error!(
                from = %self.lifecycle,
                to = %next,
                "invalid selection service transition"
            );
            return;
        }
        self.lifecycle = next;
    }
}

impl Drop for SelectionService {
    fn drop(&mut self) {
        self.quit();
    }
}
