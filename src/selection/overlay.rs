use crate::monitor::Rect;
use crate::selection::event::Point;
use crate::selection::host::OverlayRenderer;
use std::sync::{Arc, Mutex};

/// Everything the renderer needs to display the toolbar for one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowRequest {
    pub bounds: Rect,
    pub text: String,
    pub program: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum OverlayState {
    Absent,
    /// Window is being created; `pending` is shown once it reports ready.
    Loading { pending: Option<ShowRequest> },
    Ready { shown: Option<ShowRequest> },
}

/// The single toolbar overlay. Created lazily on first show and reused.
pub struct OverlayWindow {
    renderer: Box<dyn OverlayRenderer>,
    state: OverlayState,
}

impl OverlayWindow {
    pub fn new(renderer: Box<dyn OverlayRenderer>) -> Self {
        Self {
            renderer,
            state: OverlayState::Absent,
        }
    }

    pub fn show(&mut self, request: ShowRequest) {
        match &mut self.state {
            OverlayState::Absent => {
                if let Err(err) = self.renderer.create() {
                    tracing::error!(?err, "failed to create selection toolbar overlay");
                    return;
                }
                tracing::debug!("selection toolbar overlay loading");
                self.state = OverlayState::Loading {
                    pending: Some(request),
                };
            }
            OverlayState::Loading { pending } => {
                *pending = Some(request);
            }
            OverlayState::Ready { shown } => {
                self.renderer
                    .show(request.bounds, &request.text, &request.program);
                *shown = Some(request);
            }
        }
    }

    pub fn hide(&mut self) {
        match &mut self.state {
            OverlayState::Absent => {}
            OverlayState::Loading { pending } => {
                *pending = None;
            }
            OverlayState::Ready { shown } => {
                if shown.take().is_some() {
                    self.renderer.hide();
                }
            }
        }
    }

    /// The renderer finished loading; flush the newest pending show.
    pub fn mark_ready(&mut self) {
        let OverlayState::Loading { pending } = &mut self.state else {
            return;
        };
        let pending = pending.take();
        self.state = OverlayState::Ready { shown: None };
        if let Some(request) = pending {
            self.show(request);
        }
    }

    pub fn destroy(&mut self) {
        self.hide();
        if self.state != OverlayState::Absent {
            self.renderer.destroy();
            self.state = OverlayState::Absent;
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, OverlayState::Ready { shown: Some(_) })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, OverlayState::Loading { .. })
    }

    /// Visible or waiting to become visible.
    pub fn is_active(&self) -> bool {
        self.current().is_some()
    }

    /// The request currently on screen, or the one waiting for load.
    pub fn current(&self) -> Option<&ShowRequest> {
        match &self.state {
            OverlayState::Absent => None,
            OverlayState::Loading { pending } => pending.as_ref(),
            OverlayState::Ready { shown } => shown.as_ref(),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.current()
            .map(|request| request.bounds.contains(point))
            .unwrap_or(false)
    }
}

/// Commands a [`RecordingOverlay`] has received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayCommand {
    Create,
    Show(ShowRequest),
    Hide,
    Destroy,
}

/// Renderer that records commands instead of drawing. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingOverlay {
    commands: Arc<Mutex<Vec<OverlayCommand>>>,
}

impl RecordingOverlay {
    pub fn commands(&self) -> Vec<OverlayCommand> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn take_commands(&self) -> Vec<OverlayCommand> {
        self.commands
            .lock()
            .map(|mut c| std::mem::take(&mut *c))
            .unwrap_or_default()
    }

    fn record(&self, command: OverlayCommand) {
        if let Ok(mut guard) = self.commands.lock() {
            guard.push(command);
        }
    }
}

impl OverlayRenderer for RecordingOverlay {
    fn create(&mut self) -> anyhow::Result<()> {
        self.record(OverlayCommand::Create);
        Ok(())
    }

    fn show(&mut self, bounds: Rect, text: &str, program: &str) {
        self.record(OverlayCommand::Show(ShowRequest {
            bounds,
            text: text.to_string(),
            program: program.to_string(),
        }));
    }

    fn hide(&mut self) {
        self.record(OverlayCommand::Hide);
    }

    fn destroy(&mut self) {
        self.record(OverlayCommand::Destroy);
    }
}
