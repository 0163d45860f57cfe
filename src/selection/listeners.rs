use crate::selection::event::HookEvent;
use crate::settings::TriggerMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Selection,
    MouseDown,
    MouseWheel,
    KeyDown,
    KeyUp,
}

impl Listener {
    pub fn for_event(event: &HookEvent) -> Self {
        match event {
            HookEvent::Selection(_) => Listener::Selection,
            HookEvent::MouseDown(_) => Listener::MouseDown,
            HookEvent::MouseWheel(_) => Listener::MouseWheel,
            HookEvent::KeyDown(_) => Listener::KeyDown,
            HookEvent::KeyUp(_) => Listener::KeyUp,
        }
    }
}

/// What the hook has to deliver for one trigger mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerSet {
    pub listeners: &'static [Listener],
    /// Feed key events to the gesture detector.
    pub gesture: bool,
    /// The hook only answers `current_selection` polls instead of pushing
    /// every selection.
    pub passive: bool,
}

const SELECTED: ListenerSet = ListenerSet {
    listeners: &[
        Listener::Selection,
        Listener::MouseDown,
        Listener::MouseWheel,
        Listener::KeyDown,
    ],
    gesture: false,
    passive: false,
};

const CTRL_KEY: ListenerSet = ListenerSet {
    listeners: &[
        Listener::Selection,
        Listener::MouseDown,
        Listener::MouseWheel,
        Listener::KeyDown,
        Listener::KeyUp,
    ],
    gesture: true,
    passive: true,
};

const SHORTCUT: ListenerSet = ListenerSet {
    listeners: &[
        Listener::Selection,
        Listener::MouseDown,
        Listener::MouseWheel,
        Listener::KeyDown,
    ],
    gesture: false,
    passive: true,
};

impl ListenerSet {
    pub fn for_mode(mode: TriggerMode) -> Self {
        match mode {
            TriggerMode::Selected => SELECTED,
            TriggerMode::CtrlKey => CTRL_KEY,
            TriggerMode::Shortcut => SHORTCUT,
        }
    }

    pub fn contains(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }

    pub fn accepts(&self, event: &HookEvent) -> bool {
        self.contains(Listener::for_event(event))
    }
}
