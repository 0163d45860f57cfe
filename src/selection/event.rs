use std::time::Instant;

/// A 2-D point. Device pixels unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_y(self, dy: f64) -> Self {
        Self::new(self.x, self.y + dy)
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<(i32, i32)> for Point {
    fn from(value: (i32, i32)) -> Self {
        Self::new(f64::from(value.0), f64::from(value.1))
    }
}

/// How much geometry a selection event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PositionLevel {
    #[default]
    None,
    MouseSingle,
    MouseDual,
    SelFull,
    SelDetailed,
}

/// One text selection reported by the hook.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionEvent {
    pub text: String,
    /// Lowercased process name of the foreground program.
    pub program_name: String,
    pub position_level: PositionLevel,
    pub mouse_start: Option<Point>,
    pub mouse_end: Option<Point>,
    pub start_top: Option<Point>,
    pub start_bottom: Option<Point>,
    pub end_top: Option<Point>,
    pub end_bottom: Option<Point>,
}

impl SelectionEvent {
    pub fn new(text: impl Into<String>, program_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            program_name: program_name.into().to_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_mouse(mut self, start: impl Into<Point>, end: impl Into<Point>) -> Self {
        self.mouse_start = Some(start.into());
        self.mouse_end = Some(end.into());
        self.position_level = PositionLevel::MouseDual;
        self
    }

    pub fn with_mouse_end(mut self, end: impl Into<Point>) -> Self {
        self.mouse_end = Some(end.into());
        self.position_level = PositionLevel::MouseSingle;
        self
    }

    /// Attach the selection's first and last line corners and mark the event
    /// as [`PositionLevel::SelFull`]. Mouse points set earlier are kept.
    pub fn with_corners(
        mut self,
        start_top: impl Into<Point>,
        start_bottom: impl Into<Point>,
        end_top: impl Into<Point>,
        end_bottom: impl Into<Point>,
    ) -> Self {
        self.start_top = Some(start_top.into());
        self.start_bottom = Some(start_bottom.into());
        self.end_top = Some(end_top.into());
        self.end_bottom = Some(end_bottom.into());
        self.position_level = PositionLevel::SelFull;
        self
    }

    pub fn with_level(mut self, level: PositionLevel) -> Self {
        self.position_level = level;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Screen position in device pixels.
    pub point: Point,
    pub button: MouseButton,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub point: Point,
    pub delta: i32,
}

/// A key transition with the time the hook observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub vk_code: u32,
    pub at: Instant,
}

impl KeyEvent {
    pub fn new(vk_code: u32, at: Instant) -> Self {
        Self { vk_code, at }
    }

    pub fn now(vk_code: u32) -> Self {
        Self::new(vk_code, Instant::now())
    }
}

/// Everything the global hook can deliver, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum HookEvent {
    Selection(SelectionEvent),
    MouseDown(MouseEvent),
    MouseWheel(WheelEvent),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
}

/// Virtual-key codes of the control modifier tracked by the gesture detector
/// and exempt from key-press dismissal.
pub const VK_CONTROL: u32 = 0x11;
pub const VK_LCONTROL: u32 = 0xA2;
pub const VK_RCONTROL: u32 = 0xA3;
pub const TRACKED_MODIFIERS: [u32; 3] = [VK_CONTROL, VK_LCONTROL, VK_RCONTROL];

pub fn is_tracked_modifier(vk_code: u32) -> bool {
    TRACKED_MODIFIERS.contains(&vk_code)
}
