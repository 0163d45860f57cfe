use crate::selection::event::Point;

/// Integer rectangle in screen space. Used for display work areas and for
/// the overlay bounds handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(self, point: Point) -> bool {
        point.x >= f64::from(self.x)
            && point.x < f64::from(self.right())
            && point.y >= f64::from(self.y)
            && point.y < f64::from(self.bottom())
    }

    fn distance_sq(self, point: Point) -> f64 {
        let dx = if point.x < f64::from(self.x) {
            f64::from(self.x) - point.x
        } else if point.x >= f64::from(self.right()) {
            point.x - f64::from(self.right().saturating_sub(1))
        } else {
            0.0
        };
        let dy = if point.y < f64::from(self.y) {
            f64::from(self.y) - point.y
        } else if point.y >= f64::from(self.bottom()) {
            point.y - f64::from(self.bottom().saturating_sub(1))
        } else {
            0.0
        };
        dx * dx + dy * dy
    }
}

/// Pick the work area containing `point`, or the nearest one when the point
/// falls between displays.
pub fn select_work_area_for_point(areas: &[Rect], point: Point) -> Option<Rect> {
    areas
        .iter()
        .copied()
        .find(|rect| rect.contains(point))
        .or_else(|| {
            areas.iter().copied().min_by(|a, b| {
                a.distance_sq(point)
                    .partial_cmp(&b.distance_sq(point))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        })
}

/// A display as reported by the OS: full bounds, usable work area and the
/// scale from physical to logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayInfo {
    pub bounds: Rect,
    pub work_area: Rect,
    pub scale: f64,
}

impl DisplayInfo {
    /// Map a physical point on this display into logical units, keeping the
    /// display origin fixed.
    pub fn to_logical(&self, point: Point) -> Point {
        if self.scale <= 0.0 || !self.scale.is_finite() {
            return point;
        }
        let origin_x = f64::from(self.bounds.x);
        let origin_y = f64::from(self.bounds.y);
        Point::new(
            origin_x + (point.x - origin_x) / self.scale,
            origin_y + (point.y - origin_y) / self.scale,
        )
    }

    pub fn logical_work_area(&self) -> Rect {
        if self.scale <= 0.0 || !self.scale.is_finite() {
            return self.work_area;
        }
        let top_left = self.to_logical(Point::new(
            f64::from(self.work_area.x),
            f64::from(self.work_area.y),
        ));
        Rect::new(
            top_left.x.round() as i32,
            top_left.y.round() as i32,
            (f64::from(self.work_area.width) / self.scale).round() as i32,
            (f64::from(self.work_area.height) / self.scale).round() as i32,
        )
    }
}

pub fn select_display_for_point(displays: &[DisplayInfo], point: Point) -> Option<DisplayInfo> {
    let bounds: Vec<Rect> = displays.iter().map(|d| d.bounds).collect();
    let chosen = select_work_area_for_point(&bounds, point)?;
    displays.iter().copied().find(|d| d.bounds == chosen)
}

#[cfg(windows)]
pub(crate) fn resolve_cursor_position() -> Option<Point> {
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

    let mut point = POINT::default();
    if unsafe { GetCursorPos(&mut point) }.is_ok() {
        Some(Point::new(f64::from(point.x), f64::from(point.y)))
    } else {
        None
    }
}

#[cfg(windows)]
pub(crate) fn enumerate_displays() -> Vec<DisplayInfo> {
    use std::mem;
    use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
    use windows::Win32::Graphics::Gdi::{
        EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFOEXW,
    };
    use windows::Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI};

    fn rect_from(rc: RECT) -> Rect {
        Rect::new(rc.left, rc.top, rc.right - rc.left, rc.bottom - rc.top)
    }

    extern "system" fn monitor_enum_proc(
        monitor: HMONITOR,
        _hdc: HDC,
        _rc_clip: *mut RECT,
        data: LPARAM,
    ) -> BOOL {
        let displays = unsafe { &mut *(data.0 as *mut Vec<DisplayInfo>) };
        let mut info = MONITORINFOEXW::default();
        info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
        let info_ptr = &mut info.monitorInfo as *mut _ as *mut _;
        if unsafe { GetMonitorInfoW(monitor, info_ptr) }.as_bool() {
            let mut dpi_x = 96u32;
            let mut dpi_y = 96u32;
            let dpi =
                unsafe { GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y) };
            let scale = if dpi.is_ok() {
                f64::from(dpi_x) / 96.0
            } else {
                1.0
            };
            displays.push(DisplayInfo {
                bounds: rect_from(info.monitorInfo.rcMonitor),
                work_area: rect_from(info.monitorInfo.rcWork),
                scale,
            });
        }
        BOOL(1)
    }

    let mut displays = Vec::new();
    unsafe {
        let _ = EnumDisplayMonitors(
            HDC::default(),
            None,
            Some(monitor_enum_proc),
            LPARAM(&mut displays as *mut Vec<DisplayInfo> as isize),
        );
    }
    displays
}
