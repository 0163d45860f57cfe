use crate::monitor::Rect;
use crate::selection::event::Point;
use crate::selection::resolver::Orientation;
use crate::settings::ToolbarSize;

/// Place a toolbar of `size * zoom_factor` next to `anchor` and clamp it into
/// `work_area`.
///
/// The result never leaves the work area as long as the toolbar fits in it.
/// A toolbar wider (or taller) than the work area is pinned to its left (or
/// top) edge.
pub fn compute_bounds(
    anchor: Point,
    orientation: Orientation,
    size: ToolbarSize,
    zoom_factor: f64,
    work_area: Rect,
) -> Rect {
    let width = (size.width * zoom_factor).round() as i32;
    let height = (size.height * zoom_factor).round() as i32;
    let (w, h) = (f64::from(width), f64::from(height));

    let (x, y) = match orientation {
        Orientation::TopLeft => (anchor.x - w, anchor.y - h),
        Orientation::TopRight => (anchor.x, anchor.y - h),
        Orientation::TopMiddle => (anchor.x - w / 2.0, anchor.y - h),
        Orientation::BottomLeft => (anchor.x - w, anchor.y),
        Orientation::BottomRight => (anchor.x, anchor.y),
        Orientation::BottomMiddle => (anchor.x - w / 2.0, anchor.y),
        Orientation::MiddleLeft => (anchor.x - w, anchor.y - h / 2.0),
        Orientation::MiddleRight => (anchor.x, anchor.y - h / 2.0),
        Orientation::Center => (anchor.x - w / 2.0, anchor.y - h / 2.0),
    };

    Rect::new(
        clamp_axis(x.round() as i32, work_area.x, work_area.width, width),
        clamp_axis(y.round() as i32, work_area.y, work_area.height, height),
        width,
        height,
    )
}

fn clamp_axis(value: i32, start: i32, extent: i32, length: i32) -> i32 {
    let last = i64::from(start) + i64::from(extent) - i64::from(length);
    // Bounded by `value` above and `start` below, so it fits back into i32.
    i64::from(value).min(last).max(i64::from(start)) as i32
}
