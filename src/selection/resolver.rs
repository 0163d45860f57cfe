use crate::selection::event::{Point, PositionLevel, SelectionEvent};

/// Vertical drag distance, in device pixels, above which a two-point mouse
/// drag counts as mostly vertical.
pub const VERTICAL_DRAG_THRESHOLD: f64 = 14.0;

/// Which side of the anchor the toolbar is drawn on.
///
/// The name describes where the box lies relative to the anchor:
/// `BottomRight` puts the box's top-left corner on the anchor, `TopLeft` puts
/// its bottom-right corner there, and the `Middle`/`Center` variants centre
/// one or both axes on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    TopLeft,
    TopRight,
    TopMiddle,
    BottomLeft,
    BottomRight,
    BottomMiddle,
    MiddleLeft,
    MiddleRight,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorResolution {
    pub point: Point,
    pub orientation: Orientation,
}

impl AnchorResolution {
    fn new(point: Point, orientation: Orientation) -> Self {
        Self { point, orientation }
    }
}

/// Derive the toolbar anchor from the geometry carried by `event`.
///
/// `cursor` is consulted only for events without any geometry. Returns `None`
/// when the fields the declared position level needs are missing.
pub fn resolve<F>(
    event: &SelectionEvent,
    padding: f64,
    zoom_factor: f64,
    cursor: F,
) -> Option<AnchorResolution>
where
    F: FnOnce() -> Option<Point>,
{
    let padding = padding * zoom_factor;

    match event.position_level {
        PositionLevel::None => resolve_from_cursor(cursor, padding),
        PositionLevel::MouseSingle => {
            let end = event.mouse_end?;
            Some(AnchorResolution::new(
                end.offset_y(padding),
                Orientation::BottomMiddle,
            ))
        }
        PositionLevel::MouseDual => resolve_drag(event.mouse_start?, event.mouse_end?, padding),
        PositionLevel::SelFull | PositionLevel::SelDetailed => {
            resolve_selection(event, padding / 3.0)
        }
    }
}

fn resolve_from_cursor<F>(cursor: F, padding: f64) -> Option<AnchorResolution>
where
    F: FnOnce() -> Option<Point>,
{
    let point = cursor()?;
    Some(AnchorResolution::new(
        point.offset_y(padding),
        Orientation::BottomMiddle,
    ))
}

fn resolve_drag(start: Point, end: Point, padding: f64) -> Option<AnchorResolution> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    let resolution = if dy.abs() > VERTICAL_DRAG_THRESHOLD {
        if dy > 0.0 {
            AnchorResolution::new(end.offset_y(padding), Orientation::BottomLeft)
        } else {
            AnchorResolution::new(end.offset_y(-padding), Orientation::TopRight)
        }
    } else if dx > 0.0 {
        AnchorResolution::new(end.offset_y(padding), Orientation::BottomLeft)
    } else {
        AnchorResolution::new(end.offset_y(padding), Orientation::BottomRight)
    };
    Some(resolution)
}

fn resolve_selection(event: &SelectionEvent, padding: f64) -> Option<AnchorResolution> {
    let start_top = event.start_top?;
    let start_bottom = event.start_bottom?;
    let end_top = event.end_top?;
    let end_bottom = event.end_bottom?;
    let mouse_start = event.mouse_start.unwrap_or(Point::ORIGIN);
    let mouse_end = event.mouse_end.unwrap_or(Point::ORIGIN);

    if mouse_start == Point::ORIGIN && mouse_end == Point::ORIGIN {
        return Some(AnchorResolution::new(
            end_bottom.offset_y(padding),
            Orientation::BottomLeft,
        ));
    }

    let single_line = start_top.y == end_top.y && start_bottom.y == end_bottom.y;

    // Double-click: centre under the click, on the line's bottom edge.
    if mouse_start == mouse_end && single_line {
        return Some(AnchorResolution::new(
            Point::new(mouse_end.x, end_bottom.y + padding),
            Orientation::BottomMiddle,
        ));
    }

    let resolution = if single_line {
        if mouse_end.x - mouse_start.x >= 0.0 {
            AnchorResolution::new(end_bottom.offset_y(padding), Orientation::BottomLeft)
        } else {
            AnchorResolution::new(start_bottom.offset_y(padding), Orientation::BottomRight)
        }
    } else if mouse_end.y - mouse_start.y >= 0.0 {
        AnchorResolution::new(end_bottom.offset_y(padding), Orientation::BottomLeft)
    } else {
        AnchorResolution::new(start_top.offset_y(-padding), Orientation::TopRight)
    };
    Some(resolution)
}
