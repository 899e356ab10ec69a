//! Coordinate math between board percentages and viewport pixels.
//!
//! Token centres are stored as percentages of the board's width and height so
//! that they stay visually anchored when the board is resized. Pointer input
//! arrives in viewport (client) pixels. Every conversion takes the board's
//! bounding box explicitly; callers query it fresh for each event.

use kurbo::{Point, Rect, Vec2};

/// Smallest token edge length in pixels.
pub const MIN_TOKEN_PX: f64 = 24.0;
/// Largest token edge length in pixels.
pub const MAX_TOKEN_PX: f64 = 600.0;
/// Edge length used for new tokens and for unreadable saved sizes.
pub const DEFAULT_TOKEN_PX: f64 = 52.0;
/// How much of a token must stay on the board while it is dragged off an edge.
pub const MIN_VISIBLE_PX: f64 = 32.0;
/// Rotation snap increment in degrees.
pub const ROTATION_SNAP_DEGREES: f64 = 15.0;

/// A rectangular rendering surface with a queryable bounding box.
///
/// The bounding box may change between events (window resize, layout
/// shifts), so implementations should answer from live layout.
pub trait BoardSurface {
    /// Current bounding box of the board in viewport pixels.
    fn bounds(&self) -> Rect;
}

impl BoardSurface for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Saturating clamp.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Clamp a token edge length to the allowed range.
pub fn clamp_token_size(size: f64) -> f64 {
    if size.is_nan() {
        return DEFAULT_TOKEN_PX;
    }
    clamp(size, MIN_TOKEN_PX, MAX_TOKEN_PX)
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Convert a board percentage position into viewport pixels.
pub fn percent_to_client(rect: Rect, percent: Point) -> Point {
    Point::new(
        rect.x0 + percent.x / 100.0 * rect.width(),
        rect.y0 + percent.y / 100.0 * rect.height(),
    )
}

/// Convert a viewport pixel position into board percentages.
///
/// A degenerate board maps every point to its centre.
pub fn client_to_percent(rect: Rect, client: Point) -> Point {
    let width = rect.width();
    let height = rect.height();
    if width <= 0.0 || height <= 0.0 {
        return Point::new(50.0, 50.0);
    }
    Point::new(
        (client.x - rect.x0) / width * 100.0,
        (client.y - rect.y0) / height * 100.0,
    )
}

/// Compute a token centre (in percent) for a pointer position, keeping at
/// least `min(32, half_size)` pixels of the token on the board.
///
/// The allowed centre range is the board widened on every side by
/// `half_size - min_visible`.
pub fn center_percent_for_pointer(rect: Rect, client: Point, half_size: f64) -> Point {
    let width = rect.width();
    let height = rect.height();
    if width <= 0.0 || height <= 0.0 {
        return Point::new(50.0, 50.0);
    }

    let min_visible = MIN_VISIBLE_PX.min(half_size);
    let slack = half_size - min_visible;

    let x = clamp(client.x - rect.x0, -slack, width + slack);
    let y = clamp(client.y - rect.y0, -slack, height + slack);
    Point::new(x / width * 100.0, y / height * 100.0)
}

/// Snap an angle to the nearest increment.
///
/// The angle is first rounded to whole degrees. No normalisation is applied,
/// so `atan2`-derived input stays within [-180, 180].
pub fn snap_rotation(angle_degrees: f64, increment: f64) -> i32 {
    let whole = round_half_up(angle_degrees);
    (round_half_up(whole / increment) * increment) as i32
}

/// Round to the nearest integer with halves going towards positive
/// infinity, so `-7.5` becomes `-7`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Angle in degrees of the vector from `center` to `point`.
pub fn angle_degrees(center: Point, point: Point) -> f64 {
    let delta: Vec2 = point - center;
    delta.y.atan2(delta.x).to_degrees()
}
