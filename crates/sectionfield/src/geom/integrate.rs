//! Shoelace integration over vertex loops.
//!
//! Raw functions take `&[Point]` so clipped or otherwise unvalidated loops
//! can be integrated; `Polygon` wrappers fold in the weight.
//!
//! Conventions
//! - Loops are implicitly closed (last vertex connects to the first).
//! - Second moments are about the global origin; shifting to a centroid is the
//!   digestor's job (`crate::section`).

use super::types::{Point, Polygon};
use crate::cfg::{AREA_EPS, CLIP_EPS, VERTEX_EPS};

/// Second moments of area `(Ix, Iy, Ixy)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SecondMoments {
    pub ix: f64,
    pub iy: f64,
    pub ixy: f64,
}

/// Signed shoelace area (CCW positive) and area centroid.
///
/// Degenerate loops (|area| < `AREA_EPS`, or fewer than 3 vertices) return
/// `(0, origin)`; callers check the area before using the centroid.
pub fn signed_area_and_centroid(points: &[Point]) -> (f64, Point) {
    let n = points.len();
    if n < 3 {
        return (0.0, Point::origin());
    }
    let mut a = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        let cross = p.x() * q.y() - q.x() * p.y();
        a += cross;
        cx += (p.x() + q.x()) * cross;
        cy += (p.y() + q.y()) * cross;
    }
    a *= 0.5;
    if a.abs() < AREA_EPS {
        return (0.0, Point::origin());
    }
    (a, Point::new(cx / (6.0 * a), cy / (6.0 * a)))
}

/// `|area|·weight` and the (weight-independent) centroid.
pub fn weighted_area_and_centroid(polygon: &Polygon) -> (f64, Point) {
    let (a, c) = signed_area_and_centroid(polygon.vertices());
    (a.abs() * polygon.weight(), c)
}

/// Unweighted second moments of a loop about the origin.
///
/// `Ix`/`Iy` are returned in absolute value; `Ixy` keeps the orientation sign
/// (positive for CCW loops).
pub fn raw_second_moments(points: &[Point]) -> SecondMoments {
    let n = points.len();
    if n < 3 {
        return SecondMoments::default();
    }
    let mut ix = 0.0;
    let mut iy = 0.0;
    let mut ixy = 0.0;
    for i in 0..n {
        let (x0, y0) = (points[i].x(), points[i].y());
        let (x1, y1) = (points[(i + 1) % n].x(), points[(i + 1) % n].y());
        let cross = x0 * y1 - x1 * y0;
        ix += cross * (y0 * y0 + y0 * y1 + y1 * y1);
        iy += cross * (x0 * x0 + x0 * x1 + x1 * x1);
        ixy += cross * (x0 * y1 + 2.0 * x0 * y0 + 2.0 * x1 * y1 + x1 * y0);
    }
    SecondMoments {
        ix: (ix / 12.0).abs(),
        iy: (iy / 12.0).abs(),
        ixy: ixy / 24.0,
    }
}

/// Weighted second moments of a polygon about the global origin.
pub fn inertia_about_origin(polygon: &Polygon) -> SecondMoments {
    let m = raw_second_moments(polygon.vertices());
    let w = polygon.weight();
    SecondMoments {
        ix: m.ix * w,
        iy: m.iy * w,
        ixy: m.ixy * w,
    }
}

#[inline]
fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b.x() - a.x()) * (c.y() - a.y()) - (b.y() - a.y()) * (c.x() - a.x())
}

#[inline]
fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x() >= a.x().min(b.x())
        && p.x() <= a.x().max(b.x())
        && p.y() >= a.y().min(b.y())
        && p.y() <= a.y().max(b.y())
}

/// Closed-segment intersection test via orientation signs.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = orient(p3, p4, p1);
    let d2 = orient(p3, p4, p2);
    let d3 = orient(p1, p2, p3);
    let d4 = orient(p1, p2, p4);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment(p3, p4, p1))
        || (d2 == 0.0 && on_segment(p3, p4, p2))
        || (d3 == 0.0 && on_segment(p1, p2, p3))
        || (d4 == 0.0 && on_segment(p1, p2, p4))
}

/// O(n²) test over all pairs of non-adjacent edges.
///
/// Consecutive duplicate vertices (zero-length edges) are collapsed first.
pub fn self_intersects(points: &[Point]) -> bool {
    let mut loop_pts: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if loop_pts.last().map_or(true, |q| q.distance(p) > VERTEX_EPS) {
            loop_pts.push(*p);
        }
    }
    while loop_pts.len() > 1
        && loop_pts[0].distance(&loop_pts[loop_pts.len() - 1]) <= VERTEX_EPS
    {
        loop_pts.pop();
    }
    let points = loop_pts.as_slice();
    let n = points.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        for j in (i + 2)..n {
            // Edge n-1 closes onto edge 0.
            if i == 0 && j == n - 1 {
                continue;
            }
            let (c, d) = (points[j], points[(j + 1) % n]);
            if segments_intersect(a, b, c, d) {
                return true;
            }
        }
    }
    false
}

/// Portion of a loop on or above the horizontal line `y = y_cut`.
///
/// Sutherland–Hodgman against the single half-plane `y >= y_cut − CLIP_EPS`.
/// Returns `None` when nothing with positive area survives.
pub fn clip_above_line(points: &[Point], y_cut: f64) -> Option<Vec<Point>> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let inside = |p: &Point| p.y() >= y_cut - CLIP_EPS;
    let mut out = Vec::with_capacity(n + 2);
    for i in 0..n {
        let cur = points[i];
        let prev = points[(i + n - 1) % n];
        let (cur_in, prev_in) = (inside(&cur), inside(&prev));
        if cur_in != prev_in {
            let dy = cur.y() - prev.y();
            if dy.abs() > CLIP_EPS {
                let t = (y_cut - prev.y()) / dy;
                out.push(prev.lerp(&cur, t.clamp(0.0, 1.0)));
            }
        }
        if cur_in {
            out.push(cur);
        }
    }
    if out.len() < 3 {
        return None;
    }
    let (a, _) = signed_area_and_centroid(&out);
    if a.abs() < AREA_EPS {
        return None;
    }
    Some(out)
}

/// First moment of a loop's area about the horizontal axis `y = y_axis`,
/// unweighted and orientation-independent.
pub fn raw_statical_moment(points: &[Point], y_axis: f64) -> f64 {
    let (a, c) = signed_area_and_centroid(points);
    a.abs() * (c.y() - y_axis)
}

/// Weighted statical moment `A·w·(Cy − y_axis)` of a whole polygon.
pub fn statical_moment(polygon: &Polygon, y_axis: f64) -> f64 {
    raw_statical_moment(polygon.vertices(), y_axis) * polygon.weight()
}

/// Weighted statical moment of the part of `polygon` above `y_cut`, about `y_axis`.
pub fn statical_moment_above(polygon: &Polygon, y_cut: f64, y_axis: f64) -> f64 {
    match clip_above_line(polygon.vertices(), y_cut) {
        Some(part) => raw_statical_moment(&part, y_axis) * polygon.weight(),
        None => 0.0,
    }
}
