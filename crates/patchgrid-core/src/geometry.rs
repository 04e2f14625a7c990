//! Point-set primitives: nearest-neighbor distance between groups, set
//! diameter, and the corner buffer used to approximate patch footprints
//! by circles.
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dist(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A point tagged with the group (usually patch id) it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupedPoint {
    pub x: f64,
    pub y: f64,
    pub group: i64,
}

impl GroupedPoint {
    pub fn new(x: f64, y: f64, group: i64) -> Self {
        Self { x, y, group }
    }

    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Cell size in map units along x and y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub x: f64,
    pub y: f64,
}

impl Resolution {
    pub fn new(x: f64, y: f64) -> Result<Self> {
        if !(x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0) {
            return Err(GridError::InvalidResolution { x, y });
        }
        Ok(Self { x, y })
    }

    /// Distance from a cell centre to its corners.
    pub fn half_diagonal(&self) -> f64 {
        (self.x / 2.0).hypot(self.y / 2.0)
    }
}

// ── Nearest neighbor ──────────────────────────────────────────────────────────

/// For every point, the distance to the closest point of another group.
///
/// `None` when no point outside the point's own group exists.
/// Brute force, O(n²).
pub fn nearest_neighbor_distances(points: &[GroupedPoint]) -> Result<Vec<Option<f64>>> {
    if points.is_empty() {
        return Err(GridError::EmptyInput("nearest-neighbor distance of zero points"));
    }

    let nearest = |p: &GroupedPoint| -> Option<f64> {
        points
            .iter()
            .filter(|q| q.group != p.group)
            .map(|q| p.point().dist(q.point()))
            .min_by(f64::total_cmp)
    };

    #[cfg(feature = "threading")]
    let out = {
        use rayon::prelude::*;
        points.par_iter().map(nearest).collect()
    };
    #[cfg(not(feature = "threading"))]
    let out = points.iter().map(nearest).collect();

    Ok(out)
}

// ── Diameter ──────────────────────────────────────────────────────────────────

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull by monotone chain, counter-clockwise, collinear points
/// dropped. Fewer than three distinct points come back unchanged.
fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(2 * pts.len());
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// The two points realising the diameter, and their distance.
fn farthest_pair(points: &[Point]) -> (Point, Point, f64) {
    let hull = convex_hull(points);
    let mut best = (hull[0], hull[0], 0.0);
    for (i, &a) in hull.iter().enumerate() {
        for &b in &hull[i + 1..] {
            let d = a.dist(b);
            if d > best.2 {
                best = (a, b, d);
            }
        }
    }
    best
}

/// Maximum Euclidean distance over all pairs of `points`.
///
/// Pairs are searched over the convex hull only, which gives the same
/// value as the all-pairs scan.
pub fn max_distance(points: &[Point]) -> Result<f64> {
    if points.len() < 2 {
        return Err(GridError::EmptyInput("max distance needs at least two points"));
    }
    Ok(farthest_pair(points).2)
}

// ── Circle buffer ─────────────────────────────────────────────────────────────

/// Expand every centre to the four corners of its grid cell.
///
/// The corners lie on the circle of radius [`Resolution::half_diagonal`]
/// around the centre, offset by half a cell independently along x and y.
/// Output holds four points per centre in input order: lower-left,
/// lower-right, upper-left, upper-right.
pub fn circle_buffer(centres: &[Point], res: Resolution) -> Vec<Point> {
    let (hx, hy) = (res.x / 2.0, res.y / 2.0);
    centres
        .iter()
        .flat_map(|c| {
            [
                Point::new(c.x - hx, c.y - hy),
                Point::new(c.x + hx, c.y - hy),
                Point::new(c.x - hx, c.y + hy),
                Point::new(c.x + hx, c.y + hy),
            ]
        })
        .collect()
}

/// Smallest circle through the two farthest corners of a group's cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub group: i64,
    pub centre: Point,
    pub diameter: f64,
}

/// One circumscribing circle per group, groups in first-appearance order.
///
/// `points` are cell centres; each is buffered to its cell corners so a
/// single-cell group still gets the cell's diagonal as diameter.
pub fn circumscribing_circles(points: &[GroupedPoint], res: Resolution) -> Result<Vec<Circle>> {
    if points.is_empty() {
        return Err(GridError::EmptyInput("circumscribing circle of zero points"));
    }

    let mut groups: Vec<i64> = Vec::new();
    let mut members: Vec<Vec<Point>> = Vec::new();
    for p in points {
        match groups.iter().position(|&g| g == p.group) {
            Some(i) => members[i].push(p.point()),
            None => {
                groups.push(p.group);
                members.push(vec![p.point()]);
            }
        }
    }

    Ok(groups
        .into_iter()
        .zip(members)
        .map(|(group, centres)| {
            let corners = circle_buffer(&centres, res);
            let (a, b, diameter) = farthest_pair(&corners);
            Circle { group, centre: Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0), diameter }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nearest_neighbor_skips_own_group() {
        let pts = [
            GroupedPoint::new(0.0, 0.0, 1),
            GroupedPoint::new(1.0, 0.0, 1),
            GroupedPoint::new(4.0, 0.0, 2),
            GroupedPoint::new(4.0, 3.0, 3),
        ];
        let d = nearest_neighbor_distances(&pts).unwrap();
        assert_relative_eq!(d[0].unwrap(), 4.0);
        assert_relative_eq!(d[1].unwrap(), 3.0);
        assert_relative_eq!(d[2].unwrap(), 3.0);
        assert_relative_eq!(d[3].unwrap(), 3.0);
    }

    #[test]
    fn nearest_neighbor_edge_cases() {
        assert!(matches!(nearest_neighbor_distances(&[]), Err(GridError::EmptyInput(_))));
        let lonely = [GroupedPoint::new(0.0, 0.0, 7), GroupedPoint::new(2.0, 0.0, 7)];
        assert_eq!(nearest_neighbor_distances(&lonely).unwrap(), vec![None, None]);
    }

    #[cfg(feature = "threading")]
    #[test]
    fn parallel_nearest_neighbor_matches_sequential_scan() {
        let pts: Vec<GroupedPoint> = (0..300)
            .map(|i| {
                let t = i as f64 * 0.37;
                GroupedPoint::new(t.cos() * (1.0 + i as f64 * 0.05), t.sin() * 3.0, (i % 4) as i64)
            })
            .chain([GroupedPoint::new(50.0, 50.0, 9)])
            .collect();

        let mut expected = Vec::with_capacity(pts.len());
        for p in &pts {
            let mut best: Option<f64> = None;
            for q in pts.iter().filter(|q| q.group != p.group) {
                let d = p.point().dist(q.point());
                best = Some(best.map_or(d, |b| b.min(d)));
            }
            expected.push(best);
        }

        assert_eq!(nearest_neighbor_distances(&pts).unwrap(), expected);
    }

    #[test]
    fn max_distance_matches_brute_force() {
        let pts: Vec<Point> = (0..40)
            .map(|i| {
                let t = i as f64 * 0.7;
                Point::new(t.cos() * (1.0 + i as f64 * 0.1), t.sin() * 2.0)
            })
            .collect();
        let mut brute = 0.0f64;
        for a in &pts {
            for b in &pts {
                brute = brute.max(a.dist(*b));
            }
        }
        assert_relative_eq!(max_distance(&pts).unwrap(), brute, epsilon = 1e-12);
    }

    #[test]
    fn max_distance_degenerate_inputs() {
        assert!(matches!(max_distance(&[Point::new(1.0, 1.0)]), Err(GridError::EmptyInput(_))));
        let same = [Point::new(1.0, 1.0), Point::new(1.0, 1.0)];
        assert_eq!(max_distance(&same).unwrap(), 0.0);
        let line = [Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(3.0, 3.0)];
        assert_relative_eq!(max_distance(&line).unwrap(), 18f64.sqrt());
    }

    #[test]
    fn circle_buffer_is_anisotropic() {
        let res = Resolution::new(2.0, 1.0).unwrap();
        let corners = circle_buffer(&[Point::new(10.0, 5.0)], res);
        assert_eq!(corners.len(), 4);
        assert_eq!(corners[0], Point::new(9.0, 4.5));
        assert_eq!(corners[3], Point::new(11.0, 5.5));
        for c in &corners {
            assert_relative_eq!(c.dist(Point::new(10.0, 5.0)), res.half_diagonal());
        }
        assert!(Resolution::new(0.0, 1.0).is_err());
        assert!(Resolution::new(1.0, f64::NAN).is_err());
    }

    #[test]
    fn circumscribing_circles_per_group() {
        let res = Resolution::new(1.0, 1.0).unwrap();
        let pts = [
            GroupedPoint::new(0.5, 0.5, 3),
            GroupedPoint::new(5.5, 5.5, 9),
            GroupedPoint::new(2.5, 0.5, 3),
        ];
        let circles = circumscribing_circles(&pts, res).unwrap();
        assert_eq!(circles.len(), 2);

        // Group 3: cells spanning x in [0, 3], y in [0, 1].
        assert_eq!(circles[0].group, 3);
        assert_relative_eq!(circles[0].diameter, 10f64.sqrt());
        assert_relative_eq!(circles[0].centre.x, 1.5);
        assert_relative_eq!(circles[0].centre.y, 0.5);

        // Single cell: its own diagonal.
        assert_eq!(circles[1].group, 9);
        assert_relative_eq!(circles[1].diameter, 2f64.sqrt());
        assert_relative_eq!(circles[1].centre.x, 5.5);
    }
}
