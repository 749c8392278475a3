use deskew_image::ImageSize;
use serde::{Deserialize, Serialize};

use crate::point::{cross, Point2};
use crate::GeometryError;

/// Relative tolerance on the triangle areas spanned by three corners.
const COLLINEARITY_EPS: f64 = 1e-6;

/// Absolute tolerance below which all corners are considered coincident.
const COINCIDENCE_EPS: f64 = 1e-9;

/// Where the origin of normalized coordinates lies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateOrigin {
    /// `y = 0` is the top row of the image.
    #[default]
    TopLeft,
    /// `y = 0` is the bottom row of the image, as reported by most native detectors.
    BottomLeft,
}

/// Four corners of a region of interest, in the order they were supplied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    /// the corners in caller order
    pub points: [Point2; 4],
}

impl Quadrilateral {
    /// Create a quadrilateral from four points in any order.
    pub fn new(points: [Point2; 4]) -> Self {
        Self { points }
    }

    /// Create a quadrilateral from a slice of points.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidInput`] if the slice does not hold exactly 4 points.
    pub fn from_slice(points: &[Point2]) -> Result<Self, GeometryError> {
        let points: [Point2; 4] = points.try_into().map_err(|_| {
            GeometryError::InvalidInput(format!("expected 4 points, got {}", points.len()))
        })?;
        Ok(Self { points })
    }

    /// Scale normalized `[0, 1]` coordinates to pixel coordinates.
    ///
    /// # Arguments
    ///
    /// * `points` - The normalized corners.
    /// * `size` - The size of the image the corners refer to.
    /// * `origin` - The origin the normalized `y` axis is measured from.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidInput`] if the slice does not hold exactly 4 points.
    pub fn from_normalized(
        points: &[Point2],
        size: ImageSize,
        origin: CoordinateOrigin,
    ) -> Result<Self, GeometryError> {
        let (w, h) = (size.width as f64, size.height as f64);
        let scaled = points
            .iter()
            .map(|p| match origin {
                CoordinateOrigin::TopLeft => Point2::new(p.x * w, p.y * h),
                CoordinateOrigin::BottomLeft => Point2::new(p.x * w, (1.0 - p.y) * h),
            })
            .collect::<Vec<_>>();
        Self::from_slice(&scaled)
    }

    /// The image bounds shrunk by `margin` (a fraction of each side) on every side.
    ///
    /// This is the customary fallback region when no usable corners are available.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidInput`] if `margin` is not in `[0, 0.5)`.
    pub fn inset(size: ImageSize, margin: f64) -> Result<Self, GeometryError> {
        if !(0.0..0.5).contains(&margin) {
            return Err(GeometryError::InvalidInput(format!(
                "margin must be in [0, 0.5), got {margin}"
            )));
        }

        let max_x = size.width.saturating_sub(1) as f64;
        let max_y = size.height.saturating_sub(1) as f64;
        let (x0, x1) = (max_x * margin, max_x * (1.0 - margin));
        let (y0, y1) = (max_y * margin, max_y * (1.0 - margin));

        Ok(Self::new([
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]))
    }

    /// Put the corners in top-left, top-right, bottom-right, bottom-left order.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidInput`] if any coordinate is not finite.
    pub fn order(&self) -> Result<OrderedQuad, GeometryError> {
        order_points(&self.points)
    }
}

/// Corners of a quadrilateral in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderedQuad {
    /// corner nearest the origin
    pub top_left: Point2,
    /// upper right corner
    pub top_right: Point2,
    /// corner farthest from the origin
    pub bottom_right: Point2,
    /// lower left corner
    pub bottom_left: Point2,
}

impl OrderedQuad {
    /// The corners as `[top_left, top_right, bottom_right, bottom_left]`.
    pub fn to_array(&self) -> [Point2; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Length of the top edge.
    pub fn width_top(&self) -> f64 {
        self.top_left.distance(&self.top_right)
    }

    /// Length of the bottom edge.
    pub fn width_bottom(&self) -> f64 {
        self.bottom_left.distance(&self.bottom_right)
    }

    /// Length of the left edge.
    pub fn height_left(&self) -> f64 {
        self.top_left.distance(&self.bottom_left)
    }

    /// Length of the right edge.
    pub fn height_right(&self) -> f64 {
        self.top_right.distance(&self.bottom_right)
    }

    /// Area enclosed by the polygon TL → TR → BR → BL (shoelace formula).
    pub fn area(&self) -> f64 {
        let p = self.to_array();
        let twice = (0..4)
            .map(|i| {
                let (a, b) = (p[i], p[(i + 1) % 4]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>();
        twice.abs() / 2.0
    }

    /// Whether TL → TR → BR → BL turns the same way at every corner.
    ///
    /// A crossed (bow-tie) or concave order is not convex.
    pub fn is_convex(&self) -> bool {
        let turns = self.turns();
        turns.iter().all(|t| *t > 0.0) || turns.iter().all(|t| *t < 0.0)
    }

    fn turns(&self) -> [f64; 4] {
        let p = self.to_array();
        std::array::from_fn(|i| cross(&p[i], &p[(i + 1) % 4], &p[(i + 2) % 4]))
    }

    /// Keep the top-left corner and take the others clockwise around the centroid.
    fn clockwise_from_top_left(&self) -> Self {
        let p = self.to_array();
        let cx = p.iter().map(|q| q.x).sum::<f64>() / 4.0;
        let cy = p.iter().map(|q| q.y).sum::<f64>() / 4.0;
        let angle = |q: &Point2| (q.y - cy).atan2(q.x - cx);

        // with y pointing down an increasing angle runs clockwise on screen
        let start = angle(&p[0]);
        let mut rest = [p[1], p[2], p[3]];
        rest.sort_by(|a, b| {
            let ka = (angle(a) - start).rem_euclid(std::f64::consts::TAU);
            let kb = (angle(b) - start).rem_euclid(std::f64::consts::TAU);
            ka.total_cmp(&kb)
        });

        Self {
            top_left: p[0],
            top_right: rest[0],
            bottom_right: rest[1],
            bottom_left: rest[2],
        }
    }

    /// Check that the corners span a convex quadrilateral.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateGeometry`] when the corners coincide, three of
    /// them are collinear or the polygon TL → TR → BR → BL is not convex. No homography
    /// maps such corners onto a rectangle without folding the image.
    pub fn ensure_non_degenerate(&self) -> Result<(), GeometryError> {
        let p = self.to_array();

        let mut longest = 0.0f64;
        for i in 0..4 {
            for j in (i + 1)..4 {
                longest = longest.max(p[i].distance(&p[j]));
            }
        }
        if longest < COINCIDENCE_EPS {
            return Err(GeometryError::DegenerateGeometry(
                "all corners coincide".to_string(),
            ));
        }

        let tolerance = COLLINEARITY_EPS * longest * longest;
        for skip in 0..4 {
            let [a, b, c] = triangle_without(&p, skip);
            if cross(&a, &b, &c).abs() <= tolerance {
                return Err(GeometryError::DegenerateGeometry(format!(
                    "corners ({}, {}), ({}, {}), ({}, {}) are collinear",
                    a.x, a.y, b.x, b.y, c.x, c.y
                )));
            }
        }

        if !self.is_convex() {
            return Err(GeometryError::DegenerateGeometry(format!(
                "corners do not form a convex quadrilateral, turns {:?}",
                self.turns()
            )));
        }

        Ok(())
    }
}

fn triangle_without(p: &[Point2; 4], skip: usize) -> [Point2; 3] {
    let mut out = [Point2::default(); 3];
    let mut k = 0;
    for (i, pt) in p.iter().enumerate() {
        if i != skip {
            out[k] = *pt;
            k += 1;
        }
    }
    out
}

/// Remove and return the index whose key wins `better`; ties go to the first occurrence.
fn take_extreme(
    remaining: &mut Vec<usize>,
    points: &[Point2],
    key: impl Fn(&Point2) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> Point2 {
    let mut best = 0;
    for pos in 1..remaining.len() {
        if better(key(&points[remaining[pos]]), key(&points[remaining[best]])) {
            best = pos;
        }
    }
    points[remaining.remove(best)]
}

/// Order four points as top-left, top-right, bottom-right, bottom-left.
///
/// The sum `x + y` is smallest at the top-left and largest at the bottom-right corner; the
/// difference `y - x` is smallest at the top-right and largest at the bottom-left corner.
/// Corners are picked in that order, each from the points not picked yet, so the result is
/// always a permutation of the input. On ties the point supplied first wins.
///
/// Ties can cross two edges, e.g. for a rectangle turned by exactly 45 degrees. When the
/// picks do not form a convex polygon, the top-left pick is kept and the other corners
/// follow clockwise around the centroid, which orders any convex quadrilateral.
///
/// # Arguments
///
/// * `points` - Exactly four points in any order.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if there are not exactly four points or a
/// coordinate is not finite. Degenerate quadrilaterals are not rejected here.
///
/// # Example
///
/// ```
/// use deskew_geometry::{order_points, Point2};
///
/// let quad = order_points(&[
///     Point2::new(100.0, 100.0),
///     Point2::new(0.0, 0.0),
///     Point2::new(0.0, 100.0),
///     Point2::new(100.0, 0.0),
/// ]).unwrap();
///
/// assert_eq!(quad.top_left, Point2::new(0.0, 0.0));
/// assert_eq!(quad.top_right, Point2::new(100.0, 0.0));
/// assert_eq!(quad.bottom_right, Point2::new(100.0, 100.0));
/// assert_eq!(quad.bottom_left, Point2::new(0.0, 100.0));
/// ```
pub fn order_points(points: &[Point2]) -> Result<OrderedQuad, GeometryError> {
    if points.len() != 4 {
        return Err(GeometryError::InvalidInput(format!(
            "expected 4 points, got {}",
            points.len()
        )));
    }

    if let Some(p) = points.iter().find(|p| !p.is_finite()) {
        return Err(GeometryError::InvalidInput(format!(
            "non-finite point ({}, {})",
            p.x, p.y
        )));
    }

    let sum = |p: &Point2| p.x + p.y;
    let diff = |p: &Point2| p.y - p.x;
    let less = |a: f64, b: f64| a < b;
    let greater = |a: f64, b: f64| a > b;

    let mut remaining = vec![0, 1, 2, 3];
    let top_left = take_extreme(&mut remaining, points, sum, less);
    let bottom_right = take_extreme(&mut remaining, points, sum, greater);
    let top_right = take_extreme(&mut remaining, points, diff, less);
    let bottom_left = points[remaining[0]];

    let quad = OrderedQuad {
        top_left,
        top_right,
        bottom_right,
        bottom_left,
    };

    if quad.is_convex() {
        Ok(quad)
    } else {
        Ok(quad.clockwise_from_top_left())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn permutations(p: [Point2; 4]) -> Vec<[Point2; 4]> {
        let mut out = vec![];
        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    for d in 0..4 {
                        let idx = [a, b, c, d];
                        let mut seen = [false; 4];
                        idx.iter().for_each(|&i| seen[i] = true);
                        if seen.iter().all(|&s| s) {
                            out.push([p[a], p[b], p[c], p[d]]);
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn order_square_any_permutation() -> Result<(), GeometryError> {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(0.0, 100.0),
        ];
        let perms = permutations(square);
        assert_eq!(perms.len(), 24);
        for perm in perms {
            let quad = order_points(&perm)?;
            assert_eq!(quad.to_array(), square);
        }
        Ok(())
    }

    #[test]
    fn order_skewed_any_permutation() -> Result<(), GeometryError> {
        let skewed = [
            Point2::new(10.0, 10.0),
            Point2::new(210.0, 30.0),
            Point2::new(200.0, 180.0),
            Point2::new(5.0, 160.0),
        ];
        for perm in permutations(skewed) {
            assert_eq!(order_points(&perm)?.to_array(), skewed);
        }
        Ok(())
    }

    #[test]
    fn order_always_permutation() -> Result<(), GeometryError> {
        // independent argmin/argmax would pick (10, 0) for both corners here
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
            Point2::new(-5.0, 5.0),
        ];
        let quad = order_points(&points)?;
        let mut out = quad.to_array().to_vec();
        let mut inp = points.to_vec();
        let key = |p: &Point2| (p.x.to_bits(), p.y.to_bits());
        out.sort_by_key(key);
        inp.sort_by_key(key);
        assert_eq!(out, inp);
        Ok(())
    }

    #[test]
    fn order_rotated_rectangle_ties() -> Result<(), GeometryError> {
        // a 60 x 30 (times sqrt 2) rectangle turned by 45 degrees; sums and differences tie
        let rotated = [
            Point2::new(100.0, 40.0),
            Point2::new(160.0, 100.0),
            Point2::new(130.0, 130.0),
            Point2::new(70.0, 70.0),
        ];
        for perm in permutations(rotated) {
            let quad = order_points(&perm)?;
            assert!(quad.is_convex(), "crossed order {:?}", quad.to_array());
            quad.ensure_non_degenerate()?;
            assert_relative_eq!(quad.area(), 3600.0, epsilon = 1e-9);
            assert_relative_eq!(quad.width_top(), quad.width_bottom(), epsilon = 1e-9);
            assert_relative_eq!(quad.height_left(), quad.height_right(), epsilon = 1e-9);
        }

        let quad = order_points(&rotated)?;
        assert_eq!(quad.to_array(), rotated);
        Ok(())
    }

    #[test]
    fn degenerate_concave() -> Result<(), GeometryError> {
        let quad = order_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(40.0, 20.0),
            Point2::new(0.0, 100.0),
        ])?;
        assert!(!quad.is_convex());
        assert!(matches!(
            quad.ensure_non_degenerate(),
            Err(GeometryError::DegenerateGeometry(_))
        ));
        Ok(())
    }

    #[test]
    fn order_wrong_count() {
        let res = order_points(&[Point2::new(0.0, 0.0); 3]);
        assert!(matches!(res, Err(GeometryError::InvalidInput(_))));
        let res = order_points(&[Point2::new(0.0, 0.0); 5]);
        assert!(matches!(res, Err(GeometryError::InvalidInput(_))));
    }

    #[test]
    fn order_non_finite() {
        let mut points = [Point2::new(0.0, 0.0); 4];
        points[2] = Point2::new(f64::INFINITY, 1.0);
        let res = order_points(&points);
        assert!(matches!(res, Err(GeometryError::InvalidInput(_))));
    }

    #[test]
    fn degenerate_collinear() -> Result<(), GeometryError> {
        let quad = order_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(50.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(50.0, 80.0),
        ])?;
        assert!(matches!(
            quad.ensure_non_degenerate(),
            Err(GeometryError::DegenerateGeometry(_))
        ));
        Ok(())
    }

    #[test]
    fn degenerate_coincident() -> Result<(), GeometryError> {
        let quad = order_points(&[Point2::new(3.0, 3.0); 4])?;
        assert!(matches!(
            quad.ensure_non_degenerate(),
            Err(GeometryError::DegenerateGeometry(_))
        ));
        Ok(())
    }

    #[test]
    fn edges_and_area() -> Result<(), GeometryError> {
        let quad = order_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(40.0, 0.0),
            Point2::new(40.0, 30.0),
            Point2::new(0.0, 30.0),
        ])?;
        quad.ensure_non_degenerate()?;
        assert_relative_eq!(quad.width_top(), 40.0);
        assert_relative_eq!(quad.width_bottom(), 40.0);
        assert_relative_eq!(quad.height_left(), 30.0);
        assert_relative_eq!(quad.height_right(), 30.0);
        assert_relative_eq!(quad.area(), 1200.0);
        Ok(())
    }

    #[test]
    fn from_normalized_origins() -> Result<(), GeometryError> {
        let size = ImageSize {
            width: 200,
            height: 100,
        };
        let pts = [
            Point2::new(0.1, 0.2),
            Point2::new(0.9, 0.2),
            Point2::new(0.9, 0.8),
            Point2::new(0.1, 0.8),
        ];
        let top = Quadrilateral::from_normalized(&pts, size, CoordinateOrigin::TopLeft)?;
        assert_relative_eq!(top.points[0].x, 20.0);
        assert_relative_eq!(top.points[0].y, 20.0);

        let bottom = Quadrilateral::from_normalized(&pts, size, CoordinateOrigin::BottomLeft)?;
        assert_relative_eq!(bottom.points[0].x, 20.0);
        assert_relative_eq!(bottom.points[0].y, 80.0);

        assert!(Quadrilateral::from_normalized(&pts[..2], size, CoordinateOrigin::TopLeft).is_err());
        Ok(())
    }

    #[test]
    fn inset_margin() -> Result<(), GeometryError> {
        let quad = Quadrilateral::inset(
            ImageSize {
                width: 101,
                height: 201,
            },
            0.05,
        )?;
        let ordered = quad.order()?;
        assert_relative_eq!(ordered.top_left.x, 5.0);
        assert_relative_eq!(ordered.top_left.y, 10.0);
        assert_relative_eq!(ordered.bottom_right.x, 95.0);
        assert_relative_eq!(ordered.bottom_right.y, 190.0);

        let res = Quadrilateral::inset(
            ImageSize {
                width: 10,
                height: 10,
            },
            0.5,
        );
        assert!(matches!(res, Err(GeometryError::InvalidInput(_))));
        Ok(())
    }
}
