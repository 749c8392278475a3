use faer::prelude::SpSolver;

use crate::{linalg, GeometryError, Point2};

/// Smallest determinant magnitude accepted for a normalized homography.
const MIN_DETERMINANT: f64 = 1e-12;

/// A projective transform of the plane, stored row-major with `m[2][2] == 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    m: [[f64; 3]; 3],
}

impl Homography {
    /// The identity transform.
    pub const IDENTITY: Homography = Homography {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Wrap a 3x3 matrix, normalizing it so that its bottom-right element is one.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateGeometry`] if the matrix is singular or not finite.
    pub fn from_matrix(mut m: [[f64; 3]; 3]) -> Result<Self, GeometryError> {
        linalg::normalize_mat33_inplace(&mut m);
        validate(&m)?;
        Ok(Self { m })
    }

    /// Compute the homography from four 2d point correspondences.
    ///
    /// The eight unknowns (with `h33 = 1`) are solved from the direct linear transform
    /// system using a partial pivoting LU decomposition.
    ///
    /// # Arguments
    ///
    /// * `src` - The source points.
    /// * `dst` - The destination points, `dst[i]` being the image of `src[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateGeometry`] if the system is singular, e.g. when
    /// three of the source or destination points are collinear.
    ///
    /// # Example
    ///
    /// ```
    /// use deskew_geometry::{Homography, Point2};
    ///
    /// let src = [
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(1.0, 0.0),
    ///     Point2::new(1.0, 1.0),
    ///     Point2::new(0.0, 1.0),
    /// ];
    /// let dst = src.map(|p| Point2::new(2.0 * p.x, 2.0 * p.y));
    ///
    /// let h = Homography::from_correspondences(&src, &dst).unwrap();
    /// let p = h.transform_point(&Point2::new(0.5, 0.5));
    /// assert!((p.x - 1.0).abs() < 1e-9 && (p.y - 1.0).abs() < 1e-9);
    /// ```
    pub fn from_correspondences(
        src: &[Point2; 4],
        dst: &[Point2; 4],
    ) -> Result<Self, GeometryError> {
        // construct matrix A with the negated right hand side in the last column
        let mut mat_a = faer::Mat::<f64>::zeros(8, 9);
        for i in 0..4 {
            let (s, d) = (src[i], dst[i]);

            mat_a.write(2 * i, 0, s.x);
            mat_a.write(2 * i, 1, s.y);
            mat_a.write(2 * i, 2, 1.0);
            mat_a.write(2 * i, 6, -d.x * s.x);
            mat_a.write(2 * i, 7, -d.x * s.y);
            mat_a.write(2 * i, 8, -d.x);

            mat_a.write(2 * i + 1, 3, s.x);
            mat_a.write(2 * i + 1, 4, s.y);
            mat_a.write(2 * i + 1, 5, 1.0);
            mat_a.write(2 * i + 1, 6, -d.y * s.x);
            mat_a.write(2 * i + 1, 7, -d.y * s.y);
            mat_a.write(2 * i + 1, 8, -d.y);
        }

        // solve -> h_mat: 8x1
        let h_mat = mat_a
            .submatrix(0, 0, 8, 8)
            .partial_piv_lu()
            .solve(-mat_a.submatrix(0, 8, 8, 1));

        let h = |i: usize| h_mat.read(i, 0);
        let m = [
            [h(0), h(1), h(2)],
            [h(3), h(4), h(5)],
            [h(6), h(7), 1.0],
        ];

        validate(&m)?;

        // a singular system can still produce finite garbage; check the fit
        let homo = Self { m };
        let scale = src
            .iter()
            .chain(dst.iter())
            .map(|p| p.x.abs().max(p.y.abs()))
            .fold(1.0f64, f64::max);
        for (s, d) in src.iter().zip(dst.iter()) {
            let p = homo.transform_point(s);
            if !p.is_finite() || p.distance(d) > 1e-6 * scale {
                return Err(GeometryError::DegenerateGeometry(
                    "point correspondences admit no homography".to_string(),
                ));
            }
        }

        Ok(homo)
    }

    /// The matrix, row-major.
    pub fn matrix(&self) -> &[[f64; 3]; 3] {
        &self.m
    }

    /// Determinant of the matrix.
    pub fn determinant(&self) -> f64 {
        linalg::det_mat33(&self.m)
    }

    /// The inverse transform.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateGeometry`] if the matrix is not invertible.
    pub fn inverse(&self) -> Result<Self, GeometryError> {
        let inv = linalg::inverse_mat33(&self.m).ok_or_else(|| {
            GeometryError::DegenerateGeometry("homography is not invertible".to_string())
        })?;
        Self::from_matrix(inv)
    }

    /// Map a point through the transform.
    ///
    /// Points on the line at infinity map to non-finite coordinates.
    pub fn transform_point(&self, p: &Point2) -> Point2 {
        let m = &self.m;
        let w = m[2][0] * p.x + m[2][1] * p.y + m[2][2];
        let x = (m[0][0] * p.x + m[0][1] * p.y + m[0][2]) / w;
        let y = (m[1][0] * p.x + m[1][1] * p.y + m[1][2]) / w;
        Point2::new(x, y)
    }
}

fn validate(m: &[[f64; 3]; 3]) -> Result<(), GeometryError> {
    if m.iter().flatten().any(|v| !v.is_finite()) {
        return Err(GeometryError::DegenerateGeometry(
            "homography has non-finite entries".to_string(),
        ));
    }

    let det = linalg::det_mat33(m);
    if det.abs() < MIN_DETERMINANT {
        return Err(GeometryError::DegenerateGeometry(format!(
            "homography determinant {det:e} is too small"
        )));
    }

    Ok(())
}
