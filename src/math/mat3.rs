use super::Vec3;

/// A 3x3 matrix stored row-major.
///
/// Invariant enforced at ingestion (not recomputed per query): matrices used
/// as rotations satisfy `det ≈ 1` to tolerance `1e-4`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub rows: [Vec3; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        rows: [Vec3::UNIT_X, Vec3::UNIT_Y, Vec3::UNIT_Z],
    };

    pub fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self { rows: [r0, r1, r2] }
    }

    pub fn from_columns(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Mat3::from_rows(
            Vec3::new(c0.x, c1.x, c2.x),
            Vec3::new(c0.y, c1.y, c2.y),
            Vec3::new(c0.z, c1.z, c2.z),
        )
    }

    pub fn column(&self, index: usize) -> Vec3 {
        Vec3::new(
            self.rows[0].component(index),
            self.rows[1].component(index),
            self.rows[2].component(index),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.rows.iter().all(|r| r.is_finite())
    }

    pub fn transpose(&self) -> Mat3 {
        Mat3::from_rows(self.column(0), self.column(1), self.column(2))
    }

    pub fn mul_vec(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }

    pub fn mul_mat(&self, rhs: &Mat3) -> Mat3 {
        let rt = rhs.transpose();
        Mat3::from_rows(
            Vec3::new(self.rows[0].dot(rt.rows[0]), self.rows[0].dot(rt.rows[1]), self.rows[0].dot(rt.rows[2])),
            Vec3::new(self.rows[1].dot(rt.rows[0]), self.rows[1].dot(rt.rows[1]), self.rows[1].dot(rt.rows[2])),
            Vec3::new(self.rows[2].dot(rt.rows[0]), self.rows[2].dot(rt.rows[1]), self.rows[2].dot(rt.rows[2])),
        )
    }

    pub fn determinant(&self) -> f32 {
        let [r0, r1, r2] = self.rows;
        r0.dot(r1.cross(r2))
    }

    /// Transform a world-space point assuming this matrix is the rotational
    /// part of a transform; translation is handled by [`Transform`](super::Transform).
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.mul_vec(p)
    }
}

/// Eigen-decompose a symmetric 3x3 matrix via the cyclic Jacobi method.
///
/// Returns eigenvalues and an orthonormal basis of eigenvectors (as matrix
/// columns), both unordered. Returns `None` if the sweep fails to converge
/// within the iteration budget, in which case callers should fall back to an
/// axis-aligned fit.
pub fn symmetric_eigen(m: Mat3) -> Option<([f32; 3], [Vec3; 3])> {
    const MAX_SWEEPS: usize = 64;
    const CONVERGENCE: f32 = 1e-10;

    let mut a = m;
    let mut v = Mat3::IDENTITY;

    for _ in 0..MAX_SWEEPS {
        let off_diag = a.rows[0].y.abs() + a.rows[0].z.abs() + a.rows[1].z.abs();
        if off_diag < CONVERGENCE {
            let eigenvalues = [a.rows[0].x, a.rows[1].y, a.rows[2].z];
            let eigenvectors = [v.column(0), v.column(1), v.column(2)];
            return Some((eigenvalues, eigenvectors));
        }

        for (p, q) in [(0usize, 1usize), (0, 2), (1, 2)] {
            let apq = a.at(p, q);
            if apq.abs() < 1e-12 {
                continue;
            }
            let app = a.at(p, p);
            let aqq = a.at(q, q);
            let theta = (aqq - app) / (2.0 * apq);
            let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;
            a = a.jacobi_rotate(p, q, c, s);
            v = v.jacobi_rotate_columns(p, q, c, s);
        }
    }

    None
}

impl Mat3 {
    fn at(&self, r: usize, c: usize) -> f32 {
        self.rows[r].component(c)
    }

    fn set(&mut self, r: usize, c: usize, value: f32) {
        let row = &mut self.rows[r];
        match c {
            0 => row.x = value,
            1 => row.y = value,
            2 => row.z = value,
            _ => unreachable!(),
        }
    }

    fn jacobi_rotate(&self, p: usize, q: usize, c: f32, s: f32) -> Mat3 {
        let mut result = *self;
        for i in 0..3 {
            let aip = self.at(i, p);
            let aiq = self.at(i, q);
            result.set(i, p, c * aip - s * aiq);
            result.set(i, q, s * aip + c * aiq);
        }
        let mut final_result = result;
        for j in 0..3 {
            let apj = result.at(p, j);
            let aqj = result.at(q, j);
            final_result.set(p, j, c * apj - s * aqj);
            final_result.set(q, j, s * apj + c * aqj);
        }
        final_result
    }

    fn jacobi_rotate_columns(&self, p: usize, q: usize, c: f32, s: f32) -> Mat3 {
        let mut result = *self;
        for i in 0..3 {
            let aip = self.at(i, p);
            let aiq = self.at(i, q);
            result.set(i, p, c * aip - s * aiq);
            result.set(i, q, s * aip + c * aiq);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transpose_is_identity() {
        assert_eq!(Mat3::IDENTITY.transpose(), Mat3::IDENTITY);
    }

    #[test]
    fn identity_determinant_is_one() {
        assert!((Mat3::IDENTITY.determinant() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mul_vec_identity_is_noop() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Mat3::IDENTITY.mul_vec(v), v);
    }

    #[test]
    fn symmetric_eigen_diagonal_returns_axis_values() {
        let m = Mat3::from_rows(
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 9.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let (values, _vectors) = symmetric_eigen(m).expect("diagonal matrix converges");
        let mut sorted = values;
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((sorted[0] - 1.0).abs() < 1e-4);
        assert!((sorted[1] - 4.0).abs() < 1e-4);
        assert!((sorted[2] - 9.0).abs() < 1e-4);
    }
}
