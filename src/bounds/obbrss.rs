use crate::math::{symmetric_eigen, Mat3, Vec3, AXIS_EPSILON};

const PROJECTION_TOLERANCE: f32 = 1e-5;

/// Oriented bounding box with an enclosed bounding radius.
///
/// `axes` are orthonormal, unordered. `extents` are half-widths along each
/// axis and are always non-negative. `radius` bounds every point of the
/// volume from `center` and is used as a cheap pre-pruning sphere test
/// ahead of the full separating-axis overlap check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obbrss {
    pub center: Vec3,
    pub axes: [Vec3; 3],
    pub extents: Vec3,
    pub radius: f32,
}

impl Obbrss {
    pub fn empty() -> Self {
        Obbrss {
            center: Vec3::ZERO,
            axes: [Vec3::UNIT_X, Vec3::UNIT_Y, Vec3::UNIT_Z],
            extents: Vec3::ZERO,
            radius: 0.0,
        }
    }

    /// Fit a volume to `points` via PCA. Equivalent to
    /// `from_points_pca(points, true)`.
    pub fn from_points(points: &[Vec3]) -> Self {
        Obbrss::from_points_pca(points, true)
    }

    /// Fit a volume to `points` via PCA: covariance eigenvectors become the
    /// box axes, extents come from projecting points onto them. Falls back
    /// to an axis-aligned box when the eigensolver doesn't converge, or
    /// immediately when `use_pca` is `false`.
    pub fn from_points_pca(points: &[Vec3], use_pca: bool) -> Self {
        if points.is_empty() {
            return Obbrss::empty();
        }
        if !use_pca {
            return Self::axis_aligned(points);
        }

        let n = points.len() as f32;
        let mean = points.iter().fold(Vec3::ZERO, |acc, p| acc + *p).scale(1.0 / n);

        let mut cov = [[0.0f32; 3]; 3];
        for p in points {
            let c = *p - mean;
            let comps = [c.x, c.y, c.z];
            for i in 0..3 {
                for j in 0..3 {
                    cov[i][j] += comps[i] * comps[j];
                }
            }
        }
        for row in cov.iter_mut() {
            for v in row.iter_mut() {
                *v /= n;
            }
        }
        let cov_mat = Mat3::from_rows(
            Vec3::new(cov[0][0], cov[0][1], cov[0][2]),
            Vec3::new(cov[1][0], cov[1][1], cov[1][2]),
            Vec3::new(cov[2][0], cov[2][1], cov[2][2]),
        );

        let axes = match symmetric_eigen(cov_mat) {
            Some((_, vectors)) => vectors,
            None => return Self::axis_aligned(points),
        };

        let mut min_proj = [f32::MAX; 3];
        let mut max_proj = [f32::MIN; 3];
        for p in points {
            let c = *p - mean;
            for axis in 0..3 {
                let proj = c.dot(axes[axis]);
                min_proj[axis] = min_proj[axis].min(proj);
                max_proj[axis] = max_proj[axis].max(proj);
            }
        }

        let mut center = mean;
        let mut extents = Vec3::ZERO;
        for axis in 0..3 {
            let mid = (min_proj[axis] + max_proj[axis]) * 0.5;
            center = center + axes[axis].scale(mid);
            let half = (max_proj[axis] - min_proj[axis]) * 0.5;
            extents = match axis {
                0 => Vec3::new(half, extents.y, extents.z),
                1 => Vec3::new(extents.x, half, extents.z),
                _ => Vec3::new(extents.x, extents.y, half),
            };
        }

        Obbrss { center, axes, extents, radius: extents.length() }
    }

    fn axis_aligned(points: &[Vec3]) -> Self {
        let mut min = points[0];
        let mut max = points[0];
        for p in &points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        let extents = (max - min).scale(0.5);
        Obbrss {
            center: (min + max).scale(0.5),
            axes: [Vec3::UNIT_X, Vec3::UNIT_Y, Vec3::UNIT_Z],
            extents,
            radius: extents.length(),
        }
    }

    /// Axis-aligned bounding cube around a sphere, used as the pre-prune
    /// volume for sphere shapes in the generic narrow-phase path.
    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        let extents = Vec3::splat(radius);
        Obbrss {
            center,
            axes: [Vec3::UNIT_X, Vec3::UNIT_Y, Vec3::UNIT_Z],
            extents,
            radius: extents.length(),
        }
    }

    /// Exact volume for an oriented box: its own axes and extents, no fit.
    pub fn from_obb(center: Vec3, axes: [Vec3; 3], extents: Vec3) -> Self {
        Obbrss { center, axes, extents, radius: extents.length() }
    }

    /// Move this volume into world space by a rigid transform: rotate the
    /// axes, transform the center, keep extents and radius (rigid motion
    /// preserves lengths).
    pub fn transform_by(&self, transform: &crate::math::Transform) -> Self {
        Obbrss {
            center: transform.transform_point(self.center),
            axes: [
                transform.transform_vector(self.axes[0]),
                transform.transform_vector(self.axes[1]),
                transform.transform_vector(self.axes[2]),
            ],
            extents: self.extents,
            radius: self.radius,
        }
    }

    fn corner(&self, sx: f32, sy: f32, sz: f32) -> Vec3 {
        self.center
            + self.axes[0].scale(sx * self.extents.x)
            + self.axes[1].scale(sy * self.extents.y)
            + self.axes[2].scale(sz * self.extents.z)
    }

    /// Fit a new volume enclosing both inputs by re-running PCA fit over
    /// their 16 combined corners. Cheaper than an exact minimal union, and
    /// matches the per-node refit cost used while building a hierarchy.
    pub fn merge(lhs: &Obbrss, rhs: &Obbrss) -> Obbrss {
        Obbrss::merge_pca(lhs, rhs, true)
    }

    /// Same as [`Obbrss::merge`] but lets the caller force the axis-aligned
    /// fallback fit, mirroring `from_points_pca`.
    pub fn merge_pca(lhs: &Obbrss, rhs: &Obbrss, use_pca: bool) -> Obbrss {
        let signs = [-1.0f32, 1.0];
        let mut points = Vec::with_capacity(16);
        for &sx in &signs {
            for &sy in &signs {
                for &sz in &signs {
                    points.push(lhs.corner(sx, sy, sz));
                    points.push(rhs.corner(sx, sy, sz));
                }
            }
        }
        Obbrss::from_points_pca(&points, use_pca)
    }

    /// Separating-axis test over the 15 candidate axes (3 + 3 face normals,
    /// 9 axis cross products). Degenerate cross-product axes (near-parallel
    /// edges) are skipped rather than treated as separating.
    pub fn overlap(lhs: &Obbrss, rhs: &Obbrss) -> bool {
        let mut r = [[0.0f32; 3]; 3];
        let mut abs_r = [[0.0f32; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                r[i][j] = lhs.axes[i].dot(rhs.axes[j]);
                abs_r[i][j] = r[i][j].abs() + AXIS_EPSILON;
            }
        }

        let translation = rhs.center - lhs.center;
        let t = [
            translation.dot(lhs.axes[0]),
            translation.dot(lhs.axes[1]),
            translation.dot(lhs.axes[2]),
        ];

        let lhs_extents = [lhs.extents.x, lhs.extents.y, lhs.extents.z];
        let rhs_extents = [rhs.extents.x, rhs.extents.y, rhs.extents.z];

        let separated = |projection: f32, radius: f32| projection > radius + PROJECTION_TOLERANCE;

        for i in 0..3 {
            let ra = lhs_extents[i];
            let rb: f32 = (0..3).map(|j| rhs_extents[j] * abs_r[i][j]).sum();
            if separated(t[i].abs(), ra + rb) {
                return false;
            }
        }

        for j in 0..3 {
            let ra: f32 = (0..3).map(|i| lhs_extents[i] * abs_r[i][j]).sum();
            let rb = rhs_extents[j];
            let projection = (t[0] * r[0][j] + t[1] * r[1][j] + t[2] * r[2][j]).abs();
            if separated(projection, ra + rb) {
                return false;
            }
        }

        for i in 0..3 {
            for j in 0..3 {
                let axis = lhs.axes[i].cross(rhs.axes[j]);
                if axis.length() <= AXIS_EPSILON {
                    continue;
                }
                let (i1, i2) = ((i + 1) % 3, (i + 2) % 3);
                let (j1, j2) = ((j + 1) % 3, (j + 2) % 3);
                let ra = lhs_extents[i1] * abs_r[i2][j] + lhs_extents[i2] * abs_r[i1][j];
                let rb = rhs_extents[j1] * abs_r[i][j2] + rhs_extents[j2] * abs_r[i][j1];
                let projection = (t[i1] * r[i2][j] - t[i2] * r[i1][j]).abs();
                if separated(projection, ra + rb) {
                    return false;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(center: Vec3, half: f32) -> Vec<Vec3> {
        let s = [-half, half];
        let mut pts = Vec::new();
        for &x in &s {
            for &y in &s {
                for &z in &s {
                    pts.push(center + Vec3::new(x, y, z));
                }
            }
        }
        pts
    }

    #[test]
    fn from_points_on_axis_aligned_cube_has_identity_like_axes() {
        let volume = Obbrss::from_points(&cube(Vec3::ZERO, 1.0));
        assert!((volume.center - Vec3::ZERO).length() < 1e-4);
        assert!((volume.extents - Vec3::splat(1.0)).length() < 1e-3);
    }

    #[test]
    fn overlap_detects_disjoint_boxes() {
        let a = Obbrss::from_points(&cube(Vec3::ZERO, 1.0));
        let b = Obbrss::from_points(&cube(Vec3::new(10.0, 0.0, 0.0), 1.0));
        assert!(!Obbrss::overlap(&a, &b));
    }

    #[test]
    fn overlap_detects_intersecting_boxes() {
        let a = Obbrss::from_points(&cube(Vec3::ZERO, 1.0));
        let b = Obbrss::from_points(&cube(Vec3::new(1.5, 0.0, 0.0), 1.0));
        assert!(Obbrss::overlap(&a, &b));
    }

    #[test]
    fn merge_encloses_both_inputs() {
        let a = Obbrss::from_points(&cube(Vec3::new(-5.0, 0.0, 0.0), 1.0));
        let b = Obbrss::from_points(&cube(Vec3::new(5.0, 0.0, 0.0), 1.0));
        let merged = Obbrss::merge(&a, &b);
        assert!(merged.radius > a.radius);
        assert!(Obbrss::overlap(&merged, &a));
        assert!(Obbrss::overlap(&merged, &b));
    }

    #[test]
    fn from_sphere_fully_encloses_sphere_surface_points() {
        let volume = Obbrss::from_sphere(Vec3::ZERO, 2.0);
        assert_eq!(volume.extents, Vec3::splat(2.0));
        assert!(volume.radius >= 2.0);
    }

    #[test]
    fn transform_by_translates_center_and_rotates_axes() {
        use crate::math::Transform;
        let volume = Obbrss::from_points(&cube(Vec3::ZERO, 1.0));
        let moved = volume.transform_by(&Transform::new(
            crate::math::Mat3::IDENTITY,
            Vec3::new(10.0, 0.0, 0.0),
        ));
        assert!((moved.center - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(moved.extents, volume.extents);
    }

    #[test]
    fn empty_volume_has_zero_extents() {
        let empty = Obbrss::empty();
        assert_eq!(empty.extents, Vec3::ZERO);
        assert_eq!(empty.radius, 0.0);
    }
}
