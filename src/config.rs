/// Rotation interpolation mode for continuous-collision motion evaluation.
///
/// `Nlerp` (component-wise lerp + renormalize) is the cheaper default;
/// `Slerp` is smoother for motions covering a large rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationInterpolation {
    Nlerp,
    Slerp,
}

impl Default for RotationInterpolation {
    fn default() -> Self {
        RotationInterpolation::Nlerp
    }
}

/// Engine-wide tunables. Constructed once and owned by the `Engine` that is
/// built from it; there is no lazy-static fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Used when a CCD query supplies a non-positive tolerance.
    pub ccd_default_tolerance: f32,
    /// Used when a CCD query supplies zero iterations.
    pub ccd_default_max_iterations: u32,
    /// Triangle count at or below which a BVH node becomes a leaf.
    pub bvh_leaf_threshold: u32,
    pub rotation_interpolation: RotationInterpolation,
    /// When `false`, OBBRSS fitting always falls back to an axis-aligned box.
    pub pca_obbrss: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            ccd_default_tolerance: 1e-4,
            ccd_default_max_iterations: 64,
            bvh_leaf_threshold: 4,
            rotation_interpolation: RotationInterpolation::default(),
            pca_obbrss: true,
        }
    }
}
