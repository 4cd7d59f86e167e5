use crate::math::Vec3;

use super::Obbrss;

/// Axis-aligned bounding box: a `(min, max)` corner pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Aabb { min: center - half_extents, max: center + half_extents }
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        let mut min = points[0];
        let mut max = points[0];
        for &p in &points[1..] {
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }

    /// World-space enclosing box of an oriented volume: `center ±
    /// Σ_i |axis_i|·extent_i`, summed per world axis.
    pub fn from_obbrss(volume: &Obbrss) -> Self {
        let mut half = Vec3::ZERO;
        for i in 0..3 {
            let axis = volume.axes[i];
            let extent = volume.extents.component(i);
            half = half + axis.abs().scale(extent);
        }
        Aabb::from_center_half_extents(volume.center, half)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max).scale(0.5)
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn merge(a: &Aabb, b: &Aabb) -> Aabb {
        Aabb { min: a.min.min(b.min), max: a.max.max(b.max) }
    }

    pub fn surface_area(&self) -> f32 {
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlaps_detects_touching_boxes() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(1.0));
        let b = Aabb::from_center_half_extents(Vec3::new(2.0, 0.0, 0.0), Vec3::splat(1.0));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn overlaps_rejects_separated_boxes() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(1.0));
        let b = Aabb::from_center_half_extents(Vec3::new(5.0, 0.0, 0.0), Vec3::splat(1.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn from_obbrss_matches_axis_aligned_extents_for_identity_axes() {
        let volume = Obbrss::from_obb(Vec3::ZERO, [Vec3::UNIT_X, Vec3::UNIT_Y, Vec3::UNIT_Z], Vec3::splat(2.0));
        let aabb = Aabb::from_obbrss(&volume);
        assert_eq!(aabb.min, Vec3::splat(-2.0));
        assert_eq!(aabb.max, Vec3::splat(2.0));
    }

    #[test]
    fn merge_encloses_both_inputs() {
        let a = Aabb::from_center_half_extents(Vec3::new(-5.0, 0.0, 0.0), Vec3::splat(1.0));
        let b = Aabb::from_center_half_extents(Vec3::new(5.0, 0.0, 0.0), Vec3::splat(1.0));
        let merged = Aabb::merge(&a, &b);
        assert_eq!(merged.min, Vec3::new(-6.0, -1.0, -1.0));
        assert_eq!(merged.max, Vec3::new(6.0, 1.0, 1.0));
    }
}
