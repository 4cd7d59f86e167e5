use crate::error::Error;
use crate::registry::Handle;

use super::Item;

/// O(n²) pairwise AABB overlap in registration order. Deterministic pair
/// ordering, independent of spatial distribution; the straightforward
/// baseline the tree strategy is checked against.
///
/// Always returns the true total pair count. Writes as many pairs as `out`
/// holds, then reports `BufferTooSmall` if more were found than fit.
pub fn find_pairs(items: &[Item], out: &mut [(Handle, Handle)]) -> (usize, Result<(), Error>) {
    let mut total = 0usize;
    let mut written = 0usize;
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            if items[i].aabb.overlaps(&items[j].aabb) {
                total += 1;
                if written < out.len() {
                    out[written] = (items[i].handle, items[j].handle);
                    written += 1;
                }
            }
        }
    }
    let result = if total > out.len() { Err(Error::BufferTooSmall) } else { Ok(()) };
    (total, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Aabb;
    use crate::math::Vec3;

    fn item(id: u64, center: Vec3, half: f32) -> Item {
        Item { handle: Handle(id), aabb: Aabb::from_center_half_extents(center, Vec3::splat(half)) }
    }

    #[test]
    fn three_spheres_with_one_overlapping_pair() {
        let items = vec![
            item(1, Vec3::ZERO, 1.0),
            item(2, Vec3::new(0.4, 0.0, 0.0), 1.0),
            item(3, Vec3::new(5.0, 0.0, 0.0), 1.0),
        ];
        let mut out = vec![(Handle::INVALID, Handle::INVALID); 8];
        let (total, result) = find_pairs(&items, &mut out);
        assert_eq!(total, 1);
        assert!(result.is_ok());
        assert_eq!(out[0], (Handle(1), Handle(2)));
    }

    #[test]
    fn zero_capacity_buffer_with_pairs_reports_buffer_too_small() {
        let items = vec![item(1, Vec3::ZERO, 1.0), item(2, Vec3::ZERO, 1.0)];
        let mut out: Vec<(Handle, Handle)> = Vec::new();
        let (total, result) = find_pairs(&items, &mut out);
        assert_eq!(total, 1);
        assert_eq!(result, Err(Error::BufferTooSmall));
    }

    #[test]
    fn no_overlapping_pairs_reports_zero_total() {
        let items = vec![item(1, Vec3::ZERO, 1.0), item(2, Vec3::new(10.0, 0.0, 0.0), 1.0)];
        let mut out = vec![(Handle::INVALID, Handle::INVALID); 4];
        let (total, result) = find_pairs(&items, &mut out);
        assert_eq!(total, 0);
        assert!(result.is_ok());
    }
}
