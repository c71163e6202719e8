use handcloud_core::shape::{CUBE_HALF_EXTENT, EARTH_RADIUS, EARTH_SHELL, STAR_RADIUS};
use handcloud_core::{ParticleBuffer, ParticleColor, ShapeGenerator, ShapeKind, Vec3};
use proptest::prelude::*;

fn sample(shape: ShapeKind, count: usize, seed: u64) -> Vec<Vec3> {
    let mut gen = ShapeGenerator::seeded(seed);
    (0..count).map(|i| gen.generate(shape, i, count)).collect()
}

fn any_shape() -> impl Strategy<Value = ShapeKind> {
    prop::sample::select(ShapeKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn every_shape_yields_finite_positions(
        shape in any_shape(),
        count in 0usize..400,
        seed in any::<u64>(),
    ) {
        let points = sample(shape, count, seed);
        prop_assert_eq!(points.len(), count);
        prop_assert!(points.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn buffer_length_matches_count(shape in any_shape(), count in 0usize..400, seed in any::<u64>()) {
        let mut gen = ShapeGenerator::seeded(seed);
        let buffer = ParticleBuffer::generate(shape, count, ParticleColor::default(), &mut gen);
        prop_assert_eq!(buffer.len(), count);
        prop_assert_eq!(buffer.color_data().len(), 3 * count);
        prop_assert!(buffer.is_finite());
    }

    #[test]
    fn tree_stays_inside_its_cone(seed in any::<u64>()) {
        for p in sample(ShapeKind::ChristmasTree, 500, seed) {
            prop_assert!(p.y >= -4.8 - 1e-4 && p.y <= 4.8 + 1e-4);
            let radius = (p.x * p.x + p.z * p.z).sqrt();
            prop_assert!(radius <= 0.75 + 1e-4);
        }
    }

    #[test]
    fn star_stays_inside_radius(seed in any::<u64>()) {
        let bound = STAR_RADIUS + 0.25 * 3f32.sqrt() + 1e-4;
        for p in sample(ShapeKind::Star, 500, seed) {
            prop_assert!(p.length() <= bound);
        }
    }

    #[test]
    fn earth_stays_in_shell(seed in any::<u64>()) {
        let jitter = 0.1 * 3f32.sqrt();
        for p in sample(ShapeKind::Earth, 500, seed) {
            let r = p.length();
            prop_assert!(r <= EARTH_RADIUS + EARTH_SHELL + jitter + 1e-4);
            prop_assert!(r >= EARTH_RADIUS - jitter - 1e-4);
        }
    }

    #[test]
    fn cube_stays_inside_box(seed in any::<u64>()) {
        for p in sample(ShapeKind::Cube, 500, seed) {
            prop_assert!(p.abs().max_element() <= CUBE_HALF_EXTENT);
        }
    }
}

#[test]
fn tree_without_sprigs_spans_full_height() {
    let points = sample(ShapeKind::ChristmasTree, 5000, 123);
    let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
    assert!(min_y < -4.5);
    assert!(max_y > 4.5);
}

#[test]
fn heart_is_flat_in_depth() {
    for p in sample(ShapeKind::Heart, 2000, 77) {
        assert!(p.z.abs() <= 1.0);
        assert!(p.x.abs() <= 4.8 + 0.15 + 1e-4);
    }
}

#[test]
fn star_core_is_denser_than_shell() {
    let points = sample(ShapeKind::Star, 10_000, 5);
    let inner = points.iter().filter(|p| p.length() < 2.0).count();
    // A volume-uniform ball would put only 1/8 of the points inside half the radius.
    assert!(inner as f32 / points.len() as f32 > 0.3);
}
