use handcloud_core::{
    ParticleColor, ParticleController, ParticleRenderer, RenderFrame, SceneConfig, ShapeKind,
};

fn seeded_config(count: usize) -> SceneConfig {
    SceneConfig {
        particle_count: count,
        seed: Some(2024),
        ..Default::default()
    }
}

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<(u64, usize, f32)>,
}

impl ParticleRenderer for RecordingRenderer {
    fn present(&mut self, frame: &RenderFrame<'_>) {
        self.frames
            .push((frame.frame_index, frame.positions.len(), frame.transform.scale));
    }
}

#[test]
fn test_set_same_shape_resamples() {
    let mut controller = ParticleController::new(&seeded_config(400));
    let before = controller.buffer().positions().to_vec();

    controller.set_shape(controller.shape());

    assert_eq!(controller.buffer().len(), before.len());
    assert_ne!(controller.buffer().positions(), before.as_slice());
}

#[test]
fn test_set_count_reallocates() {
    let mut controller = ParticleController::new(&seeded_config(100));
    controller.set_count(2000);
    assert_eq!(controller.buffer().len(), 2000);
    assert_eq!(controller.buffer().color_data().len(), 6000);

    controller.set_count(0);
    assert!(controller.buffer().is_empty());
    controller.tick(1.0 / 60.0);
}

#[test]
fn test_shape_change_keeps_color() {
    let mut controller = ParticleController::new(&seeded_config(50));
    controller.set_color(ParticleColor::from_hex(0x4caf50));
    controller.set_shape(ShapeKind::Fireworks);
    let expected = ParticleColor::from_hex(0x4caf50).to_array();
    assert!(controller.buffer().colors().iter().all(|c| *c == expected));
}

#[test]
fn test_distance_is_clamped() {
    let mut controller = ParticleController::new(&seeded_config(10));
    controller.set_distance(7.5);
    assert_eq!(controller.distance().value(), 1.0);
    assert_eq!(controller.tick(1.0 / 60.0).scale, 2.5);

    controller.set_distance(-1.0);
    assert_eq!(controller.tick(1.0 / 60.0).scale, 0.5);
}

#[test]
fn test_present_hands_frames_to_renderer() {
    let mut controller = ParticleController::new(&seeded_config(25));
    let mut renderer = RecordingRenderer::default();

    for _ in 0..3 {
        controller.tick(1.0 / 60.0);
        controller.present(&mut renderer);
    }

    assert_eq!(renderer.frames.len(), 3);
    assert_eq!(renderer.frames[2].0, 3);
    assert!(renderer.frames.iter().all(|(_, n, _)| *n == 25));
    assert!(renderer.frames.iter().all(|(_, _, s)| *s == 1.5));
}

#[test]
fn test_seeded_controllers_are_reproducible() {
    let mut a = ParticleController::new(&seeded_config(80));
    let mut b = ParticleController::new(&seeded_config(80));
    for _ in 0..10 {
        a.tick(1.0 / 60.0);
        b.tick(1.0 / 60.0);
    }
    assert_eq!(a.buffer().positions(), b.buffer().positions());
}
