use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fly_demo::camera::{displacement, forward_from_angles, CameraSettings, FlyCamera, MoveKeys, Projection};
use fly_demo::core::{Button, InputHandler};
use glam::{Vec2, Vec3};

fn camera() -> FlyCamera {
    FlyCamera::new(
        CameraSettings::default(),
        Projection::new(90.0, 16.0 / 9.0, 0.000001, 100.0),
        0.0,
    )
}

fn bench_basis(c: &mut Criterion) {
    c.bench_function("forward_from_angles", |b| {
        b.iter(|| forward_from_angles(black_box(0.3), black_box(-0.2)))
    });

    let keys = MoveKeys {
        forward: true,
        right: true,
        ..Default::default()
    };
    c.bench_function("displacement_diagonal", |b| {
        b.iter(|| {
            displacement(
                black_box(keys),
                black_box(Vec3::NEG_Z),
                black_box(Vec3::X),
                5.0,
                black_box(1.0 / 144.0),
            )
        })
    });
}

fn bench_frame(c: &mut Criterion) {
    c.bench_function("fly_camera_frame", |b| {
        let mut camera = camera();
        camera.on_key_down(Button::KeyW);
        camera.on_key_down(Button::KeyD);
        let mut now = 0.0;
        b.iter(|| {
            now += 1.0 / 144.0;
            black_box(camera.on_frame(now))
        })
    });

    c.bench_function("fly_camera_drag_and_uniform", |b| {
        let mut camera = camera();
        camera.on_pointer_down(Vec2::ZERO);
        let mut x = 0.0;
        b.iter(|| {
            x += 1.0;
            camera.on_pointer_drag(Vec2::new(x, 0.5 * x), true);
            black_box(camera.to_uniform([2560.0, 1440.0], 1.0))
        })
    });
}

criterion_group!(benches, bench_basis, bench_frame);
criterion_main!(benches);
