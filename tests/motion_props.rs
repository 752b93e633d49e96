use glam::Vec2;
use proptest::prelude::*;
use starfish_collector::sim::MotionState;

fn velocity() -> impl Strategy<Value = Vec2> {
    (0.0f32..500.0, 0.0f32..360.0).prop_map(|(speed, angle)| {
        let (sin, cos) = angle.to_radians().sin_cos();
        Vec2::new(speed * cos, speed * sin)
    })
}

proptest! {
    #[test]
    fn coasting_without_deceleration_keeps_speed(v in velocity(), dt in 0.001f32..0.5) {
        let mut m = MotionState::new(0.0, 1000.0, 0.0);
        m.velocity = v;
        let before = m.speed();
        m.apply_physics(dt);
        prop_assert!((m.speed() - before).abs() <= 1e-3 * before.max(1.0));
    }

    #[test]
    fn deceleration_removes_k_dt_floored_at_zero(
        v in velocity(),
        k in 0.0f32..1000.0,
        dt in 0.001f32..0.5,
    ) {
        let mut m = MotionState::new(0.0, 1000.0, k);
        m.velocity = v;
        let expected = (m.speed() - k * dt).max(0.0);
        m.apply_physics(dt);
        prop_assert!((m.speed() - expected).abs() <= 1e-3 * expected.max(1.0));
    }

    #[test]
    fn speed_never_exceeds_max(
        v in velocity(),
        accel in 0.0f32..1.0e6,
        max_speed in 1.0f32..1000.0,
        angles in prop::collection::vec(0.0f32..360.0, 0..6),
        dt in 0.001f32..0.5,
    ) {
        let mut m = MotionState::new(accel, max_speed, 0.0);
        m.velocity = v;
        for a in &angles {
            m.accelerate_at_angle(*a);
        }
        let step = m.apply_physics(dt);
        prop_assert!(m.speed() <= max_speed * (1.0 + 1e-5));
        prop_assert!((step.displacement - step.velocity * dt).length() < 1e-3);
        prop_assert_eq!(m.accumulated, Vec2::ZERO);
    }
}

#[test]
fn turtle_ramp_to_max_speed() {
    let mut m = MotionState::new(400.0, 100.0, 400.0);
    let dt = 0.25 / 25.0;
    let mut travelled = Vec2::ZERO;
    for _ in 0..25 {
        m.accelerate_at_angle(0.0);
        travelled += m.apply_physics(dt).displacement;
    }
    assert!((m.speed() - 100.0).abs() < 1e-2);
    // 0 -> 100 ramp over 0.25s covers 12.5 px; the explicit step overshoots by one slice
    assert!((travelled.x - 13.0).abs() < 1e-2, "travelled {}", travelled.x);
    assert!(travelled.y.abs() < 1e-4);
}
