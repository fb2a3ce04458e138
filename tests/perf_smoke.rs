use particula_rigid::World;

#[test]
fn perf_smoke_step() {
    let mut world = World::new(64.0, 32.0);
    world.enable_perf_metrics(true);
    for x in 0..30 {
        for y in 0..8 {
            world
                .spawn_circle(1.0 + x as f64 * 2.1, 1.0 + y as f64 * 2.1, 1.0, 1.0)
                .unwrap();
        }
    }
    world.step(1.0 / 60.0);
    let stats = world.get_perf_stats();
    assert!(stats.step_ms() >= 0.0);
    assert_eq!(stats.body_count(), 240);
    assert!(stats.contact_count() >= 30);
}
