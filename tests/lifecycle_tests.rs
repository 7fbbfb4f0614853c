use hero_core::{
    tick, DisposeOnce, FrameGate, HeroConfig, InputState, LoopState, Renderer, ResourceKind,
    ResourceLedger, Scene, TickOutcome,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct CountingRenderer {
    frames: usize,
    fail: bool,
    size: Option<(u32, u32)>,
}

impl Renderer for CountingRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }

    fn render(&mut self, _scene: &Scene) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("device lost");
        }
        self.frames += 1;
        Ok(())
    }
}

fn scene() -> Scene {
    let mut rng = StdRng::seed_from_u64(1);
    Scene::build(&HeroConfig::low_poly_peak(), &mut rng).expect("preset builds")
}

#[test]
fn gate_stops_exactly_once() {
    let gate = FrameGate::new();
    let observer = gate.clone();
    assert_eq!(gate.state(), LoopState::Running);
    assert!(gate.stop());
    assert!(!gate.stop());
    assert!(!observer.is_running());
}

#[test]
fn queued_tick_after_stop_is_a_no_op() {
    let gate = FrameGate::new();
    let mut scene = scene();
    let input = InputState::new(800.0, 600.0);
    let mut rng = StdRng::seed_from_u64(2);
    let mut renderer = CountingRenderer::default();

    assert_eq!(
        tick(&gate, &mut scene, &input, 1.0 / 60.0, &mut rng, Some(&mut renderer)),
        TickOutcome::Rendered
    );
    gate.stop();
    let elapsed = scene.elapsed();
    assert_eq!(
        tick(&gate, &mut scene, &input, 1.0 / 60.0, &mut rng, Some(&mut renderer)),
        TickOutcome::Stopped
    );
    assert_eq!(scene.elapsed(), elapsed);
    assert_eq!(scene.frame_count(), 1);
    assert_eq!(renderer.frames, 1);
}

#[test]
fn scene_animates_without_a_renderer() {
    let gate = FrameGate::new();
    let mut scene = scene();
    let input = InputState::new(800.0, 600.0);
    let mut rng = StdRng::seed_from_u64(3);
    let outcome = tick::<CountingRenderer>(&gate, &mut scene, &input, 0.05, &mut rng, None);
    assert_eq!(outcome, TickOutcome::Headless);
    assert!(scene.elapsed() > 0.0);
}

#[test]
fn render_failure_is_reported_not_raised() {
    let gate = FrameGate::new();
    let mut scene = scene();
    let input = InputState::new(800.0, 600.0);
    let mut rng = StdRng::seed_from_u64(4);
    let mut renderer = CountingRenderer {
        fail: true,
        ..Default::default()
    };
    let outcome = tick(&gate, &mut scene, &input, 0.016, &mut rng, Some(&mut renderer));
    assert_eq!(outcome, TickOutcome::RenderFailed);
    assert!(gate.is_running());
}

#[test]
fn renderer_follows_the_scene_surface_size() {
    let gate = FrameGate::new();
    let mut scene = scene();
    let input = InputState::new(800.0, 600.0);
    let mut rng = StdRng::seed_from_u64(5);
    let mut renderer = CountingRenderer::default();

    scene.resize(1024, 768);
    tick(&gate, &mut scene, &input, 0.016, &mut rng, Some(&mut renderer));
    assert_eq!(renderer.size, Some((1024, 768)));

    scene.resize(0, 300);
    scene.resize(640, 480);
    tick(&gate, &mut scene, &input, 0.016, &mut rng, Some(&mut renderer));
    assert_eq!(renderer.size, Some((640, 480)));

    gate.stop();
    scene.resize(320, 200);
    tick(&gate, &mut scene, &input, 0.016, &mut rng, Some(&mut renderer));
    assert_eq!(renderer.size, Some((640, 480)));
}

#[test]
fn ledger_releases_each_resource_once() {
    let mut ledger = ResourceLedger::new();
    let vb = ledger.acquire(ResourceKind::Buffer, "vertices");
    let tex = ledger.acquire(ResourceKind::Texture, "snowcap");
    let pipe = ledger.acquire(ResourceKind::Pipeline, "mesh");
    assert_eq!(ledger.live_count(), 3);
    assert_eq!(ledger.live_of_kind(ResourceKind::Texture), 1);

    assert!(ledger.release(tex));
    assert!(!ledger.release(tex));
    assert!(!ledger.is_live(tex));

    assert_eq!(ledger.release_all(), vec![vb, pipe]);
    assert!(ledger.release_all().is_empty());
    assert_eq!(ledger.live_count(), 0);
    assert_eq!(ledger.acquired_count(), 3);
}

#[test]
fn teardown_runs_once_even_after_partial_construction() {
    let mut ledger = ResourceLedger::new();
    let surface = ledger.acquire(ResourceKind::Surface, "surface");
    // GPU init "failed" before any buffers were made.
    let buffers: Option<Vec<hero_core::ResourceId>> = None;

    let mut once = DisposeOnce::default();
    let mut runs = 0;
    for _ in 0..3 {
        once.run(|| {
            runs += 1;
            for id in buffers.iter().flatten() {
                ledger.release(*id);
            }
            ledger.release(surface);
            ledger.release_all();
        });
    }
    assert_eq!(runs, 1);
    assert!(once.is_disposed());
    assert_eq!(ledger.live_count(), 0);
}
