//! Desktop preview of the hero scene.
//!
//! Usage: `hero-native [preset]` where preset is one of the built-in names.
//! The mouse wheel stands in for page scroll.

use std::sync::Arc;

use hero_core::{tick, FrameGate, HeroConfig, InputState, Scene, TickOutcome};
use hero_render::GpuState;
use instant::Instant;
use rand::{rngs::StdRng, SeedableRng};
use winit::{
    event::{Event, MouseScrollDelta, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

const LINE_SCROLL_PX: f32 = 40.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let preset = std::env::args().nth(1).unwrap_or_else(|| "low_poly_peak".to_string());
    let config = HeroConfig::preset(&preset)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(format!("Hero scene: {preset}"))
            .build(&event_loop)?,
    );
    let size = window.inner_size();

    let mut scene = Scene::build(&config, &mut rng)?;
    scene.resize(size.width, size.height);
    let mut input = InputState::new(size.width as f32, size.height as f32);

    // The scene keeps animating without a GPU, matching the web front-end.
    let mut gpu = match pollster::block_on(GpuState::new(
        Arc::clone(&window),
        size.width,
        size.height,
        &scene,
    )) {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            log::error!("[native] gpu init failed: {e:#}");
            None
        }
    };

    let gate = FrameGate::new();
    let mut last_frame = Instant::now();
    let mut scroll_px = 0.0f32;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                scene.resize(size.width, size.height);
                input.resize(size.width as f32, size.height as f32);
            }
            WindowEvent::CursorMoved { position, .. } => {
                input.set_pointer_px(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * LINE_SCROLL_PX,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                scroll_px = (scroll_px - dy).max(0.0);
                input.set_scroll(scroll_px);
            }
            WindowEvent::CloseRequested => {
                gate.stop();
                if let Some(gpu) = gpu.as_mut() {
                    gpu.dispose();
                }
                elwt.exit();
            }
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            let dt = (now - last_frame).as_secs_f32();
            last_frame = now;
            match tick(&gate, &mut scene, &input, dt, &mut rng, gpu.as_mut()) {
                TickOutcome::Stopped => {}
                TickOutcome::RenderFailed => {
                    log::error!("[native] unrecoverable render error, exiting");
                    elwt.exit();
                }
                TickOutcome::Rendered | TickOutcome::Headless => window.request_redraw(),
            }
        }
        _ => {}
    })?;
    Ok(())
}
