//! The renderer seam and a single gated tick, shared by both front-ends.

use crate::input::InputState;
use crate::lifecycle::FrameGate;
use crate::scene::Scene;
use rand::Rng;

/// Something that can draw a [`Scene`] to an output surface.
pub trait Renderer {
    /// Match the output to the scene's surface size. Called before every
    /// render; implementations ignore unchanged or zero sizes.
    fn resize(&mut self, width: u32, height: u32);
    fn render(&mut self, scene: &Scene) -> anyhow::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The gate was closed; nothing was touched.
    Stopped,
    Rendered,
    /// Scene advanced but there is no renderer (GPU init failed).
    Headless,
    RenderFailed,
}

/// Advance the scene and render it once, unless the loop has been stopped.
pub fn tick<R: Renderer + ?Sized>(
    gate: &FrameGate,
    scene: &mut Scene,
    input: &InputState,
    dt: f32,
    rng: &mut impl Rng,
    renderer: Option<&mut R>,
) -> TickOutcome {
    if !gate.is_running() {
        return TickOutcome::Stopped;
    }
    scene.advance(dt, input, rng);
    match renderer {
        None => TickOutcome::Headless,
        Some(r) => {
            let (width, height) = scene.surface_size();
            r.resize(width, height);
            match r.render(scene) {
                Ok(()) => TickOutcome::Rendered,
                Err(e) => {
                    log::warn!("[frame] render failed: {e:#}");
                    TickOutcome::RenderFailed
                }
            }
        }
    }
}
