use hero_core::{tick, FrameGate, InputState, Scene, TickOutcome};
use hero_render::GpuState;
use instant::Instant;
use rand::rngs::StdRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Per-mount state touched by the animation frame callback.
pub struct HeroInstance {
    pub scene: Scene,
    pub input: Rc<RefCell<InputState>>,
    pub gpu: Option<GpuState<'static>>,
    pub canvas: web::HtmlCanvasElement,
    pub rng: StdRng,
    pub last_instant: Instant,
}

impl HeroInstance {
    pub fn frame(&mut self, gate: &FrameGate) -> TickOutcome {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        let size = (self.canvas.width(), self.canvas.height());
        if size != self.scene.surface_size() {
            self.scene.resize(size.0, size.1);
        }

        let input = self.input.borrow();
        tick(gate, &mut self.scene, &input, dt, &mut self.rng, self.gpu.as_mut())
    }

    /// Release GPU resources. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.dispose();
        }
    }
}

/// requestAnimationFrame driver. The callback checks the gate before doing
/// anything, so a frame queued before unmount never touches the scene.
pub struct FrameLoop {
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameLoop {
    pub fn start(instance: Rc<RefCell<HeroInstance>>, gate: FrameGate) -> Self {
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

        let pending_tick = pending.clone();
        let callback_tick = callback.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            pending_tick.set(None);
            if !gate.is_running() {
                return;
            }
            if let Ok(mut inst) = instance.try_borrow_mut() {
                if inst.frame(&gate) == TickOutcome::RenderFailed {
                    log::warn!("[frame] dropping renderer after failure; scene keeps animating");
                    inst.dispose();
                }
            }
            pending_tick.set(request_frame(&callback_tick));
        }) as Box<dyn FnMut()>));

        pending.set(request_frame(&callback));
        Self { pending, callback }
    }

    /// Cancel the queued frame and drop the callback, breaking its self-reference.
    pub fn cancel(&self) {
        if let (Some(id), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

fn request_frame(callback: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) -> Option<i32> {
    let window = web::window()?;
    let slot = callback.borrow();
    let closure = slot.as_ref()?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}
