//! Inline (non-immersive) preview: renders the currently configured product
//! spinning on the page canvas whenever no AR session is live, so the user
//! sees color, size, and shape changes before placing anything.

use crate::render::{GlMesh, GlState};
use ar_core::config::{Shape, ViewConfig};
use ar_core::constants::SPIN_RATE;
use ar_core::factory;
use ar_core::state::Camera;
use ar_core::PlacedObject;
use glam::{Quat, Vec3};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

// Where the preview product sits relative to the fixed camera at the origin.
const PREVIEW_POSITION: Vec3 = Vec3::new(0.0, -0.1, -1.2);

pub struct Preview {
    renderer: Rc<RefCell<GlState>>,
    config: Rc<RefCell<ViewConfig>>,
    session_active: Rc<Cell<bool>>,
    canvas: web::HtmlCanvasElement,
    meshes: Vec<GlMesh>,
    object: PlacedObject,
    uploaded_shape: Shape,
    last_instant: Instant,
}

impl Preview {
    pub fn new(
        renderer: Rc<RefCell<GlState>>,
        config: Rc<RefCell<ViewConfig>>,
        session_active: Rc<Cell<bool>>,
        canvas: web::HtmlCanvasElement,
    ) -> anyhow::Result<Self> {
        let cfg = *config.borrow();
        let object = preview_object(&cfg);
        let meshes = renderer
            .borrow()
            .upload_model(&object.model)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Self {
            renderer,
            config,
            session_active,
            canvas,
            meshes,
            object,
            uploaded_shape: cfg.shape,
            last_instant: Instant::now(),
        })
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        // The immersive session owns the GL context while it runs.
        if self.session_active.get() {
            return;
        }

        let cfg = *self.config.borrow();
        if cfg.shape != self.uploaded_shape {
            self.object = preview_object(&cfg);
            match self.renderer.borrow().upload_model(&self.object.model) {
                Ok(meshes) => {
                    self.meshes = meshes;
                    self.uploaded_shape = cfg.shape;
                }
                Err(e) => {
                    log::error!("preview upload failed: {:?}", e);
                    return;
                }
            }
        }
        // Color and size flow through uniforms; the factory puts the shape
        // part last, after the fixed-tint base.
        self.object.model.scale = cfg.size;
        if let Some(shape_part) = self.object.model.parts.last_mut() {
            shape_part.color = cfg.color;
        }
        self.object.spin_angle += SPIN_RATE * dt;

        let width = self.canvas.width();
        let height = self.canvas.height();
        if width == 0 || height == 0 {
            return;
        }
        let camera = Camera::for_viewer(width as f32 / height as f32);
        let renderer = self.renderer.borrow();
        renderer.begin_frame(None, width as i32, height as i32);
        renderer.set_view_projection(&camera.view_matrix(), &camera.projection_matrix());
        renderer.draw_model(&self.meshes, &self.object);
    }
}

fn preview_object(config: &ViewConfig) -> PlacedObject {
    PlacedObject {
        model: factory::build_object(config),
        position: PREVIEW_POSITION,
        rotation: Quat::IDENTITY,
        spin_angle: 0.0,
    }
}

/// Arm the window-driven preview loop. Runs for the page lifetime; frames
/// during an immersive session skip drawing and keep re-arming.
pub fn start_loop(preview: Preview) {
    let preview = Rc::new(RefCell::new(preview));
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        preview.borrow_mut().tick();
        if let Some(window) = web::window() {
            let _ = window.request_animation_frame(
                tick_clone.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(window) = web::window() {
        let _ = window
            .request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
