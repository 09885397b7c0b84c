//! Per-frame placement and render loop, driven by the XR session's
//! animation-frame callback.

use crate::render::GlState;
use crate::xr;
use ar_core::config::ViewConfig;
use ar_core::PlacementSession;
use glam::Mat4;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub struct FrameContext {
    pub session: web::XrSession,
    pub base_space: web::XrReferenceSpace,
    pub gl_layer: web::XrWebGlLayer,
    pub renderer: Rc<RefCell<GlState>>,

    pub placement: Rc<RefCell<PlacementSession>>,
    pub config: Rc<RefCell<ViewConfig>>,
    pub hit_source: Rc<RefCell<Option<web::XrHitTestSource>>>,
    pub select_queued: Rc<Cell<bool>>,
    pub ended: Rc<Cell<bool>>,

    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self, _time: f64, xr_frame: &web::XrFrame) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;

        // 1. Issue the hit-test source request, at most once per session.
        if self.placement.borrow_mut().begin_hit_source_request() {
            spawn_local(xr::resolve_hit_test_source(
                self.session.clone(),
                self.placement.clone(),
                self.hit_source.clone(),
            ));
        }

        // 2. Freshest hit-test pose drives the reticle. The pose must land
        //    before any select is consumed so placement reads this frame's
        //    reticle transform.
        if self.hit_source.borrow().is_some() {
            let pose = self.best_hit_pose(xr_frame);
            self.placement.borrow_mut().update_reticle(pose);
        }

        // 3. Consume a queued tap.
        if self.select_queued.replace(false) {
            let config = *self.config.borrow();
            let mut placement = self.placement.borrow_mut();
            if let Some(index) = placement.place(&config) {
                let model = &placement.objects()[index].model;
                if let Err(e) = self.renderer.borrow_mut().ensure_object(index, model) {
                    log::error!("object upload failed: {e:?}");
                }
            }
        }

        // 4. Idle spin, wall-clock integrated.
        self.placement.borrow_mut().advance(dt);

        // 5. Render all views of the frame.
        self.render(xr_frame);
    }

    /// Pose matrix of the frame's first hit-test result, if it resolves
    /// against the base space.
    fn best_hit_pose(&self, xr_frame: &web::XrFrame) -> Option<Mat4> {
        let slot = self.hit_source.borrow();
        let source = slot.as_ref()?;
        let results = xr_frame.get_hit_test_results(source);
        let first: web::XrHitTestResult = results.get(0).dyn_into().ok()?;
        let pose = first.get_pose(&self.base_space)?;
        let matrix = pose.transform().matrix();
        (matrix.len() == 16).then(|| Mat4::from_cols_slice(&matrix))
    }

    fn render(&mut self, xr_frame: &web::XrFrame) {
        let Some(viewer_pose) = xr_frame.get_viewer_pose(&self.base_space) else {
            return;
        };

        let renderer = self.renderer.borrow();
        let framebuffer = self.gl_layer.framebuffer();
        renderer.begin_frame(
            framebuffer.as_ref(),
            self.gl_layer.framebuffer_width() as i32,
            self.gl_layer.framebuffer_height() as i32,
        );

        let placement = self.placement.borrow();
        for view_value in viewer_pose.views().iter() {
            let Ok(view) = view_value.dyn_into::<web::XrView>() else {
                continue;
            };
            if let Some(viewport) = self.gl_layer.get_viewport(&view) {
                renderer.set_viewport(
                    viewport.x(),
                    viewport.y(),
                    viewport.width(),
                    viewport.height(),
                );
            }
            let projection = view.projection_matrix();
            let view_matrix = view.transform().inverse().matrix();
            if projection.len() != 16 || view_matrix.len() != 16 {
                continue;
            }
            renderer.set_view_projection(
                &Mat4::from_cols_slice(&view_matrix),
                &Mat4::from_cols_slice(&projection),
            );

            if placement.reticle().is_visible() {
                renderer.draw_reticle(placement.reticle().matrix());
            }
            renderer.draw_objects(&placement);
        }
    }
}

/// Arm the session-driven animation loop. The closure re-arms itself every
/// frame until the session's `end` event flips the flag; after that no
/// callback fires again.
pub fn start_loop(ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64, web::XrFrame)>>>> =
        Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let ctx_tick = ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(
        move |time: f64, xr_frame: web::XrFrame| {
            let mut c = ctx_tick.borrow_mut();
            if c.ended.get() {
                return;
            }
            c.frame(time, &xr_frame);
            if !c.ended.get() {
                let _ = c.session.request_animation_frame(
                    tick_clone
                        .borrow()
                        .as_ref()
                        .unwrap()
                        .as_ref()
                        .unchecked_ref(),
                );
            }
        },
    )
        as Box<dyn FnMut(f64, web::XrFrame)>));

    let session = ctx.borrow().session.clone();
    let _ = session
        .request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
}
