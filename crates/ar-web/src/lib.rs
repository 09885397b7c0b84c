#![cfg(target_arch = "wasm32")]
use ar_core::config::ViewConfig;
use ar_core::state::ArSupport;
use ar_core::PlacementSession;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod controls;
mod dom;
mod frame;
mod overlay;
mod preview;
mod render;
mod xr;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ar-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id("ar-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #ar-canvas"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let config = Rc::new(RefCell::new(ViewConfig::default()));
    let placement = Rc::new(RefCell::new(PlacementSession::new()));
    controls::wire_controls(controls::ControlWiring {
        document: document.clone(),
        config: config.clone(),
        placement: placement.clone(),
    });

    // Shared GL context and renderer. Created up front, before any session
    // can exist, so a renderer failure never strands a live session.
    let gl = xr::create_xr_gl_context(&canvas)?;
    let renderer = Rc::new(RefCell::new(
        render::GlState::new(gl.clone()).map_err(|e| anyhow::anyhow!("{:?}", e))?,
    ));

    // One-shot capability query; unsupported surfaces the advisory notice.
    let support = Rc::new(Cell::new(ArSupport::Unknown));
    {
        let support = support.clone();
        let window = window.clone();
        let document = document.clone();
        spawn_local(async move {
            let result = xr::query_support(&window).await;
            support.set(result);
            log::info!("immersive-ar support: {:?}", result);
            if !result.is_supported() {
                overlay::show_unsupported(&document);
            }
        });
    }

    // Start button: the user gesture immersive sessions require. While a
    // session is live the same button ends it.
    let session_active = Rc::new(Cell::new(false));
    let current_session: Rc<RefCell<Option<web::XrSession>>> = Rc::new(RefCell::new(None));
    {
        let support = support.clone();
        let session_active = session_active.clone();
        let current_session = current_session.clone();
        let gl = gl.clone();
        let renderer = renderer.clone();
        let config = config.clone();
        let placement = placement.clone();
        dom::add_click_listener(&document, controls::START_BUTTON_ID, move || {
            if session_active.get() {
                if let Some(session) = current_session.borrow().as_ref() {
                    xr::end_session(session);
                }
                return;
            }
            if !support.get().is_supported() {
                log::warn!("[gesture] immersive-ar not supported (or still probing); ignoring start");
                return;
            }
            session_active.set(true);
            let session_active = session_active.clone();
            let current_session = current_session.clone();
            let gl = gl.clone();
            let renderer = renderer.clone();
            let config = config.clone();
            let placement = placement.clone();
            spawn_local(async move {
                let launched = launch(
                    gl,
                    renderer,
                    config,
                    placement,
                    session_active.clone(),
                    current_session.clone(),
                )
                .await;
                if let Err(e) = launched {
                    // No retry: surface and fall back to the platform default.
                    // A session created before the failure must not outlive it.
                    log::error!("session start failed: {e:?}");
                    if let Some(session) = current_session.borrow_mut().take() {
                        xr::end_session(&session);
                    }
                    session_active.set(false);
                }
            });
        });
    }

    // Inline preview of the configured product while no session is live.
    let preview = preview::Preview::new(renderer, config, session_active, canvas)?;
    preview::start_loop(preview);

    Ok(())
}

/// Start one AR session and arm its frame loop. Returns once the session is
/// running; teardown is driven by the session's `end` event.
async fn launch(
    gl: web::WebGl2RenderingContext,
    renderer: Rc<RefCell<render::GlState>>,
    config: Rc<RefCell<ViewConfig>>,
    placement: Rc<RefCell<PlacementSession>>,
    session_active: Rc<Cell<bool>>,
    current_session: Rc<RefCell<Option<web::XrSession>>>,
) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;

    placement.borrow_mut().reset();
    let handles = xr::request_session(&window, &gl).await?;
    *current_session.borrow_mut() = Some(handles.session.clone());

    let hit_source: Rc<RefCell<Option<web::XrHitTestSource>>> = Rc::new(RefCell::new(None));
    let select_queued = Rc::new(Cell::new(false));
    let ended = Rc::new(Cell::new(false));

    // Session end (ours or external): stop the loop, release the hit-test
    // source, reset placement, drop the advisory hint. Registered first so
    // every exit path from here on reaches this cleanup.
    {
        let ended = ended.clone();
        let session_active = session_active.clone();
        let current_session = current_session.clone();
        let hit_source = hit_source.clone();
        let placement = placement.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
            ended.set(true);
            session_active.set(false);
            current_session.borrow_mut().take();
            xr::release_hit_test_source(&hit_source);
            placement.borrow_mut().reset();
            if let Some(document) = dom::window_document() {
                overlay::hide_hint(&document);
                dom::set_text(&document, controls::START_BUTTON_ID, "Start AR");
            }
            log::info!("ar session ended");
        }) as Box<dyn FnMut(_)>);
        let _ = handles
            .session
            .add_event_listener_with_callback("end", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Taps are only queued here; the frame loop consumes them after the
    // frame's hit-test pose has been applied to the reticle.
    {
        let select_queued = select_queued.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::XrInputSourceEvent| {
            select_queued.set(true);
        }) as Box<dyn FnMut(_)>);
        let _ = handles
            .session
            .add_event_listener_with_callback("select", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    if let Some(document) = dom::window_document() {
        overlay::show_hint(&document);
        dom::set_text(&document, controls::START_BUTTON_ID, "Stop AR");
    }

    let ctx = Rc::new(RefCell::new(frame::FrameContext {
        session: handles.session,
        base_space: handles.base_space,
        gl_layer: handles.gl_layer,
        renderer,
        placement,
        config,
        hit_source,
        select_queued,
        ended,
        last_instant: Instant::now(),
    }));
    frame::start_loop(ctx);
    Ok(())
}
