//! WebXR session control: capability query, session start with the hit-test
//! feature, reference spaces, and best-effort teardown.

use ar_core::state::ArSupport;
use ar_core::PlacementSession;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub struct SessionHandles {
    pub session: web::XrSession,
    pub base_space: web::XrReferenceSpace,
    pub gl_layer: web::XrWebGlLayer,
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

/// `navigator.xr`, or None on browsers without WebXR at all.
pub fn xr_system(window: &web::Window) -> Option<web::XrSystem> {
    let navigator = window.navigator();
    let has_xr = js_sys::Reflect::has(navigator.as_ref(), &JsValue::from_str("xr"))
        .unwrap_or(false);
    has_xr.then(|| navigator.xr())
}

/// One-shot immersive-AR capability query, reported as a value. Any failure
/// along the way counts as unsupported, never as an error.
pub async fn query_support(window: &web::Window) -> ArSupport {
    let Some(xr) = xr_system(window) else {
        return ArSupport::Unsupported;
    };
    let supported = JsFuture::from(xr.is_session_supported(web::XrSessionMode::ImmersiveAr))
        .await
        .map(|v| v.as_bool().unwrap_or(false))
        .unwrap_or(false);
    ArSupport::from_query(supported)
}

/// XR-compatible WebGL2 context on the viewer canvas, alpha-enabled so the
/// camera image composites behind the scene.
pub fn create_xr_gl_context(
    canvas: &web::HtmlCanvasElement,
) -> anyhow::Result<web::WebGl2RenderingContext> {
    let attrs = js_sys::Object::new();
    js_sys::Reflect::set(&attrs, &"xrCompatible".into(), &JsValue::TRUE).map_err(js_err)?;
    js_sys::Reflect::set(&attrs, &"alpha".into(), &JsValue::TRUE).map_err(js_err)?;
    js_sys::Reflect::set(&attrs, &"antialias".into(), &JsValue::TRUE).map_err(js_err)?;
    let ctx = canvas
        .get_context_with_context_options("webgl2", &attrs)
        .map_err(js_err)?
        .ok_or_else(|| anyhow::anyhow!("webgl2 context unavailable"))?;
    ctx.dyn_into::<web::WebGl2RenderingContext>()
        .map_err(|_| anyhow::anyhow!("unexpected rendering context type"))
}

/// Request an immersive-ar session requiring hit-test, wire its WebGL layer,
/// and resolve the `local` base reference space.
///
/// Must be called from a user gesture; a failure here is logged by the caller
/// and otherwise left to the platform's default handling.
pub async fn request_session(
    window: &web::Window,
    gl: &web::WebGl2RenderingContext,
) -> anyhow::Result<SessionHandles> {
    let xr = xr_system(window).ok_or_else(|| anyhow::anyhow!("webxr unavailable"))?;

    let session_init = web::XrSessionInit::new();
    let required = js_sys::Array::of1(&JsValue::from_str("hit-test"));
    session_init.set_required_features(&required);
    let session: web::XrSession = JsFuture::from(
        xr.request_session_with_options(web::XrSessionMode::ImmersiveAr, &session_init),
    )
    .await
    .map_err(js_err)?
    .dyn_into()
    .map_err(|_| anyhow::anyhow!("request_session resolved to a non-session value"))?;

    let gl_layer =
        web::XrWebGlLayer::new_with_web_gl2_rendering_context(&session, gl).map_err(js_err)?;
    let render_state = web::XrRenderStateInit::new();
    render_state.set_base_layer(Some(&gl_layer));
    session.update_render_state_with_state(&render_state);

    let base_space: web::XrReferenceSpace = JsFuture::from(
        session.request_reference_space(web::XrReferenceSpaceType::Local),
    )
    .await
    .map_err(js_err)?
    .dyn_into()
    .map_err(|_| anyhow::anyhow!("local reference space request resolved oddly"))?;

    Ok(SessionHandles {
        session,
        base_space,
        gl_layer,
    })
}

/// Resolve the viewer-scoped hit-test source for the session and store it in
/// the shared slot. Fire-once: the placement session's status guard ensures
/// this runs at most once per session, and a failure parks it permanently.
pub async fn resolve_hit_test_source(
    session: web::XrSession,
    placement: Rc<RefCell<PlacementSession>>,
    slot: Rc<RefCell<Option<web::XrHitTestSource>>>,
) {
    let result = async {
        let viewer_space: web::XrReferenceSpace = JsFuture::from(
            session.request_reference_space(web::XrReferenceSpaceType::Viewer),
        )
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("viewer reference space request resolved oddly"))?;

        let options = web::XrHitTestOptionsInit::new();
        options.set_space(&viewer_space);
        let source: web::XrHitTestSource =
            JsFuture::from(session.request_hit_test_source(&options))
                .await
                .map_err(js_err)?
                .dyn_into()
                .map_err(|_| anyhow::anyhow!("hit-test source request resolved oddly"))?;
        Ok::<_, anyhow::Error>(source)
    }
    .await;

    match result {
        Ok(source) => {
            *slot.borrow_mut() = Some(source);
            placement.borrow_mut().hit_source_ready();
            log::info!("hit-test source ready");
        }
        Err(e) => {
            placement.borrow_mut().hit_source_failed();
            log::error!("hit-test source request failed: {e:?}");
        }
    }
}

/// End the session, swallowing the rejection an already-ended session raises.
/// Expected during teardown races; deliberately not propagated.
pub fn end_session(session: &web::XrSession) {
    let ignore = Closure::wrap(Box::new(move |_e: JsValue| {}) as Box<dyn FnMut(JsValue)>);
    let _ = session.end().catch(&ignore);
    ignore.forget();
}

/// Cancel and drop the hit-test source if one was resolved.
pub fn release_hit_test_source(slot: &Rc<RefCell<Option<web::XrHitTestSource>>>) {
    if let Some(source) = slot.borrow_mut().take() {
        source.cancel();
    }
}
