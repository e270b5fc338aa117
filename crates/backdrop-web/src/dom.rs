use backdrop_core::Viewport;
use wasm_bindgen::JsCast;
use web_sys as web;

const CANVAS_STYLE: &str =
    "position:fixed;inset:0;width:100vw;height:100vh;pointer-events:none;z-index:-10;";

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

/// Find the backdrop canvas, creating and styling it when the page has none.
/// The flag tells whether this call created it.
pub fn ensure_canvas(
    document: &web::Document,
    id: &str,
) -> anyhow::Result<(web::HtmlCanvasElement, bool)> {
    if let Some(el) = document.get_element_by_id(id) {
        let canvas = el
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|_| anyhow::anyhow!("#{id} is not a canvas"))?;
        return Ok((canvas, false));
    }
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("document has no body"))?;
    let canvas = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("create canvas: {e:?}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| anyhow::anyhow!("created element is not a canvas"))?;
    canvas.set_id(id);
    let _ = canvas.set_attribute("aria-hidden", "true");
    canvas
        .set_attribute("style", CANVAS_STYLE)
        .map_err(|e| anyhow::anyhow!("style canvas: {e:?}"))?;
    body.append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("append canvas: {e:?}"))?;
    Ok((canvas, true))
}

/// Current window size in CSS pixels plus the device pixel ratio.
pub fn viewport(window: &web::Window) -> Viewport {
    let css = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Viewport::new(
        css(window.inner_width()),
        css(window.inner_height()),
        window.device_pixel_ratio(),
    )
}

/// Size the drawing buffer for `viewport`; returns the backing size applied.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, viewport: Viewport) -> (u32, u32) {
    let (w, h) = viewport.surface_size();
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
    (w, h)
}

/// Seed taken from the canvas `data-seed` attribute, if present and numeric.
pub fn data_seed(canvas: &web::HtmlCanvasElement) -> Option<u64> {
    let raw = canvas.get_attribute("data-seed")?;
    match raw.trim().parse() {
        Ok(seed) => Some(seed),
        Err(_) => {
            log::warn!("[web] ignoring non-numeric data-seed {raw:?}");
            None
        }
    }
}
