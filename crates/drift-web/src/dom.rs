use drift_core::{ElementLike, Rect, RenderSize};
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

/// Element view used by the interactive-selector matcher.
#[derive(Clone)]
pub struct DomElement(pub web::Element);

impl ElementLike for DomElement {
    fn tag_name(&self) -> String {
        self.0.tag_name()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent_element().map(DomElement)
    }
}

/// Event target as an element; text nodes, the document and the window are not.
pub fn target_element(event: &web::Event) -> Option<DomElement> {
    event
        .target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .map(DomElement)
}

/// `innerWidth` x `innerHeight` in CSS px.
pub fn viewport_size(window: &web::Window) -> Vec2 {
    let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Vec2::new(read(window.inner_width()), read(window.inner_height()))
}

pub fn client_rect(element: &web::Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(
        r.left() as f32,
        r.top() as f32,
        r.width() as f32,
        r.height() as f32,
    )
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, size: RenderSize) {
    if canvas.width() != size.width {
        canvas.set_width(size.width);
    }
    if canvas.height() != size.height {
        canvas.set_height(size.height);
    }
}
