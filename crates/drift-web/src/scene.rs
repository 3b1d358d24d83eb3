use crate::dom;
use crate::host::{delegate_host, WebHost};
use drift_core::{Rect, SceneHost};
use web_sys as web;

/// Browser host for the hero scene: pointer events on the container, layout
/// events on the window.
pub struct HeroPage {
    host: WebHost,
    container: web::Element,
}

impl HeroPage {
    pub fn new(host: WebHost, container: web::Element) -> Self {
        Self { host, container }
    }
}

delegate_host!(HeroPage, host);

impl SceneHost for HeroPage {
    fn container_rect(&self) -> Option<Rect> {
        self.container
            .is_connected()
            .then(|| dom::client_rect(&self.container))
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.host.window().device_pixel_ratio() as f32
    }
}
