//! DOM cursor-avatar overlay.

use crate::dom;
use crate::host::{delegate_host, WebHost};
use drift_core::{AvatarFlag, AvatarPose, AvatarSurface, SetupError};
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

const ROOT_CLASS: &str = "cursor-trail";
const DOCUMENT_CLASS: &str = "has-custom-cursor";

pub struct DomAvatar {
    window: web::Window,
    document: web::Document,
    root: Option<web::HtmlElement>,
}

impl DomAvatar {
    pub fn new(window: web::Window, document: web::Document) -> Self {
        Self {
            window,
            document,
            root: None,
        }
    }

    fn div(&self, class: &str) -> Result<web::Element, SetupError> {
        let el = self
            .document
            .create_element("div")
            .map_err(|_| SetupError::Unavailable("overlay element"))?;
        el.set_class_name(class);
        Ok(el)
    }

    fn build(&self) -> Result<web::HtmlElement, SetupError> {
        let attach = |parent: &web::Element, child: &web::Element| {
            parent
                .append_child(child)
                .map(|_| ())
                .map_err(|_| SetupError::Unavailable("overlay element"))
        };

        let root = self.div(ROOT_CLASS)?;
        let glow = self.div("cursor-trail__glow")?;
        let face = self.div("cursor-trail__face")?;

        let hat = self.div("cursor-trail__hat")?;
        attach(&hat, &self.div("cursor-trail__hat-brim")?)?;
        attach(&face, &hat)?;
        for class in [
            "cursor-trail__eye cursor-trail__eye--left",
            "cursor-trail__eye cursor-trail__eye--right",
            "cursor-trail__mouth",
            "cursor-trail__moustache",
        ] {
            attach(&face, &self.div(class)?)?;
        }
        attach(&root, &glow)?;
        attach(&root, &face)?;

        root.dyn_into::<web::HtmlElement>()
            .map_err(|_| SetupError::Unavailable("overlay element"))
    }
}

impl AvatarSurface for DomAvatar {
    fn viewport_size(&self) -> Vec2 {
        dom::viewport_size(&self.window)
    }

    fn mount(&mut self) -> Result<(), SetupError> {
        if self.root.is_some() {
            return Ok(());
        }
        let body = self
            .document
            .body()
            .ok_or(SetupError::MissingAnchor("document body"))?;
        let root = self.build()?;
        body.append_child(&root)
            .map_err(|_| SetupError::Unavailable("overlay element"))?;
        if let Some(html) = self.document.document_element() {
            let _ = html.class_list().add_1(DOCUMENT_CLASS);
        }
        self.root = Some(root);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(root) = self.root.take() {
            root.remove();
        }
        if let Some(html) = self.document.document_element() {
            let _ = html.class_list().remove_1(DOCUMENT_CLASS);
        }
    }

    fn set_flag(&mut self, flag: AvatarFlag, on: bool) {
        if let Some(root) = &self.root {
            let _ = root
                .class_list()
                .toggle_with_force(flag.class_name(), on);
        }
    }

    fn apply_pose(&mut self, pose: &AvatarPose) {
        let Some(root) = &self.root else {
            return;
        };
        let style = root.style();
        let props = [
            ("--cursor-x", format!("{}px", pose.position.x)),
            ("--cursor-y", format!("{}px", pose.position.y)),
            ("--cursor-scale", format!("{:.3}", pose.scale)),
            ("--cursor-tilt", format!("{:.2}deg", pose.tilt)),
            ("--cursor-bounce", format!("{:.2}px", pose.bounce)),
            ("--cursor-look-x", format!("{:.2}px", pose.look.x)),
            ("--cursor-look-y", format!("{:.2}px", pose.look.y)),
        ];
        for (name, value) in props.iter() {
            let _ = style.set_property(name, value);
        }
    }
}

/// Browser host for the cursor avatar: document-level listeners plus the overlay.
pub struct AvatarPage {
    host: WebHost,
    overlay: DomAvatar,
}

impl AvatarPage {
    pub fn new(host: WebHost, overlay: DomAvatar) -> Self {
        Self { host, overlay }
    }
}

delegate_host!(AvatarPage, host);

impl AvatarSurface for AvatarPage {
    fn viewport_size(&self) -> Vec2 {
        self.overlay.viewport_size()
    }

    fn mount(&mut self) -> Result<(), SetupError> {
        self.overlay.mount()
    }

    fn unmount(&mut self) {
        self.overlay.unmount()
    }

    fn set_flag(&mut self, flag: AvatarFlag, on: bool) {
        self.overlay.set_flag(flag, on)
    }

    fn apply_pose(&mut self, pose: &AvatarPose) {
        self.overlay.apply_pose(pose)
    }
}
