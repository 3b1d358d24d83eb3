#![cfg(target_arch = "wasm32")]
//! Browser front-end: media-query gating, the cursor-avatar overlay and the
//! WebGPU hero scene, composed in the `start` entry point.

mod dom;
mod host;
mod media;
mod overlay;
mod render;
mod scene;

use anyhow::anyhow;
use drift_core::{
    Capability, CapabilityGate, CursorAvatarController, CursorTuning, HostEvent, RenderSize,
    SceneAnimationController, SceneHost, SceneTuning,
};
use host::{Dispatcher, ListenTargets, WebHost};
use overlay::{AvatarPage, DomAvatar};
use render::GpuScene;
use scene::HeroPage;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub const HERO_CANVAS_ID: &str = "hero-canvas";
pub const HERO_CONTAINER_SELECTOR: &str = ".hero";

type AvatarController = CursorAvatarController<AvatarPage>;
type HeroController = SceneAnimationController<HeroPage, GpuScene>;
type SharedGate = Rc<RefCell<CapabilityGate>>;

thread_local! {
    // Owns both controllers through its subscribers for the life of the page.
    static GATE: RefCell<Option<SharedGate>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("drift-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let (window, document) = dom::window_document().ok_or_else(|| anyhow!("no window"))?;

    let gate: SharedGate = Rc::new(RefCell::new(CapabilityGate::default()));
    for capability in Capability::ALL {
        let mode = media::watch(&window, &gate, capability);
        log::debug!("[media] {:?} via {:?}", capability, mode);
    }
    GATE.with(|slot| *slot.borrow_mut() = Some(gate.clone()));

    install_avatar(&window, &document, &gate);
    install_scene(&window, &document, &gate);

    let ready = gate.clone();
    on_document_ready(&document, move || ready.borrow_mut().mark_ready())
}

/// Route a host's events into its controller. A busy controller drops the event.
fn connect<C: 'static>(
    dispatcher: &Dispatcher,
    controller: &Rc<RefCell<C>>,
    mut handle: impl FnMut(&mut C, HostEvent) + 'static,
) {
    let weak = Rc::downgrade(controller);
    dispatcher.connect(move |event| {
        let Some(controller) = weak.upgrade() else {
            return;
        };
        match controller.try_borrow_mut() {
            Ok(mut c) => handle(&mut c, event),
            Err(_) => log::debug!("[page] controller busy, dropped {:?}", event),
        };
    });
}

fn install_avatar(window: &web::Window, document: &web::Document, gate: &SharedGate) {
    let tuning = CursorTuning::default();
    let targets = ListenTargets {
        pointer: document.clone().into(),
        document: document.clone(),
        window: window.clone(),
    };
    let host = WebHost::new(targets, Some(tuning.selectors.clone()));
    let dispatcher = host.dispatcher().clone();
    let page = AvatarPage::new(host, DomAvatar::new(window.clone(), document.clone()));
    let controller: Rc<RefCell<AvatarController>> =
        Rc::new(RefCell::new(CursorAvatarController::new(page, tuning)));
    connect(&dispatcher, &controller, |c, event| c.handle(event));

    gate.borrow_mut()
        .subscribe(move |state| match controller.try_borrow_mut() {
            Ok(mut c) => c.evaluate(state),
            Err(_) => log::warn!("[avatar] busy during capability change"),
        });
}

fn install_scene(window: &web::Window, document: &web::Document, gate: &SharedGate) {
    let canvas = document
        .get_element_by_id(HERO_CANVAS_ID)
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok());
    let container = document
        .query_selector(HERO_CONTAINER_SELECTOR)
        .ok()
        .flatten();
    let (Some(canvas), Some(container)) = (canvas, container) else {
        log::warn!("Hero canvas element not found; skipping WebGPU background.");
        return;
    };

    let window = window.clone();
    let document = document.clone();
    let gate = gate.clone();
    spawn_local(async move {
        if let Err(e) = init_scene(window, document, canvas, container, gate).await {
            log::warn!("[scene] background disabled: {:?}", e);
        }
    });
}

async fn init_scene(
    window: web::Window,
    document: web::Document,
    canvas: web::HtmlCanvasElement,
    container: web::Element,
    gate: SharedGate,
) -> anyhow::Result<()> {
    let targets = ListenTargets {
        pointer: container.clone().into(),
        document,
        window,
    };
    let host = WebHost::new(targets, None);
    let dispatcher = host.dispatcher().clone();
    let page = HeroPage::new(host, container);

    let rect = page
        .container_rect()
        .ok_or_else(|| anyhow!("hero container detached"))?;
    let size = RenderSize::from_css(rect.size(), page.device_pixel_ratio());
    let renderer = GpuScene::new(canvas, size).await?;

    let controller: Rc<RefCell<HeroController>> = Rc::new(RefCell::new(
        SceneAnimationController::new(page, renderer, SceneTuning::default())?,
    ));
    connect(&dispatcher, &controller, |c, event| c.handle(event));

    let ready = {
        let subscriber = controller.clone();
        let mut gate = gate.borrow_mut();
        gate.subscribe(move |state| match subscriber.try_borrow_mut() {
            Ok(mut c) => c.evaluate(state),
            Err(_) => log::warn!("[scene] busy during capability change"),
        });
        gate.ready_state()
    };
    // The document may have become ready while the GPU was initialising.
    if let Some(state) = ready {
        controller.borrow_mut().evaluate(&state);
    }
    Ok(())
}

fn on_document_ready(
    document: &web::Document,
    ready: impl FnOnce() + 'static,
) -> anyhow::Result<()> {
    if document.ready_state() != "loading" {
        ready();
        return Ok(());
    }
    let mut ready = Some(ready);
    let closure = Closure::wrap(Box::new(move || {
        if let Some(ready) = ready.take() {
            ready();
        }
    }) as Box<dyn FnMut()>);
    let options = web::AddEventListenerOptions::new();
    options.set_once(true);
    document
        .add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|e| anyhow!("{:?}", e))?;
    closure.forget();
    Ok(())
}
