//! Browser implementation of the core [`Host`] seam.
//!
//! Every registration made through a [`WebHost`] funnels back into one
//! [`Dispatcher`], which the page connects to the owning controller once the
//! controller exists.

use crate::dom;
use drift_core::{
    DeviceKind, EventSource, FrameHandle, Host, HostEvent, InteractiveSelectors, ListenerHandle,
    PointerInput, PointerSample, TimerHandle,
};
use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

type Sink = Box<dyn FnMut(HostEvent)>;

/// Shared slot through which DOM callbacks reach a controller.
#[derive(Clone, Default)]
pub struct Dispatcher {
    sink: Rc<RefCell<Option<Sink>>>,
}

impl Dispatcher {
    pub fn connect(&self, sink: impl FnMut(HostEvent) + 'static) {
        *self.sink.borrow_mut() = Some(Box::new(sink));
    }

    pub fn dispatch(&self, event: HostEvent) {
        match self.sink.try_borrow_mut() {
            Ok(mut slot) => {
                if let Some(sink) = slot.as_mut() {
                    sink(event);
                }
            }
            Err(_) => log::debug!("[host] dropped re-entrant {:?}", event),
        }
    }
}

/// Where each event family is registered.
#[derive(Clone)]
pub struct ListenTargets {
    /// Pointer events: the document for the avatar, the container for the scene.
    pub pointer: web::EventTarget,
    pub document: web::Document,
    pub window: web::Window,
}

impl ListenTargets {
    fn target_for(&self, source: EventSource) -> &web::EventTarget {
        match source {
            s if s.is_pointer() => &self.pointer,
            EventSource::VisibilityChange => &self.document,
            _ => &self.window,
        }
    }
}

struct Registration {
    target: web::EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(web::Event)>,
}

pub struct WebHost {
    targets: ListenTargets,
    selectors: Option<Rc<InteractiveSelectors>>,
    dispatcher: Dispatcher,
    frame_callback: Closure<dyn FnMut(f64)>,
    timers: FnvHashMap<i32, Closure<dyn FnMut()>>,
    fired: Rc<RefCell<Vec<i32>>>,
    listeners: FnvHashMap<u32, Registration>,
    next_listener: u32,
}

impl WebHost {
    /// `selectors` enables interactive-target classification on pointer moves.
    pub fn new(targets: ListenTargets, selectors: Option<InteractiveSelectors>) -> Self {
        let dispatcher = Dispatcher::default();
        let frames = dispatcher.clone();
        let frame_callback = Closure::wrap(Box::new(move |time_ms: f64| {
            frames.dispatch(HostEvent::Frame { time_ms });
        }) as Box<dyn FnMut(f64)>);
        Self {
            targets,
            selectors: selectors.map(Rc::new),
            dispatcher,
            frame_callback,
            timers: FnvHashMap::default(),
            fired: Rc::new(RefCell::new(Vec::new())),
            listeners: FnvHashMap::default(),
            next_listener: 0,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn window(&self) -> &web::Window {
        &self.targets.window
    }

    // Closures of timers that already ran.
    fn sweep_fired(&mut self) {
        let fired: Vec<i32> = self.fired.borrow_mut().drain(..).collect();
        for id in fired {
            self.timers.remove(&id);
        }
    }
}

impl Host for WebHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.targets
            .window
            .request_animation_frame(self.frame_callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|e| log::warn!("[host] requestAnimationFrame failed: {:?}", e))
            .ok()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.targets.window.cancel_animation_frame(handle.0);
    }

    fn set_timeout(&mut self, delay: Duration) -> Option<TimerHandle> {
        self.sweep_fired();
        let id = Rc::new(Cell::new(0));
        let callback = {
            let id = id.clone();
            let fired = self.fired.clone();
            let dispatcher = self.dispatcher.clone();
            Closure::wrap(Box::new(move || {
                dispatcher.dispatch(HostEvent::Timer(TimerHandle(id.get())));
                fired.borrow_mut().push(id.get());
            }) as Box<dyn FnMut()>)
        };
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let handle = self
            .targets
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            )
            .map_err(|e| log::warn!("[host] setTimeout failed: {:?}", e))
            .ok()?;
        id.set(handle);
        self.timers.insert(handle, callback);
        Some(TimerHandle(handle))
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.targets.window.clear_timeout_with_handle(handle.0);
        self.timers.remove(&handle.0);
        self.sweep_fired();
    }

    fn listen(&mut self, source: EventSource) -> Option<ListenerHandle> {
        let target = self.targets.target_for(source).clone();
        let event_type = source.event_type();
        let callback = {
            let dispatcher = self.dispatcher.clone();
            let selectors = self.selectors.clone();
            let document = self.targets.document.clone();
            Closure::wrap(Box::new(move |ev: web::Event| {
                if let Some(event) = translate(source, &ev, selectors.as_deref(), &document) {
                    dispatcher.dispatch(event);
                }
            }) as Box<dyn FnMut(web::Event)>)
        };
        if let Err(e) =
            target.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
        {
            log::warn!("[host] cannot listen to {}: {:?}", event_type, e);
            return None;
        }
        let handle = ListenerHandle(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        self.listeners.insert(
            handle.0,
            Registration {
                target,
                event_type,
                callback,
            },
        );
        Some(handle)
    }

    fn unlisten(&mut self, handle: ListenerHandle) {
        if let Some(reg) = self.listeners.remove(&handle.0) {
            let _ = reg
                .target
                .remove_event_listener_with_callback(reg.event_type, reg.callback.as_ref().unchecked_ref());
        }
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        for (_, reg) in self.listeners.drain() {
            let _ = reg
                .target
                .remove_event_listener_with_callback(reg.event_type, reg.callback.as_ref().unchecked_ref());
        }
        for (id, _) in self.timers.drain() {
            self.targets.window.clear_timeout_with_handle(id);
        }
    }
}

fn sample_of(ev: &web::PointerEvent) -> PointerSample {
    PointerSample::new(
        ev.client_x() as f32,
        ev.client_y() as f32,
        DeviceKind::from_pointer_type(&ev.pointer_type()),
    )
}

/// DOM event to host event. `None` for events that carry nothing usable.
fn translate(
    source: EventSource,
    ev: &web::Event,
    selectors: Option<&InteractiveSelectors>,
    document: &web::Document,
) -> Option<HostEvent> {
    let pointer = || ev.dyn_ref::<web::PointerEvent>();
    let input = match source {
        EventSource::PointerMove => {
            let pe = pointer()?;
            let hit = selectors.and_then(|s| s.classify(dom::target_element(ev)));
            PointerInput::Move {
                sample: sample_of(pe),
                hit,
            }
        }
        EventSource::PointerDown => PointerInput::Down(sample_of(pointer()?)),
        EventSource::PointerUp => PointerInput::Up(sample_of(pointer()?)),
        EventSource::PointerCancel => PointerInput::Cancel(sample_of(pointer()?)),
        EventSource::PointerOut => {
            let pe = pointer()?;
            PointerInput::Out {
                kind: DeviceKind::from_pointer_type(&pe.pointer_type()),
                related_target: pe.related_target().is_some(),
            }
        }
        EventSource::PointerLeave => PointerInput::Leave {
            kind: DeviceKind::from_pointer_type(&pointer()?.pointer_type()),
        },
        EventSource::VisibilityChange => {
            return Some(HostEvent::VisibilityChanged {
                hidden: document.visibility_state() == web::VisibilityState::Hidden,
            })
        }
        EventSource::WindowBlur => return Some(HostEvent::WindowBlur),
        EventSource::Resize | EventSource::OrientationChange => return Some(HostEvent::Resize),
    };
    Some(HostEvent::Pointer(input))
}

/// Implement [`Host`] for a wrapper by forwarding to its `WebHost` field.
macro_rules! delegate_host {
    ($ty:ty, $field:ident) => {
        impl drift_core::Host for $ty {
            fn request_frame(&mut self) -> Option<drift_core::FrameHandle> {
                drift_core::Host::request_frame(&mut self.$field)
            }
            fn cancel_frame(&mut self, handle: drift_core::FrameHandle) {
                drift_core::Host::cancel_frame(&mut self.$field, handle)
            }
            fn set_timeout(&mut self, delay: std::time::Duration) -> Option<drift_core::TimerHandle> {
                drift_core::Host::set_timeout(&mut self.$field, delay)
            }
            fn clear_timeout(&mut self, handle: drift_core::TimerHandle) {
                drift_core::Host::clear_timeout(&mut self.$field, handle)
            }
            fn listen(&mut self, source: drift_core::EventSource) -> Option<drift_core::ListenerHandle> {
                drift_core::Host::listen(&mut self.$field, source)
            }
            fn unlisten(&mut self, handle: drift_core::ListenerHandle) {
                drift_core::Host::unlisten(&mut self.$field, handle)
            }
        }
    };
}
pub(crate) use delegate_host;
