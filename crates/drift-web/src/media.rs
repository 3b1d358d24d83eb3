//! Media-query capability signals feeding a [`CapabilityGate`].

use drift_core::{Capability, CapabilityGate, SubscriptionMode};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

fn has_method(list: &web::MediaQueryList, name: &str) -> bool {
    js_sys::Reflect::get(list, &JsValue::from_str(name))
        .map(|v| v.is_function())
        .unwrap_or(false)
}

/// Seed the gate with the query's current value and keep it updated.
///
/// A browser without `matchMedia` leaves the capability at its default
/// (not matched). The change callback lives for the page.
pub fn watch(
    window: &web::Window,
    gate: &Rc<RefCell<CapabilityGate>>,
    capability: Capability,
) -> SubscriptionMode {
    let list = match window.match_media(capability.media_query()) {
        Ok(Some(list)) => list,
        _ => {
            log::debug!("[media] {} unavailable", capability.media_query());
            return SubscriptionMode::Unsupported;
        }
    };
    gate.borrow_mut().set(capability, list.matches());

    let mode = SubscriptionMode::detect(
        has_method(&list, "addEventListener"),
        has_method(&list, "addListener"),
    );
    if mode == SubscriptionMode::Unsupported {
        log::debug!("[media] {} cannot be watched", capability.media_query());
        return mode;
    }

    let gate = gate.clone();
    let source = list.clone();
    let closure = Closure::wrap(Box::new(move |_: JsValue| {
        let matches = source.matches();
        match gate.try_borrow_mut() {
            Ok(mut gate) => gate.set(capability, matches),
            Err(_) => log::warn!("[media] gate busy, dropped {:?} change", capability),
        }
    }) as Box<dyn FnMut(JsValue)>);

    let registered = match mode {
        SubscriptionMode::Push => list
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .is_ok(),
        SubscriptionMode::LegacyPoll => list
            .add_listener_with_opt_callback(Some(closure.as_ref().unchecked_ref()))
            .is_ok(),
        SubscriptionMode::Unsupported => false,
    };
    if !registered {
        log::debug!("[media] failed to watch {}", capability.media_query());
        return SubscriptionMode::Unsupported;
    }
    closure.forget();
    mode
}
