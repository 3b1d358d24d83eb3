// Host-side tests for capability gating.

use drift_core::{Capability, CapabilityGate, CapabilityState, SubscriptionMode};
use std::cell::RefCell;
use std::rc::Rc;

fn recording_gate(initial: CapabilityState) -> (CapabilityGate, Rc<RefCell<Vec<CapabilityState>>>) {
    let mut gate = CapabilityGate::new(initial);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    gate.subscribe(move |state| sink.borrow_mut().push(*state));
    (gate, seen)
}

#[test]
fn eligibility_needs_all_three_signals() {
    assert!(CapabilityState::DESKTOP.eligible());
    for cap in Capability::ALL {
        let flipped = CapabilityState::DESKTOP.with(cap, !CapabilityState::DESKTOP.get(cap));
        assert!(!flipped.eligible(), "{:?} flipped should be ineligible", cap);
    }
}

#[test]
fn nothing_is_pushed_before_ready() {
    let (mut gate, seen) = recording_gate(CapabilityState::DESKTOP);
    gate.set(Capability::ReducedMotion, true);
    assert!(seen.borrow().is_empty());
    assert!(gate.ready_state().is_none());

    gate.mark_ready();
    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].reduced_motion);
}

#[test]
fn only_real_flips_notify() {
    let (mut gate, seen) = recording_gate(CapabilityState::DESKTOP);
    gate.mark_ready();
    gate.set(Capability::PointerFine, true);
    assert_eq!(seen.borrow().len(), 1);

    gate.set(Capability::PointerFine, false);
    assert_eq!(seen.borrow().len(), 2);
    assert!(!gate.is_eligible());
}

#[test]
fn mark_ready_again_re_evaluates() {
    let (mut gate, seen) = recording_gate(CapabilityState::DESKTOP);
    gate.mark_ready();
    gate.mark_ready();
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn unsubscribed_callbacks_stay_silent() {
    let mut gate = CapabilityGate::new(CapabilityState::DESKTOP);
    let count = Rc::new(RefCell::new(0));
    let c = count.clone();
    let id = gate.subscribe(move |_| *c.borrow_mut() += 1);
    gate.mark_ready();
    gate.unsubscribe(id);
    gate.set(Capability::HoverCapable, false);
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn subscription_mode_prefers_push() {
    assert_eq!(SubscriptionMode::detect(true, true), SubscriptionMode::Push);
    assert_eq!(SubscriptionMode::detect(false, true), SubscriptionMode::LegacyPoll);
    assert_eq!(SubscriptionMode::detect(false, false), SubscriptionMode::Unsupported);
}

#[test]
fn media_queries_match_signals() {
    assert_eq!(
        Capability::ReducedMotion.media_query(),
        "(prefers-reduced-motion: reduce)"
    );
    assert_eq!(Capability::PointerFine.media_query(), "(pointer: fine)");
    assert_eq!(Capability::HoverCapable.media_query(), "(hover: hover)");
}
