//! Device and accessibility capability gating.
//!
//! Pointer-reactive animation runs only when the user has not asked for
//! reduced motion and the primary pointer is a fine, hover-capable device.
//! The gate holds the latest value of each signal and pushes the combined
//! state to subscribers whenever a signal flips.

use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    ReducedMotion,
    PointerFine,
    HoverCapable,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::ReducedMotion,
        Capability::PointerFine,
        Capability::HoverCapable,
    ];

    /// Media query whose `matches` is this capability's value.
    pub fn media_query(self) -> &'static str {
        match self {
            Capability::ReducedMotion => "(prefers-reduced-motion: reduce)",
            Capability::PointerFine => "(pointer: fine)",
            Capability::HoverCapable => "(hover: hover)",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CapabilityState {
    pub reduced_motion: bool,
    pub pointer_fine: bool,
    pub hover_capable: bool,
}

impl CapabilityState {
    /// Desktop defaults: mouse present, no motion preference.
    pub const DESKTOP: CapabilityState = CapabilityState {
        reduced_motion: false,
        pointer_fine: true,
        hover_capable: true,
    };

    #[inline]
    pub fn eligible(&self) -> bool {
        !self.reduced_motion && self.pointer_fine && self.hover_capable
    }

    pub fn get(&self, capability: Capability) -> bool {
        match capability {
            Capability::ReducedMotion => self.reduced_motion,
            Capability::PointerFine => self.pointer_fine,
            Capability::HoverCapable => self.hover_capable,
        }
    }

    pub fn with(mut self, capability: Capability, value: bool) -> Self {
        match capability {
            Capability::ReducedMotion => self.reduced_motion = value,
            Capability::PointerFine => self.pointer_fine = value,
            Capability::HoverCapable => self.hover_capable = value,
        }
        self
    }
}

/// How a host can be notified of media-query changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionMode {
    /// `addEventListener("change", ..)`
    Push,
    /// Legacy `addListener(..)`
    LegacyPoll,
    /// Neither is available; the signal keeps its initial value.
    Unsupported,
}

impl SubscriptionMode {
    pub fn detect(has_event_listener: bool, has_legacy_listener: bool) -> Self {
        if has_event_listener {
            SubscriptionMode::Push
        } else if has_legacy_listener {
            SubscriptionMode::LegacyPoll
        } else {
            SubscriptionMode::Unsupported
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u32);

type Subscriber = Box<dyn FnMut(&CapabilityState)>;

pub struct CapabilityGate {
    state: CapabilityState,
    ready: bool,
    next_id: u32,
    subscribers: SmallVec<[(SubscriberId, Subscriber); 2]>,
}

impl Default for CapabilityGate {
    fn default() -> Self {
        Self::new(CapabilityState::default())
    }
}

impl CapabilityGate {
    pub fn new(initial: CapabilityState) -> Self {
        Self {
            state: initial,
            ready: false,
            next_id: 0,
            subscribers: SmallVec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> CapabilityState {
        self.state
    }

    #[inline]
    pub fn is_eligible(&self) -> bool {
        self.state.eligible()
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Current state once the document is ready, for late subscribers.
    pub fn ready_state(&self) -> Option<CapabilityState> {
        self.ready.then_some(self.state)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&CapabilityState) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    /// Record a signal value. Subscribers hear about it only if it flipped
    /// and the document is ready.
    pub fn set(&mut self, capability: Capability, value: bool) {
        let next = self.state.with(capability, value);
        if next == self.state {
            return;
        }
        log::debug!("[capability] {:?} -> {}", capability, value);
        self.state = next;
        if self.ready {
            self.notify();
        }
    }

    /// The document body exists; run the first evaluation.
    ///
    /// Calling it again re-evaluates, which is how a host retries setup that
    /// previously found no anchor.
    pub fn mark_ready(&mut self) {
        self.ready = true;
        self.notify();
    }

    fn notify(&mut self) {
        let state = self.state;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&state);
        }
    }
}
