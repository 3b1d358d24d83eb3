//! Host seam: frame scheduling, one-shot timers and listener registration.
//!
//! Controllers never touch the platform directly. They ask a [`Host`] for
//! registrations, receive [`HostEvent`]s back through whatever dispatch the
//! host wires up, and release every registration through the same host.

use crate::pointer::PointerInput;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u32);

/// Event streams a controller may listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventSource {
    PointerMove,
    PointerDown,
    PointerUp,
    PointerCancel,
    PointerOut,
    PointerLeave,
    VisibilityChange,
    WindowBlur,
    Resize,
    OrientationChange,
}

impl EventSource {
    /// DOM event type name.
    pub fn event_type(self) -> &'static str {
        match self {
            EventSource::PointerMove => "pointermove",
            EventSource::PointerDown => "pointerdown",
            EventSource::PointerUp => "pointerup",
            EventSource::PointerCancel => "pointercancel",
            EventSource::PointerOut => "pointerout",
            EventSource::PointerLeave => "pointerleave",
            EventSource::VisibilityChange => "visibilitychange",
            EventSource::WindowBlur => "blur",
            EventSource::Resize => "resize",
            EventSource::OrientationChange => "orientationchange",
        }
    }

    #[inline]
    pub fn is_pointer(self) -> bool {
        matches!(
            self,
            EventSource::PointerMove
                | EventSource::PointerDown
                | EventSource::PointerUp
                | EventSource::PointerCancel
                | EventSource::PointerOut
                | EventSource::PointerLeave
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// A requested animation frame fired; `time_ms` is the host's frame timestamp.
    Frame { time_ms: f64 },
    Timer(TimerHandle),
    Pointer(PointerInput),
    VisibilityChanged { hidden: bool },
    WindowBlur,
    Resize,
}

pub trait Host {
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn set_timeout(&mut self, delay: Duration) -> Option<TimerHandle>;
    fn clear_timeout(&mut self, handle: TimerHandle);
    fn listen(&mut self, source: EventSource) -> Option<ListenerHandle>;
    fn unlisten(&mut self, handle: ListenerHandle);
}
