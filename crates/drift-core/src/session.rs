//! One enable→disable span of a controller.
//!
//! An [`AnimationSession`] owns the frame-loop registration, the event
//! listeners and any pending one-shot timers. [`AnimationSession::dispose`]
//! releases all of them before returning, so no callback bound to this
//! session can fire afterwards.

use crate::host::{EventSource, FrameHandle, Host, ListenerHandle, TimerHandle};
use smallvec::SmallVec;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct AnimationSession {
    frame: Option<FrameHandle>,
    listeners: SmallVec<[ListenerHandle; 8]>,
    timers: SmallVec<[TimerHandle; 2]>,
}

impl AnimationSession {
    /// Register listeners for `sources`. Sources the host cannot provide are skipped.
    pub fn open<H: Host + ?Sized>(host: &mut H, sources: &[EventSource]) -> Self {
        let mut session = Self::default();
        for &source in sources {
            match host.listen(source) {
                Some(handle) => session.listeners.push(handle),
                None => log::debug!("[session] host cannot listen to {:?}", source),
            }
        }
        session
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn pending_timers(&self) -> &[TimerHandle] {
        &self.timers
    }

    /// Request the next frame unless one is already pending.
    pub fn schedule_frame<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.frame.is_none() {
            self.frame = host.request_frame();
        }
    }

    /// The pending frame has been delivered.
    pub fn frame_fired(&mut self) {
        self.frame = None;
    }

    pub fn arm_timer<H: Host + ?Sized>(&mut self, host: &mut H, delay: Duration) -> Option<TimerHandle> {
        let handle = host.set_timeout(delay)?;
        self.timers.push(handle);
        Some(handle)
    }

    pub fn cancel_timer<H: Host + ?Sized>(&mut self, host: &mut H, handle: TimerHandle) {
        if let Some(i) = self.timers.iter().position(|t| *t == handle) {
            self.timers.swap_remove(i);
            host.clear_timeout(handle);
        }
    }

    /// Returns false for timers this session does not own.
    pub fn timer_fired(&mut self, handle: TimerHandle) -> bool {
        match self.timers.iter().position(|t| *t == handle) {
            Some(i) => {
                self.timers.swap_remove(i);
                true
            }
            None => false,
        }
    }

    pub fn dispose<H: Host + ?Sized>(mut self, host: &mut H) {
        if let Some(frame) = self.frame.take() {
            host.cancel_frame(frame);
        }
        for timer in self.timers.drain(..) {
            host.clear_timeout(timer);
        }
        for listener in self.listeners.drain(..) {
            host.unlisten(listener);
        }
    }
}
