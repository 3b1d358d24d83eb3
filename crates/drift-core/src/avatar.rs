//! Cursor avatar: a small face that trails the mouse.
//!
//! [`AvatarMotion`] is the per-frame smoothing (position, scale, tilt,
//! bounce, eye look). [`CursorAvatarController`] owns the overlay lifecycle
//! and the discrete interaction state, and drives an [`AvatarSurface`] that
//! the host renders.

use crate::capability::CapabilityState;
use crate::constants::*;
use crate::error::SetupError;
use crate::follow::{clamp_symmetric, Follower};
use crate::host::{EventSource, Host, HostEvent, TimerHandle};
use crate::interactive::InteractiveSelectors;
use crate::pointer::{DeviceKind, PointerInput, PointerSample};
use crate::session::AnimationSession;
use glam::Vec2;
use std::time::Duration;

const AVATAR_SOURCES: [EventSource; 7] = [
    EventSource::PointerMove,
    EventSource::PointerDown,
    EventSource::PointerUp,
    EventSource::PointerCancel,
    EventSource::PointerOut,
    EventSource::VisibilityChange,
    EventSource::WindowBlur,
];

/// Visual flags toggled on the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AvatarFlag {
    Visible,
    Hovering,
    Pressed,
    Reading,
    Moving,
    Giggling,
}

impl AvatarFlag {
    pub const ALL: [AvatarFlag; 6] = [
        AvatarFlag::Visible,
        AvatarFlag::Hovering,
        AvatarFlag::Pressed,
        AvatarFlag::Reading,
        AvatarFlag::Moving,
        AvatarFlag::Giggling,
    ];

    pub fn class_name(self) -> &'static str {
        match self {
            AvatarFlag::Visible => "is-visible",
            AvatarFlag::Hovering => "is-interactive",
            AvatarFlag::Pressed => "is-pressed",
            AvatarFlag::Reading => "is-reading",
            AvatarFlag::Moving => "is-moving",
            AvatarFlag::Giggling => "is-giggling",
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct FlagSet(u8);

impl FlagSet {
    #[inline]
    fn contains(self, flag: AvatarFlag) -> bool {
        self.0 & flag.bit() != 0
    }
    #[inline]
    fn set(&mut self, flag: AvatarFlag, on: bool) {
        if on {
            self.0 |= flag.bit();
        } else {
            self.0 &= !flag.bit();
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub hovering: bool,
    pub pressed: bool,
    pub reading: bool,
    pub moving: bool,
}

/// Target scale per interaction state, highest-priority combination first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTable {
    pub hovering_pressed: f32,
    pub hovering: f32,
    pub pressed: f32,
    pub rest: f32,
}

impl Default for ScaleTable {
    fn default() -> Self {
        Self {
            hovering_pressed: 1.05,
            hovering: 1.2,
            pressed: 0.88,
            rest: 1.0,
        }
    }
}

impl ScaleTable {
    pub fn target(&self, state: &InteractionState) -> f32 {
        match (state.hovering, state.pressed) {
            (true, true) => self.hovering_pressed,
            (true, false) => self.hovering,
            (false, true) => self.pressed,
            (false, false) => self.rest,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CursorTuning {
    pub scales: ScaleTable,
    /// Giggle on first entering an interactive target.
    pub hover_giggle: Duration,
    /// Giggle on a press outside interactive targets.
    pub press_giggle: Duration,
    pub selectors: InteractiveSelectors,
}

impl Default for CursorTuning {
    fn default() -> Self {
        Self {
            scales: ScaleTable::default(),
            hover_giggle: Duration::from_millis(420),
            press_giggle: Duration::from_millis(360),
            selectors: InteractiveSelectors::default(),
        }
    }
}

impl CursorTuning {
    /// Alternate table: bigger hover, deeper press, uniform giggle.
    pub fn playful() -> Self {
        Self {
            scales: ScaleTable {
                hovering_pressed: 1.0,
                hovering: 1.25,
                pressed: 0.82,
                rest: 1.0,
            },
            hover_giggle: Duration::from_millis(380),
            press_giggle: Duration::from_millis(380),
            selectors: InteractiveSelectors::default(),
        }
    }
}

/// Values written to the overlay each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarPose {
    pub position: Vec2,
    pub scale: f32,
    /// Degrees.
    pub tilt: f32,
    /// Vertical offset in px.
    pub bounce: f32,
    /// Eye offset in px.
    pub look: Vec2,
}

#[derive(Clone, Debug)]
pub struct AvatarMotion {
    position: Follower<Vec2>,
    previous: Vec2,
    velocity: Vec2,
    scale: Follower<f32>,
    tilt: Follower<f32>,
    bounce: Follower<f32>,
    look: Follower<Vec2>,
}

impl AvatarMotion {
    pub fn new(rest: Vec2) -> Self {
        Self {
            position: Follower::new(rest, AVATAR_POSITION_GAIN),
            previous: rest,
            velocity: Vec2::ZERO,
            scale: Follower::new(1.0, AVATAR_SCALE_GAIN),
            tilt: Follower::new(0.0, AVATAR_TILT_GAIN),
            bounce: Follower::new(0.0, AVATAR_BOUNCE_GAIN),
            look: Follower::new(Vec2::ZERO, AVATAR_LOOK_GAIN),
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.position.set_target(target);
    }

    pub fn set_target_scale(&mut self, scale: f32) {
        self.scale.set_target(scale);
    }

    pub fn position(&self) -> Vec2 {
        self.position.current()
    }

    pub fn target(&self) -> Vec2 {
        self.position.target()
    }

    pub fn scale(&self) -> f32 {
        self.scale.current()
    }

    pub fn target_scale(&self) -> f32 {
        self.scale.target()
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Advance one frame. Position moves first; everything velocity-derived reads it.
    pub fn step(&mut self) -> AvatarPose {
        let position = self.position.step();
        self.velocity = position - self.previous;
        self.previous = position;

        self.scale.step();

        let v = self.velocity;
        self.tilt.step_toward(clamp_symmetric(
            v.x * AVATAR_TILT_PER_VELOCITY,
            AVATAR_TILT_LIMIT,
        ));
        self.bounce.step_toward(clamp_symmetric(
            v.y * AVATAR_BOUNCE_PER_VELOCITY,
            AVATAR_BOUNCE_LIMIT,
        ));
        self.look.step_toward(Vec2::new(
            clamp_symmetric(v.x * AVATAR_LOOK_X_PER_VELOCITY, AVATAR_LOOK_X_LIMIT),
            clamp_symmetric(v.y * AVATAR_LOOK_Y_PER_VELOCITY, AVATAR_LOOK_Y_LIMIT),
        ));

        self.pose()
    }

    pub fn pose(&self) -> AvatarPose {
        AvatarPose {
            position: self.position.current(),
            scale: self.scale.current(),
            tilt: self.tilt.current(),
            bounce: self.bounce.current(),
            look: self.look.current(),
        }
    }
}

/// The overlay the host draws.
pub trait AvatarSurface {
    /// Viewport size in CSS px.
    fn viewport_size(&self) -> Vec2;
    /// Build and insert the overlay. Fails with `MissingAnchor` before the body exists.
    fn mount(&mut self) -> Result<(), SetupError>;
    fn unmount(&mut self);
    fn set_flag(&mut self, flag: AvatarFlag, on: bool);
    fn apply_pose(&mut self, pose: &AvatarPose);
}

pub trait AvatarHost: Host + AvatarSurface {}

impl<T: Host + AvatarSurface> AvatarHost for T {}

/// Read-only view of an enabled avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarSnapshot {
    pub position: Vec2,
    pub target: Vec2,
    pub scale: f32,
    pub target_scale: f32,
    pub state: InteractionState,
    pub visible: bool,
    pub giggling: bool,
}

struct ActiveAvatar {
    session: AnimationSession,
    motion: AvatarMotion,
    state: InteractionState,
    applied: FlagSet,
    giggle: Option<TimerHandle>,
}

impl ActiveAvatar {
    fn new<H: AvatarHost>(host: &mut H, tuning: &CursorTuning) -> Self {
        let rest = host.viewport_size() * 0.5;
        let session = AnimationSession::open(host, &AVATAR_SOURCES);
        let mut avatar = Self {
            session,
            motion: AvatarMotion::new(rest),
            state: InteractionState::default(),
            applied: FlagSet::default(),
            giggle: None,
        };
        avatar.refresh_scale(tuning);
        avatar
    }

    #[inline]
    fn visible(&self) -> bool {
        self.applied.contains(AvatarFlag::Visible)
    }

    /// Touch the surface only on an actual transition.
    fn set_flag<H: AvatarHost>(&mut self, host: &mut H, flag: AvatarFlag, on: bool) {
        if self.applied.contains(flag) == on {
            return;
        }
        self.applied.set(flag, on);
        host.set_flag(flag, on);
    }

    fn refresh_scale(&mut self, tuning: &CursorTuning) {
        self.motion
            .set_target_scale(tuning.scales.target(&self.state));
    }

    fn show<H: AvatarHost>(&mut self, host: &mut H) {
        if !self.visible() {
            self.set_flag(host, AvatarFlag::Visible, true);
            host.apply_pose(&self.motion.pose());
        }
    }

    fn giggle<H: AvatarHost>(&mut self, host: &mut H, duration: Duration) {
        self.set_flag(host, AvatarFlag::Giggling, true);
        if let Some(previous) = self.giggle.take() {
            self.session.cancel_timer(host, previous);
        }
        self.giggle = self.session.arm_timer(host, duration);
    }

    fn cancel_giggle<H: AvatarHost>(&mut self, host: &mut H) {
        if let Some(pending) = self.giggle.take() {
            self.session.cancel_timer(host, pending);
        }
        self.set_flag(host, AvatarFlag::Giggling, false);
    }

    fn reset<H: AvatarHost>(&mut self, host: &mut H, tuning: &CursorTuning) {
        self.cancel_giggle(host);
        self.state = InteractionState::default();
        for flag in [
            AvatarFlag::Pressed,
            AvatarFlag::Hovering,
            AvatarFlag::Reading,
            AvatarFlag::Moving,
            AvatarFlag::Visible,
        ] {
            self.set_flag(host, flag, false);
        }
        self.refresh_scale(tuning);
    }

    fn tick<H: AvatarHost>(&mut self, host: &mut H) {
        self.session.frame_fired();
        let pose = self.motion.step();
        let visible = self.visible();
        self.state.moving = visible && self.motion.speed() > AVATAR_MOVING_SPEED;
        if visible {
            self.set_flag(host, AvatarFlag::Moving, self.state.moving);
            host.apply_pose(&pose);
        }
        self.session.schedule_frame(host);
    }

    fn on_pointer<H: AvatarHost>(&mut self, host: &mut H, tuning: &CursorTuning, input: PointerInput) {
        match input {
            PointerInput::Move { sample, hit } => {
                if !sample.kind.is_mouse() {
                    return;
                }
                self.motion.set_target(sample.position);

                let hovering = hit.is_some();
                let reading = hit.map(|h| h.reading).unwrap_or(false);
                if hovering != self.state.hovering {
                    self.state.hovering = hovering;
                    self.set_flag(host, AvatarFlag::Hovering, hovering);
                    if hovering {
                        self.giggle(host, tuning.hover_giggle);
                    }
                }
                if reading != self.state.reading {
                    self.state.reading = reading;
                    self.set_flag(host, AvatarFlag::Reading, reading);
                }
                self.refresh_scale(tuning);
                self.show(host);
            }
            PointerInput::Down(sample) => {
                if !sample.kind.is_mouse() {
                    return;
                }
                self.state.pressed = true;
                self.set_flag(host, AvatarFlag::Pressed, true);
                if !self.state.hovering {
                    self.giggle(host, tuning.press_giggle);
                }
                self.refresh_scale(tuning);
            }
            PointerInput::Up(sample) | PointerInput::Cancel(sample) => {
                self.release(host, tuning, sample);
            }
            PointerInput::Out {
                kind,
                related_target,
            } => {
                if kind != DeviceKind::Unspecified && !kind.is_mouse() {
                    return;
                }
                if related_target {
                    return;
                }
                self.reset(host, tuning);
            }
            PointerInput::Leave { .. } => {}
        }
    }

    fn release<H: AvatarHost>(&mut self, host: &mut H, tuning: &CursorTuning, sample: PointerSample) {
        if !sample.kind.is_mouse() {
            return;
        }
        self.state.pressed = false;
        self.set_flag(host, AvatarFlag::Pressed, false);
        self.refresh_scale(tuning);
    }

    fn snapshot(&self) -> AvatarSnapshot {
        AvatarSnapshot {
            position: self.motion.position(),
            target: self.motion.target(),
            scale: self.motion.scale(),
            target_scale: self.motion.target_scale(),
            state: self.state,
            visible: self.visible(),
            giggling: self.applied.contains(AvatarFlag::Giggling),
        }
    }
}

pub struct CursorAvatarController<H: AvatarHost> {
    host: H,
    tuning: CursorTuning,
    active: Option<ActiveAvatar>,
}

impl<H: AvatarHost> CursorAvatarController<H> {
    pub fn new(host: H, tuning: CursorTuning) -> Self {
        Self {
            host,
            tuning,
            active: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn tuning(&self) -> &CursorTuning {
        &self.tuning
    }

    pub fn is_enabled(&self) -> bool {
        self.active.is_some()
    }

    pub fn snapshot(&self) -> Option<AvatarSnapshot> {
        self.active.as_ref().map(ActiveAvatar::snapshot)
    }

    /// Enable or disable to match the capability state.
    pub fn evaluate(&mut self, capabilities: &CapabilityState) {
        if capabilities.eligible() {
            self.enable();
        } else {
            self.disable();
        }
    }

    /// No-op while enabled or while the overlay cannot be mounted.
    pub fn enable(&mut self) {
        if self.active.is_some() {
            return;
        }
        if let Err(e) = self.host.mount() {
            log::debug!("[avatar] not enabled: {}", e);
            return;
        }
        let mut active = ActiveAvatar::new(&mut self.host, &self.tuning);
        self.host.apply_pose(&active.motion.pose());
        active.session.schedule_frame(&mut self.host);
        log::debug!(
            "[avatar] enabled with {} listeners",
            active.session.listener_count()
        );
        self.active = Some(active);
    }

    /// Safe to call when not enabled.
    pub fn disable(&mut self) {
        if let Some(active) = self.active.take() {
            active.session.dispose(&mut self.host);
            self.host.unmount();
            log::debug!("[avatar] disabled");
        }
    }

    pub fn handle(&mut self, event: HostEvent) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let host = &mut self.host;
        match event {
            HostEvent::Frame { .. } => active.tick(host),
            HostEvent::Timer(handle) => {
                if active.session.timer_fired(handle) && active.giggle == Some(handle) {
                    active.giggle = None;
                    active.set_flag(host, AvatarFlag::Giggling, false);
                }
            }
            HostEvent::Pointer(input) => active.on_pointer(host, &self.tuning, input),
            HostEvent::VisibilityChanged { hidden: true } | HostEvent::WindowBlur => {
                active.reset(host, &self.tuning)
            }
            HostEvent::VisibilityChanged { hidden: false } | HostEvent::Resize => {}
        }
    }
}
