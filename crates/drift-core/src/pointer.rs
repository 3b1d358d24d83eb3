use glam::Vec2;

/// Pointer device kind as reported by the host's `pointerType`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Mouse,
    Pen,
    Touch,
    /// Empty `pointerType`; synthetic events sometimes carry none.
    Unspecified,
    Other,
}

impl DeviceKind {
    pub fn from_pointer_type(kind: &str) -> Self {
        match kind {
            "mouse" => DeviceKind::Mouse,
            "pen" => DeviceKind::Pen,
            "touch" => DeviceKind::Touch,
            "" => DeviceKind::Unspecified,
            _ => DeviceKind::Other,
        }
    }

    #[inline]
    pub fn is_mouse(self) -> bool {
        self == DeviceKind::Mouse
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Viewport (client) coordinates in CSS px.
    pub position: Vec2,
    pub kind: DeviceKind,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, kind: DeviceKind) -> Self {
        Self {
            position: Vec2::new(x, y),
            kind,
        }
    }

    pub fn mouse(x: f32, y: f32) -> Self {
        Self::new(x, y, DeviceKind::Mouse)
    }
}

/// Result of matching an event target against the interactive selector set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractiveHit {
    /// The matched element is a text-entry form control.
    pub reading: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Move {
        sample: PointerSample,
        hit: Option<InteractiveHit>,
    },
    Down(PointerSample),
    Up(PointerSample),
    Cancel(PointerSample),
    /// Pointer left an element; `related_target` is false when it left the document.
    Out {
        kind: DeviceKind,
        related_target: bool,
    },
    /// Pointer left the listening element entirely.
    Leave { kind: DeviceKind },
}
