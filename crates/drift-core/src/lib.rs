pub mod avatar;
pub mod camera;
pub mod capability;
pub mod constants;
pub mod error;
pub mod follow;
pub mod host;
pub mod interactive;
pub mod pointer;
pub mod scene;
pub mod session;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use avatar::{
    AvatarFlag, AvatarHost, AvatarMotion, AvatarPose, AvatarSnapshot, AvatarSurface,
    CursorAvatarController, CursorTuning, InteractionState, ScaleTable,
};
pub use camera::{rotation_matrix, Bounds, Camera, Plane, Ray};
pub use capability::{Capability, CapabilityGate, CapabilityState, SubscriberId, SubscriptionMode};
pub use error::{RenderError, SetupError};
pub use follow::{clamp_symmetric, Follower, Lerp};
pub use host::{EventSource, FrameHandle, Host, HostEvent, ListenerHandle, TimerHandle};
pub use interactive::{ElementLike, InteractiveSelectors, SelectorRule};
pub use pointer::{DeviceKind, InteractiveHit, PointerInput, PointerSample};
pub use scene::{
    FrameClock, LinkLine, Rect, RenderSize, SceneAnimationController, SceneFrame, SceneHost,
    SceneMode, SceneObject, SceneRenderer, SceneSnapshot, SceneTuning,
};
pub use session::AnimationSession;
