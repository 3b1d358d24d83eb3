/// Setup failures. None of these reach the page; callers log and stay inactive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("required element missing: {0}")]
    MissingAnchor(&'static str),

    #[error("host capability unavailable: {0}")]
    Unavailable(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("render surface lost")]
    SurfaceLost,

    #[error("render backend error: {0}")]
    Backend(String),
}
