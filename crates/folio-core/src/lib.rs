pub mod chat;
pub mod constants;
pub mod content;
pub mod error;
pub mod notify;
pub mod reveal;
pub mod scene;
pub mod schedule;
pub mod theme;

pub use chat::*;
pub use constants::*;
pub use error::*;
pub use notify::*;
pub use reveal::*;
pub use scene::*;
pub use schedule::*;
pub use theme::*;

// Shaders bundled as string constants
pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
