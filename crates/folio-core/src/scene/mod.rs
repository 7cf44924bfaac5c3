pub mod backend;
pub mod camera;
pub mod layers;
pub mod lifecycle;

pub use backend::*;
pub use camera::*;
pub use layers::*;
pub use lifecycle::*;
