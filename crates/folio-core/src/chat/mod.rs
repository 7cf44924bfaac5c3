pub mod replies;
pub mod widget;

pub use replies::*;
pub use widget::*;
