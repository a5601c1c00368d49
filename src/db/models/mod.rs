mod booking;
mod tour;
mod user;

pub use booking::*;
pub use tour::*;
pub use user::*;
