//! Data models

pub mod blog;
pub mod calendar;
pub mod expense;
pub mod image;
pub mod notification;
pub mod sensor;
pub mod thought;
pub mod user;

pub use blog::*;
pub use calendar::*;
pub use expense::*;
pub use image::*;
pub use notification::*;
pub use sensor::*;
pub use thought::*;
pub use user::*;
