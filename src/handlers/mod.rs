//! Request handlers

pub mod auth;
pub mod blogs;
pub mod calendar;
pub mod expenses;
pub mod health;
pub mod history;
pub mod image;
pub mod notify;
pub mod sensor;
pub mod thoughts;
