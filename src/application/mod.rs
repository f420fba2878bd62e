//! Application services layer.

pub mod admin;
pub mod auth;
pub mod busy;
pub mod confirm;
pub mod error;
pub mod notify;
pub mod repos;
pub mod state;
pub mod view;
