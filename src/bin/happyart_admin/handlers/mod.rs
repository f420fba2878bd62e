#![deny(clippy::all, clippy::pedantic)]

pub mod auth;
pub mod content;
pub mod settings;
pub mod status;
