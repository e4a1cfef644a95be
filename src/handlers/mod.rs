// src/handlers/mod.rs

pub mod auth;
pub mod comments;
pub mod engagement;
pub mod feed;
pub mod friends;
pub mod sessions;
pub mod users;
