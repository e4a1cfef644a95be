// src/models/mod.rs

pub mod comment;
pub mod friend_request;
pub mod session;
pub mod user;
