// src/utils/mod.rs

pub mod guards;
pub mod hash;
pub mod html;
pub mod jwt;
