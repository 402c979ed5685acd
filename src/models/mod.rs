// src/models/mod.rs

pub mod question;
pub mod response;
pub mod survey;
pub mod timestamp;
