// src/handlers/mod.rs

pub mod health;
pub mod responses;
pub mod surveys;
