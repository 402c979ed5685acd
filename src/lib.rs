// src/lib.rs

//! Survey authoring and response collection.
//!
//! The [`form`] engine and the [`client`] transport run on the respondent's or
//! author's side; the remaining modules make up the HTTP service behind it.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod form;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

// Re-export specific items for convenience if needed
pub use client::{HttpTransport, SurveyTransport, TransportError};
pub use routes::create_router;
