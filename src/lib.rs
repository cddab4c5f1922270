//! proofctl — a command-line client for the campaign proof API.
//!
//! The API owns every meaningful state transition (AI processing, proof
//! rendering, approval, scheduling); this crate collects input, calls the
//! right endpoint in the right order, and renders the response.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod preview;
pub mod ui;
