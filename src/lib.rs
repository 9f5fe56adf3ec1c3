//! ImaginAI - turns a text topic into AI-generated images
//!
//! Fans a prompt out to several Gemini image-generation requests, collects
//! whichever images come back, and optionally saves them to disk.

pub mod ai;
pub mod config;
pub mod download;
pub mod error;
pub mod generator;
pub mod models;

pub use error::{Error, Result};
pub use generator::ImageGenerator;
