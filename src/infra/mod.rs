pub mod config;
pub mod gemini;
