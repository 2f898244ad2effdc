// Library interface for huddle-cli.
// The binary is a thin clap wrapper; integration tests drive these modules.

pub mod app;
pub mod client;
pub mod server;

pub use client::{ask, render_frame};
pub use server::{router, serve, ApiError};
