#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

pub mod cache;
pub mod config;
pub mod http;
pub mod reps;
pub mod upstream;
pub mod votes;
