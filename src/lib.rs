#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod analysis;
pub mod cli;
pub mod entities;
pub mod error;
pub mod session;

mod render;
mod sources;
