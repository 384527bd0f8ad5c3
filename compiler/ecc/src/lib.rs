//! EC command-line driver.
//!
//! Everything the `ec` binary does beyond argument matching lives here so the
//! integration tests and embedders can reach it:
//!
//! ```text
//! path ──► read_source() ──► Program::parse() ──► EngineBuilder ──► Engine::run()
//!                                                                     │
//!                                         TerminalEmitter (stderr) ◄──┘ on error
//! ```

pub mod commands;
mod tracing_setup;

pub use tracing_setup::init_tracing;
