// Library surface for the binary and the headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod generator;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod session;
pub mod ui;
