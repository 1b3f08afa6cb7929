// Presentation layer - HTTP handlers, routing and command output
pub mod app_state;
pub mod cli;
pub mod handlers;
pub mod router;
