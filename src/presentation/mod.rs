// Presentation layer - HTTP surface for the host runtime
pub mod app_state;
pub mod handlers;
pub mod router;
