// Application layer - Use cases and the ports they depend on
pub mod block_service;
pub mod dashboard_client;
pub mod settings_store;
pub mod summary_service;
