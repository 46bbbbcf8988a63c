// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod i18n;
pub mod superset_client;
