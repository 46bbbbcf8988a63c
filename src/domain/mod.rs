// Domain layer - Request-scoped shapes, no I/O
pub mod error;
pub mod fragment;
pub mod query;
