// Infrastructure layer - External dependencies and adapters
pub mod api_client;
pub mod config;
pub mod form_snapshot;
pub mod http_response;
pub mod memory_repository;
pub mod postgres_repository;
