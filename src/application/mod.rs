// Application layer - Use cases and the ports they depend on
pub mod blend_api;
pub mod blend_repository;
pub mod blend_service;
pub mod form_controller;
