// Domain layer - Blend records, form state and errors
pub mod blend;
pub mod cast;
pub mod error;
pub mod form;
