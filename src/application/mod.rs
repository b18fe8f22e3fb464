// Application layer - use cases and the seams to external collaborators
pub mod art_service;
pub mod error;
pub mod preference_service;
pub mod preference_store;
pub mod sample_source;
