//! Data model for the ingestion pipeline and its remote collaborators.

pub mod detection;
pub mod item;
pub mod photo;
pub mod recipe;
