//! Personas: one character profile per personality type.

pub mod catalog;
pub mod model;

pub use catalog::{default_personas, seed_default_personas};
pub use model::{Persona, PersonaBadge, PersonaTraits};
