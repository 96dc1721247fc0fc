//! Antagonist archetypes and their evolution stages.

mod archetype;
mod stage;

pub use archetype::*;
pub use stage::*;
