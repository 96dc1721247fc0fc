//! # Content Rules
//!
//! The read-only side of the escalation stage: antagonist archetypes, their
//! evolution stages, the tone tables and the intensity dials. This crate holds
//! no session state and makes no narrative decisions.
//!
//! ## Core Components
//!
//! - **threshold**: `ThresholdMap`, resolved by nearest key at or below an input
//! - **archetypes**: archetype templates and their evolution stages
//! - **catalog**: the loaded content table shared by all sessions
//! - **dials**: pacing and tone names and the numbers they stand for

pub mod archetypes;
pub mod catalog;
pub mod dials;
pub mod error;
pub mod threshold;

pub use archetypes::*;
pub use catalog::*;
pub use dials::*;
pub use error::*;
pub use threshold::*;
