//! Juris Common - Shared types for the case intake and matching core
//!
//! Deterministic by construction: same input text always yields the same
//! category, urgency, and ranking. No hidden randomness anywhere.

pub mod case;
pub mod classifier;
pub mod error;
pub mod events;
pub mod lexicon;
pub mod matcher;
pub mod provider;
pub mod urgency;

pub use case::*;
pub use classifier::*;
pub use error::*;
pub use events::*;
pub use lexicon::*;
pub use matcher::*;
pub use provider::*;
pub use urgency::*;
