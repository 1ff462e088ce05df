//! Reaction network for repressor feedback on gene expression.
//!
//! This module provides:
//! - SpeciesState: Copy numbers of gene, transcript, protein and repressors
//! - Reaction / ReactionNetwork: Mass-action channels and propensities
//! - LinearModel: Feedback model turned into a network per metabolic condition

pub mod state;
pub mod kinetics;
pub mod model;

pub use state::{Species, SpeciesState};
pub use kinetics::{Reaction, ReactionKind, ReactionNetwork};
pub use model::{Feedback, LinearModel, Mechanism, ModelParameters};
