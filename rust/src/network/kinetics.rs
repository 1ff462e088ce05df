//! Mass-action kinetics for the reaction network.
//!
//! Every reaction has propensity
//!     a(x) = c × Π x_s
//! over at most two reactant species, so a repression term is linear in the
//! repressor count.

use super::state::{Species, SpeciesState};

/// Reaction types; `as_key` names them in debug logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReactionKind {
    /// G → ∅
    GeneDeactivation,
    /// G → G + R
    Transcription,
    /// R → ∅
    TranscriptDecay,
    /// R → R + P
    Translation,
    /// P → ∅
    ProteinDecay,
    /// P → P + X
    RepressorSynthesis,
    /// X → ∅
    RepressorDecay,
    /// X + G → X
    TranscriptionalRepression,
    /// X + R → X
    TranscriptRepression,
    /// X + P → X
    ProteinRepression,
}

impl ReactionKind {
    pub fn as_key(&self) -> &'static str {
        match self {
            ReactionKind::GeneDeactivation => "gene_deactivation",
            ReactionKind::Transcription => "transcription",
            ReactionKind::TranscriptDecay => "transcript_decay",
            ReactionKind::Translation => "translation",
            ReactionKind::ProteinDecay => "protein_decay",
            ReactionKind::RepressorSynthesis => "repressor_synthesis",
            ReactionKind::RepressorDecay => "repressor_decay",
            ReactionKind::TranscriptionalRepression => "transcriptional_repression",
            ReactionKind::TranscriptRepression => "transcript_repression",
            ReactionKind::ProteinRepression => "protein_repression",
        }
    }
}

/// One reaction channel.
#[derive(Clone, Debug)]
pub struct Reaction {
    pub kind: ReactionKind,
    /// Rate constant `c`.
    pub rate: f64,
    /// Species indices whose counts multiply the rate constant.
    pub reactants: Vec<usize>,
    /// (species index, count change) pairs.
    pub change: Vec<(usize, i32)>,
}

impl Reaction {
    /// First-order reaction driven by `driver`.
    pub fn first_order(
        kind: ReactionKind,
        rate: f64,
        driver: Species,
        change: Vec<(Species, i32)>,
    ) -> Self {
        Self {
            kind,
            rate,
            reactants: vec![driver.index()],
            change: change.into_iter().map(|(s, d)| (s.index(), d)).collect(),
        }
    }

    /// Second-order reaction in which `repressor` removes one `target`.
    pub fn repression(kind: ReactionKind, rate: f64, repressor: Species, target: Species) -> Self {
        Self {
            kind,
            rate,
            reactants: vec![repressor.index(), target.index()],
            change: vec![(target.index(), -1)],
        }
    }

    /// Propensity a(x) in state `state`.
    #[inline]
    pub fn propensity(&self, state: &SpeciesState) -> f64 {
        self.reactants
            .iter()
            .fold(self.rate, |acc, &s| acc * state.count_at(s) as f64)
    }
}

/// A reaction network together with its initial state.
#[derive(Clone, Debug)]
pub struct ReactionNetwork {
    pub reactions: Vec<Reaction>,
    pub initial_state: SpeciesState,
}

impl ReactionNetwork {
    pub fn new(reactions: Vec<Reaction>, initial_state: SpeciesState) -> Self {
        Self {
            reactions,
            initial_state,
        }
    }

    pub fn n_reactions(&self) -> usize {
        self.reactions.len()
    }

    /// Key of every reaction channel, in order.
    pub fn reaction_keys(&self) -> Vec<&'static str> {
        self.reactions.iter().map(|r| r.kind.as_key()).collect()
    }

    /// Fill `out` with all propensities and return their sum.
    pub fn propensities(&self, state: &SpeciesState, out: &mut Vec<f64>) -> f64 {
        out.clear();
        let mut total = 0.0;
        for reaction in &self.reactions {
            let a = reaction.propensity(state);
            total += a;
            out.push(a);
        }
        total
    }
}
