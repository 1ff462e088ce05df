//! Species counts for the linear feedback network.
//!
//! The first three slots are fixed (gene, transcript, protein); one repressor
//! slot follows per feedback term.

use std::fmt;

/// A molecular species in the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Species {
    /// Active gene copies (the transient input).
    Gene,
    /// Transcript.
    Transcript,
    /// Protein (the output).
    Protein,
    /// Repressor belonging to the feedback term with this index.
    Repressor(usize),
}

impl Species {
    /// Slot in a `SpeciesState`.
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Species::Gene => 0,
            Species::Transcript => 1,
            Species::Protein => 2,
            Species::Repressor(k) => 3 + k,
        }
    }
}

/// Copy numbers of every species at one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeciesState {
    counts: Vec<u32>,
}

impl SpeciesState {
    /// Initial state: `genes` active gene copies, everything else zero.
    pub fn new(genes: u32, n_repressors: usize) -> Self {
        let mut counts = vec![0; 3 + n_repressors];
        counts[Species::Gene.index()] = genes;
        Self { counts }
    }

    #[inline]
    pub fn count(&self, species: Species) -> u32 {
        self.counts[species.index()]
    }

    #[inline]
    pub fn count_at(&self, index: usize) -> u32 {
        self.counts[index]
    }

    #[inline]
    pub fn protein(&self) -> u32 {
        self.count(Species::Protein)
    }

    pub fn n_species(&self) -> usize {
        self.counts.len()
    }

    pub fn n_repressors(&self) -> usize {
        self.counts.len() - 3
    }

    /// Apply a stoichiometric change.
    ///
    /// Counts saturate at zero; a reaction is only fired when its propensity
    /// is positive, so every consumed reactant is present.
    pub fn apply(&mut self, change: &[(usize, i32)]) {
        for &(index, delta) in change {
            let slot = &mut self.counts[index];
            *slot = slot.saturating_add_signed(delta);
        }
    }
}

impl fmt::Display for SpeciesState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State(G={}, R={}, P={}",
            self.count(Species::Gene),
            self.count(Species::Transcript),
            self.count(Species::Protein)
        )?;
        for k in 0..self.n_repressors() {
            write!(f, ", X{}={}", k, self.count(Species::Repressor(k)))?;
        }
        write!(f, ")")
    }
}
