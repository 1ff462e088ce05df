//! Linear feedback model.
//!
//! A transient pool of active genes drives transcription, transcripts drive
//! translation, and each feedback term adds a repressor that is synthesised
//! in proportion to the protein and acts back on the pathway:
//!     G → ∅     at (g0 + η0·X)·G
//!     R → ∅     at (g1 + η1·X)·R
//!     P → ∅     at (g2 + η2·X)·P
//!
//! Feedback flagged as perturbed is what a mutant lacks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::kinetics::{Reaction, ReactionKind, ReactionNetwork};
use super::state::{Species, SpeciesState};
use crate::conditions::Condition;
use crate::error::{GramError, Result};

/// Rate constants and initial input of the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// Transcription rate per active gene.
    pub k0: f64,
    /// Translation rate per transcript.
    pub k1: f64,
    /// Gene deactivation rate.
    pub g0: f64,
    /// Transcript decay rate.
    pub g1: f64,
    /// Protein decay rate.
    pub g2: f64,
    /// Repressor synthesis rate per protein.
    pub kr: f64,
    /// Repressor decay rate.
    pub gr: f64,
    /// Active gene copies at t = 0.
    pub initial_genes: u32,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            k0: 5.0,
            k1: 5.0,
            g0: 0.5,
            g1: 1.0,
            g2: 0.5,
            kr: 0.1,
            gr: 0.5,
            initial_genes: 10,
        }
    }
}

impl ModelParameters {
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("k0", self.k0),
            ("k1", self.k1),
            ("g0", self.g0),
            ("g1", self.g1),
            ("g2", self.g2),
            ("kr", self.kr),
            ("gr", self.gr),
        ];
        for (name, value) in rates {
            check_rate(name, value)?;
        }
        Ok(())
    }
}

fn check_rate(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(GramError::invalid(
            name,
            format!("must be finite and non-negative, got {}", value),
        ));
    }
    Ok(())
}

/// Level of the pathway a repressor acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    /// Represses transcription by deactivating genes (η0).
    Transcription,
    /// Destabilises transcripts (η1).
    TranscriptStability,
    /// Destabilises protein (η2).
    ProteinStability,
}

impl Mechanism {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mechanism::Transcription => "transcription",
            Mechanism::TranscriptStability => "transcript_stability",
            Mechanism::ProteinStability => "protein_stability",
        }
    }
}

impl FromStr for Mechanism {
    type Err = GramError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "transcription" => Ok(Mechanism::Transcription),
            "transcript_stability" => Ok(Mechanism::TranscriptStability),
            "protein_stability" => Ok(Mechanism::ProteinStability),
            other => Err(GramError::invalid(
                "mechanism",
                format!("unknown mechanism '{}'", other),
            )),
        }
    }
}

/// One feedback term: repression strengths at the three levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub eta0: f64,
    pub eta1: f64,
    pub eta2: f64,
    /// Removed in the mutant.
    pub perturbed: bool,
}

impl Feedback {
    pub fn new(eta0: f64, eta1: f64, eta2: f64, perturbed: bool) -> Result<Self> {
        check_rate("eta0", eta0)?;
        check_rate("eta1", eta1)?;
        check_rate("eta2", eta2)?;
        Ok(Self {
            eta0,
            eta1,
            eta2,
            perturbed,
        })
    }

    /// Feedback acting through a single mechanism.
    pub fn single(mechanism: Mechanism, strength: f64, perturbed: bool) -> Result<Self> {
        match mechanism {
            Mechanism::Transcription => Self::new(strength, 0.0, 0.0, perturbed),
            Mechanism::TranscriptStability => Self::new(0.0, strength, 0.0, perturbed),
            Mechanism::ProteinStability => Self::new(0.0, 0.0, strength, perturbed),
        }
    }
}

/// Gene expression model with zero or more linear feedback terms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub parameters: ModelParameters,
    pub feedback: Vec<Feedback>,
}

impl LinearModel {
    pub fn new(parameters: ModelParameters) -> Result<Self> {
        parameters.validate()?;
        Ok(Self {
            parameters,
            feedback: Vec::new(),
        })
    }

    /// Append a feedback term.
    pub fn add_feedback(
        &mut self,
        eta0: f64,
        eta1: f64,
        eta2: f64,
        perturbed: bool,
    ) -> Result<()> {
        self.feedback.push(Feedback::new(eta0, eta1, eta2, perturbed)?);
        Ok(())
    }

    pub fn with_feedback(mut self, feedback: Feedback) -> Self {
        self.feedback.push(feedback);
        self
    }

    pub fn n_perturbed(&self) -> usize {
        self.feedback.iter().filter(|f| f.perturbed).count()
    }

    /// The mutant: every perturbed feedback term removed.
    pub fn without_perturbations(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            feedback: self
                .feedback
                .iter()
                .filter(|f| !f.perturbed)
                .cloned()
                .collect(),
        }
    }

    /// Build the reaction network under a metabolic condition.
    ///
    /// Zero-rate channels are left out.
    pub fn network(&self, condition: Condition) -> ReactionNetwork {
        let p = &self.parameters;
        let s = condition.scaling();
        let mut reactions = vec![
            Reaction::first_order(
                ReactionKind::GeneDeactivation,
                p.g0 * s.decay,
                Species::Gene,
                vec![(Species::Gene, -1)],
            ),
            Reaction::first_order(
                ReactionKind::Transcription,
                p.k0 * s.transcription,
                Species::Gene,
                vec![(Species::Transcript, 1)],
            ),
            Reaction::first_order(
                ReactionKind::TranscriptDecay,
                p.g1 * s.decay,
                Species::Transcript,
                vec![(Species::Transcript, -1)],
            ),
            Reaction::first_order(
                ReactionKind::Translation,
                p.k1 * s.translation,
                Species::Transcript,
                vec![(Species::Protein, 1)],
            ),
            Reaction::first_order(
                ReactionKind::ProteinDecay,
                p.g2 * s.decay,
                Species::Protein,
                vec![(Species::Protein, -1)],
            ),
        ];

        for (k, fb) in self.feedback.iter().enumerate() {
            let repressor = Species::Repressor(k);
            reactions.push(Reaction::first_order(
                ReactionKind::RepressorSynthesis,
                p.kr * s.repressor_synthesis(),
                Species::Protein,
                vec![(repressor, 1)],
            ));
            reactions.push(Reaction::first_order(
                ReactionKind::RepressorDecay,
                p.gr * s.decay,
                repressor,
                vec![(repressor, -1)],
            ));
            let targets = [
                (ReactionKind::TranscriptionalRepression, fb.eta0, Species::Gene),
                (ReactionKind::TranscriptRepression, fb.eta1, Species::Transcript),
                (ReactionKind::ProteinRepression, fb.eta2, Species::Protein),
            ];
            for (kind, eta, target) in targets {
                reactions.push(Reaction::repression(kind, eta, repressor, target));
            }
        }

        reactions.retain(|r| r.rate > 0.0);

        ReactionNetwork::new(
            reactions,
            SpeciesState::new(p.initial_genes, self.feedback.len()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_without_feedback() {
        let model = LinearModel::new(ModelParameters::default()).unwrap();
        let network = model.network(Condition::Normal);
        assert_eq!(network.n_reactions(), 5);
        assert_eq!(network.initial_state.count(Species::Gene), 10);
        assert_eq!(network.initial_state.n_repressors(), 0);
    }

    #[test]
    fn test_single_feedback_has_one_repression_channel() {
        let model = LinearModel::new(ModelParameters::default())
            .unwrap()
            .with_feedback(Feedback::single(Mechanism::ProteinStability, 0.1, true).unwrap());
        let network = model.network(Condition::Normal);

        // 5 core + synthesis + decay + one repression
        assert_eq!(network.n_reactions(), 8);
        let repressions: Vec<_> = network
            .reactions
            .iter()
            .filter(|r| r.reactants.len() == 2)
            .collect();
        assert_eq!(repressions.len(), 1);
        assert_eq!(repressions[0].kind, ReactionKind::ProteinRepression);
        assert_eq!(repressions[0].rate, 0.1);
    }

    #[test]
    fn test_without_perturbations() {
        let mut model = LinearModel::new(ModelParameters::default()).unwrap();
        model.add_feedback(0.02, 0.0, 0.0, false).unwrap();
        model.add_feedback(0.0, 0.0, 0.05, true).unwrap();
        assert_eq!(model.n_perturbed(), 1);

        let mutant = model.without_perturbations();
        assert_eq!(mutant.feedback.len(), 1);
        assert_eq!(mutant.feedback[0].eta0, 0.02);
        assert_eq!(mutant.n_perturbed(), 0);
    }

    #[test]
    fn test_condition_scales_rates() {
        let model = LinearModel::new(ModelParameters::default()).unwrap();
        let normal = model.network(Condition::Normal);
        let limited = model.network(Condition::CarbonLimited);

        let rate = |net: &ReactionNetwork, kind: ReactionKind| {
            net.reactions.iter().find(|r| r.kind == kind).unwrap().rate
        };
        assert_eq!(
            rate(&limited, ReactionKind::Translation),
            0.5 * rate(&normal, ReactionKind::Translation)
        );
        assert_eq!(
            rate(&limited, ReactionKind::ProteinDecay),
            0.5 * rate(&normal, ReactionKind::ProteinDecay)
        );

        let minute = model.network(Condition::Minute);
        assert_eq!(
            rate(&minute, ReactionKind::Transcription),
            rate(&normal, ReactionKind::Transcription)
        );
    }

    #[test]
    fn test_rejects_negative_strength() {
        let mut model = LinearModel::new(ModelParameters::default()).unwrap();
        let err = model.add_feedback(-1.0, 0.0, 0.0, false).unwrap_err();
        assert!(matches!(err, GramError::InvalidParameter { ref name, .. } if name == "eta0"));
        assert!(model.feedback.is_empty());
    }

    #[test]
    fn test_mechanism_names() {
        for m in [
            Mechanism::Transcription,
            Mechanism::TranscriptStability,
            Mechanism::ProteinStability,
        ] {
            assert_eq!(m.as_str().parse::<Mechanism>().unwrap(), m);
        }
        assert!("translation".parse::<Mechanism>().is_err());
    }

    #[test]
    fn test_rejects_non_finite_rate() {
        let params = ModelParameters {
            g1: f64::NAN,
            ..Default::default()
        };
        assert!(LinearModel::new(params).is_err());
    }
}
