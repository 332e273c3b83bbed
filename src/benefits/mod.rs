pub mod bands;
pub mod classifier;
pub mod narrator;
pub mod policy;
pub mod score;
pub mod tier;

pub use bands::Band;
pub use classifier::{classify, classify_with, ladder, Rung};
pub use narrator::{narrate, UNCLASSIFIED_MESSAGE};
pub use policy::{Level3Boundary, PolicyConfig};
pub use score::{Score, ScoreError, MAX_SCORE, MIN_SCORE};
pub use tier::{BenefitClassification, BenefitOutcome, Exemption, Tier};
