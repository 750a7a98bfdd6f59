//! Personality questionnaire scoring.

pub mod classifier;
pub mod model;

pub use classifier::{Classification, classify};
pub use model::{Answer, AnswerSet, AxisPair, AxisPercentages, AxisScores, PersonalityType, Pole};
