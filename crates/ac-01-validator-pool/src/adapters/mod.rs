//! Adapters for the Validator Pool ports

mod local_assessor;

pub use local_assessor::{AssessmentRule, LocalAssessor};
