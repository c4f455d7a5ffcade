//! Independent crisis-phrase safety monitoring.

pub mod model;
pub mod monitor;

pub use model::{RiskAssessment, RiskCategory, RiskTier};
pub use monitor::{CrisisPhraseMonitor, SafetyAssessor};
