//! Delivery milestones and the capabilities they enable.
//!
//! A session is pinned to a milestone. Each stage of `execute` asks the
//! milestone whether its capability is available before running.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Implementation stage of the front-end, in delivery order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Milestone {
    #[default]
    #[serde(rename = "milestone-unknown")]
    Unknown,
    #[serde(rename = "milestone1-readiness")]
    Readiness,
    #[serde(rename = "milestone2-parser-validation")]
    ParserValidation,
    #[serde(rename = "milestone3-planning-execution")]
    PlanningExecution,
    #[serde(rename = "milestone4-ecosystem-tooling")]
    EcosystemTooling,
    #[serde(rename = "milestone5-launch-preparation")]
    LaunchPreparation,
}

impl Milestone {
    /// All milestones in order.
    pub const ALL: [Milestone; 6] = [
        Milestone::Unknown,
        Milestone::Readiness,
        Milestone::ParserValidation,
        Milestone::PlanningExecution,
        Milestone::EcosystemTooling,
        Milestone::LaunchPreparation,
    ];

    /// Returns the stable name of this milestone.
    pub fn as_str(self) -> &'static str {
        match self {
            Milestone::Unknown => "milestone-unknown",
            Milestone::Readiness => "milestone1-readiness",
            Milestone::ParserValidation => "milestone2-parser-validation",
            Milestone::PlanningExecution => "milestone3-planning-execution",
            Milestone::EcosystemTooling => "milestone4-ecosystem-tooling",
            Milestone::LaunchPreparation => "milestone5-launch-preparation",
        }
    }

    /// Returns true if this milestone enables `capability`.
    pub fn supports(self, capability: Capability) -> bool {
        match capability {
            Capability::Parsing | Capability::SemanticValidation => {
                self >= Milestone::ParserValidation
            }
            Capability::Execution => self >= Milestone::PlanningExecution,
        }
    }

    /// Fails with a [`MilestoneError`] unless `capability` is enabled.
    pub fn require(self, capability: Capability) -> Result<(), MilestoneError> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(MilestoneError {
                milestone: self,
                capability,
            })
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Milestone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Milestone::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown milestone {s:?}"))
    }
}

/// A functional capability gated by milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Parsing,
    SemanticValidation,
    Execution,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::Parsing => "parsing",
            Capability::SemanticValidation => "semantic validation",
            Capability::Execution => "execution",
        })
    }
}

/// A capability was requested that the milestone does not enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("gql: {capability} is unavailable for {milestone}")]
pub struct MilestoneError {
    pub milestone: Milestone,
    pub capability: Capability,
}
