//! Project workflow state machine.
//!
//! A project walks a fixed six-step workflow. The status string is what the
//! `projects.status` column stores; the step number is what the UI renders
//! in its stepper and what `projects.current_step` mirrors.
//!
//! Status only ever moves forward. Every status write goes through
//! [`ProjectStatus::transition_to`] so `current_step` can never drift.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Total number of workflow steps shown to the user.
pub const TOTAL_STEPS: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    StrategyPending,
    ScenesPending,
    PromptsPending,
    Generating,
    PostProduction,
    Completed,
}

impl ProjectStatus {
    /// Every status in workflow order.
    pub const ALL: [ProjectStatus; 7] = [
        ProjectStatus::Draft,
        ProjectStatus::StrategyPending,
        ProjectStatus::ScenesPending,
        ProjectStatus::PromptsPending,
        ProjectStatus::Generating,
        ProjectStatus::PostProduction,
        ProjectStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::StrategyPending => "strategy_pending",
            ProjectStatus::ScenesPending => "scenes_pending",
            ProjectStatus::PromptsPending => "prompts_pending",
            ProjectStatus::Generating => "generating",
            ProjectStatus::PostProduction => "post_production",
            ProjectStatus::Completed => "completed",
        }
    }

    /// The 1-based workflow step this status belongs to.
    pub fn step(self) -> i32 {
        match self {
            ProjectStatus::Draft => 1,
            ProjectStatus::StrategyPending => 2,
            ProjectStatus::ScenesPending => 3,
            ProjectStatus::PromptsPending => 4,
            ProjectStatus::Generating => 5,
            ProjectStatus::PostProduction | ProjectStatus::Completed => 6,
        }
    }

    /// The status that directly follows this one, or `None` at the end.
    pub fn next(self) -> Option<ProjectStatus> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    /// All statuses strictly before `self`, i.e. the legal predecessors.
    pub fn predecessors(self) -> Vec<ProjectStatus> {
        Self::ALL.iter().copied().filter(|s| *s < self).collect()
    }

    pub fn is_terminal(self) -> bool {
        self == ProjectStatus::Completed
    }

    /// Validate a move from `self` to `target`.
    ///
    /// Any strictly forward move is legal; staying put or moving back is a
    /// conflict.
    pub fn transition_to(self, target: ProjectStatus) -> Result<ProjectStatus, CoreError> {
        if target > self {
            Ok(target)
        } else {
            Err(CoreError::Conflict(format!(
                "Cannot move project from '{self}' to '{target}'"
            )))
        }
    }

    /// Require the project to currently be in `expected`.
    pub fn require(self, expected: ProjectStatus) -> Result<(), CoreError> {
        if self == expected {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Project must be in '{expected}' status (currently '{self}')"
            )))
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown project status '{s}'")))
    }
}
