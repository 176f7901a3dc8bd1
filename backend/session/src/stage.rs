//! Step metadata for the progress indicator.

use haute_core::{SearchMode, Stage};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    pub stage: Stage,
    pub title: &'static str,
    pub description: &'static str,
}

const IMAGE_STEPS: &[StepInfo] = &[
    StepInfo {
        stage: Stage::Capture,
        title: "Capture",
        description: "Take or Upload Photo",
    },
    StepInfo {
        stage: Stage::Select,
        title: "Select",
        description: "Select Item in Photo",
    },
    StepInfo {
        stage: Stage::Describe,
        title: "Describe",
        description: "Describe the Item",
    },
    StepInfo {
        stage: Stage::Search,
        title: "Search",
        description: "Search Results",
    },
];

const TEXT_STEPS: &[StepInfo] = &[
    StepInfo {
        stage: Stage::CustomDescribe,
        title: "Describe",
        description: "Describe What You Want",
    },
    StepInfo {
        stage: Stage::Search,
        title: "Search",
        description: "Search Results",
    },
];

/// The ordered steps shown for a search mode.
pub fn steps(mode: SearchMode) -> &'static [StepInfo] {
    match mode {
        SearchMode::Image => IMAGE_STEPS,
        SearchMode::Text => TEXT_STEPS,
    }
}

/// The entry stage for a search mode.
pub fn entry_stage(mode: SearchMode) -> Stage {
    steps(mode)[0].stage
}

pub fn step_index(mode: SearchMode, stage: Stage) -> Option<usize> {
    steps(mode).iter().position(|s| s.stage == stage)
}

/// Fraction of the flow completed, `0.0` at the entry stage and `1.0` at results.
pub fn progress(mode: SearchMode, stage: Stage) -> f32 {
    let total = steps(mode).len();
    match step_index(mode, stage) {
        Some(index) if total > 1 => index as f32 / (total - 1) as f32,
        _ => 0.0,
    }
}
