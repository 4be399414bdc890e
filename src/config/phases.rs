// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Load phases of the k6 scenario. The defaults describe the standard
//! 30s ramp-up, 60s steady load and 30s ramp-down shape. Label positions
//! are fixed offsets and are not derived from the data, so a test with a
//! different stage layout needs its own `[phases]` section.

use serde_derive::*;

/// end of the ramp-up stage, in elapsed seconds
pub const RAMP_UP_END: f64 = 30.0;
/// start of the ramp-down stage, in elapsed seconds
pub const RAMP_DOWN_START: f64 = 90.0;

pub const RAMP_UP_LABEL_AT: f64 = 15.0;
pub const STEADY_LOAD_LABEL_AT: f64 = 60.0;
pub const RAMP_DOWN_LABEL_AT: f64 = 105.0;

/// labels sit at this fraction of the upper y-axis bound
pub const LABEL_HEIGHT: f64 = 0.97;

fn default_boundaries() -> Vec<f64> {
    vec![RAMP_UP_END, RAMP_DOWN_START]
}

fn default_labels() -> Vec<PhaseLabel> {
    vec![
        PhaseLabel::new("Ramp-up", RAMP_UP_LABEL_AT),
        PhaseLabel::new("Steady Load", STEADY_LOAD_LABEL_AT),
        PhaseLabel::new("Ramp-down", RAMP_DOWN_LABEL_AT),
    ]
}

fn default_label_height() -> f64 {
    LABEL_HEIGHT
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseLabel {
    text: String,
    at: f64,
}

impl PhaseLabel {
    pub fn new(text: &str, at: f64) -> Self {
        Self {
            text: text.to_string(),
            at,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// elapsed time the label is centred on
    pub fn at(&self) -> f64 {
        self.at
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Phases {
    #[serde(default = "default_boundaries")]
    boundaries: Vec<f64>,
    #[serde(default = "default_labels")]
    labels: Vec<PhaseLabel>,
    #[serde(default = "default_label_height")]
    label_height: f64,
}

impl Default for Phases {
    fn default() -> Self {
        Self {
            boundaries: default_boundaries(),
            labels: default_labels(),
            label_height: default_label_height(),
        }
    }
}

impl Phases {
    /// elapsed times where a dashed marker is drawn
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn labels(&self) -> &[PhaseLabel] {
        &self.labels
    }

    pub fn label_height(&self) -> f64 {
        self.label_height
    }

    /// furthest elapsed time any marker or label refers to
    pub fn extent(&self) -> f64 {
        self.boundaries
            .iter()
            .copied()
            .chain(self.labels.iter().map(|l| l.at))
            .fold(0.0, f64::max)
    }
}
