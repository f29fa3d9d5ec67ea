//! Remote data model for the Hevy API.
//!
//! These types mirror the JSON the service sends and expects. Optional
//! fields are skipped when serializing so payloads only carry what is set.

use serde::{Deserialize, Serialize};

/// An exercise in the remote catalog
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseTemplate {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub primary_muscle_group: String,
    #[serde(default)]
    pub is_custom: bool,
}

/// Classification of a routine set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    Warmup,
    Normal,
    Failure,
    Dropset,
}

/// Open-ended rep target, used for AMRAP sets
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepRange {
    pub start: u32,
    pub end: u32,
}

/// One set inside a routine exercise. `reps` and `rep_range` are exclusive.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RemoteSet {
    #[serde(rename = "type")]
    pub kind: SetKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rep_range: Option<RepRange>,
}

/// A block of sets for one exercise template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseBlock {
    pub exercise_template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superset_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub sets: Vec<RemoteSet>,
}

impl ExerciseBlock {
    pub fn new(exercise_template_id: impl Into<String>) -> Self {
        Self {
            exercise_template_id: exercise_template_id.into(),
            superset_id: None,
            rest_seconds: None,
            notes: None,
            sets: Vec::new(),
        }
    }
}

/// Body of a routine create or update request
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoutinePayload {
    /// Identity key when syncing
    pub title: String,
    /// Only allowed on create; the service rejects it on update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub exercises: Vec<ExerciseBlock>,
}

impl RoutinePayload {
    /// Copy of the payload placed in the given folder, for creation
    pub fn for_create(&self, folder_id: i64) -> Self {
        Self {
            folder_id: Some(folder_id),
            ..self.clone()
        }
    }

    /// Copy of the payload without a folder reference, for update
    pub fn for_update(&self) -> Self {
        Self {
            folder_id: None,
            ..self.clone()
        }
    }
}

/// A routine as echoed back after create/update
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Routine {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub folder_id: Option<i64>,
}

/// A routine folder
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Folder {
    pub id: i64,
    pub title: String,
}
