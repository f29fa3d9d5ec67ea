//! Core domain types for the 5/3/1 BBB program.
//!
//! This module defines the fundamental types used throughout the system:
//! - The four main lifts and their accessory presets
//! - Program configuration (training maxes, order, BBB pairing)
//! - Prescribed sets, training days and the generated program

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Lifts
// ============================================================================

/// One of the four main lifts
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lift {
    #[serde(rename = "Squat")]
    Squat,
    #[serde(rename = "Bench Press")]
    BenchPress,
    #[serde(rename = "Deadlift")]
    Deadlift,
    #[serde(rename = "Overhead Press")]
    OverheadPress,
}

impl Lift {
    /// All lifts, in the standard 5/3/1 day order
    pub const ALL: [Lift; 4] = [
        Lift::Squat,
        Lift::BenchPress,
        Lift::Deadlift,
        Lift::OverheadPress,
    ];

    /// Display name, also used as the exercise name in generated sets
    pub fn name(self) -> &'static str {
        match self {
            Lift::Squat => "Squat",
            Lift::BenchPress => "Bench Press",
            Lift::Deadlift => "Deadlift",
            Lift::OverheadPress => "Overhead Press",
        }
    }

    /// Accessory options offered for this lift's day
    pub fn accessory_presets(self) -> &'static [&'static str] {
        match self {
            Lift::Squat => &["Leg Curl", "Lunges", "Leg Press", "Bulgarian Split Squat"],
            Lift::BenchPress => &[
                "Dumbbell Press",
                "Dumbbell Row",
                "Dips",
                "Tricep Pushdown",
                "Cable Fly",
            ],
            Lift::Deadlift => &[
                "Barbell Row",
                "Good Morning",
                "Hanging Leg Raise",
                "Back Extension",
            ],
            Lift::OverheadPress => &["Lateral Raise", "Face Pull", "Rear Delt Fly", "Pull-up"],
        }
    }

    /// Training max increase applied when moving to the next cycle
    pub fn cycle_increment(self) -> f64 {
        match self {
            Lift::Squat | Lift::Deadlift => 10.0,
            Lift::BenchPress | Lift::OverheadPress => 5.0,
        }
    }
}

impl fmt::Display for Lift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Lift {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "squat" => Ok(Lift::Squat),
            "bench" | "bench press" | "bench_press" => Ok(Lift::BenchPress),
            "deadlift" => Ok(Lift::Deadlift),
            "ohp" | "overhead press" | "overhead_press" | "press" => Ok(Lift::OverheadPress),
            other => Err(Error::Program(format!("unknown lift: {}", other))),
        }
    }
}

// ============================================================================
// Program Configuration
// ============================================================================

/// Inputs for generating one 4-week cycle
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgramConfig {
    /// Training max for each lift, in pounds
    #[serde(alias = "TrainingMaxes")]
    pub training_maxes: BTreeMap<Lift, f64>,

    /// Main lift for each training day (day 1 = index 0)
    #[serde(alias = "LiftOrder")]
    pub lift_order: Vec<Lift>,

    /// Percentage of training max used for the BBB sets
    #[serde(alias = "BBBPercentage")]
    pub bbb_percentage: f64,

    /// Lift used for the BBB sets on each main lift's day
    #[serde(alias = "BBBPairing")]
    pub bbb_pairing: BTreeMap<Lift, Lift>,

    /// Accessory exercise for each main lift's day
    #[serde(alias = "Accessories", default)]
    pub accessories: BTreeMap<Lift, String>,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            training_maxes: BTreeMap::new(),
            lift_order: Lift::ALL.to_vec(),
            bbb_percentage: 50.0,
            bbb_pairing: Lift::ALL.iter().map(|&lift| (lift, lift)).collect(),
            accessories: Lift::ALL
                .iter()
                .map(|&lift| (lift, lift.accessory_presets()[0].to_string()))
                .collect(),
        }
    }
}

impl ProgramConfig {
    /// Copy of this config with the standard 5/3/1 training max increases
    pub fn next_cycle(&self) -> Self {
        let mut next = self.clone();
        for (lift, max) in next.training_maxes.iter_mut() {
            *max += lift.cycle_increment();
        }
        next
    }

    /// Check the config can produce a full program
    pub fn validate(&self) -> Result<()> {
        if self.lift_order.len() != Lift::ALL.len() {
            return Err(Error::Program(format!(
                "lift order must name {} lifts, got {}",
                Lift::ALL.len(),
                self.lift_order.len()
            )));
        }
        for lift in Lift::ALL {
            if !self.lift_order.contains(&lift) {
                return Err(Error::Program(format!("lift order is missing {}", lift)));
            }
            match self.training_maxes.get(&lift) {
                Some(max) if max.is_finite() && *max > 0.0 => {}
                _ => {
                    return Err(Error::Program(format!(
                        "missing or non-positive training max for {}",
                        lift
                    )))
                }
            }
        }
        if !(self.bbb_percentage.is_finite() && self.bbb_percentage > 0.0) {
            return Err(Error::Program("BBB percentage must be a positive number".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Generated Program
// ============================================================================

/// One prescribed line of work (e.g. "5 x 10 @ 135")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PrescribedSet {
    pub exercise: String,
    pub sets: u32,
    /// Plain count ("5") or open-ended AMRAP ("5+")
    pub reps: String,
    /// Pounds; 0 means no weight specified
    pub weight: f64,
    /// Percentage of training max; 0 means not percentage-based
    pub percentage: f64,
}

/// A single training day. Sets of one exercise are always contiguous.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrainingDay {
    pub week: u32,
    pub day: u32,
    pub main_lift: Lift,
    pub sets: Vec<PrescribedSet>,
}

/// The full 4-week program, week-major then day order
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Program {
    pub days: Vec<TrainingDay>,
}
