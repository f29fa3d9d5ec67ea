//! Program generator for the 4-week 5/3/1 BBB cycle.
//!
//! Each day is built as:
//! 1. Main lift warmups (weeks 1-3) and working sets, or the deload sets (week 4)
//! 2. One BBB block of 5x10 on the paired lift
//! 3. An optional 5x10 accessory with no weight

use crate::{Lift, PrescribedSet, Program, ProgramConfig, Result, TrainingDay};

/// Number of weeks in a cycle
pub const WEEKS: u32 = 4;

/// Percentages and rep targets for a run of main lift sets
#[derive(Clone, Copy, Debug)]
pub struct WeekScheme {
    pub percentages: [f64; 3],
    pub reps: [&'static str; 3],
}

/// Warmup: 40% x5, 50% x5, 60% x3
pub const WARMUP_SCHEME: WeekScheme = WeekScheme {
    percentages: [40.0, 50.0, 60.0],
    reps: ["5", "5", "3"],
};

/// Deload week: 40% x5, 50% x5, 60% x5
pub const DELOAD_SCHEME: WeekScheme = WeekScheme {
    percentages: [40.0, 50.0, 60.0],
    reps: ["5", "5", "5"],
};

static WORKING_SCHEMES: [WeekScheme; 3] = [
    WeekScheme {
        percentages: [65.0, 75.0, 85.0],
        reps: ["5", "5", "5+"],
    },
    WeekScheme {
        percentages: [70.0, 80.0, 90.0],
        reps: ["3", "3", "3+"],
    },
    WeekScheme {
        percentages: [75.0, 85.0, 95.0],
        reps: ["5", "3", "1+"],
    },
];

const BBB_SETS: u32 = 5;
const BBB_REPS: &str = "10";
const ACCESSORY_SETS: u32 = 5;
const ACCESSORY_REPS: &str = "10";

/// Working set scheme for weeks 1-3; None for the deload week
pub fn working_scheme(week: u32) -> Option<&'static WeekScheme> {
    match week {
        1..=3 => WORKING_SCHEMES.get((week - 1) as usize),
        _ => None,
    }
}

/// Round a weight to the nearest 5 lbs
pub fn round_to_nearest_5(weight: f64) -> f64 {
    ((weight + 2.5) / 5.0).floor() * 5.0
}

/// Training max is 90% of a true 1RM, rounded to the nearest 5
pub fn training_max_from_1rm(one_rep_max: f64) -> f64 {
    round_to_nearest_5(one_rep_max * 0.9)
}

/// Generate the full program from a validated config
pub fn generate(config: &ProgramConfig) -> Result<Program> {
    config.validate()?;

    let mut days = Vec::with_capacity((WEEKS as usize) * config.lift_order.len());

    for week in 1..=WEEKS {
        for (index, &main_lift) in config.lift_order.iter().enumerate() {
            let training_max = config.training_maxes[&main_lift];
            let mut sets = Vec::new();

            match working_scheme(week) {
                Some(working) => {
                    sets.extend(main_sets(main_lift, training_max, &WARMUP_SCHEME));
                    sets.extend(main_sets(main_lift, training_max, working));
                }
                None => sets.extend(main_sets(main_lift, training_max, &DELOAD_SCHEME)),
            }

            let bbb_lift = config
                .bbb_pairing
                .get(&main_lift)
                .copied()
                .unwrap_or(main_lift);
            sets.push(bbb_set(
                bbb_lift,
                config.training_maxes[&bbb_lift],
                config.bbb_percentage,
            ));

            if let Some(accessory) = config.accessories.get(&main_lift) {
                if !accessory.is_empty() {
                    sets.push(PrescribedSet {
                        exercise: accessory.clone(),
                        sets: ACCESSORY_SETS,
                        reps: ACCESSORY_REPS.into(),
                        weight: 0.0,
                        percentage: 0.0,
                    });
                }
            }

            days.push(TrainingDay {
                week,
                day: index as u32 + 1,
                main_lift,
                sets,
            });
        }
    }

    tracing::debug!("Generated program with {} days", days.len());
    Ok(Program { days })
}

fn main_sets(lift: Lift, training_max: f64, scheme: &WeekScheme) -> Vec<PrescribedSet> {
    scheme
        .percentages
        .iter()
        .zip(scheme.reps.iter())
        .map(|(&pct, &reps)| PrescribedSet {
            exercise: lift.name().into(),
            sets: 1,
            reps: reps.into(),
            weight: round_to_nearest_5(training_max * pct / 100.0),
            percentage: pct,
        })
        .collect()
}

fn bbb_set(lift: Lift, training_max: f64, percentage: f64) -> PrescribedSet {
    PrescribedSet {
        exercise: lift.name().into(),
        sets: BBB_SETS,
        reps: BBB_REPS.into(),
        weight: round_to_nearest_5(training_max * percentage / 100.0),
        percentage,
    }
}
