//! Conversion of generated training days into Hevy routine payloads.

use crate::resolver::ExerciseResolver;
use crate::routine::{ExerciseBlock, RemoteSet, RepRange, RoutinePayload, SetKind};
use crate::{Error, PrescribedSet, Program, Result, TrainingDay};

/// Pounds to kilograms
pub const LBS_TO_KG: f64 = 0.453592;

/// Sets at or below this percentage of training max are warmups
const WARMUP_CEILING_PCT: f64 = 60.0;

/// AMRAP rep ranges end at no less than this
const MIN_AMRAP_RANGE_END: u32 = 10;

/// Routine title for a training day, e.g. "531 BBB W2D3 - Deadlift"
pub fn routine_title(day: &TrainingDay) -> String {
    format!("531 BBB W{}D{} - {}", day.week, day.day, day.main_lift)
}

pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * LBS_TO_KG
}

/// Convert one training day into a routine payload.
///
/// Consecutive sets with the same exercise name share one exercise block.
/// Fails if any exercise name cannot be resolved.
pub fn convert_day(day: &TrainingDay, resolver: &ExerciseResolver) -> Result<RoutinePayload> {
    let title = routine_title(day);

    let (_, exercises) = day
        .sets
        .iter()
        .try_fold(
            (None::<&str>, Vec::<ExerciseBlock>::new()),
            |(current, mut blocks), set| {
                if current != Some(set.exercise.as_str()) {
                    let template_id = resolver.resolve(&set.exercise)?;
                    blocks.push(ExerciseBlock::new(template_id));
                }
                if let Some(block) = blocks.last_mut() {
                    block.sets.extend(convert_set(set));
                }
                Ok::<_, Error>((Some(set.exercise.as_str()), blocks))
            },
        )
        .map_err(|e| Error::Resolution {
            routine: title.clone(),
            source: Box::new(e),
        })?;

    Ok(RoutinePayload {
        title,
        folder_id: None,
        notes: None,
        exercises,
    })
}

/// Convert every day of the program, in order
pub fn convert_program(program: &Program, resolver: &ExerciseResolver) -> Result<Vec<RoutinePayload>> {
    program
        .days
        .iter()
        .map(|day| convert_day(day, resolver))
        .collect()
}

/// Expand one prescribed set into `sets` identical remote sets
pub fn convert_set(set: &PrescribedSet) -> Vec<RemoteSet> {
    let kind = if set.percentage > 0.0 && set.percentage <= WARMUP_CEILING_PCT {
        SetKind::Warmup
    } else {
        SetKind::Normal
    };

    let weight_kg = (set.weight > 0.0).then(|| lbs_to_kg(set.weight));

    let (amrap, reps) = parse_reps(&set.reps);
    let (reps, rep_range) = match (amrap, reps) {
        (_, 0) => (None, None),
        (false, reps) => (Some(reps), None),
        (true, reps) => (
            None,
            Some(RepRange {
                start: reps,
                end: reps.saturating_mul(2).max(MIN_AMRAP_RANGE_END),
            }),
        ),
    };

    let remote = RemoteSet {
        kind,
        weight_kg,
        reps,
        rep_range,
    };
    vec![remote; set.sets as usize]
}

/// Split "5+" into (open-ended, 5). Anything unparseable counts as 0 reps.
fn parse_reps(notation: &str) -> (bool, u32) {
    let (amrap, digits) = match notation.strip_suffix('+') {
        Some(rest) => (true, rest),
        None => (false, notation),
    };
    (amrap, digits.parse().unwrap_or(0))
}
