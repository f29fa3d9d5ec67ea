//! Exercise name resolution against the remote template catalog.
//!
//! Names are matched case-insensitively in three passes, first hit wins:
//! exact title, the alias table, then a substring match in either direction.

use crate::routine::ExerciseTemplate;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Built-in aliases, built once and reused
static DEFAULT_ALIASES: Lazy<AliasTable> = Lazy::new(build_default_aliases);

/// Maps a canonical lowercase exercise name to acceptable remote titles, in
/// order of preference.
#[derive(Clone, Debug, Default)]
pub struct AliasTable {
    entries: HashMap<String, Vec<String>>,
}

impl AliasTable {
    /// Get a reference to the built-in alias table
    pub fn builtin() -> &'static AliasTable {
        &DEFAULT_ALIASES
    }

    /// Copy of this table with `overrides` layered on top.
    ///
    /// An override replaces the whole alias list for its name.
    pub fn with_overrides(&self, overrides: &HashMap<String, Vec<String>>) -> Self {
        let mut table = self.clone();
        for (name, aliases) in overrides {
            table.insert(name, aliases.iter().map(String::as_str));
        }
        table
    }

    fn insert<'a>(&mut self, name: &str, aliases: impl IntoIterator<Item = &'a str>) {
        self.entries.insert(
            name.to_lowercase(),
            aliases.into_iter().map(str::to_lowercase).collect(),
        );
    }

    /// Aliases for a lowercase name
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn build_default_aliases() -> AliasTable {
    let mut table = AliasTable::default();

    // Main lifts
    table.insert("squat", ["barbell squat", "squat (barbell)"]);
    table.insert("bench press", ["barbell bench press", "bench press (barbell)"]);
    table.insert("deadlift", ["barbell deadlift", "deadlift (barbell)"]);
    table.insert(
        "overhead press",
        [
            "overhead press (barbell)",
            "barbell overhead press",
            "shoulder press (barbell)",
        ],
    );

    // Accessories
    table.insert(
        "barbell row",
        ["bent over row (barbell)", "barbell bent over row", "bent over row"],
    );
    table.insert(
        "dumbbell press",
        ["dumbbell bench press", "bench press (dumbbell)", "dumbbell chest press"],
    );
    table.insert(
        "dumbbell row",
        ["dumbbell row", "bent over row (dumbbell)", "one arm dumbbell row"],
    );
    table.insert(
        "leg curl",
        ["lying leg curl", "leg curl (machine)", "seated leg curl"],
    );
    table.insert("leg press", ["leg press (machine)", "leg press"]);
    table.insert(
        "tricep pushdown",
        ["tricep pushdown", "triceps pushdown", "cable pushdown"],
    );
    table.insert("cable fly", ["cable fly", "cable chest fly", "cable crossover"]);
    table.insert("good morning", ["good morning", "good morning (barbell)"]);
    table.insert("hanging leg raise", ["hanging leg raise", "hanging knee raise"]);
    table.insert(
        "back extension",
        ["back extension", "hyperextension", "back extension (machine)"],
    );
    table.insert(
        "lateral raise",
        ["lateral raise (dumbbell)", "dumbbell lateral raise", "lateral raise"],
    );
    table.insert("face pull", ["face pull", "face pull (cable)"]);
    table.insert(
        "rear delt fly",
        ["reverse fly (dumbbell)", "rear delt fly", "reverse fly"],
    );
    table.insert("pull-up", ["pull up", "pull-up", "pullup"]);
    table.insert("dips", ["dip", "tricep dip", "chest dip"]);
    table.insert(
        "lunges",
        ["lunge (dumbbell)", "walking lunge", "lunge (barbell)"],
    );
    table.insert("bulgarian split squat", ["bulgarian split squat", "split squat"]);

    table
}

/// Looks up exercise templates by human-readable name
#[derive(Clone, Debug)]
pub struct ExerciseResolver {
    /// lowercase title -> template
    index: HashMap<String, ExerciseTemplate>,
    aliases: AliasTable,
}

impl ExerciseResolver {
    /// Build a resolver over the full template list using the built-in aliases
    pub fn new(templates: Vec<ExerciseTemplate>) -> Self {
        Self::with_aliases(templates, AliasTable::builtin().clone())
    }

    /// Build a resolver with a custom alias table
    pub fn with_aliases(templates: Vec<ExerciseTemplate>, aliases: AliasTable) -> Self {
        let index = templates
            .into_iter()
            .map(|t| (t.title.to_lowercase(), t))
            .collect();
        Self { index, aliases }
    }

    /// Find the template for an exercise name
    pub fn find_template(&self, name: &str) -> Result<&ExerciseTemplate> {
        let lower = name.to_lowercase();

        if let Some(template) = self.index.get(&lower) {
            return Ok(template);
        }

        if let Some(aliases) = self.aliases.get(&lower) {
            if let Some(template) = aliases.iter().find_map(|alias| self.index.get(alias)) {
                tracing::debug!("Resolved {:?} via alias to {:?}", name, template.title);
                return Ok(template);
            }
        }

        // Iteration order is unspecified; several titles may qualify
        self.index
            .iter()
            .find(|(title, _)| title.contains(&lower) || lower.contains(title.as_str()))
            .map(|(_, template)| {
                tracing::debug!("Resolved {:?} by partial match to {:?}", name, template.title);
                template
            })
            .ok_or_else(|| Error::ExerciseNotFound(name.to_string()))
    }

    /// Template ID for an exercise name
    pub fn resolve(&self, name: &str) -> Result<&str> {
        self.find_template(name).map(|t| t.id.as_str())
    }

    pub fn template_count(&self) -> usize {
        self.index.len()
    }
}
