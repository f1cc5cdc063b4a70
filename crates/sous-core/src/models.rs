//! Domain models for recipe import.

use std::collections::HashMap;

use pgvector::Vector;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// CSV column names consumed by the importer.
pub mod columns {
    pub const NAME: &str = "Name";
    pub const CATEGORY: &str = "RecipeCategory";
    pub const KEYWORDS: &str = "Keywords";
    pub const INGREDIENTS: &str = "RecipeIngredientParts";
    pub const IMAGES: &str = "Images";
    pub const INSTRUCTIONS: &str = "RecipeInstructions";
    pub const DESCRIPTION: &str = "Description";
    pub const COOK_TIME: &str = "CookTime";
    pub const PREP_TIME: &str = "PrepTime";
    pub const TOTAL_TIME: &str = "TotalTime";
    pub const CALORIES: &str = "Calories";
    pub const FAT: &str = "FatContent";
    pub const SATURATED_FAT: &str = "SaturatedFatContent";
    pub const CHOLESTEROL: &str = "CholesterolContent";
    pub const SODIUM: &str = "SodiumContent";
    pub const CARBOHYDRATES: &str = "CarbohydrateContent";
    pub const FIBER: &str = "FiberContent";
    pub const SUGAR: &str = "SugarContent";
    pub const PROTEIN: &str = "ProteinContent";

    /// Every column that must be present in the CSV header.
    pub const REQUIRED: &[&str] = &[
        NAME,
        CATEGORY,
        KEYWORDS,
        INGREDIENTS,
        IMAGES,
        INSTRUCTIONS,
        DESCRIPTION,
        COOK_TIME,
        PREP_TIME,
        TOTAL_TIME,
        CALORIES,
        FAT,
        SATURATED_FAT,
        CHOLESTEROL,
        SODIUM,
        CARBOHYDRATES,
        FIBER,
        SUGAR,
        PROTEIN,
    ];
}

/// One CSV row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Returns the raw text of a column.
    pub fn get(&self, column: &str) -> Result<&str, RecordError> {
        self.fields
            .get(column)
            .map(String::as_str)
            .ok_or_else(|| RecordError::MissingField(column.to_string()))
    }

    /// The recipe name, for logging. Empty when the column is absent.
    pub fn name(&self) -> &str {
        self.get(columns::NAME).unwrap_or_default()
    }

    /// Returns the first field longer than `limit` bytes, if any.
    pub fn oversized_field(&self, limit: usize) -> Option<RecordError> {
        self.fields
            .iter()
            .find(|(_, value)| value.len() > limit)
            .map(|(field, value)| RecordError::FieldTooLarge {
                field: field.clone(),
                len: value.len(),
                limit,
            })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Structured, non-embedded attributes stored alongside each recipe.
///
/// Serialized as JSON into the `metadata` column. Field order is the
/// serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMetadata {
    pub name: String,
    pub category: String,
    pub keywords: Vec<String>,
    pub ingredients: Vec<String>,
    pub description: String,
    pub cook_time: String,
    pub prep_time: String,
    pub total_time: String,
    pub n_ingredients: usize,
    pub n_steps: usize,
    pub images: Vec<String>,
    pub instructions: Vec<String>,
    pub calories: f64,
    pub fat: f64,
    pub saturated_fat: f64,
    pub cholesterol: f64,
    pub sodium: f64,
    pub carbohydrates: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub protein: f64,
}

/// A row ready for insertion into the `recipes` table.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// The document that was embedded.
    pub content: String,
    pub embedding: Vector,
    /// JSON-serialized [`RecipeMetadata`].
    pub metadata: String,
}

/// Aggregated storage statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseStats {
    pub total_recipes: i64,
}
