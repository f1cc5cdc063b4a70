//! Record transformation: metadata and embeddable content from a raw CSV row.
//!
//! Both builders are all-or-nothing. Any decode or validation failure is
//! logged with the recipe name and returned as a [`RecordError`]; no partial
//! metadata or content is ever produced.

use std::fmt::Write as _;

use tracing::error;

use crate::decoder::{decode_images, decode_ingredients, decode_instructions, decode_keywords};
use crate::error::RecordError;
use crate::models::{RawRecord, RecipeMetadata, columns};

/// Builds the metadata stored next to the embedding.
pub fn build_metadata(record: &RawRecord) -> Result<RecipeMetadata, RecordError> {
    metadata_inner(record).inspect_err(|e| {
        error!(recipe = record.name(), error = %e, "Error parsing metadata");
    })
}

fn metadata_inner(record: &RawRecord) -> Result<RecipeMetadata, RecordError> {
    let ingredients = decode_ingredients(record.get(columns::INGREDIENTS)?)?;
    let keywords = decode_keywords(record.get(columns::KEYWORDS)?)?;
    let images = decode_images(record.get(columns::IMAGES)?)?;
    let instructions = decode_instructions(record.get(columns::INSTRUCTIONS)?)?;

    Ok(RecipeMetadata {
        name: record.get(columns::NAME)?.to_string(),
        category: record.get(columns::CATEGORY)?.to_string(),
        description: record.get(columns::DESCRIPTION)?.to_string(),
        cook_time: record.get(columns::COOK_TIME)?.to_string(),
        prep_time: record.get(columns::PREP_TIME)?.to_string(),
        total_time: record.get(columns::TOTAL_TIME)?.to_string(),
        n_ingredients: ingredients.len(),
        n_steps: instructions.len(),
        calories: parse_number(record, columns::CALORIES)?,
        fat: parse_number(record, columns::FAT)?,
        saturated_fat: parse_number(record, columns::SATURATED_FAT)?,
        cholesterol: parse_number(record, columns::CHOLESTEROL)?,
        sodium: parse_number(record, columns::SODIUM)?,
        carbohydrates: parse_number(record, columns::CARBOHYDRATES)?,
        fiber: parse_number(record, columns::FIBER)?,
        sugar: parse_number(record, columns::SUGAR)?,
        protein: parse_number(record, columns::PROTEIN)?,
        keywords,
        ingredients,
        images,
        instructions,
    })
}

fn parse_number(record: &RawRecord, column: &str) -> Result<f64, RecordError> {
    let raw = record.get(column)?;
    // JSON has no representation for NaN or infinities
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RecordError::InvalidNumber {
            field: column.to_string(),
            value: raw.to_string(),
        })
}

/// Builds the text document that gets embedded.
///
/// The layout (section order, labels, units and indentation) defines the
/// embedding space of every stored row. Changing it invalidates existing
/// embeddings.
pub fn build_content(record: &RawRecord) -> Result<String, RecordError> {
    content_inner(record).inspect_err(|e| {
        error!(recipe = record.name(), error = %e, "Error parsing content");
    })
}

fn content_inner(record: &RawRecord) -> Result<String, RecordError> {
    let ingredients = decode_ingredients(record.get(columns::INGREDIENTS)?)?;
    let keywords = decode_keywords(record.get(columns::KEYWORDS)?)?;
    let instructions = decode_instructions(record.get(columns::INSTRUCTIONS)?)?;

    let field = |column: &str| record.get(column);

    Ok(format!(
        "name: {name}
    category: {category}
    {n_steps} steps, {n_ingredients} ingredients
    preparation time: {prep}
    cooking time: {cook}
    total time: {total}
    keywords: {keywords}

    calories: {calories} kcal
    fat: {fat} g
    saturated_fat: {saturated_fat} g
    cholesterol: {cholesterol} mg
    carbohydrates: {carbohydrates} g
    sugar: {sugar} g
    sodium: {sodium} mg
    fiber: {fiber} g
    protein: {protein} g

    ingredients:
    {ingredient_list}

    instructions:
    {instruction_list}

    description:
    {description}",
        name = field(columns::NAME)?,
        category = field(columns::CATEGORY)?,
        n_steps = instructions.len(),
        n_ingredients = ingredients.len(),
        prep = field(columns::PREP_TIME)?,
        cook = field(columns::COOK_TIME)?,
        total = field(columns::TOTAL_TIME)?,
        keywords = keywords.join(", "),
        calories = field(columns::CALORIES)?,
        fat = field(columns::FAT)?,
        saturated_fat = field(columns::SATURATED_FAT)?,
        cholesterol = field(columns::CHOLESTEROL)?,
        carbohydrates = field(columns::CARBOHYDRATES)?,
        sugar = field(columns::SUGAR)?,
        sodium = field(columns::SODIUM)?,
        fiber = field(columns::FIBER)?,
        protein = field(columns::PROTEIN)?,
        ingredient_list = unordered_list(&ingredients),
        instruction_list = ordered_list(&instructions),
        description = field(columns::DESCRIPTION)?,
    ))
}

/// `- item` per line.
fn unordered_list(items: &[String]) -> String {
    items.iter().fold(String::new(), |mut out, item| {
        let _ = writeln!(out, "- {}", item);
        out
    })
}

/// `1) item` per line.
fn ordered_list(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .fold(String::new(), |mut out, (i, item)| {
            let _ = writeln!(out, "{}) {}", i + 1, item);
            out
        })
}
