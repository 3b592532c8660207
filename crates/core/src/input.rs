//! Boundary between the validated quiz payload (a JSON object of form
//! answers) and the typed preference records the pipeline consumes. Only
//! keys for selected questions are read; everything else in the payload is
//! ignored.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::errors::PreferenceError;
use crate::preferences::{BeerPreferences, WinePreferences};
use crate::questions::QuestionId;

/// Highest accepted ABV ceiling for beer answers, in percent.
pub const BEER_MAX_ABV: i64 = 15;
/// Highest accepted ABV ceiling for wine answers, in percent.
pub const WINE_MAX_ABV: i64 = 25;

pub fn parse_beer_preferences(
    answers: &Map<String, Value>,
    selected: &[QuestionId],
) -> Result<BeerPreferences, PreferenceError> {
    let mut preferences = BeerPreferences::default();
    for question in selected {
        let Some(value) = answers.get(question.as_str()) else { continue };
        match question {
            QuestionId::Bitterness => {
                preferences.bitterness = Some(keyword(*question, value)?);
            }
            QuestionId::Color => {
                preferences.color = Some(keyword_set(*question, value)?);
            }
            QuestionId::Aromas => {
                preferences.aromas = Some(string_set(*question, value)?);
            }
            QuestionId::MaxAbv => {
                preferences.max_abv =
                    Some(ceiling(*question, value, Decimal::from(BEER_MAX_ABV))?);
            }
            QuestionId::Format => {
                preferences.format = Some(keyword(*question, value)?);
            }
            QuestionId::Style => {
                preferences.style = Some(free_choice(*question, value)?);
            }
            QuestionId::Brewery => {
                preferences.brewery = Some(free_choice(*question, value)?);
            }
            QuestionId::MaxPrice => {
                preferences.max_price = Some(positive_number(*question, value)?);
            }
            QuestionId::Food | QuestionId::Grape | QuestionId::Region => {}
        }
    }
    Ok(preferences)
}

pub fn parse_wine_preferences(
    answers: &Map<String, Value>,
    selected: &[QuestionId],
) -> Result<WinePreferences, PreferenceError> {
    let mut preferences = WinePreferences::default();
    for question in selected {
        // The food question reads the `food_pairings` answer key.
        let key = match question {
            QuestionId::Food => "food_pairings",
            other => other.as_str(),
        };
        let Some(value) = answers.get(key) else { continue };
        match question {
            QuestionId::Color => {
                preferences.color = Some(keyword_set(*question, value)?);
            }
            QuestionId::Aromas => {
                preferences.aromas = Some(string_set(*question, value)?);
            }
            QuestionId::Food => {
                preferences.food_pairings = Some(keyword_set(*question, value)?);
            }
            QuestionId::Grape => {
                preferences.grape = Some(free_choice(*question, value)?);
            }
            QuestionId::Region => {
                preferences.region = Some(free_choice(*question, value)?);
            }
            QuestionId::MaxAbv => {
                preferences.max_abv =
                    Some(ceiling(*question, value, Decimal::from(WINE_MAX_ABV))?);
            }
            QuestionId::MaxPrice => {
                preferences.max_price = Some(positive_number(*question, value)?);
            }
            QuestionId::Bitterness
            | QuestionId::Format
            | QuestionId::Style
            | QuestionId::Brewery => {}
        }
    }
    Ok(preferences)
}

fn elements(question: QuestionId, value: &Value) -> Result<&Vec<Value>, PreferenceError> {
    value
        .as_array()
        .ok_or(PreferenceError::WrongShape { question, expected: "an array of strings" })
}

fn element_str<'a>(question: QuestionId, value: &'a Value) -> Result<&'a str, PreferenceError> {
    value
        .as_str()
        .ok_or(PreferenceError::WrongShape { question, expected: "an array of strings" })
}

fn string_set(question: QuestionId, value: &Value) -> Result<BTreeSet<String>, PreferenceError> {
    let mut set = BTreeSet::new();
    for element in elements(question, value)? {
        set.insert(element_str(question, element)?.to_owned());
    }
    Ok(set)
}

fn keyword_set<T>(question: QuestionId, value: &Value) -> Result<BTreeSet<T>, PreferenceError>
where
    T: FromStr + Ord,
{
    let mut set = BTreeSet::new();
    for element in elements(question, value)? {
        let raw = element_str(question, element)?;
        let parsed = raw.parse::<T>().map_err(|_| PreferenceError::UnknownOption {
            question,
            value: raw.to_owned(),
        })?;
        set.insert(parsed);
    }
    Ok(set)
}

fn keyword<T: FromStr>(question: QuestionId, value: &Value) -> Result<T, PreferenceError> {
    let raw = value
        .as_str()
        .ok_or(PreferenceError::WrongShape { question, expected: "a keyword string" })?;
    raw.parse::<T>()
        .map_err(|_| PreferenceError::UnknownOption { question, value: raw.to_owned() })
}

fn free_choice(question: QuestionId, value: &Value) -> Result<String, PreferenceError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(PreferenceError::WrongShape { question, expected: "a string" })
}

/// Form payloads carry numbers either as JSON numbers or as numeric strings;
/// both are accepted, negatives are not.
fn positive_number(question: QuestionId, value: &Value) -> Result<Decimal, PreferenceError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64().and_then(Decimal::from_f64),
        Value::String(raw) => raw.trim().parse::<Decimal>().ok(),
        _ => {
            return Err(PreferenceError::WrongShape { question, expected: "a number" });
        }
    };
    let number = parsed
        .ok_or_else(|| PreferenceError::OutOfRange { question, value: value.to_string() })?;
    if number < Decimal::ZERO {
        return Err(PreferenceError::OutOfRange { question, value: value.to_string() });
    }
    Ok(number)
}

fn ceiling(
    question: QuestionId,
    value: &Value,
    max: Decimal,
) -> Result<Decimal, PreferenceError> {
    let number = positive_number(question, value)?;
    if number > max {
        return Err(PreferenceError::OutOfRange { question, value: value.to_string() });
    }
    Ok(number)
}
