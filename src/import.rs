//! Field-by-field validation of catalog documents.
//!
//! An upstream document is a flat JSON object. Every field the schema knows
//! about must be a string (numbers are accepted and stringified); anything
//! else, and any key the schema does not know, is reported as a
//! [`SkippedField`] instead of being dropped silently.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{CharacterDetails, PlanetDetails};

const CHARACTER_FIELDS: &[&str] = &[
    "name",
    "height",
    "gender",
    "mass",
    "birth_year",
    "eye_color",
    "skin_color",
];

const PLANET_FIELDS: &[&str] = &[
    "name",
    "population",
    "terrain",
    "diameter",
    "climate",
    "gravity",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The key has no column on the target table.
    UnknownField,
    /// The value could not be read as text; holds the JSON type found.
    WrongType(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    pub field: String,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            SkipReason::UnknownField => write!(f, "{} (unknown field)", self.field),
            SkipReason::WrongType(found) => write!(f, "{} (expected text, found {})", self.field, found),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("document is not a JSON object")]
    NotAnObject,
    #[error("document has no usable name")]
    MissingName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterDraft {
    pub uid: i32,
    pub name: String,
    pub height: Option<String>,
    pub gender: Option<String>,
    pub mass: Option<String>,
    pub birth_year: Option<String>,
    pub eye_color: Option<String>,
    pub skin_color: Option<String>,
    pub skipped: Vec<SkippedField>,
}

impl CharacterDraft {
    pub fn from_json(uid: i32, document: &Value) -> Result<Self, DraftError> {
        let mut fields = Fields::read(document, CHARACTER_FIELDS)?;

        Ok(Self {
            uid,
            name: fields.name()?,
            height: fields.take("height"),
            gender: fields.take("gender"),
            mass: fields.take("mass"),
            birth_year: fields.take("birth_year"),
            eye_color: fields.take("eye_color"),
            skin_color: fields.take("skin_color"),
            skipped: fields.skipped,
        })
    }

    pub fn into_details(self, id: i32) -> CharacterDetails {
        CharacterDetails {
            id,
            uid: self.uid,
            height: self.height,
            gender: self.gender,
            mass: self.mass,
            birth_year: self.birth_year,
            eye_color: self.eye_color,
            skin_color: self.skin_color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetDraft {
    pub uid: i32,
    pub name: String,
    pub population: Option<String>,
    pub terrain: Option<String>,
    pub diameter: Option<String>,
    pub climate: Option<String>,
    pub gravity: Option<String>,
    pub skipped: Vec<SkippedField>,
}

impl PlanetDraft {
    pub fn from_json(uid: i32, document: &Value) -> Result<Self, DraftError> {
        let mut fields = Fields::read(document, PLANET_FIELDS)?;

        Ok(Self {
            uid,
            name: fields.name()?,
            population: fields.take("population"),
            terrain: fields.take("terrain"),
            diameter: fields.take("diameter"),
            climate: fields.take("climate"),
            gravity: fields.take("gravity"),
            skipped: fields.skipped,
        })
    }

    pub fn into_details(self, id: i32) -> PlanetDetails {
        PlanetDetails {
            id,
            uid: self.uid,
            population: self.population,
            terrain: self.terrain,
            diameter: self.diameter,
            climate: self.climate,
            gravity: self.gravity,
        }
    }
}

struct Fields {
    values: HashMap<&'static str, String>,
    skipped: Vec<SkippedField>,
}

impl Fields {
    fn read(document: &Value, known: &'static [&'static str]) -> Result<Self, DraftError> {
        let object: &Map<String, Value> = document.as_object().ok_or(DraftError::NotAnObject)?;
        let mut values = HashMap::new();
        let mut skipped = Vec::new();

        for (key, value) in object {
            let Some(field) = known.iter().copied().find(|field| *field == key.as_str()) else {
                skipped.push(SkippedField {
                    field: key.clone(),
                    reason: SkipReason::UnknownField,
                });
                continue;
            };

            match as_text(value) {
                Ok(text) => {
                    values.insert(field, text);
                }
                Err(found) => skipped.push(SkippedField {
                    field: key.clone(),
                    reason: SkipReason::WrongType(found),
                }),
            }
        }

        Ok(Self { values, skipped })
    }

    fn take(&mut self, field: &'static str) -> Option<String> {
        self.values.remove(field)
    }

    fn name(&mut self) -> Result<String, DraftError> {
        self.take("name")
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or(DraftError::MissingName)
    }
}

fn as_text(value: &Value) -> Result<String, &'static str> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Null => Err("null"),
        Value::Bool(_) => Err("boolean"),
        Value::Array(_) => Err("array"),
        Value::Object(_) => Err("object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn character_keeps_schema_fields_and_reports_the_rest() {
        let document = json!({
            "name": "Luke Skywalker",
            "height": "172",
            "mass": 77,
            "birth_year": "19BBY",
            "gender": "male",
            "films": ["https://swapi.dev/api/films/1/"],
            "skin_color": null,
        });

        let draft = CharacterDraft::from_json(1, &document).unwrap();

        assert_eq!(draft.name, "Luke Skywalker");
        assert_eq!(draft.height.as_deref(), Some("172"));
        assert_eq!(draft.mass.as_deref(), Some("77"));
        assert_eq!(draft.skin_color, None);
        assert_eq!(draft.eye_color, None);

        let mut skipped = draft.skipped.clone();
        skipped.sort_by(|a, b| a.field.cmp(&b.field));
        assert_eq!(
            skipped,
            vec![
                SkippedField {
                    field: "films".into(),
                    reason: SkipReason::UnknownField,
                },
                SkippedField {
                    field: "skin_color".into(),
                    reason: SkipReason::WrongType("null"),
                },
            ]
        );
    }

    #[test]
    fn planet_draft_becomes_details_with_the_given_id() {
        let document = json!({
            "name": "Tatooine",
            "population": "200000",
            "terrain": "desert",
            "diameter": "10465",
            "climate": "arid",
            "gravity": "1 standard",
            "url": "https://swapi.dev/api/planets/1/",
        });

        let draft = PlanetDraft::from_json(3, &document).unwrap();
        assert_eq!(draft.skipped.len(), 1);

        let details = draft.into_details(42);
        assert_eq!(details.id, 42);
        assert_eq!(details.uid, 3);
        assert_eq!(details.gravity.as_deref(), Some("1 standard"));
    }

    #[test]
    fn name_is_required() {
        assert_eq!(
            CharacterDraft::from_json(1, &json!({ "height": "1" })),
            Err(DraftError::MissingName)
        );
        assert_eq!(
            PlanetDraft::from_json(1, &json!({ "name": "   " })),
            Err(DraftError::MissingName)
        );
        assert_eq!(
            PlanetDraft::from_json(1, &json!({ "name": ["Hoth"] })),
            Err(DraftError::MissingName)
        );
    }

    #[test]
    fn non_object_documents_are_rejected() {
        assert_eq!(
            CharacterDraft::from_json(1, &json!("Luke")),
            Err(DraftError::NotAnObject)
        );
    }

    #[test]
    fn skipped_field_display() {
        let skipped = SkippedField {
            field: "films".into(),
            reason: SkipReason::WrongType("array"),
        };
        assert_eq!(skipped.to_string(), "films (expected text, found array)");
    }
}
