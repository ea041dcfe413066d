use crate::schema::{characters, favorites, items, planets, users};
use chrono::NaiveDateTime;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub password: String,
    pub planet: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub planet: String,
}

/// Discriminator stored in `items.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Characters,
    Planets,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Characters => "characters",
            Self::Planets => "planets",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "characters" => Ok(Self::Characters),
            "planets" => Ok(Self::Planets),
            other => Err(format!("unknown item type: {other}")),
        }
    }
}

impl ToSql<Text, Sqlite> for ItemKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for ItemKind {
    fn from_sql(bytes: <Sqlite as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        value.parse().map_err(Into::into)
    }
}

/// Base record shared by every catalog entry.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Item {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(skip)]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = items)]
pub struct NewItem<'a> {
    pub name: &'a str,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize)]
#[diesel(table_name = characters)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CharacterDetails {
    #[serde(skip)]
    pub id: i32,
    pub uid: i32,
    pub height: Option<String>,
    pub gender: Option<String>,
    pub mass: Option<String>,
    pub birth_year: Option<String>,
    pub eye_color: Option<String>,
    pub skin_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize)]
#[diesel(table_name = planets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlanetDetails {
    #[serde(skip)]
    pub id: i32,
    pub uid: i32,
    pub population: Option<String>,
    pub terrain: Option<String>,
    pub diameter: Option<String>,
    pub climate: Option<String>,
    pub gravity: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Character {
    #[serde(flatten)]
    pub item: Item,
    #[serde(flatten)]
    pub details: CharacterDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct Planet {
    #[serde(flatten)]
    pub item: Item,
    #[serde(flatten)]
    pub details: PlanetDetails,
}

/// A catalog entry of either subtype. The `type` discriminator lives on the
/// shared [`Item`] record, so the union serializes without an extra tag.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CatalogEntry {
    Character(Character),
    Planet(Planet),
}

impl From<Character> for CatalogEntry {
    fn from(character: Character) -> Self {
        Self::Character(character)
    }
}

impl From<Planet> for CatalogEntry {
    fn from(planet: Planet) -> Self {
        Self::Planet(planet)
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub item_id: i32,
    #[serde(skip)]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = favorites)]
pub struct NewFavorite {
    pub user_id: i32,
    pub item_id: i32,
}
