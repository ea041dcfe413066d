use std::collections::HashMap;

use crate::db::DbPool;
use crate::import::{CharacterDraft, PlanetDraft};
use crate::models::{
    CatalogEntry, Character, CharacterDetails, Item, ItemKind, NewItem, Planet, PlanetDetails,
};
use crate::schema::{characters, items, planets};
use diesel::prelude::*;
use tracing::instrument;

pub struct CatalogRepository;

impl CatalogRepository {
    /// Inserts the base item and its character row in one transaction.
    #[instrument(skip(pool, draft), fields(uid = draft.uid, name = %draft.name))]
    pub async fn create_character(pool: &DbPool, draft: CharacterDraft) -> Result<Character, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let character = tokio::task::spawn_blocking(move || {
            conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
                let item = insert_item(conn, &draft.name, ItemKind::Characters)?;
                let details = draft.into_details(item.id);
                diesel::insert_into(characters::table)
                    .values(&details)
                    .execute(conn)?;
                Ok(Character { item, details })
            })
        })
        .await??;

        Ok(character)
    }

    #[instrument(skip(pool, draft), fields(uid = draft.uid, name = %draft.name))]
    pub async fn create_planet(pool: &DbPool, draft: PlanetDraft) -> Result<Planet, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let planet = tokio::task::spawn_blocking(move || {
            conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
                let item = insert_item(conn, &draft.name, ItemKind::Planets)?;
                let details = draft.into_details(item.id);
                diesel::insert_into(planets::table)
                    .values(&details)
                    .execute(conn)?;
                Ok(Planet { item, details })
            })
        })
        .await??;

        Ok(planet)
    }

    #[instrument(skip(pool))]
    pub async fn get_all_characters(pool: &DbPool) -> Result<Vec<Character>, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let rows = tokio::task::spawn_blocking(move || {
            characters::table
                .inner_join(items::table)
                .select((Item::as_select(), CharacterDetails::as_select()))
                .order(characters::uid.asc())
                .load::<(Item, CharacterDetails)>(&mut conn)
        })
        .await??;

        Ok(rows
            .into_iter()
            .map(|(item, details)| Character { item, details })
            .collect())
    }

    #[instrument(skip(pool))]
    pub async fn get_character_by_uid(pool: &DbPool, uid: i32) -> Result<Option<Character>, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let row = tokio::task::spawn_blocking(move || {
            characters::table
                .inner_join(items::table)
                .filter(characters::uid.eq(uid))
                .select((Item::as_select(), CharacterDetails::as_select()))
                .first::<(Item, CharacterDetails)>(&mut conn)
                .optional()
        })
        .await??;

        Ok(row.map(|(item, details)| Character { item, details }))
    }

    #[instrument(skip(pool))]
    pub async fn get_all_planets(pool: &DbPool) -> Result<Vec<Planet>, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let rows = tokio::task::spawn_blocking(move || {
            planets::table
                .inner_join(items::table)
                .select((Item::as_select(), PlanetDetails::as_select()))
                .order(planets::uid.asc())
                .load::<(Item, PlanetDetails)>(&mut conn)
        })
        .await??;

        Ok(rows
            .into_iter()
            .map(|(item, details)| Planet { item, details })
            .collect())
    }

    #[instrument(skip(pool))]
    pub async fn get_planet_by_uid(pool: &DbPool, uid: i32) -> Result<Option<Planet>, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let row = tokio::task::spawn_blocking(move || {
            planets::table
                .inner_join(items::table)
                .filter(planets::uid.eq(uid))
                .select((Item::as_select(), PlanetDetails::as_select()))
                .first::<(Item, PlanetDetails)>(&mut conn)
                .optional()
        })
        .await??;

        Ok(row.map(|(item, details)| Planet { item, details }))
    }

    #[instrument(skip(pool))]
    pub async fn count_items(pool: &DbPool, kind: ItemKind) -> Result<i64, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let count = tokio::task::spawn_blocking(move || {
            items::table
                .filter(items::kind.eq(kind))
                .count()
                .get_result(&mut conn)
        })
        .await??;

        Ok(count)
    }
}

fn insert_item(conn: &mut SqliteConnection, name: &str, kind: ItemKind) -> QueryResult<Item> {
    diesel::insert_into(items::table)
        .values(&NewItem { name, kind })
        .returning(Item::as_returning())
        .get_result(conn)
}

/// Loads fully typed entries for `ids`, in the order given. Ids without an
/// item row, or without an extension row for their kind, are left out.
pub(crate) fn load_entries(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<Vec<CatalogEntry>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut items_by_id: HashMap<i32, Item> = items::table
        .filter(items::id.eq_any(ids))
        .select(Item::as_select())
        .load::<Item>(conn)?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    let mut characters_by_id: HashMap<i32, CharacterDetails> = characters::table
        .filter(characters::id.eq_any(ids))
        .select(CharacterDetails::as_select())
        .load::<CharacterDetails>(conn)?
        .into_iter()
        .map(|details| (details.id, details))
        .collect();

    let mut planets_by_id: HashMap<i32, PlanetDetails> = planets::table
        .filter(planets::id.eq_any(ids))
        .select(PlanetDetails::as_select())
        .load::<PlanetDetails>(conn)?
        .into_iter()
        .map(|details| (details.id, details))
        .collect();

    let entries = ids
        .iter()
        .filter_map(|id| {
            let item = items_by_id.remove(id)?;
            match item.kind {
                ItemKind::Characters => characters_by_id
                    .remove(id)
                    .map(|details| Character { item, details }.into()),
                ItemKind::Planets => planets_by_id
                    .remove(id)
                    .map(|details| Planet { item, details }.into()),
            }
        })
        .collect();

    Ok(entries)
}
