use crate::db::catalog::load_entries;
use crate::db::DbPool;
use crate::models::{CatalogEntry, Favorite, NewFavorite};
use crate::schema::{favorites, items};
use diesel::prelude::*;
use tracing::instrument;

/// Result of trying to favorite an item.
#[derive(Debug)]
pub enum AddFavorite {
    Created(Favorite),
    Duplicate,
    MissingItem,
}

pub struct FavoriteRepository;

impl FavoriteRepository {
    /// The caller's favorited items, oldest favorite first.
    #[instrument(skip(pool))]
    pub async fn get_favorite_entries(pool: &DbPool, user_id: i32) -> Result<Vec<CatalogEntry>, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let entries = tokio::task::spawn_blocking(move || -> QueryResult<Vec<CatalogEntry>> {
            let item_ids: Vec<i32> = favorites::table
                .filter(favorites::user_id.eq(user_id))
                .order(favorites::id.asc())
                .select(favorites::item_id)
                .load(&mut conn)?;

            load_entries(&mut conn, &item_ids)
        })
        .await??;

        Ok(entries)
    }

    #[instrument(skip(pool))]
    pub async fn add_favorite(pool: &DbPool, user_id: i32, item_id: i32) -> Result<AddFavorite, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let outcome = tokio::task::spawn_blocking(move || {
            // Write lock up front: a deferred read-then-insert cannot wait out a busy peer.
            conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
                let existing = favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .filter(favorites::item_id.eq(item_id))
                    .select(favorites::id)
                    .first::<i32>(conn)
                    .optional()?;
                if existing.is_some() {
                    return Ok(AddFavorite::Duplicate);
                }

                let item = items::table
                    .find(item_id)
                    .select(items::id)
                    .first::<i32>(conn)
                    .optional()?;
                if item.is_none() {
                    return Ok(AddFavorite::MissingItem);
                }

                let favorite = diesel::insert_into(favorites::table)
                    .values(&NewFavorite { user_id, item_id })
                    .returning(Favorite::as_returning())
                    .get_result(conn)?;

                Ok(AddFavorite::Created(favorite))
            })
        })
        .await??;

        Ok(outcome)
    }

    /// Returns `false` when the user had not favorited the item.
    #[instrument(skip(pool))]
    pub async fn remove_favorite(pool: &DbPool, user_id: i32, item_id: i32) -> Result<bool, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let deleted_count = tokio::task::spawn_blocking(move || {
            diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .filter(favorites::item_id.eq(item_id)),
            )
            .execute(&mut conn)
        })
        .await??;

        Ok(deleted_count > 0)
    }

    #[instrument(skip(pool))]
    pub async fn count_for_pair(pool: &DbPool, user_id: i32, item_id: i32) -> Result<i64, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let count = tokio::task::spawn_blocking(move || {
            favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::item_id.eq(item_id))
                .count()
                .get_result(&mut conn)
        })
        .await??;

        Ok(count)
    }
}
