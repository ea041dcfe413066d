//! One-shot imports of the external catalog.
//!
//! Each job lists the upstream collection, fetches every document in listing
//! order and stores it under a 1-based `uid`. Only a failed listing aborts the
//! job. Documents that cannot be fetched, built or stored are logged and
//! skipped, and their `uid` stays unused; a second run therefore creates
//! nothing new, because every insert trips the `(name, type)` unique
//! constraint.

use axum::{extract::State, response::Json};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::db::CatalogRepository;
use crate::error::ApiError;
use crate::import::{CharacterDraft, PlanetDraft, SkippedField};
use crate::models::{Character, ItemKind, Planet};
use crate::state::AppState;
use crate::swapi::{Resource, ResourceRef};

#[instrument(skip(state))]
pub async fn populate_characters(State(state): State<AppState>) -> Result<Json<Vec<Character>>, ApiError> {
    let refs = state.swapi().list(Resource::People).await?;
    let mut created = Vec::with_capacity(refs.len());

    for (uid, entry) in (1..).zip(&refs) {
        let Some(document) = fetch(&state, uid, entry).await else {
            continue;
        };
        let draft = match CharacterDraft::from_json(uid, &document) {
            Ok(draft) => draft,
            Err(err) => {
                warn!(uid, url = %entry.url, "Skipping character document: {}", err);
                continue;
            }
        };
        log_skipped(uid, &draft.name, &draft.skipped);

        match CatalogRepository::create_character(state.pool(), draft).await {
            Ok(character) => created.push(character),
            Err(err) => warn!(uid, "Could not store character: {:#}", err),
        }
    }

    report(ItemKind::Characters, &state, refs.len(), created.len()).await;
    Ok(Json(created))
}

#[instrument(skip(state))]
pub async fn populate_planets(State(state): State<AppState>) -> Result<Json<Vec<Planet>>, ApiError> {
    let refs = state.swapi().list(Resource::Planets).await?;
    let mut created = Vec::with_capacity(refs.len());

    for (uid, entry) in (1..).zip(&refs) {
        let Some(document) = fetch(&state, uid, entry).await else {
            continue;
        };
        let draft = match PlanetDraft::from_json(uid, &document) {
            Ok(draft) => draft,
            Err(err) => {
                warn!(uid, url = %entry.url, "Skipping planet document: {}", err);
                continue;
            }
        };
        log_skipped(uid, &draft.name, &draft.skipped);

        match CatalogRepository::create_planet(state.pool(), draft).await {
            Ok(planet) => created.push(planet),
            Err(err) => warn!(uid, "Could not store planet: {:#}", err),
        }
    }

    report(ItemKind::Planets, &state, refs.len(), created.len()).await;
    Ok(Json(created))
}

async fn fetch(state: &AppState, uid: i32, entry: &ResourceRef) -> Option<Value> {
    match state.swapi().fetch_document(&entry.url).await {
        Ok(document) => Some(document),
        Err(err) => {
            warn!(uid, name = entry.name.as_deref(), "Skipping unreadable document: {}", err);
            None
        }
    }
}

fn log_skipped(uid: i32, name: &str, skipped: &[SkippedField]) {
    if skipped.is_empty() {
        return;
    }
    let fields: Vec<String> = skipped.iter().map(ToString::to_string).collect();
    debug!(uid, name, skipped = %fields.join(", "), "Fields left out of import");
}

async fn report(kind: ItemKind, state: &AppState, listed: usize, created: usize) {
    match CatalogRepository::count_items(state.pool(), kind).await {
        Ok(total) => info!(%kind, listed, created, total, "Populate finished"),
        Err(err) => info!(%kind, listed, created, "Populate finished, total unavailable: {:#}", err),
    }
}
