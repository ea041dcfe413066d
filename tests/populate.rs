mod common;

use axum::http::StatusCode;
use common::TestApp;
use holocron_api::db::CatalogRepository;
use holocron_api::models::ItemKind;
use serde_json::{json, Value};

fn people() -> Vec<Value> {
    vec![
        json!({
            "name": "Luke Skywalker",
            "height": "172",
            "mass": "77",
            "birth_year": "19BBY",
            "gender": "male",
            "eye_color": "blue",
            "skin_color": "fair",
            "films": ["https://swapi.dev/api/films/1/"],
            "homeworld": "https://swapi.dev/api/planets/1/",
        }),
        json!({
            "name": "C-3PO",
            "height": 167,
            "gender": "n/a",
            "starships": [],
        }),
    ]
}

#[tokio::test]
async fn populate_characters_imports_each_document_in_order() {
    let mut app = TestApp::new().await;
    let _mocks = app.mock_catalog("people", people()).await;

    let response = app.get("/populate/characters").await;

    assert_eq!(response.status, StatusCode::OK);
    let created = response.body.as_array().unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["uid"], 1);
    assert_eq!(created[0]["name"], "Luke Skywalker");
    assert_eq!(created[0]["type"], "characters");
    assert_eq!(created[1]["uid"], 2);
    assert_eq!(created[1]["height"], "167");
    assert!(created[1].get("starships").is_none());

    let stored = app.get("/characters/2").await;
    assert_eq!(stored.status, StatusCode::OK);
    assert_eq!(stored.body["name"], "C-3PO");
}

#[tokio::test]
async fn rerunning_populate_creates_no_duplicates() {
    let mut app = TestApp::new().await;
    let _mocks = app.mock_catalog("people", people()).await;

    let first = app.get("/populate/characters").await;
    assert_eq!(first.body.as_array().unwrap().len(), 2);

    let second = app.get("/populate/characters").await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body, json!([]));

    let total = CatalogRepository::count_items(app.state.pool(), ItemKind::Characters)
        .await
        .unwrap();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn unbuildable_documents_do_not_stop_the_batch() {
    let mut app = TestApp::new().await;
    let _mocks = app
        .mock_catalog(
            "planets",
            vec![
                json!({ "climate": "frozen" }),
                json!({ "name": "Hoth", "climate": "frozen", "residents": [] }),
            ],
        )
        .await;

    let response = app.get("/populate/planets").await;

    assert_eq!(response.status, StatusCode::OK);
    let created = response.body.as_array().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["name"], "Hoth");
    assert_eq!(created[0]["uid"], 2);

    let listed = app.get("/planets").await;
    assert_eq!(listed.body["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn same_name_in_both_catalogs_is_allowed() {
    let mut app = TestApp::new().await;
    let _people = app
        .mock_catalog("people", vec![json!({ "name": "Naboo" })])
        .await;
    let _planets = app
        .mock_catalog("planets", vec![json!({ "name": "Naboo" })])
        .await;

    assert_eq!(app.get("/populate/characters").await.body.as_array().unwrap().len(), 1);
    assert_eq!(app.get("/populate/planets").await.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn upstream_failure_is_a_bad_gateway() {
    let mut app = TestApp::new().await;
    let _mock = app
        .catalog
        .mock("GET", "/planets/")
        .with_status(500)
        .create_async()
        .await;

    let response = app.get("/populate/planets").await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn unreadable_detail_document_is_skipped() {
    let mut app = TestApp::new().await;
    let base = app.catalog.url();
    let results: Vec<Value> = (1..=3)
        .map(|n| json!({ "name": format!("planet {n}"), "url": format!("{base}/planets/{n}/") }))
        .collect();

    let _listing = app
        .catalog
        .mock("GET", "/planets/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "count": 3, "next": null, "results": results }).to_string())
        .create_async()
        .await;
    let _tatooine = app
        .catalog
        .mock("GET", "/planets/1/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "name": "Tatooine", "climate": "arid" }).to_string())
        .create_async()
        .await;
    let missing = app
        .catalog
        .mock("GET", "/planets/2/")
        .with_status(404)
        .create_async()
        .await;
    let _hoth = app
        .catalog
        .mock("GET", "/planets/3/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "name": "Hoth", "climate": "frozen" }).to_string())
        .create_async()
        .await;

    let response = app.get("/populate/planets").await;

    missing.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    let created = response.body.as_array().unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["name"], "Tatooine");
    assert_eq!(created[0]["uid"], 1);
    assert_eq!(created[1]["name"], "Hoth");
    assert_eq!(created[1]["uid"], 3);

    assert_eq!(app.get("/planets/2").await.status, StatusCode::NOT_FOUND);
}
