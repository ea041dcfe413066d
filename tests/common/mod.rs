//! Shared setup for the integration tests: a router over a throwaway SQLite
//! file and a mockito server standing in for the catalog API.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use holocron_api::db::CatalogRepository;
use holocron_api::import::{CharacterDraft, PlanetDraft};
use holocron_api::models::{Character, Planet};
use holocron_api::{build_state, create_router, AppState, Config};
use mockito::{Mock, ServerGuard};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "hunter2";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub catalog: ServerGuard,
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub raw: String,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let catalog = mockito::Server::new_async().await;

        let config = Config {
            database_url: dir.path().join("test.db").to_string_lossy().into_owned(),
            jwt_secret: "test-secret".to_string(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            swapi_base_url: catalog.url(),
            database_max_connections: 4,
            otlp_endpoint: None,
        };

        let state = build_state(&config).await.unwrap();
        let router = create_router(state.clone());

        Self {
            router,
            state,
            catalog,
            _dir: dir,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let raw = String::from_utf8(bytes.to_vec()).unwrap();
        let body = serde_json::from_str(&raw).unwrap_or(Value::Null);

        TestResponse { status, raw, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn signup(&self, username: &str, email: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/signup",
            None,
            Some(json!({
                "username": username,
                "email": email,
                "password": PASSWORD,
                "planet": "Tatooine",
            })),
        )
        .await
    }

    /// Signs a user up and returns a bearer token for them.
    pub async fn user_token(&self, username: &str) -> String {
        let email = format!("{username}@rebellion.test");
        assert_eq!(self.signup(username, &email).await.status, StatusCode::CREATED);

        let login = self
            .request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK);
        login.body["response"]["token"].as_str().unwrap().to_string()
    }

    pub async fn seed_character(&self, uid: i32, name: &str) -> Character {
        let draft = CharacterDraft::from_json(uid, &json!({ "name": name, "height": "172" })).unwrap();
        CatalogRepository::create_character(self.state.pool(), draft)
            .await
            .unwrap()
    }

    pub async fn seed_planet(&self, uid: i32, name: &str) -> Planet {
        let draft = PlanetDraft::from_json(uid, &json!({ "name": name, "climate": "arid" })).unwrap();
        CatalogRepository::create_planet(self.state.pool(), draft)
            .await
            .unwrap()
    }

    /// Serves a one-page listing for `resource` plus one detail document per
    /// entry, each at `/{resource}/{n}/`.
    pub async fn mock_catalog(&mut self, resource: &str, documents: Vec<Value>) -> Vec<Mock> {
        let base = self.catalog.url();
        let results: Vec<Value> = (1..=documents.len())
            .map(|n| json!({ "name": format!("entry {n}"), "url": format!("{base}/{resource}/{n}/") }))
            .collect();

        let mut mocks = vec![
            self.catalog
                .mock("GET", format!("/{resource}/").as_str())
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(
                    json!({ "count": results.len(), "next": null, "previous": null, "results": results })
                        .to_string(),
                )
                .create_async()
                .await,
        ];

        for (n, document) in (1..).zip(documents) {
            mocks.push(
                self.catalog
                    .mock("GET", format!("/{resource}/{n}/").as_str())
                    .with_status(200)
                    .with_header("content-type", "application/json")
                    .with_body(document.to_string())
                    .create_async()
                    .await,
            );
        }

        mocks
    }
}
