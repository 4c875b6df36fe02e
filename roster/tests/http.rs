use std::net::SocketAddr;

use async_trait::async_trait;
use bson::Bson;
use reqwest::StatusCode;
use roster_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
    id::RecordId,
    query::Query,
    store::DocumentStore,
};
use roster_memory::InMemoryStore;
use serde_json::{json, Value};
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, body: Value) -> anyhow::Result<String> {
        let res = self.client.post(self.url("/students")).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await?;
        Ok(body["id"].as_str().unwrap_or_default().to_string())
    }
}

/// Backend whose every call fails with the same error.
#[derive(Debug, Clone, Copy)]
enum BrokenStore {
    RejectsWrites,
    Offline,
}

impl BrokenStore {
    fn error(&self) -> DocumentStoreError {
        match self {
            BrokenStore::RejectsWrites => DocumentStoreError::Write("duplicate key".into()),
            BrokenStore::Offline => {
                DocumentStoreError::Unavailable("server selection timeout at db:27017".into())
            }
        }
    }
}

#[async_trait]
impl StoreBackend for BrokenStore {
    async fn insert_document(&self, _: Bson, _: &str) -> DocumentStoreResult<RecordId> {
        Err(self.error())
    }

    async fn get_document(&self, _: &RecordId, _: &str) -> DocumentStoreResult<Option<Bson>> {
        Err(self.error())
    }

    async fn update_document(&self, _: &RecordId, _: Bson, _: &str) -> DocumentStoreResult<bool> {
        Err(self.error())
    }

    async fn delete_document(&self, _: &RecordId, _: &str) -> DocumentStoreResult<bool> {
        Err(self.error())
    }

    async fn query_documents(&self, _: Query, _: &str) -> DocumentStoreResult<Vec<Bson>> {
        Err(self.error())
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    serve(DocumentStore::new(InMemoryStore::builder().build().await?)).await
}

async fn serve(store: DocumentStore) -> anyhow::Result<TestApp> {
    let app = roster::startup::app(&store);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url: format!("http://{}", addr), client: reqwest::Client::new() })
}

#[tokio::test]
async fn root_reports_running() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app.client.get(app.url("/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "message": "It is running" }));
    Ok(())
}

#[tokio::test]
async fn student_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let id = app
        .create(json!({ "name": "Ana", "age": 21, "address": { "city": "Lima", "country": "PE" } }))
        .await?;
    assert_eq!(id.len(), 24);

    let res = app.client.get(app.url(&format!("/students/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "name": "Ana", "age": 21, "address": { "city": "Lima", "country": "PE" } })
    );

    let res = app.client.get(app.url("/students?country=PE&age=20")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "data": [ { "name": "Ana", "age": 21 } ] }));

    let res = app
        .client
        .patch(app.url(&format!("/students/{id}")))
        .json(&json!({ "age": 22 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.client.get(app.url(&format!("/students/{id}"))).send().await?;
    assert_eq!(res.json::<Value>().await?["age"], json!(22));

    let res = app.client.delete(app.url(&format!("/students/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.client.delete(app.url(&format!("/students/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.client.get(app.url(&format!("/students/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({ "detail": "Student not found" }));
    Ok(())
}

#[tokio::test]
async fn get_shows_missing_fields_as_null() -> anyhow::Result<()> {
    let app = start_server().await?;
    let id = app.create(json!({ "name": "Solo" })).await?;

    let res = app.client.get(app.url(&format!("/students/{id}"))).send().await?;
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "name": "Solo", "age": null, "address": null })
    );
    Ok(())
}

#[tokio::test]
async fn list_rejects_non_positive_age() -> anyhow::Result<()> {
    let app = start_server().await?;
    for query in ["age=0", "age=-1", "age=abc"] {
        let res = app.client.get(app.url(&format!("/students?{query}"))).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "query {query}");
        assert!(res.json::<Value>().await?["detail"].is_string());
    }
    Ok(())
}

#[tokio::test]
async fn list_strips_nulls_and_ignores_empty_country() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.create(json!({ "name": "Nameless age" })).await?;
    app.create(json!({ "age": 30, "address": { "country": "CL" } })).await?;

    let res = app.client.get(app.url("/students?country=")).send().await?;
    let body = res.json::<Value>().await?;
    let data = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(data.len(), 2);
    assert!(data.contains(&json!({ "name": "Nameless age" })));
    assert!(data.contains(&json!({ "age": 30 })));
    Ok(())
}

#[tokio::test]
async fn invalid_bodies_are_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = app
        .client
        .post(app.url("/students"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.client.post(app.url("/students")).json(&json!({ "age": -3 })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn patch_not_found_cases() -> anyhow::Result<()> {
    let app = start_server().await?;
    let id = app.create(json!({ "name": "Ana" })).await?;

    let res = app
        .client
        .patch(app.url(&format!("/students/{id}")))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "detail": "Student not found or no update made" })
    );

    let res = app
        .client
        .patch(app.url("/students/not-an-id"))
        .json(&json!({ "age": 3 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.client.get(app.url("/students/not-an-id")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn rejected_create_is_a_bad_request() -> anyhow::Result<()> {
    let app = serve(DocumentStore::new(BrokenStore::RejectsWrites)).await?;

    let res = app.client.post(app.url("/students")).json(&json!({ "name": "Ana" })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "detail": "Error creating student" }));
    Ok(())
}

#[tokio::test]
async fn offline_store_is_unavailable_not_missing() -> anyhow::Result<()> {
    let app = serve(DocumentStore::new(BrokenStore::Offline)).await?;
    let id = RecordId::new().to_hex();
    let unavailable = json!({ "detail": "Store unavailable" });

    let res = app.client.post(app.url("/students")).json(&json!({ "name": "Ana" })).send().await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.json::<Value>().await?, unavailable);

    let res = app.client.get(app.url(&format!("/students/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.json::<Value>().await?, unavailable);

    let res = app.client.get(app.url("/students")).send().await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let res = app
        .client
        .patch(app.url(&format!("/students/{id}")))
        .json(&json!({ "age": 3 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let res = app.client.delete(app.url(&format!("/students/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}
