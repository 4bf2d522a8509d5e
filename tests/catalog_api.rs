mod common;

use axum::http::StatusCode;
use common::{app_with_source, memory_app, static_app, TestClient};
use lesson_catalog_backend::store::CatalogSource;
use serde_json::{json, Value};

fn ids(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["lessonId"].as_str().unwrap().to_string())
        .collect()
}

fn new_lesson(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Keep laptops locked in public places.",
        "topics": [0],
        "videoLength": "4:00",
        "timeConsumption": "12",
        "difficultyLevel": "Beginner",
        "quizQuestions": 4,
        "availableLanguages": [0]
    })
}

#[tokio::test]
async fn test_health_reports_source() {
    let client = TestClient::new(static_app().await);
    let response = client.get("/api/v1/health").await;
    response.assert_status(StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["ok"], true);
    assert_eq!(json["source"], "static");
}

#[tokio::test]
async fn test_catalog_is_served_from_static_file() {
    let client = TestClient::new(static_app().await);
    let response = client.get("/api/v1/catalog").await;
    response.assert_status(StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["lessons"].as_array().unwrap().len(), 9);
    assert_eq!(json["topics"][2], "GDPR");
    assert_eq!(json["languages"][1], "Danish");
}

#[tokio::test]
async fn test_browse_paginates_six_per_page_and_clamps() {
    let client = TestClient::new(static_app().await);

    let first: Value = client.get("/api/v1/lessons").await.json();
    assert_eq!(first["page"], 1);
    assert_eq!(first["pageCount"], 2);
    assert_eq!(first["pageSize"], 6);
    assert_eq!(first["total"], 9);
    assert_eq!(ids(&first).len(), 6);

    let beyond: Value = client.get("/api/v1/lessons?page=40").await.json();
    assert_eq!(beyond["page"], 2);
    assert_eq!(ids(&beyond), vec!["SEC007", "SEC008", "SEC009"]);

    let zero: Value = client.get("/api/v1/lessons?page=0").await.json();
    assert_eq!(zero["page"], 1);
}

#[tokio::test]
async fn test_browse_clamps_negative_and_oversized_pages() {
    let client = TestClient::new(static_app().await);

    let response = client.get("/api/v1/lessons?page=-1").await;
    response.assert_status(StatusCode::OK);
    let negative: Value = response.json();
    assert_eq!(negative["page"], 1);
    assert_eq!(ids(&negative).len(), 6);

    let response = client.get("/api/v1/lessons?page=99999999999999999999999").await;
    response.assert_status(StatusCode::OK);
    let huge: Value = response.json();
    assert_eq!(huge["page"], 2);
    assert_eq!(ids(&huge), vec!["SEC007", "SEC008", "SEC009"]);
}

#[tokio::test]
async fn test_browse_combines_query_topic_and_language() {
    let client = TestClient::new(static_app().await);

    let by_query: Value = client.get("/api/v1/lessons?q=PASSWORD").await.json();
    assert_eq!(ids(&by_query), vec!["SEC001", "SEC004", "SEC008"]);

    let malware_in_german: Value = client
        .get("/api/v1/lessons?topic=4&language=2")
        .await
        .json();
    assert_eq!(ids(&malware_in_german), vec!["SEC007", "SEC008", "SEC009"]);

    let all: Value = client
        .get("/api/v1/lessons?topic=all&language=all")
        .await
        .json();
    assert_eq!(all["total"], 9);

    let nothing: Value = client.get("/api/v1/lessons?q=blockchain").await.json();
    assert_eq!(nothing["total"], 0);
    assert_eq!(nothing["page"], 1);
    assert_eq!(nothing["pageCount"], 0);
}

#[tokio::test]
async fn test_browse_rejects_bad_topic_filter() {
    let client = TestClient::new(static_app().await);
    let response = client.get("/api/v1/lessons?topic=phishing").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_admin_crud_round_trip() {
    let client = TestClient::new(memory_app().await);

    let response = client.post_json("/api/v1/lessons", &new_lesson("Clean Desk Policy")).await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["lessonId"], "SEC008");
    assert_eq!(created["difficultyLevel"], "Basic");
    assert_eq!(created["quizQuestions"], "4");

    let fetched: Value = client.get("/api/v1/lessons/SEC008").await.json();
    assert_eq!(fetched["title"], "Clean Desk Policy");

    let mut edited = fetched.clone();
    edited["title"] = json!("Clean Desk and Screen Lock");
    let response = client.put_json("/api/v1/lessons/SEC008", &edited).await;
    response.assert_status(StatusCode::OK);
    let catalog: Value = client.get("/api/v1/catalog").await.json();
    let titles: Vec<&str> = catalog["lessons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Clean Desk and Screen Lock"));

    client.delete("/api/v1/lessons/SEC008").await.assert_status(StatusCode::OK);
    client
        .get("/api/v1/lessons/SEC008")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_validation_and_conflicts() {
    let client = TestClient::new(memory_app().await);

    let mut missing = new_lesson("");
    missing["difficultyLevel"] = json!("");
    let response = client.post_json("/api/v1/lessons", &missing).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "validation");

    let mut dangling = new_lesson("Dangling");
    dangling["topics"] = json!([42]);
    client
        .post_json("/api/v1/lessons", &dangling)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let mut duplicate = new_lesson("Duplicate");
    duplicate["lessonId"] = json!("SEC001");
    client
        .post_json("/api/v1/lessons", &duplicate)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_path_and_body_ids_must_agree() {
    let client = TestClient::new(memory_app().await);
    let mut lesson: Value = client.get("/api/v1/lessons/SEC001").await.json();
    lesson["lessonId"] = json!("SEC002");
    client
        .put_json("/api/v1/lessons/SEC001", &lesson)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    client
        .put_json("/api/v1/lessons/SEC404", &new_lesson("Ghost"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_persisted_writes_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let source = CatalogSource::Persisted {
        dir: dir.path().to_path_buf(),
        key: "lessonsData".into(),
    };

    let client = TestClient::new(app_with_source(source.clone()).await);
    let empty: Value = client.get("/api/v1/catalog").await.json();
    assert_eq!(empty, json!({ "lessons": [], "topics": [], "languages": [] }));

    let catalog = json!({
        "lessons": [],
        "topics": ["Passwords"],
        "languages": ["English"]
    });
    client
        .put_json("/api/v1/catalog", &catalog)
        .await
        .assert_status(StatusCode::OK);
    client
        .post_json("/api/v1/lessons", &new_lesson("Laptop Theft"))
        .await
        .assert_status(StatusCode::CREATED);

    let restarted = TestClient::new(app_with_source(source).await);
    let lesson: Value = restarted.get("/api/v1/lessons/SEC001").await.json();
    assert_eq!(lesson["title"], "Laptop Theft");
}
