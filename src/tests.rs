//! Integration tests for the branch site backend.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::{Config, LogFormat};
use crate::db::{init_database, Repository};
use crate::models::derive_user_id;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    repo: Arc<Repository>,
    db_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Create config
        let config = Config {
            db_path: db_path.clone(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
            agency_name: "LIC Test Branch".to_string(),
            site_url: Some("https://lic-test.example".to_string()),
            keepalive_url: None,
            keepalive_interval: Duration::from_secs(840),
        };

        let state = AppState {
            repo: repo.clone(),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            repo,
            db_path,
            _temp_dir: temp_dir,
        }
    }

    /// Make every later insert into `table` fail, through a separate connection.
    async fn reject_inserts_into(&self, table: &str) {
        let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}", self.db_path.display()))
            .await
            .expect("Failed to open second pool");
        sqlx::query(&format!(
            "CREATE TRIGGER reject_{table} BEFORE INSERT ON {table} BEGIN SELECT RAISE(ABORT, 'rejected'); END"
        ))
        .execute(&pool)
        .await
        .expect("Failed to install trigger");
        pool.close().await;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }
}

fn missing_fields(body: &Value) -> Vec<String> {
    body["error"]["details"]["missingFields"]
        .as_array()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/lic/nothing-here").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_feedback_submit_and_list() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/lic/submit-feedback",
            json!({ "name": "Raj", "email": "raj@example.com", "feedback": "Very helpful staff" }),
        )
        .await;
    assert_eq!(status, 201);
    assert!(body["message"].is_string());

    let (status, body) = fixture.get("/api/lic/feedbacks").await;
    assert_eq!(status, 200);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Raj");
    assert_eq!(list[0]["feedback"], "Very helpful staff");
    assert_eq!(list[0]["email"], "raj@example.com");
    assert!(list[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_feedback_without_email_is_accepted() {
    let fixture = TestFixture::new().await;

    let (status, _) = fixture
        .post(
            "/api/lic/submit-feedback",
            json!({ "name": "Meena", "feedback": "Quick claim settlement" }),
        )
        .await;
    assert_eq!(status, 201);

    let (_, body) = fixture.get("/api/lic/feedbacks").await;
    assert!(body[0].get("email").is_none());
}

#[tokio::test]
async fn test_feedback_missing_fields_creates_nothing() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post("/api/lic/submit-feedback", json!({ "email": "x@example.com" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(missing_fields(&body), vec!["name", "feedback"]);

    let (status, _) = fixture
        .post(
            "/api/lic/submit-feedback",
            json!({ "name": "   ", "feedback": "whitespace name" }),
        )
        .await;
    assert_eq!(status, 400);

    let (_, body) = fixture.get("/api/lic/feedbacks").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_feedback_accepts_form_encoding() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/lic/submit-feedback"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=Sunita&feedback=Good+advice")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let (_, body) = fixture.get("/api/lic/feedbacks").await;
    assert_eq!(body[0]["feedback"], "Good advice");
}

#[tokio::test]
async fn test_query_submit_and_list() {
    let fixture = TestFixture::new().await;

    let (status, _) = fixture
        .post(
            "/api/lic/submit-query",
            json!({ "name": "Raj", "query": "What are the office hours?" }),
        )
        .await;
    assert_eq!(status, 201);

    let (status, body) = fixture.post("/api/lic/submit-query", json!({ "name": "Raj" })).await;
    assert_eq!(status, 400);
    assert_eq!(missing_fields(&body), vec!["query"]);

    let (status, body) = fixture.get("/api/lic/queries").await;
    assert_eq!(status, 200);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["query"], "What are the office hours?");
}

#[tokio::test]
async fn test_review_create_returns_record() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/lic/reviews",
            json!({ "username": "Asha", "comment": "Great service" }),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(body["username"], "Asha");
    assert_eq!(body["comment"], "Great service");
    assert_eq!(body["language"], "en-IN");
    assert!(body["id"].is_string());
    assert!(body["datePublished"].is_string());

    let (status, body) = fixture
        .post("/api/lic/reviews", json!({ "username": "Asha" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(missing_fields(&body), vec!["comment"]);
}

#[tokio::test]
async fn test_rating_upsert_keeps_one_record_per_user() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post("/api/lic/ratings", json!({ "userId": "u1", "rating": 5 }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["userId"], "u1");
    assert_eq!(body["rating"], 5);

    let (status, body) = fixture
        .post("/api/lic/ratings", json!({ "userId": "u1", "rating": 3 }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["rating"], 3);

    let (_, body) = fixture.get("/api/lic/ratings").await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["userId"], "u1");
    assert_eq!(list[0]["rating"], 3);
}

#[tokio::test]
async fn test_rating_derives_user_id_from_email() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/lic/ratings",
            json!({ "email": "asha@example.com", "username": "Asha", "rating": "4" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["userId"], derive_user_id("asha@example.com"));
    assert_eq!(body["rating"], 4);
}

#[tokio::test]
async fn test_rating_validation() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.post("/api/lic/ratings", json!({ "rating": 4 })).await;
    assert_eq!(status, 400);
    assert_eq!(missing_fields(&body), vec!["userId"]);

    let (status, body) = fixture
        .post("/api/lic/ratings", json!({ "userId": "u1", "rating": 7 }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["details"]["invalidFields"], json!(["rating"]));

    let (_, body) = fixture.get("/api/lic/ratings").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_combined_review_and_rating_are_mutually_resolvable() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/reviews/submit-review",
            json!({ "username": "Asha", "comment": "Great service", "rating": 5 }),
        )
        .await;
    assert_eq!(status, 200);
    assert!(body["message"].is_string());
    assert_eq!(body["review"]["username"], "Asha");
    let key = derive_user_id("Asha");
    assert_eq!(body["review"]["userId"], key.as_str());

    let (_, ratings) = fixture.get("/api/lic/ratings").await;
    assert_eq!(ratings[0]["userId"], key.as_str());
    assert_eq!(ratings[0]["rating"], 5);

    let (status, summary) = fixture.get("/reviews/summary").await;
    assert_eq!(status, 200);
    assert_eq!(summary["ratingCount"], 1);
    assert_eq!(summary["averageRating"], 5.0);
    assert_eq!(summary["reviews"][0]["author"], "Asha");
    assert_eq!(summary["reviews"][0]["quote"], "Great service");
    assert_eq!(summary["reviews"][0]["rating"], 5);
    assert_eq!(summary["reviews"][0]["stars"], "★★★★★");
}

#[tokio::test]
async fn test_combined_review_with_email_keys_rating_by_email() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/reviews/submit-review"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("username=Vikram&email=vikram%40example.com&comment=Patient+agent&rating=4&language=hi-IN")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (_, ratings) = fixture.get("/api/lic/ratings").await;
    assert_eq!(ratings[0]["userId"], derive_user_id("vikram@example.com"));

    let (_, summary) = fixture.get("/reviews/summary").await;
    assert_eq!(summary["reviews"][0]["rating"], 4);
    assert_eq!(summary["reviews"][0]["language"], "hi-IN");
}

#[tokio::test]
async fn test_combined_review_requires_all_fields() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post("/reviews/submit-review", json!({ "username": "Asha" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(missing_fields(&body), vec!["comment", "rating"]);

    let (_, reviews) = fixture.get("/api/lic/reviews").await;
    assert_eq!(reviews, json!([]));
}

#[tokio::test]
async fn test_resubmitted_review_updates_rating() {
    let fixture = TestFixture::new().await;

    for (comment, rating) in [("Okay", 2), ("Much better now", 4)] {
        let (status, _) = fixture
            .post(
                "/reviews/submit-review",
                json!({ "username": "Asha", "comment": comment, "rating": rating }),
            )
            .await;
        assert_eq!(status, 200);
    }

    let (_, summary) = fixture.get("/reviews/summary").await;
    assert_eq!(summary["reviews"].as_array().unwrap().len(), 2);
    assert_eq!(summary["ratingCount"], 1);
    assert_eq!(summary["averageRating"], 4.0);
    // Both reviews resolve to the reviewer's latest rating.
    assert_eq!(summary["reviews"][0]["rating"], 4);
    assert_eq!(summary["reviews"][1]["rating"], 4);
}

#[tokio::test]
async fn test_contact_form_writes_feedback_and_query() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/reviews/submit-feedback",
            json!({ "name": "Raj", "message": "good", "query": "when open?" }),
        )
        .await;
    assert_eq!(status, 200);
    assert!(body["message"].is_string());

    let (_, feedbacks) = fixture.get("/api/lic/feedbacks").await;
    let (_, queries) = fixture.get("/api/lic/queries").await;
    assert_eq!(feedbacks.as_array().unwrap().len(), 1);
    assert_eq!(feedbacks[0]["feedback"], "good");
    assert_eq!(queries.as_array().unwrap().len(), 1);
    assert_eq!(queries[0]["query"], "when open?");
}

#[tokio::test]
async fn test_contact_form_with_only_a_query() {
    let fixture = TestFixture::new().await;

    let (status, _) = fixture
        .post(
            "/reviews/submit-feedback",
            json!({ "name": "Raj", "query": "Is the branch open on Saturday?" }),
        )
        .await;
    assert_eq!(status, 200);

    let (_, feedbacks) = fixture.get("/api/lic/feedbacks").await;
    let (_, queries) = fixture.get("/api/lic/queries").await;
    assert_eq!(feedbacks, json!([]));
    assert_eq!(queries.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_contact_form_validation() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post("/reviews/submit-feedback", json!({ "name": "Raj" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(missing_fields(&body), vec!["message or query"]);

    let (status, body) = fixture
        .post("/reviews/submit-feedback", json!({ "message": "hello" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(missing_fields(&body), vec!["name"]);
}

#[tokio::test]
async fn test_review_list_reads_are_idempotent() {
    let fixture = TestFixture::new().await;

    for name in ["Asha", "Raj"] {
        fixture
            .post(
                "/api/lic/reviews",
                json!({ "username": name, "comment": "Good" }),
            )
            .await;
    }

    let (_, first) = fixture.get("/api/lic/reviews").await;
    let (_, second) = fixture.get("/api/lic/reviews").await;
    assert_eq!(first.as_array().unwrap().len(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unrated_review_shows_zero_stars() {
    let fixture = TestFixture::new().await;

    fixture
        .post(
            "/api/lic/reviews",
            json!({ "username": "Vikram", "comment": "No stars given" }),
        )
        .await;
    fixture
        .post("/api/lic/ratings", json!({ "userId": "someone-else", "rating": 2 }))
        .await;

    let (_, summary) = fixture.get("/reviews/summary").await;
    assert_eq!(summary["reviews"][0]["rating"], 0);
    assert_eq!(summary["reviews"][0]["stars"], "☆☆☆☆☆");
    assert_eq!(summary["ratingCount"], 1);
    assert_eq!(summary["averageRating"], 2.0);
}

#[tokio::test]
async fn test_summary_average_over_many_ratings() {
    let fixture = TestFixture::new().await;

    for (user, rating) in [("a", 5), ("b", 3), ("c", 4)] {
        fixture
            .post("/api/lic/ratings", json!({ "userId": user, "rating": rating }))
            .await;
    }

    let (_, summary) = fixture.get("/reviews/summary").await;
    assert_eq!(summary["averageRating"], 4.0);
    assert_eq!(summary["ratingCount"], 3);
    assert_eq!(summary["reviews"], json!([]));
}

#[tokio::test]
async fn test_structured_data() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/reviews/structured-data"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "application/ld+json"
    );
    let doc: Value = resp.json().await.unwrap();
    assert_eq!(doc["name"], "LIC Test Branch");
    assert_eq!(doc["url"], "https://lic-test.example");
    assert!(doc.get("aggregateRating").is_none());

    fixture
        .post(
            "/reviews/submit-review",
            json!({ "username": "Asha", "comment": "Great service", "rating": 5 }),
        )
        .await;

    let (_, doc) = fixture.get("/reviews/structured-data").await;
    assert_eq!(doc["aggregateRating"]["ratingValue"], 5.0);
    assert_eq!(doc["aggregateRating"]["ratingCount"], 1);
    assert_eq!(doc["review"][0]["reviewBody"], "Great service");
    assert_eq!(doc["review"][0]["reviewRating"]["ratingValue"], 5);
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let fixture = TestFixture::new().await;
    fixture.repo.close().await;

    let (status, body) = fixture
        .post(
            "/api/lic/submit-feedback",
            json!({ "name": "Raj", "feedback": "good" }),
        )
        .await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], crate::errors::GENERIC_FAILURE);

    let (status, _) = fixture.get("/api/lic/reviews").await;
    assert_eq!(status, 500);

    let (status, _) = fixture
        .post(
            "/reviews/submit-review",
            json!({ "username": "Asha", "comment": "Great service", "rating": 5 }),
        )
        .await;
    assert_eq!(status, 500);
}

#[tokio::test]
async fn test_summary_degrades_to_empty_when_store_fails() {
    let fixture = TestFixture::new().await;
    fixture
        .post("/api/lic/ratings", json!({ "userId": "u1", "rating": 5 }))
        .await;
    fixture.repo.close().await;

    let (status, summary) = fixture.get("/reviews/summary").await;
    assert_eq!(status, 200);
    assert_eq!(
        summary,
        json!({ "reviews": [], "ratings": [], "averageRating": 0.0, "ratingCount": 0 })
    );

    let (status, doc) = fixture.get("/reviews/structured-data").await;
    assert_eq!(status, 200);
    assert!(doc.get("aggregateRating").is_none());
}

#[tokio::test]
async fn test_review_kept_when_rating_write_fails() {
    let fixture = TestFixture::new().await;
    fixture.reject_inserts_into("ratings").await;

    let (status, body) = fixture
        .post(
            "/reviews/submit-review",
            json!({ "username": "Asha", "comment": "Great service", "rating": 5 }),
        )
        .await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], crate::errors::GENERIC_FAILURE);

    // The first write is not rolled back.
    let (status, reviews) = fixture.get("/api/lic/reviews").await;
    assert_eq!(status, 200);
    assert_eq!(reviews.as_array().unwrap().len(), 1);
    assert_eq!(reviews[0]["username"], "Asha");

    let (_, ratings) = fixture.get("/api/lic/ratings").await;
    assert_eq!(ratings, json!([]));
}

#[tokio::test]
async fn test_feedback_kept_when_query_write_fails() {
    let fixture = TestFixture::new().await;
    fixture.reject_inserts_into("queries").await;

    let (status, body) = fixture
        .post(
            "/reviews/submit-feedback",
            json!({ "name": "Raj", "message": "good", "query": "when open?" }),
        )
        .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"]["message"], crate::errors::GENERIC_FAILURE);

    let (_, feedbacks) = fixture.get("/api/lic/feedbacks").await;
    assert_eq!(feedbacks.as_array().unwrap().len(), 1);
    assert_eq!(feedbacks[0]["feedback"], "good");

    let (_, queries) = fixture.get("/api/lic/queries").await;
    assert_eq!(queries, json!([]));
}
