use axum::http::StatusCode;
use axum_test::TestServer;
use experiment_api::api::create_router;
use experiment_api::config::Config;
use experiment_api::db::Database;
use experiment_api::models::*;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE: &str = "/api/v1/experiments";

fn setup() -> TestServer {
    setup_with(Config::default())
}

fn setup_with(config: Config) -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let app = create_router(db, &config);
    TestServer::new(app).expect("Failed to create test server")
}

fn minimal_payload() -> Value {
    json!({
        "title": "Test Experiment",
        "description": "This is a test experiment",
        "category": "research",
        "startDate": "2024-01-01",
        "researcher": "John Doe"
    })
}

fn payload_with(overrides: Value) -> Value {
    let mut payload = minimal_payload();
    for (key, value) in overrides.as_object().expect("overrides must be an object") {
        payload[key] = value.clone();
    }
    payload
}

async fn create_experiment(server: &TestServer, payload: Value) -> Experiment {
    server
        .post(BASE)
        .json(&payload)
        .await
        .json::<ApiResponse<Experiment>>()
        .data
        .expect("create response carries data")
}

fn violation_fields(error: &ErrorResponse) -> Vec<String> {
    error
        .details
        .as_ref()
        .map(|d| d.iter().map(|v| v.field.clone()).collect())
        .unwrap_or_default()
}

mod create {
    use super::*;

    #[tokio::test]
    async fn returns_201_with_generated_id() {
        let server = setup();

        let response = server.post(BASE).json(&minimal_payload()).await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Experiment> = response.json();
        assert!(body.success);
        assert_eq!(body.message.as_deref(), Some("Experiment created successfully"));
        let experiment = body.data.unwrap();
        assert_eq!(experiment.title, "Test Experiment");
        assert_eq!(experiment.status, ExperimentStatus::Planned);
        assert_eq!(experiment.priority, Priority::Medium);
        assert_eq!(experiment.budget, 0.0);
        assert_eq!(experiment.created_at, experiment.updated_at);
    }

    #[tokio::test]
    async fn stored_record_round_trips_every_field() {
        let server = setup();
        let payload = payload_with(json!({
            "status": "ongoing",
            "endDate": "2024-06-30T12:00:00Z",
            "budget": 1250.5,
            "team": [
                { "name": "Alex Wong", "role": "ML Engineer", "email": "alex@example.com" },
                { "name": "Sam" }
            ],
            "objectives": ["Achieve 85% accuracy", "Document results"],
            "methodology": "Supervised learning",
            "expectedOutcomes": "Production-ready model",
            "results": {
                "status": "partial",
                "findings": "Promising",
                "metrics": { "accuracy": 0.89, "runs": [1, 2, 3] }
            },
            "attachments": [
                { "filename": "report.pdf", "url": "https://example.com/report.pdf", "uploadedAt": "2024-02-01T08:30:00Z" }
            ],
            "tags": ["ai", "ml"],
            "priority": "critical",
            "notes": "Run on cluster B",
            "customFields": { "lab": "B2", "nested": { "flag": true, "ratio": 0.5 } }
        }));

        let created = create_experiment(&server, payload).await;

        assert_eq!(created.status, ExperimentStatus::Ongoing);
        assert_eq!(created.budget, 1250.5);
        assert_eq!(created.team.len(), 2);
        assert_eq!(created.team[1].email, None);
        assert_eq!(created.tags, vec!["ai", "ml"]);
        assert_eq!(created.priority, Priority::Critical);
        assert_eq!(
            created.custom_fields,
            Some(json!({ "lab": "B2", "nested": { "flag": true, "ratio": 0.5 } }))
        );
        assert_eq!(
            created.results.as_ref().and_then(|r| r.metrics.clone()),
            Some(json!({ "accuracy": 0.89, "runs": [1, 2, 3] }))
        );

        let fetched = server
            .get(&format!("{BASE}/{}", created.id))
            .await
            .json::<ApiResponse<Experiment>>()
            .data
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn rejects_each_missing_required_field() {
        let server = setup();

        for field in ["title", "description", "category", "startDate", "researcher"] {
            let mut payload = minimal_payload();
            payload.as_object_mut().unwrap().remove(field);

            let response = server.post(BASE).json(&payload).await;

            response.assert_status(StatusCode::BAD_REQUEST);
            let error: ErrorResponse = response.json();
            assert!(!error.success);
            assert_eq!(error.error, "Validation Error");
            assert_eq!(violation_fields(&error), vec![field.to_string()]);
        }
    }

    #[tokio::test]
    async fn rejects_end_date_before_start_date() {
        let server = setup();

        let response = server
            .post(BASE)
            .json(&payload_with(json!({
                "startDate": "2024-12-01",
                "endDate": "2024-01-01"
            })))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(violation_fields(&error), vec!["endDate"]);
    }

    #[tokio::test]
    async fn reports_all_violations_at_once() {
        let server = setup();

        let response = server
            .post(BASE)
            .json(&json!({
                "title": "x".repeat(101),
                "description": "ok",
                "category": "astrology",
                "startDate": "not a date",
                "researcher": "Jane",
                "budget": -1,
                "team": [{ "email": "nope" }]
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(
            violation_fields(&error),
            vec!["title", "category", "startDate", "budget", "team.0.email"]
        );
    }

    #[tokio::test]
    async fn rejects_dates_outside_four_digit_years() {
        let server = setup();

        for start in [json!(253_402_300_800_000_i64), json!(-62_200_000_000_000_i64)] {
            let response = server
                .post(BASE)
                .json(&payload_with(json!({ "startDate": start })))
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            let error: ErrorResponse = response.json();
            assert_eq!(violation_fields(&error), vec!["startDate"]);
        }

        let response = server.get(BASE).await;
        response.assert_status_ok();
        assert_eq!(response.json::<ListResponse<Experiment>>().pagination.total, 0);
    }

    #[tokio::test]
    async fn latest_four_digit_date_round_trips() {
        let server = setup();
        let created = create_experiment(
            &server,
            payload_with(json!({ "startDate": "9999-12-31T23:59:59Z" })),
        )
        .await;

        server.get(BASE).await.assert_status_ok();
        server
            .get(&format!("{BASE}/{}", created.id))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn whole_budget_is_echoed_without_fraction() {
        let server = setup();

        let response = server
            .post(BASE)
            .json(&payload_with(json!({ "budget": 75000, "status": "ongoing" })))
            .await;

        let body: Value = response.json();
        assert_eq!(body["data"]["budget"], json!(75000));
        assert!(body["data"]["budget"].is_u64());

        let stats: Value = server.get(&format!("{BASE}/stats/overview")).await.json();
        assert_eq!(stats["data"]["byStatus"][0]["avgBudget"], json!(75000));
    }

    #[tokio::test]
    async fn drops_unknown_fields() {
        let server = setup();
        let forged_id = Uuid::new_v4();

        let response = server
            .post(BASE)
            .json(&payload_with(json!({
                "id": forged_id.to_string(),
                "secret": "should not be stored",
                "createdAt": "1999-01-01T00:00:00Z"
            })))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let data = &body["data"];
        assert!(data.get("secret").is_none());
        assert_ne!(data["id"], json!(forged_id.to_string()));
        assert_ne!(data["createdAt"], json!("1999-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn rejects_body_that_is_not_json() {
        let server = setup();

        let response = server.post(BASE).text("title=Test").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert!(!error.success);
        assert_eq!(violation_fields(&error), vec!["body"]);
    }
}

mod list {
    use super::*;

    async fn seed_three(server: &TestServer) -> Vec<Experiment> {
        vec![
            create_experiment(
                server,
                payload_with(json!({
                    "title": "Alpha",
                    "status": "planned",
                    "budget": 300,
                    "researcher": "Dr. Emily Chen"
                })),
            )
            .await,
            create_experiment(
                server,
                payload_with(json!({
                    "title": "Beta",
                    "status": "completed",
                    "category": "testing",
                    "budget": 100,
                    "researcher": "Prof. Michael Rodriguez"
                })),
            )
            .await,
            create_experiment(
                server,
                payload_with(json!({
                    "title": "Gamma",
                    "status": "ongoing",
                    "budget": 200,
                    "researcher": "emily watson"
                })),
            )
            .await,
        ]
    }

    #[tokio::test]
    async fn returns_all_records_with_total() {
        let server = setup();
        seed_three(&server).await;

        let response = server.get(BASE).await;

        response.assert_status_ok();
        let body: ListResponse<Experiment> = response.json();
        assert!(body.success);
        assert_eq!(body.data.len(), 3);
        assert_eq!(
            body.pagination,
            Pagination {
                total: 3,
                page: 1,
                limit: 10,
                pages: 1
            }
        );
    }

    #[tokio::test]
    async fn returns_empty_page_when_nothing_exists() {
        let server = setup();

        let body: ListResponse<Experiment> = server.get(BASE).await.json();

        assert!(body.data.is_empty());
        assert_eq!(body.pagination.total, 0);
        assert_eq!(body.pagination.pages, 0);
    }

    #[tokio::test]
    async fn defaults_to_newest_first() {
        let server = setup();
        seed_three(&server).await;

        let body: ListResponse<Experiment> = server.get(BASE).await.json();

        let titles: Vec<_> = body.data.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Gamma", "Beta", "Alpha"]);
    }

    #[tokio::test]
    async fn filters_by_status() {
        let server = setup();
        seed_three(&server).await;

        let body: ListResponse<Experiment> = server
            .get(BASE)
            .add_query_param("status", "completed")
            .await
            .json();

        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].status, ExperimentStatus::Completed);
        assert_eq!(body.pagination.total, 1);
    }

    #[tokio::test]
    async fn filters_by_category() {
        let server = setup();
        seed_three(&server).await;

        let body: ListResponse<Experiment> = server
            .get(BASE)
            .add_query_param("category", "testing")
            .await
            .json();

        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].title, "Beta");
    }

    #[tokio::test]
    async fn filters_researcher_by_case_insensitive_substring() {
        let server = setup();
        seed_three(&server).await;

        let body: ListResponse<Experiment> = server
            .get(BASE)
            .add_query_param("researcher", "EMILY")
            .await
            .json();

        let mut titles: Vec<_> = body.data.iter().map(|e| e.title.clone()).collect();
        titles.sort();
        assert_eq!(titles, vec!["Alpha", "Gamma"]);
    }

    #[tokio::test]
    async fn unknown_status_matches_nothing() {
        let server = setup();
        seed_three(&server).await;

        let body: ListResponse<Experiment> = server
            .get(BASE)
            .add_query_param("status", "archived")
            .await
            .json();

        assert!(body.data.is_empty());
        assert_eq!(body.pagination.total, 0);
    }

    #[tokio::test]
    async fn paginates_one_record_per_page() {
        let server = setup();
        seed_three(&server).await;

        let first: ListResponse<Experiment> = server
            .get(BASE)
            .add_query_param("page", "1")
            .add_query_param("limit", "1")
            .await
            .json();
        let second: ListResponse<Experiment> = server
            .get(BASE)
            .add_query_param("page", "2")
            .add_query_param("limit", "1")
            .await
            .json();

        assert_eq!(first.data.len(), 1);
        assert_eq!(first.pagination.pages, 3);
        assert_eq!(first.pagination.limit, 1);
        assert_eq!(second.data.len(), 1);
        assert_eq!(second.pagination.page, 2);
        assert_ne!(first.data[0].id, second.data[0].id);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let server = setup();
        seed_three(&server).await;

        let body: ListResponse<Experiment> = server
            .get(BASE)
            .add_query_param("page", "5")
            .await
            .json();

        assert!(body.data.is_empty());
        assert_eq!(body.pagination.total, 3);
    }

    #[tokio::test]
    async fn largest_page_and_limit_return_empty_page() {
        let server = setup();
        seed_three(&server).await;

        let response = server
            .get(BASE)
            .add_query_param("page", "4294967295")
            .add_query_param("limit", "4294967295")
            .await;

        response.assert_status_ok();
        let body: ListResponse<Experiment> = response.json();
        assert!(body.data.is_empty());
        assert_eq!(body.pagination.total, 3);
        assert_eq!(body.pagination.pages, 1);
    }

    #[tokio::test]
    async fn sorts_by_requested_key() {
        let server = setup();
        seed_three(&server).await;

        let body: ListResponse<Experiment> = server
            .get(BASE)
            .add_query_param("sortBy", "budget")
            .await
            .json();
        let budgets: Vec<f64> = body.data.iter().map(|e| e.budget).collect();
        assert_eq!(budgets, vec![100.0, 200.0, 300.0]);

        let body: ListResponse<Experiment> = server
            .get(BASE)
            .add_query_param("sortBy", "-title")
            .await
            .json();
        let titles: Vec<_> = body.data.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Gamma", "Beta", "Alpha"]);
    }

    #[tokio::test]
    async fn rejects_unknown_sort_key() {
        let server = setup();

        let response = server.get(BASE).add_query_param("sortBy", "-password").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(violation_fields(&error), vec!["sortBy"]);
    }

    #[tokio::test]
    async fn rejects_invalid_page_and_limit() {
        let server = setup();

        let response = server
            .get(BASE)
            .add_query_param("page", "0")
            .add_query_param("limit", "ten")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(violation_fields(&error), vec!["page", "limit"]);
    }
}

mod get_by_id {
    use super::*;

    #[tokio::test]
    async fn returns_the_record() {
        let server = setup();
        let created = create_experiment(&server, minimal_payload()).await;

        let response = server.get(&format!("{BASE}/{}", created.id)).await;

        response.assert_status_ok();
        let body: ApiResponse<Experiment> = response.json();
        assert!(body.success);
        assert_eq!(body.data.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn returns_404_for_unknown_id() {
        let server = setup();

        let response = server.get(&format!("{BASE}/{}", Uuid::new_v4())).await;

        response.assert_status(StatusCode::NOT_FOUND);
        let error: ErrorResponse = response.json();
        assert!(!error.success);
        assert_eq!(error.error, "Experiment not found");
    }

    #[tokio::test]
    async fn returns_404_for_malformed_id() {
        let server = setup();

        let response = server.get(&format!("{BASE}/507f1f77bcf86cd799439011")).await;

        response.assert_status(StatusCode::NOT_FOUND);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Experiment not found");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn persists_status_and_title() {
        let server = setup();
        let created = create_experiment(&server, minimal_payload()).await;

        let response = server
            .put(&format!("{BASE}/{}", created.id))
            .json(&json!({ "status": "completed", "title": "Updated Title" }))
            .await;

        response.assert_status_ok();
        let body: ApiResponse<Experiment> = response.json();
        assert_eq!(body.message.as_deref(), Some("Experiment updated successfully"));
        let updated = body.data.unwrap();
        assert_eq!(updated.status, ExperimentStatus::Completed);
        assert_eq!(updated.title, "Updated Title");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let fetched = server
            .get(&format!("{BASE}/{}", created.id))
            .await
            .json::<ApiResponse<Experiment>>()
            .data
            .unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn rejects_empty_payload() {
        let server = setup();
        let created = create_experiment(&server, minimal_payload()).await;

        let response = server
            .put(&format!("{BASE}/{}", created.id))
            .json(&json!({}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        let details = error.details.unwrap();
        assert_eq!(details[0].message, "No fields to update");
    }

    #[tokio::test]
    async fn returns_404_for_unknown_id() {
        let server = setup();

        let response = server
            .put(&format!("{BASE}/{}", Uuid::new_v4()))
            .json(&json!({ "status": "completed" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn validates_before_looking_up() {
        let server = setup();

        let response = server
            .put(&format!("{BASE}/{}", Uuid::new_v4()))
            .json(&json!({ "priority": "urgent" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_end_date_before_stored_start_date() {
        let server = setup();
        let created = create_experiment(&server, minimal_payload()).await;

        let response = server
            .put(&format!("{BASE}/{}", created.id))
            .json(&json!({ "endDate": "2023-12-31" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(violation_fields(&error), vec!["endDate"]);

        let fetched = server
            .get(&format!("{BASE}/{}", created.id))
            .await
            .json::<ApiResponse<Experiment>>()
            .data
            .unwrap();
        assert!(fetched.end_date.is_none());
    }

    #[tokio::test]
    async fn null_end_date_clears_it() {
        let server = setup();
        let created =
            create_experiment(&server, payload_with(json!({ "endDate": "2024-02-01" }))).await;
        assert!(created.end_date.is_some());

        let updated = server
            .put(&format!("{BASE}/{}", created.id))
            .json(&json!({ "endDate": null }))
            .await
            .json::<ApiResponse<Experiment>>()
            .data
            .unwrap();

        assert!(updated.end_date.is_none());
    }

    #[tokio::test]
    async fn replaces_arrays_wholesale() {
        let server = setup();
        let created = create_experiment(&server, payload_with(json!({ "tags": ["a", "b"] }))).await;

        let updated = server
            .put(&format!("{BASE}/{}", created.id))
            .json(&json!({ "tags": ["c"] }))
            .await
            .json::<ApiResponse<Experiment>>()
            .data
            .unwrap();

        assert_eq!(updated.tags, vec!["c"]);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn removes_the_record() {
        let server = setup();
        let created = create_experiment(&server, minimal_payload()).await;

        let response = server.delete(&format!("{BASE}/{}", created.id)).await;

        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message.as_deref(), Some("Experiment deleted successfully"));

        server
            .get(&format!("{BASE}/{}", created.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn repeated_delete_returns_404_each_time() {
        let server = setup();
        let created = create_experiment(&server, minimal_payload()).await;
        let path = format!("{BASE}/{}", created.id);

        server.delete(&path).await.assert_status_ok();
        server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
        server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
    }
}

mod stats {
    use super::*;

    #[tokio::test]
    async fn groups_by_status_and_category() {
        let server = setup();
        for (status, category, budget) in [
            ("planned", "research", 100),
            ("ongoing", "research", 200),
            ("completed", "testing", 300),
        ] {
            create_experiment(
                &server,
                payload_with(json!({ "status": status, "category": category, "budget": budget })),
            )
            .await;
        }

        let response = server.get(&format!("{BASE}/stats/overview")).await;

        response.assert_status_ok();
        let stats = response
            .json::<ApiResponse<ExperimentStats>>()
            .data
            .unwrap();
        assert_eq!(stats.total, 3);

        let mut statuses: Vec<_> = stats.by_status.iter().map(|s| s.status).collect();
        statuses.sort_by_key(|s| s.as_str());
        assert_eq!(
            statuses,
            vec![
                ExperimentStatus::Completed,
                ExperimentStatus::Ongoing,
                ExperimentStatus::Planned
            ]
        );
        let completed = stats
            .by_status
            .iter()
            .find(|s| s.status == ExperimentStatus::Completed)
            .unwrap();
        assert_eq!(completed.count, 1);
        assert_eq!(completed.avg_budget, 300.0);

        let research = stats
            .by_category
            .iter()
            .find(|c| c.category == Category::Research)
            .unwrap();
        assert_eq!(research.count, 2);
    }

    #[tokio::test]
    async fn averages_budget_within_a_status() {
        let server = setup();
        for budget in [100, 300] {
            create_experiment(&server, payload_with(json!({ "budget": budget }))).await;
        }

        let stats = server
            .get(&format!("{BASE}/stats/overview"))
            .await
            .json::<ApiResponse<ExperimentStats>>()
            .data
            .unwrap();

        assert_eq!(stats.by_status.len(), 1);
        assert_eq!(stats.by_status[0].count, 2);
        assert_eq!(stats.by_status[0].avg_budget, 200.0);
    }

    #[tokio::test]
    async fn is_empty_without_records() {
        let server = setup();

        let response = server.get(&format!("{BASE}/stats/overview")).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": { "byStatus": [], "byCategory": [], "total": 0 }
            })
        );
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_healthy() {
        let server = setup();

        let response = server.get("/api/health/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], json!("API is healthy"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn reports_version_and_environment() {
        let server = setup_with(Config {
            environment: "staging".to_string(),
            ..Config::default()
        });

        let body: Value = server.get("/api/health/info").await.json();

        assert_eq!(body["name"], json!("Experiment Backend API"));
        assert_eq!(body["version"], json!("v1"));
        assert_eq!(body["environment"], json!("staging"));
    }
}

mod routing {
    use super::*;

    #[tokio::test]
    async fn unknown_route_returns_404_envelope() {
        let server = setup();

        let response = server.get("/api/v1/nothing-here").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let error: ErrorResponse = response.json();
        assert!(!error.success);
        assert_eq!(error.error, "Route not found");
    }

    #[tokio::test]
    async fn unsupported_method_returns_404_envelope() {
        let server = setup();

        let response = server.patch(&format!("{BASE}/{}", Uuid::new_v4())).await;

        response.assert_status(StatusCode::NOT_FOUND);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Route not found");
    }

    #[tokio::test]
    async fn trailing_slash_serves_collection() {
        let server = setup();

        server
            .post(&format!("{BASE}/"))
            .json(&minimal_payload())
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get(&format!("{BASE}/")).await;
        response.assert_status_ok();
        assert_eq!(response.json::<ListResponse<Experiment>>().data.len(), 1);
    }

    #[tokio::test]
    async fn api_version_comes_from_config() {
        let server = setup_with(Config {
            api_version: "v2".to_string(),
            ..Config::default()
        });

        server.get("/api/v2/experiments").await.assert_status_ok();
        server
            .get("/api/v1/experiments")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
