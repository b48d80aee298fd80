// API Integration Tests
//
// Run with: cargo test --features server --test api_integration_tests

#[cfg(feature = "server")]
mod api_tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        Router,
    };
    use faceoff::{create_router, setup_database, AppState, Config};
    use rusqlite::Connection;
    use serde_json::{json, Value};
    use tower::ServiceExt; // for oneshot

    // Helper: in-memory database seeded through the API itself
    async fn create_test_app() -> Router {
        let conn = Connection::open_in_memory().expect("in-memory database");
        setup_database(&conn).expect("schema");
        let config = Config::from_lookup(|_| None).expect("default config");
        let app = create_router(AppState::new(conn, config));

        let roster = [
            ("1", "Aria Voss", "Caldari", "Achura", "Female"),
            ("2", "Lysa Maroon", "Gallente", "Jin-Mei", "Female"),
            ("3", "Tarek Ondu", "Minmatar", "Brutor", "Male"),
            ("4", "Dov Harun", "Amarr", "Khanid", "Male"),
        ];
        for (id, name, race, bloodline, gender) in roster {
            let body = json!({
                "characterId": id,
                "name": name,
                "race": race,
                "bloodline": bloodline,
                "gender": gender,
            });
            let (status, _) = send(&app, Method::POST, "/api/characters", Some(body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        app
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        dispatch(app, request).await
    }

    // Raw JSON text, for bodies serde_json::Value cannot represent
    async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        dispatch(app, request).await
    }

    async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::GET, uri, None).await
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_test_app().await;
        let (status, body) = get(&app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "OK");
        assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_matchup_returns_same_gender_pair() {
        let app = create_test_app().await;
        let (status, body) = get(&app, "/api/characters").await;

        assert_eq!(status, StatusCode::OK);
        let pair = body["data"].as_array().unwrap();
        assert_eq!(pair.len(), 2);
        assert_eq!(pair[0]["gender"], pair[1]["gender"]);
        assert_ne!(pair[0]["characterId"], pair[1]["characterId"]);
    }

    #[tokio::test]
    async fn test_vote_then_duplicate_vote() {
        let app = create_test_app().await;
        let vote = json!({"winner": "3", "loser": "4"});

        let (status, body) = send(&app, Method::PUT, "/api/characters", Some(vote.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "recorded");

        let (status, body) = send(&app, Method::PUT, "/api/characters", Some(vote)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "already_voted");

        let (_, body) = get(&app, "/api/characters/3").await;
        assert_eq!(body["data"]["wins"], 1);
        let (_, body) = get(&app, "/api/stats").await;
        assert_eq!(body["data"]["totalVotes"], 1);
    }

    #[tokio::test]
    async fn test_vote_errors_map_to_status() {
        let app = create_test_app().await;

        let (status, body) =
            send(&app, Method::PUT, "/api/characters", Some(json!({"winner": "1"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/characters",
            Some(json!({"winner": "1", "loser": "1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/characters",
            Some(json!({"winner": "1", "loser": "404"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
    }

    #[tokio::test]
    async fn test_malformed_requests_use_error_envelope() {
        let app = create_test_app().await;

        let (status, body) = get(&app, "/api/characters/shame?limit=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "validation");

        let (status, body) = send_raw(&app, Method::PUT, "/api/characters", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "validation");

        // Well-formed JSON missing required fields
        let (status, body) =
            send(&app, Method::POST, "/api/characters", Some(json!({"characterId": "9"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
        assert!(body["error"].as_str().unwrap().starts_with("validation failed"));

        // Nothing was written
        let (_, body) = get(&app, "/api/characters/count").await;
        assert_eq!(body["data"]["count"], 4);
    }

    #[tokio::test]
    async fn test_duplicate_character_is_conflict() {
        let app = create_test_app().await;
        let body = json!({
            "characterId": "1",
            "name": "Copy",
            "race": "Caldari",
            "bloodline": "Civire",
            "gender": "Female",
        });
        let (status, body) = send(&app, Method::POST, "/api/characters", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "conflict");
    }

    #[tokio::test]
    async fn test_count_and_search() {
        let app = create_test_app().await;

        let (_, body) = get(&app, "/api/characters/count").await;
        assert_eq!(body["data"]["count"], 4);

        let (status, body) = get(&app, "/api/characters/search?name=tarek%20ondu").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["characterId"], "3");

        let (status, _) = get(&app, "/api/characters/search?name=nobody").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_top_and_shame() {
        let app = create_test_app().await;
        send(&app, Method::PUT, "/api/characters", Some(json!({"winner": "1", "loser": "2"}))).await;

        let (status, body) = get(&app, "/api/characters/top?gender=female").await;
        assert_eq!(status, StatusCode::OK);
        let top = body["data"].as_array().unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0]["characterId"], "1");

        let (status, _) = get(&app, "/api/characters/top?planet=Luminaire").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = get(&app, "/api/characters/shame?limit=1").await;
        assert_eq!(body["data"][0]["characterId"], "2");
    }

    #[tokio::test]
    async fn test_report_until_deleted() {
        let app = create_test_app().await;
        let report = json!({"characterId": "4"});

        for expected in 1..=4 {
            let (_, body) =
                send(&app, Method::POST, "/api/characters/report", Some(report.clone())).await;
            assert_eq!(body["data"]["status"], "reported");
            assert_eq!(body["data"]["reports"], expected);
        }

        let (_, body) = send(&app, Method::POST, "/api/characters/report", Some(report)).await;
        assert_eq!(body["data"]["status"], "deleted");

        let (status, _) = get(&app, "/api/characters/4").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats_partition() {
        let app = create_test_app().await;
        let (status, body) = get(&app, "/api/stats").await;
        assert_eq!(status, StatusCode::OK);

        let data = &body["data"];
        assert_eq!(data["totalCount"], 4);
        assert_eq!(data["raceCounts"]["Caldari"], 1);
        assert_eq!(data["genderCounts"]["Female"], 2);
        assert_eq!(data["totalVotes"], 0);
    }
}
