use fpl_gameweeks::{
    app,
    config::Config,
    error::AppError,
    fetcher::{SourceDecision, create_http_client, event_live_url, fetch_json},
};
use serde_json::{Value, json};
use tempfile::tempdir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn mock_config(api_base_url: &str, output_dir: &str) -> Config {
    Config {
        api_base_url: api_base_url.to_string(),
        target_season: "2025-26".to_string(),
        output_dir: output_dir.to_string(),
        start_gameweek: 1,
        end_gameweek: 2,
        pacing_ms: 0,
        max_retry_attempts: 1,
        ..Config::default()
    }
}

fn mock_bootstrap_body(season_name: &str) -> Value {
    json!({
        "season_name": season_name,
        "events": [
            {"id": 1, "name": "Gameweek 1", "finished": true},
            {"id": 2, "name": "Gameweek 2", "finished": false}
        ],
        "teams": [
            {"id": 3, "name": "Arsenal", "short_name": "ARS"}
        ],
        "element_types": [
            {"id": 3, "singular_name_short": "MID", "singular_name": "Midfielder"}
        ],
        "elements": [
            {
                "id": 10,
                "web_name": "Saka",
                "first_name": "Bukayo",
                "second_name": "Saka",
                "team": 3,
                "element_type": 3,
                "now_cost": 95,
                "total_points": 120,
                "selected_by_percent": "45.3"
            },
            {
                "id": 11,
                "web_name": "Gabriel",
                "team": 3,
                "element_type": 3
            }
        ]
    })
}

fn mock_event_live_body(gameweek: u32) -> Value {
    json!({
        "event": gameweek,
        "elements": [
            {
                "id": 10,
                "stats": {
                    "minutes": 90,
                    "goals_scored": 1,
                    "total_points": 9,
                    "influence": "55.2",
                    "ict_index": "14.5"
                }
            }
        ]
    })
}

/// A transient server error is retried and the next attempt succeeds.
#[tokio::test]
async fn test_fetch_retries_transient_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/event/1/live/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/event/1/live/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_event_live_body(1)))
        .mount(&mock_server)
        .await;

    let client = create_http_client(5).unwrap();
    let url = event_live_url(&mock_server.uri(), 1);
    let (payload, _body) = fetch_json::<Value>(&client, &url, 2).await.unwrap();

    assert_eq!(payload["event"], 1);
}

/// Every attempt failing surfaces as a retries-exhausted error that records
/// the attempt budget.
#[tokio::test]
async fn test_fetch_exhausts_retry_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/event/1/live/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = create_http_client(5).unwrap();
    let url = event_live_url(&mock_server.uri(), 1);
    let result = fetch_json::<Value>(&client, &url, 2).await;

    assert!(matches!(
        result,
        Err(AppError::RetriesExhausted { attempts: 2, .. })
    ));
}

/// A 404 is not transient, so it must not consume the retry budget.
#[tokio::test]
async fn test_fetch_does_not_retry_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/event/39/live/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_http_client(5).unwrap();
    let url = event_live_url(&mock_server.uri(), 39);
    let result = fetch_json::<Value>(&client, &url, 3).await;

    assert!(matches!(result, Err(AppError::ApiNotFound { .. })));
}

/// Full live-path run: bootstrap reports the target season, both gameweeks
/// are fetched, reconciled, and written as CSVs with raw captures kept.
#[tokio::test]
async fn test_run_live_path_end_to_end() {
    let mock_server = MockServer::start().await;
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("out");

    Mock::given(method("GET"))
        .and(path("/bootstrap-static/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_bootstrap_body("2025/26")))
        .mount(&mock_server)
        .await;
    for gw in 1..=2u32 {
        Mock::given(method("GET"))
            .and(path(format!("/event/{gw}/live/")))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_event_live_body(gw)))
            .mount(&mock_server)
            .await;
    }

    let config = mock_config(&mock_server.uri(), &output_dir.to_string_lossy());
    let summary = app::run(&config, None).await.unwrap();

    assert_eq!(summary.source, SourceDecision::Live);
    assert_eq!(summary.files_written, 2);
    assert!(summary.failed_gameweeks.is_empty());

    let season_dir = output_dir.join("2025-26");
    assert!(season_dir.join("raw/bootstrap-static.json").exists());
    assert!(season_dir.join("raw/event_1_live.json").exists());
    assert!(season_dir.join("csv/gw_1_players.csv").exists());
    assert!(season_dir.join("csv/gw_2_players.csv").exists());

    let csv = std::fs::read_to_string(season_dir.join("csv/gw_1_players.csv")).unwrap();
    let mut lines = csv.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("gw,player_id,player_name"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("1,10,Saka,3,Arsenal,3,MID,95,120,45.3,90,1"));
}

/// One failing gameweek does not stop the rest; it is reported in the summary.
#[tokio::test]
async fn test_run_live_path_isolates_gameweek_failures() {
    let mock_server = MockServer::start().await;
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("out");

    Mock::given(method("GET"))
        .and(path("/bootstrap-static/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_bootstrap_body("2025-26")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/event/1/live/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/event/2/live/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_event_live_body(2)))
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server.uri(), &output_dir.to_string_lossy());
    let summary = app::run(&config, None).await.unwrap();

    assert_eq!(summary.files_written, 1);
    assert_eq!(summary.failed_gameweeks, vec![1]);
    let season_dir = output_dir.join("2025-26");
    assert!(!season_dir.join("csv/gw_1_players.csv").exists());
    assert!(season_dir.join("csv/gw_2_players.csv").exists());
}

/// A season-label mismatch diverts the run to the archive path.
#[tokio::test]
async fn test_run_archive_path_on_season_mismatch() {
    let mock_server = MockServer::start().await;
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("out");

    // The API serves the current season, not the (historical) target
    Mock::given(method("GET"))
        .and(path("/bootstrap-static/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_bootstrap_body("2026/27")))
        .mount(&mock_server)
        .await;

    let archive_root = temp.path().join("archive");
    std::fs::create_dir_all(archive_root.join("data/2025-26/gws")).unwrap();
    std::fs::write(
        archive_root.join("data/2025-26/gws/gw1.csv"),
        "gw,player_id\n1,10\n",
    )
    .unwrap();
    std::fs::write(
        archive_root.join("data/2025-26/gws/gw2.csv"),
        "gw,player_id\n2,10\n",
    )
    .unwrap();

    let config = mock_config(&mock_server.uri(), &output_dir.to_string_lossy());
    let summary = app::run(&config, Some(&archive_root)).await.unwrap();

    assert_eq!(summary.source, SourceDecision::Archive);
    assert_eq!(summary.files_written, 2);
    assert!(
        output_dir
            .join("2025-26")
            .join("csv")
            .join("gw1.csv")
            .exists()
    );
}

/// A failed metadata fetch is tolerated and also diverts to the archive path.
#[tokio::test]
async fn test_run_archive_path_when_bootstrap_unreachable() {
    let mock_server = MockServer::start().await;
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("out");

    Mock::given(method("GET"))
        .and(path("/bootstrap-static/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let archive_root = temp.path().join("archive");
    std::fs::create_dir_all(archive_root.join("2025-26")).unwrap();
    std::fs::write(
        archive_root.join("2025-26/gw_1_players.csv"),
        "gw,player_id\n1,10\n",
    )
    .unwrap();

    let config = mock_config(&mock_server.uri(), &output_dir.to_string_lossy());
    let summary = app::run(&config, Some(&archive_root)).await.unwrap();

    assert_eq!(summary.source, SourceDecision::Archive);
    assert_eq!(summary.files_written, 1);
}

/// An empty archive is a hard failure; there is no further fallback tier.
#[tokio::test]
async fn test_run_fails_when_archive_has_nothing() {
    let mock_server = MockServer::start().await;
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("out");

    Mock::given(method("GET"))
        .and(path("/bootstrap-static/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_bootstrap_body("2026/27")))
        .mount(&mock_server)
        .await;

    let archive_root = temp.path().join("empty_archive");
    std::fs::create_dir_all(&archive_root).unwrap();

    let config = mock_config(&mock_server.uri(), &output_dir.to_string_lossy());
    let result = app::run(&config, Some(&archive_root)).await;

    assert!(matches!(result, Err(AppError::ArchiveNotFound { .. })));
}

/// Pair-shaped stats reconcile identically to flat stats through the full run.
#[tokio::test]
async fn test_run_live_path_with_pair_shaped_stats() {
    let mock_server = MockServer::start().await;
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("out");

    let pair_body = json!({
        "event": 1,
        "elements": [
            {
                "element": 10,
                "stats": [
                    {"identifier": "minutes", "value": 90},
                    {"identifier": "goals_scored", "value": 1},
                    {"name": "total_points", "value": 9}
                ]
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/bootstrap-static/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_bootstrap_body("2025-26")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/event/1/live/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&pair_body))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/event/2/live/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_event_live_body(2)))
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server.uri(), &output_dir.to_string_lossy());
    let summary = app::run(&config, None).await.unwrap();
    assert_eq!(summary.files_written, 2);

    let csv = std::fs::read_to_string(
        output_dir.join("2025-26").join("csv").join("gw_1_players.csv"),
    )
    .unwrap();
    let row = csv.lines().nth(1).unwrap();
    assert!(row.starts_with("1,10,Saka,3,Arsenal,3,MID,95,120,45.3,90,1"));
}

/// Opting into player history captures one element-summary file per player
/// from the metadata; a failing player is tolerated and skipped.
#[tokio::test]
async fn test_run_live_path_fetches_player_histories() {
    let mock_server = MockServer::start().await;
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("out");

    Mock::given(method("GET"))
        .and(path("/bootstrap-static/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_bootstrap_body("2025-26")))
        .mount(&mock_server)
        .await;
    for gw in 1..=2u32 {
        Mock::given(method("GET"))
            .and(path(format!("/event/{gw}/live/")))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_event_live_body(gw)))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/element-summary/10/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "history": [{ "round": 1 }] })),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/element-summary/11/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = Config {
        fetch_player_history: true,
        ..mock_config(&mock_server.uri(), &output_dir.to_string_lossy())
    };
    let summary = app::run(&config, None).await.unwrap();

    // Per-player failures are not gameweek failures
    assert_eq!(summary.files_written, 2);
    assert!(summary.failed_gameweeks.is_empty());

    let raw_dir = output_dir.join("2025-26").join("raw");
    assert!(raw_dir.join("element_10_summary.json").exists());
    assert!(!raw_dir.join("element_11_summary.json").exists());

    let captured = std::fs::read_to_string(raw_dir.join("element_10_summary.json")).unwrap();
    assert!(captured.contains("history"));
}

/// Without the opt-in, no element summaries are requested.
#[tokio::test]
async fn test_player_histories_are_opt_in() {
    let mock_server = MockServer::start().await;
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("out");

    Mock::given(method("GET"))
        .and(path("/bootstrap-static/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_bootstrap_body("2025-26")))
        .mount(&mock_server)
        .await;
    for gw in 1..=2u32 {
        Mock::given(method("GET"))
            .and(path(format!("/event/{gw}/live/")))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_event_live_body(gw)))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/element-summary/10/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "history": [] })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server.uri(), &output_dir.to_string_lossy());
    app::run(&config, None).await.unwrap();

    let raw_dir = output_dir.join("2025-26").join("raw");
    assert!(!raw_dir.join("element_10_summary.json").exists());
}

/// Raw captures are persisted byte for byte as the API sent them.
#[tokio::test]
async fn test_raw_capture_is_verbatim() {
    let mock_server = MockServer::start().await;
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("out");

    let raw_body = r#"{"event":1,"elements":[{"id":10,"stats":{"minutes":90}}]}"#;

    Mock::given(method("GET"))
        .and(path("/bootstrap-static/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_bootstrap_body("2025-26")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/event/1/live/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(raw_body))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/event/2/live/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_event_live_body(2)))
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server.uri(), &output_dir.to_string_lossy());
    app::run(&config, None).await.unwrap();

    let captured = std::fs::read_to_string(
        output_dir.join("2025-26").join("raw").join("event_1_live.json"),
    )
    .unwrap();
    assert_eq!(captured, raw_body);
}
