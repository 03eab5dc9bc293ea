use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `yutori` with an isolated HOME and no ambient credentials or overrides.
fn yutori(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("yutori"));
    cmd.env("HOME", home)
        .env_remove("YUTORI_API_KEY")
        .env_remove("YUTORI_BASE_URL")
        .env_remove("YUTORI_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

fn save_key(home: &Path, key: &str) {
    let dir = home.join(".yutori");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.json"),
        serde_json::to_string(&json!({ "api_key": key })).unwrap(),
    )
    .unwrap();
}

/// Mock API server plus the runtime driving its setup.
fn mock_server() -> (tokio::runtime::Runtime, MockServer) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn api_url(server: &MockServer) -> String {
    format!("{}/v1", server.uri())
}

#[test]
fn test_help_output() {
    let home = TempDir::new().unwrap();
    yutori(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Yutori CLI"))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("scouts"));
}

#[test]
fn test_version_flag_and_command_match() {
    let home = TempDir::new().unwrap();
    let flag = yutori(home.path()).arg("--version").assert().success();
    let flag_out = String::from_utf8_lossy(&flag.get_output().stdout).to_string();

    let cmd = yutori(home.path()).arg("version").assert().success();
    let cmd_out = String::from_utf8_lossy(&cmd.get_output().stdout).to_string();

    assert!(flag_out.starts_with("yutori "));
    assert_eq!(flag_out.trim(), cmd_out.trim());

    let version_part = flag_out.strip_prefix("yutori ").unwrap().trim();
    assert!(
        version_part.chars().next().unwrap().is_numeric(),
        "Version should start with a number: {}",
        version_part
    );
}

#[test]
fn test_unknown_command_is_usage_error() {
    let home = TempDir::new().unwrap();
    yutori(home.path()).arg("frobnicate").assert().code(2);
}

#[test]
fn test_auth_status_unauthenticated() {
    let home = TempDir::new().unwrap();
    yutori(home.path())
        .args(["auth", "status"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Not authenticated."));
}

#[test]
fn test_auth_status_from_env() {
    let home = TempDir::new().unwrap();
    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-env-key-67890")
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Authenticated"))
        .stdout(predicate::str::contains("yt-env...7890"))
        .stdout(predicate::str::contains("YUTORI_API_KEY environment variable"))
        .stdout(predicate::str::contains("yt-env-key-67890").not());
}

#[test]
fn test_auth_status_from_config_file() {
    let home = TempDir::new().unwrap();
    save_key(home.path(), "yt-test-key-12345");

    yutori(home.path())
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("yt-tes...2345"))
        .stdout(predicate::str::contains("config.json"));
}

#[test]
fn test_auth_logout() {
    let home = TempDir::new().unwrap();
    yutori(home.path())
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No credentials found."));

    save_key(home.path(), "yt-test-key-12345");
    yutori(home.path())
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully logged out."));
    assert!(!home.path().join(".yutori/config.json").exists());
}

#[test]
fn test_auth_logout_clears_non_string_key() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".yutori");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.json"), r#"{"api_key": 12345}"#).unwrap();

    yutori(home.path())
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully logged out."));
    assert!(!dir.join("config.json").exists());
}

#[test]
fn test_auth_login_refuses_with_env_key() {
    let home = TempDir::new().unwrap();
    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-env-key-67890")
        .args(["auth", "login"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("takes precedence"));
}

#[test]
fn test_auth_login_refuses_when_key_saved() {
    let home = TempDir::new().unwrap();
    save_key(home.path(), "yt-test-key-12345");
    yutori(home.path())
        .args(["auth", "login"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already authenticated"));
}

#[test]
fn test_auth_register_refuses_existing_credentials() {
    let home = TempDir::new().unwrap();
    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-env-key-67890")
        .args(["auth", "register"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("browser register"));

    save_key(home.path(), "yt-test-key-12345");
    yutori(home.path())
        .args(["auth", "register"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already authenticated"))
        .stderr(predicate::str::contains("re-register"));
}

#[test]
fn test_commands_require_authentication() {
    let home = TempDir::new().unwrap();
    for args in [
        vec!["scouts", "list"],
        vec!["usage"],
        vec!["browse", "get", "task-1"],
        vec!["research", "get", "task-1"],
    ] {
        yutori(home.path())
            .args(&args)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Not authenticated"));
    }
}

#[test]
fn test_scouts_list_table() {
    let home = TempDir::new().unwrap();
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/scouting/tasks"))
            .and(query_param("status", "active"))
            .and(header("x-api-key", "yt-cli-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "scouts": [
                    {"id": "scout-1", "query": "q".repeat(60), "status": "active", "output_interval": 86400},
                    {"id": "scout-2", "query": "Hourly check", "status": "active", "output_interval": 3600}
                ]
            })))
            .mount(&server),
    );

    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args(["scouts", "list", "--status", "active", "--base-url", api_url(&server).as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("scout-1"))
        .stdout(predicate::str::contains(format!("{}...", "q".repeat(47))))
        .stdout(predicate::str::contains("1d"))
        .stdout(predicate::str::contains("1h"));
}

#[test]
fn test_scouts_list_rejects_bad_status() {
    let home = TempDir::new().unwrap();
    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args(["scouts", "list", "--status", "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status: archived"));
}

#[test]
fn test_scouts_get_detail() {
    let home = TempDir::new().unwrap();
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/scouting/tasks/scout-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "scout-1",
                "query": "Track GPU prices",
                "status": "paused",
                "output_interval": 604800,
                "user_timezone": "America/Los_Angeles"
            })))
            .mount(&server),
    );

    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args(["scouts", "get", "scout-1", "--base-url", api_url(&server).as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scout: scout-1"))
        .stdout(predicate::str::contains("Interval: 7 day(s)"))
        .stdout(predicate::str::contains("Timezone: America/Los_Angeles"));
}

#[test]
fn test_scouts_create_hourly() {
    let home = TempDir::new().unwrap();
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/scouting/tasks"))
            .and(body_json(json!({"query": "Track GPU prices", "output_interval": 3600})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "scout-new",
                "query": "Track GPU prices",
                "status": "active"
            })))
            .expect(1)
            .mount(&server),
    );

    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args([
            "scouts",
            "create",
            "-q",
            "Track GPU prices",
            "-i",
            "hourly",
            "--base-url",
            api_url(&server).as_str(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scout created successfully!"))
        .stdout(predicate::str::contains("ID: scout-new"));
}

#[test]
fn test_scouts_create_prompts_for_query() {
    let home = TempDir::new().unwrap();
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/scouting/tasks"))
            .and(body_json(json!({"query": "From stdin", "output_interval": 86400})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "scout-3"})))
            .expect(1)
            .mount(&server),
    );

    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args(["scouts", "create", "--interval", "monthly", "--base-url", api_url(&server).as_str()])
        .write_stdin("From stdin\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("What would you like to monitor?"))
        .stdout(predicate::str::contains("Query: From stdin"));
}

#[test]
fn test_scouts_create_reprompts_on_blank_query() {
    let home = TempDir::new().unwrap();
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/scouting/tasks"))
            .and(body_json(json!({"query": "Second try", "output_interval": 86400})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "scout-4"})))
            .expect(1)
            .mount(&server),
    );

    let assert = yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args(["scouts", "create", "--base-url", api_url(&server).as_str()])
        .write_stdin("\n  \nSecond try\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Query: Second try"));
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(stdout.matches("What would you like to monitor?").count(), 3);
}

#[test]
fn test_scouts_create_blank_query_sends_nothing() {
    let home = TempDir::new().unwrap();
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "scout-empty"})))
            .expect(0)
            .mount(&server),
    );

    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args(["scouts", "create", "--base-url", api_url(&server).as_str()])
        .write_stdin("\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Scout created").not());
}

#[test]
fn test_scouts_delete_cancelled() {
    let home = TempDir::new().unwrap();
    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args(["scouts", "delete", "scout-1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
}

#[test]
fn test_scouts_delete_forced() {
    let home = TempDir::new().unwrap();
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("DELETE"))
            .and(path("/v1/scouting/tasks/scout-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server),
    );

    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args(["scouts", "delete", "scout-1", "--force", "--base-url", api_url(&server).as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scout scout-1 deleted."));
}

#[test]
fn test_usage_limits_table_rows() {
    let home = TempDir::new().unwrap();
    save_key(home.path(), "yt-file-key-000");
    let (rt, server) = mock_server();
    let scouts: Vec<_> = (0..12)
        .map(|i| json!({"id": format!("abcdefgh{:04}", i), "query": "q", "status": "active", "run_count": i}))
        .collect();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/usage"))
            .and(header("x-api-key", "yt-file-key-000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_id": "user-1",
                "api_key_id": "key-1",
                "scouts": scouts
            })))
            .mount(&server),
    );

    yutori(home.path())
        .args(["usage", "--base-url", api_url(&server).as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("User ID: user-1"))
        .stdout(predicate::str::contains("Scouts: 12"))
        .stdout(predicate::str::contains("abcdefgh..."))
        .stdout(predicate::str::contains("... and 2 more"));
}

#[test]
fn test_browse_get_truncates_result() {
    let home = TempDir::new().unwrap();
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/browsing/tasks/task-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "task_id": "task-1",
                "status": "succeeded",
                "start_url": "https://example.com",
                "result": "r".repeat(2500)
            })))
            .mount(&server),
    );

    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args(["browse", "get", "task-1", "--base-url", api_url(&server).as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Browsing Task: task-1"))
        .stdout(predicate::str::contains("Start URL: https://example.com"))
        .stdout(predicate::str::contains("... (truncated)"));
}

#[test]
fn test_research_run_and_wait() {
    let home = TempDir::new().unwrap();
    let settings = home.path().join(".yutori");
    std::fs::create_dir_all(&settings).unwrap();
    std::fs::write(settings.join("settings.toml"), "[polling]\ninterval_secs = 0\n").unwrap();

    let (rt, server) = mock_server();
    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/v1/research/tasks"))
            .and(body_json(json!({"query": "Latest Rust release", "user_timezone": "UTC"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "task_id": "research-1",
                "status": "queued"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/research/tasks/research-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "task_id": "research-1",
                "status": "running"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/research/tasks/research-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "task_id": "research-1",
                "status": "succeeded",
                "result": "Rust 1.90 is out"
            })))
            .mount(&server)
            .await;
    });

    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args([
            "research",
            "run",
            "Latest Rust release",
            "--timezone",
            "UTC",
            "--wait",
            "--base-url",
            api_url(&server).as_str(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Research task created!"))
        .stdout(predicate::str::contains("Status: succeeded"))
        .stdout(predicate::str::contains("Rust 1.90 is out"));
}

#[test]
fn test_api_error_reported() {
    let home = TempDir::new().unwrap();
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/scouting/tasks/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Scout not found"))
            .mount(&server),
    );

    yutori(home.path())
        .env("YUTORI_API_KEY", "yt-cli-key")
        .args(["scouts", "get", "missing", "--base-url", api_url(&server).as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("404: Scout not found"));
}
