use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yutori::api::browsing::BrowsingTaskParams;
use yutori::api::chat::ChatCompletionRequest;
use yutori::api::scouts::{
    CreateScoutParams, ListScoutsParams, ScoutStatus, ScoutUpdatesParams, UpdateScoutParams,
};
use yutori::polling::PollOptions;
use yutori::{AsyncYutoriClient, YutoriClient, YutoriError};

/// Blocking clients must not be used inside a runtime, so the mock server is
/// driven by a side runtime and requests are made from the test thread.
fn mock_server() -> (tokio::runtime::Runtime, MockServer) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn blocking_client(server: &MockServer) -> YutoriClient {
    YutoriClient::builder()
        .api_key("yt-test-key")
        .base_url(format!("{}/v1/", server.uri()))
        .build()
        .unwrap()
}

fn async_client(server: &MockServer) -> AsyncYutoriClient {
    AsyncYutoriClient::builder()
        .api_key("yt-test-key")
        .base_url(format!("{}/v1", server.uri()))
        .build_async()
        .unwrap()
}

fn fast_poll() -> PollOptions {
    PollOptions {
        interval: Duration::from_millis(1),
        timeout: Duration::from_secs(5),
    }
}

#[test]
fn test_get_usage_sends_api_key() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/usage"))
            .and(header("x-api-key", "yt-test-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "api_key_id": "key123",
                "scouts": []
            })))
            .expect(1)
            .mount(&server),
    );

    let usage = blocking_client(&server).get_usage().unwrap();
    assert_eq!(usage["api_key_id"], "key123");
}

#[test]
fn test_status_mapping() {
    let (rt, server) = mock_server();
    rt.block_on(async {
        Mock::given(path("/v1/scouting/tasks/unauthorized"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;
        Mock::given(path("/v1/scouting/tasks/forbidden"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(path("/v1/scouting/tasks/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal server error"))
            .mount(&server)
            .await;
    });

    let client = blocking_client(&server);
    assert!(client.scouts().get("unauthorized").unwrap_err().is_authentication());
    assert!(client.scouts().get("forbidden").unwrap_err().is_authentication());

    match client.scouts().get("broken").unwrap_err() {
        YutoriError::Api {
            status,
            message,
            body,
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal server error");
            assert_eq!(body, "Internal server error");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_scouts_list_query_params() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/scouting/tasks"))
            .and(query_param("limit", "10"))
            .and(query_param("status", "paused"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"scouts": []})))
            .expect(1)
            .mount(&server),
    );

    let result = blocking_client(&server)
        .scouts()
        .list(&ListScoutsParams {
            limit: Some(10),
            status: Some(ScoutStatus::Paused),
        })
        .unwrap();
    assert_eq!(result, json!({"scouts": []}));
}

#[test]
fn test_scouts_create_omits_unset_fields() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/scouting/tasks"))
            .and(body_json(json!({
                "query": "Monitor site",
                "output_interval": 3600,
                "user_timezone": "America/Los_Angeles"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "scout-1"})))
            .expect(1)
            .mount(&server),
    );

    let params = CreateScoutParams::new("Monitor site")
        .output_interval(3600)
        .user_timezone("America/Los_Angeles");
    let scout = blocking_client(&server).scouts().create(&params).unwrap();
    assert_eq!(scout["id"], "scout-1");
}

#[test]
fn test_scouts_update_routes() {
    let (rt, server) = mock_server();
    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/v1/scouting/tasks/scout-1/pause"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "paused"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/v1/scouting/tasks/scout-1"))
            .and(body_json(json!({"query": "new query"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"query": "new query"})))
            .expect(1)
            .mount(&server)
            .await;
    });

    let client = blocking_client(&server);
    let paused = client
        .scouts()
        .update("scout-1", &UpdateScoutParams::status(ScoutStatus::Paused))
        .unwrap();
    assert_eq!(paused["status"], "paused");

    let updated = client
        .scouts()
        .update(
            "scout-1",
            &UpdateScoutParams {
                query: Some("new query".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated["query"], "new query");
}

#[test]
fn test_scouts_delete_empty_body() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("DELETE"))
            .and(path("/v1/scouting/tasks/scout-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server),
    );

    let result = blocking_client(&server).scouts().delete("scout-1").unwrap();
    assert_eq!(result, json!({}));
}

#[test]
fn test_scouts_get_updates() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/scouting/tasks/scout-1/updates"))
            .and(query_param("cursor", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "updates": [{"id": "u1"}],
                "next_cursor": null
            })))
            .expect(1)
            .mount(&server),
    );

    let result = blocking_client(&server)
        .scouts()
        .get_updates(
            "scout-1",
            &ScoutUpdatesParams {
                limit: None,
                cursor: Some("abc".to_string()),
            },
        )
        .unwrap();
    assert_eq!(result["updates"][0]["id"], "u1");
}

#[test]
fn test_chat_uses_bearer_auth() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer yt-test-key"))
            .and(body_json(json!({
                "model": "n1-latest",
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "hi"}}]
            })))
            .expect(1)
            .mount(&server),
    );

    let request = ChatCompletionRequest::new(vec![json!({"role": "user", "content": "hello"})]);
    let response = blocking_client(&server).chat().completions(&request).unwrap();
    assert_eq!(response["choices"][0]["message"]["content"], "hi");
}

#[test]
fn test_browsing_wait_polls_until_terminal() {
    let (rt, server) = mock_server();
    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/v1/browsing/tasks/task-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "running"})))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/browsing/tasks/task-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "succeeded", "result": "done"})),
            )
            .mount(&server)
            .await;
    });

    let task = blocking_client(&server)
        .browsing()
        .wait("task-1", fast_poll())
        .unwrap();
    assert_eq!(task["result"], "done");
}

#[tokio::test]
async fn test_async_browsing_create() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/browsing/tasks"))
        .and(header("x-api-key", "yt-test-key"))
        .and(body_json(json!({
            "task": "Find the pricing page",
            "start_url": "https://example.com",
            "max_steps": 25
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "task-1",
            "status": "queued"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = BrowsingTaskParams::new("Find the pricing page", "https://example.com").max_steps(25);
    let task = async_client(&server).browsing().create(&params).await.unwrap();
    assert_eq!(task["task_id"], "task-1");
}

#[tokio::test]
async fn test_async_error_mapping() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/usage"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(path("/v1/research/tasks/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = async_client(&server);
    assert!(client.get_usage().await.unwrap_err().is_authentication());

    let err = client.research().get("missing").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.to_string(), "404: not found");
}

#[tokio::test]
async fn test_async_research_wait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/research/tasks/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/research/tasks/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "failed"})))
        .mount(&server)
        .await;

    let task = async_client(&server)
        .research()
        .wait("r-1", fast_poll())
        .await
        .unwrap();
    assert_eq!(task["status"], "failed");
}

#[tokio::test]
async fn test_async_scouts_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/scouting/tasks/scout-9"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = async_client(&server).scouts().delete("scout-9").await.unwrap();
    assert_eq!(result, json!({}));
}
