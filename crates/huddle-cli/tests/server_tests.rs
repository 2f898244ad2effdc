use huddle_cli::{ask, router};
use huddle_core::constants::session::FALLBACK_MESSAGE;
use huddle_core::*;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Mock LLM that answers with the call index, optionally failing every call.
struct MockLlm {
    calls: Arc<Mutex<usize>>,
    fail: bool,
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    async fn chat(&self, _messages: &[Message]) -> Result<LlmResponse, HuddleError> {
        let mut calls = self.calls.lock().unwrap();
        let index = *calls;
        *calls += 1;
        if self.fail {
            return Err(HuddleError::Llm("Claude API error (500)".to_string()));
        }
        Ok(LlmResponse {
            message: Message::assistant(format!("reply {index}")),
            usage: None,
        })
    }
}

async fn spawn_server(fail: bool) -> String {
    let llm = MockLlm {
        calls: Arc::new(Mutex::new(0)),
        fail,
    };
    let orchestrator = SessionOrchestrator::new(Arc::new(RoleRegistry::standard()), Arc::new(llm));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(orchestrator)).await.unwrap();
    });
    format!("http://{addr}")
}

fn decode_all(body: &str) -> Vec<AgentFrame> {
    let mut decoder = FrameDecoder::new();
    decoder
        .push(body.as_bytes())
        .into_iter()
        .map(|f| f.unwrap())
        .collect()
}

// ========================================================================
// POST /api/agents/collaborate
// ========================================================================

#[tokio::test]
async fn test_collaborate_streams_event_frames() {
    let base = spawn_server(false).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/agents/collaborate"))
        .json(&serde_json::json!({ "request": "Build a todo app" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "text/event-stream");
    assert_eq!(response.headers()["cache-control"], "no-cache");

    let body = response.text().await.unwrap();
    assert!(body.starts_with("data: "));
    assert!(body.ends_with("\n\n"));

    let frames = decode_all(&body);
    assert_eq!(frames.len(), 7);
    assert_eq!(frames[0].agent, "Team Leader");
    assert_eq!(frames[0].kind, Some(Category::Analysis));
    assert_eq!(frames[6].agent, "Engineer");
    assert_eq!(frames[6].kind, Some(Category::Implementation));
    for pair in frames.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[tokio::test]
async fn test_collaborate_frames_parse_as_plain_json() {
    let base = spawn_server(false).await;
    let body = reqwest::Client::new()
        .post(format!("{base}/api/agents/collaborate"))
        .json(&serde_json::json!({ "request": "Build a todo app" }))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let frames: Vec<&str> = body.split("\n\n").filter(|f| !f.is_empty()).collect();
    assert_eq!(frames.len(), 7);
    for frame in frames {
        let json: serde_json::Value =
            serde_json::from_str(frame.strip_prefix("data: ").unwrap()).unwrap();
        assert!(json["agent"].is_string());
        assert!(json["message"].is_string());
        assert!(json["timestamp"].is_i64());
        if let Some(kind) = json.get("type") {
            assert!(["analysis", "plan", "implementation", "review"]
                .contains(&kind.as_str().unwrap()));
        }
    }
}

#[tokio::test]
async fn test_collaborate_with_failing_model_still_completes() {
    let base = spawn_server(true).await;
    let body = reqwest::Client::new()
        .post(format!("{base}/api/agents/collaborate"))
        .json(&serde_json::json!({ "request": "Build a todo app" }))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let frames = decode_all(&body);
    assert_eq!(frames.len(), 7);
    assert!(frames.iter().all(|f| f.message == FALLBACK_MESSAGE));
}

#[tokio::test]
async fn test_collaborate_rejects_blank_request() {
    let base = spawn_server(false).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/api/agents/collaborate"))
        .json(&serde_json::json!({ "request": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "request must not be empty");
}

#[tokio::test]
async fn test_collaborate_rejects_missing_field() {
    let base = spawn_server(false).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/api/agents/collaborate"))
        .json(&serde_json::json!({ "prompt": "Build a todo app" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

// ========================================================================
// Roster & health
// ========================================================================

#[tokio::test]
async fn test_roster_lists_team_in_priority_order() {
    let base = spawn_server(false).await;
    let roster: Vec<RosterEntry> = reqwest::get(format!("{base}/api/agents/roster"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let names: Vec<&str> = roster.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Team Leader", "Product Manager", "Architect", "Data Analyst", "Engineer"]
    );
}

#[tokio::test]
async fn test_health() {
    let base = spawn_server(false).await;
    let body: serde_json::Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

// ========================================================================
// Terminal client
// ========================================================================

#[tokio::test]
async fn test_ask_receives_every_frame_in_order() {
    let base = spawn_server(false).await;
    let mut agents = Vec::new();

    let count = ask(&base, "Build a todo app", |frame| agents.push(frame.agent.clone()))
        .await
        .unwrap();

    assert_eq!(count, 7);
    assert_eq!(agents.len(), 7);
    assert_eq!(agents[5], "Team Leader");
}

#[tokio::test]
async fn test_ask_surfaces_server_rejection() {
    let base = spawn_server(false).await;
    let err = ask(&base, "", |_| {}).await.unwrap_err();
    assert!(err.to_string().contains("400"));
}
