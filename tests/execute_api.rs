//! Execution service over a real socket.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use url::Url;

use local_playground::config::ServerConfig;
use local_playground::executor::ExecuteRequest;
use local_playground::fetch::HttpTransport;
use local_playground::lifecycle::Shutdown;
use local_playground::playground::{CodeBlock, ExecutionResponse, PlaygroundController, RunOutcome};
use local_playground::PlaygroundServer;

use common::ScriptedRunner;

/// Serve a runner that prints the submitted edition.
async fn start_server(shutdown: &Shutdown) -> SocketAddr {
    let runner = ScriptedRunner(|request: ExecuteRequest| {
        if request.code.contains("panic!") {
            ExecutionResponse {
                success: false,
                result: "thread 'main' panicked".into(),
                error: "thread 'main' panicked".into(),
            }
        } else {
            ExecutionResponse::success(format!("edition {}\n", request.edition), "")
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = PlaygroundServer::new(&ServerConfig::default(), Arc::new(runner), "Using scripted runner");
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn test_execute_round_trip() {
    let shutdown = Shutdown::new();
    let addr = start_server(&shutdown).await;

    let res = reqwest::Client::new()
        .post(format!("http://{}/execute", addr))
        .header("content-type", "application/json")
        .body(r#"{"version":"stable","optimize":"0","code":"fn main(){}","edition":"2018"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    let body: ExecutionResponse = res.json().await.unwrap();
    assert!(body.success);
    assert_eq!(body.result, "edition 2018\n");

    shutdown.trigger();
}

#[tokio::test]
async fn test_bad_requests_are_rejected() {
    let shutdown = Shutdown::new();
    let addr = start_server(&shutdown).await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/execute", addr);

    let res = client.post(&url).body("not json").send().await.unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "Invalid JSON");

    let res = client.post(&url).body(r#"{"code":""}"#).send().await.unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "Code cannot be empty");

    shutdown.trigger();
}

#[tokio::test]
async fn test_cors_preflight() {
    let shutdown = Shutdown::new();
    let addr = start_server(&shutdown).await;

    let res = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{}/execute", addr))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let methods = res.headers()["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_status_page() {
    let shutdown = Shutdown::new();
    let addr = start_server(&shutdown).await;

    let text = reqwest::get(format!("http://{}/", addr)).await.unwrap().text().await.unwrap();

    assert!(text.starts_with("Local Rust Playground Server\n"));
    assert!(text.contains("Using scripted runner"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_controller_against_server() {
    let shutdown = Shutdown::new();
    let addr = start_server(&shutdown).await;
    let endpoint = Url::parse(&format!("http://{}/execute", addr)).unwrap();
    let controller = PlaygroundController::new(HttpTransport::new(), endpoint);

    let ok = CodeBlock::playground("fn main() {}", ["language-rust", "edition2024"]);
    let panicking = CodeBlock::playground("fn main() { panic!() }", ["language-rust"]);

    assert_eq!(controller.run(&ok).await, RunOutcome::Output("edition 2024\n".into()));
    // A failed execution still carries displayable output.
    assert_eq!(
        controller.run(&panicking).await,
        RunOutcome::Output("thread 'main' panicked".into())
    );

    shutdown.trigger();
}
