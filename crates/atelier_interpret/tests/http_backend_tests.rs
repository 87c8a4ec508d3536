//! Integration tests for the HTTP text-generation backend.
//!
//! A throwaway TCP server on localhost plays the model server.

use std::time::Duration;

use atelier_interpret::{Dialect, GenerationRequest, HttpGenerator, LlmError, TextGenerator};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn direct(dialect: Dialect, url: String) -> HttpGenerator {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    HttpGenerator::new(dialect, url).with_client(client)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&data).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

/// Serve one request with `status` and `body`; returns the base URL and a
/// handle yielding the raw request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
        request
    });
    (format!("http://{}", addr), handle)
}

#[tokio::test]
async fn test_ollama_generate() {
    let (url, server) = serve_once("200 OK", r#"{"response": "{\"style\": {}}", "done": true}"#).await;
    let generator = direct(Dialect::Ollama, url);

    let request = GenerationRequest::new("llama3", "make it red").system("be terse");
    let text = generator.generate(&request).await.unwrap();
    assert_eq!(text, r#"{"style": {}}"#);

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /api/generate"));
    assert!(raw.contains(r#""stream":false"#));
}

#[tokio::test]
async fn test_openai_generate_with_key() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"choices": [{"message": {"role": "assistant", "content": "{}"}}]}"#,
    )
    .await;
    let generator = direct(Dialect::OpenAi, url).with_api_key("sk-test");

    let text = generator
        .generate(&GenerationRequest::new("gpt-4o-mini", "hi"))
        .await
        .unwrap();
    assert_eq!(text, "{}");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /v1/chat/completions"));
    assert!(raw.to_lowercase().contains("authorization: bearer sk-test"));
}

#[tokio::test]
async fn test_not_found_maps_to_model_not_found() {
    let (url, _server) = serve_once("404 Not Found", r#"{"error": "model not found"}"#).await;
    let generator = direct(Dialect::Ollama, url);

    let result = generator.generate(&GenerationRequest::new("nope", "hi")).await;
    assert!(matches!(result, Err(LlmError::ModelNotFound(ref m)) if m == "nope"));
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let (url, _server) = serve_once("500 Internal Server Error", "overloaded").await;
    let generator = direct(Dialect::Ollama, url);

    let result = generator.generate(&GenerationRequest::new("llama3", "hi")).await;
    assert!(matches!(result, Err(LlmError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_hung_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(stream);
    });

    let generator = direct(Dialect::Ollama, format!("http://{}", addr));
    let request = GenerationRequest::new("llama3", "hi").timeout(Duration::from_millis(200));
    let result = generator.generate(&request).await;
    assert!(matches!(result, Err(LlmError::Timeout { .. })));
}

#[tokio::test]
async fn test_list_ollama_models() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"models": [{"name": "llama3:latest"}, {"name": "mistral:7b"}]}"#,
    )
    .await;
    let generator = direct(Dialect::Ollama, url);

    let models = generator.list_models().await.unwrap();
    assert_eq!(models, vec!["llama3:latest", "mistral:7b"]);
    assert!(server.await.unwrap().starts_with("GET /api/tags"));
}
