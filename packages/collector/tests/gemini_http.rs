//! Integration tests for the Gemini-backed AI over real HTTP.
//!
//! A tiny local server plays the Gemini endpoint so we can check the wire
//! format, status mapping, and that every call is exactly one request.

#![cfg(feature = "gemini")]

use std::sync::{Arc, Mutex};

use collector::{
    ErrorKind, ExtractionError, Extractor, GeminiAI, GenerationOptions, MemoryCredentialStore,
    Verification, AI,
};
use gemini_client::GeminiClient;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as seen by the stub server.
#[derive(Debug, Clone)]
struct CapturedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Value,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Local HTTP server answering with scripted responses, in order.
///
/// The last response repeats once the script runs out.
struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubServer {
    async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let captured = requests.clone();
        tokio::spawn(async move {
            let mut index = 0usize;
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let (status, body) = responses[index.min(responses.len() - 1)].clone();
                index += 1;
                handle(stream, status, &body, &captured).await;
            }
        });

        Self { base_url, requests }
    }

    fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn ai(&self, key: Option<&str>) -> GeminiAI<MemoryCredentialStore> {
        let credentials = match key {
            Some(key) => MemoryCredentialStore::with_credential(key),
            None => MemoryCredentialStore::new(),
        };
        GeminiAI::new(credentials).with_client(GeminiClient::new().with_base_url(&self.base_url))
    }
}

/// Read one request, record it, then answer.
async fn handle(
    mut stream: TcpStream,
    status: u16,
    body: &str,
    captured: &Mutex<Vec<CapturedRequest>>,
) -> Option<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_bytes = &buf[header_end..(header_end + content_length).min(buf.len())];
    let request_body = serde_json::from_slice(body_bytes).unwrap_or(Value::Null);
    captured.lock().unwrap().push(CapturedRequest {
        request_line,
        headers,
        body: request_body,
    });

    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.ok()?;
    stream.shutdown().await.ok();
    Some(())
}

fn text_response(text: &str) -> (u16, String) {
    let body = json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3, "totalTokenCount": 15}
    });
    (200, body.to_string())
}

fn error_response(status: u16, message: &str) -> (u16, String) {
    let body = json!({"error": {"code": status, "message": message}});
    (status, body.to_string())
}

#[tokio::test]
async fn test_generate_sends_one_well_formed_request() {
    let server = StubServer::start(vec![text_response("[]")]).await;
    let ai = server.ai(Some("AIza-test-key"));

    let text = ai
        .generate("Find names", GenerationOptions::default().with_max_tokens(256))
        .await
        .unwrap();
    assert_eq!(text, "[]");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert!(request
        .request_line
        .starts_with("POST /models/gemini-2.0-flash-exp:generateContent"));
    assert_eq!(request.header("x-goog-api-key"), Some("AIza-test-key"));
    assert_eq!(request.body["contents"][0]["parts"][0]["text"], "Find names");
    assert_eq!(request.body["generationConfig"]["maxOutputTokens"], 256);

    let temperature = request.body["generationConfig"]["temperature"]
        .as_f64()
        .unwrap();
    assert!((temperature - 0.1).abs() < 1e-6);
}

#[tokio::test]
async fn test_rate_limit_keeps_upstream_message() {
    let server =
        StubServer::start(vec![error_response(429, "Resource has been exhausted")]).await;
    let ai = server.ai(Some("AIza-test-key"));

    let err = ai
        .generate("prompt", GenerationOptions::default())
        .await
        .unwrap_err();

    match err {
        ExtractionError::RateLimited { message } => {
            assert_eq!(message, "Resource has been exhausted")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.requests().len(), 1, "no retries");
}

#[tokio::test]
async fn test_forbidden_is_invalid_credential() {
    let server = StubServer::start(vec![error_response(403, "API key not valid")]).await;
    let ai = server.ai(Some("AIza-wrong"));

    let err = ai
        .generate("prompt", GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);
}

#[tokio::test]
async fn test_server_error_with_plain_body() {
    let server = StubServer::start(vec![(503, "backend down".to_string())]).await;
    let ai = server.ai(Some("AIza-test-key"));

    let err = ai
        .generate("prompt", GenerationOptions::default())
        .await
        .unwrap_err();

    match err {
        ExtractionError::UpstreamError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "backend down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_success_without_text_is_malformed() {
    let server = StubServer::start(vec![(200, r#"{"candidates": []}"#.to_string())]).await;
    let ai = server.ai(Some("AIza-test-key"));

    let err = ai
        .generate("prompt", GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_blank_candidate_text_is_malformed() {
    for text in ["", "  \n "] {
        let server = StubServer::start(vec![text_response(text)]).await;
        let ai = server.ai(Some("AIza-test-key"));

        let err = ai
            .generate("prompt", GenerationOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse, "text {text:?}");
    }
}

#[tokio::test]
async fn test_blank_extraction_answer_is_not_malformed_json() {
    let server = StubServer::start(vec![text_response("")]).await;
    let extractor = Extractor::new(server.ai(Some("AIza-test-key")));

    let err = extractor
        .extract_and_verify("Ada and Bob", "names")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = StubServer::start(vec![text_response("[]")]).await;
    let ai = server.ai(None);

    let err = ai
        .generate("prompt", GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let ai = GeminiAI::new(MemoryCredentialStore::with_credential("AIza-test-key"))
        .with_client(GeminiClient::new().with_base_url(format!("http://{}", addr)));

    let err = ai
        .generate("prompt", GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
}

#[tokio::test]
async fn test_pipeline_over_http_falls_back_when_verification_fails() {
    let server = StubServer::start(vec![
        text_response("```json\n[{\"Name\": \"Ada\"}, {\"Name\": \"Bob\"}]\n```"),
        error_response(500, "internal"),
    ])
    .await;
    let extractor = Extractor::new(server.ai(Some("AIza-test-key")));

    let page = "Ada and Bob spoke. ".repeat(1_000);
    let request =
        collector::ExtractionRequest::new(&page, "speaker names", extractor.config()).unwrap();
    let outcome = extractor.run(&request).await.unwrap();

    assert_eq!(
        outcome.verification,
        Verification::FellBack(ErrorKind::UpstreamError)
    );
    assert_eq!(outcome.records.len(), 2);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].body["generationConfig"]["temperature"], 0.0);
}
