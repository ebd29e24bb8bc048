use crate::{
    config::Config,
    constants::SYSTEM_INSTRUCTION,
    errors::{EmeraudeError, EmeraudeResult},
    logging::log_api_call,
    models::ApiCallLog,
};
use async_stream::{stream, try_stream};
use chrono::Utc;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use std::{fmt, pin::Pin, time::Instant};

/// Text chunks of a reply, in arrival order.
pub type ChunkStream = Pin<Box<dyn Stream<Item = EmeraudeResult<String>> + Send>>;

/// Something that answers a question about what is on screen, one chunk
/// at a time.
pub trait AssistantService: Send + Sync {
    fn stream_response(&self, screen_context: &str, query: &str) -> ChunkStream;
}

/// Streams replies from Gemini's `streamGenerateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    fn url(&self) -> String {
        format!("{}/{}?alt=sse", self.base_url, self.endpoint())
    }

    fn endpoint(&self) -> String {
        format!("models/{}:streamGenerateContent", self.model)
    }

    fn request_body(&self, screen_context: &str, query: &str) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "contents": [{
                "role": "user",
                "parts": [{
                    "text": format!("Screen context: {}\n\nUser question: {}", screen_context, query)
                }]
            }],
            "generationConfig": { "temperature": self.temperature }
        })
    }
}

impl AssistantService for GeminiClient {
    fn stream_response(&self, screen_context: &str, query: &str) -> ChunkStream {
        let request = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(screen_context, query));

        Box::pin(gemini_chunks(request, self.endpoint()))
    }
}

/// Streams the reply text of one call. The call is logged exactly once,
/// before an error is handed on or after the last chunk.
fn gemini_chunks(
    request: RequestBuilder,
    endpoint: String,
) -> impl Stream<Item = EmeraudeResult<String>> {
    stream! {
        let started = Instant::now();
        let mut call_log = ApiCallLog {
            timestamp: Utc::now(),
            endpoint,
            request_summary: "stream_response".to_string(),
            response_status: 0,
            response_time_ms: 0,
            chunks: 0,
        };
        debug!("Sending request to {}", call_log.endpoint);

        let response = match checked_response(request, &mut call_log).await {
            Ok(response) => response,
            Err(e) => {
                finish_call(&mut call_log, started);
                yield Err(e);
                return;
            }
        };

        let mut chunks = Box::pin(reply_chunks(response));
        while let Some(item) = chunks.next().await {
            match item {
                Ok(text) => {
                    call_log.chunks += 1;
                    yield Ok(text);
                }
                Err(e) => {
                    finish_call(&mut call_log, started);
                    yield Err(e);
                    return;
                }
            }
        }

        finish_call(&mut call_log, started);
    }
}

async fn checked_response(
    request: RequestBuilder,
    call_log: &mut ApiCallLog,
) -> EmeraudeResult<Response> {
    let response = request.send().await?;
    let status = response.status();
    call_log.response_status = status.as_u16();

    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(EmeraudeError::api_error(format!("{} - {}", status, error_text)))
}

fn reply_chunks(response: Response) -> impl Stream<Item = EmeraudeResult<String>> {
    try_stream! {
        let mut events = Box::pin(response.bytes_stream()).eventsource();
        while let Some(event) = events.next().await {
            let event = event?;
            if event.data.trim().is_empty() {
                continue;
            }
            if let Some(text) = extract_text(&event.data)? {
                yield text;
            }
        }
    }
}

fn finish_call(call_log: &mut ApiCallLog, started: Instant) {
    call_log.response_time_ms = started.elapsed().as_millis();
    log_api_call(call_log);
}

/// Pulls the reply text out of one streamed `GenerateContentResponse`.
pub fn extract_text(payload: &str) -> EmeraudeResult<Option<String>> {
    let body: Value = serde_json::from_str(payload)?;

    if let Some(error) = body.get("error") {
        return Err(EmeraudeError::api_error(format!(
            "{}: {}",
            error["status"].as_str().unwrap_or("unknown"),
            error["message"].as_str().unwrap_or("no message")
        )));
    }

    let Some(parts) = body["candidates"][0]["content"]["parts"].as_array() else {
        if let Some(reason) = body["promptFeedback"]["blockReason"].as_str() {
            warn!("Prompt blocked by the model: {}", reason);
            return Err(EmeraudeError::api_error(format!("prompt blocked: {}", reason)));
        }
        return Ok(None);
    };

    let text: String = parts
        .iter()
        .filter(|part| !part["thought"].as_bool().unwrap_or(false))
        .filter_map(|part| part["text"].as_str())
        .collect();

    Ok(if text.is_empty() { None } else { Some(text) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };
    use std::sync::{Mutex, Once};

    /// Keeps the API call lines written through `log`.
    struct CallCapture;

    static CALL_LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static CAPTURE: CallCapture = CallCapture;
    static INSTALL: Once = Once::new();

    impl log::Log for CallCapture {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.target() == "emeraude::api"
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                CALL_LINES.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    /// Logged call lines whose endpoint names `model`.
    fn call_lines_for(model: &str) -> Vec<String> {
        CALL_LINES
            .lock()
            .unwrap()
            .iter()
            .filter(|line| line.contains(&format!("models/{}:", model)))
            .cloned()
            .collect()
    }

    fn capture_calls() {
        INSTALL.call_once(|| {
            log::set_logger(&CAPTURE).unwrap();
            log::set_max_level(log::LevelFilter::Info);
        });
    }

    fn test_client(base_url: &str) -> GeminiClient {
        client_for(base_url, "gemini-test")
    }

    fn client_for(base_url: &str, model: &str) -> GeminiClient {
        let config = Config {
            api_key: "test-api-key".to_string(),
            model: model.to_string(),
            base_url: base_url.to_string(),
            ..Config::default()
        };
        GeminiClient::new(&config)
    }

    fn sse_event(text: &str) -> String {
        let payload = json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        });
        format!("data: {}\r\n\r\n", payload)
    }

    async fn collect(client: &GeminiClient) -> Vec<EmeraudeResult<String>> {
        client
            .stream_response("The user is currently in the 'Desktop' app.", "What is this?")
            .collect()
            .await
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"<p>a"},{"text":"b</p>"}]}}]}"#;
        assert_eq!(extract_text(payload).unwrap(), Some("<p>ab</p>".to_string()));
    }

    #[test]
    fn test_extract_text_skips_thoughts_and_empty_payloads() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"thinking","thought":true}]}}]}"#;
        assert_eq!(extract_text(payload).unwrap(), None);
        assert_eq!(
            extract_text(r#"{"usageMetadata":{"totalTokenCount":3}}"#).unwrap(),
            None
        );
    }

    #[test]
    fn test_extract_text_reports_errors() {
        let payload = r#"{"error":{"code":429,"message":"quota","status":"RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(
            extract_text(payload),
            Err(EmeraudeError::Api(msg)) if msg == "RESOURCE_EXHAUSTED: quota"
        ));

        let blocked = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert!(extract_text(blocked).is_err());
        assert!(matches!(extract_text("not json"), Err(EmeraudeError::Json(_))));
    }

    #[tokio::test]
    async fn test_stream_response_yields_chunks_in_order() {
        let mock_server = MockServer::start().await;
        let body = format!("{}{}", sse_event("<p>Hello"), sse_event(" there!</p>"));

        Mock::given(method("POST"))
            .and(path("/models/gemini-test:streamGenerateContent"))
            .and(query_param("alt", "sse"))
            .and(header("x-goog-api-key", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let chunks: Vec<String> = collect(&client)
            .await
            .into_iter()
            .collect::<EmeraudeResult<_>>()
            .unwrap();

        assert_eq!(chunks, vec!["<p>Hello", " there!</p>"]);
    }

    #[tokio::test]
    async fn test_request_carries_context_and_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(sse_event("ok"), "text/event-stream"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        collect(&client).await;

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("The user is currently in the 'Desktop' app."));
        assert!(text.ends_with("User question: What is this?"));
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"].as_str(),
            Some(SYSTEM_INSTRUCTION)
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_api_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let items = collect(&client).await;

        assert_eq!(items.len(), 1);
        assert!(matches!(
            &items[0],
            Err(EmeraudeError::Api(msg)) if msg.contains("400") && msg.contains("API key not valid")
        ));
    }

    #[tokio::test]
    async fn test_error_mid_stream_ends_the_stream() {
        let mock_server = MockServer::start().await;
        let body = format!(
            "{}data: {}\n\n{}",
            sse_event("<p>partial"),
            json!({ "error": { "code": 500, "message": "boom", "status": "INTERNAL" } }),
            sse_event("never")
        );
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let items = collect(&client).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "<p>partial");
        assert!(matches!(&items[1], Err(EmeraudeError::Api(msg)) if msg == "INTERNAL: boom"));
    }

    #[tokio::test]
    async fn test_failed_calls_are_still_logged() {
        capture_calls();
        let mock_server = MockServer::start().await;
        let body = format!(
            "{}data: {}\n\n",
            sse_event("<p>partial"),
            json!({ "error": { "code": 500, "message": "boom", "status": "INTERNAL" } })
        );
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri(), "gemini-mid-stream-failure");
        let mut stream = client.stream_response("context", "question");
        assert_eq!(stream.next().await.unwrap().unwrap(), "<p>partial");
        assert!(stream.next().await.unwrap().is_err());

        let lines = call_lines_for("gemini-mid-stream-failure");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Status: 200"));
        assert!(lines[0].contains("Chunks: 1"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_logged_without_status() {
        capture_calls();
        let client = client_for("http://127.0.0.1:1", "gemini-unreachable");
        let items = collect(&client).await;

        assert_eq!(items.len(), 1);
        assert!(matches!(&items[0], Err(EmeraudeError::Http(_))));

        let lines = call_lines_for("gemini-unreachable");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Status: 0"));
        assert!(lines[0].contains("Chunks: 0"));
    }

    #[tokio::test]
    async fn test_completed_call_is_logged_once() {
        capture_calls();
        let mock_server = MockServer::start().await;
        let body = format!("{}{}", sse_event("<p>a"), sse_event("b</p>"));
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri(), "gemini-completed");
        let items = collect(&client).await;
        assert_eq!(items.len(), 2);

        let lines = call_lines_for("gemini-completed");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Status: 200"));
        assert!(lines[0].contains("Chunks: 2"));
    }
}
