use std::sync::{Arc, Mutex};

use pprovider::adapters::openai::{
    OpenAiApiRequest, OpenAiApiResponse, OpenAiProvider, OpenAiTransport,
};
use pprovider::{
    GenerationOptions, Message, ModelProvider, ModelRequest, ProviderError, ProviderErrorKind,
    ProviderFuture, ProviderId, Role, SecretString,
};

#[derive(Debug)]
struct FakeTransport {
    reply_body: &'static str,
    captured_request: Mutex<Option<OpenAiApiRequest>>,
}

impl FakeTransport {
    fn replying(reply_body: &'static str) -> Self {
        Self {
            reply_body,
            captured_request: Mutex::new(None),
        }
    }
}

impl OpenAiTransport for FakeTransport {
    fn complete<'a>(
        &'a self,
        request: OpenAiApiRequest,
        _api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<OpenAiApiResponse, ProviderError>> {
        Box::pin(async move {
            *self.captured_request.lock().expect("request lock") = Some(request);
            Ok(serde_json::from_str(self.reply_body).expect("fake reply should parse"))
        })
    }
}

#[tokio::test]
async fn complete_maps_content_and_usage_mapping_shape() {
    let transport = Arc::new(FakeTransport::replying(
        r#"{
            "model": "gpt-4o-mini",
            "choices": [{"message": {"content": "hello there"}}],
            "usage": {"prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49}
        }"#,
    ));
    let provider = OpenAiProvider::new("sk-test", transport.clone());

    let request = ModelRequest::new("gpt-4o-mini", vec![Message::new(Role::User, "hi")])
        .with_options(GenerationOptions::default().with_temperature(0.2));
    let response = provider.complete(request).await.expect("complete should succeed");

    assert_eq!(response.provider, ProviderId::OpenAi);
    assert_eq!(response.message.content, "hello there");
    let usage = response.usage.expect("usage should be present");
    assert_eq!(usage.prompt_tokens, 42);
    assert_eq!(usage.completion_tokens, 7);

    let sent = transport
        .captured_request
        .lock()
        .expect("request lock")
        .take()
        .expect("request should be captured");
    assert_eq!(sent.temperature, Some(0.2));
    assert_eq!(sent.messages.len(), 1);
}

#[tokio::test]
async fn absent_usage_yields_none() {
    let transport = Arc::new(FakeTransport::replying(
        r#"{"model": "gpt-4o-mini", "choices": [{"message": {"content": "ok"}}]}"#,
    ));
    let provider = OpenAiProvider::new("sk-test", transport);

    let request = ModelRequest::new("gpt-4o-mini", vec![Message::new(Role::User, "hi")]);
    let response = provider.complete(request).await.expect("complete should succeed");
    assert!(response.usage.is_none());
}

#[tokio::test]
async fn missing_choices_is_a_transport_error() {
    let transport = Arc::new(FakeTransport::replying(
        r#"{"model": "gpt-4o-mini", "choices": []}"#,
    ));
    let provider = OpenAiProvider::new("sk-test", transport);

    let request = ModelRequest::new("gpt-4o-mini", vec![Message::new(Role::User, "hi")]);
    let error = provider.complete(request).await.expect_err("complete should fail");
    assert_eq!(error.kind, ProviderErrorKind::Transport);
}
