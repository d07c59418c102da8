//! Tests for `RemoteDecryptResolver`.

use super::{PropertyResolver, RemoteDecryptResolver, ResolveError};
use crate::http::{HttpClient, HttpError, HttpRequest, HttpResponse, RetryPolicy};
use crate::time::InstantSleeper;
use std::sync::Mutex;
use std::time::Duration;

struct MockClient {
    responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn captured(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        self.responses.lock().unwrap().remove(0)
    }
}

fn respond(status: u16, body: &str) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    ))
}

fn resolver(responses: Vec<Result<HttpResponse, HttpError>>) -> RemoteDecryptResolver<MockClient, InstantSleeper> {
    RemoteDecryptResolver::with_client(
        MockClient::new(responses),
        InstantSleeper,
        url::Url::parse("https://vault.example.com/decrypt").unwrap(),
    )
}

mod passthrough {
    use super::*;

    #[tokio::test]
    async fn unmarked_value_is_unchanged_without_request() {
        let resolver = resolver(vec![]);

        let value = resolver.resolve("db.host", "localhost").await.unwrap();

        assert_eq!(value, "localhost");
        assert_eq!(resolver.client().request_count(), 0);
    }

    #[test]
    fn sensitivity_follows_marker() {
        let resolver = resolver(vec![]);

        assert!(resolver.is_sensitive("db.host", "{cipher}abc"));
        assert!(!resolver.is_sensitive("db.password", "plain"));
    }
}

mod decryption {
    use super::*;

    #[tokio::test]
    async fn posts_stripped_ciphertext_as_text() {
        let resolver = resolver(vec![respond(200, "s3cret")])
            .with_timeout(Duration::from_millis(750));

        let value = resolver.resolve("db.password", "{cipher}ABCDEF").await.unwrap();

        assert_eq!(value, "s3cret");
        let requests = resolver.client().captured();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(requests[0].body.as_deref(), Some(b"ABCDEF".as_slice()));
        assert_eq!(
            requests[0].headers.get(http::header::CONTENT_TYPE).unwrap(),
            "text/plain"
        );
        assert_eq!(requests[0].timeout, Some(Duration::from_millis(750)));
    }

    #[tokio::test]
    async fn invalid_utf8_plaintext_is_rejected() {
        let resolver = resolver(vec![Ok(HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            vec![0xFF_u8, 0xFE],
        ))]);

        let result = resolver.resolve("db.password", "{cipher}x").await;

        assert!(matches!(result, Err(ResolveError::InvalidResponse { .. })));
    }
}

mod retries {
    use super::*;

    #[tokio::test]
    async fn retries_transient_failures() {
        let resolver = resolver(vec![
            Err(HttpError::Timeout),
            respond(503, ""),
            respond(200, "plain"),
        ]);

        let value = resolver.resolve("db.password", "{cipher}x").await.unwrap();

        assert_eq!(value, "plain");
        assert_eq!(resolver.client().request_count(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let resolver = resolver(vec![respond(500, ""), respond(500, "")])
            .with_retry_policy(RetryPolicy::new().with_max_attempts(2));

        let result = resolver.resolve("db.password", "{cipher}x").await;

        assert!(matches!(
            result,
            Err(ResolveError::Status { status, .. }) if status == http::StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert_eq!(resolver.client().request_count(), 2);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let resolver = resolver(vec![respond(400, "bad ciphertext")]);

        let result = resolver.resolve("db.password", "{cipher}x").await;

        assert!(matches!(result, Err(ResolveError::Status { .. })));
        assert_eq!(resolver.client().request_count(), 1);
    }

    #[tokio::test]
    async fn error_message_names_property_not_value() {
        let resolver = resolver(vec![respond(400, "")]);

        let err = resolver.resolve("db.password", "{cipher}TOPSECRET").await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("db.password"));
        assert!(!message.contains("TOPSECRET"));
        assert_eq!(err.property(), "db.password");
    }
}
