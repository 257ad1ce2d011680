//! The HTTP surface: one webhook route and a health probe.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use creatorflow_telegram::TgUpdate;
use serde_json::json;
use tracing::{error, warn};

use crate::bot::{replies, Ack, Bot};

/// Header Telegram echoes back when the webhook was registered with a secret.
const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<Bot>,
    pub webhook_secret: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook/telegram", post(webhook))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Every delivery Telegram makes is answered 200 so it is never redelivered,
/// whatever happened inside. The one exception is a bad secret, which is not
/// a Telegram delivery at all.
async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    if !state.webhook_secret.is_empty() {
        let presented = headers
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if presented != state.webhook_secret {
            warn!("webhook call with missing or wrong secret");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "invalid secret"})),
            )
                .into_response();
        }
    }

    let update: TgUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("unreadable webhook body: {e}");
            return (StatusCode::OK, Json(json!({"error": "unreadable update"}))).into_response();
        }
    };

    // Keep the chat id around so the user still hears back if handling dies.
    let chat_id = update.message.as_ref().map(|m| m.chat.id);

    match state.bot.handle_update(update).await {
        Ok(Ack::Handled) => (StatusCode::OK, Json(json!({"message": "ok"}))).into_response(),
        Ok(Ack::Ignored) => (StatusCode::OK, Json(json!({"message": "ignored"}))).into_response(),
        Err(e) => {
            error!("update handling failed: {e}");
            if let Some(chat_id) = chat_id {
                state
                    .bot
                    .notify(chat_id, replies::GENERIC_ERROR, false)
                    .await;
            }
            (StatusCode::OK, Json(json!({"error": e.to_string()}))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use creatorflow_core::traits::Messenger;
    use creatorflow_core::CreatorFlowError;
    use creatorflow_store::Store;
    use creatorflow_telegram::BTN_NEW_IDEA;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::{build_router, AppState, SECRET_HEADER};
    use crate::bot::{replies, Bot};

    const CHAT: i64 = 555;

    #[derive(Default)]
    struct SinkMessenger {
        sent: Mutex<Vec<String>>,
    }

    impl SinkMessenger {
        fn last(&self) -> Option<String> {
            self.sent.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl Messenger for SinkMessenger {
        async fn send(
            &self,
            _chat_id: i64,
            text: &str,
            _with_menu: bool,
        ) -> Result<(), CreatorFlowError> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct TestApp {
        app: axum::Router,
        store: Store,
        sink: Arc<SinkMessenger>,
    }

    async fn test_app(secret: &str) -> TestApp {
        let store = Store::in_memory().await.unwrap();
        let sink = Arc::new(SinkMessenger::default());
        let bot = Bot::new(
            store.clone(),
            sink.clone(),
            "https://creatorflow.app".to_string(),
        );
        let app = build_router(AppState {
            bot: Arc::new(bot),
            webhook_secret: secret.to_string(),
        });
        TestApp { app, store, sink }
    }

    struct JsonResponse {
        status: StatusCode,
        body: Value,
    }

    async fn send_json(app: &axum::Router, request: Request<Body>) -> JsonResponse {
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("request should succeed");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body should read");
        let body = serde_json::from_slice::<Value>(&body).unwrap_or_else(|_| json!({}));

        JsonResponse { status, body }
    }

    fn webhook_request(secret: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/webhook/telegram")
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header(SECRET_HEADER, secret);
        }
        builder
            .body(Body::from(body.to_string()))
            .expect("request should build")
    }

    fn update_body(text: &str) -> String {
        json!({
            "update_id": 1,
            "message": {
                "message_id": 1,
                "chat": {"id": CHAT, "type": "private"},
                "text": text,
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let t = test_app("").await;
        let response = send_json(
            &t.app,
            Request::builder()
                .method(Method::GET)
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.get("status").and_then(Value::as_str), Some("ok"));
    }

    #[tokio::test]
    async fn text_update_is_acknowledged() {
        let t = test_app("").await;
        let response = send_json(&t.app, webhook_request(None, &update_body("hello"))).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.get("message").and_then(Value::as_str), Some("ok"));
        assert_eq!(t.sink.last().as_deref(), Some(replies::LINK_PROMPT));
    }

    #[tokio::test]
    async fn non_text_update_is_acknowledged_as_ignored() {
        let t = test_app("").await;
        let body = json!({"update_id": 2}).to_string();
        let response = send_json(&t.app, webhook_request(None, &body)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body.get("message").and_then(Value::as_str),
            Some("ignored")
        );
        assert!(t.sink.last().is_none());
    }

    #[tokio::test]
    async fn malformed_json_still_gets_200() {
        let t = test_app("").await;
        let response = send_json(&t.app, webhook_request(None, "this is not json{")).await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.get("error").is_some());
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let t = test_app("s3cret").await;

        let missing = send_json(&t.app, webhook_request(None, &update_body("hi"))).await;
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

        let wrong = send_json(&t.app, webhook_request(Some("nope"), &update_body("hi"))).await;
        assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
        assert!(t.sink.last().is_none());

        let right = send_json(&t.app, webhook_request(Some("s3cret"), &update_body("hi"))).await;
        assert_eq!(right.status, StatusCode::OK);
        assert_eq!(right.body.get("message").and_then(Value::as_str), Some("ok"));
    }

    #[tokio::test]
    async fn handler_failure_still_acknowledges() {
        let t = test_app("").await;
        sqlx::raw_sql("DROP TABLE profiles")
            .execute(t.store.pool())
            .await
            .unwrap();

        let response = send_json(&t.app, webhook_request(None, &update_body("hello"))).await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.get("error").is_some());
        // The user still gets an apology.
        assert_eq!(t.sink.last().as_deref(), Some(replies::GENERIC_ERROR));
    }

    #[tokio::test]
    async fn idea_flow_over_http() {
        let t = test_app("").await;
        let user_id = t.store.create_user("Lena").await.unwrap();
        let token = t.store.issue_linking_token(&user_id).await.unwrap();

        for text in [
            format!("/start {token}"),
            BTN_NEW_IDEA.to_string(),
            "Behind the scenes reel".to_string(),
            "no".to_string(),
            "skip".to_string(),
        ] {
            let response = send_json(&t.app, webhook_request(None, &update_body(&text))).await;
            assert_eq!(response.status, StatusCode::OK);
            assert_eq!(response.body.get("message").and_then(Value::as_str), Some("ok"));
        }

        let ideas = t.store.ideas_for_user(&user_id).await.unwrap();
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title, "Behind the scenes reel");
        assert_eq!(ideas[0].reference_link, "");
        assert_eq!(ideas[0].description, "");
    }
}
