use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use shared::{
    domain::{FaqTopic, Feedback, ProblemKind},
    protocol::{SupportRequest, FAQ_FEEDBACK_PATH, PROBLEM_PATH},
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    dialog::{ChatAction, DialogNode},
    error::SupportClientError,
    transport::*,
    widget::ChatWidget,
};

#[derive(Clone)]
enum CannedReply {
    Json(StatusCode, Value),
    Text(StatusCode),
    RawJson(&'static str),
}

#[derive(Debug, Clone)]
struct Captured {
    path: String,
    widget_header: Option<String>,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone)]
struct ServerState {
    reply: CannedReply,
    captured: Arc<Mutex<Vec<Captured>>>,
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn capture(
    State(state): State<ServerState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.captured.lock().await.push(Captured {
        path: uri.path().to_string(),
        widget_header: header_text(&headers, "x-support-widget"),
        content_type: header_text(&headers, "content-type"),
        body,
    });

    match state.reply {
        CannedReply::Json(status, value) => (status, Json(value)).into_response(),
        CannedReply::Text(status) => (status, "plain reply").into_response(),
        CannedReply::RawJson(raw) => {
            ([(header::CONTENT_TYPE, "application/json")], raw).into_response()
        }
    }
}

async fn spawn_support_server(reply: CannedReply) -> Result<(String, Arc<Mutex<Vec<Captured>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        reply,
        captured: Arc::clone(&captured),
    };
    let app = Router::new()
        .route(PROBLEM_PATH, post(capture))
        .route(FAQ_FEEDBACK_PATH, post(capture))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), captured))
}

async fn unreachable_server_url() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn problem_report_is_posted_as_marked_form() {
    let (server_url, captured) = spawn_support_server(CannedReply::Json(
        StatusCode::OK,
        json!({"ok": true, "message": "Спасибо, передали разработчикам."}),
    ))
    .await
    .expect("spawn server");
    let transport = HttpSupportTransport::new(&server_url).expect("transport");

    let reply = transport
        .submit(SupportRequest::ReportProblem {
            problem: ProblemKind::VideoNotOpening,
        })
        .await
        .expect("reply");

    assert!(reply.ok);
    assert_eq!(reply.message, "Спасибо, передали разработчикам.");

    let captured = captured.lock().await;
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].path, "/api/support/problem");
    assert_eq!(captured[0].widget_header.as_deref(), Some("1"));
    assert_eq!(
        captured[0].content_type.as_deref(),
        Some("application/x-www-form-urlencoded; charset=UTF-8")
    );
    assert_eq!(captured[0].body, "problem=video_not_opening&source=widget");
}

#[tokio::test]
async fn faq_feedback_is_posted_to_feedback_endpoint() {
    let (server_url, captured) =
        spawn_support_server(CannedReply::Json(StatusCode::OK, json!({"ok": true})))
            .await
            .expect("spawn server");
    let transport = HttpSupportTransport::new(&server_url).expect("transport");

    let reply = transport
        .submit(SupportRequest::FaqFeedback {
            faq: FaqTopic::DeleteAccount,
            feedback: Feedback::Issues,
        })
        .await
        .expect("reply");

    assert_eq!(reply.message, JSON_SENT_FALLBACK);
    let captured = captured.lock().await;
    assert_eq!(captured[0].path, "/api/support/faq_feedback");
    assert_eq!(
        captured[0].body,
        "faq=delete_account&feedback=issues&source=widget"
    );
}

#[tokio::test]
async fn json_failure_without_message_uses_failure_fallback() {
    let (server_url, _captured) = spawn_support_server(CannedReply::Json(
        StatusCode::BAD_REQUEST,
        json!({"ok": false}),
    ))
    .await
    .expect("spawn server");
    let transport = HttpSupportTransport::new(&server_url).expect("transport");

    let reply = transport
        .submit(SupportRequest::ReportProblem {
            problem: ProblemKind::AccountLoginFailed,
        })
        .await
        .expect("reply");

    assert!(!reply.ok);
    assert_eq!(reply.message, JSON_FAILED_FALLBACK);
}

#[tokio::test]
async fn non_json_reply_falls_back_on_status() {
    let (server_url, _captured) =
        spawn_support_server(CannedReply::Text(StatusCode::INTERNAL_SERVER_ERROR))
            .await
            .expect("spawn server");
    let transport = HttpSupportTransport::new(&server_url).expect("transport");

    let reply = transport
        .submit(SupportRequest::ReportProblem {
            problem: ProblemKind::AccountNotCreated,
        })
        .await
        .expect("reply");

    assert!(!reply.ok);
    assert_eq!(reply.message, FAILED_FALLBACK);
}

#[tokio::test]
async fn malformed_json_reply_is_an_error() {
    let (server_url, _captured) = spawn_support_server(CannedReply::RawJson("{not json"))
        .await
        .expect("spawn server");
    let transport = HttpSupportTransport::new(&server_url).expect("transport");

    let err = transport
        .submit(SupportRequest::ReportProblem {
            problem: ProblemKind::VideoNotOpening,
        })
        .await
        .expect_err("must fail");
    assert!(matches!(err, SupportClientError::MalformedReply(_)), "{err}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let transport = HttpSupportTransport::new(&unreachable_server_url().await).expect("transport");

    let err = transport
        .submit(SupportRequest::ReportProblem {
            problem: ProblemKind::VideoNotOpening,
        })
        .await
        .expect_err("must fail");
    assert!(matches!(err, SupportClientError::Transport(_)), "{err}");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = HttpSupportTransport::new("not a url").expect_err("must fail");
    assert!(matches!(err, SupportClientError::InvalidServerUrl { .. }));
}

#[test]
fn endpoint_replaces_base_path() {
    let transport = HttpSupportTransport::new("https://example.test/some/page").expect("transport");
    let url = transport
        .endpoint(&SupportRequest::FaqFeedback {
            faq: FaqTopic::ChangePassword,
            feedback: Feedback::Resolved,
        })
        .expect("endpoint");
    assert_eq!(url.as_str(), "https://example.test/api/support/faq_feedback");
}

#[test]
fn interprets_loosely_typed_json_fields() {
    let reply = interpret_reply(true, "application/json; charset=utf-8", br#"{"ok": 1}"#)
        .expect("reply");
    assert!(reply.ok);
    assert_eq!(reply.message, JSON_SENT_FALLBACK);

    let reply = interpret_reply(true, "application/json", br#"{"ok": "", "message": ""}"#)
        .expect("reply");
    assert!(!reply.ok);
    assert_eq!(reply.message, JSON_FAILED_FALLBACK);

    let reply = interpret_reply(
        false,
        "application/json",
        r#"{"ok": false, "message": "Занято"}"#.as_bytes(),
    )
        .expect("reply");
    assert_eq!(reply.message, "Занято");
}

#[test]
fn non_json_success_uses_sent_fallback() {
    let reply = interpret_reply(true, "text/html", b"<p>ok</p>").expect("reply");
    assert!(reply.ok);
    assert_eq!(reply.message, SENT_FALLBACK);
}

#[tokio::test]
async fn widget_problem_report_posts_once_and_returns_to_root() {
    let (server_url, captured) = spawn_support_server(CannedReply::Json(
        StatusCode::OK,
        json!({"ok": true, "message": "Принято."}),
    ))
    .await
    .expect("spawn server");
    let transport = HttpSupportTransport::new(&server_url).expect("transport");

    let mut widget = ChatWidget::new();
    widget.open();
    widget
        .run(ChatAction::OpenProblems, &transport)
        .await
        .expect("open problems");
    let reply = widget
        .run(
            ChatAction::ReportProblem(ProblemKind::TutorialNotOpening),
            &transport,
        )
        .await
        .expect("report")
        .expect("leaf reply");

    assert_eq!(reply.message, "Принято.");
    assert_eq!(widget.node(), DialogNode::Root);
    assert_eq!(
        widget.messages().last().map(|message| message.text.as_str()),
        Some("Принято.")
    );

    let captured = captured.lock().await;
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].path, "/api/support/problem");
    assert_eq!(captured[0].body, "problem=tutorial_not_opening&source=widget");
}

#[tokio::test]
async fn widget_faq_feedback_network_failure_shows_connectivity_message() {
    let transport = HttpSupportTransport::new(&unreachable_server_url().await).expect("transport");

    let mut widget = ChatWidget::new();
    widget.open();
    widget
        .run(ChatAction::OpenFaq, &transport)
        .await
        .expect("open faq");
    widget
        .run(ChatAction::OpenFaqAnswer(FaqTopic::ChangePassword), &transport)
        .await
        .expect("open answer");
    let reply = widget
        .run(
            ChatAction::SendFaqFeedback(FaqTopic::ChangePassword, Feedback::Resolved),
            &transport,
        )
        .await
        .expect("feedback")
        .expect("leaf reply");

    assert!(!reply.ok);
    assert_eq!(reply.message, CONNECTIVITY_MESSAGE);
    assert_eq!(widget.node(), DialogNode::Root);
    assert!(!widget.is_busy());
    assert!(widget.actions().iter().all(|view| !view.disabled));
}
