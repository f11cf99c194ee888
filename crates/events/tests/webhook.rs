//! Webhook delivery against a local HTTP endpoint.

use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use postforge_events::{CampaignEvent, CampaignNotifier, NotificationError, WebhookNotifier};
use tokio::sync::mpsc;

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn delivers_the_event_envelope() {
    let (tx, mut rx) = mpsc::unbounded_channel::<serde_json::Value>();
    let router = Router::new()
        .route(
            "/hook",
            post(
                |State(tx): State<mpsc::UnboundedSender<serde_json::Value>>,
                 Json(body): Json<serde_json::Value>| async move {
                    tx.send(body).unwrap();
                    StatusCode::OK
                },
            ),
        )
        .with_state(tx);
    let base = serve(router).await;

    let notifier = WebhookNotifier::new(format!("{base}/hook")).unwrap();
    let event = CampaignEvent::created(7, &serde_json::json!({"title": "Launch"})).unwrap();
    notifier.notify(&event).await.unwrap();

    let received = rx.recv().await.unwrap();
    assert_eq!(received["campaignId"], 7);
    assert_eq!(received["action"], "campaign.created");
    assert_eq!(received["data"]["title"], "Launch");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let router = Router::new().route("/hook", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let base = serve(router).await;

    let notifier = WebhookNotifier::new(format!("{base}/hook")).unwrap();
    let event = CampaignEvent::created(1, &serde_json::json!({})).unwrap();

    assert_matches!(
        notifier.notify(&event).await,
        Err(NotificationError::HttpStatus(500))
    );
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let router = Router::new().route(
        "/hook",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK
        }),
    );
    let base = serve(router).await;

    let notifier =
        WebhookNotifier::with_timeout(format!("{base}/hook"), Duration::from_millis(100)).unwrap();
    let event = CampaignEvent::created(1, &serde_json::json!({})).unwrap();

    assert_matches!(
        notifier.notify(&event).await,
        Err(NotificationError::Request(e)) if e.is_timeout()
    );
}
