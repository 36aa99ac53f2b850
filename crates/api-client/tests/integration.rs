//! End-to-end tests against the live mock API.
//!
//! Starts the mock server on an ephemeral port, then exercises every client
//! operation over real HTTP: authentication enforcement, header forcing,
//! server-applied defaults, error shapes, extension composition, and
//! concurrent calls.

use serde_json::json;
use tokio::net::TcpListener;
use waypost_api_client::{
    ApiError, ApiResult, ClientConfig, CreatePin, PinOperations, UpdatePin, Vector3, WaypostClient,
};
use waypost_mock_api::MockApi;

const KEY: &str = "aaa.bbb.ccc";

async fn spawn_mock() -> (String, MockApi) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let api = MockApi::new(KEY);
    let server = api.clone();
    tokio::spawn(async move { server.serve(listener).await });
    (format!("http://{addr}"), api)
}

fn client(api_url: &str) -> WaypostClient {
    WaypostClient::with_config(ClientConfig::new(api_url, KEY)).unwrap()
}

#[tokio::test]
async fn create_empty_batch_roundtrips_empty_array() {
    let (url, _mock) = spawn_mock().await;
    let created = client(&url).create_pins(&[]).await.unwrap();
    assert!(created.is_empty());
}

#[tokio::test]
async fn create_applies_server_defaults_not_client_defaults() {
    let (url, _mock) = spawn_mock().await;
    let client = client(&url);

    let created = client
        .create_pins(&[CreatePin::new(
            "meta1",
            Vector3::new(1.0, 2.0, 3.0),
            "<b>door</b>",
        )])
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    let pin = &created[0];
    assert!(!pin.id.is_empty());
    assert_eq!(pin.meta_id, "meta1");
    assert_eq!(pin.position, Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(pin.html, "<b>door</b>");
    // Server-side defaults, exactly as the mock supplied them.
    assert_eq!(pin.offset, Vector3::ZERO);
    assert_eq!(pin.opacity, 1.0);
    assert!(!pin.enable_line);
    assert!(!pin.alert);
    assert!(pin.icon.is_none());
    assert!(pin.color.is_none());
}

#[tokio::test]
async fn get_pins_returns_only_the_requested_group() {
    let (url, _mock) = spawn_mock().await;
    let client = client(&url);

    client
        .create_pins(&[
            CreatePin::new("meta1", Vector3::ZERO, "a"),
            CreatePin::new("other", Vector3::ZERO, "b"),
        ])
        .await
        .unwrap();

    let pins = client.get_pins("meta1").await.unwrap();
    assert_eq!(pins.len(), 1);
    assert_eq!(pins[0].meta_id, "meta1");
}

#[tokio::test]
async fn forced_headers_win_over_conflicting_configuration() {
    let (url, mock) = spawn_mock().await;

    // Deliberately hostile configuration: both forced headers overridden.
    let client = WaypostClient::builder(&url, KEY)
        .default_header("Authorization", "Bearer wrong.wrong.wrong")
        .default_header("Content-Type", "text/plain")
        .build()
        .unwrap();

    // The mock rejects anything but exactly one correct Authorization value,
    // and its JSON extractor rejects non-JSON content types.
    let created = client
        .create_pins(&[CreatePin::new("meta1", Vector3::ZERO, "x")])
        .await
        .unwrap();
    assert_eq!(created.len(), 1);

    let log = mock.recorded_authorization().await;
    assert_eq!(log.last().unwrap(), &vec![format!("Bearer {KEY}")]);
}

#[tokio::test]
async fn wrong_key_surfaces_as_unauthorized_api_error() {
    let (url, _mock) = spawn_mock().await;
    let client = WaypostClient::with_config(ClientConfig::new(&url, "x.y.z")).unwrap();

    let err = client.get_pins("meta1").await.unwrap_err();
    match err {
        ApiError::Api { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, json!({"error": "unauthorized"}));
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_metadata_surfaces_status_and_body() {
    let (url, _mock) = spawn_mock().await;

    let err = client(&url).get_metadata("ghost").await.unwrap_err();
    match err {
        ApiError::Api { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, json!({"error": "metadata not found"}));
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn metadata_document_passes_through_unmodified() {
    let (url, mock) = spawn_mock().await;
    let document = json!({
        "site": "warehouse-7",
        "levels": [{"name": "ground", "height": 0.0}, {"name": "mezzanine", "height": 3.4}],
    });
    mock.put_metadata("meta1", document.clone()).await;

    let fetched = client(&url).get_metadata("meta1").await.unwrap();
    assert_eq!(fetched, document);
}

#[tokio::test]
async fn update_applies_partial_changes_and_keeps_the_rest() {
    let (url, _mock) = spawn_mock().await;
    let client = client(&url);

    let created = client
        .create_pins(&[CreatePin::new("meta1", Vector3::new(1.0, 1.0, 1.0), "old")])
        .await
        .unwrap();
    let id = created[0].id.clone();

    let updated = client
        .update_pins(&[UpdatePin::new(&id).with_html("new").with_alert(true)])
        .await
        .unwrap();

    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].id, id);
    assert_eq!(updated[0].html, "new");
    assert!(updated[0].alert);
    assert_eq!(updated[0].position, Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(updated[0].meta_id, "meta1");
}

#[tokio::test]
async fn update_unknown_pin_is_a_not_found_error() {
    let (url, _mock) = spawn_mock().await;

    let err = client(&url)
        .update_pins(&[UpdatePin::new("missing")])
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn delete_reports_how_many_pins_were_removed() {
    let (url, _mock) = spawn_mock().await;
    let client = client(&url);

    let created = client
        .create_pins(&[
            CreatePin::new("meta1", Vector3::ZERO, "a"),
            CreatePin::new("meta1", Vector3::ZERO, "b"),
        ])
        .await
        .unwrap();

    let summary = client
        .delete_pins(&[created[0].id.clone(), "not-a-pin".to_string()])
        .await
        .unwrap();
    assert_eq!(summary.deleted, 1);

    let remaining = client.get_pins("meta1").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, created[1].id);
}

/// Extension capability built on the bound operation set, the way a
/// third-party module would package derived functionality.
struct GroupStats {
    label: String,
    ops: PinOperations,
}

impl GroupStats {
    fn new(label: &str) -> impl FnOnce(PinOperations) -> GroupStats + Send {
        let label = label.to_string();
        move |ops| GroupStats { label, ops }
    }

    async fn count(&self, meta_id: &str) -> ApiResult<usize> {
        Ok(self.ops.get_pins(meta_id).await?.len())
    }
}

#[tokio::test]
async fn extensions_share_the_clients_authenticated_operations() {
    let (url, _mock) = spawn_mock().await;

    let client = WaypostClient::builder(&url, KEY)
        .extension("a", GroupStats::new("a"))
        .extension("b", GroupStats::new("b"))
        .build()
        .unwrap();

    client
        .create_pins(&[CreatePin::new("meta1", Vector3::ZERO, "x")])
        .await
        .unwrap();

    let a = client.extension::<GroupStats>("a").unwrap();
    let b = client.extension::<GroupStats>("b").unwrap();
    assert!(!std::ptr::eq(a, b));
    assert_eq!(a.label, "a");
    assert_eq!(b.label, "b");

    // The extension's call and the client's own call observe the same thing
    // through the same authenticated request path.
    assert_eq!(a.count("meta1").await.unwrap(), 1);
    assert_eq!(b.count("meta1").await.unwrap(), 1);
    assert_eq!(client.get_pins("meta1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_gets_resolve_their_own_responses() {
    let (url, _mock) = spawn_mock().await;
    let client = client(&url);

    client
        .create_pins(&[
            CreatePin::new("alpha", Vector3::ZERO, "a1"),
            CreatePin::new("beta", Vector3::ZERO, "b1"),
            CreatePin::new("beta", Vector3::ZERO, "b2"),
        ])
        .await
        .unwrap();

    let (alpha, beta) = tokio::join!(client.get_pins("alpha"), client.get_pins("beta"));
    let alpha = alpha.unwrap();
    let beta = beta.unwrap();

    assert_eq!(alpha.len(), 1);
    assert!(alpha.iter().all(|p| p.meta_id == "alpha"));
    assert_eq!(beta.len(), 2);
    assert!(beta.iter().all(|p| p.meta_id == "beta"));
}
