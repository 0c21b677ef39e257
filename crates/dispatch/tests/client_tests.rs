//! Client orchestration against an in-memory transport.

mod common;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use auth::{ConsumerCredentials, SecurityToken, ThreeLeggedOAuth};
use common::StubTransport;
use dispatch::{Client, ClientConfig};
use opensocial::services::{app_data, people, profile_comments, FRIENDS, ME, VIEWER};
use opensocial::{
    AuthError, BuildError, ClientError, Comment, CorrelationId, HttpMethod, HttpTransport,
    Notification, Person, Provider, Request, RetryPolicy, TransportError,
};
use serde_json::{json, Value};

const REST: &str = "http://container.test/rest/";
const RPC: &str = "http://container.test/rpc/";
const ANN: &str = r#"{"id":"1","displayName":"Ann"}"#;

fn rest_provider() -> Provider {
    Provider::builder("rest-only")
        .rest_endpoint(REST)
        .build()
        .unwrap()
}

fn client(provider: Provider, transport: &Arc<StubTransport>) -> Client {
    Client::new(
        provider,
        Arc::new(SecurityToken::new("T")),
        Arc::clone(transport) as Arc<dyn HttpTransport>,
    )
}

fn batch(entries: Vec<(&str, Request)>) -> BTreeMap<String, Request> {
    entries
        .into_iter()
        .map(|(key, request)| (key.to_owned(), request))
        .collect()
}

fn body_json(body: Option<&str>) -> Value {
    serde_json::from_str(body.unwrap()).unwrap()
}

// ── Single send: routing ───────────────────────────────────────────────────

#[tokio::test]
async fn rest_send_builds_url_and_parses_entry() {
    let transport = Arc::new(
        StubTransport::new().on("/rest/people/@me/@self", 200, &format!(r#"{{"entry":{ANN}}}"#)),
    );
    let response = client(rest_provider(), &transport)
        .send(people::get_for(ME))
        .await
        .unwrap();

    assert_eq!(response.entry::<Person>().unwrap().display_name(), "Ann");
    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, HttpMethod::Get);
    assert_eq!(sent[0].url, "http://container.test/rest/people/@me/@self?st=T");
    assert!(sent[0].body.is_none());
}

#[tokio::test]
async fn rpc_send_posts_a_one_element_array() {
    let transport = Arc::new(StubTransport::new().on(
        "/rpc",
        200,
        &format!(r#"{{"id":"self","data":{ANN}}}"#),
    ));
    let mut request = people::get();
    request.set_id(CorrelationId::new("self").unwrap());

    let response = client(Provider::shindig(REST, RPC), &transport)
        .send(request)
        .await
        .unwrap();

    assert_eq!(response.entry::<Person>().unwrap().display_name(), "Ann");
    assert_eq!(response.id().map(CorrelationId::as_str), Some("self"));

    let sent = &transport.requests()[0];
    assert_eq!(sent.method, HttpMethod::Post);
    assert_eq!(sent.url, "http://container.test/rpc?st=T");
    assert_eq!(sent.content_type(), Some("application/json"));
    assert_eq!(
        body_json(sent.body.as_deref()),
        json!([{
            "id": "self",
            "method": "people.get",
            "params": {"userId": VIEWER, "groupId": "@self"}
        }])
    );
}

#[tokio::test]
async fn rest_only_request_bypasses_rpc_endpoint() {
    let transport = Arc::new(StubTransport::new().on("/rest/notifications", 200, "{}"));
    let mut notification = Notification::new();
    notification.set_content("hello").unwrap();
    notification.add_recipient("42").unwrap();

    client(Provider::shindig(REST, RPC), &transport)
        .send(opensocial::services::notifications::create(&notification).unwrap())
        .await
        .unwrap();

    let sent = &transport.requests()[0];
    assert_eq!(sent.method, HttpMethod::Post);
    assert!(sent
        .url
        .starts_with("http://container.test/rest/notifications/@me/@self?"));
    assert_eq!(body_json(sent.body.as_deref())["recipientIds"], json!(["42"]));
}

#[tokio::test]
async fn provider_without_rpc_always_uses_rest() {
    let transport = Arc::new(StubTransport::new().on("/rest/people", 200, "[]"));
    let response = client(rest_provider(), &transport)
        .send(people::get())
        .await
        .unwrap();

    assert!(response.objects().is_empty());
    assert!(transport.requests()[0].url.starts_with(REST));
}

#[tokio::test]
async fn rpc_only_provider_rejects_rest_only_request() {
    let transport = Arc::new(StubTransport::new());
    let provider = Provider::builder("rpc-only").rpc_endpoint(RPC).build().unwrap();

    let err = client(provider, &transport)
        .send(profile_comments::retrieve())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Build(BuildError::MissingRpcMethod { .. })
    ));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn pre_request_hook_rewrites_before_rendering() {
    let transport = Arc::new(StubTransport::new().on("/pdata/contacts", 200, r#"{"entry":[]}"#));
    client(Provider::plaxo(), &transport)
        .send(people::get_group("12345", FRIENDS))
        .await
        .unwrap();

    assert_eq!(
        transport.requests()[0].url,
        "http://www.plaxo.com/pdata/contacts/@me/@all/12345?st=T"
    );
}

#[tokio::test]
async fn empty_success_body_is_an_empty_response() {
    let transport = Arc::new(StubTransport::new().on("/rest/appdata", 204, ""));
    let response = client(rest_provider(), &transport)
        .send(app_data::delete(["score"]).unwrap())
        .await
        .unwrap();

    assert!(response.is_success());
    assert!(response.objects().is_empty());
    assert_eq!(transport.requests()[0].method, HttpMethod::Delete);
}

// ── Single send: failures ──────────────────────────────────────────────────

#[tokio::test]
async fn error_body_on_failure_status_is_a_remote_error() {
    let transport = Arc::new(StubTransport::new().on(
        "/rest/people",
        404,
        r#"{"error":{"code":404,"message":"not found"}}"#,
    ));
    let err = client(rest_provider(), &transport)
        .send(people::get())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Remote {
            code: 404,
            message: "not found".into()
        }
    );
    assert_eq!(err.retry_policy(), RetryPolicy::NonRetryable);
}

#[tokio::test]
async fn error_body_without_code_takes_http_status() {
    let transport = Arc::new(StubTransport::new().on(
        "/rest/people",
        400,
        r#"{"error":{"message":"bad selector"}}"#,
    ));
    let err = client(rest_provider(), &transport)
        .send(people::get())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(400));
}

#[tokio::test]
async fn plain_failure_status_is_a_transport_error() {
    let transport = Arc::new(StubTransport::new().on("/rest/people", 503, "down"));
    let err = client(rest_provider(), &transport)
        .send(people::get())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Transport(TransportError::Status {
            status: 503,
            body: "down".into()
        })
    );
    assert_eq!(err.retry_policy(), RetryPolicy::Retryable { after: None });
}

#[tokio::test]
async fn error_entry_in_success_body_is_returned_as_error() {
    let transport = Arc::new(StubTransport::new().on(
        "/rest/people",
        200,
        r#"{"error":{"code":403,"message":"forbidden"}}"#,
    ));
    let err = client(rest_provider(), &transport)
        .send(people::get())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(403));
}

#[tokio::test]
async fn unauthenticated_three_legged_scheme_sends_nothing() {
    let transport = Arc::new(StubTransport::new());
    let auth = ThreeLeggedOAuth::new(
        ConsumerCredentials::new("key", "secret"),
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
    );
    let client = Client::new(
        rest_provider(),
        Arc::new(auth),
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
    );

    let err = client.send(people::get()).await.unwrap_err();

    assert_eq!(err, ClientError::Auth(AuthError::NotAuthenticated));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn unknown_placeholder_fails_before_sending() {
    let transport = Arc::new(StubTransport::new());
    let err = client(rest_provider(), &transport)
        .send(Request::rest("people/{guid}/{nope}", HttpMethod::Get))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Build(BuildError::UnknownPlaceholder { .. })
    ));
    assert!(transport.requests().is_empty());
}

// ── Batch send ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn rpc_batch_keeps_every_key_when_one_fails() {
    let transport = Arc::new(StubTransport::new().on(
        "/rpc",
        200,
        &format!(
            r#"[{{"id":"viewer","data":{ANN}}},
                {{"id":"friends","error":{{"code":500,"message":"boom"}}}}]"#
        ),
    ));
    let results = client(Provider::shindig(REST, RPC), &transport)
        .send_batch(batch(vec![
            ("viewer", people::get()),
            ("friends", people::get_group(VIEWER, FRIENDS)),
        ]))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    let viewer = results.get("viewer").unwrap();
    assert_eq!(viewer.entry::<Person>().unwrap().display_name(), "Ann");
    let friends = results.get("friends").unwrap();
    assert!(!friends.is_success());
    assert_eq!(friends.status_code(), Some(500));
    assert_eq!(results.partial_failure().unwrap().failed.len(), 1);

    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    let body = body_json(sent[0].body.as_deref());
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["friends", "viewer"]);
}

#[tokio::test]
async fn rest_batch_fails_entries_independently() {
    let transport = Arc::new(
        StubTransport::new()
            .on("/@viewer/@self", 200, &format!(r#"{{"entry":{ANN}}}"#))
            .on("/@viewer/@friends", 500, "oops"),
    );
    let results = client(rest_provider(), &transport)
        .send_batch(batch(vec![
            ("viewer", people::get()),
            ("friends", people::get_group(VIEWER, FRIENDS)),
        ]))
        .await
        .unwrap();

    assert!(results.get("viewer").unwrap().is_success());
    let friends = results.get("friends").unwrap();
    assert_eq!(friends.status_code(), Some(500));
    assert_eq!(friends.id().map(CorrelationId::as_str), Some("friends"));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn rest_batch_accepts_empty_success_bodies() {
    let transport = Arc::new(
        StubTransport::new()
            .on("/rest/appdata", 204, "")
            .on("/rest/people", 200, &format!(r#"{{"entry":{ANN}}}"#)),
    );
    let results = client(rest_provider(), &transport)
        .send_batch(batch(vec![
            ("clear", app_data::delete(["score"]).unwrap()),
            ("viewer", people::get()),
        ]))
        .await
        .unwrap();

    assert!(results.partial_failure().is_none());
    let clear = results.get("clear").unwrap();
    assert!(clear.objects().is_empty());
    assert_eq!(clear.id().map(CorrelationId::as_str), Some("clear"));
}

#[tokio::test]
async fn rest_batch_deadline_marks_slow_entries() {
    let transport = Arc::new(
        StubTransport::new()
            .on("/@viewer/@self", 200, &format!(r#"{{"entry":{ANN}}}"#))
            .on_slow("/@viewer/@friends", Duration::from_secs(5), "[]"),
    );
    let config = ClientConfig {
        batch_timeout_ms: Some(200),
        ..ClientConfig::default()
    };
    let results = client(rest_provider(), &transport)
        .with_config(config)
        .send_batch(batch(vec![
            ("viewer", people::get()),
            ("friends", people::get_group(VIEWER, FRIENDS)),
        ]))
        .await
        .unwrap();

    assert!(results.get("viewer").unwrap().is_success());
    let friends = results.get("friends").unwrap();
    assert!(friends.error().unwrap().is_timeout());
}

#[tokio::test]
async fn mixed_batch_splits_rpc_and_rest() {
    let transport = Arc::new(
        StubTransport::new()
            .on("/rpc", 200, &format!(r#"[{{"id":"viewer","data":{ANN}}}]"#))
            .on(
                "/rest/profilecomments",
                200,
                r#"{"entry":[{"commentId":"c1","body":"hi"}]}"#,
            ),
    );
    let results = client(Provider::shindig(REST, RPC), &transport)
        .send_batch(batch(vec![
            ("viewer", people::get()),
            ("comments", profile_comments::retrieve()),
        ]))
        .await
        .unwrap();

    assert!(results.partial_failure().is_none());
    let comments = results.get("comments").unwrap().entries::<Comment>();
    assert_eq!(comments[0].body(), Some("hi"));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn shared_rpc_failure_is_attributed_to_each_key() {
    let transport = Arc::new(
        StubTransport::new().fail_on("/rpc", TransportError::Io("connection reset".into())),
    );
    let results = client(Provider::shindig(REST, RPC), &transport)
        .send_batch(batch(vec![
            ("viewer", people::get()),
            ("friends", people::get_group(VIEWER, FRIENDS)),
        ]))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    for (_, response) in results.iter() {
        assert_eq!(
            response.error(),
            Some(&ClientError::Transport(TransportError::Io(
                "connection reset".into()
            )))
        );
    }
}

#[tokio::test]
async fn build_failures_stay_with_their_key() {
    let transport = Arc::new(StubTransport::new().on("/rest/people", 200, "[]"));
    let results = client(rest_provider(), &transport)
        .send_batch(batch(vec![
            ("broken", Request::rest("people/{nope}", HttpMethod::Get)),
            ("viewer", people::get()),
        ]))
        .await
        .unwrap();

    assert!(results.get("viewer").unwrap().is_success());
    assert!(matches!(
        results.get("broken").unwrap().error(),
        Some(ClientError::Build(BuildError::UnknownPlaceholder { .. }))
    ));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn duplicate_correlation_ids_fail_the_later_key() {
    let transport = Arc::new(StubTransport::new().on("/rest/people", 200, "[]"));
    let mut first = people::get();
    first.set_id(CorrelationId::new("same").unwrap());
    let mut second = people::get_for(ME);
    second.set_id(CorrelationId::new("same").unwrap());

    let results = client(rest_provider(), &transport)
        .send_batch(batch(vec![("a", first), ("b", second)]))
        .await
        .unwrap();

    assert!(results.get("a").unwrap().is_success());
    assert_eq!(
        results.get("b").unwrap().error(),
        Some(&ClientError::Build(BuildError::DuplicateCorrelationId(
            "same".into()
        )))
    );
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let transport = Arc::new(StubTransport::new());
    let err = client(rest_provider(), &transport)
        .send_batch(BTreeMap::new())
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Build(BuildError::EmptyBatch));
}

#[tokio::test]
async fn post_request_hook_sees_every_batch_entry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let provider = Provider::builder("hooked")
        .rest_endpoint(REST)
        .post_request(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();
    let transport = Arc::new(StubTransport::new().on("/rest/people", 200, "[]"));

    client(provider, &transport)
        .send_batch(batch(vec![
            ("viewer", people::get()),
            ("friends", people::get_group(VIEWER, FRIENDS)),
        ]))
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
