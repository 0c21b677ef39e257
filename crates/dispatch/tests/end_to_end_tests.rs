//! Full stack: signed requests over reqwest against a mock container.

use std::collections::BTreeMap;
use std::sync::Arc;

use auth::{ConsumerCredentials, TwoLeggedOAuth};
use dispatch::{Client, ClientConfig};
use opensocial::services::{activities, people, FRIENDS, VIEWER};
use opensocial::{Activity, Person, Provider};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn client(server: &MockServer, rpc: bool) -> Client {
    let mut builder =
        Provider::builder("mock").rest_endpoint(format!("{}/social/rest/", server.uri()));
    if rpc {
        builder = builder.rpc_endpoint(format!("{}/social/rpc/", server.uri()));
    }
    let auth = TwoLeggedOAuth::new(ConsumerCredentials::new("consumerKey", "consumerSecret"))
        .with_requestor_id("03067092798963641994");
    Client::with_reqwest(builder.build().unwrap(), Arc::new(auth), ClientConfig::default())
        .unwrap()
}

#[tokio::test]
async fn rpc_batch_round_trip() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/social/rpc"))
        .and(query_param("oauth_consumer_key", "consumerKey"))
        .and(query_param("xoauth_requestor_id", "03067092798963641994"))
        .and(query_param("oauth_signature_method", "HMAC-SHA1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "viewer", "data": {"id": "1", "name": {"givenName": "A", "familyName": "B"}}},
            {"id": "friends", "data": {
                "list": [{"id": "2", "nickname": "nick"}, {"id": "3"}],
                "totalResults": 2,
                "startIndex": 0
            }}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let requests = BTreeMap::from([
        ("viewer".to_owned(), people::get()),
        ("friends".to_owned(), people::get_group(VIEWER, FRIENDS)),
    ]);
    let results = client(&server, true).send_batch(requests).await.unwrap();

    let viewer = results.get("viewer").unwrap().entry::<Person>().unwrap();
    assert_eq!(viewer.display_name(), "A B");

    let friends = results.get("friends").unwrap();
    assert_eq!(friends.total_results(), Some(2));
    let names: Vec<String> = friends
        .entries::<Person>()
        .iter()
        .map(Person::display_name)
        .collect();
    assert_eq!(names, ["nick", ""]);
}

#[tokio::test]
async fn rest_create_sends_json_body() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/social/rest/activities/@me/@self/@app"))
        .and(query_param("oauth_consumer_key", "consumerKey"))
        .and(body_partial_json(serde_json::json!({"title": "Hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let mut activity = Activity::new();
    activity.set_title("Hello");
    activity.set_body("World");
    let request = activities::create(&activity).unwrap();

    client(&server, false).send(request).await.unwrap();
}

#[tokio::test]
async fn rest_status_error_surfaces_from_reqwest() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid signature"))
        .mount(&server)
        .await;

    let err = client(&server, false).send(people::get()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(401));
}
