//! Signing vectors for the stateless schemes.

use auth::{
    ConsumerCredentials, FcAuth, FixedNonceSource, OAuthSigner, SecurityToken, TokenPair,
    TwoLeggedOAuth,
};
use opensocial::{AuthScheme, HttpMessage, HttpMethod, Provider, CONTENT_TYPE};

const URL: &str = "http://example.org/test";
const URL_WITH_QUERY: &str = "http://example.org/test?arg=value";

fn signer() -> OAuthSigner {
    OAuthSigner::new(ConsumerCredentials::new("consumerKey", "consumerSecret"))
        .with_nonce_source(FixedNonceSource::new("123456789", "987654321"))
}

fn access_token() -> TokenPair {
    TokenPair::new("ACCESS_TOKEN", "ACCESS_TOKEN_SECRET")
}

// ── OAuth 1.0a ─────────────────────────────────────────────────────────────

#[test]
fn signs_get_with_access_token() {
    let message = HttpMessage::new(HttpMethod::Get, URL_WITH_QUERY);
    let signed = signer()
        .sign(message, Some(&access_token()), &[], true)
        .unwrap();

    assert_eq!(
        signed.url,
        "http://example.org/test?arg=value\
         &oauth_timestamp=123456789&oauth_nonce=987654321\
         &oauth_token=ACCESS_TOKEN&oauth_consumer_key=consumerKey\
         &oauth_signature_method=HMAC-SHA1&oauth_version=1.0\
         &oauth_signature=uiz7qEAnFsKWTSgfBXppS%2Br%2BmQg%3D"
    );
    assert!(signed.body.is_none());
}

#[test]
fn signs_body_hash_without_touching_body() {
    let body = r#"{a:"test"}"#;
    let message = HttpMessage::new(HttpMethod::Post, URL_WITH_QUERY)
        .with_header(CONTENT_TYPE, "application/json")
        .with_body(Some(body.to_owned()));
    let signed = signer()
        .sign(message, Some(&access_token()), &[], true)
        .unwrap();

    assert_eq!(
        signed.url,
        "http://example.org/test?arg=value\
         &oauth_timestamp=123456789&oauth_nonce=987654321\
         &oauth_body_hash=PkyA2Pf44ldLEq%2BZYMo7g6uH3UE%3D\
         &oauth_token=ACCESS_TOKEN&oauth_consumer_key=consumerKey\
         &oauth_signature_method=HMAC-SHA1&oauth_version=1.0\
         &oauth_signature=zdRixuj4wcLHvY6%2BT8u6%2FWGNuZI%3D"
    );
    assert_eq!(signed.body.as_deref(), Some(body));
    assert_eq!(signed.content_type(), Some("application/json"));
}

#[test]
fn body_hash_can_be_disabled() {
    let message =
        HttpMessage::new(HttpMethod::Post, URL).with_body(Some(r#"{a:"test"}"#.to_owned()));
    let signed = signer()
        .sign(message, Some(&access_token()), &[], false)
        .unwrap();
    assert!(!signed.url.contains("oauth_body_hash"));
}

// ── Two-legged ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn two_legged_omits_token_and_adds_requestor() {
    let scheme = TwoLeggedOAuth::new(ConsumerCredentials::new("consumerKey", "consumerSecret"))
        .with_requestor_id("user 1")
        .with_nonce_source(FixedNonceSource::new("123456789", "987654321"));
    let provider = Provider::orkut();

    let signed = scheme
        .sign(&provider, HttpMessage::new(HttpMethod::Get, URL))
        .await
        .unwrap();

    assert!(signed
        .url
        .starts_with("http://example.org/test?xoauth_requestor_id=user%201&oauth_timestamp="));
    assert!(!signed.url.contains("oauth_token="));
    assert!(signed.url.contains("&oauth_consumer_key=consumerKey&"));
    assert!(signed.url.contains("&oauth_signature="));
}

#[tokio::test]
async fn two_legged_follows_provider_body_hash_setting() {
    let scheme = TwoLeggedOAuth::new(ConsumerCredentials::new("k", "s"));
    let message = HttpMessage::new(HttpMethod::Post, URL).with_body(Some("{}".to_owned()));

    let hashed = scheme.sign(&Provider::orkut(), message.clone()).await.unwrap();
    assert!(hashed.url.contains("oauth_body_hash="));

    let plain = scheme.sign(&Provider::myspace(), message).await.unwrap();
    assert!(!plain.url.contains("oauth_body_hash="));
}

// ── Token parameters ───────────────────────────────────────────────────────

#[tokio::test]
async fn security_token_without_query() {
    let signed = SecurityToken::new("TOKEN")
        .sign(&Provider::orkut(), HttpMessage::new(HttpMethod::Get, URL))
        .await
        .unwrap();
    assert_eq!(signed.url, "http://example.org/test?st=TOKEN");
}

#[tokio::test]
async fn security_token_with_query() {
    let signed = SecurityToken::new("TOKEN")
        .sign(
            &Provider::orkut(),
            HttpMessage::new(HttpMethod::Get, URL_WITH_QUERY),
        )
        .await
        .unwrap();
    assert_eq!(signed.url, "http://example.org/test?arg=value&st=TOKEN");
}

#[tokio::test]
async fn security_token_with_custom_name() {
    let signed = SecurityToken::with_name("TOKEN_NAME", "TOKEN")
        .sign(&Provider::orkut(), HttpMessage::new(HttpMethod::Get, URL))
        .await
        .unwrap();
    assert_eq!(signed.url, "http://example.org/test?TOKEN_NAME=TOKEN");
}

#[tokio::test]
async fn fc_auth_token() {
    let signed = FcAuth::new("TOKEN")
        .sign(&Provider::orkut(), HttpMessage::new(HttpMethod::Get, URL))
        .await
        .unwrap();
    assert_eq!(signed.url, "http://example.org/test?fcauth=TOKEN");
}

#[test]
fn token_debug_output_is_redacted() {
    assert!(!format!("{:?}", SecurityToken::new("abc123")).contains("abc123"));
    assert!(!format!("{:?}", FcAuth::new("secret-cookie")).contains("secret-cookie"));
}
