//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → client → HTTP requests → typed results

use async_trait::async_trait;
use memberclicks::auth::AccessToken;
use memberclicks::http::{ReqwestTransport, Transport};
use memberclicks::profile::PROFILE_ID;
use memberclicks::{ClassicClient, Client, ClientConfig, Error, ProfileRecord, SearchHandle};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder("demo")
        .base_url(server.uri())
        .client_credentials("client-id", "client-secret")
        .build()
}

fn token_body(token: &str) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "refresh_token": "refresh-1",
        "expires_in": 3600,
        "scope": "read",
        "serviceId": 12,
        "userId": 34,
        "jti": "jti-1"
    })
}

/// Envelope for page `page` of `sizes.len()` pages, ids numbered across pages
fn page_body(sizes: &[usize], page: usize) -> Value {
    let offset: usize = sizes[..page - 1].iter().sum();
    let profiles: Vec<Value> = (0..sizes[page - 1])
        .map(|i| json!({ "[Profile ID]": offset + i + 1, "[Name | First]": format!("P{}", offset + i + 1) }))
        .collect();
    json!({
        "totalCount": sizes.iter().sum::<usize>(),
        "totalPageCount": sizes.len(),
        "pageNumber": page,
        "pageSize": 100,
        "count": sizes[page - 1],
        "firstPageUrl": "/api/v1/profile?pageNumber=1",
        "nextPageUrl": format!("/api/v1/profile?pageNumber={}", page + 1),
        "lastPageUrl": format!("/api/v1/profile?pageNumber={}", sizes.len()),
        "profiles": profiles
    })
}

async fn mount_pages(server: &MockServer, sizes: &[usize]) {
    for page in 1..=sizes.len() {
        Mock::given(method("GET"))
            .and(path("/api/v1/profile"))
            .and(query_param("pageNumber", page.to_string()))
            .and(query_param("pageSize", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(sizes, page)))
            .expect(1)
            .mount(server)
            .await;
    }
}

// ============================================================================
// Token Grant Tests
// ============================================================================

#[tokio::test]
async fn test_auth_then_bearer_requests() {
    let server = MockServer::start().await;

    // base64("client-id:client-secret")
    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .and(header(
            "Authorization",
            "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=",
        ))
        .and(body_string("grant_type=client_credentials&scope=read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-1")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/group"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalCount": 2,
            "groups": [{"name": "Board"}, {"name": "Volunteers"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();
    let token = client.auth().await.unwrap();
    assert_eq!(token.access_token, "tok-1");
    assert_eq!(token.service_id, 12);
    assert_eq!(token.user_id, 34);
    assert!(token.has_refresh_token());
    assert_eq!(client.access_token().await.unwrap().access_token, "tok-1");

    let groups = client.groups().await.unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Board", "Volunteers"]);
}

#[tokio::test]
async fn test_without_token_basic_auth_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/country"))
        .and(header(
            "Authorization",
            "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalCount": 1,
            "countries": [{"name": "Canada"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();
    let countries = client.countries().await.unwrap();
    assert_eq!(countries[0].to_string(), "Canada");
}

#[tokio::test]
async fn test_other_grants_post_their_forms() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .and(body_string(
            "grant_type=password&scope=read&username=ada&password=p%40ss",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("from-password")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .and(body_string("grant_type=refresh_token&refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("from-refresh")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .and(body_string(
            "grant_type=authorization_code&code=c0de&scope=read&state=xyz&redirect_uri=https%3A%2F%2Fapp.example.org%2Fcb",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("from-code")))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();

    let token = client.owner_password("read", "ada", "p@ss").await.unwrap();
    assert_eq!(token.access_token, "from-password");

    let token = client.refresh_token("refresh-1").await.unwrap();
    assert_eq!(token.access_token, "from-refresh");

    let token = client
        .authorization_code("c0de", "read", "xyz", "https://app.example.org/cb")
        .await
        .unwrap();
    assert_eq!(token.access_token, "from-code");
    assert_eq!(client.access_token().await.unwrap().access_token, "from-code");
}

#[tokio::test]
async fn test_failed_grant_keeps_previous_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": 401,
            "error": "Unauthorized",
            "message": "Bad client credentials"
        })))
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();
    client.set_access_token(AccessToken::bearer("existing")).await;

    let err = client.auth().await.unwrap_err();
    assert_eq!(err.to_string(), "Bad client credentials");
    assert!(err.is_unauthorized());
    assert_eq!(client.access_token().await.unwrap().access_token, "existing");
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_me_uses_explicit_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile/me"))
        .and(header("Authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "[Profile ID]": 1002625212,
            "[Member Type]": "Board",
            "[Group]": ["Board", "Volunteers"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();
    let me = client.me("user-token").await.unwrap();
    assert_eq!(me.id(), 1_002_625_212);
    assert_eq!(me.member_type(), "Board");
    assert_eq!(me.groups(), vec!["Board", "Volunteers"]);
}

#[tokio::test]
async fn test_profile_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "[Profile ID]": "77",
            "[Email | Primary]": "ada@example.org"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();
    let profile = client.profile(77).await.unwrap();
    assert_eq!(profile.id(), 77);
    assert_eq!(
        profile.get::<String>("[Email | Primary]").unwrap(),
        "ada@example.org"
    );
    assert_eq!(profile.entity_id(), "77");
}

#[tokio::test]
async fn test_profiles_single_page_of_ten() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .and(query_param("pageNumber", "1"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[10, 10, 5], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();
    let page = client.profiles(1, 10).await.unwrap();
    assert_eq!(page.profiles.len(), 10);
    assert!(page.profiles[0].id() > 0);
    assert_eq!(page.total_page_count, 3);
}

#[tokio::test]
async fn test_profiles_page_size_is_clamped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .and(query_param("pageNumber", "2"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[100, 3], 2)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .and(query_param("pageNumber", "1"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[10, 10], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();
    let page = client.profiles(2, 500).await.unwrap();
    assert_eq!(page.profiles.len(), 3);

    let count = client.profile_page_count(3).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_profiles_aggregate_all_pages() {
    let server = MockServer::start().await;
    mount_pages(&server, &[100, 100, 42]).await;

    let client = Client::new(&config(&server)).unwrap();
    let all = client.profiles(0, 10).await.unwrap();

    assert_eq!(all.profiles.len(), 242);
    assert_eq!(all.total_count, 242);
    assert_eq!(all.total_page_count, 1);
    assert!(all.next_page_url.is_empty());
    assert!(all.last_page_url.is_empty());
    assert_eq!(all.profiles[0].id(), 1);
    assert_eq!(all.profiles[241].id(), 242);
}

#[tokio::test]
async fn test_profiles_aggregate_stops_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[100, 100, 100], 1)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .and(query_param("pageNumber", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[100, 100, 100], 3)))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();
    let err = client.profiles(-1, 100).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    let partial = err.partial_profiles().unwrap();
    assert_eq!(partial.profiles.len(), 100);
    assert_eq!(partial.profiles[99].id(), 100);
    match err {
        Error::PartialAggregation { source, .. } => {
            assert_eq!(source.to_string(), "Service Unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================================
// Saved Search Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_fetch_search() {
    let server = MockServer::start().await;
    let profiles_url = format!("{}/api/v1/profile?searchId=s-1", server.uri());

    Mock::given(method("POST"))
        .and(path("/api/v1/profile/search"))
        .and(header("Content-Type", "application/json"))
        .and(body_string(r#"{"[Member Type]":"Board"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s-1",
            "expireDate": "2017-07-14T03:10:00Z",
            "status": 1,
            "timestamp": 1500000000,
            "url": format!("{}/api/v1/profile/search/s-1", server.uri()),
            "item": {"[Member Type]": "Board"},
            "profilesUrl": profiles_url
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .and(query_param("searchId", "s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[2], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();
    let handle = client
        .create_profile_search(&json!({"[Member Type]": "Board"}))
        .await
        .unwrap();
    assert_eq!(handle.id, "s-1");
    assert!(handle.expires_at().is_some());

    let page = client.fetch_search(&handle).await.unwrap();
    assert_eq!(page.profiles.len(), 2);
}

#[tokio::test]
async fn test_profile_search_aggregates() {
    let server = MockServer::start().await;

    for page in 1..=2 {
        Mock::given(method("GET"))
            .and(path("/api/v1/profile"))
            .and(query_param("searchId", "s 2"))
            .and(query_param("pageSize", "100"))
            .and(query_param("pageNumber", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[100, 7], page)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = Client::new(&config(&server)).unwrap();
    let all = client.profile_search("s 2", 0).await.unwrap();
    assert_eq!(all.profiles.len(), 107);
    assert_eq!(all.total_count, 107);
}

#[tokio::test]
async fn test_expired_search_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .and(query_param("searchId", "old"))
        .respond_with(ResponseTemplate::new(410).set_body_json(json!({
            "status": 410,
            "error": "Gone",
            "message": "Search has expired"
        })))
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();
    let handle = SearchHandle {
        id: "old".to_string(),
        ..SearchHandle::default()
    };
    let err = client.fetch_search(&handle).await.unwrap_err();
    assert_eq!(err.to_string(), "Search has expired");
    assert_eq!(err.status(), Some(410));
}

// ============================================================================
// Resource Tests
// ============================================================================

#[tokio::test]
async fn test_resource_lists() {
    let server = MockServer::start().await;

    let resources = [
        ("/api/v1/event", json!({"totalCount": 1, "events": [{"name": "Gala", "date": "2017-12-12"}]})),
        ("/api/v1/member-type", json!({"totalCount": 1, "memberTypes": [{"name": "Board", "type": "Individual"}]})),
        ("/api/v1/member-status", json!({"totalCount": 2, "memberStatuses": [{"name": "Active"}, {"name": "Lapsed"}]})),
        ("/api/v1/group", json!({"totalCount": 0, "groups": []})),
    ];
    for (endpoint, body) in resources {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = Client::new(&config(&server)).unwrap();

    let events = client.events().await.unwrap();
    assert_eq!(events[0].name, "Gala");

    let types = client.member_types().await.unwrap();
    assert_eq!(types[0].kind, "Individual");

    let statuses = client.member_statuses().await.unwrap();
    let names: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Active", "Lapsed"]);

    assert!(client.groups().await.unwrap().is_empty());
}

// ============================================================================
// Transport and Timeout Tests
// ============================================================================

#[derive(Debug)]
struct CountingTransport {
    inner: ReqwestTransport,
    calls: AtomicUsize,
}

#[async_trait]
impl Transport for CountingTransport {
    async fn execute(&self, request: reqwest::Request) -> memberclicks::Result<reqwest::Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(request).await
    }
}

#[tokio::test]
async fn test_injected_transport_sees_every_page() {
    let server = MockServer::start().await;
    mount_pages(&server, &[100, 100, 1]).await;

    let transport = Arc::new(CountingTransport {
        inner: ReqwestTransport::new("counting/1.0").unwrap(),
        calls: AtomicUsize::new(0),
    });
    let client = Client::with_transport(&config(&server), transport.clone()).unwrap();

    let all = client.profiles(0, 100).await.unwrap();
    assert_eq!(all.profiles.len(), 201);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_timeout_view() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/event"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"totalCount": 0, "events": []}))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let client = Client::new(&config(&server)).unwrap();
    let hurried = client.with_timeout(Duration::from_millis(50));

    assert!(matches!(
        hurried.events().await,
        Err(Error::Timeout { timeout_ms: 50 })
    ));
    assert!(client.events().await.unwrap().is_empty());
}

// ============================================================================
// Classic Tests
// ============================================================================

#[tokio::test]
async fn test_classic_foobar_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_string("401 Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder("foobar")
        .base_url(server.uri())
        .classic("bad-key", "nobody", "wrong")
        .build();

    let err = ClassicClient::connect(&config).await.unwrap_err();
    assert_eq!(err.to_string(), "error: 401 Unauthorized");
}

#[tokio::test]
async fn test_classic_session_then_users() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "1",
            "token": "classic-tok",
            "active": "true"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/user"))
        .and(header("Authorization", "classic-tok"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/xml")
                .set_body_string(
                    "<userList><user><userId>11</userId><attribute><attName>City</attName><attData>Atlanta</attData><attTypeId>30</attTypeId></attribute></user></userList>",
                ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder("foobar")
        .base_url(server.uri())
        .classic("key", "user", "pass")
        .build();
    let client = ClassicClient::connect(&config).await.unwrap();

    let list = client
        .users(std::iter::empty::<(&str, &str)>())
        .await
        .unwrap();
    assert_eq!(list.users[0].id(), 11);
    assert_eq!(list.users[0].get("city"), Some("Atlanta"));
    assert_eq!(list.users[0].attributes[0].att_type_id.to_string(), "City");
}

// ============================================================================
// Live Tenant Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires MEMBERCLICKS_* credentials for a live tenant"]
async fn test_live_profiles_first_page() {
    let client = Client::from_env().unwrap();
    client.auth().await.unwrap();

    let page = client.profiles(1, 10).await.unwrap();
    assert_eq!(page.profiles.len(), 10);
    assert!(page.profiles[0].id() > 0);
    assert!(page.profiles[0].value(PROFILE_ID).is_ok());
}

#[tokio::test]
#[ignore = "requires MEMBERCLICKS_* classic credentials for a live tenant"]
async fn test_live_classic_session() {
    let config = ClientConfig::from_env().unwrap();
    let client = ClassicClient::connect(&config).await.unwrap();
    assert!(client.token().await.is_some());
}
