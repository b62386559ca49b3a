//! Integration tests using wiremock to simulate the waifu.it API.

use serde_json::json;
use waifu_api::{Client, Error, Fact, Outcome, Quote, Reaction};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn client_for(mock_server: &MockServer) -> Client {
    Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .token(TOKEN)
        .build()
        .unwrap()
}

async fn request_count(mock_server: &MockServer) -> usize {
    mock_server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_missing_token_fails_before_any_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .build()
        .unwrap();
    assert!(!client.has_token());

    assert!(matches!(client.get_fact().await, Err(Error::MissingToken)));
    assert!(matches!(client.get_quote().await, Err(Error::MissingToken)));
    assert!(matches!(client.get_waifu().await, Err(Error::MissingToken)));
    assert!(matches!(client.get_angry().await, Err(Error::MissingToken)));
    assert!(matches!(client.get_hug().await, Err(Error::MissingToken)));
    assert!(matches!(client.get_yes().await, Err(Error::MissingToken)));

    for reaction in Reaction::ALL {
        let err = client.reaction(*reaction).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing authorization token");
    }

    assert_eq!(request_count(&mock_server).await, 0);
}

#[tokio::test]
async fn test_new_without_token() {
    let client = Client::new(None).unwrap();
    assert!(!client.has_token());
    assert_eq!(client.base_url().as_str(), "https://waifu.it/api");

    assert!(matches!(client.get_hug().await, Err(Error::MissingToken)));
}

#[tokio::test]
async fn test_fact_is_reshaped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fact"))
        .and(header("Authorization", TOKEN))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": 7,
            "fact": "cats sleep 70% of their lives"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let outcome = client.get_fact().await.unwrap();

    assert_eq!(
        outcome,
        Outcome::Found(Fact {
            id: 7,
            fact: "cats sleep 70% of their lives".to_string(),
        })
    );
}

#[tokio::test]
async fn test_fact_not_found_is_returned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fact"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "msg": "none" })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let outcome = client.get_fact().await.unwrap();

    let failure = outcome.failure().expect("Expected a described failure");
    assert_eq!(failure.status_code.as_u16(), 404);
    assert_eq!(failure.body, json!({ "msg": "none" }));
    assert_eq!(failure.error, "Could not find any fact");

    assert_eq!(
        serde_json::to_value(failure).unwrap(),
        json!({
            "statusCode": 404,
            "body": { "msg": "none" },
            "error": "Could not find any fact"
        })
    );
}

#[tokio::test]
async fn test_describing_endpoints_error_messages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/quote"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({ "msg": "down" })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/waifu"))
        .respond_with(ResponseTemplate::new(418).set_body_string("I'm a teapot"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    match client.get_quote().await.unwrap() {
        Outcome::Failed(failure) => {
            assert_eq!(failure.status_code.as_u16(), 502);
            assert_eq!(failure.error, "Server down");
        }
        other => panic!("Expected Failed, got {:?}", other),
    }

    match client.get_waifu().await.unwrap() {
        Outcome::Failed(failure) => {
            assert_eq!(failure.status_code.as_u16(), 418);
            assert_eq!(failure.body, json!("I'm a teapot"));
            assert_eq!(failure.error, "Unknown error");
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_200_success_is_still_a_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fact"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": 1, "fact": "x" })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hug"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let outcome = client.get_fact().await.unwrap();
    assert!(!outcome.is_found());
    assert_eq!(outcome.failure().unwrap().error, "Unknown error");

    let err = client.get_hug().await.unwrap_err();
    assert_eq!(err.to_string(), "Server responded with status 204");
}

#[tokio::test]
async fn test_quote_is_reshaped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/quote"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": 1,
            "quote": "Believe it!",
            "anime": "Naruto",
            "author": "Naruto",
            "__v": 0
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let quote = client.get_quote().await.unwrap().found().unwrap();

    assert_eq!(
        quote,
        Quote {
            id: 1,
            quote: "Believe it!".to_string(),
            anime: "Naruto".to_string(),
            author: "Naruto".to_string(),
        }
    );
}

#[tokio::test]
async fn test_waifu_passes_body_through() {
    let mock_server = MockServer::start().await;

    let body = json!({
        "_id": 12,
        "images": ["https://example.com/a.png"],
        "names": { "en": "Rem", "jp": "レム", "alt": null },
        "from": { "name": "Re:Zero", "type": "Anime" },
        "statistics": { "fav": 1, "love": 2, "hate": 0, "upvote": 3, "downvote": 0 }
    });

    Mock::given(method("GET"))
        .and(path("/waifu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.get_waifu().await.unwrap(), Outcome::Found(body));
}

#[tokio::test]
async fn test_reaction_server_error_is_raised() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hug"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.get_hug().await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Status { .. }), "Expected Status error, got {:?}", err);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert!(err.to_string().contains("500"));
    assert_eq!(err.raw_response(), Some("Server error"));
}

#[tokio::test]
async fn test_reaction_body_is_unchanged() {
    let mock_server = MockServer::start().await;

    let body = json!({ "url": "https://example.com/hug.gif" });

    Mock::given(method("GET"))
        .and(path("/hug"))
        .and(header("Authorization", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.get_hug().await.unwrap(), body);
}

#[tokio::test]
async fn test_each_reaction_hits_its_own_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "url": "x" })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    for reaction in Reaction::ALL {
        client.reaction(*reaction).await.unwrap();
    }
    client.get_midfing().await.unwrap();
    client.get_thumbsup().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let paths: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();

    let mut expected: Vec<String> = Reaction::ALL
        .iter()
        .map(|r| format!("/{}", r.path()))
        .collect();
    expected.push("/midfing".to_string());
    expected.push("/thumbsup".to_string());

    assert_eq!(paths, expected);
}

#[tokio::test]
async fn test_concurrent_calls_do_not_interfere() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hug"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "url": "https://example.com/hug.gif" }))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": 3,
            "fact": "fast"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let other = client.clone();

    let (hug, fact) = tokio::join!(client.get_hug(), other.get_fact());

    assert_eq!(hug.unwrap(), json!({ "url": "https://example.com/hug.gif" }));
    assert_eq!(
        fact.unwrap(),
        Outcome::Found(Fact {
            id: 3,
            fact: "fast".to_string(),
        })
    );
    assert_eq!(request_count(&mock_server).await, 2);
}

#[tokio::test]
async fn test_base_url_path_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/wave"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "url": "wave.gif" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(format!("{}/api/v4/", mock_server.uri()))
        .unwrap()
        .token(TOKEN)
        .build()
        .unwrap();

    assert_eq!(client.get_wave().await.unwrap(), json!({ "url": "wave.gif" }));
}

#[tokio::test]
async fn test_transport_failure() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = Client::builder()
        .base_url(uri)
        .unwrap()
        .token(TOKEN)
        .build()
        .unwrap();

    let result = client.get_bonk().await;
    assert!(
        matches!(result, Err(Error::Network(_))),
        "Expected Network error, got {:?}",
        result
    );

    let result = client.get_fact().await;
    assert!(
        matches!(result, Err(Error::Network(_))),
        "Expected Network error, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_invalid_json_on_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("invalid json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.get_pat().await;

    match result {
        Err(Error::DeserializationFailed {
            raw_response,
            serde_error,
            status,
        }) => {
            assert_eq!(status.as_u16(), 200);
            assert_eq!(raw_response, "invalid json");
            assert!(serde_error.contains("expected"));
        }
        _ => panic!("Expected DeserializationFailed, got {:?}", result),
    }
}

#[tokio::test]
async fn test_fact_with_unexpected_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "no id here" })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.get_fact().await;

    match result {
        Err(Error::DeserializationFailed { status, .. }) => {
            assert_eq!(status.as_u16(), 200);
        }
        _ => panic!("Expected DeserializationFailed, got {:?}", result),
    }
}

#[tokio::test]
async fn test_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/smile"))
        .and(header("User-Agent", "test-agent"))
        .and(header("Authorization", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "url": "smile.gif" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .default_header("User-Agent", "test-agent")
        .unwrap()
        .default_header("Authorization", "overridden")
        .unwrap()
        .token(TOKEN)
        .build()
        .unwrap();

    let _ = client.get_smile().await.unwrap();
}

#[tokio::test]
async fn test_invalid_token_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .token("bad\ntoken")
        .build()
        .unwrap();

    let result = client.get_kiss().await;
    assert!(
        matches!(result, Err(Error::ConfigurationError(_))),
        "Expected ConfigurationError, got {:?}",
        result
    );
    assert_eq!(request_count(&mock_server).await, 0);
}

#[test]
fn test_invalid_base_url() {
    assert!(matches!(
        Client::builder().base_url("not a url"),
        Err(Error::InvalidUrl(_))
    ));
    assert!(matches!(
        Client::builder().base_url("mailto:someone@example.com"),
        Err(Error::ConfigurationError(_))
    ));
    assert!(matches!(
        Client::builder().default_header("bad header", "x"),
        Err(Error::ConfigurationError(_))
    ));
}
