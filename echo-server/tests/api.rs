use axum::http::{self, Request, StatusCode};
use echo_server::{app, Pair};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn form_request(body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/form")
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

// --- form ---

#[tokio::test]
async fn form_pairs_are_decoded_in_order() {
    let resp = app().oneshot(form_request("b=2&a=x+y&b=%D0%BC")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let pairs: Vec<Pair> = body_json(resp).await;
    assert_eq!(
        pairs,
        vec![Pair::new("b", "2"), Pair::new("a", "x y"), Pair::new("b", "м")]
    );
}

#[tokio::test]
async fn empty_form_body() {
    let resp = app().oneshot(form_request("")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let pairs: Vec<Pair> = body_json(resp).await;
    assert!(pairs.is_empty());
}

#[tokio::test]
async fn form_without_content_type_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/form")
                .body("a=1".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(!body_bytes(resp).await.is_empty());
}

// --- query ---

#[tokio::test]
async fn query_pairs_are_decoded() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/query?q=a+b&empty=")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let pairs: Vec<Pair> = body_json(resp).await;
    assert_eq!(pairs, vec![Pair::new("q", "a b"), Pair::new("empty", "")]);
}

// --- cookies ---

#[tokio::test]
async fn cookies_are_echoed_escaped() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/cookies")
                .header(http::header::COOKIE, "x=1; y=a%20b%3Bc")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let pairs: Vec<Pair> = body_json(resp).await;
    assert_eq!(pairs, vec![Pair::new("x", "1"), Pair::new("y", "a%20b%3Bc")]);
}

#[tokio::test]
async fn missing_cookie_header_echoes_nothing() {
    let resp = app()
        .oneshot(Request::builder().uri("/cookies").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let pairs: Vec<Pair> = body_json(resp).await;
    assert!(pairs.is_empty());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app()
        .oneshot(Request::builder().uri("/nope").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
