use axum::{
    extract::{Form, Query},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// One decoded key/value pair, as the server understood it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/form", post(echo_form))
        .route("/query", get(echo_query))
        .route("/cookies", get(echo_cookies))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn into_pairs(raw: Vec<(String, String)>) -> Vec<Pair> {
    raw.into_iter().map(|(key, value)| Pair { key, value }).collect()
}

async fn echo_form(Form(raw): Form<Vec<(String, String)>>) -> Json<Vec<Pair>> {
    tracing::info!(pairs = raw.len(), "echo form body");
    Json(into_pairs(raw))
}

async fn echo_query(Query(raw): Query<Vec<(String, String)>>) -> Json<Vec<Pair>> {
    tracing::info!(pairs = raw.len(), "echo query string");
    Json(into_pairs(raw))
}

/// Cookie values are echoed still escaped, exactly as they arrived.
async fn echo_cookies(headers: HeaderMap) -> Result<Json<Vec<Pair>>, StatusCode> {
    let Some(value) = headers.get(header::COOKIE) else {
        return Ok(Json(Vec::new()));
    };
    let value = value.to_str().map_err(|_| StatusCode::BAD_REQUEST)?;
    let pairs = parse_cookie_header(value);
    tracing::info!(pairs = pairs.len(), "echo cookie header");
    Ok(Json(pairs))
}

pub fn parse_cookie_header(value: &str) -> Vec<Pair> {
    value
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((key, value)) => Pair::new(key, value),
            None => Pair::new(token, ""),
        })
        .collect()
}
