//! End-to-end checks against the live echo server.
//!
//! # Design
//! Starts the echo server on a random port, sends requests built by
//! `FormClient` over real HTTP using ureq, and compares what the server
//! decoded with what went in.

use echo_server::Pair;
use reqform_core::{Charset, FormClient, HttpMethod, HttpRequest, Items, UploadContent, Value};

/// Start the echo server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            echo_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Execute an `HttpRequest` using ureq and decode the echoed pairs.
fn execute(req: HttpRequest) -> Vec<Pair> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match req.method {
        HttpMethod::Get => {
            let mut builder = agent.get(&req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_slice());
            }
            builder.call()
        }
        HttpMethod::Post => {
            let mut builder = agent.post(&req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_slice());
            }
            builder.send(req.body.as_deref().unwrap_or_default())
        }
    }
    .expect("HTTP transport error");

    assert_eq!(response.status().as_u16(), 200, "unexpected status");
    let body = response.body_mut().read_to_string().unwrap();
    serde_json::from_str(&body).unwrap()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<Pair> {
    expected.iter().map(|(k, v)| Pair::new(*k, *v)).collect()
}

#[test]
fn form_and_query_round_trip() {
    let client = FormClient::new(&start_server(), Charset::utf8());

    let mut items = Items::new();
    items.push("tag", "rust");
    items.push("tag", "http");
    items.push("q", "a b&c=d+e");
    items.push("city", "Zürich");
    items.push("note", Value::Absent);
    items.push("attachment", UploadContent::new("skipped").with_filename("a.txt"));
    let expected = pairs(&[
        ("tag", "rust"),
        ("tag", "http"),
        ("q", "a b&c=d+e"),
        ("city", "Zürich"),
        ("note", ""),
    ]);

    // Step 1: the same items as a POST body.
    let req = client.build_post_form("/form", items.clone());
    assert_eq!(execute(req), expected);

    // Step 2: and as a query string.
    let req = client.build_get("/query", items);
    assert_eq!(execute(req), expected);
}

#[test]
fn cookies_round_trip() {
    let client = FormClient::new(&start_server(), Charset::utf8());

    let req = client
        .build_get("/cookies", Items::new())
        .with_cookies(vec![("session", "abc 123"), ("list", "a,b;c"), ("plain", "x")], client.charset());

    assert_eq!(
        execute(req),
        pairs(&[("session", "abc%20123"), ("list", "a%2Cb%3Bc"), ("plain", "x")])
    );
}

#[test]
fn no_cookies_sends_no_header() {
    let client = FormClient::new(&start_server(), Charset::utf8());

    let req = client.build_get("/cookies", Items::new()).with_cookies(Items::new(), client.charset());

    assert!(execute(req).is_empty());
}
