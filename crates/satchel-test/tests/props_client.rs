//! Driving bound props handlers through the in-memory client.

use http::StatusCode;
use satchel_core::{generate_handler, unauthorized, BasicResponder, BindConfig, RequestContext};
use satchel_macros::Props;
use satchel_test::TestClient;
use std::io::Write;

#[derive(Debug, Clone, Default, Props)]
struct SearchProps {
    #[param("q")]
    term: String,
    #[param("limit")]
    limit: u8,
}

fn search(mut ctx: RequestContext<'_>, props: SearchProps) {
    if let Some(writer) = ctx.writer() {
        let _ = write!(writer, "{}x{}", props.term, props.limit);
    }
}

fn guarded(props: SearchProps) -> BasicResponder {
    if props.term == "secret" {
        unauthorized("not allowed")
    } else {
        satchel_core::ok().with_body(props.term)
    }
}

#[test]
fn query_values_reach_the_handler() {
    let client = TestClient::new(generate_handler(search).unwrap());

    client
        .get("/search")
        .query("q", "rust lang")
        .query("limit", 10)
        .send()
        .assert_status(StatusCode::OK)
        .assert_body("rust langx10");
}

#[test]
fn out_of_range_value_is_rejected() {
    let client = TestClient::new(generate_handler(search).unwrap());

    client
        .get("/search")
        .query("q", "rust")
        .query("limit", 300)
        .send()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body_contains("limit");
}

#[test]
fn rejection_follows_bind_config() {
    let endpoint = generate_handler(search)
        .unwrap()
        .with_config(BindConfig::new().rejection_status(422).expose_rejection_detail(false));
    let client = TestClient::new(endpoint);

    client
        .get("/search?q=rust&limit=-1")
        .send()
        .assert_status_code(422)
        .assert_body("Unprocessable Entity");
}

#[test]
fn responder_status_and_body_are_written() {
    let client = TestClient::new(generate_handler(guarded).unwrap());

    client
        .get("/")
        .query("q", "secret")
        .query("limit", 1)
        .send()
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_body("not allowed");

    client
        .post("/")
        .query("q", "public")
        .query("limit", 1)
        .send()
        .assert_status(StatusCode::OK)
        .assert_body("public");
}

#[test]
fn success_override_cannot_hide_a_rejection() {
    let endpoint = generate_handler(search)
        .unwrap()
        .with_config(BindConfig::new().rejection_status(200));
    let client = TestClient::new(endpoint);

    client
        .get("/search?q=rust&limit=abc")
        .send()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body_contains("limit");
}
