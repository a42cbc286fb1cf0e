//! Host call contract: registration, arity, response shapes and payloads

use base64::Engine as Base64Engine;
use serde_json::{json, Value};
use walkrender::host::{self, WalkResponse};
use walkrender::WalkConfig;

const ARITY_MSG: &str = "Expected 4 arguments: stepLength, numSteps, width, height";

fn setup() {
    host::register_builtins(WalkConfig::default());
}

fn decode_image(resp: &WalkResponse) -> Vec<u8> {
    match resp {
        WalkResponse::Success { success, image } => {
            assert!(*success);
            base64::engine::general_purpose::STANDARD
                .decode(image)
                .expect("image is standard base64")
        }
        WalkResponse::Failure { error } => panic!("walk failed: {error}"),
    }
}

fn png_size(png_data: &[u8]) -> (u32, u32) {
    let reader = png::Decoder::new(png_data).read_info().expect("valid png");
    let info = reader.info();
    (info.width, info.height)
}

#[test]
fn walk_is_registered_by_name() {
    setup();
    assert!(host::is_registered(host::WALK));
}

#[test]
fn walk_returns_base64_png_of_requested_size() {
    setup();
    let resp = host::invoke(host::WALK, &[json!(10), json!(5), json!(200), json!(200)]);
    let png_data = decode_image(&resp);
    assert_eq!(&png_data[0..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(png_size(&png_data), (200, 200));

    let js = resp.to_json();
    assert_eq!(js["success"], Value::Bool(true));
    assert!(js.get("error").is_none());
}

#[test]
fn odd_sizes_round_trip() {
    setup();
    let resp = host::invoke(host::WALK, &[json!(2.5), json!(3), json!(33), json!(17)]);
    assert_eq!(png_size(&decode_image(&resp)), (33, 17));
}

#[test]
fn wrong_arity_is_a_structured_error() {
    setup();
    for args in [
        vec![],
        vec![json!(10)],
        vec![json!(10), json!(5), json!(200)],
        vec![json!(10), json!(5), json!(200), json!(200), json!(1)],
    ] {
        let resp = host::invoke(host::WALK, &args);
        assert_eq!(resp.to_json(), json!({ "error": ARITY_MSG }));
    }
}

#[test]
fn negative_step_count_is_rejected() {
    setup();
    let resp = host::invoke(host::WALK, &[json!(10), json!(-1), json!(200), json!(200)]);
    match resp {
        WalkResponse::Failure { error } => assert!(error.contains("numSteps"), "{error}"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn zero_dimensions_are_rejected() {
    setup();
    let resp = host::invoke(host::WALK, &[json!(10), json!(5), json!(0), json!(200)]);
    assert!(!resp.is_success());
}

#[test]
fn request_lines_dispatch_through_the_registry() {
    setup();
    let resp = host::handle_line(r#"{"call": "walk", "args": [1, 2, 16, 16]}"#);
    assert!(resp.is_success());

    let resp = host::handle_line(r#"{"call": "walk"}"#);
    assert_eq!(resp.to_json(), json!({ "error": ARITY_MSG }));

    let resp = host::handle_line(r#"{"call": "fly", "args": []}"#);
    assert_eq!(resp.to_json(), json!({ "error": "Unknown function: fly" }));
}
