//! Transport round-trip: `decode(encode(J))` recovers J's method and exact content bytes.

use pebble_ls::rpc::{decode_message, encode_message};
use serde_json::json;

#[test]
fn encode_then_decode_recovers_method_and_bytes() {
    let message = json!({"method": "textDocument/hover", "params": {"x": 1}});
    let framed = encode_message(&message).unwrap();
    let decoded = decode_message(&framed).unwrap();

    assert_eq!(decoded.method, "textDocument/hover");
    assert_eq!(decoded.content, serde_json::to_vec(&message).unwrap());
}

#[test]
fn the_documented_ok_message_has_content_length_fifteen() {
    let framed = encode_message(&json!({"method": "ok"})).unwrap();
    let framed_str = String::from_utf8(framed).unwrap();
    assert!(framed_str.starts_with("Content-Length: 15\r\n\r\n"));
    assert_eq!(framed_str.len(), "Content-Length: 15\r\n\r\n".len() + 15);
}
