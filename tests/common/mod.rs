#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};

/// A complete form payload as the browser submits it.
pub fn valid_payload() -> Value {
    json!({
        "memberName": "Jane Doe",
        "memberEmail": "jane@example.com",
        "memberPhone": "",
        "planType": "Monthly",
        "amount": "99.99",
        "startDate": "2026-10-01",
        "endDate": "2026-10-31",
        "additionalService": "",
        "additionalAmount": "",
        "discount": ""
    })
}

/// Decode a base64 PDF payload and return its bytes as lossy text.
pub fn decode_pdf_text(encoded: &str) -> String {
    let bytes = BASE64.decode(encoded).expect("payload is valid base64");
    assert!(bytes.starts_with(b"%PDF-"), "payload is not a PDF");
    String::from_utf8_lossy(&bytes).into_owned()
}
