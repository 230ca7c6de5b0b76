//! Request body decoding for `/predict`.
//!
//! JSON bodies must be objects. A JSON body that does not parse (or is
//! `null`) falls back to form decoding, which yields nothing for a JSON
//! content type. Multipart bodies are rejected. Bodies of any other content
//! type decode to an empty payload.

use actix_web::web;
use serde_json::{Map, Value};

use crate::features::{Payload, RawValue};
use crate::server::error::ApiError;

pub fn parse_body(content_type: &str, body: &[u8]) -> Result<Payload, ApiError> {
    let content_type = content_type.trim().to_ascii_lowercase();
    if is_json(&content_type) {
        return match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Ok(from_json_object(map)),
            Ok(Value::Null) | Err(_) => Ok(Payload::new()),
            Ok(_) => Err(ApiError::InvalidPayload),
        };
    }
    if content_type == "application/x-www-form-urlencoded" {
        return Ok(parse_form(body));
    }
    if content_type.starts_with("multipart/") {
        return Err(ApiError::InvalidPayload);
    }
    Ok(Payload::new())
}

pub fn from_json_object(map: Map<String, Value>) -> Payload {
    map.into_iter()
        .map(|(k, v)| (k, RawValue::from(v)))
        .collect()
}

fn is_json(content_type: &str) -> bool {
    content_type == "application/json"
        || (content_type.starts_with("application/") && content_type.ends_with("+json"))
}

fn parse_form(body: &[u8]) -> Payload {
    let Ok(text) = std::str::from_utf8(body) else {
        return Payload::new();
    };
    let Ok(pairs) = web::Query::<Vec<(String, String)>>::from_query(text) else {
        return Payload::new();
    };
    let mut payload = Payload::new();
    for (key, value) in pairs.into_inner() {
        payload.entry(key).or_insert(RawValue::Text(value));
    }
    payload
}
