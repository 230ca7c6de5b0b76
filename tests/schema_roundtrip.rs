use cpe_risk::schema::v1::{ErrorResponse, PredictResponse};

#[test]
fn predict_response_decodes_from_wire() {
    let json = r#"{"status":"CPE negative","probability":12.5,"threshold":0.5,"icon":"negative"}"#;
    let decoded: PredictResponse = serde_json::from_str(json).unwrap();
    assert_eq!(decoded.status, "CPE negative");
    assert_eq!(decoded.probability, 12.5);
    assert_eq!(decoded.icon, "negative");
}

#[test]
fn error_response_shape() {
    let doc = ErrorResponse {
        error: "Invalid payload format".to_string(),
    };
    let json = serde_json::to_string(&doc).unwrap();
    assert_eq!(json, r#"{"error":"Invalid payload format"}"#);
}
