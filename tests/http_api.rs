use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use cpe_risk::artifact::ModelArtifact;
use cpe_risk::ctx::ServiceCtx;
use cpe_risk::features::FeatureMapper;
use cpe_risk::model::ModelSpec;
use cpe_risk::server::{NO_CACHE, configure, no_cache_headers};
use serde_json::{Value, json};

fn make_ctx() -> ServiceCtx {
    let features = vec![
        "Hospital days before ICU admission".to_string(),
        "Central venous catheter".to_string(),
        "Carbapenem".to_string(),
    ];
    let model = ModelSpec::LogisticRegression {
        coefficients: vec![0.1, 2.0, 0.0],
        intercept: -2.0,
    };
    let artifact = ModelArtifact::from_parts(model, features, Some(0.5)).unwrap();
    ServiceCtx::new(artifact, FeatureMapper::builtin())
}

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx))
                .wrap(no_cache_headers())
                .configure(configure),
        )
        .await
    };
}

#[actix_web::test]
async fn predict_json_positive() {
    let app = init_app!(make_ctx());
    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({"cvc": "1", "hospital-days": "0"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "status": "CPE positive",
            "probability": 50.0,
            "threshold": 0.5,
            "icon": "positive"
        })
    );
}

#[actix_web::test]
async fn predict_form_negative() {
    let app = init_app!(make_ctx());
    let req = test::TestRequest::post()
        .uri("/predict")
        .set_form([("hospital-days", "5"), ("cvc", "0")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "CPE negative");
    assert_eq!(body["icon"], "negative");
    // sigmoid(-1.5)
    assert_eq!(body["probability"], 18.2);
}

#[actix_web::test]
async fn predict_rejects_json_array() {
    let app = init_app!(make_ctx());
    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!([1, 2, 3]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), NO_CACHE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Invalid payload format"}));
}

#[actix_web::test]
async fn predict_rejects_multipart_form() {
    let app = init_app!(make_ctx());
    let body = "--b\r\nContent-Disposition: form-data; name=\"cvc\"\r\n\r\n1\r\n--b--\r\n";
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header((header::CONTENT_TYPE, "multipart/form-data; boundary=b"))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Invalid payload format"}));
}

#[actix_web::test]
async fn predict_without_recognized_fields_scores_zero_row() {
    let app = init_app!(make_ctx());
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload("hello")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    // sigmoid(-2.0)
    assert_eq!(body["probability"], 11.9);
    assert_eq!(body["status"], "CPE negative");
}

#[actix_web::test]
async fn predict_requires_post() {
    let app = init_app!(make_ctx());
    let req = test::TestRequest::get().uri("/predict").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn features_lists_schema_aliases_threshold() {
    let app = init_app!(make_ctx());
    let req = test::TestRequest::get().uri("/features").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["features"],
        json!([
            "Hospital days before ICU admission",
            "Central venous catheter",
            "Carbapenem"
        ])
    );
    assert_eq!(body["aliases"]["cvc"], "Central venous catheter");
    assert_eq!(body["threshold"], 0.5);
}

#[actix_web::test]
async fn health_is_ok_with_no_cache_headers() {
    let app = init_app!(make_ctx());
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), NO_CACHE);
    assert_eq!(headers.get(header::PRAGMA).unwrap(), "no-cache");
    assert_eq!(headers.get(header::EXPIRES).unwrap(), "0");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"ok": true}));
}

#[actix_web::test]
async fn index_page_served_when_configured() {
    let app = init_app!(make_ctx());
    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let app = init_app!(make_ctx().with_index_html("<html>cpe</html>"));
    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"<html>cpe</html>");
}
