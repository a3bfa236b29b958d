//! # Integration Tests for entauth-api
//!
//! Tests health probes, bearer authentication, the error envelope, the bank
//! directory, and the verification endpoint against a simulated gateway.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

use entauth_api::state::{AppConfig, AppState, Environment};
use entauth_core::{sha512_hex, SystemClock};
use entauth_crypto::{GatewayCipher, LoopbackCipher, SecretKey, TokenClaims, TokenCodec};
use entauth_gateway::{EnterpriseAuthClient, GatewayConfig};

const SECRET: &str = "integration-test-secret";
const GATEWAY_KEY: &str = "integration-gateway-key";

fn codec() -> TokenCodec {
    TokenCodec::new(SecretKey::new(SECRET).unwrap(), Arc::new(SystemClock))
}

fn config(environment: Environment, bank_json_path: PathBuf) -> AppConfig {
    AppConfig {
        port: 0,
        environment,
        bank_json_path,
    }
}

/// Helper: build the test app with no gateway and a nonexistent bank file.
fn test_app() -> axum::Router {
    let state = AppState::new(
        config(Environment::Production, PathBuf::from("/nonexistent/bank.json")),
        codec(),
        None,
    );
    entauth_api::app(state)
}

fn bearer() -> String {
    let claims = TokenClaims::new()
        .with("userId", "u-100")
        .with("workspaceId", "ws-7")
        .with("regionUid", "cn-east");
    format!("Bearer {}", codec().issue(&claims, 600).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", bearer())
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", bearer())
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn verification_body() -> Value {
    json!({
        "key": "91310000MA1FL8XQ30",
        "accountBank": "Caller Bank",
        "subBank": "102331000001",
        "keyName": "Example Trading Co",
        "usrName": "Zhang San",
        "accountNo": "6222020200112233445"
    })
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe_needs_no_token() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health/liveness").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe_needs_no_token() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health/readiness").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn test_endpoint_requires_token() {
    let response = test_app()
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
    assert_eq!(json["error"]["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_endpoint_with_valid_token() {
    let response = test_app().oneshot(get("/test")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Test response");
}

#[tokio::test]
async fn test_forged_token_rejected() {
    let forged = TokenCodec::new(SecretKey::new("not-the-secret").unwrap(), Arc::new(SystemClock))
        .issue(&TokenClaims::new().with("userId", "u-100"), 600)
        .unwrap();
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/test")
                .header("Authorization", format!("Bearer {forged}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_path_requires_token_before_404() {
    let response = test_app()
        .oneshot(Request::builder().uri("/v9/unknown").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// -- Error Envelope -----------------------------------------------------------

#[tokio::test]
async fn test_unknown_path_is_404_envelope() {
    let response = test_app().oneshot(get("/v9/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json.get("data").is_none());
    assert_eq!(json["error"]["code"], "404");
    assert_eq!(json["error"]["message"], "Resource not found: /v9/unknown");
    assert_eq!(json["error"]["errorId"].as_str().unwrap().len(), 8);
    assert!(json["error"]["timestamp"].as_i64().unwrap() > 0);
}

// -- Enterprise Verification --------------------------------------------------

#[tokio::test]
async fn test_verification_returns_503_without_gateway() {
    let response = test_app()
        .oneshot(post_json("/v1/enterprise-auth", &verification_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "SYS-503");
}

#[tokio::test]
async fn test_verification_validates_before_gateway_check() {
    let mut body = verification_body();
    body["key"] = json!("123");
    let response = test_app()
        .oneshot(post_json("/v1/enterprise-auth", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VAL-400");
    assert!(json["error"]["message"].as_str().unwrap().contains("key"));
}

#[tokio::test]
async fn test_verification_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/enterprise-auth")
        .header("Authorization", bearer())
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "VAL-400");
}

/// Simulated gateway sharing the loopback key with the service.
struct GatewayStub {
    cipher: LoopbackCipher,
    resp_code: &'static str,
}

impl Respond for GatewayStub {
    fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
        let form: HashMap<String, String> = url::form_urlencoded::parse(&request.body)
            .into_owned()
            .collect();
        let req_data = &form["reqData"];
        let verify_fields = BTreeMap::from([
            ("reqData".to_string(), sha512_hex(req_data)),
            ("signature".to_string(), form["signature"].clone()),
        ]);
        if !self.cipher.verify(&verify_fields).is_success() {
            return ResponseTemplate::new(400);
        }

        let req: Value = serde_json::from_slice(&STANDARD.decode(req_data).unwrap()).unwrap();
        let sens_data = self
            .cipher
            .encrypt_field(r#"{"keyName":"Example Trading Co Ltd","usrName":"Zhang San"}"#)
            .into_result()
            .unwrap();
        let payload = json!({
            "respCode": self.resp_code,
            "respMsg": "done",
            "orderId": req["orderId"],
            "orderStatus": "0000",
            "key": req["key"],
            "accountBank": "Registered Bank",
            "transAmt": "1.00",
            "sensData": sens_data,
        });
        let resp_data = STANDARD.encode(payload.to_string());
        let signature = self
            .cipher
            .sign(&BTreeMap::from([("respData".to_string(), sha512_hex(&resp_data))]))
            .into_result()
            .unwrap();
        ResponseTemplate::new(200).set_body_string(format!("respData={resp_data}&signature={signature}"))
    }
}

async fn gateway_app(server: &MockServer) -> axum::Router {
    let cipher = Arc::new(LoopbackCipher::new(SecretKey::new(GATEWAY_KEY).unwrap()));
    let gateway = EnterpriseAuthClient::new(
        GatewayConfig::local_mock(&server.uri(), "M-0001").unwrap(),
        cipher,
        Arc::new(SystemClock),
    )
    .unwrap();
    let state = AppState::new(
        config(Environment::Production, PathBuf::from("/nonexistent/bank.json")),
        codec(),
        Some(gateway),
    );
    entauth_api::app(state)
}

#[tokio::test]
async fn test_verification_success_through_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gateway/3060"))
        .respond_with(GatewayStub {
            cipher: LoopbackCipher::new(SecretKey::new(GATEWAY_KEY).unwrap()),
            resp_code: "00000000",
        })
        .expect(1)
        .mount(&server)
        .await;

    let response = gateway_app(&server)
        .await
        .oneshot(post_json("/v1/enterprise-auth", &verification_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let data = &json["data"];
    assert_eq!(data["isTransactionSuccess"], true);
    assert_eq!(data["isCharged"], true);
    assert_eq!(data["enterpriseName"], "Example Trading Co Ltd");
    assert_eq!(data["legalPersonName"], "Zhang San");
    assert_eq!(data["accountBank"], "Registered Bank");
    assert_eq!(data["transAmt"], "1.00");
}

#[tokio::test]
async fn test_verification_business_failure_is_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(GatewayStub {
            cipher: LoopbackCipher::new(SecretKey::new(GATEWAY_KEY).unwrap()),
            resp_code: "E1000002",
        })
        .mount(&server)
        .await;

    let response = gateway_app(&server)
        .await
        .oneshot(post_json("/v1/enterprise-auth", &verification_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["isTransactionSuccess"], false);
    assert_eq!(data["accountBank"], "Caller Bank");
    assert_eq!(data["enterpriseName"], "Example Trading Co");
    assert!(data.get("transAmt").is_none());
}

#[tokio::test]
async fn test_gateway_outage_is_opaque_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream secret detail"))
        .mount(&server)
        .await;

    let response = gateway_app(&server)
        .await
        .oneshot(post_json("/v1/enterprise-auth", &verification_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    let error = &json["error"];
    assert_eq!(error["code"], "SYS-500");
    let message = error["message"].as_str().unwrap();
    assert!(!message.contains("upstream secret detail"));
    assert!(message.ends_with(error["errorId"].as_str().unwrap()));
    assert!(error.get("detail").is_none());
}

// -- Bank Directory -----------------------------------------------------------

fn bank_app(path: PathBuf, environment: Environment) -> axum::Router {
    entauth_api::app(AppState::new(config(environment, path), codec(), None))
}

#[tokio::test]
async fn test_banks_served_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bank.json");
    std::fs::write(&file, r#"{"102": "ICBC", "105": "CCB"}"#).unwrap();

    let response = bank_app(file, Environment::Production)
        .oneshot(get("/v1/banks"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], json!({"102": "ICBC", "105": "CCB"}));
}

#[tokio::test]
async fn test_banks_reload_after_file_changes() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bank.json");
    std::fs::write(&file, r#"{"102": "ICBC"}"#).unwrap();
    let app = bank_app(file.clone(), Environment::Production);

    let first = body_json(app.clone().oneshot(get("/v1/banks")).await.unwrap()).await;
    assert_eq!(first["data"], json!({"102": "ICBC"}));

    std::fs::write(&file, r#"{"102": "ICBC", "308": "CMB"}"#).unwrap();
    std::fs::File::options()
        .write(true)
        .open(&file)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    let second = body_json(app.oneshot(get("/v1/banks")).await.unwrap()).await;
    assert_eq!(second["data"], json!({"102": "ICBC", "308": "CMB"}));
}

#[tokio::test]
async fn test_missing_bank_file_is_500() {
    let response = test_app().oneshot(get("/v1/banks")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"]["code"], "SYS-500");
}

#[tokio::test]
async fn test_dev_mode_discloses_internal_detail() {
    let response = bank_app(PathBuf::from("/nonexistent/bank.json"), Environment::Development)
        .oneshot(get("/v1/banks"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    let detail = json["error"]["detail"].as_str().unwrap();
    assert!(detail.contains("/nonexistent/bank.json"), "{detail}");
    assert_eq!(json["error"]["message"], json["error"]["detail"]);
}
