//! The one-time-code page, its submission endpoint and the admin API.

use docs_gateway::code_input::{CodeInputController, CodeInputEvent, CodeInputHost};
use docs_gateway::config::GatewayConfig;
use docs_gateway::http::CodeForm;
use reqwest::StatusCode;
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_form_page_renders_slots() {
    let mut config = GatewayConfig::default();
    config.code_input.slots = 4;
    let gw = common::start_gateway(config).await;

    let res = common::client().get(gw.url("/auth/code")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains(r#"id="code-input-container""#));
    assert!(html.contains(r#"id="code-hidden-input""#));
    assert_eq!(html.matches(r#"maxlength="1""#).count(), 4);
}

#[tokio::test]
async fn test_complete_code_accepted() {
    let gw = common::start_gateway(GatewayConfig::default()).await;
    let res = common::client()
        .post(gw.url("/auth/code"))
        .form(&[("code", "123456")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["accepted"], true);
}

#[tokio::test]
async fn test_malformed_code_rejected() {
    let gw = common::start_gateway(GatewayConfig::default()).await;
    let client = common::client();

    for code in ["12345", "12a456", "1234567"] {
        let res = client
            .post(gw.url("/auth/code"))
            .form(&[("code", code)])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY, "code {code:?}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["accepted"], false);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_missing_code_field_rejected_as_json() {
    let gw = common::start_gateway(GatewayConfig::default()).await;
    let client = common::client();

    let res = client
        .post(gw.url("/auth/code"))
        .form(&[("other", "1")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["accepted"], false);
    assert!(body["error"].is_string());

    let res = client
        .post(gw.url("/auth/code"))
        .body("code=123456")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["accepted"], false);
}

/// Host that records what a browser would submit.
#[derive(Default)]
struct SubmitCapture {
    submitted: Option<String>,
}

impl CodeInputHost for SubmitCapture {
    fn set_slot(&mut self, _slot: usize, _value: Option<char>) {}
    fn set_aggregate(&mut self, _code: &str) {}
    fn focus(&mut self, _slot: usize) {}
    fn select(&mut self, _slot: usize) {}
    fn submit(&mut self, code: &str) {
        self.submitted = Some(code.to_string());
    }
}

#[tokio::test]
async fn test_controller_submission_accepted_by_endpoint() {
    let config = GatewayConfig::default();
    let form = CodeForm::new(&config.code_input);
    let gw = common::start_gateway(config).await;

    let mut controller = CodeInputController::attach(&form.layout(), SubmitCapture::default())
        .expect("rendered layout is complete");
    controller.handle(CodeInputEvent::Paste {
        slot: 0,
        text: "Your code: 918-273".to_string(),
    });
    let code = controller.host().submitted.clone().expect("form submitted");
    assert_eq!(code, "918273");

    let res = common::client()
        .post(gw.url("/auth/code"))
        .form(&[("code", code.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_disabled_by_default() {
    let gw = common::start_gateway(GatewayConfig::default()).await;
    let res = common::client()
        .get(gw.url("/admin/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_api() {
    let mut config = GatewayConfig::default();
    config.admin.enabled = true;
    config.admin.api_key = "s3cret".into();
    let gw = common::start_gateway(config).await;
    let client = common::client();

    let res = client.get(gw.url("/admin/rules")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(gw.url("/admin/rules"))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(gw.url("/admin/status"))
        .bearer_auth("s3cret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let status: Value = res.json().await.unwrap();
    assert_eq!(status["code_slots"], 6);
    let rule_count = status["rules"].as_u64().unwrap();

    let res = client
        .get(gw.url("/admin/rules"))
        .bearer_auth("s3cret")
        .send()
        .await
        .unwrap();
    let rules: Vec<Value> = res.json().await.unwrap();
    assert_eq!(rules.len() as u64, rule_count);
    assert_eq!(rules[0]["source"], "/guides/cheatsheet/:path*");

    let res = client
        .get(gw.url("/admin/resolve"))
        .query(&[("path", "/guides/ai/intro")])
        .bearer_auth("s3cret")
        .send()
        .await
        .unwrap();
    let outcome: Value = res.json().await.unwrap();
    assert_eq!(outcome["rule"], 1);
    assert_eq!(outcome["location"], "/ai/intro");
    assert_eq!(outcome["status"], 308);
}
