//! One-time-code form: page rendering and submission endpoint.
//!
//! The page carries the element ids from [`crate::code_input::layout`], so a
//! controller attached to it finds the container, the form, the hidden
//! aggregate input and one single-digit input per slot.

use askama::Template;
use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::code_input::layout::{CODE_FIELD, CONTAINER_ID, FORM_ID, HIDDEN_INPUT_ID};
use crate::code_input::{validate_code, FormLayout};
use crate::config::CodeInputConfig;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Renders the code-entry page for a fixed number of slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeForm {
    slots: usize,
    action: String,
}

impl CodeForm {
    pub fn new(config: &CodeInputConfig) -> Self {
        Self {
            slots: config.slots,
            action: config.form_path.clone(),
        }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// The elements a controller binds to on the rendered page.
    pub fn layout(&self) -> FormLayout {
        FormLayout::standard(self.slots)
    }

    pub fn render(&self) -> askama::Result<String> {
        let layout = self.layout();
        let inputs = layout
            .inputs
            .iter()
            .enumerate()
            .map(|(slot, id)| DigitInput {
                id,
                autocomplete: if slot == 0 { "one-time-code" } else { "off" },
                number: slot + 1,
            })
            .collect();

        CodePageTemplate {
            form_id: FORM_ID,
            hidden_id: HIDDEN_INPUT_ID,
            field: CODE_FIELD,
            container_id: CONTAINER_ID,
            action: &self.action,
            inputs,
        }
        .render()
    }
}

struct DigitInput<'a> {
    id: &'a str,
    autocomplete: &'static str,
    number: usize,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Enter your code</title>
</head>
<body>
  <form id="{{ form_id }}" method="post" action="{{ action }}">
    <input id="{{ hidden_id }}" type="hidden" name="{{ field }}" value="">
    <div id="{{ container_id }}">
      {% for input in inputs %}
      <input id="{{ input.id }}" type="text" inputmode="numeric" pattern="[0-9]" maxlength="1" autocomplete="{{ input.autocomplete }}" aria-label="Digit {{ input.number }}">
      {% endfor %}
    </div>
    <button type="submit">Verify</button>
  </form>
</body>
</html>"#,
    ext = "html"
)]
struct CodePageTemplate<'a> {
    form_id: &'static str,
    hidden_id: &'static str,
    field: &'static str,
    container_id: &'static str,
    action: &'a str,
    inputs: Vec<DigitInput<'a>>,
}

#[derive(Debug, Deserialize)]
pub struct CodeSubmission {
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn show_form(State(state): State<AppState>) -> Response {
    match state.inner.load().form.render() {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render code form");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render code form").into_response()
        }
    }
}

/// Accept the aggregate code. Only its shape is checked here; verifying it
/// belongs to the authentication backend.
pub async fn submit_code(
    State(state): State<AppState>,
    submission: Result<Form<CodeSubmission>, FormRejection>,
) -> Response {
    let slots = state.inner.load().form.slots();
    let Form(submission) = match submission {
        Ok(form) => form,
        Err(rejection) => {
            tracing::info!(slots, reason = %rejection.body_text(), "Malformed code submission");
            metrics::record_code_submission(false);
            return rejected(rejection.body_text());
        }
    };

    match validate_code(&submission.code, slots) {
        Ok(()) => {
            tracing::info!(slots, "Code submission accepted");
            metrics::record_code_submission(true);
            Json(SubmissionOutcome {
                accepted: true,
                error: None,
            })
            .into_response()
        }
        Err(e) => {
            tracing::info!(slots, reason = %e, "Code submission rejected");
            metrics::record_code_submission(false);
            rejected(e.to_string())
        }
    }
}

fn rejected(error: String) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(SubmissionOutcome {
            accepted: false,
            error: Some(error),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(slots: usize) -> CodeForm {
        CodeForm::new(&CodeInputConfig {
            slots,
            form_path: "/auth/code".into(),
        })
    }

    #[test]
    fn test_render_contains_layout_ids() {
        let html = form(6).render().unwrap();
        let layout = form(6).layout();
        assert!(html.contains(r#"id="code-form""#));
        assert!(html.contains(r#"id="code-input-container""#));
        assert!(html.contains(r#"id="code-hidden-input""#));
        assert!(html.contains(r#"name="code""#));
        assert!(html.contains(r#"action="/auth/code""#));
        for id in &layout.inputs {
            assert!(html.contains(&format!(r#"id="{id}""#)));
        }
        assert_eq!(html.matches(r#"maxlength="1""#).count(), 6);
        assert_eq!(html.matches("one-time-code").count(), 1);
    }

    #[test]
    fn test_render_escapes_action() {
        let form = CodeForm::new(&CodeInputConfig {
            slots: 4,
            form_path: r#"/code?a=1&b="x""#.into(),
        });
        assert!(form
            .render()
            .unwrap()
            .contains(r#"action="/code?a=1&amp;b=&quot;x&quot;""#));
    }
}
