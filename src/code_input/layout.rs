//! Element identifiers shared by the rendered code form and the controller.

/// Id of the element wrapping the digit inputs.
pub const CONTAINER_ID: &str = "code-input-container";
/// Id of the `<form>` that is submitted once the code is complete.
pub const FORM_ID: &str = "code-form";
/// Id of the hidden input carrying the aggregate code.
pub const HIDDEN_INPUT_ID: &str = "code-hidden-input";
/// Form field name of the hidden input.
pub const CODE_FIELD: &str = "code";

/// The page elements a controller binds to. A `None` means the element is
/// absent from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormLayout {
    pub container: Option<String>,
    pub form: Option<String>,
    pub hidden_input: Option<String>,
    /// Ids of the visible digit inputs, left to right.
    pub inputs: Vec<String>,
}

impl FormLayout {
    /// The layout the gateway renders for a code of `slots` digits.
    pub fn standard(slots: usize) -> Self {
        Self {
            container: Some(CONTAINER_ID.to_string()),
            form: Some(FORM_ID.to_string()),
            hidden_input: Some(HIDDEN_INPUT_ID.to_string()),
            inputs: (0..slots).map(input_id).collect(),
        }
    }

    /// Whether every element a controller needs is present.
    pub fn is_complete(&self) -> bool {
        self.container.is_some()
            && self.form.is_some()
            && self.hidden_input.is_some()
            && !self.inputs.is_empty()
    }
}

/// Id of the digit input at `slot`.
pub fn input_id(slot: usize) -> String {
    format!("code-input-{slot}")
}
