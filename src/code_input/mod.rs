//! One-time-code entry.
//!
//! # Data Flow
//! ```text
//! Page load:
//!     FormLayout (container, form, hidden input, N digit inputs)
//!     → controller.rs attach (or silent no-op if elements are missing)
//!
//! User events (input / keydown / paste / focus):
//!     → controller.rs (update slots, move focus)
//!     → aggregate recomputed and mirrored to the hidden field
//!     → all slots filled → form submitted once
//!
//! Submission:
//!     POST code=<aggregate>
//!     → validate_code (exactly N ASCII digits)
//! ```

pub mod controller;
pub mod layout;

use thiserror::Error;

pub use controller::{CodeInputController, CodeInputEvent, CodeInputHost, Key};
pub use layout::FormLayout;

/// Why a submitted code was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("expected {expected} digits, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("code must contain digits only")]
    NonDigit,
}

/// Check that a submitted aggregate is a complete code of `slots` digits.
pub fn validate_code(code: &str, slots: usize) -> Result<(), CodeError> {
    let actual = code.chars().count();
    if actual != slots {
        return Err(CodeError::Length {
            expected: slots,
            actual,
        });
    }
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(CodeError::NonDigit);
    }
    Ok(())
}
