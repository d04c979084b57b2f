//! Checkout module.
//!
//! Contains the checkout form, its validation, the order payload and the
//! submission state machine.

mod form;
mod order;
mod submission;
mod validate;

pub use form::CheckoutForm;
pub use order::{OrderLine, OrderPayload, OrderStatus};
pub use submission::{
    OrderSubmitter, SubmissionConfig, SubmissionState, ORDER_FAILED, ORDER_PLACED,
};
pub use validate::{validate, ValidationError, PHONE_DIGITS};
