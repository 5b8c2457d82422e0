//! Client-side contact form: field state, validation display and the
//! submission lifecycle against the relay endpoint.

pub mod controller;
pub mod form;
pub mod transport;

pub use controller::{
    FormController, Outcome, SubmissionState, SubmitOutcome, FAILED_MESSAGE, FEEDBACK_WINDOW,
    SENT_MESSAGE,
};
pub use form::{ContactForm, TouchedFields};
pub use transport::{HttpRelayTransport, RelayTransport, TransportError, TransportReply};
