pub mod contact;
pub mod response;

pub use contact::{ContactSubmission, Field, FormValues};
pub use response::{ApiResponse, RelayResult};
