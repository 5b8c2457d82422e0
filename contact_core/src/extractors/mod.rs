pub mod form;

pub use form::ContactFields;
