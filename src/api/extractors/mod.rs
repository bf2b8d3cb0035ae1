//! Custom request extractors.

mod validated_form;

pub use validated_form::{empty_string_as_none, flag, FlashForm, FormPage, ValidatedForm};
