//! # Request Validators
//!
//! Plugged into the chain through [`ValidationBehavior`](mediator_framework::ValidationBehavior),
//! so invalid requests never reach a handler. Every rule is checked and all violations
//! are reported together.

use crate::model::{CreateItem, RenameItem};
use mediator_framework::{FieldError, Validator};

fn check_name(name: &str, max_len: usize, errors: &mut Vec<FieldError>) {
    let name = name.trim();
    if name.is_empty() {
        errors.push(FieldError::new("name", "must not be blank"));
    } else if name.chars().count() > max_len {
        errors.push(FieldError::new(
            "name",
            format!("must be at most {max_len} characters"),
        ));
    }
}

#[derive(Debug, Clone)]
pub struct CreateItemValidator {
    max_name_len: usize,
}

impl CreateItemValidator {
    pub fn new(max_name_len: usize) -> Self {
        Self { max_name_len }
    }
}

impl Validator<CreateItem> for CreateItemValidator {
    fn validate(&self, request: &CreateItem) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name(&request.name, self.max_name_len, &mut errors);
        if !request.price.is_finite() || request.price <= 0.0 {
            errors.push(FieldError::new("price", "must be a positive amount"));
        }
        errors
    }
}

#[derive(Debug, Clone)]
pub struct RenameItemValidator {
    max_name_len: usize,
}

impl RenameItemValidator {
    pub fn new(max_name_len: usize) -> Self {
        Self { max_name_len }
    }
}

impl Validator<RenameItem> for RenameItemValidator {
    fn validate(&self, request: &RenameItem) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name(&request.name, self.max_name_len, &mut errors);
        errors
    }
}
