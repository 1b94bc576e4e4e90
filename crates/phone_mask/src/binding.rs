//! Wiring of phone controllers onto the page forms that carry a phone field.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::controller::{ErrorLabel, PhoneForm, PhoneInput, PhoneMaskController, SubmitButton};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormBinding {
    pub form_id: &'static str,
    pub input_id: &'static str,
    pub error_id: &'static str,
}

pub const REGISTRATION_FORM: FormBinding = FormBinding {
    form_id: "reg_form",
    input_id: "tel",
    error_id: "tel-error",
};

pub const LOGIN_FORM: FormBinding = FormBinding {
    form_id: "login_form",
    input_id: "login-tel",
    error_id: "login-tel-error",
};

pub const ACCOUNT_PHONE_FORM: FormBinding = FormBinding {
    form_id: "account-tel-form",
    input_id: "account-tel",
    error_id: "account-tel-error",
};

pub const PHONE_FORMS: [FormBinding; 3] = [REGISTRATION_FORM, LOGIN_FORM, ACCOUNT_PHONE_FORM];

/// Element resolution by id, as the page exposes it.
pub trait FormLookup {
    fn has_form(&self, form_id: &str) -> bool;
    /// Current value of the input, `None` when the input is absent.
    fn input_value(&self, input_id: &str) -> Option<String>;
    fn has_submit_button(&self, form_id: &str) -> bool;
    fn has_error_label(&self, error_id: &str) -> bool;
}

/// Builds the form state for `binding`, or `None` when the form or its input
/// is missing from the page.
pub fn resolve_form(page: &impl FormLookup, binding: &FormBinding) -> Option<PhoneForm> {
    if !page.has_form(binding.form_id) {
        return None;
    }
    let value = page.input_value(binding.input_id)?;

    Some(PhoneForm {
        input: PhoneInput::new(value),
        submit: page
            .has_submit_button(binding.form_id)
            .then(SubmitButton::default),
        error: page
            .has_error_label(binding.error_id)
            .then(ErrorLabel::default),
    })
}

#[derive(Debug, Clone)]
pub struct BoundPhoneForm {
    pub binding: FormBinding,
    pub controller: PhoneMaskController,
}

/// Attaches a controller to every known phone form present on `page`.
pub fn attach_forms(page: &impl FormLookup) -> Vec<BoundPhoneForm> {
    PHONE_FORMS
        .iter()
        .filter_map(|binding| match resolve_form(page, binding) {
            Some(form) => Some(BoundPhoneForm {
                binding: *binding,
                controller: PhoneMaskController::attach(form),
            }),
            None => {
                debug!(form_id = binding.form_id, "phone form not on page; skipping");
                None
            }
        })
        .collect()
}

/// In-memory page used by the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    forms: HashSet<String>,
    inputs: HashMap<String, String>,
    submit_buttons: HashSet<String>,
    error_labels: HashSet<String>,
}

impl StaticPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every element of `binding`, with the input pre-filled.
    pub fn with_form(mut self, binding: &FormBinding, value: impl Into<String>) -> Self {
        self.forms.insert(binding.form_id.to_string());
        self.inputs
            .insert(binding.input_id.to_string(), value.into());
        self.submit_buttons.insert(binding.form_id.to_string());
        self.error_labels.insert(binding.error_id.to_string());
        self
    }

    pub fn without_submit_button(mut self, form_id: &str) -> Self {
        self.submit_buttons.remove(form_id);
        self
    }

    pub fn without_error_label(mut self, error_id: &str) -> Self {
        self.error_labels.remove(error_id);
        self
    }

    pub fn without_input(mut self, input_id: &str) -> Self {
        self.inputs.remove(input_id);
        self
    }
}

impl FormLookup for StaticPage {
    fn has_form(&self, form_id: &str) -> bool {
        self.forms.contains(form_id)
    }

    fn input_value(&self, input_id: &str) -> Option<String> {
        self.inputs.get(input_id).cloned()
    }

    fn has_submit_button(&self, form_id: &str) -> bool {
        self.submit_buttons.contains(form_id)
    }

    fn has_error_label(&self, error_id: &str) -> bool {
        self.error_labels.contains(error_id)
    }
}
