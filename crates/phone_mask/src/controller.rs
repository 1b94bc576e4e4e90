//! Per-form phone controller: keeps one input formatted, the caret stable and
//! the submit button gated on validity.

use crate::mask::{
    caret_for_digit_index, count_digits_before, extract_digits, format_phone, is_valid_phone,
    plan_deletion, DeletionKey, Selection, VALIDATION_MESSAGE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneInput {
    pub value: String,
    pub selection: Selection,
    pub focused: bool,
}

impl PhoneInput {
    /// Unfocused input with the caret at the end of `value`.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let end = value.chars().count();
        Self {
            value,
            selection: Selection::caret(end),
            focused: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitButton {
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLabel {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneForm {
    pub input: PhoneInput,
    pub submit: Option<SubmitButton>,
    pub error: Option<ErrorLabel>,
}

impl PhoneForm {
    pub fn new(input: PhoneInput) -> Self {
        Self {
            input,
            submit: Some(SubmitButton::default()),
            error: Some(ErrorLabel::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Default deletion suppressed; the controller already edited the value.
    Intercepted,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Proceed,
    Blocked,
}

#[derive(Debug, Clone)]
pub struct PhoneMaskController {
    form: PhoneForm,
}

impl PhoneMaskController {
    /// Binds to `form` and silently reformats whatever it already holds.
    pub fn attach(form: PhoneForm) -> Self {
        let mut controller = Self { form };
        let raw = controller.form.input.value.clone();
        let end = raw.chars().count();
        controller.apply_formatted_value(&raw, Some(count_digits_before(&raw, end)), false);
        controller
    }

    pub fn form(&self) -> &PhoneForm {
        &self.form
    }

    pub fn value(&self) -> &str {
        &self.form.input.value
    }

    pub fn selection(&self) -> Selection {
        self.form.input.selection
    }

    pub fn is_focused(&self) -> bool {
        self.form.input.focused
    }

    /// `None` when the form has no submit button.
    pub fn submit_enabled(&self) -> Option<bool> {
        self.form.submit.as_ref().map(|button| !button.disabled)
    }

    pub fn error_text(&self) -> Option<&str> {
        self.form.error.as_ref().map(|label| label.text.as_str())
    }

    pub fn focus(&mut self) {
        self.form.input.focused = true;
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.form.input.selection = selection;
    }

    /// Writes `format_phone(raw)` into the input, repositions the caret when
    /// focused and refreshes the submit button and error label. Returns
    /// whether the new value is valid.
    pub fn apply_formatted_value(
        &mut self,
        raw: &str,
        digit_index: Option<usize>,
        show_error: bool,
    ) -> bool {
        let formatted = format_phone(raw);

        if let Some(digit_index) = digit_index {
            if self.form.input.focused {
                let max_digits = extract_digits(&formatted).len();
                let caret = caret_for_digit_index(&formatted, digit_index.min(max_digits));
                self.form.input.selection = Selection::caret(caret);
            }
        }
        self.form.input.value = formatted;

        let value = &self.form.input.value;
        let has_input = !extract_digits(value).is_empty();
        let valid = is_valid_phone(value);

        if let Some(button) = self.form.submit.as_mut() {
            button.disabled = !valid;
        }

        if let Some(label) = self.form.error.as_mut() {
            label.text = if show_error && has_input && !valid {
                VALIDATION_MESSAGE.to_string()
            } else {
                String::new()
            };
        }

        valid
    }

    pub fn update_state(&mut self, show_error: bool) -> bool {
        let raw = self.form.input.value.clone();
        let digit_index = count_digits_before(&raw, self.form.input.selection.start);
        self.apply_formatted_value(&raw, Some(digit_index), show_error)
    }

    /// The input now holds `value` (typed or pasted) with the caret at `caret`.
    pub fn on_input(&mut self, value: impl Into<String>, caret: usize) -> bool {
        self.form.input.value = value.into();
        self.form.input.selection = Selection::caret(caret);
        self.update_state(false)
    }

    pub fn on_keydown(&mut self, key: DeletionKey) -> KeyOutcome {
        let planned = plan_deletion(&self.form.input.value, self.form.input.selection, key);
        match planned {
            Some(deletion) => {
                self.apply_formatted_value(&deletion.raw, Some(deletion.digit_index), false);
                KeyOutcome::Intercepted
            }
            None => KeyOutcome::Default,
        }
    }

    pub fn on_blur(&mut self) -> bool {
        self.form.input.focused = false;
        self.update_state(true)
    }

    pub fn on_submit(&mut self) -> SubmitOutcome {
        if self.update_state(true) {
            SubmitOutcome::Proceed
        } else {
            self.focus();
            SubmitOutcome::Blocked
        }
    }
}
