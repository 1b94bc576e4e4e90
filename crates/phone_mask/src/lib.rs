//! Russian phone-number input mask: formatting, validation and caret-stable
//! editing for the registration, login and account phone forms.

pub mod binding;
pub mod controller;
pub mod mask;

pub use binding::{attach_forms, BoundPhoneForm, FormBinding, FormLookup, StaticPage, PHONE_FORMS};
pub use controller::{
    ErrorLabel, KeyOutcome, PhoneForm, PhoneInput, PhoneMaskController, SubmitButton,
    SubmitOutcome,
};
pub use mask::{
    count_digits_before, extract_digits, format_phone, is_valid_phone, normalize_digits, remask,
    DeletionKey, Masked, Selection, VALIDATION_MESSAGE,
};

#[cfg(test)]
#[path = "tests/mask_tests.rs"]
mod mask_tests;

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;
