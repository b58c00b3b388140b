//! Signup form state controller.
//!
//! Fields move from untouched to touched on blur. A change only re-validates a field that
//! is already touched, so errors do not flash while the user is still typing. Changing the
//! password also re-checks a touched, non-empty confirmation to keep the mismatch current.

use std::any::Any;
use std::fmt::{Debug, Formatter};

use log::info;
use taskflow_states::{State, state_assign_impl};

use crate::api::RegisterRequest;
use crate::validation::{Field, FieldErrors, TouchedSet, validate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Changed(Field, String),
    Blurred(Field),
    Reset,
}

#[derive(Clone, Default)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    touched: TouchedSet,
    errors: FieldErrors,
    submitting: bool,
}

impl Debug for SignupForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupForm")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("touched", &self.touched)
            .field("errors", &self.errors)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

impl SignupForm {
    pub fn apply(&mut self, event: FormEvent) {
        match event {
            FormEvent::Changed(field, value) => self.change(field, value),
            FormEvent::Blurred(field) => self.blur(field),
            FormEvent::Reset => *self = Self::default(),
        }
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::FullName => Some(&self.full_name),
            Field::Email => Some(&self.email),
            Field::Password => Some(&self.password),
            Field::ConfirmPassword => Some(&self.confirm_password),
            Field::DisplayName => None,
        }
    }

    fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::FullName => Some(&mut self.full_name),
            Field::Email => Some(&mut self.email),
            Field::Password => Some(&mut self.password),
            Field::ConfirmPassword => Some(&mut self.confirm_password),
            Field::DisplayName => None,
        }
    }

    fn change(&mut self, field: Field, value: String) {
        let Some(slot) = self.value_mut(field) else {
            return;
        };
        *slot = value;

        if self.touched.contains(&field) {
            self.revalidate(field);
        }

        if field == Field::Password
            && self.touched.contains(&Field::ConfirmPassword)
            && !self.confirm_password.is_empty()
        {
            self.revalidate(Field::ConfirmPassword);
        }
    }

    fn blur(&mut self, field: Field) {
        if self.value(field).is_none() {
            return;
        }
        self.touched.insert(field);
        self.revalidate(field);
    }

    fn revalidate(&mut self, field: Field) {
        let error = self
            .value(field)
            .and_then(|value| validate(field, value, &self.password));

        match error {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    /// The error to display for `field`. Untouched fields never show one.
    pub fn error_for(&self, field: Field) -> Option<&str> {
        if !self.touched.contains(&field) {
            return None;
        }
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    pub fn touched(&self) -> &TouchedSet {
        &self.touched
    }

    /// Force every field into the touched set and validate it. Returns whether the form is valid.
    pub fn validate_all(&mut self) -> bool {
        for field in Field::SIGNUP {
            self.touched.insert(field);
            self.revalidate(field);
        }
        self.errors.is_empty()
    }

    /// Validity without touching anything.
    pub fn is_valid(&self) -> bool {
        Field::SIGNUP.into_iter().all(|field| {
            self.value(field)
                .is_none_or(|value| validate(field, value, &self.password).is_none())
        })
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting
    }

    /// Validating step of a submit. Returns `true` when the request should be sent, in
    /// which case the form stays locked until [`SignupForm::finish_submit`].
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            info!("SignupForm: submit ignored, a request is already in flight");
            return false;
        }
        if !self.validate_all() {
            info!(
                "SignupForm: submit blocked by {} invalid field(s)",
                self.errors.len()
            );
            return false;
        }
        self.submitting = true;
        true
    }

    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            display_name: self.full_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
        }
    }
}

impl State for SignupForm {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(form: &mut SignupForm, field: Field, value: &str) {
        form.apply(FormEvent::Changed(field, value.to_owned()));
    }

    fn filled() -> SignupForm {
        let mut form = SignupForm::default();
        change(&mut form, Field::FullName, "Ada Lovelace");
        change(&mut form, Field::Email, "ada@example.com");
        change(&mut form, Field::Password, "Secret123!");
        change(&mut form, Field::ConfirmPassword, "Secret123!");
        form
    }

    #[test]
    fn changes_before_blur_do_not_show_errors() {
        let mut form = SignupForm::default();
        change(&mut form, Field::Email, "not-an-email");

        assert_eq!(form.error_for(Field::Email), None);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn blur_marks_touched_and_validates() {
        let mut form = SignupForm::default();
        change(&mut form, Field::Email, "not-an-email");
        form.apply(FormEvent::Blurred(Field::Email));

        assert!(form.is_touched(Field::Email));
        assert_eq!(
            form.error_for(Field::Email),
            Some("Please enter a valid email address")
        );

        change(&mut form, Field::Email, "ada@example.com");
        assert_eq!(form.error_for(Field::Email), None, "touched fields re-validate on change");
    }

    #[test]
    fn password_change_revalidates_touched_confirmation() {
        let mut form = filled();
        form.apply(FormEvent::Blurred(Field::ConfirmPassword));
        assert_eq!(form.error_for(Field::ConfirmPassword), None);

        change(&mut form, Field::Password, "Different1!");
        assert_eq!(
            form.error_for(Field::ConfirmPassword),
            Some("Passwords do not match")
        );

        change(&mut form, Field::Password, "Secret123!");
        assert_eq!(form.error_for(Field::ConfirmPassword), None);
    }

    #[test]
    fn password_change_ignores_untouched_confirmation() {
        let mut form = filled();
        change(&mut form, Field::Password, "Different1!");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn errors_only_exist_for_touched_fields() {
        let mut form = SignupForm::default();
        change(&mut form, Field::Password, "x");
        form.apply(FormEvent::Blurred(Field::FullName));

        for field in form.errors().keys() {
            assert!(form.is_touched(*field));
        }
        assert_eq!(form.errors().len(), 1);
    }

    #[test]
    fn begin_submit_with_empty_name_is_rejected() {
        let mut form = filled();
        change(&mut form, Field::FullName, "");

        assert!(!form.begin_submit());
        assert!(!form.is_submitting());
        assert_eq!(form.error_for(Field::FullName), Some("Full name is required"));
        assert_eq!(form.touched().len(), 4, "every field is forced into touched");
    }

    #[test]
    fn begin_submit_locks_until_finished() {
        let mut form = filled();

        assert!(form.begin_submit());
        assert!(!form.can_submit());
        assert!(!form.begin_submit(), "second submit is ignored");

        form.finish_submit();
        assert!(form.can_submit());
    }

    #[test]
    fn is_valid_does_not_touch_fields() {
        let form = filled();
        assert!(form.is_valid());
        assert!(form.touched().is_empty());
        assert!(!SignupForm::default().is_valid());
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = filled();
        form.validate_all();
        form.apply(FormEvent::Reset);

        assert!(form.full_name.is_empty());
        assert!(form.touched().is_empty());
    }

    #[test]
    fn display_name_is_not_a_signup_field() {
        let mut form = SignupForm::default();
        change(&mut form, Field::DisplayName, "ignored");
        form.apply(FormEvent::Blurred(Field::DisplayName));
        assert!(form.touched().is_empty());
    }

    #[test]
    fn request_trims_names_but_not_password() {
        let mut form = filled();
        change(&mut form, Field::FullName, "  Ada  ");
        change(&mut form, Field::Password, " pass word ");

        let request = form.to_request();
        assert_eq!(request.display_name, "Ada");
        assert_eq!(request.password, " pass word ");
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", filled());
        assert!(!rendered.contains("Secret123!"));
    }
}
