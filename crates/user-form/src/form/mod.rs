//! The registration / profile edit form.
//!
//! [`UserForm`] owns one [`FormField`] per input. Every [`UserForm::set_field`]
//! re-validates the touched field; [`UserForm::submit`] re-validates them all
//! and only then calls the gateway.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::GatewayError;
use crate::field::{FormField, Rules};
use crate::gateway::UserGateway;
use crate::model::{Gender, UserPayload, UserProfile};
use crate::validation::{
    LOGIN_MAX, LOGIN_MIN, NAME_MAX, PASSWORD_MIN, validate_birthday, validate_confirmation,
    validate_gender, validate_login, validate_name, validate_password,
};

/// Form error shown when the login is already taken.
pub const CONFLICT_MESSAGE: &str = "This login is already taken, try another one";
/// Form error shown for every other submit failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong, try again later";

const DATE_PATTERN: &str = "%Y-%m-%d";

/// Inputs of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    /// Login.
    Login,
    /// Primary password.
    Password,
    /// Password confirmation.
    Confirmation,
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Gender radio group.
    Gender,
    /// Date of birth.
    Birthday,
}

impl FieldId {
    /// Every field in display order.
    pub const ALL: [Self; 7] = [
        Self::LastName,
        Self::FirstName,
        Self::Login,
        Self::Password,
        Self::Confirmation,
        Self::Gender,
        Self::Birthday,
    ];

    /// Input `name` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Password => "password",
            Self::Confirmation => "confirmation",
            Self::FirstName => "first-name",
            Self::LastName => "last-name",
            Self::Gender => "gender",
            Self::Birthday => "birthday",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown field {s:?}"))
    }
}

/// Which job the form is doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// New account: password and confirmation are shown and required.
    Register,
    /// Editing the given profile: fields start pre-populated and the password
    /// section stays hidden until [`UserForm::set_change_password`].
    Edit(UserProfile),
}

/// Screen the host UI should show after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Login screen, after registration.
    Login,
    /// Profile screen, after an edit.
    Profile,
}

/// Result of [`UserForm::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Some field failed validation; nothing was sent.
    Invalid,
    /// The service accepted the request.
    Navigate(View),
    /// The service rejected the request; the message is also in
    /// [`UserForm::form_error`].
    Failed(String),
}

/// Field state and submit logic for registration and profile edits.
#[derive(Debug, Clone)]
pub struct UserForm {
    mode: FormMode,
    change_password: bool,
    login: FormField<String>,
    password: FormField<String>,
    confirmation: FormField<String>,
    first_name: FormField<String>,
    last_name: FormField<String>,
    gender: FormField<Option<Gender>>,
    birthday: FormField<String>,
    form_error: Option<String>,
}

fn password_rules(required: bool) -> Rules {
    let rules = if required {
        Rules::required()
    } else {
        Rules::optional()
    };
    rules.with_min_length(PASSWORD_MIN)
}

fn confirmation_rules(required: bool, password: &str) -> Rules {
    let rules = if required {
        Rules::required()
    } else {
        Rules::optional()
    };
    rules.with_must_equal(password)
}

impl UserForm {
    /// Build a form for the given mode.
    #[must_use]
    pub fn new(mode: FormMode) -> Self {
        let (login, first_name, last_name, gender, birthday) = match &mode {
            FormMode::Register => (
                String::new(),
                String::new(),
                String::new(),
                None,
                String::new(),
            ),
            FormMode::Edit(profile) => (
                profile.login.clone(),
                profile.first_name.clone(),
                profile.last_name.clone(),
                Some(profile.gender),
                profile.birthday.format(DATE_PATTERN).to_string(),
            ),
        };
        let password_required = matches!(mode, FormMode::Register);

        Self {
            login: FormField::new(
                FieldId::Login.as_str(),
                login,
                Rules::required()
                    .with_min_length(LOGIN_MIN)
                    .with_max_length(LOGIN_MAX),
                |value: &String, rules: &Rules| validate_login(value, rules),
            ),
            password: FormField::new(
                FieldId::Password.as_str(),
                String::new(),
                password_rules(password_required),
                |value: &String, rules: &Rules| validate_password(value, rules),
            ),
            confirmation: FormField::new(
                FieldId::Confirmation.as_str(),
                String::new(),
                confirmation_rules(password_required, ""),
                |value: &String, rules: &Rules| validate_confirmation(value, rules),
            ),
            first_name: FormField::new(
                FieldId::FirstName.as_str(),
                first_name,
                Rules::required().with_max_length(NAME_MAX),
                |value: &String, rules: &Rules| validate_name(value, rules),
            ),
            last_name: FormField::new(
                FieldId::LastName.as_str(),
                last_name,
                Rules::required().with_max_length(NAME_MAX),
                |value: &String, rules: &Rules| validate_name(value, rules),
            ),
            gender: FormField::new(
                FieldId::Gender.as_str(),
                gender,
                Rules::required(),
                validate_gender,
            ),
            birthday: FormField::new(
                FieldId::Birthday.as_str(),
                birthday,
                Rules::required(),
                |value: &String, rules: &Rules| validate_birthday(value, rules),
            ),
            mode,
            change_password: false,
            form_error: None,
        }
    }

    /// Build an edit form pre-populated with the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns the gateway error when the profile cannot be fetched.
    pub async fn load(gateway: &dyn UserGateway) -> Result<Self, GatewayError> {
        let profile = gateway.current_profile().await?;
        Ok(Self::new(FormMode::Edit(profile)))
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Whether the password and confirmation inputs are shown.
    #[must_use]
    pub const fn password_visible(&self) -> bool {
        matches!(self.mode, FormMode::Register) || self.change_password
    }

    /// Update a field from its raw input and re-run its validator.
    ///
    /// Gender accepts `male` or `female`; anything else clears the selection.
    /// Changing the password re-validates a confirmation that was already
    /// typed.
    pub fn set_field(&mut self, id: FieldId, value: &str) {
        match id {
            FieldId::Login => self.login.set(value.to_owned()),
            FieldId::Password => {
                self.password.set(value.to_owned());
                self.sync_confirmation();
            }
            FieldId::Confirmation => self.confirmation.set(value.to_owned()),
            FieldId::FirstName => self.first_name.set(value.to_owned()),
            FieldId::LastName => self.last_name.set(value.to_owned()),
            FieldId::Gender => self.gender.set(value.parse().ok()),
            FieldId::Birthday => self.birthday.set(value.to_owned()),
        }
    }

    /// Show or hide the password section of an edit form.
    ///
    /// Showing it makes the password required; hiding it discards whatever
    /// was typed. Registration always shows the section.
    pub fn set_change_password(&mut self, enabled: bool) {
        if matches!(self.mode, FormMode::Register) {
            return;
        }
        self.change_password = enabled;
        if !enabled {
            self.password.clear();
            self.confirmation.clear();
        }
        self.password.replace_rules(password_rules(enabled));
        self.sync_confirmation();
    }

    /// Keep the confirmation's `must_equal` in step with the password; an
    /// empty confirmation is not re-validated so it shows no premature error.
    fn sync_confirmation(&mut self) {
        let rules = confirmation_rules(self.password_visible(), self.password.value());
        if self.confirmation.value().is_empty() {
            self.confirmation.replace_rules(rules);
        } else {
            self.confirmation.set_rules(rules);
        }
    }

    /// Last validation error for a field; empty when valid or hidden.
    #[must_use]
    pub fn error(&self, id: FieldId) -> &str {
        match id {
            FieldId::Password | FieldId::Confirmation if !self.password_visible() => "",
            FieldId::Login => self.login.error(),
            FieldId::Password => self.password.error(),
            FieldId::Confirmation => self.confirmation.error(),
            FieldId::FirstName => self.first_name.error(),
            FieldId::LastName => self.last_name.error(),
            FieldId::Gender => self.gender.error(),
            FieldId::Birthday => self.birthday.error(),
        }
    }

    /// Current raw value of a field.
    #[must_use]
    pub fn value(&self, id: FieldId) -> String {
        match id {
            FieldId::Login => self.login.value().clone(),
            FieldId::Password => self.password.value().clone(),
            FieldId::Confirmation => self.confirmation.value().clone(),
            FieldId::FirstName => self.first_name.value().clone(),
            FieldId::LastName => self.last_name.value().clone(),
            FieldId::Gender => self
                .gender
                .value()
                .map(|gender| gender.as_str().to_owned())
                .unwrap_or_default(),
            FieldId::Birthday => self.birthday.value().clone(),
        }
    }

    /// Form-level error from the last failed submit.
    #[must_use]
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    /// Re-validate every shown field and report whether all pass.
    ///
    /// Untouched required fields report their error afterwards.
    pub fn is_valid(&mut self) -> bool {
        let mut valid = true;
        for field in [
            &mut self.login,
            &mut self.first_name,
            &mut self.last_name,
            &mut self.birthday,
        ] {
            valid &= field.validate() && field.is_satisfied();
        }
        valid &= self.gender.validate() && self.gender.is_satisfied();
        if self.password_visible() {
            for field in [&mut self.password, &mut self.confirmation] {
                valid &= field.validate() && field.is_satisfied();
            }
        }
        valid
    }

    /// Request body from the current values.
    ///
    /// The password is left out when editing without changing it. Returns
    /// `None` while no gender is selected.
    #[must_use]
    pub fn payload(&self) -> Option<UserPayload> {
        let gender = (*self.gender.value())?;
        let password = (self.password_visible() && !self.password.value().is_empty())
            .then(|| self.password.value().clone());
        Some(UserPayload {
            login: self.login.value().trim().to_owned(),
            password,
            first_name: self.first_name.value().trim().to_owned(),
            last_name: self.last_name.value().trim().to_owned(),
            gender,
            birthday: self.birthday.value().trim().to_owned(),
        })
    }

    /// Validate and, if everything passes, create or update the user.
    pub async fn submit(&mut self, gateway: &dyn UserGateway) -> SubmitOutcome {
        if !self.is_valid() {
            debug!("submit skipped: form invalid");
            return SubmitOutcome::Invalid;
        }
        let Some(payload) = self.payload() else {
            return SubmitOutcome::Invalid;
        };

        let (result, next) = match &self.mode {
            FormMode::Register => (gateway.create(&payload).await, View::Login),
            FormMode::Edit(profile) => (gateway.update(&profile.id, &payload).await, View::Profile),
        };

        match result {
            Ok(()) => {
                self.form_error = None;
                SubmitOutcome::Navigate(next)
            }
            Err(err) => {
                let message = match err {
                    GatewayError::Conflict => CONFLICT_MESSAGE,
                    GatewayError::Other { .. } => {
                        warn!(error = %err, "user submit failed");
                        GENERIC_FAILURE_MESSAGE
                    }
                };
                self.form_error = Some(message.to_owned());
                SubmitOutcome::Failed(message.to_owned())
            }
        }
    }
}
