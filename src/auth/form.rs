//! Login and signup forms

use thiserror::Error;

/// Longest value any input field accepts
pub const MAX_FIELD_LEN: usize = 50;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Which form the auth screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

/// An input field of either form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Email,
    Password,
    Confirm,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Username => "Username",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::Confirm => "Confirm Password",
        }
    }

    /// Rendered as asterisks
    pub fn is_secret(&self) -> bool {
        matches!(self, Field::Password | Field::Confirm)
    }
}

/// Why a form was rejected before reaching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Username must be at least {} characters", MIN_USERNAME_LEN)]
    UsernameTooShort,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub const FIELDS: &'static [Field] = &[Field::Username, Field::Password];

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

impl SignupForm {
    pub const FIELDS: &'static [Field] = &[
        Field::Username,
        Field::Email,
        Field::Password,
        Field::Confirm,
    ];

    pub fn validate(&self) -> Result<(), ValidationError> {
        let username = self.username.trim();
        let email = self.email.trim();

        if username.is_empty() || email.is_empty() || self.password.is_empty() || self.confirm.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(ValidationError::UsernameTooShort);
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.password != self.confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

/// The form currently on screen, one fixed struct per mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthForm {
    Login(LoginForm),
    Signup(SignupForm),
}

impl AuthForm {
    pub fn empty(mode: AuthMode) -> Self {
        match mode {
            AuthMode::Login => AuthForm::Login(LoginForm::default()),
            AuthMode::Signup => AuthForm::Signup(SignupForm::default()),
        }
    }

    pub fn mode(&self) -> AuthMode {
        match self {
            AuthForm::Login(_) => AuthMode::Login,
            AuthForm::Signup(_) => AuthMode::Signup,
        }
    }

    /// Fields in focus order
    pub fn fields(&self) -> &'static [Field] {
        match self {
            AuthForm::Login(_) => LoginForm::FIELDS,
            AuthForm::Signup(_) => SignupForm::FIELDS,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match (self, field) {
            (AuthForm::Login(form), Field::Username) => &form.username,
            (AuthForm::Login(form), Field::Password) => &form.password,
            (AuthForm::Signup(form), Field::Username) => &form.username,
            (AuthForm::Signup(form), Field::Email) => &form.email,
            (AuthForm::Signup(form), Field::Password) => &form.password,
            (AuthForm::Signup(form), Field::Confirm) => &form.confirm,
            (AuthForm::Login(_), Field::Email | Field::Confirm) => "",
        }
    }

    pub fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        match (self, field) {
            (AuthForm::Login(form), Field::Username) => Some(&mut form.username),
            (AuthForm::Login(form), Field::Password) => Some(&mut form.password),
            (AuthForm::Signup(form), Field::Username) => Some(&mut form.username),
            (AuthForm::Signup(form), Field::Email) => Some(&mut form.email),
            (AuthForm::Signup(form), Field::Password) => Some(&mut form.password),
            (AuthForm::Signup(form), Field::Confirm) => Some(&mut form.confirm),
            (AuthForm::Login(_), Field::Email | Field::Confirm) => None,
        }
    }
}

/// A single `@` with a non-empty local part and a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((name, tld)) => !name.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}
