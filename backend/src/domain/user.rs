//! User aggregate root.
//!
//! A user exclusively owns their trips, contacts and significant locations.
//! The check-in fields live here: `check_in_mode` opts the user into the
//! periodic overdue scan and `check_in_period` is shown to contacts in the
//! overdue message.

use std::fmt;

use chrono::{DateTime, Utc};

use super::UserId;

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 64;
/// Maximum email length in characters.
pub const EMAIL_MAX: usize = 120;
/// Smallest check-in period a user may select, in hours.
pub const MIN_CHECK_IN_PERIOD_HOURS: u32 = 24;

/// Validation errors raised by the user value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooLong { max: usize },
    EmptyEmail,
    EmailTooLong { max: usize },
    EmailMissingAt,
    CheckInPeriodTooShort { min: u32, got: u32 },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::EmailMissingAt => write!(f, "email must contain '@'"),
            Self::CheckInPeriodTooShort { min, got } => write!(
                f,
                "check-in period must be at least {min} hours (got {got})"
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Unique login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique contact email of the account holder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an email address.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !trimmed.contains('@') {
            return Err(UserValidationError::EmailMissingAt);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Advisory check-in period in hours.
///
/// The overdue scan enforces a fixed 24-hour window; this value is only
/// quoted in the overdue message and returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckInPeriod(u32);

impl CheckInPeriod {
    /// Validate and construct a period of `hours`.
    pub fn from_hours(hours: u32) -> Result<Self, UserValidationError> {
        if hours < MIN_CHECK_IN_PERIOD_HOURS {
            return Err(UserValidationError::CheckInPeriodTooShort {
                min: MIN_CHECK_IN_PERIOD_HOURS,
                got: hours,
            });
        }
        Ok(Self(hours))
    }

    /// Period length in hours.
    #[must_use]
    pub const fn hours(self) -> u32 {
        self.0
    }
}

impl Default for CheckInPeriod {
    fn default() -> Self {
        Self(MIN_CHECK_IN_PERIOD_HOURS)
    }
}

/// Application user.
///
/// ## Invariants
/// - `check_in_mode` is only switched on by the account service after it has
///   verified the user owns at least one contact and one significant location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    check_in_mode: bool,
    check_in_period: CheckInPeriod,
    last_check_in: Option<DateTime<Utc>>,
}

impl User {
    /// Build a freshly registered user with check-in mode off.
    ///
    /// # Examples
    /// ```
    /// use buddy_backend::domain::{EmailAddress, User, UserId, Username};
    ///
    /// let user = User::register(
    ///     UserId::random(),
    ///     Username::new("ada").expect("valid username"),
    ///     EmailAddress::new("ada@example.com").expect("valid email"),
    /// );
    /// assert!(!user.check_in_mode());
    /// assert_eq!(user.check_in_period().hours(), 24);
    /// ```
    #[must_use]
    pub fn register(id: UserId, username: Username, email: EmailAddress) -> Self {
        Self {
            id,
            username,
            email,
            check_in_mode: false,
            check_in_period: CheckInPeriod::default(),
            last_check_in: None,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn check_in_mode(&self) -> bool {
        self.check_in_mode
    }

    pub fn check_in_period(&self) -> CheckInPeriod {
        self.check_in_period
    }

    pub fn last_check_in(&self) -> Option<DateTime<Utc>> {
        self.last_check_in
    }

    pub fn set_username(&mut self, username: Username) {
        self.username = username;
    }

    pub fn set_email(&mut self, email: EmailAddress) {
        self.email = email;
    }

    pub fn set_check_in_period(&mut self, period: CheckInPeriod) {
        self.check_in_period = period;
    }

    pub fn set_check_in_mode(&mut self, enabled: bool) {
        self.check_in_mode = enabled;
    }

    pub fn record_check_in(&mut self, at: DateTime<Utc>) {
        self.last_check_in = Some(at);
    }

    /// True when the user is in check-in mode and last checked in strictly
    /// before `threshold`. Users who never checked in are not overdue.
    #[must_use]
    pub fn is_overdue(&self, threshold: DateTime<Utc>) -> bool {
        self.check_in_mode && self.last_check_in.is_some_and(|at| at < threshold)
    }
}
