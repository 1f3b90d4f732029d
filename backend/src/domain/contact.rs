//! Emergency contacts.
//!
//! Each contact belongs to exactly one user and is never shared. Alerts are
//! delivered to the contact's phone number after normalising it to a single
//! `+<country><digits>` form.

use std::fmt;

use super::{ContactId, UserId};

/// Validation errors raised while building or editing a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    MissingFields { fields: Vec<&'static str> },
    BlankName,
    BlankEmail,
    InvalidPhone { value: String },
}

impl fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields { fields } => write!(
                f,
                "please fill out the name, phone number, and email fields (missing: {})",
                fields.join(", ")
            ),
            Self::BlankName => write!(f, "contact name must not be blank"),
            Self::BlankEmail => write!(f, "contact email must not be blank"),
            Self::InvalidPhone { value } => {
                write!(f, "phone number '{value}' must contain only digits")
            }
        }
    }
}

impl std::error::Error for ContactValidationError {}

/// A phone number as entered, reduced to its digits.
///
/// # Examples
/// ```
/// use buddy_backend::domain::PhoneNumber;
///
/// let local = PhoneNumber::parse("(206) 555-0100").expect("valid phone");
/// assert_eq!(local.normalized("+1"), "+12065550100");
///
/// let intl = PhoneNumber::parse("+44 20 7946 0958").expect("valid phone");
/// assert_eq!(intl.normalized("+1"), "+442079460958");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber {
    digits: String,
    international: bool,
}

impl PhoneNumber {
    /// Parse user input, accepting common separators and a leading `+`.
    pub fn parse(raw: &str) -> Result<Self, ContactValidationError> {
        let trimmed = raw.trim();
        let (international, rest) = match trimmed.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let invalid = || ContactValidationError::InvalidPhone {
            value: raw.to_owned(),
        };
        if rest
            .chars()
            .any(|c| !(c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '.')))
        {
            return Err(invalid());
        }
        let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            digits,
            international,
        })
    }

    /// Digits as stored, without any country prefix.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Country-code-prefixed form used by the notification channel.
    ///
    /// Numbers entered with a leading `+` already carry their country code.
    #[must_use]
    pub fn normalized(&self, default_country_code: &str) -> String {
        if self.international {
            return format!("+{}", self.digits);
        }
        let code = default_country_code.trim().trim_start_matches('+');
        format!("+{code}{}", self.digits)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.international {
            write!(f, "+{}", self.digits)
        } else {
            f.write_str(&self.digits)
        }
    }
}

/// Partially supplied contact fields, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Emergency contact owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    id: ContactId,
    user_id: UserId,
    name: String,
    phone: PhoneNumber,
    email: String,
}

impl Contact {
    /// Build a contact; name, phone and email are all required.
    pub fn create(
        id: ContactId,
        user_id: UserId,
        fields: ContactFields,
    ) -> Result<Self, ContactValidationError> {
        let ContactFields { name, phone, email } = fields;
        let missing: Vec<&'static str> = [
            ("name", name.is_none()),
            ("phone", phone.is_none()),
            ("email", email.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        match (name, phone, email) {
            (Some(name), Some(phone), Some(email)) => Ok(Self {
                id,
                user_id,
                name: non_blank(name, ContactValidationError::BlankName)?,
                phone: PhoneNumber::parse(&phone)?,
                email: non_blank(email, ContactValidationError::BlankEmail)?,
            }),
            _ => Err(ContactValidationError::MissingFields { fields: missing }),
        }
    }

    /// Apply the supplied fields, leaving absent ones untouched.
    ///
    /// Validation runs on every field before any is written, so a rejected
    /// update leaves the contact unchanged.
    pub fn apply(&mut self, fields: ContactFields) -> Result<(), ContactValidationError> {
        let name = fields
            .name
            .map(|name| non_blank(name, ContactValidationError::BlankName))
            .transpose()?;
        let phone = fields
            .phone
            .as_deref()
            .map(PhoneNumber::parse)
            .transpose()?;
        let email = fields
            .email
            .map(|email| non_blank(email, ContactValidationError::BlankEmail))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(email) = email {
            self.email = email;
        }
        Ok(())
    }

    pub fn id(&self) -> ContactId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

fn non_blank(value: String, error: ContactValidationError) -> Result<String, ContactValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}
