//! Users of the wallet and the rules for their usernames.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::models::PasswordHash;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The longest username accepted, in user-perceived characters.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Reasons a username is rejected. The messages are shown next to the form field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UsernameError {
    /// The username is empty or only whitespace.
    #[error("هذا الحقل مطلوب.")]
    Empty,

    /// The username is longer than [MAX_USERNAME_LENGTH].
    #[error("تأكد من أن هذه القيمة تحتوي على {MAX_USERNAME_LENGTH} حرفاً على الأكثر.")]
    TooLong,

    /// The username contains a character other than a letter, digit or `@.+-_`.
    #[error(
        "أدخل اسم مستخدم صالحاً. يمكن أن تحتوي هذه القيمة على أحرف وأرقام والرموز @/./+/-/_ فقط."
    )]
    InvalidCharacter,
}

/// A username that is not empty, at most [MAX_USERNAME_LENGTH] characters
/// long and made of letters, digits and `@ . + - _`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Validate a username typed by a user. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [UsernameError] describing why the username is invalid.
    pub fn new(raw_username: &str) -> Result<Self, UsernameError> {
        let username = raw_username.trim();

        if username.is_empty() {
            return Err(UsernameError::Empty);
        }

        if username.graphemes(true).count() > MAX_USERNAME_LENGTH {
            return Err(UsernameError::TooLong);
        }

        let is_allowed = |c: char| c.is_alphanumeric() || "@.+-_".contains(c);
        if !username.chars().all(is_allowed) {
            return Err(UsernameError::InvalidCharacter);
        }

        Ok(Self(username.to_owned()))
    }

    /// Wrap a username read from the database.
    pub fn new_unchecked(username: &str) -> Self {
        Self(username.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with and receives transfers by.
    pub username: Username,
    /// The user's e-mail address.
    pub email: EmailAddress,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// Whether the user may view the staff overview.
    pub is_staff: bool,
    /// When the user registered.
    pub date_joined: OffsetDateTime,
}

/// The details needed to register a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// Must not belong to another user.
    pub username: Username,
    /// The user's e-mail address.
    pub email: EmailAddress,
    /// The hash of the password chosen at registration.
    pub password_hash: PasswordHash,
    /// Only set for accounts created with the management tool.
    pub is_staff: bool,
}
