//! Alert kinds and the text sent to contacts for each.

use super::{TripId, User};

/// Why contacts are being alerted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    /// The user pressed the panic button during `trip_id`.
    Panic { trip_id: TripId },
    /// The user missed the check-in window.
    OverdueCheckIn,
}

impl Alert {
    /// Short label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Panic { .. } => "panic",
            Self::OverdueCheckIn => "overdue_check_in",
        }
    }

    /// Render the message body for `user`.
    ///
    /// # Examples
    /// ```
    /// use buddy_backend::domain::{Alert, EmailAddress, User, UserId, Username};
    ///
    /// let user = User::register(
    ///     UserId::random(),
    ///     Username::new("ada").expect("valid username"),
    ///     EmailAddress::new("ada@example.com").expect("valid email"),
    /// );
    /// let body = Alert::OverdueCheckIn.render(&user, "https://buddy.example/trips");
    /// assert!(body.starts_with("ada has not checked into a saved location"));
    /// ```
    #[must_use]
    pub fn render(&self, user: &User, trip_url_base: &str) -> String {
        match self {
            Self::Panic { trip_id } => format!(
                "{} has pressed the Panic Button on their Buddy App. For current location \
                 information, please visit {}/{trip_id}",
                user.username(),
                trip_url_base.trim_end_matches('/'),
            ),
            Self::OverdueCheckIn => format!(
                "{} has not checked into a saved location within the past {} hours. \
                 Consider checking in on them?",
                user.username(),
                user.check_in_period().hours(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;
    use crate::domain::{CheckInPeriod, EmailAddress, UserId, Username};

    #[fixture]
    fn user() -> User {
        User::register(
            UserId::random(),
            Username::new("ada").expect("valid username"),
            EmailAddress::new("ada@example.com").expect("valid email"),
        )
    }

    #[rstest]
    fn panic_message_links_to_trip(user: User) {
        let trip_id = TripId::from_uuid(Uuid::nil());
        let body = Alert::Panic { trip_id }.render(&user, "https://buddy.example/trips/");
        assert_eq!(
            body,
            "ada has pressed the Panic Button on their Buddy App. For current location \
             information, please visit \
             https://buddy.example/trips/00000000-0000-0000-0000-000000000000"
        );
    }

    #[rstest]
    fn overdue_message_quotes_user_period(mut user: User) {
        user.set_check_in_period(CheckInPeriod::from_hours(48).expect("valid period"));
        let body = Alert::OverdueCheckIn.render(&user, "unused");
        assert_eq!(
            body,
            "ada has not checked into a saved location within the past 48 hours. \
             Consider checking in on them?"
        );
    }
}
