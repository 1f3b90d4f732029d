//! Significant (trusted) locations a user can check in from.
//!
//! Duplicate detection compares coordinates by their submitted text, not by
//! numeric value: `"47.6"` and `"47.60"` are different coordinates here.

use std::fmt;

use super::{LocationId, UserId};

/// Validation errors raised while building a significant location.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationValidationError {
    MissingFields { fields: Vec<&'static str> },
    BlankAddress,
    InvalidCoordinate { field: &'static str, value: String },
    OutOfRange { field: &'static str, value: f64 },
}

impl fmt::Display for LocationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields { fields } => write!(
                f,
                "valid address needed to save as a check-in location (missing: {})",
                fields.join(", ")
            ),
            Self::BlankAddress => write!(f, "address must not be blank"),
            Self::InvalidCoordinate { field, value } => {
                write!(f, "{field} must be a decimal number (got '{value}')")
            }
            Self::OutOfRange { field, value } => {
                write!(f, "{field} is out of range (got {value})")
            }
        }
    }
}

impl std::error::Error for LocationValidationError {}

/// Which axis a coordinate belongs to; drives range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    const fn field(self) -> &'static str {
        match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        }
    }

    const fn limit(self) -> f64 {
        match self {
            Self::Latitude => 90.0,
            Self::Longitude => 180.0,
        }
    }
}

/// A single coordinate keeping the text it was submitted as.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    text: String,
    degrees: f64,
}

impl Coordinate {
    /// Parse a coordinate for `axis`.
    ///
    /// # Examples
    /// ```
    /// use buddy_backend::domain::{Axis, Coordinate};
    ///
    /// let lat = Coordinate::parse("47.6062", Axis::Latitude).expect("valid latitude");
    /// assert_eq!(lat.text(), "47.6062");
    /// assert!(Coordinate::parse("91", Axis::Latitude).is_err());
    /// ```
    pub fn parse(raw: &str, axis: Axis) -> Result<Self, LocationValidationError> {
        let text = raw.trim();
        let degrees: f64 = text
            .parse()
            .map_err(|_| LocationValidationError::InvalidCoordinate {
                field: axis.field(),
                value: raw.to_owned(),
            })?;
        if !degrees.is_finite() || degrees.abs() > axis.limit() {
            return Err(LocationValidationError::OutOfRange {
                field: axis.field(),
                value: degrees,
            });
        }
        Ok(Self {
            text: text.to_owned(),
            degrees,
        })
    }

    /// Text as submitted (trimmed).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed value in decimal degrees.
    pub fn degrees(&self) -> f64 {
        self.degrees
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub latitude: Coordinate,
    pub longitude: Coordinate,
}

impl GeoPoint {
    /// Parse both axes.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, LocationValidationError> {
        Ok(Self {
            latitude: Coordinate::parse(latitude, Axis::Latitude)?,
            longitude: Coordinate::parse(longitude, Axis::Longitude)?,
        })
    }

    /// Textual equality on both axes.
    #[must_use]
    pub fn same_text(&self, other: &Self) -> bool {
        self.latitude.text() == other.latitude.text()
            && self.longitude.text() == other.longitude.text()
    }
}

/// Raw fields submitted when saving a location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationFields {
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Trusted location owned by one user.
#[derive(Debug, Clone, PartialEq)]
pub struct SignificantLocation {
    id: LocationId,
    user_id: UserId,
    address: String,
    point: GeoPoint,
}

impl SignificantLocation {
    /// Build a location; address, latitude and longitude are all required.
    pub fn create(
        id: LocationId,
        user_id: UserId,
        fields: LocationFields,
    ) -> Result<Self, LocationValidationError> {
        let LocationFields {
            address,
            latitude,
            longitude,
        } = fields;
        let (Some(address), Some(latitude), Some(longitude)) = (&address, &latitude, &longitude)
        else {
            let fields = [
                ("address", address.is_none()),
                ("latitude", latitude.is_none()),
                ("longitude", longitude.is_none()),
            ]
            .into_iter()
            .filter_map(|(field, absent)| absent.then_some(field))
            .collect();
            return Err(LocationValidationError::MissingFields { fields });
        };

        let address = address.trim();
        if address.is_empty() {
            return Err(LocationValidationError::BlankAddress);
        }
        Ok(Self {
            id,
            user_id,
            address: address.to_owned(),
            point: GeoPoint::parse(latitude, longitude)?,
        })
    }

    /// Overwrite the supplied fields; an axis left out keeps its text.
    pub fn apply(&mut self, fields: LocationFields) -> Result<(), LocationValidationError> {
        let address = match fields.address {
            Some(address) if address.trim().is_empty() => {
                return Err(LocationValidationError::BlankAddress);
            }
            Some(address) => Some(address.trim().to_owned()),
            None => None,
        };
        let point = match (fields.latitude, fields.longitude) {
            (None, None) => None,
            (latitude, longitude) => Some(GeoPoint::parse(
                latitude.as_deref().unwrap_or(self.point.latitude.text()),
                longitude.as_deref().unwrap_or(self.point.longitude.text()),
            )?),
        };

        if let Some(address) = address {
            self.address = address;
        }
        if let Some(point) = point {
            self.point = point;
        }
        Ok(())
    }

    /// True when `other` repeats this location's address or its exact
    /// coordinate text.
    #[must_use]
    pub fn duplicates(&self, other: &Self) -> bool {
        self.address == other.address || self.point.same_text(&other.point)
    }

    pub fn id(&self) -> LocationId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn point(&self) -> &GeoPoint {
        &self.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn fields(address: &str, latitude: &str, longitude: &str) -> LocationFields {
        LocationFields {
            address: Some(address.to_owned()),
            latitude: Some(latitude.to_owned()),
            longitude: Some(longitude.to_owned()),
        }
    }

    #[fixture]
    fn home() -> SignificantLocation {
        SignificantLocation::create(
            LocationId::random(),
            UserId::random(),
            fields("1 Main St", "47.6062", "-122.3321"),
        )
        .expect("valid location")
    }

    fn candidate(address: &str, latitude: &str, longitude: &str) -> SignificantLocation {
        SignificantLocation::create(
            LocationId::random(),
            UserId::random(),
            fields(address, latitude, longitude),
        )
        .expect("valid location")
    }

    #[rstest]
    fn create_reports_missing_fields() {
        let err = SignificantLocation::create(
            LocationId::random(),
            UserId::random(),
            LocationFields {
                address: Some("1 Main St".to_owned()),
                ..LocationFields::default()
            },
        )
        .expect_err("missing coordinates");
        assert_eq!(
            err,
            LocationValidationError::MissingFields {
                fields: vec!["latitude", "longitude"]
            }
        );
    }

    #[rstest]
    #[case("1 Main St", "0", "0", true)]
    #[case("2 Side St", "47.6062", "-122.3321", true)]
    #[case("2 Side St", "47.6062", "0", false)]
    #[case("2 Side St", "47.60620", "-122.3321", false)]
    fn duplicates_by_address_or_coordinate_text(
        home: SignificantLocation,
        #[case] address: &str,
        #[case] latitude: &str,
        #[case] longitude: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(home.duplicates(&candidate(address, latitude, longitude)), expected);
    }

    #[rstest]
    fn apply_keeps_the_untouched_axis(mut home: SignificantLocation) {
        home.apply(LocationFields {
            latitude: Some("47.61".to_owned()),
            ..LocationFields::default()
        })
        .expect("valid edit");
        assert_eq!(home.address(), "1 Main St");
        assert_eq!(home.point().latitude.text(), "47.61");
        assert_eq!(home.point().longitude.text(), "-122.3321");
    }

    #[rstest]
    fn apply_rejects_a_blank_address_without_changes(mut home: SignificantLocation) {
        let before = home.clone();
        let err = home
            .apply(LocationFields {
                address: Some("  ".to_owned()),
                latitude: Some("10".to_owned()),
                ..LocationFields::default()
            })
            .expect_err("blank address");
        assert_eq!(err, LocationValidationError::BlankAddress);
        assert_eq!(home, before);
    }

    #[rstest]
    #[case("north", Axis::Latitude)]
    #[case("90.5", Axis::Latitude)]
    #[case("-180.1", Axis::Longitude)]
    #[case("NaN", Axis::Longitude)]
    fn coordinate_rejects_invalid_values(#[case] raw: &str, #[case] axis: Axis) {
        assert!(Coordinate::parse(raw, axis).is_err());
    }
}
