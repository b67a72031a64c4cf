//! Structured ride request parameters.

use crate::builder::DeeplinkBuilder;
use crate::Result;
use rides_core::Error;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A pickup or dropoff location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_coordinates"))]
pub struct Location {
    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,

    /// Display nickname, e.g. "Home"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    /// Formatted street address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

fn validate_coordinates(location: &Location) -> std::result::Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&location.latitude) {
        return Err(ValidationError::new("latitude_out_of_range"));
    }
    if !(-180.0..=180.0).contains(&location.longitude) {
        return Err(ValidationError::new("longitude_out_of_range"));
    }
    Ok(())
}

impl Location {
    /// Create a location from coordinates.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            nickname: None,
            address: None,
        }
    }

    /// Set the nickname.
    #[must_use]
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Set the formatted address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Ride request description applied to a [`DeeplinkBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RideParameters {
    /// Explicit pickup location
    #[validate(nested)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup: Option<Location>,

    /// Request pickup at the rider's current location
    #[serde(default)]
    pub use_current_location: bool,

    /// Dropoff location
    #[validate(nested)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff: Option<Location>,

    /// Product id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl RideParameters {
    /// Create empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate parameters from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a coordinate is out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Set an explicit pickup location.
    #[must_use]
    pub fn with_pickup(mut self, location: Location) -> Self {
        self.pickup = Some(location);
        self
    }

    /// Request pickup at the rider's current location.
    #[must_use]
    pub const fn with_current_location(mut self) -> Self {
        self.use_current_location = true;
        self
    }

    /// Set the dropoff location.
    #[must_use]
    pub fn with_dropoff(mut self, location: Location) -> Self {
        self.dropoff = Some(location);
        self
    }

    /// Set the product id.
    #[must_use]
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Apply the parameters to `builder`.
    ///
    /// An explicit pickup takes precedence over the current location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a coordinate is out of range; the builder
    /// is left untouched in that case.
    pub fn apply_to(&self, builder: &mut DeeplinkBuilder) -> Result<()> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid ride parameters: {e}")))?;

        if let Some(pickup) = &self.pickup {
            builder.set_pickup_location(
                pickup.latitude,
                pickup.longitude,
                pickup.nickname.as_deref(),
                pickup.address.as_deref(),
            );
        } else if self.use_current_location {
            builder.set_pickup_location_to_current_location();
        }

        if let Some(dropoff) = &self.dropoff {
            builder.set_dropoff_location(
                dropoff.latitude,
                dropoff.longitude,
                dropoff.nickname.as_deref(),
                dropoff.address.as_deref(),
            );
        }

        if let Some(product_id) = &self.product_id {
            builder.set_product_id(product_id);
        }

        Ok(())
    }
}
