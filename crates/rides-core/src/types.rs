//! Core deeplink domain types.
//!
//! This module provides the closed set of query parameters understood by the
//! rides application and their fixed wire-format keys.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Scheme of the produced deeplink URI.
pub const DEEPLINK_SCHEME: &str = "uber";
/// Action value marking a pickup location update.
pub const ACTION_SET_PICKUP: &str = "setPickup";
/// Pickup value requesting the rider's current location.
pub const PICKUP_MY_LOCATION: &str = "my_location";

/// Supported deeplink query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryParameterName {
    /// Action to perform when the app opens
    Action,
    /// Registered client id
    ClientId,
    /// Product (vehicle type) id
    ProductId,
    /// Pickup defaulting marker (`my_location`)
    PickupDefault,
    /// Pickup latitude
    PickupLatitude,
    /// Pickup longitude
    PickupLongitude,
    /// Pickup nickname
    PickupNickname,
    /// Pickup formatted address
    PickupAddress,
    /// Dropoff latitude
    DropoffLatitude,
    /// Dropoff longitude
    DropoffLongitude,
    /// Dropoff nickname
    DropoffNickname,
    /// Dropoff formatted address
    DropoffAddress,
}

impl QueryParameterName {
    /// Returns the wire-format query key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::ClientId => "client_id",
            Self::ProductId => "product_id",
            Self::PickupDefault => "pickup",
            Self::PickupLatitude => "pickup[latitude]",
            Self::PickupLongitude => "pickup[longitude]",
            Self::PickupNickname => "pickup[nickname]",
            Self::PickupAddress => "pickup[formatted_address]",
            Self::DropoffLatitude => "dropoff[latitude]",
            Self::DropoffLongitude => "dropoff[longitude]",
            Self::DropoffNickname => "dropoff[nickname]",
            Self::DropoffAddress => "dropoff[formatted_address]",
        }
    }

    /// Returns all query parameters.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Action,
            Self::ClientId,
            Self::ProductId,
            Self::PickupDefault,
            Self::PickupLatitude,
            Self::PickupLongitude,
            Self::PickupNickname,
            Self::PickupAddress,
            Self::DropoffLatitude,
            Self::DropoffLongitude,
            Self::DropoffNickname,
            Self::DropoffAddress,
        ]
    }

    /// Parameters describing an explicit pickup, cleared by the current-location default.
    #[must_use]
    pub const fn explicit_pickup() -> &'static [Self] {
        &[
            Self::PickupLatitude,
            Self::PickupLongitude,
            Self::PickupAddress,
            Self::PickupNickname,
        ]
    }
}

impl FromStr for QueryParameterName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|name| name.key() == s)
            .ok_or_else(|| Error::InvalidParameter(format!("Unknown query parameter: {s}")))
    }
}

impl std::fmt::Display for QueryParameterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
