//! Ride request deeplink builder.

use crate::platform::UrlOpener;
use crate::Result;
use rides_core::query::{decode, encode_query_component};
use rides_core::types::{ACTION_SET_PICKUP, DEEPLINK_SCHEME, PICKUP_MY_LOCATION};
use rides_core::{ParameterStore, QueryParameterName, RidesConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What triggered the deeplink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationSource {
    /// A rides request button
    Button,
    /// Application code requesting the deeplink directly
    Deeplink,
}

impl InvocationSource {
    /// Returns the source name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Deeplink => "deeplink",
        }
    }

    /// Returns the user-agent tag appended to an opened URI.
    ///
    /// Only the button tag carries a leading `&`; the counterpart app parses the
    /// two forms as they are.
    #[must_use]
    pub fn user_agent_tag(&self, sdk_version: &str) -> String {
        match self {
            Self::Button => format!("&user-agent=rides-button-v{sdk_version}"),
            Self::Deeplink => format!("user-agent=rides-deeplink-v{sdk_version}"),
        }
    }
}

impl std::fmt::Display for InvocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Accumulates ride request parameters and serializes them into a deeplink URI.
///
/// The built URI is memoized until the next mutation.
#[derive(Debug, Clone)]
pub struct DeeplinkBuilder {
    config: RidesConfig,
    source: InvocationSource,
    params: ParameterStore,
    deeplink_uri: Option<String>,
}

impl DeeplinkBuilder {
    /// Create a builder for `client_id` with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`rides_core::Error::MissingClientId`] if the client id is empty.
    pub fn new(client_id: impl Into<String>, source: InvocationSource) -> Result<Self> {
        let config = RidesConfig::new(client_id)?;
        Ok(Self::with_config(config, source))
    }

    /// Create a builder from host configuration.
    ///
    /// # Errors
    ///
    /// Returns [`rides_core::Error::MissingClientId`] if the client id is empty, or
    /// [`rides_core::Error::ConfigError`] if another field is invalid.
    pub fn from_config(config: &RidesConfig, source: InvocationSource) -> Result<Self> {
        config.check()?;
        Ok(Self::with_config(config.clone(), source))
    }

    fn with_config(config: RidesConfig, source: InvocationSource) -> Self {
        let mut params = ParameterStore::new();
        params.set(QueryParameterName::ClientId, &config.client_id);

        Self {
            config,
            source,
            params,
            deeplink_uri: None,
        }
    }

    /// Returns the client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    /// Returns the invocation source.
    #[must_use]
    pub const fn source(&self) -> InvocationSource {
        self.source
    }

    /// Returns the accumulated parameters.
    #[must_use]
    pub const fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    /// Use the rider's current location as pickup.
    pub fn set_pickup_location_to_current_location(&mut self) -> &mut Self {
        self.params
            .set(QueryParameterName::Action, ACTION_SET_PICKUP);
        self.params
            .set(QueryParameterName::PickupDefault, PICKUP_MY_LOCATION);
        self.params.delete(QueryParameterName::explicit_pickup());
        self
    }

    /// Set an explicit pickup location.
    pub fn set_pickup_location(
        &mut self,
        latitude: f64,
        longitude: f64,
        nickname: Option<&str>,
        address: Option<&str>,
    ) -> &mut Self {
        self.params.delete(&[
            QueryParameterName::PickupNickname,
            QueryParameterName::PickupAddress,
        ]);
        self.params
            .set(QueryParameterName::Action, ACTION_SET_PICKUP);
        self.params
            .set(QueryParameterName::PickupLatitude, &latitude.to_string());
        self.params
            .set(QueryParameterName::PickupLongitude, &longitude.to_string());

        if let Some(nickname) = nickname {
            self.params.set(QueryParameterName::PickupNickname, nickname);
        }
        if let Some(address) = address {
            self.params.set(QueryParameterName::PickupAddress, address);
        }

        self.params.delete(&[QueryParameterName::PickupDefault]);
        self
    }

    /// Set the dropoff location. Dropoff never sets the `action` parameter.
    pub fn set_dropoff_location(
        &mut self,
        latitude: f64,
        longitude: f64,
        nickname: Option<&str>,
        address: Option<&str>,
    ) -> &mut Self {
        self.params.delete(&[
            QueryParameterName::DropoffNickname,
            QueryParameterName::DropoffAddress,
        ]);
        self.params
            .set(QueryParameterName::DropoffLatitude, &latitude.to_string());
        self.params
            .set(QueryParameterName::DropoffLongitude, &longitude.to_string());

        if let Some(nickname) = nickname {
            self.params.set(QueryParameterName::DropoffNickname, nickname);
        }
        if let Some(address) = address {
            self.params.set(QueryParameterName::DropoffAddress, address);
        }
        self
    }

    /// Set the product id.
    pub fn set_product_id(&mut self, product_id: &str) -> &mut Self {
        self.params.set(QueryParameterName::ProductId, product_id);
        self
    }

    fn pickup_location_set(&self) -> bool {
        (self.params.exists(QueryParameterName::PickupLatitude)
            && self.params.exists(QueryParameterName::PickupLongitude))
            || self.params.exists(QueryParameterName::PickupDefault)
    }

    /// Build the deeplink URI, defaulting pickup to the current location.
    ///
    /// Returns the cached URI when nothing changed since the last build.
    ///
    /// # Errors
    ///
    /// Returns [`rides_core::Error::UnrepresentableValue`] if the assembled URI does
    /// not decode to valid UTF-8.
    pub fn build(&mut self) -> Result<String> {
        if !self.pickup_location_set() {
            debug!("no pickup location set, defaulting to current location");
            self.set_pickup_location_to_current_location();
        }

        if !self.params.has_pending_changes() {
            if let Some(uri) = &self.deeplink_uri {
                debug!("reusing cached deeplink");
                return Ok(uri.clone());
            }
        }

        let uri = self.assemble()?;
        debug!(uri = %uri, "built deeplink");

        self.params.mark_built();
        self.deeplink_uri = Some(uri.clone());
        Ok(uri)
    }

    // Keys and stored values are escaped again as query components, then the
    // whole string is decoded once. Values come out escaped exactly once.
    fn assemble(&self) -> Result<String> {
        let query = self
            .params
            .query_items()
            .into_iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    encode_query_component(key),
                    encode_query_component(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        let encoded = format!("{DEEPLINK_SCHEME}://?{query}");
        Ok(decode(&encoded)?.into_owned())
    }

    /// Returns the web sign-up URL used when the app cannot be opened.
    ///
    /// # Errors
    ///
    /// Returns [`rides_core::Error::ConfigError`] if the web host is invalid.
    pub fn fallback_url(&self) -> Result<String> {
        Ok(self.config.fallback_url()?.to_string())
    }

    /// Open the deeplink, or the web fallback if no app can handle it.
    ///
    /// The invocation source tag is appended to whichever URI is opened.
    ///
    /// # Errors
    ///
    /// Returns an error if the deeplink or the fallback URL cannot be built.
    pub fn execute(&mut self, opener: &dyn UrlOpener) -> Result<()> {
        let tag = self.source.user_agent_tag(&self.config.sdk_version);
        let deeplink = format!("{}{tag}", self.build()?);
        let fallback = format!("{}{tag}", self.fallback_url()?);

        if opener.can_open(&deeplink) {
            info!(source = %self.source, "opening rides app deeplink");
            opener.open(&deeplink);
        } else {
            warn!(
                source = %self.source,
                "rides app unavailable, opening web fallback"
            );
            opener.open(&fallback);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MockUrlOpener, NoopUrlOpener};
    use mockall::predicate::eq;
    use rides_core::Error;

    fn builder(source: InvocationSource) -> DeeplinkBuilder {
        DeeplinkBuilder::new("abc123", source).unwrap()
    }

    #[test]
    fn new_rejects_empty_client_id() {
        let err = DeeplinkBuilder::new("", InvocationSource::Button).unwrap_err();
        assert_eq!(err, Error::MissingClientId);
    }

    #[test]
    fn new_stores_client_id() {
        let builder = builder(InvocationSource::Deeplink);
        assert_eq!(builder.client_id(), "abc123");
        assert_eq!(builder.source(), InvocationSource::Deeplink);
        assert_eq!(
            builder.parameters().get(QueryParameterName::ClientId),
            Some("abc123")
        );
    }

    #[test]
    fn from_config_validates() {
        let config = RidesConfig {
            client_id: String::new(),
            web_host: "m.uber.com".to_string(),
            sdk_version: "0.2.0".to_string(),
        };
        assert_eq!(
            DeeplinkBuilder::from_config(&config, InvocationSource::Button).unwrap_err(),
            Error::MissingClientId
        );
    }

    #[test]
    fn user_agent_tags_are_asymmetric() {
        assert_eq!(
            InvocationSource::Button.user_agent_tag("0.2.0"),
            "&user-agent=rides-button-v0.2.0"
        );
        assert_eq!(
            InvocationSource::Deeplink.user_agent_tag("0.2.0"),
            "user-agent=rides-deeplink-v0.2.0"
        );
    }

    #[test]
    fn pickup_location_set_requires_both_coordinates() {
        let mut builder = builder(InvocationSource::Deeplink);
        assert!(!builder.pickup_location_set());

        builder
            .params
            .set(QueryParameterName::PickupLatitude, "37.775");
        assert!(!builder.pickup_location_set());

        builder
            .params
            .set(QueryParameterName::PickupLongitude, "-122.417");
        assert!(builder.pickup_location_set());
    }

    #[test]
    fn build_is_memoized_until_mutation() {
        let mut builder = builder(InvocationSource::Deeplink);
        let first = builder.build().unwrap();
        assert!(!builder.parameters().has_pending_changes());

        let second = builder.build().unwrap();
        assert_eq!(first, second);

        builder.set_product_id("uberX");
        assert!(builder.parameters().has_pending_changes());
        let third = builder.build().unwrap();
        assert!(third.contains("product_id=uberX"));
    }

    #[test]
    fn execute_opens_deeplink_when_app_available() {
        let mut builder = builder(InvocationSource::Button);
        builder.set_pickup_location_to_current_location();
        let expected = format!(
            "{}&user-agent=rides-button-v{}",
            builder.build().unwrap(),
            env!("CARGO_PKG_VERSION")
        );

        let mut opener = MockUrlOpener::new();
        opener
            .expect_can_open()
            .with(eq(expected.clone()))
            .times(1)
            .return_const(true);
        opener
            .expect_open()
            .with(eq(expected))
            .times(1)
            .return_const(());

        builder.execute(&opener).unwrap();
    }

    #[test]
    fn execute_falls_back_to_web_sign_up() {
        let mut builder = builder(InvocationSource::Deeplink);
        let expected = format!(
            "https://m.uber.com/sign-up?client_id=abc123user-agent=rides-deeplink-v{}",
            env!("CARGO_PKG_VERSION")
        );

        let mut opener = MockUrlOpener::new();
        opener.expect_can_open().times(1).return_const(false);
        opener
            .expect_open()
            .with(eq(expected))
            .times(1)
            .return_const(());

        builder.execute(&opener).unwrap();
    }

    #[test]
    fn execute_with_noop_opener_still_builds() {
        let mut builder = builder(InvocationSource::Button);
        builder.execute(&NoopUrlOpener).unwrap();
        assert!(!builder.parameters().has_pending_changes());
    }
}
