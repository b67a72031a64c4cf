//! Query parameter storage and percent-encoding for deeplinks.
//!
//! Values are escaped once when stored, using a stricter set than RFC 3986 query
//! rules require. When a URI is assembled the keys and stored values go through
//! a second, query-component pass and the assembled string is decoded once. The
//! second pass only re-escapes `%` in values, so the decode leaves every value
//! escaped exactly once while the bracketed keys come out literal.

use std::borrow::Cow;
use std::collections::HashMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::trace;

use crate::error::Result;
use crate::types::QueryParameterName;

/// Characters escaped in stored parameter values.
pub const VALUE_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'=')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'!')
    .add(b'$')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b':')
    .add(b';')
    .add(b'[')
    .add(b']');

/// Characters escaped when a key or stored value is placed in the URI query.
pub const QUERY_COMPONENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode a parameter value with [`VALUE_ENCODE_SET`].
#[must_use]
pub fn encode_value(value: &str) -> String {
    utf8_percent_encode(value, VALUE_ENCODE_SET).to_string()
}

/// Percent-encode a key or stored value for placement in a URI query.
#[must_use]
pub fn encode_query_component(component: &str) -> Cow<'_, str> {
    utf8_percent_encode(component, QUERY_COMPONENT_ENCODE_SET).into()
}

/// Percent-decode an assembled string once.
///
/// # Errors
///
/// Returns [`Error::UnrepresentableValue`](crate::Error::UnrepresentableValue) if the
/// decoded bytes are not valid UTF-8.
pub fn decode(input: &str) -> Result<Cow<'_, str>> {
    Ok(percent_decode_str(input).decode_utf8()?)
}

/// Encoded query parameters keyed by wire-format key.
///
/// Tracks whether the content changed since the last URI was produced from it.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    params: HashMap<&'static str, String>,
    pending_changes: bool,
}

impl ParameterStore {
    /// Create a new, empty store with pending changes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: HashMap::new(),
            pending_changes: true,
        }
    }

    /// Encode and store a value, replacing any previous value.
    pub fn set(&mut self, name: QueryParameterName, value: &str) {
        let encoded = encode_value(value);
        trace!(key = name.key(), value = %encoded, "set query parameter");
        self.params.insert(name.key(), encoded);
        self.pending_changes = true;
    }

    /// Remove every listed parameter that is present.
    ///
    /// Marks the store as changed even if nothing was removed.
    pub fn delete(&mut self, names: &[QueryParameterName]) {
        for name in names {
            self.params.remove(name.key());
        }
        trace!(?names, "deleted query parameters");
        self.pending_changes = true;
    }

    /// Returns true if a value is stored for `name`.
    #[must_use]
    pub fn exists(&self, name: QueryParameterName) -> bool {
        self.params.contains_key(name.key())
    }

    /// Returns the encoded value stored for `name`.
    #[must_use]
    pub fn get(&self, name: QueryParameterName) -> Option<&str> {
        self.params.get(name.key()).map(String::as_str)
    }

    /// Return the stored key/value pairs in no particular order.
    #[must_use]
    pub fn query_items(&self) -> Vec<(&'static str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect()
    }

    /// Returns true if the content changed since [`mark_built`](Self::mark_built).
    #[must_use]
    pub const fn has_pending_changes(&self) -> bool {
        self.pending_changes
    }

    /// Record that a URI was produced from the current content.
    pub fn mark_built(&mut self) {
        self.pending_changes = false;
    }

    /// Number of stored parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if no parameters are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn encode_value_escapes_reserved_characters() {
        assert_eq!(
            encode_value("O'Brien's Café & Co."),
            "O%27Brien%27s%20Caf%C3%A9%20%26%20Co."
        );
        assert_eq!(encode_value("a=b/c?d"), "a%3Db%2Fc%3Fd");
        assert_eq!(encode_value("[1]"), "%5B1%5D");
    }

    #[test]
    fn encode_value_keeps_unreserved_characters() {
        assert_eq!(encode_value("-122.417"), "-122.417");
        assert_eq!(encode_value("my_location~x"), "my_location~x");
    }

    #[test]
    fn query_component_pass_escapes_percent_and_brackets() {
        assert_eq!(
            encode_query_component("pickup[latitude]"),
            "pickup%5Blatitude%5D"
        );
        assert_eq!(encode_query_component("O%27Brien"), "O%2527Brien");
        assert_eq!(encode_query_component("setPickup"), "setPickup");
    }

    #[test]
    fn decode_reverses_one_pass() {
        assert_eq!(decode("O%2527Brien").unwrap(), "O%27Brien");
        assert_eq!(decode("pickup%5Blatitude%5D").unwrap(), "pickup[latitude]");
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        assert!(decode("%FF%FE").is_err());
    }

    #[test]
    fn new_store_has_pending_changes() {
        let store = ParameterStore::new();
        assert!(store.is_empty());
        assert!(store.has_pending_changes());
    }

    #[test]
    fn set_overwrites_and_marks_pending() {
        let mut store = ParameterStore::new();
        store.set(QueryParameterName::ProductId, "first");
        store.mark_built();
        store.set(QueryParameterName::ProductId, "second");

        assert!(store.has_pending_changes());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(QueryParameterName::ProductId), Some("second"));
    }

    #[test]
    fn set_stores_encoded_value() {
        let mut store = ParameterStore::new();
        store.set(QueryParameterName::PickupNickname, "Home & Away");
        assert_eq!(
            store.get(QueryParameterName::PickupNickname),
            Some("Home%20%26%20Away")
        );
    }

    #[test]
    fn delete_absent_key_still_marks_pending() {
        let mut store = ParameterStore::new();
        store.mark_built();
        store.delete(&[QueryParameterName::DropoffAddress]);

        assert!(store.has_pending_changes());
        assert!(store.is_empty());
    }

    #[test]
    fn exists_tracks_latest_set_or_delete() {
        let mut store = ParameterStore::new();
        let name = QueryParameterName::PickupLatitude;

        assert!(!store.exists(name));
        store.set(name, "1");
        assert!(store.exists(name));
        store.delete(&[name, QueryParameterName::PickupLongitude]);
        assert!(!store.exists(name));
        store.set(name, "2");
        assert!(store.exists(name));
    }

    #[test]
    fn query_items_contains_every_entry() {
        let mut store = ParameterStore::new();
        store.set(QueryParameterName::ClientId, "abc123");
        store.set(QueryParameterName::PickupDefault, "my_location");

        let items: HashSet<_> = store.query_items().into_iter().collect();
        let expected: HashSet<_> = [("client_id", "abc123"), ("pickup", "my_location")]
            .into_iter()
            .collect();
        assert_eq!(items, expected);
    }
}
