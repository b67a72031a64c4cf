//! Host platform contracts for opening deeplinks.

/// Host service that probes and opens URIs outside the library.
#[cfg_attr(test, mockall::automock)]
pub trait UrlOpener {
    /// Returns true if an installed application can handle `uri`.
    fn can_open(&self, uri: &str) -> bool;

    /// Opens `uri` with the host's navigation mechanism.
    fn open(&self, uri: &str);
}

#[derive(Debug, Clone, Copy, Default)]
/// Opener for hosts without URL handling; it can open nothing.
pub struct NoopUrlOpener;

impl UrlOpener for NoopUrlOpener {
    fn can_open(&self, _uri: &str) -> bool {
        false
    }

    fn open(&self, _uri: &str) {}
}
