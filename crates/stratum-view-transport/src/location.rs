//! Page location and socket endpoint derivation.

use std::fmt;

use url::Url;

/// Path suffix of the state socket, relative to the view page.
pub const SOCKET_SUFFIX: &str = "/socket";

/// Location error.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Invalid URL: {0}")]
    Parse(#[from] url::ParseError),
    #[error("Location has no host: {0}")]
    MissingHost(String),
}

/// Location of the page a view is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    /// Parse an absolute page URL.
    ///
    /// # Errors
    /// Returns error if the URL is invalid or has no host.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        Self::from_url(Url::parse(input)?)
    }

    /// Wrap an already parsed URL.
    ///
    /// # Errors
    /// Returns error if the URL has no host.
    pub fn from_url(url: Url) -> Result<Self, LocationError> {
        if url.host_str().is_none() {
            return Err(LocationError::MissingHost(url.into()));
        }
        Ok(Self { url })
    }

    /// Whether the page was loaded over TLS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.url.scheme() == "https"
    }

    /// Host with the explicit port, if any.
    #[must_use]
    pub fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Path component of the page.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Websocket endpoint for this page's state stream.
    ///
    /// `wss` for secure pages and `ws` otherwise, same host, page path with
    /// `/socket` appended. Query and fragment are not carried over.
    ///
    /// # Errors
    /// Returns error if the derived endpoint is not a valid URL.
    pub fn socket_endpoint(&self) -> Result<Url, LocationError> {
        let scheme = if self.is_secure() { "wss" } else { "ws" };
        let endpoint = format!("{scheme}://{}{}{SOCKET_SUFFIX}", self.host(), self.path());
        Ok(Url::parse(&endpoint)?)
    }
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.url, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(page: &str) -> String {
        PageLocation::parse(page)
            .unwrap()
            .socket_endpoint()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_insecure_page() {
        assert_eq!(
            endpoint("http://localhost:8888/games/tictactoe/view/0"),
            "ws://localhost:8888/games/tictactoe/view/0/socket"
        );
    }

    #[test]
    fn test_secure_page() {
        assert_eq!(
            endpoint("https://example.com/games/tictactoe/view/12"),
            "wss://example.com/games/tictactoe/view/12/socket"
        );
    }

    #[test]
    fn test_non_default_port_on_secure_page() {
        assert_eq!(
            endpoint("https://example.com:8443/view/1"),
            "wss://example.com:8443/view/1/socket"
        );
    }

    #[test]
    fn test_query_and_fragment_are_dropped() {
        assert_eq!(
            endpoint("http://127.0.0.1:8888/view/3?theme=dark#board"),
            "ws://127.0.0.1:8888/view/3/socket"
        );
    }

    #[test]
    fn test_trailing_slash_is_kept() {
        assert_eq!(endpoint("http://example.com/"), "ws://example.com//socket");
    }

    #[test]
    fn test_ipv6_host() {
        assert_eq!(endpoint("http://[::1]:9000/view/0"), "ws://[::1]:9000/view/0/socket");
    }

    #[test]
    fn test_missing_host() {
        assert!(matches!(
            PageLocation::parse("file:///tmp/view.html"),
            Err(LocationError::MissingHost(_))
        ));
        assert!(matches!(
            PageLocation::parse("not a url"),
            Err(LocationError::Parse(_))
        ));
    }
}
