//! Provider configuration.
//!
//! Everything about the identity provider is constant for the lifetime of
//! the process: the login endpoint, the protocol namespace, and the
//! grammar of the identity urls it issues. [`ProviderConfig::steam`]
//! carries the production constants; tests substitute an endpoint on a
//! local server.

use regex::Regex;
use url::Url;

/// OpenID 2.0 protocol namespace, carried in every request and echoed on
/// the first line of verification responses.
pub const OPENID_NAMESPACE: &str = "http://specs.openid.net/auth/2.0";

/// Sentinel identity value asking the provider to choose the identity of
/// whoever logs in, instead of the relying party naming one up front.
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

/// Immutable constants of one identity provider.
pub struct ProviderConfig {
    /// Login page users are redirected to. Doubles as the endpoint for
    /// the check-authentication replay.
    pub login_endpoint: Url,
    pub namespace: String,
    /// Grammar of claimed identity urls accepted from assertions.
    pub identity_pattern: Regex,
}

impl ProviderConfig {
    /// Configuration for the Steam community OpenID provider.
    pub fn steam() -> Self {
        Self {
            login_endpoint: Url::parse("https://steamcommunity.com/openid/login")
                .expect("steam login endpoint is a valid url"),
            namespace: OPENID_NAMESPACE.to_owned(),
            identity_pattern: Regex::new(
                r"^(http|https)://steamcommunity\.com/openid/id/[0-9]{15,25}$",
            )
            .expect("steam identity pattern is a valid regex"),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::steam()
    }
}

#[cfg(test)]
mod tests {
    use super::ProviderConfig;

    fn matches(candidate: &str) -> bool {
        ProviderConfig::steam().identity_pattern.is_match(candidate)
    }

    #[test]
    fn accepts_both_schemes() {
        assert!(matches("https://steamcommunity.com/openid/id/76561197960435530"));
        assert!(matches("http://steamcommunity.com/openid/id/76561197960435530"));
    }

    #[test]
    fn accepts_boundary_digit_counts() {
        assert!(matches("https://steamcommunity.com/openid/id/123456789012345"));
        assert!(matches("https://steamcommunity.com/openid/id/1234567890123456789012345"));
    }

    #[test]
    fn rejects_digit_counts_outside_bounds() {
        assert!(!matches("https://steamcommunity.com/openid/id/123"));
        assert!(!matches("https://steamcommunity.com/openid/id/12345678901234"));
        assert!(!matches("https://steamcommunity.com/openid/id/12345678901234567890123456"));
    }

    #[test]
    fn rejects_foreign_hosts_schemes_and_paths() {
        assert!(!matches("https://steamcommunity.com.evil.example/openid/id/76561197960435530"));
        assert!(!matches("ftp://steamcommunity.com/openid/id/76561197960435530"));
        assert!(!matches("https://steamcommunity.com/profiles/76561197960435530"));
        assert!(!matches("https://steamcommunity.com/openid/id/76561197960435530/extra"));
        assert!(!matches("https://steamcommunity.com/openid/id/7656119796043553a"));
    }
}
