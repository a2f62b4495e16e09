//! Authentication
//!
//! Steam acts as an OpenID 2.0 identity provider. The standard predates
//! OpenID Connect, and on the relying-party side it runs in two phases:
//!
//! 1. derive an [`AuthContext`] from the inbound request and redirect the
//!    user to the provider login page built by [`RelyingParty::auth_url`]
//! 2. the provider sends the user back to the same endpoint with the
//!    assertion encoded in the request parameters; [`RelyingParty::verify`]
//!    replays the signed parameters to the provider and extracts the
//!    user's [`SteamId`]
//!
//! The relying party never checks signatures locally. No association was
//! established beforehand, so the signed parameter set is posted back to
//! the provider, which recomputes the signature itself ("dumb mode" in
//! OpenID terms, [direct verification]).
//!
//! [direct verification]: https://openid.net/specs/openid-authentication-2_0.html#verification

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use derive_more::Display;
use url::Url;

use crate::config::{IDENTIFIER_SELECT, ProviderConfig};
use crate::error::Error;
use crate::identity::SteamId;

/// Mode requesting interactive login at the provider.
pub const MODE_CHECKID_SETUP: &str = "checkid_setup";

/// Mode of a positive assertion returned by the provider.
pub const MODE_ID_RES: &str = "id_res";

/// Mode returned when the user declines to authenticate.
pub const MODE_CANCEL: &str = "cancel";

/// Mode of the server-side signature verification replay.
pub const MODE_CHECK_AUTHENTICATION: &str = "check_authentication";

const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenID request and response parameter names.
#[derive(Clone, Copy, Display)]
pub enum Parameter {
    #[display("openid.ns")]
    Namespace,
    #[display("openid.mode")]
    Mode,
    #[display("openid.identity")]
    Identity,
    #[display("openid.claimed_id")]
    ClaimedId,
    #[display("openid.realm")]
    Realm,
    #[display("openid.return_to")]
    ReturnTo,
    #[display("openid.assoc_handle")]
    AssocHandle,
    #[display("openid.signed")]
    Signed,
    #[display("openid.sig")]
    Signature,
}

/// Request-scoped view of one authentication exchange.
///
/// Derived fresh per inbound request and discarded afterwards; no state
/// survives between requests. The realm is the origin of the relying
/// party, the return url the same request url with every `openid.*` query
/// parameter removed. Both must come out byte-identical on the initial
/// request and on the redirected-back request, because verification
/// requires an exact match against the provider-echoed
/// `openid.return_to`.
pub struct AuthContext {
    realm: String,
    return_url: String,
    params: HashMap<String, String>,
}

impl AuthContext {
    /// Builds the context from the pieces of the inbound request.
    ///
    /// `request_uri` is the path plus query string. `params` holds the
    /// request parameters as parsed by the surrounding http layer: the
    /// query string for GET, the form body for POST. Both are treated as
    /// the same opaque string-keyed mapping.
    pub fn new(
        secure: bool,
        host: &str,
        request_uri: &str,
        params: HashMap<String, String>,
    ) -> Self {
        let scheme = if secure { "https" } else { "http" };
        let realm = format!("{scheme}://{host}");
        let return_url = format!("{realm}{}", strip_openid_parameters(request_uri));

        Self {
            realm,
            return_url,
            params,
        }
    }

    /// Origin of the relying party: scheme and host.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Url the provider must send the user back to.
    pub fn return_url(&self) -> &str {
        &self.return_url
    }

    /// Value of `openid.mode`, if present.
    ///
    /// Callers dispatch on it: absent or empty means the user has not
    /// been sent to the provider yet, [`MODE_CANCEL`] means they
    /// declined, and anything else is handed to [`RelyingParty::verify`].
    pub fn mode(&self) -> Option<&str> {
        self.param(Parameter::Mode)
    }

    /// Looks up a single OpenID parameter.
    pub fn param(&self, name: Parameter) -> Option<&str> {
        self.params.get(&name.to_string()).map(String::as_str)
    }

    /// Parameter set replayed to the provider for signature verification.
    ///
    /// Carries `openid.ns`, `openid.sig` and `openid.assoc_handle` from
    /// the assertion, every parameter named in the comma-separated
    /// `openid.signed` list copied under its `openid.` key, and the mode
    /// forced to [`MODE_CHECK_AUTHENTICATION`]. The forced mode is
    /// inserted last so it wins over any copy named by the signed list.
    /// Absent fields are sent empty, and empty names in a malformed
    /// signed list are skipped; the provider rejects an incomplete set on
    /// its side.
    fn check_authentication_parameters(&self) -> BTreeMap<String, String> {
        let mut replay = BTreeMap::new();

        for name in [Parameter::Namespace, Parameter::Signature, Parameter::AssocHandle] {
            replay.insert(
                name.to_string(),
                self.param(name).unwrap_or_default().to_owned(),
            );
        }

        for name in self.param(Parameter::Signed).unwrap_or_default().split(',') {
            if name.is_empty() {
                continue;
            }

            let key = format!("openid.{name}");
            let value = self.params.get(&key).cloned().unwrap_or_default();
            replay.insert(key, value);
        }

        replay.insert(
            Parameter::Mode.to_string(),
            MODE_CHECK_AUTHENTICATION.to_owned(),
        );

        replay
    }
}

/// Stateless relying-party client.
///
/// Holds the provider configuration and a shared http client; one
/// instance serves any number of concurrent authentications without
/// coordination. Used assertions are not tracked, so replay protection
/// beyond the provider's own association-handle expiry must be layered
/// by the caller.
pub struct RelyingParty {
    http: reqwest::Client,
    config: ProviderConfig,
    verify_timeout: Duration,
}

impl RelyingParty {
    /// Client for the Steam provider with the default verification
    /// timeout.
    pub fn new() -> Self {
        Self::with_config(ProviderConfig::steam())
    }

    /// Client for an explicit provider configuration.
    pub fn with_config(config: ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            verify_timeout: DEFAULT_VERIFY_TIMEOUT,
        }
    }

    /// Replaces the timeout applied to the outbound verification call.
    pub fn verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = timeout;
        self
    }

    /// Builds the provider login url the user is redirected to.
    ///
    /// Pure string construction carrying the `checkid_setup` discovery
    /// parameters; identity and claimed id are the identifier-select
    /// sentinel so the provider picks the identity of whoever logs in.
    pub fn auth_url(&self, context: &AuthContext) -> Url {
        let request_params = [
            (Parameter::Namespace, self.config.namespace.as_str()),
            (Parameter::Mode, MODE_CHECKID_SETUP),
            (Parameter::Identity, IDENTIFIER_SELECT),
            (Parameter::ClaimedId, IDENTIFIER_SELECT),
            (Parameter::Realm, context.realm()),
            (Parameter::ReturnTo, context.return_url()),
        ];

        let mut login_url = self.config.login_endpoint.clone();
        for (key, value) in request_params {
            login_url.query_pairs_mut().append_pair(&key.to_string(), value);
        }

        login_url
    }

    /// Verifies a positive assertion and extracts the user's [`SteamId`].
    ///
    /// The checks run in order and the first failure returns immediately:
    /// the mode must be `id_res`, the echoed `openid.return_to` must
    /// match this request's return url byte for byte, the provider must
    /// confirm the replayed signature, and the claimed identity url must
    /// match the provider identity pattern. Transport failures on the
    /// replay call, including the configured timeout, surface as
    /// [`Error::Transport`].
    #[tracing::instrument(level = "debug", skip_all, err(level = "debug"))]
    pub async fn verify(&self, context: &AuthContext) -> Result<SteamId, Error> {
        if context.mode() != Some(MODE_ID_RES) {
            return Err(Error::UnknownMode);
        }

        if context.param(Parameter::ReturnTo) != Some(context.return_url()) {
            return Err(Error::ReturnUrlMismatch);
        }

        let replay = context.check_authentication_parameters();
        let response = self
            .http
            .post(self.config.login_endpoint.clone())
            .timeout(self.verify_timeout)
            .form(&replay)
            .send()
            .await?
            .text()
            .await?;

        check_authentication_response(&response, &self.config.namespace)?;

        let claimed_id = context.param(Parameter::ClaimedId).unwrap_or_default();
        if !self.config.identity_pattern.is_match(claimed_id) {
            tracing::debug!(claimed_id, "claimed identity outside the provider namespace");
            return Err(Error::InvalidIdPattern);
        }

        Ok(SteamId::extracted_from(claimed_id))
    }
}

impl Default for RelyingParty {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes every `openid.*` pair from the query string of a request uri.
///
/// Surviving pairs keep their original bytes and order, so the result is
/// the same whether computed before the redirect or on the way back, and
/// stripping twice equals stripping once. A query left empty drops its
/// `?`.
fn strip_openid_parameters(request_uri: &str) -> String {
    let Some((path, query)) = request_uri.split_once('?') else {
        return request_uri.to_owned();
    };

    let kept = query
        .split('&')
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(key, _)| key);
            !key.starts_with("openid.")
        })
        .collect::<Vec<_>>();

    if kept.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{}", kept.join("&"))
    }
}

/// Parses a check_authentication response body.
///
/// The body is `\n`-separated `key:value` lines in a fixed order; only
/// the first two lines are read. Line 0 must equal `ns:<namespace>`.
/// Line 1 carries `is_valid` and must not end with the literal `false`;
/// a body without a second line counts as rejected.
fn check_authentication_response(body: &str, namespace: &str) -> Result<(), Error> {
    let mut lines = body.split('\n');

    let expected_namespace = format!("ns:{namespace}");
    if lines.next() != Some(expected_namespace.as_str()) {
        return Err(Error::WrongNamespace);
    }

    match lines.next() {
        Some(validity) if !validity.ends_with("false") => Ok(()),
        Some(validity) => {
            tracing::debug!(validity, "provider rejected the assertion");
            Err(Error::ValidationFailed)
        }
        None => Err(Error::ValidationFailed),
    }
}
