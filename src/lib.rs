//! # steam-openid
//!
//! Steam OpenID 2.0 relying-party library.
//!
//! Steam exposes an [OpenID 2.0] provider at
//! `https://steamcommunity.com/openid`, and this crate implements the
//! relying-party half of the protocol: building the login url users are
//! redirected to, and verifying the assertion the provider redirects back
//! with. Browser-supplied parameters are never trusted at face value; the
//! signed parameter set is replayed to the provider for server-side
//! signature verification before the claimed identity is accepted.
//!
//! The crate is framework-agnostic. The surrounding http layer hands in
//! the pieces of the inbound request and performs the redirects; session
//! handling stays with the caller.
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! use steam_openid::{AuthContext, RelyingParty};
//!
//! # async fn handle(
//! #     secure: bool,
//! #     host: &str,
//! #     request_uri: &str,
//! #     params: HashMap<String, String>,
//! # ) -> steam_openid::Result<()> {
//! let relying_party = RelyingParty::new();
//! let context = AuthContext::new(secure, host, request_uri, params);
//!
//! match context.mode() {
//!     None | Some("") => {
//!         // first visit: send the user to the provider login page
//!         let login_url = relying_party.auth_url(&context);
//!         # let _ = login_url;
//!     }
//!     Some("cancel") => {
//!         // the user declined to authenticate
//!     }
//!     Some(_) => {
//!         let steam_id = relying_party.verify(&context).await?;
//!         println!("authenticated {steam_id}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [OpenID 2.0]: https://openid.net/specs/openid-authentication-2_0.html

pub mod authentication;
pub mod config;
pub mod error;
pub mod identity;
pub mod player;

pub use authentication::{AuthContext, Parameter, RelyingParty};
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use identity::SteamId;
pub use player::{PlayerSummary, get_player_summary};
