//! Steam Web API profile lookup.
//!
//! Not part of the verification protocol: once a [`SteamId`] is in hand,
//! this is a plain typed GET against `GetPlayerSummaries`, keyed by a
//! Steam Web API key.

use serde::Deserialize;
use url::Url;

use crate::error::Error;
use crate::identity::SteamId;

const PLAYER_SUMMARIES_ENDPOINT: &str =
    "https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/";

/// Public profile record of a single player.
///
/// Fields past `persona_state` only appear when the profile is public and
/// filled in; they default to empty values otherwise.
#[derive(Clone, Debug, Deserialize)]
pub struct PlayerSummary {
    #[serde(rename = "steamid")]
    pub steam_id: String,
    #[serde(rename = "communityvisibilitystate", default)]
    pub community_visibility_state: i32,
    #[serde(rename = "profilestate", default)]
    pub profile_state: i32,
    #[serde(rename = "personaname")]
    pub persona_name: String,
    #[serde(rename = "lastlogoff", default)]
    pub last_log_off: i64,
    #[serde(rename = "profileurl")]
    pub profile_url: String,
    pub avatar: String,
    #[serde(rename = "avatarmedium")]
    pub avatar_medium: String,
    #[serde(rename = "avatarfull")]
    pub avatar_full: String,
    #[serde(rename = "personastate", default)]
    pub persona_state: i32,

    #[serde(rename = "commentpermission", default)]
    pub comment_permission: i32,
    #[serde(rename = "realname", default)]
    pub real_name: Option<String>,
    #[serde(rename = "primaryclanid", default)]
    pub primary_clan_id: Option<String>,
    #[serde(rename = "timecreated", default)]
    pub time_created: i64,
    #[serde(rename = "loccountrycode", default)]
    pub loc_country_code: Option<String>,
    #[serde(rename = "locstatecode", default)]
    pub loc_state_code: Option<String>,
    #[serde(rename = "loccityid", default)]
    pub loc_city_id: i32,
    #[serde(rename = "gameid", default)]
    pub game_id: i64,
    #[serde(rename = "gameextrainfo", default)]
    pub game_extra_info: Option<String>,
    #[serde(rename = "gameserverip", default)]
    pub game_server_ip: Option<String>,
}

#[derive(Deserialize)]
struct SummariesEnvelope {
    response: SummariesResponse,
}

#[derive(Deserialize)]
struct SummariesResponse {
    players: Vec<PlayerSummary>,
}

/// Fetches the profile record for a single player.
///
/// The API wraps results in an envelope holding a one-element player
/// list; an empty list maps to [`Error::PlayerNotFound`].
pub async fn get_player_summary(
    http: &reqwest::Client,
    api_key: &str,
    steam_id: &SteamId,
) -> Result<PlayerSummary, Error> {
    let url = Url::parse_with_params(
        PLAYER_SUMMARIES_ENDPOINT,
        [("key", api_key), ("steamids", steam_id.as_str())],
    )
    .expect("player summaries endpoint is a valid url");

    let envelope = http
        .get(url)
        .send()
        .await?
        .json::<SummariesEnvelope>()
        .await?;

    envelope
        .response
        .players
        .into_iter()
        .next()
        .ok_or(Error::PlayerNotFound)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::SummariesEnvelope;

    #[test]
    fn envelope_deserializes_a_full_record() {
        let document = json!({
            "response": {
                "players": [{
                    "steamid": "76561197960435530",
                    "communityvisibilitystate": 3,
                    "profilestate": 1,
                    "personaname": "Robin",
                    "lastlogoff": 1234567890,
                    "profileurl": "https://steamcommunity.com/id/robinwalker/",
                    "avatar": "https://avatars.steamstatic.com/fe.jpg",
                    "avatarmedium": "https://avatars.steamstatic.com/fe_medium.jpg",
                    "avatarfull": "https://avatars.steamstatic.com/fe_full.jpg",
                    "personastate": 0,
                    "realname": "Robin Walker",
                    "primaryclanid": "103582791429521412",
                    "timecreated": 1063407589,
                    "loccountrycode": "US",
                    "locstatecode": "WA",
                    "loccityid": 3961
                }]
            }
        })
        .to_string();

        let envelope =
            serde_json::from_str::<SummariesEnvelope>(&document).expect("envelope deserialization");
        let player = &envelope.response.players[0];

        assert_eq!(player.steam_id, "76561197960435530");
        assert_eq!(player.community_visibility_state, 3);
        assert_eq!(player.persona_name, "Robin");
        assert_eq!(player.real_name.as_deref(), Some("Robin Walker"));
        assert_eq!(player.loc_city_id, 3961);
    }

    #[test]
    fn envelope_defaults_the_private_profile_fields() {
        let document = json!({
            "response": {
                "players": [{
                    "steamid": "76561197960435530",
                    "communityvisibilitystate": 1,
                    "personaname": "Robin",
                    "profileurl": "https://steamcommunity.com/id/robinwalker/",
                    "avatar": "https://avatars.steamstatic.com/fe.jpg",
                    "avatarmedium": "https://avatars.steamstatic.com/fe_medium.jpg",
                    "avatarfull": "https://avatars.steamstatic.com/fe_full.jpg",
                    "personastate": 0
                }]
            }
        })
        .to_string();

        let envelope =
            serde_json::from_str::<SummariesEnvelope>(&document).expect("envelope deserialization");
        let player = &envelope.response.players[0];

        assert_eq!(player.profile_state, 0);
        assert_eq!(player.real_name, None);
        assert_eq!(player.time_created, 0);
    }

    #[test]
    fn envelope_tolerates_an_empty_player_list() {
        let document = json!({ "response": { "players": [] } }).to_string();
        let envelope =
            serde_json::from_str::<SummariesEnvelope>(&document).expect("envelope deserialization");
        assert!(envelope.response.players.is_empty());
    }
}
