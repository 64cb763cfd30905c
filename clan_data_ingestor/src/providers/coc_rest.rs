use async_trait::async_trait;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use shared_utils::env::get_env_var;

use crate::{
    models::{raid::{RaidLog, RaidSeasonList}, roster::MemberList, war::WarLog},
    providers::{ClanDataProvider, ProviderError, ProviderInitError},
};

const BASE_URL: &str = "https://api.clashofclans.com/v1";

pub struct CocRestProvider {
    client: Client,
    encoded_tag: String,
    _token: SecretString,
}

impl CocRestProvider {
    /// Creates a new provider against the official REST API.
    ///
    /// Reads the bearer token from `COC_API_TOKEN` and the clan tag from
    /// `COC_CLAN_TAG` (the leading `#` is URL-encoded for path use).
    pub fn new() -> Result<Self, ProviderInitError> {
        let token = SecretString::new(get_env_var("COC_API_TOKEN")?.into());
        let clan_tag = get_env_var("COC_CLAN_TAG")?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            encoded_tag: clan_tag.replace('#', "%23"),
            _token: token,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ProviderError> {
        let url = format!("{BASE_URL}/clans/{}/{endpoint}", self.encoded_tag);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ProviderError::Api(error_msg));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ClanDataProvider for CocRestProvider {
    async fn fetch_roster(&self) -> Result<MemberList, ProviderError> {
        self.get_json::<MemberList>("members").await
    }

    async fn fetch_current_war(&self) -> Result<Option<WarLog>, ProviderError> {
        let war = self.get_json::<WarLog>("currentwar").await?;
        if war.is_not_in_war() {
            return Ok(None);
        }
        Ok(Some(war))
    }

    async fn fetch_latest_raid(&self) -> Result<Option<RaidLog>, ProviderError> {
        let seasons = self.get_json::<RaidSeasonList>("capitalraidseasons").await?;
        Ok(seasons.items.into_iter().next())
    }
}
