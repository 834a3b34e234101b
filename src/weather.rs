use crate::{
    config::Config,
    event::CommandInvocation,
    reply::{Reply, ReplyHandle},
};
use anyhow::{anyhow, Result as AnyResult};
use reqwest::{Client, Url};
use serenity::async_trait;
use std::time::Instant;
use tracing::{error, info};

pub const CITY_OPTION: &str = "city";
pub const FAILURE_MESSAGE: &str =
    "天気予報の取得に失敗しました。都市名が正しいか確認してください。";

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetches the formatted plain-text forecast for `city`.
    async fn forecast(&self, city: &str) -> AnyResult<String>;
}

/// Builds `<base>/<city>?lang=<lang>&format=<format>`, encoding `city` as a
/// single path segment and leaving the query as given.
pub fn forecast_url(base: &str, lang: &str, format: &str, city: &str) -> AnyResult<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Weather base URL '{base}' cannot take a path"))?
        .pop_if_empty()
        .push(city);
    url.set_query(Some(&format!("lang={lang}&format={format}")));
    Ok(url)
}

pub struct WttrClient {
    client: Client,
    base_url: String,
    lang: String,
    format: String,
}

impl WttrClient {
    pub fn new(config: &Config) -> Self {
        WttrClient {
            client: Client::new(),
            base_url: config.weather_base_url.clone(),
            lang: config.weather_lang.clone(),
            format: config.weather_format.clone(),
        }
    }
}

#[async_trait]
impl WeatherSource for WttrClient {
    async fn forecast(&self, city: &str) -> AnyResult<String> {
        let url = forecast_url(&self.base_url, &self.lang, &self.format, city)?;
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

pub fn forecast_message(city: &str, forecast: &str) -> String {
    format!("**{city}** の天気予報:\n```\n{forecast}\n```")
}

pub async fn weather(
    source: &dyn WeatherSource,
    invocation: &CommandInvocation,
    reply: &dyn ReplyHandle,
) -> AnyResult<()> {
    let start = Instant::now();
    let city = invocation
        .option(CITY_OPTION)
        .ok_or_else(|| anyhow!("Missing required '{CITY_OPTION}' option"))?;
    reply.acknowledge().await?;
    info!("WX | Fetching forecast for '{city}'.");
    let message = match source.forecast(city).await {
        Ok(forecast) => forecast_message(city, &forecast),
        Err(why) => {
            error!("WX | Failed to fetch forecast for '{city}': {why:?}");
            FAILURE_MESSAGE.to_string()
        }
    };
    reply.complete(Reply::Text(message)).await?;
    info!("WX | Elapsed: {:?}", start.elapsed());
    Ok(())
}
