use anyhow::{anyhow, Result as AnyResult};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::{default::Default, path::PathBuf};

pub const DEFAULT_WEATHER_FORMAT: &str =
    "%l:+%t,+%c+%C%0D%0A降水量:%P%0D%0A風速:%w%0D%0A湿度:%h%0D%0A天気:%x";

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub application_id: u64,
    pub files_dir: String,
    pub image_filename: String,
    pub weather_base_url: String,
    pub weather_lang: String,
    pub weather_format: String,
    /// Offset applied to the timestamps users type into the delayed message form.
    pub utc_offset_hours: i32,
}

impl Config {
    pub fn image_path(&self) -> PathBuf {
        let mut path = PathBuf::from(&self.files_dir);
        path.push(&self.image_filename);
        path
    }

    pub fn timezone(&self) -> AnyResult<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| anyhow!("Invalid UTC offset: {} hours", self.utc_offset_hours))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            application_id: 1387052142568669234,
            files_dir: "files".into(),
            image_filename: "image.png".into(),
            weather_base_url: "https://wttr.in".into(),
            weather_lang: "ja".into(),
            weather_format: DEFAULT_WEATHER_FORMAT.into(),
            utc_offset_hours: 9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = serde_json::from_str::<Config>(r#"{ "files_dir": "assets" }"#).unwrap();
        assert_eq!(config.files_dir, "assets");
        assert_eq!(config.weather_base_url, "https://wttr.in");
        assert_eq!(config.image_path(), PathBuf::from("assets/image.png"));
    }

    #[test]
    fn timezone_rejects_out_of_range_offsets() {
        let mut config = Config::default();
        assert_eq!(config.timezone().unwrap(), FixedOffset::east_opt(9 * 3600).unwrap());
        config.utc_offset_hours = 30;
        assert!(config.timezone().is_err());
    }
}
