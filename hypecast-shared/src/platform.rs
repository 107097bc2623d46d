use crate::normalize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A social network a creator publishes on. Advertiser input and stored
/// inventory may use different casing or shorthand ("IG", "insta"); parsing
/// reconciles both onto one canonical value before any filter runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Instagram,
    Youtube,
    Tiktok,
    Twitch,
    Facebook,
    Twitter,
    /// Unrecognized network, kept as its normalized label.
    Other(String),
}

impl Platform {
    pub fn parse(raw: &str) -> Self {
        match normalize::label(raw).as_str() {
            "instagram" | "insta" | "ig" => Platform::Instagram,
            "youtube" | "yt" => Platform::Youtube,
            "tiktok" => Platform::Tiktok,
            "twitch" => Platform::Twitch,
            "facebook" | "fb" => Platform::Facebook,
            "twitter" | "x" => Platform::Twitter,
            other => Platform::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Twitch => "twitch",
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Other(label) => label,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Platform::parse(s))
    }
}

impl From<String> for Platform {
    fn from(raw: String) -> Self {
        Platform::parse(&raw)
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}
