use std::env;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use bracket_engine_core::{BracketOptions, Format};
use log::LevelFilter;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    if let Ok(value) = value.parse() {
                        $config.$name = value;
                    }
                }
            }
        )*
    }};
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    #[serde(deserialize_with = "deserialize_format")]
    pub format: Format,
    pub third_place_match: bool,
    pub output: Output,
}

impl Config {
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read(path)?;

        Ok(toml::from_slice(&buf)?)
    }

    /// Overrides all values that are set in the environment. Invalid values are ignored.
    pub fn with_environment(mut self) -> Self {
        from_environment!(
            self,
            "BE_LOGLEVEL",
            loglevel,
            "BE_FORMAT",
            format,
            "BE_OUTPUT",
            output,
        );

        self
    }

    pub fn options(&self) -> BracketOptions {
        BracketOptions::new().third_place_match(self.third_place_match)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Warn,
            format: Format::SingleElimination,
            third_place_match: false,
            output: Output::Text,
        }
    }
}

/// The way a bracket is printed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    Json,
    Text,
}

impl FromStr for Output {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            s => Err(ConfigError::InvalidOutput(s.to_owned())),
        }
    }
}

impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Text => "text",
        })
    }
}

/// Accepts the short names of a [`Format`] as well.
fn deserialize_format<'de, D>(deserializer: D) -> Result<Format, D::Error>
where
    D: Deserializer<'de>,
{
    struct FormatVisitor;

    impl<'de> Visitor<'de> for FormatVisitor {
        type Value = Format;

        fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
            formatter.write_str("one of single, single_elimination, double, double_elimination")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.parse().map_err(E::custom)
        }
    }

    deserializer.deserialize_str(FormatVisitor)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("invalid output: {0}")]
    InvalidOutput(String),
}
