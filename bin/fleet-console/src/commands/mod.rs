pub mod auth;
pub mod components;
pub mod dashboard;
pub mod jobs;
pub mod notifications;
pub mod ships;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use fc_core::stats::parse_date;
use serde_json::{Map, Value};

/// Field changes for an `update` command.
#[derive(Args, Debug)]
pub struct PatchArgs {
    /// JSON object merged into the record, e.g. '{"status":"maintenance"}'
    #[arg(long)]
    pub patch: Option<String>,

    /// Single field change, repeatable. Values that parse as JSON are used
    /// as such; anything else is taken as a string.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,
}

impl PatchArgs {
    pub fn into_value(self) -> anyhow::Result<Value> {
        let mut fields = match self.patch {
            Some(raw) => match serde_json::from_str::<Value>(&raw).context("--patch is not valid JSON")? {
                Value::Object(map) => map,
                _ => anyhow::bail!("--patch must be a JSON object"),
            },
            None => Map::new(),
        };

        for pair in self.set {
            let (field, raw) = pair
                .split_once('=')
                .with_context(|| format!("--set expects FIELD=VALUE, got '{pair}'"))?;
            let value =
                serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            fields.insert(field.trim().to_string(), value);
        }

        if fields.is_empty() {
            anyhow::bail!("nothing to update: pass --patch or --set");
        }
        Ok(Value::Object(fields))
    }
}

/// `--now` override for date-relative commands; defaults to the clock.
pub fn parse_now(now: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match now {
        Some(raw) => parse_date_arg(raw),
        None => Ok(Utc::now()),
    }
}

pub fn parse_date_arg(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    parse_date(raw).with_context(|| format!("'{raw}' is not a YYYY-MM-DD or RFC 3339 date"))
}

pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
