use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// Raw entry from the provider's coin map endpoint. Absent or null fields
/// fold to defaults so one malformed record survives deserialization and is
/// filtered out explicitly instead of failing the whole catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub symbol: String,
    pub first_historical_data: Option<String>,
}

fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CatalogEntry {
    /// Entries missing an id, symbol, or name are unusable in a selector.
    pub fn is_complete(&self) -> bool {
        self.id != 0 && !self.symbol.is_empty() && !self.name.is_empty()
    }
}

/// One selectable coin, built fresh on every catalog fetch.
#[derive(Debug, Clone)]
pub struct Coin {
    pub id: u64,
    pub symbol: String,
    pub name: String,
    pub label: String,
    pub first_listed: Option<String>,
    pub recently_listed: bool,
}

impl Coin {
    pub fn from_entry(entry: CatalogEntry, now: DateTime<Utc>) -> Self {
        let recently_listed = entry
            .first_historical_data
            .as_deref()
            .map(|raw| is_recently_listed(raw, &entry.symbol, now))
            .unwrap_or(false);

        let label = if recently_listed {
            format!("{} ({}) (new)", entry.name, entry.symbol)
        } else {
            format!("{} ({})", entry.name, entry.symbol)
        };

        Coin {
            id: entry.id,
            symbol: entry.symbol,
            name: entry.name,
            label,
            first_listed: entry.first_historical_data,
            recently_listed,
        }
    }

    /// Default selection when the catalog is empty or unavailable.
    pub fn fallback() -> Self {
        Coin {
            id: 1,
            symbol: "BTC".to_string(),
            name: "Bitcoin".to_string(),
            label: "Bitcoin (BTC)".to_string(),
            first_listed: None,
            recently_listed: false,
        }
    }
}

/// Listed strictly after (now - 7 days); exactly 7 days ago is not recent.
/// Unparseable dates fold to false.
fn is_recently_listed(raw: &str, symbol: &str, now: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(listed) => listed.with_timezone(&Utc) > now - Duration::days(7),
        Err(e) => {
            warn!("Could not parse first-listed date for {}: {} ({})", symbol, raw, e);
            false
        }
    }
}

/// Catalog result: provider failure becomes a message, never an error.
#[derive(Debug, Clone)]
pub struct CoinList {
    pub coins: Vec<Coin>,
    pub error: Option<String>,
}
