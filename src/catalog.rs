use crate::api::MarketDataClient;
use crate::models::{CatalogEntry, Coin, CoinList};

use chrono::{DateTime, Utc};
use tracing::{error, info};

pub struct CoinCatalog {
    gateway: MarketDataClient,
}

impl CoinCatalog {
    pub fn new(gateway: MarketDataClient) -> Self {
        Self { gateway }
    }

    /// Selectable coin universe: incomplete entries dropped, recency
    /// derived, labeled, sorted by name. A provider failure becomes a
    /// message on the result, never a raised error.
    pub async fn list_coins(&self) -> CoinList {
        match self.gateway.fetch_catalog().await {
            Ok(entries) => {
                let coins = build_coins(entries, Utc::now());
                info!("Catalog ready with {} coins", coins.len());
                CoinList { coins, error: None }
            }
            Err(e) => {
                error!("Catalog fetch failed: {}", e);
                CoinList {
                    coins: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

fn build_coins(entries: Vec<CatalogEntry>, now: DateTime<Utc>) -> Vec<Coin> {
    let mut coins: Vec<Coin> = entries
        .into_iter()
        .filter(CatalogEntry::is_complete)
        .map(|entry| Coin::from_entry(entry, now))
        .collect();

    // sort_by is stable, so catalog order breaks ties on identical names
    coins.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    coins
}
