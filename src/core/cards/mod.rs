use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::core::api::BackendClient;
use crate::core::api::types::CardDef;

/// Where card definitions come from. Behind a trait so display code never
/// cares whether cards arrive over HTTP or from a fixture.
#[async_trait]
pub trait CardSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<CardDef>>;
}

pub struct ApiCardSource {
    client: BackendClient,
}

impl ApiCardSource {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CardSource for ApiCardSource {
    async fn fetch_all(&self) -> Result<Vec<CardDef>> {
        Ok(self.client.list_cards().await?.cards)
    }
}

/// Memoized card database. The source is hit at most once for the life of
/// the catalog; a failed load is not cached and the next call retries.
pub struct CardCatalog {
    source: Box<dyn CardSource>,
    cards: OnceCell<HashMap<String, CardDef>>,
}

impl CardCatalog {
    pub fn new(source: impl CardSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cards: OnceCell::new(),
        }
    }

    async fn cache(&self) -> Result<&HashMap<String, CardDef>> {
        self.cards
            .get_or_try_init(|| async {
                let cards = self.source.fetch_all().await?;
                tracing::debug!("card catalog loaded, {} cards", cards.len());
                Ok(cards
                    .into_iter()
                    .map(|card| (card.name.to_lowercase(), card))
                    .collect())
            })
            .await
    }

    /// Case-insensitive lookup by card name.
    pub async fn get(&self, name: &str) -> Result<Option<&CardDef>> {
        Ok(self.cache().await?.get(&name.to_lowercase()))
    }

    /// Every card, sorted by name.
    pub async fn all(&self) -> Result<Vec<&CardDef>> {
        let mut cards: Vec<&CardDef> = self.cache().await?.values().collect();
        cards.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cards)
    }
}
