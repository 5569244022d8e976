//! Time-gated cache of the item metadata list.
//!
//! The item list is a large JSON array hosted outside of the action services.
//! It is fetched on first use and refreshed once it gets older than the
//! configured duration. Fetch failures never reach the caller: the last good
//! list (or an empty one) keeps being served and the next access retries.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use mockall::automock;
use reqwest::Client;

use crate::ffapi::ItemRecord;

/// Source of the item metadata list.
#[automock]
pub trait ItemFetcher {
    /// Downloads and decodes the full item list.
    async fn fetch_items(&self) -> Result<Vec<ItemRecord>, anyhow::Error>;
}

/// Time source used to decide whether the cache is stale.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by the monotonic system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// [`ItemFetcher`] downloading the list over HTTP.
pub struct HttpItemFetcher {
    /// URL of the JSON array
    url: String,
    /// HTTP client
    client: Client,
}

impl HttpItemFetcher {
    /// Create a new [HttpItemFetcher].
    ///
    /// # Arguments
    ///
    /// * `url` - URL of the JSON item list
    /// * `timeout` - Timeout of the whole request
    /// * `user_agent` - `User-Agent` header sent with the request
    pub fn new(url: &str, timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .build()?;

        Ok(HttpItemFetcher {
            url: url.to_string(),
            client,
        })
    }
}

impl ItemFetcher for HttpItemFetcher {
    async fn fetch_items(&self) -> Result<Vec<ItemRecord>, anyhow::Error> {
        debug!("request {}", &self.url);

        let items: Vec<ItemRecord> = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(items)
    }
}

/// Cache of the item list with a freshness timestamp.
///
/// `items` is always either the last successfully fetched list or empty.
/// `fetched_at` only moves on a successful fetch.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use emotebot::ffapi::{HttpItemFetcher, ItemCache, SystemClock};
///
/// # async fn example() -> Result<(), anyhow::Error> {
/// let fetcher = HttpItemFetcher::new("https://example.com/items.json", Duration::from_secs(12), "emotebot")?;
/// let mut cache = ItemCache::new(fetcher, SystemClock, Duration::from_secs(3600));
/// println!("{}", cache.get_emote_name(909000075).await);
/// # Ok(())
/// # }
/// ```
pub struct ItemCache<F: ItemFetcher, C: Clock> {
    fetcher: F,
    clock: C,
    /// Age after which the list is fetched again
    max_age: Duration,
    items: Vec<ItemRecord>,
    /// Time of the last successful fetch
    fetched_at: Option<Instant>,
}

impl<F: ItemFetcher, C: Clock> ItemCache<F, C> {
    /// Create an empty [ItemCache]. Nothing is fetched until the first access.
    pub fn new(fetcher: F, clock: C, max_age: Duration) -> Self {
        ItemCache {
            fetcher,
            clock,
            max_age,
            items: Vec::new(),
            fetched_at: None,
        }
    }

    /// Returns the best known item list, refreshing it first when needed.
    ///
    /// A fetch is attempted when the cache is empty or older than `max_age`.
    pub async fn get_items(&mut self) -> &[ItemRecord] {
        let now = self.clock.now();

        if self.is_stale(now) {
            info!("fetching item list");
            match self.fetcher.fetch_items().await {
                Ok(items) => {
                    info!("loaded {} items", items.len());
                    self.items = items;
                    self.fetched_at = Some(now);
                }
                Err(e) => {
                    warn!(
                        "failed to fetch item list, serving {} cached items: {}",
                        self.items.len(),
                        e
                    );
                }
            }
        }

        &self.items
    }

    /// Resolves an emote id to its display name.
    ///
    /// Returns `Emote {id}` when the id is unknown or the record has no name.
    pub async fn get_emote_name(&mut self, emote_id: u64) -> String {
        let wanted = emote_id.to_string();

        self.get_items()
            .await
            .iter()
            .find(|item| item.id_string() == wanted)
            .and_then(|item| item.name.clone())
            .unwrap_or_else(|| format!("Emote {}", emote_id))
    }

    fn is_stale(&self, now: Instant) -> bool {
        match self.fetched_at {
            Some(fetched_at) if !self.items.is_empty() => {
                now.saturating_duration_since(fetched_at) > self.max_age
            }
            _ => true,
        }
    }
}
