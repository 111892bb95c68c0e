//! Stars: an append-only log in the database mirrored by one cache list per
//! keyword. Reads come from the list.

use std::sync::Arc;

use tracing::debug;

use glossa_core::defaults::STARS_KEY_PREFIX;
use glossa_core::{KvStore, Result, StarRepository};

#[derive(Clone)]
pub struct StarLedger {
    stars: Arc<dyn StarRepository>,
    kv: Arc<dyn KvStore>,
}

impl StarLedger {
    pub fn new(stars: Arc<dyn StarRepository>, kv: Arc<dyn KvStore>) -> Self {
        Self { stars, kv }
    }

    pub fn list_key(keyword: &str) -> String {
        format!("{}{}", STARS_KEY_PREFIX, keyword)
    }

    /// Record a star in the log and append it to the keyword's list.
    pub async fn append(&self, keyword: &str, user_name: &str) -> Result<()> {
        self.stars.append(keyword, user_name).await?;
        self.kv.list_push(&Self::list_key(keyword), user_name).await?;
        debug!(
            subsystem = "stars",
            component = "star_ledger",
            op = "append",
            keyword = %keyword,
            "Star recorded"
        );
        Ok(())
    }

    /// Star user names for a keyword in insertion order.
    pub async fn list_for(&self, keyword: &str) -> Result<Vec<String>> {
        self.kv.list_range(&Self::list_key(keyword)).await
    }

    /// Empty the log. The lists go with the cache flush that accompanies it.
    pub async fn clear(&self) -> Result<()> {
        self.stars.truncate().await
    }
}
