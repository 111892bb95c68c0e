//! Cache of rendered entry HTML.
//!
//! Keys are `glossa:html:<keyword>`. Entries are filled on read and removed
//! by the entry service whenever a write can change the rendering.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::debug;

use glossa_core::defaults::HTML_KEY_PREFIX;
use glossa_core::{EntryRepository, KvStore, RequestContext, Result};

#[derive(Clone)]
pub struct RenderCache {
    kv: Arc<dyn KvStore>,
    entries: Arc<dyn EntryRepository>,
}

impl RenderCache {
    pub fn new(kv: Arc<dyn KvStore>, entries: Arc<dyn EntryRepository>) -> Self {
        Self { kv, entries }
    }

    pub fn cache_key(keyword: &str) -> String {
        format!("{}{}", HTML_KEY_PREFIX, keyword)
    }

    pub async fn get(&self, keyword: &str) -> Result<Option<String>> {
        self.kv.get(&Self::cache_key(keyword)).await
    }

    pub async fn put(&self, keyword: &str, html: &str) -> Result<()> {
        self.kv.set(&Self::cache_key(keyword), html).await
    }

    pub async fn invalidate(&self, keyword: &str) -> Result<()> {
        self.kv.delete(&Self::cache_key(keyword)).await
    }

    /// Drop the cached rendering of every keyword in the set.
    pub async fn invalidate_all(&self, keywords: &BTreeSet<String>) -> Result<()> {
        try_join_all(keywords.iter().map(|kw| self.invalidate(kw))).await?;
        debug!(
            subsystem = "cache",
            component = "render_cache",
            op = "invalidate",
            affected_count = keywords.len(),
            "Rendered HTML invalidated"
        );
        Ok(())
    }

    /// Rendered HTML for an entry, rendering and caching it on a miss.
    ///
    /// `description` skips the store lookup when the caller already holds
    /// the entry. Returns `None` when no entry has this keyword.
    pub async fn rendered_html_for(
        &self,
        ctx: &mut RequestContext,
        keyword: &str,
        description: Option<&str>,
    ) -> Result<Option<String>> {
        if let Some(html) = self.get(keyword).await? {
            return Ok(Some(html));
        }

        let description = match description {
            Some(d) => d.to_string(),
            None => match self.entries.get(keyword).await? {
                Some(entry) => entry.description,
                None => return Ok(None),
            },
        };

        let html = ctx.linker().await?.render(&description);
        self.put(keyword, &html).await?;
        debug!(
            subsystem = "cache",
            component = "render_cache",
            op = "fill",
            keyword = %keyword,
            "Rendered HTML cached"
        );
        Ok(Some(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_core::memory::{MemoryEntryRepository, MemoryKvStore};
    use glossa_core::WriteEntryRequest;

    fn write(keyword: &str, description: &str) -> WriteEntryRequest {
        WriteEntryRequest {
            keyword: keyword.to_string(),
            description: description.to_string(),
            author_id: 1,
        }
    }

    async fn setup() -> (RenderCache, Arc<MemoryEntryRepository>, Arc<MemoryKvStore>) {
        let entries = Arc::new(MemoryEntryRepository::new());
        let kv = Arc::new(MemoryKvStore::new());
        entries.insert(&write("cat", "a cat")).await.unwrap();
        entries.insert(&write("dog", "chases cat")).await.unwrap();
        (RenderCache::new(kv.clone(), entries.clone()), entries, kv)
    }

    #[tokio::test]
    async fn test_miss_renders_and_fills() {
        let (cache, entries, kv) = setup().await;
        let mut ctx = RequestContext::new(entries);

        let html = cache.rendered_html_for(&mut ctx, "dog", None).await.unwrap().unwrap();
        assert_eq!(html, r#"chases <a href="/keyword/cat">cat</a>"#);
        assert_eq!(kv.get("glossa:html:dog").await.unwrap(), Some(html));
    }

    #[tokio::test]
    async fn test_hit_returns_cached_value() {
        let (cache, entries, _) = setup().await;
        cache.put("dog", "stale").await.unwrap();

        let mut ctx = RequestContext::new(entries);
        let html = cache.rendered_html_for(&mut ctx, "dog", None).await.unwrap();
        assert_eq!(html.as_deref(), Some("stale"));
    }

    #[tokio::test]
    async fn test_unknown_keyword_is_none() {
        let (cache, entries, kv) = setup().await;
        let mut ctx = RequestContext::new(entries);
        assert_eq!(cache.rendered_html_for(&mut ctx, "owl", None).await.unwrap(), None);
        assert!(kv.get("glossa:html:owl").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let (cache, _, kv) = setup().await;
        cache.put("cat", "x").await.unwrap();
        cache.put("dog", "y").await.unwrap();

        let keys: BTreeSet<String> = ["cat".to_string()].into_iter().collect();
        cache.invalidate_all(&keys).await.unwrap();

        assert_eq!(cache.get("cat").await.unwrap(), None);
        assert_eq!(kv.get("glossa:html:dog").await.unwrap().as_deref(), Some("y"));
    }
}
