//! Per-request derived state.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::error::Result;
use crate::keyword_index::KeywordIndex;
use crate::linker::Linker;
use crate::traits::EntryRepository;

/// Derived caches scoped to one request.
///
/// The keyword index and the linker compiled from it are built on first use
/// and reused for the rest of the request. Nothing here outlives the request.
pub struct RequestContext {
    entries: Arc<dyn EntryRepository>,
    index: Option<Arc<KeywordIndex>>,
    linker: Option<Arc<Linker>>,
}

impl RequestContext {
    pub fn new(entries: Arc<dyn EntryRepository>) -> Self {
        Self {
            entries,
            index: None,
            linker: None,
        }
    }

    /// Keyword index for this request, scanning the store on first call.
    pub async fn keyword_index(&mut self) -> Result<Arc<KeywordIndex>> {
        if let Some(index) = &self.index {
            return Ok(index.clone());
        }

        let start = Instant::now();
        let index = Arc::new(KeywordIndex::from_keywords(
            self.entries.all_keywords().await?,
        ));
        debug!(
            subsystem = "api",
            component = "request_context",
            op = "build_index",
            keyword_count = index.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Keyword index built"
        );

        self.index = Some(index.clone());
        Ok(index)
    }

    /// Linker compiled from this request's keyword index.
    pub async fn linker(&mut self) -> Result<Arc<Linker>> {
        if let Some(linker) = &self.linker {
            return Ok(linker.clone());
        }

        let index = self.keyword_index().await?;
        let linker = Arc::new(Linker::new(&index)?);
        self.linker = Some(linker.clone());
        Ok(linker)
    }

    /// Drop the index and linker so the next use sees the current keyword set.
    pub fn refresh_index(&mut self) {
        self.index = None;
        self.linker = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEntryRepository;
    use crate::models::WriteEntryRequest;
    use crate::traits::EntryRepository;

    fn write(keyword: &str, description: &str) -> WriteEntryRequest {
        WriteEntryRequest {
            keyword: keyword.to_string(),
            description: description.to_string(),
            author_id: 1,
        }
    }

    #[tokio::test]
    async fn test_index_is_memoized_until_refresh() {
        let entries = Arc::new(MemoryEntryRepository::new());
        entries.insert(&write("cat", "meow")).await.unwrap();

        let mut ctx = RequestContext::new(entries.clone());
        assert_eq!(ctx.keyword_index().await.unwrap().len(), 1);

        entries.insert(&write("dog", "woof")).await.unwrap();
        assert_eq!(ctx.keyword_index().await.unwrap().len(), 1);

        ctx.refresh_index();
        let index = ctx.keyword_index().await.unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.contains("dog"));
    }

    #[tokio::test]
    async fn test_linker_follows_refreshed_index() {
        let entries = Arc::new(MemoryEntryRepository::new());
        let mut ctx = RequestContext::new(entries.clone());
        assert_eq!(ctx.linker().await.unwrap().render("cat"), "cat");

        entries.insert(&write("cat", "meow")).await.unwrap();
        ctx.refresh_index();
        assert!(ctx.linker().await.unwrap().render("cat").contains("<a "));
    }
}
