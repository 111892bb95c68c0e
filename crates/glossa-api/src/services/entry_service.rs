//! Entry writes and the administrative reset.
//!
//! Every write that can change a rendering goes through here so the render
//! cache and the request's keyword index are kept coherent with the store.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use glossa_core::{
    EntryRepository, Error, KvStore, RequestContext, Result, SpamChecker, UpsertOutcome,
    WriteEntryRequest,
};

use super::render_cache::RenderCache;
use super::star_ledger::StarLedger;

/// Insert attempts before an upsert gives up on a row that keeps vanishing.
const UPSERT_ATTEMPTS: usize = 2;

#[derive(Clone)]
pub struct EntryService {
    entries: Arc<dyn EntryRepository>,
    spam: Arc<dyn SpamChecker>,
    kv: Arc<dyn KvStore>,
    render_cache: RenderCache,
    star_ledger: StarLedger,
}

impl EntryService {
    pub fn new(
        entries: Arc<dyn EntryRepository>,
        spam: Arc<dyn SpamChecker>,
        kv: Arc<dyn KvStore>,
        render_cache: RenderCache,
        star_ledger: StarLedger,
    ) -> Self {
        Self {
            entries,
            spam,
            kv,
            render_cache,
            star_ledger,
        }
    }

    /// Insert the entry, or overwrite it if the keyword already exists.
    ///
    /// The unique constraint decides between the two paths, so concurrent
    /// upserts of one new keyword produce exactly one insert.
    pub async fn upsert(&self, req: &WriteEntryRequest) -> Result<UpsertOutcome> {
        for _ in 0..UPSERT_ATTEMPTS {
            match self.entries.insert(req).await {
                Ok(()) => {
                    let mut affected: BTreeSet<String> = self
                        .entries
                        .keywords_mentioning(&req.keyword)
                        .await?
                        .into_iter()
                        .collect();
                    affected.insert(req.keyword.clone());
                    return Ok(UpsertOutcome {
                        keyword: req.keyword.clone(),
                        inserted: true,
                        affected,
                    });
                }
                Err(Error::DuplicateKeyword(_)) => {
                    if self.entries.update(req).await? {
                        return Ok(UpsertOutcome {
                            keyword: req.keyword.clone(),
                            inserted: false,
                            affected: BTreeSet::from([req.keyword.clone()]),
                        });
                    }
                    debug!(
                        subsystem = "entries",
                        component = "entry_service",
                        op = "upsert",
                        keyword = %req.keyword,
                        "Entry deleted between insert and update, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::Internal(format!(
            "upsert of '{}' did not settle after {} attempts",
            req.keyword, UPSERT_ATTEMPTS
        )))
    }

    /// Validate, spam-check and upsert an entry, then drop every cached
    /// rendering the write can have changed.
    pub async fn save(
        &self,
        ctx: &mut RequestContext,
        author_id: i64,
        keyword: &str,
        description: &str,
    ) -> Result<UpsertOutcome> {
        if keyword.is_empty() {
            return Err(Error::InvalidInput("keyword must not be empty".to_string()));
        }
        self.ensure_not_spam(description, "description").await?;
        self.ensure_not_spam(keyword, "keyword").await?;

        let start = Instant::now();
        let outcome = self
            .upsert(&WriteEntryRequest {
                keyword: keyword.to_string(),
                description: description.to_string(),
                author_id,
            })
            .await?;

        self.render_cache.invalidate_all(&outcome.affected).await?;
        if outcome.inserted {
            ctx.refresh_index();
        }

        info!(
            subsystem = "entries",
            component = "entry_service",
            op = "save",
            keyword = %keyword,
            inserted = outcome.inserted,
            affected_count = outcome.affected.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Entry saved"
        );
        Ok(outcome)
    }

    async fn ensure_not_spam(&self, content: &str, field: &str) -> Result<()> {
        if self.spam.is_valid(content).await? {
            Ok(())
        } else {
            Err(Error::SpamRejected(field.to_string()))
        }
    }

    /// Delete an entry. Other entries keep their cached links to it.
    pub async fn delete(&self, keyword: &str) -> Result<()> {
        if !self.entries.delete(keyword).await? {
            return Err(Error::NotFound(format!("keyword '{}'", keyword)));
        }
        self.render_cache.invalidate(keyword).await?;

        info!(
            subsystem = "entries",
            component = "entry_service",
            op = "delete",
            keyword = %keyword,
            "Entry deleted"
        );
        Ok(())
    }

    /// Return the service to its seed state and pre-render every entry.
    ///
    /// Drops entries above `seed_boundary`, clears stars, flushes every cache
    /// key and warms the render cache. Returns the number of entries warmed.
    pub async fn reset(&self, seed_boundary: i64) -> Result<usize> {
        let start = Instant::now();

        let removed = self.entries.delete_beyond(seed_boundary).await?;
        self.star_ledger.clear().await?;
        self.kv.flush_all().await?;

        let entries = self.entries.list_all().await?;
        let mut ctx = RequestContext::new(self.entries.clone());
        let linker = ctx.linker().await?;
        for entry in &entries {
            self.render_cache
                .put(&entry.keyword, &linker.render(&entry.description))
                .await?;
        }

        info!(
            subsystem = "admin",
            component = "entry_service",
            op = "reset",
            removed,
            keyword_count = entries.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Reset complete"
        );
        Ok(entries.len())
    }
}
