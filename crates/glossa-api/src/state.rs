//! Shared application state.

use std::sync::Arc;

use glossa_core::memory::{
    MemoryEntryRepository, MemoryKvStore, MemoryStarRepository, MemoryUserRepository,
    StaticSpamChecker,
};
use glossa_core::{
    EntryRepository, KvStore, RequestContext, SpamChecker, StarRepository, UserRepository,
};
use glossa_db::Database;

use crate::config::Config;
use crate::services::{
    AccountService, EntryService, HttpSpamChecker, RedisKvStore, RenderCache, StarLedger,
};
use crate::session::SessionSigner;

/// Storage and collaborator backends the state is assembled from.
pub struct Backends {
    pub entries: Arc<dyn EntryRepository>,
    pub stars: Arc<dyn StarRepository>,
    pub users: Arc<dyn UserRepository>,
    pub kv: Arc<dyn KvStore>,
    pub spam: Arc<dyn SpamChecker>,
}

impl Backends {
    /// PostgreSQL repositories, Redis cache and the HTTP spam checker.
    pub fn production(db: Database, kv: RedisKvStore, spam: HttpSpamChecker) -> Self {
        Self {
            entries: Arc::new(db.entries),
            stars: Arc::new(db.stars),
            users: Arc::new(db.users),
            kv: Arc::new(kv),
            spam: Arc::new(spam),
        }
    }

    /// Everything in memory, with the given spam checker.
    pub fn in_memory(spam: StaticSpamChecker) -> Self {
        Self {
            entries: Arc::new(MemoryEntryRepository::new()),
            stars: Arc::new(MemoryStarRepository::new()),
            users: Arc::new(MemoryUserRepository::new()),
            kv: Arc::new(MemoryKvStore::new()),
            spam: Arc::new(spam),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub entries: Arc<dyn EntryRepository>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: SessionSigner,
    pub accounts: AccountService,
    pub render_cache: RenderCache,
    pub star_ledger: StarLedger,
    pub entry_service: EntryService,
}

impl AppState {
    pub fn new(config: Config, backends: Backends) -> Self {
        let Backends {
            entries,
            stars,
            users,
            kv,
            spam,
        } = backends;

        let render_cache = RenderCache::new(kv.clone(), entries.clone());
        let star_ledger = StarLedger::new(stars, kv.clone());
        let entry_service = EntryService::new(
            entries.clone(),
            spam,
            kv,
            render_cache.clone(),
            star_ledger.clone(),
        );

        Self {
            sessions: SessionSigner::new(&config.session_secret, config.is_production()),
            accounts: AccountService::new(users.clone()),
            config: Arc::new(config),
            entries,
            users,
            render_cache,
            star_ledger,
            entry_service,
        }
    }

    /// Fresh per-request context over the entry store.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::new(self.entries.clone())
    }
}
