//! Service layer for the glossa API.

pub mod accounts;
pub mod entry_service;
pub mod redis_store;
pub mod render_cache;
pub mod spam;
pub mod star_ledger;

pub use accounts::AccountService;
pub use entry_service::EntryService;
pub use redis_store::RedisKvStore;
pub use render_cache::RenderCache;
pub use spam::HttpSpamChecker;
pub use star_ledger::StarLedger;
