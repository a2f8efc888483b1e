//! Interceptor registry.
//!
//! # Data Flow
//! ```text
//! register(app, options)
//!     → compile matcher (reject conflicting options)
//!     → push Registration onto the active list (read-copy-update)
//!     → return RegistryGuard (drop restores) or persist via install()
//!
//! dispatch (per outbound request)
//!     → find(host, uri): walk registrations newest-first
//!     → matched: hand to transport for in-process dispatch
//!     → unmatched: transport delegates to the real client
//! ```
//!
//! # Design Decisions
//! - The registration list lives in an `ArcSwap`: the dispatch path takes
//!   no lock, mutation is read-copy-update
//! - Newest registration wins when several match (stack discipline, same
//!   order guards restore in)
//! - `unregister` clears everything and is idempotent
//! - A process-wide default registry exists for drop-in use, but fresh
//!   registries can be created and injected so tests stay isolated

pub mod guard;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use tracing::debug;

use crate::app::AppHandler;
use crate::error::Error;
use crate::routing::matcher::{MatchRule, Matcher};

pub use guard::RegistryGuard;

/// Matching options for a single registration.
///
/// At most one of `host` or `uri` may be set; setting both fails at
/// registration with [`Error::InvalidMatcher`]. The default (no option)
/// matches every request.
#[derive(Debug, Default)]
pub struct RegisterOptions {
    host: Option<MatchRule>,
    uri: Option<MatchRule>,
}

impl RegisterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match on the request host: exact string or regex pattern.
    pub fn host(mut self, rule: impl Into<MatchRule>) -> Self {
        self.host = Some(rule.into());
        self
    }

    /// Match on the request host with an arbitrary predicate.
    pub fn host_matches<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.host = Some(MatchRule::predicate(f));
        self
    }

    /// Match on the full request URI: exact string or regex pattern.
    pub fn uri(mut self, rule: impl Into<MatchRule>) -> Self {
        self.uri = Some(rule.into());
        self
    }

    /// Match on the full request URI with an arbitrary predicate.
    pub fn uri_matches<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.uri = Some(MatchRule::predicate(f));
        self
    }

    fn into_matcher(self) -> Result<Matcher, Error> {
        match (self.host, self.uri) {
            (Some(_), Some(_)) => Err(Error::InvalidMatcher(
                "`host` and `uri` are mutually exclusive".to_owned(),
            )),
            (Some(rule), None) => Ok(Matcher::host(rule)),
            (None, Some(rule)) => Ok(Matcher::uri(rule)),
            (None, None) => Ok(Matcher::All),
        }
    }
}

/// One active override: a compiled matcher and its target handler.
/// Immutable once created.
pub struct Registration {
    id: u64,
    matcher: Matcher,
    app: Arc<dyn AppHandler>,
}

impl Registration {
    pub(crate) fn matches(&self, host: Option<&str>, uri: &str) -> bool {
        self.matcher.matches(host, uri)
    }

    pub(crate) fn app(&self) -> &dyn AppHandler {
        self.app.as_ref()
    }
}

struct RegistryInner {
    entries: ArcSwap<Vec<Arc<Registration>>>,
    next_id: AtomicU64,
}

/// Registry of active interception overrides.
///
/// Cheap to clone; clones share the same state. Use [`Registry::global`]
/// for the process-wide default or [`Registry::new`] for an isolated one.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    /// Create a fresh, empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                entries: ArcSwap::from_pointee(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// The process-wide default registry.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// Register an override. The returned guard removes it again when
    /// dropped, on every exit path including panic unwinding.
    pub fn register<H>(&self, app: H, options: RegisterOptions) -> Result<RegistryGuard, Error>
    where
        H: AppHandler + 'static,
    {
        let id = self.push(app, options)?;
        Ok(RegistryGuard::new(self.clone(), id))
    }

    /// Register a persistent override that stays active until
    /// [`Registry::unregister`] is called.
    pub fn install<H>(&self, app: H, options: RegisterOptions) -> Result<(), Error>
    where
        H: AppHandler + 'static,
    {
        self.push(app, options)?;
        Ok(())
    }

    fn push<H>(&self, app: H, options: RegisterOptions) -> Result<u64, Error>
    where
        H: AppHandler + 'static,
    {
        let matcher = options.into_matcher()?;
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, matcher = ?matcher, "registering interception override");

        let registration = Arc::new(Registration {
            id,
            matcher,
            app: Arc::new(app),
        });
        self.inner.entries.rcu(|entries| {
            let mut next = (**entries).clone();
            next.push(Arc::clone(&registration));
            next
        });
        Ok(id)
    }

    /// Remove every active override, restoring pure passthrough behavior.
    /// Calling this with nothing registered is a no-op.
    pub fn unregister(&self) {
        debug!("removing all interception overrides");
        self.inner.entries.store(Arc::new(Vec::new()));
    }

    /// Remove the single registration a guard owns.
    pub(crate) fn remove(&self, id: u64) {
        debug!(id, "removing interception override");
        self.inner.entries.rcu(|entries| {
            entries
                .iter()
                .filter(|registration| registration.id != id)
                .cloned()
                .collect::<Vec<_>>()
        });
    }

    /// Find the registration that should handle a request, newest first.
    pub(crate) fn find(&self, host: Option<&str>, uri: &str) -> Option<Arc<Registration>> {
        let entries = self.inner.entries.load();
        entries
            .iter()
            .rev()
            .find(|registration| registration.matches(host, uri))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.load().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
