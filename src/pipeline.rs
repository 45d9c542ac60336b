//! Staged search: resolve the player, fetch a small preview window, then
//! backfill the rest of the history in delayed batches.
//!
//! All session mutations go through [`Session::apply`] with the generation
//! the run started under. Starting a new search bumps the generation, so an
//! older run still in flight can no longer write into the session and stops
//! at its next checkpoint.

use crate::analysis::filter::FilterCriteria;
use crate::analysis::stats::{aggregate, AggregateSummary};
use crate::api::models::MatchSlot;
use crate::config::FetchPolicy;
use crate::error::AppError;
use crate::identity::Bootstrap;
use crate::matches::set::MatchSet;
use crate::reference::ReferenceLookup;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The three network operations a search needs.
pub trait MatchSource: Send + Sync {
    fn bootstrap(&self, game_name: &str, tag_line: &str, server: &str) -> Result<Bootstrap, AppError>;

    fn match_ids(&self, puuid: &str, server: &str, count: i64, start: u32) -> Result<Vec<String>, AppError>;

    fn matches(&self, ids: &[String], server: &str) -> Result<Vec<MatchSlot>, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PipelineState {
    #[default]
    Idle,
    Resolving,
    PreviewFetching,
    PreviewReady,
    Backfilling,
    Complete,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    /// Placeholders seen so far. They are never merged.
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub state: PipelineState,
    pub player: Option<Bootstrap>,
    pub matches: MatchSet,
    pub progress: Progress,
    pub error: Option<String>,
}

impl SessionState {
    fn merge(&mut self, slots: Vec<MatchSlot>) {
        let report = self.matches.merge_slots(slots);
        self.progress.failed += report.failed;
        debug!(added = report.added, replaced = report.replaced, failed = report.failed, "merged batch");
    }

    // done only moves forward within one run
    fn advance(&mut self, done: usize) {
        self.progress.done = self.progress.done.max(done);
    }
}

/// One search session. Shared between the thread running a search and
/// whoever reads its state or starts the next search.
#[derive(Debug, Default)]
pub struct Session {
    generation: AtomicU64,
    inner: Mutex<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears everything from the previous search and returns the new
    /// generation.
    pub fn begin(&self) -> u64 {
        let mut inner = self.lock();
        *inner = SessionState {
            state: PipelineState::Resolving,
            ..SessionState::default()
        };
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Runs `f` on the state unless a newer search has begun since
    /// `generation`.
    pub fn apply<R>(&self, generation: u64, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        let mut inner = self.lock();
        if !self.is_current(generation) {
            debug!(generation, current = self.generation(), "dropping stale update");
            return None;
        }
        Some(f(&mut inner))
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    /// Recomputes the summary for the current match set. Never fetches.
    pub fn summary(
        &self,
        filter: &FilterCriteria,
        lookup: Option<&dyn ReferenceLookup>,
    ) -> Option<AggregateSummary> {
        let inner = self.lock();
        let player = inner.player.as_ref()?;
        Some(aggregate(player.puuid(), &filter.apply(&inner.matches), lookup))
    }
}

pub trait PipelineObserver {
    fn on_state(&self, _state: PipelineState) {}

    fn on_progress(&self, _progress: Progress) {}
}

pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Complete,
    /// Backfill was disabled; the session holds the preview window only.
    PreviewOnly,
    /// A newer search took over the session before this one finished.
    Superseded,
}

type Sleep = Box<dyn Fn(Duration) + Send + Sync>;

pub struct Pipeline {
    source: Arc<dyn MatchSource>,
    policy: FetchPolicy,
    backfill: bool,
    sleep: Sleep,
}

impl Pipeline {
    pub fn new(source: Arc<dyn MatchSource>, policy: FetchPolicy) -> Self {
        Pipeline {
            source,
            policy,
            backfill: true,
            sleep: Box::new(thread::sleep),
        }
    }

    pub fn with_backfill(mut self, backfill: bool) -> Self {
        self.backfill = backfill;
        self
    }

    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn run_search(
        &self,
        session: &Session,
        game_name: &str,
        tag_line: &str,
        server: &str,
        observer: &dyn PipelineObserver,
    ) -> Result<SearchOutcome, AppError> {
        let generation = session.begin();
        info!(generation, player = %format!("{}#{}", game_name, tag_line), server, "search started");
        observer.on_state(PipelineState::Resolving);
        observer.on_progress(Progress::default());

        let run = Run {
            pipeline: self,
            session,
            generation,
            server,
            observer,
        };

        match run.stages(game_name, tag_line) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                let recorded = session.apply(generation, |s| {
                    s.state = PipelineState::Error;
                    s.error = Some(e.to_string());
                });
                if recorded.is_none() {
                    return Ok(SearchOutcome::Superseded);
                }
                warn!(generation, error = %e, "search failed");
                observer.on_state(PipelineState::Error);
                Err(e)
            }
        }
    }
}

struct Run<'a> {
    pipeline: &'a Pipeline,
    session: &'a Session,
    generation: u64,
    server: &'a str,
    observer: &'a dyn PipelineObserver,
}

impl Run<'_> {
    /// Applies `f` and notifies the observer. False when superseded.
    fn step(&self, f: impl FnOnce(&mut SessionState)) -> bool {
        let applied = self.session.apply(self.generation, |s| {
            let before = s.state;
            f(s);
            let changed = (before != s.state).then_some(s.state);
            (changed, s.progress)
        });

        match applied {
            Some((changed, progress)) => {
                if let Some(state) = changed {
                    self.observer.on_state(state);
                }
                self.observer.on_progress(progress);
                true
            }
            None => false,
        }
    }

    fn stages(&self, game_name: &str, tag_line: &str) -> Result<SearchOutcome, AppError> {
        let source = &self.pipeline.source;
        let policy = &self.pipeline.policy;
        let limit = policy.history_limit;

        let player = source.bootstrap(game_name, tag_line, self.server)?;
        let puuid = player.puuid().to_string();
        if !self.step(|s| {
            s.player = Some(player);
            s.state = PipelineState::PreviewFetching;
        }) {
            return Ok(SearchOutcome::Superseded);
        }

        let preview_ids = source.match_ids(&puuid, self.server, policy.preview_count as i64, 0)?;
        let preview = if preview_ids.is_empty() {
            Vec::new()
        } else {
            source.matches(&preview_ids, self.server)?
        };
        if !self.step(|s| {
            s.merge(preview);
            let size = s.matches.len();
            s.advance(limit.min(size));
            s.progress.total = limit;
            s.state = PipelineState::PreviewReady;
        }) {
            return Ok(SearchOutcome::Superseded);
        }

        if !self.pipeline.backfill {
            return Ok(SearchOutcome::PreviewOnly);
        }

        if !self.step(|s| s.state = PipelineState::Backfilling) {
            return Ok(SearchOutcome::Superseded);
        }

        let all_ids = source.match_ids(&puuid, self.server, limit as i64, 0)?;
        let total = match all_ids.len().min(limit) {
            0 => limit,
            n => n,
        };
        if !self.step(|s| s.progress.total = total) {
            return Ok(SearchOutcome::Superseded);
        }

        let seen: HashSet<&str> = preview_ids.iter().map(String::as_str).collect();
        let remaining: Vec<String> = all_ids
            .into_iter()
            .filter(|id| !seen.contains(id.as_str()))
            .collect();
        debug!(remaining = remaining.len(), total, "backfill planned");

        for (i, batch) in remaining.chunks(policy.batch_size.max(1)).enumerate() {
            if i > 0 {
                (self.pipeline.sleep)(policy.batch_delay);
                if !self.session.is_current(self.generation) {
                    return Ok(SearchOutcome::Superseded);
                }
            }

            let slots = source.matches(batch, self.server)?;
            if !self.step(|s| {
                s.merge(slots);
                let size = s.matches.len();
                s.advance(total.min(size));
            }) {
                return Ok(SearchOutcome::Superseded);
            }
        }

        if !self.step(|s| s.state = PipelineState::Complete) {
            return Ok(SearchOutcome::Superseded);
        }
        info!(generation = self.generation, "search complete");
        Ok(SearchOutcome::Complete)
    }
}
