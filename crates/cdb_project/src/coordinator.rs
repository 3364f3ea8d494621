//! The asynchronous ingestion pass.
//!
//! A pass reads the database bytes, fingerprints them, and either
//! short-circuits (unchanged bytes) or runs the parser and the scanner on two
//! blocking tasks. [`IngestionCoordinator::finish`] joins both, merges their
//! output into a [`Project`], and publishes it on a watch channel.
//!
//! Starting a pass while another is in flight cancels the old one: its token
//! is cancelled and its handles dropped, so its results never reach a merge.

use std::path::PathBuf;
use std::sync::Arc;

use cdb_common::ProjectFileHash;
use cdb_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use cdb_parser::{extras_path, parse_contents, parse_database, DatabaseContents};
use cdb_scan::{scan_tree, MimeBinaryCache, ScanError, ScanFilter, ScanResult, ScannedFile};
use cdb_toolchain::{BuildEnvironment, HostOs, ToolchainRegistry, ToolchainResolver};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::build_part::{build_parts, BuildDescription};
use crate::settings::ProjectSettings;
use crate::tree::FolderNode;
use crate::tree_builder::{build_tree, TreeInputs};

/// Where the coordinator is in a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorState {
    /// No pass in flight.
    Idle,
    /// The parser and the scanner are running.
    Scanning,
    /// Both producers finished; the project is being assembled.
    Merging,
}

/// The merged result of one pass.
#[derive(Clone, Debug, Serialize)]
pub struct Project {
    /// The project tree.
    pub root: FolderNode,
    /// Build parts and toolchains.
    pub build: BuildDescription,
    /// Fingerprint of the database bytes this project was built from.
    pub hash: Option<ProjectFileHash>,
    /// Everything reported during the pass.
    pub diagnostics: Vec<Diagnostic>,
    /// The pass number that produced this project.
    pub generation: u64,
}

/// How a pass ended.
#[derive(Clone, Debug)]
pub enum ReparseOutcome {
    /// A new project was built and published.
    Success(Arc<Project>),
    /// The database bytes were unchanged; nothing was rebuilt.
    Cached(ProjectFileHash),
    /// The pass was cancelled, or superseded by a newer one.
    Cancelled,
}

struct PendingPass {
    generation: u64,
    cancel: CancellationToken,
    hash: Option<ProjectFileHash>,
    sink: Arc<DiagnosticSink>,
    work: PassWork,
}

enum PassWork {
    Cached(ProjectFileHash),
    Running {
        parse: JoinHandle<DatabaseContents>,
        scan: Option<JoinHandle<Result<ScanResult, ScanError>>>,
    },
}

/// Runs ingestion passes for one project.
///
/// The hash of the last successful pass and the MIME verdict cache are the
/// only state carried from one pass to the next.
pub struct IngestionCoordinator {
    settings: ProjectSettings,
    registry: Arc<dyn ToolchainRegistry>,
    environment: Arc<dyn BuildEnvironment>,
    host: HostOs,
    state: CoordinatorState,
    previous_hash: Option<ProjectFileHash>,
    mime_cache: Option<MimeBinaryCache>,
    generation: u64,
    cancel: CancellationToken,
    pending: Option<PendingPass>,
    published: watch::Sender<Option<Arc<Project>>>,
}

impl IngestionCoordinator {
    /// Creates an idle coordinator for the running host.
    pub fn new(
        settings: ProjectSettings,
        registry: Arc<dyn ToolchainRegistry>,
        environment: Arc<dyn BuildEnvironment>,
    ) -> Self {
        let (published, _) = watch::channel(None);
        Self {
            settings,
            registry,
            environment,
            host: HostOs::current(),
            state: CoordinatorState::Idle,
            previous_hash: None,
            mime_cache: Some(MimeBinaryCache::new()),
            generation: 0,
            cancel: CancellationToken::new(),
            pending: None,
            published,
        }
    }

    /// Overrides the host whose compiler conventions are applied.
    pub fn with_host(mut self, host: HostOs) -> Self {
        self.host = host;
        self
    }

    /// Receives every published project; starts with the latest one.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Project>>> {
        self.published.subscribe()
    }

    /// The most recently published project.
    pub fn current(&self) -> Option<Arc<Project>> {
        self.published.borrow().clone()
    }

    /// The current state.
    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// The settings passes run with.
    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// Fingerprint of the database as of the last successful pass.
    pub fn previous_hash(&self) -> Option<ProjectFileHash> {
        self.previous_hash
    }

    /// Number of passes started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The MIME verdict cache, unless a scan currently owns it.
    pub fn mime_cache(&self) -> Option<&MimeBinaryCache> {
        self.mime_cache.as_ref()
    }

    /// Moves the project root. The stored hash is cleared so the next pass
    /// rebuilds even if the database is unchanged.
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.settings.root = root.into();
        self.previous_hash = None;
    }

    /// The cancellation token of the current pass.
    ///
    /// Cancelling it from another task makes [`finish`](Self::finish) return
    /// [`ReparseOutcome::Cancelled`].
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancels the pass in flight, if any.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Starts a new pass, cancelling the one in flight.
    ///
    /// Must be called from within a Tokio runtime. Returns the new pass's
    /// generation.
    pub fn start(&mut self) -> u64 {
        if let Some(old) = self.pending.take() {
            old.cancel.cancel();
            tracing::debug!(generation = old.generation, "superseded in-flight pass");
        }
        self.generation += 1;
        self.cancel = CancellationToken::new();
        let generation = self.generation;
        let sink = Arc::new(DiagnosticSink::new());

        let bytes = std::fs::read(&self.settings.database);
        let hash = bytes
            .as_ref()
            .ok()
            .map(|bytes| ProjectFileHash::from_bytes(bytes));

        if self.settings.skip_unchanged {
            if let Some(hash) = hash.filter(|h| Some(*h) == self.previous_hash) {
                tracing::debug!(generation, %hash, "database unchanged");
                self.state = CoordinatorState::Idle;
                self.pending = Some(PendingPass {
                    generation,
                    cancel: self.cancel.clone(),
                    hash: Some(hash),
                    sink,
                    work: PassWork::Cached(hash),
                });
                return generation;
            }
        }

        let parse = {
            let database = self.settings.database.clone();
            let suffix = self.settings.extras_suffix.clone();
            let sink = Arc::clone(&sink);
            tokio::task::spawn_blocking(move || match bytes {
                Ok(bytes) => parse_contents(&bytes, &database, &suffix, &sink),
                Err(_) => parse_database(&database, &suffix, &sink),
            })
        };

        let scan = self.settings.scan.enabled.then(|| {
            let root = self.settings.root.clone();
            let filter = ScanFilter::new(&self.settings.database)
                .with_extra_binary_extensions(self.settings.scan.extra_binary_extensions.clone())
                .with_exclude_dirs(self.settings.scan.exclude_dirs.clone());
            let cache = self.mime_cache.take().unwrap_or_default();
            let cancel = self.cancel.clone();
            let sink = Arc::clone(&sink);
            tokio::task::spawn_blocking(move || scan_tree(&root, &filter, cache, &cancel, &sink))
        });

        tracing::debug!(
            generation,
            database = %self.settings.database.display(),
            root = %self.settings.root.display(),
            scanning = scan.is_some(),
            "started pass"
        );
        self.state = CoordinatorState::Scanning;
        self.pending = Some(PendingPass {
            generation,
            cancel: self.cancel.clone(),
            hash,
            sink,
            work: PassWork::Running { parse, scan },
        });
        generation
    }

    /// Waits for the pass started by [`start`](Self::start) and merges it.
    ///
    /// Returns [`ReparseOutcome::Cancelled`] when no pass is in flight or the
    /// pass was cancelled while it ran.
    pub async fn finish(&mut self) -> ReparseOutcome {
        let Some(PendingPass {
            generation,
            cancel,
            hash,
            sink,
            work,
        }) = self.pending.take()
        else {
            return ReparseOutcome::Cancelled;
        };
        let (parse, scan) = match work {
            PassWork::Cached(hash) => {
                self.state = CoordinatorState::Idle;
                return ReparseOutcome::Cached(hash);
            }
            PassWork::Running { parse, scan } => (parse, scan),
        };

        let parsed = parse.await;
        let scanned = match scan {
            Some(handle) => Some(handle.await),
            None => None,
        };
        if cancel.is_cancelled() {
            tracing::debug!(generation, "pass cancelled");
            self.state = CoordinatorState::Idle;
            return ReparseOutcome::Cancelled;
        }

        self.state = CoordinatorState::Merging;
        let parse_failed = parsed.is_err();
        let contents = match parsed {
            Ok(contents) => contents,
            Err(err) => {
                sink.emit(
                    Diagnostic::error(
                        DiagnosticCode::TASK_FAILED,
                        format!("parse task failed: {err}"),
                    )
                    .with_subject(&self.settings.database),
                );
                DatabaseContents::empty(extras_path(
                    &self.settings.database,
                    &self.settings.extras_suffix,
                ))
            }
        };
        let files = match scanned {
            None => Vec::new(),
            Some(Ok(Ok(result))) => {
                self.mime_cache = Some(result.cache);
                result.files
            }
            Some(Ok(Err(ScanError::Cancelled))) => {
                self.state = CoordinatorState::Idle;
                return ReparseOutcome::Cancelled;
            }
            Some(Ok(Err(err))) => {
                tracing::debug!(%err, "scan produced no files");
                self.mime_cache = err.into_cache();
                Vec::new()
            }
            Some(Err(err)) => {
                sink.emit(
                    Diagnostic::error(DiagnosticCode::TASK_FAILED, format!("scan task failed: {err}"))
                        .with_subject(&self.settings.root),
                );
                Vec::new()
            }
        };

        let project = self.merge(generation, hash, &sink, &contents, &files);
        // A failed parse keeps no hash, so the next pass rebuilds.
        self.previous_hash = if parse_failed { None } else { hash };
        self.published.send_replace(Some(Arc::clone(&project)));
        self.state = CoordinatorState::Idle;
        ReparseOutcome::Success(project)
    }

    /// Runs a complete pass: [`start`](Self::start), then
    /// [`finish`](Self::finish).
    pub async fn reparse(&mut self) -> ReparseOutcome {
        self.start();
        self.finish().await
    }

    fn merge(
        &self,
        generation: u64,
        hash: Option<ProjectFileHash>,
        sink: &DiagnosticSink,
        contents: &DatabaseContents,
        files: &[ScannedFile],
    ) -> Arc<Project> {
        let resolver =
            ToolchainResolver::new(self.registry.as_ref(), self.environment.as_ref(), self.host);
        let build = build_parts(&self.settings.database, contents, &resolver, sink);
        let root = build_tree(TreeInputs {
            root: &self.settings.root,
            database: &self.settings.database,
            extras_file: &contents.extra_files_source,
            parts: &build.parts,
            scanned: files,
        });
        tracing::debug!(
            generation,
            parts = build.parts.len(),
            files = build.file_count(),
            "merged project"
        );
        Arc::new(Project {
            root,
            build,
            hash,
            diagnostics: sink.take_all(),
            generation,
        })
    }
}
