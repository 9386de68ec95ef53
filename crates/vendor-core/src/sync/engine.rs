//! SyncEngine implementation
//!
//! The SyncEngine runs compliance, propagation and sync against the
//! configured storage. Every operation loads configuration and lock once,
//! works on them in memory and saves each at most once at the end, so a
//! failed run leaves the persisted state as it was.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use vendor_fs::{FileSystem, LocalFs, NormalizedPath};

use super::adjust::{AddressRewrite, adjust_sibling_positions, resize_for_replacement};
use super::compliance::{ComplianceOptions, select_action};
use super::drift::{DriftState, classify};
use super::report::{ComplianceAction, ComplianceEntry, ComplianceReport, SyncReport};
use crate::config::{
    ComplianceMode, LOCAL_REF, MappingRef, PathMapping, Policy, VendorConfig, VendorSpec,
};
use crate::error::MappingFailure;
use crate::lock::{LockEntry, VendorLock};
use crate::ordered::OrderedSet;
use crate::position::{
    Extracted, PathSpec, Placement, Position, extract_position, place_content, prepare_placement,
};
use crate::store::{
    CacheEntry, ChecksumCache, ConfigSource, FileConfigStore, FileLockStore, JsonChecksumCache,
    LockSource, ProjectLayout,
};
use crate::{Error, Result, resolve_project_path, validation};

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Restrict the run to one vendor
    pub vendor: Option<String>,
    /// If true, simulate changes without modifying the filesystem.
    /// Actions will be prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
    /// Ignore the checksum cache and copy every mapping again
    pub force: bool,
}

/// Side of a mapping that a copy writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Source,
    Dest,
}

/// Result of copying one region.
#[derive(Debug)]
struct Copied {
    rewrites: Vec<AddressRewrite>,
    /// Whether the target changed (or, for dry runs, would change)
    written: bool,
}

/// What compliance decided for one mapping.
#[derive(Debug)]
struct Resolution {
    entry: ComplianceEntry,
    warning: Option<String>,
    written: Option<String>,
    config_changed: bool,
    lock_changed: bool,
}

/// Engine for keeping vendored regions in step
///
/// The SyncEngine provides the operations behind the CLI:
/// - **check_compliance**: classify every internal mapping without writing
/// - **propagate_compliance**: copy drifted regions according to each
///   vendor's compliance mode
/// - **sync**: copy every internal mapping from source to destination
/// - **validate_config**: field validation and cycle detection
/// - **extract_position** / **place_content**: ad-hoc region copies
pub struct SyncEngine {
    /// Project root that mapping paths are relative to
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    config: Arc<dyn ConfigSource>,
    lock: Arc<dyn LockSource>,
    cache: Arc<dyn ChecksumCache>,
    policy: Policy,
}

impl SyncEngine {
    /// Create an engine over explicit backends.
    pub fn new(
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        config: Arc<dyn ConfigSource>,
        lock: Arc<dyn LockSource>,
        cache: Arc<dyn ChecksumCache>,
    ) -> Self {
        Self {
            root: root.into(),
            fs,
            config,
            lock,
            cache,
            policy: Policy::default(),
        }
    }

    /// Create an engine over the real filesystem with state stored under
    /// `<root>/.git-vendor/`.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let layout = ProjectLayout::new(root.clone());
        Self::new(
            root,
            Arc::new(LocalFs::new()),
            Arc::new(FileConfigStore::for_project(&layout)),
            Arc::new(FileLockStore::for_project(&layout)),
            Arc::new(JsonChecksumCache::for_project(&layout)),
        )
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn load_config(&self) -> Result<VendorConfig> {
        self.config.load()
    }

    pub fn load_lock(&self) -> Result<VendorLock> {
        self.lock.load()
    }

    /// Run field validation and cycle detection on the stored configuration.
    pub fn validate_config(&self) -> Result<()> {
        let config = self.config.load()?;
        validation::validate_config(&config, self.fs.as_ref(), &self.root, &self.policy)
    }

    /// Every validation problem in the stored configuration.
    pub fn validation_problems(&self) -> Result<Vec<Error>> {
        let config = self.config.load()?;
        Ok(validation::problems(
            &config,
            self.fs.as_ref(),
            &self.root,
            &self.policy,
        ))
    }

    /// Extract a region of a project file.
    pub fn extract_position(&self, path: &str, position: Option<&Position>) -> Result<Extracted> {
        extract_position(self.fs.as_ref(), &self.resolve(path), position)
    }

    /// Place text into a region of a project file.
    pub fn place_content(
        &self,
        path: &str,
        text: &[u8],
        position: Option<&Position>,
    ) -> Result<Placement> {
        let placement = place_content(self.fs.as_ref(), &self.resolve(path), text, position)?;
        info!(
            path,
            written = placement.written,
            delta = placement.line_delta(),
            "Placed content"
        );
        Ok(placement)
    }

    /// Classify every internal mapping and report what propagation would
    /// do. Nothing is written.
    pub fn check_compliance(&self, options: &ComplianceOptions) -> Result<ComplianceReport> {
        self.run_compliance(options, false)
    }

    /// Resolve drift according to each vendor's compliance mode.
    ///
    /// Mappings are handled independently; failures (including conflicts)
    /// are collected in the report and do not stop the run. Use
    /// [`ComplianceReport::into_result`] to turn them into one error.
    pub fn propagate_compliance(&self, options: &ComplianceOptions) -> Result<ComplianceReport> {
        self.run_compliance(options, true)
    }

    fn run_compliance(&self, options: &ComplianceOptions, execute: bool) -> Result<ComplianceReport> {
        let mut config = self.config.load()?;
        let mut lock = self.lock.load()?;
        let selected = config.select(options.vendor.as_deref())?;

        let mut report = ComplianceReport {
            dry_run: options.dry_run,
            ..ComplianceReport::default()
        };
        let mut written = OrderedSet::new();
        let mut config_changed = false;
        let mut lock_changed = false;

        for idx in selected {
            let vendor = &mut config.vendors[idx];
            if !vendor.is_internal() {
                debug!(vendor = %vendor.name, "Skipping external vendor");
                continue;
            }
            let name = vendor.name.clone();

            let mode = match vendor.compliance_mode(&self.policy) {
                Ok(mode) => mode,
                Err(err) => {
                    report.failures.push(MappingFailure {
                        vendor: name,
                        mapping: "*".to_string(),
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let mut entry = lock
                .entry(&name, LOCAL_REF)
                .cloned()
                .unwrap_or_else(|| LockEntry::internal(&name));
            let mut entry_changed = false;

            let refs: Vec<MappingRef> = vendor.mappings().map(|(at, _)| at).collect();
            for at in refs {
                let Some(mapping) = vendor.mapping(at).cloned() else {
                    continue;
                };

                match self.resolve_mapping(vendor, at, &mapping, mode, &mut entry, options, execute)
                {
                    Ok(resolution) => {
                        if let Some(warning) = resolution.warning {
                            warn!(vendor = %name, mapping = %mapping.id(), "{warning}");
                            report.warnings.push(warning);
                        }
                        if execute && resolution.entry.action == ComplianceAction::Conflict {
                            let err = Error::ComplianceConflict {
                                vendor: name.clone(),
                                from: mapping.from.clone(),
                                to: mapping.to.clone(),
                            };
                            report.failures.push(failure(&name, &mapping, &err));
                        }
                        if let Some(path) = resolution.written {
                            written.insert(path);
                        }
                        config_changed |= resolution.config_changed;
                        entry_changed |= resolution.lock_changed;
                        report.entries.push(resolution.entry);
                    }
                    Err(err) => {
                        warn!(vendor = %name, mapping = %mapping.id(), error = %err, "Mapping failed");
                        report.failures.push(failure(&name, &mapping, &err));
                    }
                }
            }

            if entry_changed {
                entry.touch();
                lock.upsert(entry);
                lock_changed = true;
            }
        }

        if execute && !options.dry_run {
            if config_changed {
                info!("Saving adjusted positions");
                self.config.save(&config)?;
            }
            if lock_changed {
                self.lock.save(&lock)?;
            }
        }

        report.files_written = written.into_vec();
        let report = report.finish();
        info!(
            result = %report.summary.result,
            total = report.summary.total,
            failures = report.failures.len(),
            dry_run = options.dry_run,
            "Compliance run finished"
        );
        Ok(report)
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_mapping(
        &self,
        vendor: &mut VendorSpec,
        at: MappingRef,
        mapping: &PathMapping,
        mode: ComplianceMode,
        entry: &mut LockEntry,
        options: &ComplianceOptions,
        execute: bool,
    ) -> Result<Resolution> {
        let from = mapping.from_spec()?;
        let to = mapping.to_spec()?;
        let source = self.extract_spec(&from)?;
        let dest = self.extract_optional(&to)?;
        let current_dest = dest.as_ref().map(|d| d.fingerprint.as_str()).unwrap_or("");

        let locked_source = entry.source_file_hashes.get(&mapping.from);
        let locked_dest = entry.file_hashes.get(&mapping.to);
        let unlocked = locked_source.is_none() && locked_dest.is_none();

        // A mapping with no lock record yet takes the source as canonical.
        let state = if unlocked {
            if current_dest == source.fingerprint {
                DriftState::Synced
            } else {
                DriftState::SourceDrift
            }
        } else {
            classify(
                locked_source.map(String::as_str).unwrap_or(""),
                &source.fingerprint,
                locked_dest.map(String::as_str).unwrap_or(""),
                current_dest,
            )
        };
        let action = select_action(mode, state, options.reverse);
        debug!(vendor = %vendor.name, mapping = %mapping.id(), %state, ?action, "Classified mapping");

        let mut resolution = Resolution {
            entry: ComplianceEntry {
                vendor: vendor.name.clone(),
                from: mapping.from.clone(),
                to: mapping.to.clone(),
                state,
                action,
                message: String::new(),
            },
            warning: None,
            written: None,
            config_changed: false,
            lock_changed: false,
        };

        let (target, side, content, direction) = match action {
            ComplianceAction::None => {
                resolution.entry.message = "in sync".to_string();
                if unlocked && execute && !options.dry_run {
                    entry.record(
                        &mapping.from,
                        &source.fingerprint,
                        &mapping.to,
                        &source.fingerprint,
                    );
                    resolution.lock_changed = true;
                }
                return Ok(resolution);
            }
            ComplianceAction::Warn => {
                let message = format!(
                    "{} changed locally but {} is canonical; use --reverse to copy it back",
                    mapping.to, mapping.from
                );
                resolution.entry.message = message.clone();
                resolution.warning = Some(message);
                return Ok(resolution);
            }
            ComplianceAction::Conflict => {
                resolution.entry.message =
                    "both sides changed since last sync; resolve manually".to_string();
                return Ok(resolution);
            }
            ComplianceAction::CopyToDest => (
                &to,
                Side::Dest,
                source,
                format!("{} -> {}", mapping.from, mapping.to),
            ),
            ComplianceAction::CopyToSource => {
                let Some(dest) = dest else {
                    return Err(Error::ReadSource {
                        path: self.resolve(&to.path),
                        source: std::io::Error::new(
                            ErrorKind::NotFound,
                            "destination is missing and cannot be copied back",
                        ),
                    });
                };
                (
                    &from,
                    Side::Source,
                    dest,
                    format!("{} -> {}", mapping.to, mapping.from),
                )
            }
        };

        if !execute {
            resolution.entry.message = format!("would copy {direction}");
            return Ok(resolution);
        }

        let copied = self.copy_region(vendor, at, side, target, &content.text, options.dry_run)?;
        if copied.written {
            resolution.written = Some(NormalizedPath::new(&target.path).as_str().to_string());
        }

        if options.dry_run {
            resolution.entry.message = format!("[dry-run] Would copy {direction}");
            return Ok(resolution);
        }

        for rewrite in &copied.rewrites {
            entry.rename_key(&rewrite.old, &rewrite.new);
        }
        let current = vendor.mapping(at).cloned().unwrap_or_else(|| mapping.clone());
        entry.record(
            &current.from,
            &content.fingerprint,
            &current.to,
            &content.fingerprint,
        );

        resolution.entry.message = if copied.written {
            format!("copied {direction}")
        } else {
            "content already in place".to_string()
        };
        resolution.entry.from = current.from;
        resolution.entry.to = current.to;
        resolution.config_changed = !copied.rewrites.is_empty();
        resolution.lock_changed = true;
        Ok(resolution)
    }

    /// Copy every internal mapping from source to destination and record
    /// the result in the lock.
    ///
    /// Vendors whose source files match the checksum cache and whose
    /// destinations still match the lock are skipped unless `force` is set.
    /// External vendors are skipped with a warning.
    pub fn sync(&self, options: &SyncOptions) -> Result<SyncReport> {
        let mut config = self.config.load()?;
        let mut lock = self.lock.load()?;
        let selected = config.select(options.vendor.as_deref())?;

        let mut report = SyncReport::success();
        let mut config_changed = false;
        let mut lock_changed = false;

        for idx in selected {
            let vendor = &mut config.vendors[idx];
            let name = vendor.name.clone();
            if !vendor.is_internal() {
                report.warnings.push(format!(
                    "Skipped {name}: external vendors are fetched by the git transport"
                ));
                continue;
            }

            let previous = lock.entry(&name, LOCAL_REF).cloned();
            if !options.force
                && let Some(prev) = &previous
                && self.is_up_to_date(vendor, prev)?
            {
                debug!(vendor = %name, "Vendor unchanged since last sync");
                report.actions.push(format!("{name} is up to date"));
                continue;
            }

            let mut entry = previous
                .clone()
                .unwrap_or_else(|| LockEntry::internal(&name));
            let mut failed = false;

            let refs: Vec<MappingRef> = vendor.mappings().map(|(at, _)| at).collect();
            for at in refs {
                let Some(mapping) = vendor.mapping(at).cloned() else {
                    continue;
                };
                match self.sync_mapping(
                    vendor,
                    at,
                    &mapping,
                    previous.as_ref(),
                    &mut entry,
                    options.dry_run,
                    &mut report,
                ) {
                    Ok(changed) => config_changed |= changed,
                    Err(err) => {
                        failed = true;
                        warn!(vendor = %name, mapping = %mapping.id(), error = %err, "Sync failed");
                        report.push_error(format!("{name} [{}]: {err}", mapping.id()));
                    }
                }
            }

            if options.dry_run {
                continue;
            }

            entry.touch();
            lock.upsert(entry);
            lock_changed = true;

            if failed {
                self.cache.delete(&name, LOCAL_REF)?;
            } else {
                let files = self.source_checksums(vendor)?;
                self.cache.save(&CacheEntry::new(&name, LOCAL_REF, files))?;
            }
        }

        if options.vendor.is_none() && !options.dry_run {
            lock_changed |= self.prune_stale_entries(&config, &mut lock, &mut report)?;
        }

        if !options.dry_run {
            if config_changed {
                self.config.save(&config)?;
            }
            if lock_changed {
                self.lock.save(&lock)?;
            }
        }

        info!(
            actions = report.actions.len(),
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            dry_run = options.dry_run,
            "Sync finished"
        );
        Ok(report)
    }

    /// Drop lock entries (and their cached checksums) for vendors that are
    /// no longer configured.
    fn prune_stale_entries(
        &self,
        config: &VendorConfig,
        lock: &mut VendorLock,
        report: &mut SyncReport,
    ) -> Result<bool> {
        let stale: OrderedSet<String> = lock
            .vendors
            .iter()
            .filter(|entry| config.vendor(&entry.name).is_none())
            .map(|entry| entry.name.clone())
            .collect();

        for name in stale.iter() {
            for entry in lock.remove(name) {
                self.cache.delete(&entry.name, &entry.reference)?;
            }
            info!(vendor = %name, "Removed stale lock entry");
            report.actions.push(format!("Removed stale lock entry for {name}"));
        }
        Ok(!stale.is_empty())
    }

    #[allow(clippy::too_many_arguments)]
    fn sync_mapping(
        &self,
        vendor: &mut VendorSpec,
        at: MappingRef,
        mapping: &PathMapping,
        previous: Option<&LockEntry>,
        entry: &mut LockEntry,
        dry_run: bool,
        report: &mut SyncReport,
    ) -> Result<bool> {
        let from = mapping.from_spec()?;
        let to = mapping.to_spec()?;
        let source = self.extract_spec(&from)?;

        // A destination range that no longer resolves gives no signal.
        if let Some(locked) = previous.and_then(|p| p.file_hashes.get(&mapping.to))
            && let Ok(Some(current)) = self.extract_optional(&to)
            && current.fingerprint != *locked
            && current.fingerprint != source.fingerprint
        {
            warn!(vendor = %vendor.name, path = %mapping.to, "Overwriting local modifications");
            report.warnings.push(format!(
                "{} has local modifications that will be overwritten",
                mapping.to
            ));
        }

        let copied = self.copy_region(vendor, at, Side::Dest, &to, &source.text, dry_run)?;

        if dry_run {
            report.actions.push(if copied.written {
                format!("[dry-run] Would copy {} -> {}", mapping.from, mapping.to)
            } else {
                format!("{} is up to date", mapping.to)
            });
            return Ok(false);
        }

        for rewrite in &copied.rewrites {
            entry.rename_key(&rewrite.old, &rewrite.new);
        }
        let current = vendor.mapping(at).cloned().unwrap_or_else(|| mapping.clone());
        entry.record(
            &current.from,
            &source.fingerprint,
            &current.to,
            &source.fingerprint,
        );

        report.actions.push(if copied.written {
            format!("Copied {} -> {}", current.from, current.to)
        } else {
            format!("{} is up to date", current.to)
        });
        Ok(!copied.rewrites.is_empty())
    }

    /// Place `text` at `target`, rewriting addresses in `vendor` to follow
    /// the change in line count.
    ///
    /// The placement and every rewrite are computed before anything is
    /// written; if a rewrite fails the target is left untouched. The copied
    /// mapping's own address on the written side is resized to cover the
    /// new text.
    fn copy_region(
        &self,
        vendor: &mut VendorSpec,
        at: MappingRef,
        side: Side,
        target: &PathSpec,
        text: &[u8],
        dry_run: bool,
    ) -> Result<Copied> {
        let path = self.resolve(&target.path);
        let prepared = prepare_placement(self.fs.as_ref(), &path, text, target.position.as_ref())?;
        let delta = prepared.line_delta();

        let mut planned = vendor.clone();
        let mut rewrites = Vec::new();

        if let Some(position) = &target.position {
            let resized = resize_for_replacement(position, text).unwrap_or_else(|| {
                debug!(address = %target, "Keeping column address that cannot cover the new text");
                *position
            });
            if resized != *position
                && let Some(mapping) = planned.mapping_mut(at)
            {
                let slot = match side {
                    Side::Source => &mut mapping.from,
                    Side::Dest => &mut mapping.to,
                };
                let new = target.with_position(Some(resized)).to_string();
                let old = std::mem::replace(slot, new.clone());
                rewrites.push(AddressRewrite { old, new });
            }
        }
        rewrites.extend(adjust_sibling_positions(
            &mut planned,
            &target.path,
            delta,
            Some(at),
        )?);

        let written = !prepared.is_noop();
        if dry_run {
            return Ok(Copied { rewrites, written });
        }

        prepared.commit(self.fs.as_ref())?;
        *vendor = planned;
        info!(path = %path.display(), delta, rewrites = rewrites.len(), "Copied region");
        Ok(Copied { rewrites, written })
    }

    fn is_up_to_date(&self, vendor: &VendorSpec, previous: &LockEntry) -> Result<bool> {
        let Some(cached) = self.cache.load(&vendor.name, LOCAL_REF)? else {
            return Ok(false);
        };
        let Ok(current) = self.source_checksums(vendor) else {
            return Ok(false);
        };
        if cached.files != current {
            return Ok(false);
        }

        for (_, mapping) in vendor.mappings() {
            if !previous.source_file_hashes.contains_key(&mapping.from) {
                return Ok(false);
            }
            let Some(locked) = previous.file_hashes.get(&mapping.to) else {
                return Ok(false);
            };
            let Ok(to) = mapping.to_spec() else {
                return Ok(false);
            };
            match self.extract_spec(&to) {
                Ok(current) if current.fingerprint == *locked => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Whole-file checksums of every source file of `vendor`.
    fn source_checksums(&self, vendor: &VendorSpec) -> Result<BTreeMap<String, String>> {
        let mut files = BTreeMap::new();
        for (_, mapping) in vendor.mappings() {
            let from = mapping.from_spec()?;
            let key = NormalizedPath::new(&from.path).as_str().to_string();
            if files.contains_key(&key) {
                continue;
            }
            let checksum = self
                .cache
                .compute_file_checksum(self.fs.as_ref(), &self.resolve(&from.path))?;
            files.insert(key, checksum);
        }
        Ok(files)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        resolve_project_path(&self.root, path)
    }

    fn extract_spec(&self, spec: &PathSpec) -> Result<Extracted> {
        extract_position(
            self.fs.as_ref(),
            &self.resolve(&spec.path),
            spec.position.as_ref(),
        )
    }

    /// Like `extract_spec`, but a missing file is `None`.
    fn extract_optional(&self, spec: &PathSpec) -> Result<Option<Extracted>> {
        match self.extract_spec(spec) {
            Ok(extracted) => Ok(Some(extracted)),
            Err(Error::ReadSource { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

fn failure(vendor: &str, mapping: &PathMapping, err: &Error) -> MappingFailure {
    MappingFailure {
        vendor: vendor.to_string(),
        mapping: mapping.id(),
        message: err.to_string(),
    }
}
