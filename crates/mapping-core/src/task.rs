//! Deferred compilation
//!
//! A [`CompileTask`] names one (tenant, type) pair. Tasks are handed to a
//! [`TaskQueue`]; the [`SpoolQueue`] keeps them as JSON files on disk until a
//! worker drains them. At most one pending task exists per pair.

use mapping_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::document::MappingDocument;
use crate::mapping::Mapping;
use crate::store::MappingStore;
use crate::tenancy::Tenant;
use crate::types::MappingType;
use crate::{Error, Result};

/// A deferred compile of one mapping type for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileTask {
    pub tenant: Tenant,
    pub mapping_type: MappingType,
}

impl CompileTask {
    pub fn new(tenant: Tenant, mapping_type: MappingType) -> Self {
        Self {
            tenant,
            mapping_type,
        }
    }

    /// Deduplication id, `{tenant id}:{type value}`.
    pub fn unique_id(&self) -> String {
        format!("{}:{}", self.tenant.id, self.mapping_type.value())
    }

    /// Compile the pair against `mapping`.
    pub fn run<S: MappingStore>(&self, mapping: &Mapping<S>) -> Result<MappingDocument> {
        tracing::debug!(task = %self.unique_id(), "Running compile task");
        mapping.compile(&self.tenant, self.mapping_type)
    }
}

/// Somewhere compile tasks can be deferred to.
pub trait TaskQueue {
    /// Enqueue `task`. Returns `false` if an identical task is already pending.
    fn dispatch(&self, task: &CompileTask) -> Result<bool>;
}

/// Result of draining a queue.
#[derive(Debug, Default)]
pub struct DrainReport {
    /// Unique ids of tasks that ran and were removed
    pub completed: Vec<String>,
    /// Tasks that failed and stay queued
    pub failed: Vec<(String, Error)>,
}

impl DrainReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// File-backed queue, one `<unique id>.json` per pending task.
#[derive(Debug, Clone)]
pub struct SpoolQueue {
    directory: NormalizedPath,
}

impl SpoolQueue {
    pub fn new(directory: impl Into<NormalizedPath>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &NormalizedPath {
        &self.directory
    }

    fn task_path(&self, task: &CompileTask) -> NormalizedPath {
        self.directory
            .join(&format!("{}.json", spool_stem(&task.unique_id())))
    }

    /// Tasks waiting in the spool, ordered by file name.
    pub fn pending(&self) -> Result<Vec<CompileTask>> {
        Ok(self
            .pending_files()?
            .into_iter()
            .map(|(_, task)| task)
            .collect())
    }

    fn pending_files(&self) -> Result<Vec<(NormalizedPath, CompileTask)>> {
        let mut tasks = Vec::new();
        for path in io::list_files(&self.directory, "json")? {
            let content = io::read_text(&path)?;
            let task: CompileTask = serde_json::from_str(&content).map_err(|e| Error::Queue {
                message: format!("Corrupt task file {path}: {e}"),
            })?;
            tasks.push((path, task));
        }
        Ok(tasks)
    }

    /// Run every pending task through `handler`.
    ///
    /// Successful tasks are removed from the spool. Failed tasks are logged,
    /// kept for the next drain, and reported.
    pub fn drain<F>(&self, mut handler: F) -> Result<DrainReport>
    where
        F: FnMut(&CompileTask) -> Result<()>,
    {
        let mut report = DrainReport::default();

        for (path, task) in self.pending_files()? {
            let id = task.unique_id();
            match handler(&task) {
                Ok(()) => {
                    io::remove_file(&path)?;
                    report.completed.push(id);
                }
                Err(e) => {
                    tracing::warn!(task = %id, error = %e, "Compile task failed, keeping it queued");
                    report.failed.push((id, e));
                }
            }
        }

        Ok(report)
    }
}

impl TaskQueue for SpoolQueue {
    fn dispatch(&self, task: &CompileTask) -> Result<bool> {
        let path = self.task_path(task);
        let content = serde_json::to_string_pretty(task)?;

        if io::write_new(&path, content.as_bytes())? {
            tracing::debug!(task = %task.unique_id(), file = %path, "Queued compile task");
            Ok(true)
        } else {
            tracing::debug!(task = %task.unique_id(), "Task already queued");
            Ok(false)
        }
    }
}

/// Percent-encode everything outside `[A-Za-z0-9._-]` so the id is a safe
/// file stem.
fn spool_stem(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_') || (byte == b'.' && !stem.is_empty()) {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn task(id: &str) -> CompileTask {
        CompileTask::new(Tenant::new(id, "retail"), MappingType::Settings)
    }

    #[test]
    fn test_unique_id() {
        assert_eq!(task("acme").unique_id(), "acme:settings");
    }

    #[test]
    fn test_spool_stem_escapes_separators() {
        assert_eq!(spool_stem("acme:settings"), "acme%3Asettings");
        assert_eq!(spool_stem("../x"), "%2E.%2Fx");
    }

    #[test]
    fn test_dispatch_deduplicates() {
        let dir = TempDir::new().unwrap();
        let queue = SpoolQueue::new(dir.path());

        assert!(queue.dispatch(&task("acme")).unwrap());
        assert!(!queue.dispatch(&task("acme")).unwrap());
        assert!(queue.dispatch(&task("globex")).unwrap());

        assert_eq!(queue.pending().unwrap(), vec![task("acme"), task("globex")]);
    }

    #[test]
    fn test_concurrent_dispatch_queues_once() {
        let dir = TempDir::new().unwrap();
        let queue = SpoolQueue::new(dir.path());

        let queued = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| queue.dispatch(&task("acme")).unwrap()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|&queued| queued)
                .count()
        });

        assert_eq!(queued, 1);
        assert_eq!(queue.pending().unwrap(), vec![task("acme")]);
    }

    #[test]
    fn test_drain_keeps_failures() {
        let dir = TempDir::new().unwrap();
        let queue = SpoolQueue::new(dir.path());
        queue.dispatch(&task("acme")).unwrap();
        queue.dispatch(&task("globex")).unwrap();

        let report = queue
            .drain(|t| {
                if t.tenant.id == "acme" {
                    Err(Error::TenantNotFound { id: t.tenant.id.clone() })
                } else {
                    Ok(())
                }
            })
            .unwrap();

        assert_eq!(report.completed, vec!["globex:settings".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_success());
        assert_eq!(queue.pending().unwrap(), vec![task("acme")]);
    }
}
