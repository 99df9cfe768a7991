//! Concurrent in-memory template store.
//!
//! The store is logically single-writer per template: every mutating
//! operation holds that template's write lock, so check-then-append is
//! atomic and the "at most one pending submission" invariant holds under
//! request-level parallelism. Reads clone under a shared lock. Templates
//! are independent; there is no cross-template locking.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use trs_model::{
    DepartmentId, EquipmentId, GridStructure, Submission, SubmissionId, SubmissionStatus,
    TemplateId, TemplateRequest, UserId,
};
use trs_review::{HistoryPage, ReviewError, ReviewRequest, ReviewWorkflow, SubmissionHistory};

use crate::error::{Result, StoreError};
use crate::snapshot::{CURRENT_SCHEMA_VERSION, StoreSnapshot, TemplateRecord};

/// Details for a new template request; the store assigns the id.
#[derive(Debug, Clone)]
pub struct TemplateDetails {
    pub template_name: String,
    pub description: Option<String>,
    pub department_id: DepartmentId,
    pub equipment_id: EquipmentId,
    pub supervisor_id: UserId,
}

/// A template request plus its derived review state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSnapshot {
    pub request: TemplateRequest,
    /// Status of the current submission.
    pub status: SubmissionStatus,
    pub current_version: u32,
}

#[derive(Debug)]
struct TemplateEntry {
    request: TemplateRequest,
    history: SubmissionHistory,
}

impl TemplateEntry {
    fn snapshot(&self) -> Result<TemplateSnapshot> {
        let current = self.history.current()?;
        Ok(TemplateSnapshot {
            request: self.request.clone(),
            status: current.status,
            current_version: current.version,
        })
    }
}

/// All template requests and their submission histories.
#[derive(Debug)]
pub struct TemplateStore {
    workflow: ReviewWorkflow,
    templates: RwLock<BTreeMap<TemplateId, Arc<RwLock<TemplateEntry>>>>,
    next_template_id: AtomicU64,
    next_submission_id: AtomicU64,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::with_workflow(ReviewWorkflow::default())
    }

    pub fn with_workflow(workflow: ReviewWorkflow) -> Self {
        Self {
            workflow,
            templates: RwLock::new(BTreeMap::new()),
            next_template_id: AtomicU64::new(1),
            next_submission_id: AtomicU64::new(1),
        }
    }

    /// Register a new template request with its initial submission.
    ///
    /// The initial submission enters review immediately with version 1.
    pub fn create_template(
        &self,
        details: TemplateDetails,
        structure: GridStructure,
    ) -> Result<TemplateSnapshot> {
        let template_id = TemplateId::new(self.next_template_id.fetch_add(1, Ordering::SeqCst));
        let request = TemplateRequest::new(
            template_id,
            details.template_name,
            details.description,
            details.department_id,
            details.equipment_id,
            details.supervisor_id,
        )?;
        let mut history = SubmissionHistory::new(template_id);
        history.start_new(self.alloc_submission_id(), structure)?;

        let entry = TemplateEntry { request, history };
        let snapshot = entry.snapshot()?;
        self.write_templates()?
            .insert(template_id, Arc::new(RwLock::new(entry)));
        tracing::info!(
            template = %template_id,
            name = %snapshot.request.template_name,
            "template request created"
        );
        Ok(snapshot)
    }

    /// Apply a review decision to a template's pending submission.
    pub fn decide(
        &self,
        template: TemplateId,
        expected_version: Option<u32>,
        request: ReviewRequest,
    ) -> Result<Submission> {
        let entry = self.entry(template)?;
        let mut guard = entry.write().map_err(|_| StoreError::LockPoisoned)?;
        check_expected_version(&guard.history, expected_version)?;
        let submission = self.workflow.decide(&mut guard.history, request)?.clone();
        Ok(submission)
    }

    /// Open a new review round for a rejected template.
    pub fn resubmit(
        &self,
        template: TemplateId,
        expected_version: Option<u32>,
        structure: GridStructure,
    ) -> Result<Submission> {
        let entry = self.entry(template)?;
        let mut guard = entry.write().map_err(|_| StoreError::LockPoisoned)?;
        check_expected_version(&guard.history, expected_version)?;
        // Allocated before the workflow's own status check; failed attempts
        // leave id gaps, which is fine for unique increasing ids.
        let id = self.alloc_submission_id();
        let submission = self
            .workflow
            .resubmit(&mut guard.history, id, structure)?
            .clone();
        Ok(submission)
    }

    /// The current submission of a template, grid included.
    pub fn current(&self, template: TemplateId) -> Result<Submission> {
        let entry = self.entry(template)?;
        let guard = entry.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(guard.history.current()?.clone())
    }

    /// A newest-first page of a template's history.
    pub fn history_page(
        &self,
        template: TemplateId,
        offset: usize,
        limit: usize,
    ) -> Result<HistoryPage> {
        let entry = self.entry(template)?;
        let guard = entry.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(guard.history.page(offset, limit))
    }

    /// Template identity plus derived status.
    pub fn template(&self, template: TemplateId) -> Result<TemplateSnapshot> {
        let entry = self.entry(template)?;
        let guard = entry.read().map_err(|_| StoreError::LockPoisoned)?;
        guard.snapshot()
    }

    /// All templates with their derived status, ordered by id.
    pub fn list_templates(&self) -> Result<Vec<TemplateSnapshot>> {
        let entries: Vec<Arc<RwLock<TemplateEntry>>> =
            self.read_templates()?.values().cloned().collect();
        let mut snapshots = Vec::with_capacity(entries.len());
        for entry in entries {
            let guard = entry.read().map_err(|_| StoreError::LockPoisoned)?;
            snapshots.push(guard.snapshot()?);
        }
        Ok(snapshots)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read_templates()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read_templates()?.is_empty())
    }

    /// Capture the whole store as a serializable snapshot.
    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        let entries: Vec<Arc<RwLock<TemplateEntry>>> =
            self.read_templates()?.values().cloned().collect();
        let mut templates = Vec::with_capacity(entries.len());
        for entry in entries {
            let guard = entry.read().map_err(|_| StoreError::LockPoisoned)?;
            templates.push(TemplateRecord {
                request: guard.request.clone(),
                submissions: guard.history.submissions().to_vec(),
            });
        }
        Ok(StoreSnapshot {
            schema_version: CURRENT_SCHEMA_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            next_template_id: self.next_template_id.load(Ordering::SeqCst),
            next_submission_id: self.next_submission_id.load(Ordering::SeqCst),
            templates,
        })
    }

    /// Rebuild a live store from a snapshot, revalidating every history.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        let mut templates = BTreeMap::new();
        let mut max_template_id = 0u64;
        let mut max_submission_id = 0u64;
        for record in snapshot.templates {
            let template_id = record.request.template_id;
            max_template_id = max_template_id.max(template_id.value());
            for submission in &record.submissions {
                max_submission_id = max_submission_id.max(submission.id.value());
            }
            let history = SubmissionHistory::from_submissions(template_id, record.submissions)?;
            templates.insert(
                template_id,
                Arc::new(RwLock::new(TemplateEntry {
                    request: record.request,
                    history,
                })),
            );
        }
        // Counters never move backwards, even if the persisted values lag.
        let next_template_id = snapshot.next_template_id.max(max_template_id + 1);
        let next_submission_id = snapshot.next_submission_id.max(max_submission_id + 1);
        Ok(Self {
            workflow: ReviewWorkflow::default(),
            templates: RwLock::new(templates),
            next_template_id: AtomicU64::new(next_template_id),
            next_submission_id: AtomicU64::new(next_submission_id),
        })
    }

    fn alloc_submission_id(&self) -> SubmissionId {
        SubmissionId::new(self.next_submission_id.fetch_add(1, Ordering::SeqCst))
    }

    fn entry(&self, template: TemplateId) -> Result<Arc<RwLock<TemplateEntry>>> {
        self.read_templates()?
            .get(&template)
            .cloned()
            .ok_or(StoreError::UnknownTemplate { template })
    }

    fn read_templates(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<TemplateId, Arc<RwLock<TemplateEntry>>>>>
    {
        self.templates.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_templates(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<TemplateId, Arc<RwLock<TemplateEntry>>>>>
    {
        self.templates.write().map_err(|_| StoreError::LockPoisoned)
    }
}

fn check_expected_version(history: &SubmissionHistory, expected: Option<u32>) -> Result<()> {
    if let Some(expected) = expected {
        let actual = history.max_version();
        if expected != actual {
            return Err(ReviewError::StaleVersion {
                template: history.template_id(),
                expected,
                actual,
            }
            .into());
        }
    }
    Ok(())
}
