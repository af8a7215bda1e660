//! Progress notification port and shared batch counters.
//!
//! [`ProgressNotifier`] is the UI-facing callback interface, implemented
//! in the CLI. [`BatchProgress`] is the mutex-guarded counter pair that
//! concurrent tasks update; it is created per batch and passed into each
//! task explicitly, never held as a global.

use std::sync::Mutex;

/// Pipeline phase being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    /// Concurrent knowledge-base retrieval
    Retrieval,
    /// Form-text generation (single call or split sub-calls)
    Generation,
    /// Final polish pass over stitched partial drafts
    Polish,
}

impl PipelinePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelinePhase::Retrieval => "retrieval",
            PipelinePhase::Generation => "generation",
            PipelinePhase::Polish => "polish",
        }
    }
}

/// Callback for progress updates during a form fill
///
/// Implementations live in the presentation/CLI layer.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &PipelinePhase, total_tasks: usize);

    /// Called when a task completes within a phase
    fn on_task_complete(&self, phase: &PipelinePhase, label: &str, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &PipelinePhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &PipelinePhase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &PipelinePhase, _label: &str, _success: bool) {}
    fn on_phase_complete(&self, _phase: &PipelinePhase) {}
}

/// Snapshot of batch counters at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Thread-safe completed/failed counters for one concurrent batch.
///
/// Critical sections are a counter increment plus a snapshot read;
/// nothing else happens under the lock.
pub struct BatchProgress {
    total: usize,
    counts: Mutex<(usize, usize)>,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            counts: Mutex::new((0, 0)),
        }
    }

    /// Record one completed task, returning the updated counts.
    pub fn complete_one(&self) -> ProgressSnapshot {
        let mut counts = self.counts.lock().expect("progress lock poisoned");
        counts.0 += 1;
        ProgressSnapshot {
            total: self.total,
            completed: counts.0,
            failed: counts.1,
        }
    }

    /// Record one failed task, returning the updated counts.
    pub fn fail_one(&self) -> ProgressSnapshot {
        let mut counts = self.counts.lock().expect("progress lock poisoned");
        counts.1 += 1;
        ProgressSnapshot {
            total: self.total,
            completed: counts.0,
            failed: counts.1,
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let counts = self.counts.lock().expect("progress lock poisoned");
        ProgressSnapshot {
            total: self.total,
            completed: counts.0,
            failed: counts.1,
        }
    }
}
