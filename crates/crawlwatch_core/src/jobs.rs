use std::collections::BTreeMap;

use crate::{JobId, UrlId};

/// Maps each URL to the one job currently being polled for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobTracker {
    jobs: BTreeMap<UrlId, JobId>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `job_id` for `url_id`, replacing any older job. Returns the
    /// job that was replaced.
    pub fn track(&mut self, url_id: UrlId, job_id: JobId) -> Option<JobId> {
        self.jobs.insert(url_id, job_id)
    }

    /// Stops tracking `url_id`, but only while `job_id` is still its job.
    pub fn untrack(&mut self, url_id: UrlId, job_id: JobId) -> bool {
        if self.is_current(url_id, job_id) {
            self.jobs.remove(&url_id);
            true
        } else {
            false
        }
    }

    pub fn is_current(&self, url_id: UrlId, job_id: JobId) -> bool {
        self.jobs.get(&url_id) == Some(&job_id)
    }

    pub fn job_for(&self, url_id: UrlId) -> Option<JobId> {
        self.jobs.get(&url_id).copied()
    }

    /// Tracked `(url_id, job_id)` pairs in url order.
    pub fn entries(&self) -> Vec<(UrlId, JobId)> {
        self.jobs.iter().map(|(url, job)| (*url, *job)).collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::JobTracker;

    #[test]
    fn newer_job_replaces_older() {
        let mut tracker = JobTracker::new();
        assert_eq!(tracker.track(1, 10), None);
        assert_eq!(tracker.track(1, 20), Some(10));
        assert_eq!(tracker.entries(), vec![(1, 20)]);
    }

    #[test]
    fn untrack_requires_current_job() {
        let mut tracker = JobTracker::new();
        tracker.track(1, 20);
        assert!(!tracker.untrack(1, 10));
        assert_eq!(tracker.len(), 1);
        assert!(tracker.untrack(1, 20));
        assert!(tracker.is_empty());
    }
}
