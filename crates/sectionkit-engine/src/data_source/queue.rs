//! Single-consumer job queue.
//!
//! Any number of [`JobSender`]s may submit from any thread; only the owning
//! [`DataSource`](crate::DataSource) drains the [`JobReceiver`], one job at a
//! time, in submission order.

use std::sync::mpsc;

use crate::data_source::mutation::Mutation;
use crate::surface::ScrollPosition;

/// Runs once the job it belongs to has been applied.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

pub(crate) enum Job {
    Mutate {
        mutation: Mutation,
        completion: Option<Completion>,
    },
    Reapply,
    ScrollToTop {
        animated: bool,
    },
    ScrollToBottom {
        position: ScrollPosition,
        animated: bool,
    },
}

impl Job {
    fn label(&self) -> &'static str {
        match self {
            Job::Mutate { mutation, .. } => mutation.name(),
            Job::Reapply => "reapply",
            Job::ScrollToTop { .. } => "scroll_to_top",
            Job::ScrollToBottom { .. } => "scroll_to_bottom",
        }
    }
}

pub(crate) fn channel() -> (JobSender, JobReceiver) {
    let (tx, rx) = mpsc::channel();
    (JobSender(tx), JobReceiver(rx))
}

#[derive(Clone)]
pub(crate) struct JobSender(mpsc::Sender<Job>);

impl JobSender {
    pub(crate) fn send(&self, job: Job) {
        let label = job.label();
        match self.0.send(job) {
            Ok(()) => log::trace!("queued {label}"),
            Err(_) => log::debug!("data source is gone, dropping {label}"),
        }
    }
}

pub(crate) struct JobReceiver(mpsc::Receiver<Job>);

impl JobReceiver {
    /// Next job if one is waiting
    pub(crate) fn next(&self) -> Option<Job> {
        self.0.try_recv().ok()
    }
}
