pub mod scheduled_reply;
pub mod timer_queue;

use scheduled_reply::ScheduledReply;

/// Accepts replies to be delivered at their fire time.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, reply: ScheduledReply);
}
