use super::{scheduled_reply::ScheduledReply, Scheduler};
use crate::clock::Clock;
use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    sync::Arc,
};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{error, info, warn};

/// In-process timer queue. Replies are held in memory only and are lost if the
/// process exits before they fire.
pub struct TimerQueue {
    sender: UnboundedSender<ScheduledReply>,
}

impl TimerQueue {
    /// Spawns the queue loop on the current tokio runtime.
    pub fn start(clock: Arc<dyn Clock>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = unbounded_channel();
        let handle = tokio::spawn(run_timer_queue(receiver, clock));
        (TimerQueue { sender }, handle)
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&self, reply: ScheduledReply) {
        if let Err(rejected) = self.sender.send(reply) {
            warn!(
                "TQ | Timer queue has stopped. Dropping reply scheduled for {}.",
                rejected.0.fire_at
            );
        }
    }
}

struct Pending {
    deadline: Instant,
    seq: u64,
    reply: ScheduledReply,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
    }
}

async fn run_timer_queue(mut receiver: UnboundedReceiver<ScheduledReply>, clock: Arc<dyn Clock>) {
    let mut pending = BinaryHeap::<Reverse<Pending>>::new();
    let mut next_seq = 0u64;
    let mut open = true;
    info!("TQ | Timer queue started.");
    loop {
        let next_deadline = pending.peek().map(|Reverse(entry)| entry.deadline);
        if !open && next_deadline.is_none() {
            break;
        }
        tokio::select! {
            received = receiver.recv(), if open => match received {
                Some(reply) => {
                    // Negative delays clamp to zero and fire on the next turn.
                    let delay = (reply.fire_at - clock.now()).to_std().unwrap_or_default();
                    info!("TQ | Scheduled reply for {} (in {:?}).", reply.fire_at, delay);
                    pending.push(Reverse(Pending {
                        deadline: Instant::now() + delay,
                        seq: next_seq,
                        reply,
                    }));
                    next_seq += 1;
                }
                None => {
                    info!(
                        "TQ | All schedulers dropped. Draining {} pending replies.",
                        pending.len()
                    );
                    open = false;
                }
            },
            _ = sleep_until(next_deadline.unwrap_or_else(Instant::now)),
                if next_deadline.is_some() =>
            {
                let now = Instant::now();
                while pending
                    .peek()
                    .map_or(false, |Reverse(entry)| entry.deadline <= now)
                {
                    if let Some(Reverse(entry)) = pending.pop() {
                        tokio::spawn(deliver(entry.reply));
                    }
                }
            }
        }
    }
    info!("TQ | Timer queue stopped.");
}

async fn deliver(reply: ScheduledReply) {
    let author = reply.author;
    match reply.deliver().await {
        Ok(()) => info!("TQ | Delivered scheduled reply from {author}."),
        Err(why) => error!("TQ | Failed to deliver scheduled reply from {author}: {why:?}"),
    }
}
