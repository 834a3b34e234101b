use crate::reply::{Reply, ReplyHandle};
use anyhow::Result as AnyResult;
use chrono::{DateTime, Utc};
use serenity::model::{id::UserId, mention::Mentionable};
use std::{
    fmt::{self, Debug},
    sync::Arc,
};

pub const DELIVERY_SEPARATOR: &str = "---------------";

/// A message waiting to be delivered into its original interaction.
pub struct ScheduledReply {
    pub fire_at: DateTime<Utc>,
    pub author: UserId,
    pub message: String,
    reply: Arc<dyn ReplyHandle>,
}

impl ScheduledReply {
    pub fn new(
        fire_at: DateTime<Utc>,
        author: UserId,
        message: String,
        reply: Arc<dyn ReplyHandle>,
    ) -> Self {
        ScheduledReply {
            fire_at,
            author,
            message,
            reply,
        }
    }

    pub fn delivery_text(&self) -> String {
        format!(
            "{}からのメッセージだにゅう〜\n{DELIVERY_SEPARATOR}\n{}",
            self.author.mention(),
            self.message
        )
    }

    /// Edits the original reply. Consumes the scheduled reply so it can only fire once.
    pub async fn deliver(self) -> AnyResult<()> {
        let text = self.delivery_text();
        self.reply.complete(Reply::Text(text)).await
    }
}

impl Debug for ScheduledReply {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ScheduledReply")
            .field("fire_at", &self.fire_at)
            .field("author", &self.author)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingReply};
    use chrono::TimeZone;

    #[tokio::test]
    async fn delivery_mentions_the_author() {
        let handle = Arc::new(RecordingReply::default());
        let fire_at = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();
        let scheduled = ScheduledReply::new(fire_at, UserId(1234), "hello".into(), handle.clone());
        scheduled.deliver().await.unwrap();
        assert_eq!(
            handle.calls(),
            vec![Call::Complete(Reply::Text(
                "<@1234>からのメッセージだにゅう〜\n---------------\nhello".into()
            ))]
        );
    }
}
