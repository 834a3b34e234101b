use crate::{
    config::Config,
    reply::{Reply, ReplyHandle},
};
use anyhow::Result as AnyResult;

pub const GOOD_MORNING_REPLY: &str = "おはよう";
pub const GOOD_NIGHT_REPLY: &str = "こんばんは";

pub async fn good_morning(reply: &dyn ReplyHandle) -> AnyResult<()> {
    reply.complete(Reply::Text(GOOD_MORNING_REPLY.into())).await
}

pub async fn good_night(reply: &dyn ReplyHandle) -> AnyResult<()> {
    reply.complete(Reply::Text(GOOD_NIGHT_REPLY.into())).await
}

// Sends the bundled image as an attachment.
pub async fn image(config: &Config, reply: &dyn ReplyHandle) -> AnyResult<()> {
    reply.complete(Reply::Attachment(config.image_path())).await
}
