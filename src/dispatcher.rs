use crate::{
    commands::{DELAYED_MESSAGE, GOOD_MORNING, GOOD_NIGHT, IMAGE, WEATHER},
    delayed_message, greeting,
    event::InboundEvent,
    reply::ReplyHandle,
    services::Services,
    weather,
};
use anyhow::Result as AnyResult;
use std::sync::Arc;
use tracing::debug;

/// Runs the single handler registered for `event`. Unknown commands and forms
/// are dropped without a reply.
pub async fn dispatch(
    services: &Services,
    event: InboundEvent,
    reply: Arc<dyn ReplyHandle>,
) -> AnyResult<()> {
    match event {
        InboundEvent::CommandInvocation(invocation) => match invocation.name.as_str() {
            GOOD_MORNING => greeting::good_morning(reply.as_ref()).await,
            GOOD_NIGHT => greeting::good_night(reply.as_ref()).await,
            WEATHER => {
                weather::weather(services.weather.as_ref(), &invocation, reply.as_ref()).await
            }
            IMAGE => greeting::image(&services.config, reply.as_ref()).await,
            DELAYED_MESSAGE => delayed_message::present_form(reply.as_ref()).await,
            other => {
                debug!("DP | Ignoring unknown command '{other}'.");
                Ok(())
            }
        },
        InboundEvent::ModalSubmission(submission) => match submission.form_id.as_str() {
            delayed_message::FORM_ID => {
                delayed_message::submit(services, &submission, reply).await
            }
            other => {
                debug!("DP | Ignoring unknown form '{other}'.");
                Ok(())
            }
        },
    }
}
