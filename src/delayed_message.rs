use crate::{
    event::ModalSubmission,
    reply::{FieldStyle, FormField, FormSpec, Reply, ReplyHandle},
    services::Services,
    tasks::scheduled_reply::ScheduledReply,
};
use anyhow::Result as AnyResult;
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::{
    fmt::{self, Display},
    sync::Arc,
    time::Instant,
};
use tracing::info;

pub const FORM_ID: &str = "delayed_message";
pub const SEND_AT_FIELD: &str = "send_at";
pub const MESSAGE_FIELD: &str = "message";
pub const SEND_AT_PATTERN: &str = "%Y/%m/%d/%H:%M";
pub const INVALID_TIME_MESSAGE: &str = "日時の形式が正しくないか、過去の日時です。\
    YYYY/MM/DD/HH:MM の形式で未来の日時を入力してください。";
pub const MISSING_MESSAGE_TEXT: &str = "送信するメッセージを入力してください。";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    Unparseable(String),
    NotInFuture { target: DateTime<Utc> },
    MissingMessage,
}

impl ScheduleError {
    /// Text shown to the submitting user.
    pub fn reply_text(&self) -> &'static str {
        match self {
            ScheduleError::MissingMessage => MISSING_MESSAGE_TEXT,
            _ => INVALID_TIME_MESSAGE,
        }
    }
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScheduleError::Unparseable(input) => {
                write!(f, "'{input}' does not match {SEND_AT_PATTERN}")
            }
            ScheduleError::NotInFuture { target } => write!(f, "{target} is not in the future"),
            ScheduleError::MissingMessage => write!(f, "no '{MESSAGE_FIELD}' field submitted"),
        }
    }
}

pub fn delayed_message_form() -> FormSpec {
    FormSpec {
        custom_id: FORM_ID,
        title: "メッセージ予約",
        fields: vec![
            FormField {
                custom_id: SEND_AT_FIELD,
                label: "送信日時 (YYYY/MM/DD/HH:MM)",
                style: FieldStyle::Short,
                placeholder: Some("2099/01/01/00:00"),
                required: true,
            },
            FormField {
                custom_id: MESSAGE_FIELD,
                label: "メッセージ",
                style: FieldStyle::Paragraph,
                placeholder: None,
                required: true,
            },
        ],
    }
}

/// Parses `input` in `timezone` and returns how long to wait from `now`.
/// Only strictly positive delays are accepted.
pub fn delay_until(
    input: &str,
    timezone: &FixedOffset,
    now: DateTime<Utc>,
) -> Result<Duration, ScheduleError> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), SEND_AT_PATTERN)
        .map_err(|_| ScheduleError::Unparseable(input.to_string()))?;
    let target = timezone
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ScheduleError::Unparseable(input.to_string()))?
        .with_timezone(&Utc);
    let delay = target - now;
    if delay <= Duration::zero() {
        return Err(ScheduleError::NotInFuture { target });
    }
    Ok(delay)
}

pub async fn present_form(reply: &dyn ReplyHandle) -> AnyResult<()> {
    reply.present_form(&delayed_message_form()).await
}

pub async fn submit(
    services: &Services,
    submission: &ModalSubmission,
    reply: Arc<dyn ReplyHandle>,
) -> AnyResult<()> {
    let start = Instant::now();
    reply.acknowledge().await?;
    let now = services.clock.now();
    let timezone = services.config.timezone()?;
    let send_at = submission.field(SEND_AT_FIELD).unwrap_or_default();
    let validated = submission
        .field(MESSAGE_FIELD)
        .ok_or(ScheduleError::MissingMessage)
        .and_then(|message| Ok((message, delay_until(send_at, &timezone, now)?)));
    match validated {
        Ok((message, delay)) => {
            let fire_at = now + delay;
            info!("DM | Scheduling message from {} for {fire_at}.", submission.user);
            services.scheduler.schedule(ScheduledReply::new(
                fire_at,
                submission.user,
                message.to_string(),
                reply,
            ));
        }
        Err(why) => {
            info!("DM | Rejected submission from {}: {why}", submission.user);
            reply
                .complete(Reply::Text(why.reply_text().to_string()))
                .await?;
        }
    }
    info!("DM | Elapsed: {:?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, Call, RecordingReply, StubWeather};
    use serenity::model::id::UserId;
    use std::collections::HashMap;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn jst_time(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        jst()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn submission(send_at: &str, message: &str) -> ModalSubmission {
        ModalSubmission {
            form_id: FORM_ID.into(),
            user: UserId(1234),
            fields: HashMap::from([
                (SEND_AT_FIELD.to_string(), send_at.to_string()),
                (MESSAGE_FIELD.to_string(), message.to_string()),
            ]),
        }
    }

    #[test]
    fn one_minute_ahead() {
        let now = jst_time(2098, 12, 31, 23, 59);
        let delay = delay_until("2099/01/01/00:00", &jst(), now).unwrap();
        assert_eq!(delay.num_milliseconds(), 60_000);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let now = jst_time(2098, 12, 31, 23, 59);
        assert!(delay_until("  2099/01/01/00:00\n", &jst(), now).is_ok());
    }

    #[test]
    fn zero_delay_is_rejected_one_millisecond_is_accepted() {
        let target = jst_time(2099, 1, 1, 0, 0);
        assert_eq!(
            delay_until("2099/01/01/00:00", &jst(), target),
            Err(ScheduleError::NotInFuture { target })
        );
        let just_before = target - Duration::milliseconds(1);
        assert_eq!(
            delay_until("2099/01/01/00:00", &jst(), just_before),
            Ok(Duration::milliseconds(1))
        );
    }

    #[test]
    fn past_times_are_rejected() {
        let now = jst_time(2099, 1, 1, 0, 1);
        assert!(matches!(
            delay_until("2099/01/01/00:00", &jst(), now),
            Err(ScheduleError::NotInFuture { .. })
        ));
    }

    #[test]
    fn malformed_times_are_rejected() {
        let now = jst_time(2098, 12, 31, 23, 59);
        for input in ["not-a-date", "", "2099-01-01 00:00", "2099/13/01/00:00", "2099/01/01"] {
            assert_eq!(
                delay_until(input, &jst(), now),
                Err(ScheduleError::Unparseable(input.to_string())),
                "{input:?}"
            );
        }
    }

    #[test]
    fn form_collects_time_and_message() {
        let form = delayed_message_form();
        assert_eq!(form.custom_id, FORM_ID);
        let ids = form.fields.iter().map(|field| field.custom_id).collect::<Vec<_>>();
        assert_eq!(ids, vec![SEND_AT_FIELD, MESSAGE_FIELD]);
        assert!(form.fields.iter().all(|field| field.required));
    }

    #[tokio::test]
    async fn valid_submission_schedules_one_reply() {
        let now = jst_time(2098, 12, 31, 23, 59);
        let (services, scheduler) = testing::services(StubWeather(Ok(String::new())), now);
        let reply = Arc::new(RecordingReply::default());

        submit(&services, &submission("2099/01/01/00:00", "hello"), reply.clone())
            .await
            .unwrap();

        assert_eq!(reply.calls(), vec![Call::Acknowledge]);
        let mut scheduled = scheduler.take();
        assert_eq!(scheduled.len(), 1);
        let entry = scheduled.remove(0);
        assert_eq!((entry.fire_at - now).num_milliseconds(), 60_000);
        assert_eq!(
            entry.delivery_text(),
            "<@1234>からのメッセージだにゅう〜\n---------------\nhello"
        );

        entry.deliver().await.unwrap();
        assert_eq!(
            reply.calls(),
            vec![
                Call::Acknowledge,
                Call::Complete(Reply::Text(
                    "<@1234>からのメッセージだにゅう〜\n---------------\nhello".into()
                )),
            ]
        );
    }

    #[tokio::test]
    async fn unparseable_submission_is_rejected_without_scheduling() {
        let now = jst_time(2098, 12, 31, 23, 59);
        let (services, scheduler) = testing::services(StubWeather(Ok(String::new())), now);
        let reply = Arc::new(RecordingReply::default());

        submit(&services, &submission("not-a-date", "hello"), reply.clone())
            .await
            .unwrap();

        assert_eq!(
            reply.calls(),
            vec![
                Call::Acknowledge,
                Call::Complete(Reply::Text(INVALID_TIME_MESSAGE.into())),
            ]
        );
        assert!(scheduler.take().is_empty());
    }

    #[tokio::test]
    async fn submission_without_message_is_completed_without_scheduling() {
        let now = jst_time(2098, 12, 31, 23, 59);
        let (services, scheduler) = testing::services(StubWeather(Ok(String::new())), now);
        let reply = Arc::new(RecordingReply::default());
        let mut incomplete = submission("2099/01/01/00:00", "hello");
        incomplete.fields.remove(MESSAGE_FIELD);

        submit(&services, &incomplete, reply.clone()).await.unwrap();

        assert_eq!(
            reply.calls(),
            vec![
                Call::Acknowledge,
                Call::Complete(Reply::Text(MISSING_MESSAGE_TEXT.into())),
            ]
        );
        assert!(scheduler.take().is_empty());
    }

    #[tokio::test]
    async fn submission_without_send_at_gets_the_time_error() {
        let now = jst_time(2098, 12, 31, 23, 59);
        let (services, scheduler) = testing::services(StubWeather(Ok(String::new())), now);
        let reply = Arc::new(RecordingReply::default());
        let mut incomplete = submission("2099/01/01/00:00", "hello");
        incomplete.fields.remove(SEND_AT_FIELD);

        submit(&services, &incomplete, reply.clone()).await.unwrap();

        assert_eq!(
            reply.calls(),
            vec![
                Call::Acknowledge,
                Call::Complete(Reply::Text(INVALID_TIME_MESSAGE.into())),
            ]
        );
        assert!(scheduler.take().is_empty());
    }

    #[tokio::test]
    async fn submission_for_now_is_rejected_without_scheduling() {
        let now = jst_time(2099, 1, 1, 0, 0);
        let (services, scheduler) = testing::services(StubWeather(Ok(String::new())), now);
        let reply = Arc::new(RecordingReply::default());

        submit(&services, &submission("2099/01/01/00:00", "hello"), reply.clone())
            .await
            .unwrap();

        assert_eq!(
            reply.calls(),
            vec![
                Call::Acknowledge,
                Call::Complete(Reply::Text(INVALID_TIME_MESSAGE.into())),
            ]
        );
        assert!(scheduler.take().is_empty());
    }
}
