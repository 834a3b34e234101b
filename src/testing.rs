//! Test doubles for the reply, scheduler, clock and weather seams.

use crate::{
    clock::Clock,
    config::Config,
    reply::{FormSpec, Reply, ReplyHandle},
    services::Services,
    tasks::{scheduled_reply::ScheduledReply, Scheduler},
    weather::WeatherSource,
};
use anyhow::{bail, Result as AnyResult};
use chrono::{DateTime, Utc};
use serenity::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Acknowledge,
    Complete(Reply),
    PresentForm(FormSpec),
}

#[derive(Default)]
pub struct RecordingReply {
    calls: Mutex<Vec<Call>>,
    fail_completions: bool,
}

impl RecordingReply {
    pub fn failing() -> Self {
        RecordingReply {
            fail_completions: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyHandle for RecordingReply {
    async fn acknowledge(&self) -> AnyResult<()> {
        self.calls.lock().unwrap().push(Call::Acknowledge);
        Ok(())
    }

    async fn complete(&self, reply: Reply) -> AnyResult<()> {
        self.calls.lock().unwrap().push(Call::Complete(reply));
        if self.fail_completions {
            bail!("Unknown Webhook");
        }
        Ok(())
    }

    async fn present_form(&self, form: &FormSpec) -> AnyResult<()> {
        self.calls.lock().unwrap().push(Call::PresentForm(form.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingScheduler {
    scheduled: Mutex<Vec<ScheduledReply>>,
}

impl RecordingScheduler {
    pub fn take(&self) -> Vec<ScheduledReply> {
        std::mem::take(&mut *self.scheduled.lock().unwrap())
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(&self, reply: ScheduledReply) {
        self.scheduled.lock().unwrap().push(reply);
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct StubWeather(pub AnyResult<String>);

#[async_trait]
impl WeatherSource for StubWeather {
    async fn forecast(&self, _city: &str) -> AnyResult<String> {
        match &self.0 {
            Ok(body) => Ok(body.clone()),
            Err(error) => bail!("{error}"),
        }
    }
}

pub fn services(
    weather: StubWeather,
    now: DateTime<Utc>,
) -> (Services, Arc<RecordingScheduler>) {
    let scheduler = Arc::new(RecordingScheduler::default());
    let services = Services {
        config: Arc::new(Config::default()),
        weather: Arc::new(weather),
        scheduler: scheduler.clone(),
        clock: Arc::new(FixedClock(now)),
    };
    (services, scheduler)
}
