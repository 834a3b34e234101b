use crate::{clock::Clock, config::Config, tasks::Scheduler, weather::WeatherSource};
use std::sync::Arc;

/// Everything a handler may need beyond its own interaction. Immutable once built.
pub struct Services {
    pub config: Arc<Config>,
    pub weather: Arc<dyn WeatherSource>,
    pub scheduler: Arc<dyn Scheduler>,
    pub clock: Arc<dyn Clock>,
}
