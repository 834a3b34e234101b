use crate::services::Services;
use serenity::prelude::*;
use std::sync::Arc;

pub struct ServicesKey;

impl TypeMapKey for ServicesKey {
    type Value = Arc<Services>;
}
