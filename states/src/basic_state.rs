use std::any::Any;

use chrono::{DateTime, Duration, Utc};

use crate::{State, state_assign_impl};

/// The current instant as seen by the business layer.
///
/// The UI refreshes it once per frame; tests pin it to make freshness windows and
/// delayed navigation deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    virt: DateTime<Utc>,
}

impl Default for Time {
    fn default() -> Self {
        Self { virt: Utc::now() }
    }
}

impl Time {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { virt: instant }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.virt
    }

    pub fn set(&mut self, instant: DateTime<Utc>) {
        self.virt = instant;
    }

    pub fn advance(&mut self, by: Duration) {
        self.virt += by;
    }
}

impl AsMut<DateTime<Utc>> for Time {
    fn as_mut(&mut self) -> &mut DateTime<Utc> {
        &mut self.virt
    }
}

impl AsRef<DateTime<Utc>> for Time {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.virt
    }
}

impl State for Time {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(*self))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
