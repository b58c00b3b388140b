//! Route state for page navigation.

use std::any::Any;

use chrono::{DateTime, Duration, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use taskflow_states::{State, state_assign_impl};

/// Which page is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    #[default]
    Signup,
    Profile,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Due {
    At(DateTime<Utc>),
    /// Stamped by the first [`Navigation::poll`], so commands need no clock.
    After(Duration),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    current: Route,
    pending: Option<(Route, Due)>,
    scheduled: u32,
}

impl Navigation {
    pub fn new(current: Route) -> Self {
        Self {
            current,
            ..Default::default()
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn pending_route(&self) -> Option<Route> {
        self.pending.map(|(route, _)| route)
    }

    /// Navigations scheduled so far.
    pub fn scheduled_count(&self) -> u32 {
        self.scheduled
    }

    pub fn navigate(&mut self, route: Route) {
        info!("Navigation: {:?} -> {route:?}", self.current);
        self.current = route;
        self.pending = None;
    }

    /// Navigate to `route` once `at` has passed. Replaces any earlier schedule.
    pub fn schedule(&mut self, route: Route, at: DateTime<Utc>) {
        self.pending = Some((route, Due::At(at)));
        self.scheduled += 1;
    }

    /// Navigate to `route` `delay` after the next poll.
    pub fn schedule_after(&mut self, route: Route, delay: Duration) {
        self.pending = Some((route, Due::After(delay)));
        self.scheduled += 1;
    }

    /// Perform a due navigation. Returns `true` if the route changed.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        let Some((route, due)) = self.pending else {
            return false;
        };

        let at = match due {
            Due::At(at) => at,
            Due::After(delay) => {
                let at = now + delay;
                self.pending = Some((route, Due::At(at)));
                at
            }
        };

        if now >= at {
            self.navigate(route);
            true
        } else {
            false
        }
    }
}

impl State for Navigation {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn default_route_is_signup() {
        assert_eq!(Navigation::default().current(), Route::Signup);
    }

    #[test]
    fn scheduled_navigation_waits_until_due() {
        let mut nav = Navigation::default();
        nav.schedule(Route::Dashboard, t0() + Duration::milliseconds(500));

        assert!(!nav.poll(t0()));
        assert_eq!(nav.current(), Route::Signup);

        assert!(nav.poll(t0() + Duration::milliseconds(500)));
        assert_eq!(nav.current(), Route::Dashboard);
        assert_eq!(nav.pending_route(), None);
        assert!(!nav.poll(t0() + Duration::seconds(1)), "fires only once");
    }

    #[test]
    fn relative_schedule_starts_at_first_poll() {
        let mut nav = Navigation::default();
        nav.schedule_after(Route::Dashboard, Duration::milliseconds(500));

        assert!(!nav.poll(t0()));
        assert!(!nav.poll(t0() + Duration::milliseconds(499)));
        assert!(nav.poll(t0() + Duration::milliseconds(500)));
        assert_eq!(nav.scheduled_count(), 1);
    }

    #[test]
    fn navigate_cancels_pending() {
        let mut nav = Navigation::default();
        nav.schedule(Route::Dashboard, t0());
        nav.navigate(Route::Profile);

        assert!(!nav.poll(t0()));
        assert_eq!(nav.current(), Route::Profile);
    }
}
