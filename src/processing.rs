//! Processing screen: a timed pause between the quiz and the profile.

use std::time::Duration;

use crate::navigation::{Navigator, Route};
use crate::scheduler::{Scheduler, TaskHandle};

/// Step labels shown while the "analysis" runs.
pub const PROCESSING_STEPS: [&str; 4] = [
    "Analyzing your mindprint",
    "Identifying patterns",
    "Finding compatible matches",
    "Preparing your profile",
];

/// Live processing screen. Redirects to the profile once the delay
/// elapses; dropping it first suppresses the redirect.
#[derive(Debug)]
pub struct ProcessingScreen {
    scheduler: Scheduler,
    redirect: TaskHandle,
}

impl ProcessingScreen {
    pub fn open(navigator: Navigator, delay: Duration) -> Self {
        let scheduler = Scheduler::new("processing");
        let redirect = scheduler.schedule(delay, async move {
            tracing::info!("Processing finished, redirecting to profile");
            navigator.navigate(Route::Profile);
        });
        Self {
            scheduler,
            redirect,
        }
    }

    pub fn steps(&self) -> &'static [&'static str] {
        &PROCESSING_STEPS
    }

    /// Whether the redirect has already been delivered (or cancelled).
    pub fn is_finished(&self) -> bool {
        self.redirect.is_finished()
    }

    /// Leave the screen early. Same as dropping it.
    pub fn teardown(self) {
        self.scheduler.cancel_all();
    }
}
