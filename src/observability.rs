use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("hustlebot.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("hustlebot.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("hustlebot.client.request_duration_seconds");

pub(crate) static CONTROLLER_ASKS: Counter = Counter::new("hustlebot.controller.asks");
pub(crate) static CONTROLLER_COMPLETION_FAILURES: Counter =
    Counter::new("hustlebot.controller.completion_failures");
pub(crate) static CONTROLLER_BUSY_REJECTIONS: Counter =
    Counter::new("hustlebot.controller.busy_rejections");

pub(crate) static SESSIONS_ARCHIVED: Counter = Counter::new("hustlebot.sessions.archived");
pub(crate) static SESSIONS_DELETED: Counter = Counter::new("hustlebot.sessions.deleted");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&CONTROLLER_ASKS);
    collector.register_counter(&CONTROLLER_COMPLETION_FAILURES);
    collector.register_counter(&CONTROLLER_BUSY_REJECTIONS);

    collector.register_counter(&SESSIONS_ARCHIVED);
    collector.register_counter(&SESSIONS_DELETED);
}
