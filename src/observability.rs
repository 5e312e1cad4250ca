use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("medichat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("medichat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("medichat.client.request_duration_seconds");

pub(crate) static CHAT_SUBMISSIONS: Counter = Counter::new("medichat.chat.submissions");
pub(crate) static CHAT_IGNORED: Counter = Counter::new("medichat.chat.ignored");
pub(crate) static CHAT_FAILURES: Counter = Counter::new("medichat.chat.failures");

pub(crate) static REVEAL_CHUNKS: Counter = Counter::new("medichat.reveal.chunks");

pub(crate) static MODEL_FETCHES: Counter = Counter::new("medichat.models.fetches");
pub(crate) static MODEL_FETCH_ERRORS: Counter = Counter::new("medichat.models.fetch_errors");
pub(crate) static MODEL_SELECTIONS: Counter = Counter::new("medichat.models.selections");
pub(crate) static MODEL_SELECTION_ERRORS: Counter =
    Counter::new("medichat.models.selection_errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&CHAT_SUBMISSIONS);
    collector.register_counter(&CHAT_IGNORED);
    collector.register_counter(&CHAT_FAILURES);

    collector.register_counter(&REVEAL_CHUNKS);

    collector.register_counter(&MODEL_FETCHES);
    collector.register_counter(&MODEL_FETCH_ERRORS);
    collector.register_counter(&MODEL_SELECTIONS);
    collector.register_counter(&MODEL_SELECTION_ERRORS);
}
