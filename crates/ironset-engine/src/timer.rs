//! One-shot rest timer.

use std::sync::Arc;
use std::time::Duration;

use ironset_protocol::{ChatId, NotifierPort};
use ironset_render::messages::timer_finished;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, warn};

/// Spawns detached sleeps that ping a chat through the notifier. Timers are
/// independent of each other and cannot be cancelled.
#[derive(Clone)]
pub struct RestTimer {
    notifier: Arc<dyn NotifierPort>,
    delay: Duration,
}

impl RestTimer {
    pub fn new(notifier: Arc<dyn NotifierPort>, delay: Duration) -> Self {
        Self { notifier, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn start(&self, chat_id: ChatId) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        let delay = self.delay;
        let span = info_span!("rest_timer", chat_id = %chat_id, delay_secs = delay.as_secs());

        tokio::spawn(
            async move {
                tokio::time::sleep(delay).await;
                match notifier.notify(chat_id, timer_finished()).await {
                    Ok(()) => debug!("rest timer delivered"),
                    Err(error) => warn!(error = %error, "rest timer delivery failed"),
                }
            }
            .instrument(span),
        )
    }
}
