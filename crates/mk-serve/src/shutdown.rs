use tokio::sync::watch;

/// Fires once when the server is asked to stop.
#[derive(Clone, Debug)]
pub struct Shutdown {
    receiver: watch::Receiver<bool>,
}

#[derive(Debug)]
pub struct ShutdownTrigger {
    sender: watch::Sender<bool>,
}

pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownTrigger { sender }, Shutdown { receiver })
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

impl Shutdown {
    /// Resolves once shutdown is triggered. Never resolves if the trigger is
    /// dropped without firing.
    pub async fn wait(&self) {
        let mut receiver = self.receiver.clone();
        let fired = receiver.wait_for(|stopped| *stopped).await.is_ok();
        if !fired {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_resolves_after_trigger() {
        let (trigger, shutdown) = channel();
        let early = tokio::time::timeout(Duration::from_millis(20), shutdown.wait()).await;
        assert!(early.is_err());
        trigger.trigger();
        tokio::time::timeout(Duration::from_millis(100), shutdown.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn dropped_trigger_never_fires() {
        let (trigger, shutdown) = channel();
        drop(trigger);
        let waited = tokio::time::timeout(Duration::from_millis(50), shutdown.wait()).await;
        assert!(waited.is_err());
    }
}
