use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Lifetime of one screen's pending fetch.
///
/// Each load calls [`ScreenScope::renew`], which cancels whatever the
/// previous load was still waiting on. Results carry the generation they were
/// started under so a message that slipped past the cancel is ignored.
#[derive(Debug)]
pub struct ScreenScope {
    token: CancellationToken,
    generation: u64,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            generation: 0,
        }
    }

    /// Cancel the pending fetch and start a new scope for the next one
    pub fn renew(&mut self) -> ScopeHandle {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.generation += 1;

        ScopeHandle {
            token: self.token.clone(),
            generation: self.generation,
        }
    }

    /// Screen is going away; drop whatever it was waiting for
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Should a result from `generation` still be applied?
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && !self.token.is_cancelled()
    }
}

impl Default for ScreenScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Handed to a spawned fetch so it can be cut short
#[derive(Debug, Clone)]
pub struct ScopeHandle {
    token: CancellationToken,
    generation: u64,
}

impl ScopeHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `fut` unless the scope is cancelled first; `None` means cancelled
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            output = fut => Some(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_completes_when_not_cancelled() {
        let mut scope = ScreenScope::new();
        let handle = scope.renew();

        assert_eq!(handle.run(async { 7 }).await, Some(7));
        assert!(scope.is_current(handle.generation()));
    }

    #[tokio::test]
    async fn test_renew_cancels_pending_fetch() {
        let mut scope = ScreenScope::new();
        let first = scope.renew();

        let pending = tokio::spawn({
            let first = first.clone();
            async move {
                first
                    .run(tokio::time::sleep(Duration::from_secs(60)))
                    .await
            }
        });

        let second = scope.renew();

        assert_eq!(pending.await.unwrap(), None);
        assert!(first.is_cancelled());
        assert!(!scope.is_current(first.generation()));
        assert!(scope.is_current(second.generation()));
    }

    #[tokio::test]
    async fn test_cancel_on_leave() {
        let mut scope = ScreenScope::new();
        let handle = scope.renew();

        scope.cancel();

        assert_eq!(handle.run(async { "late" }).await, None);
        assert!(!scope.is_current(handle.generation()));
    }
}
