// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Diagnostic test checking that notifications reach the user

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tracing::{debug, warn};

/// How long the user has to click the diagnostic notification
pub const DEFAULT_USER_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TroubleshootStatus {
    Idle { visible: bool },
    InProgress,
    WaitingForUser,
    Success,
    Failure { reason: String },
}

/// Shows notifications on the platform
pub trait NotificationDisplayer: Send + Sync {
    /// Returns `false` if the notification could not be shown.
    fn display_diagnostic_notification(&self) -> bool;

    fn dismiss_diagnostic_notification(&self);
}

/// Receives clicks on the diagnostic notification
///
/// Only clicks made while a test waits for the user count. Earlier clicks,
/// e.g. on the notification of a timed out run, are ignored.
#[derive(Debug, Clone)]
pub struct NotificationClickHandler {
    clicks: Arc<watch::Sender<u64>>,
}

impl Default for NotificationClickHandler {
    fn default() -> Self {
        Self {
            clicks: Arc::new(watch::Sender::new(0)),
        }
    }
}

impl NotificationClickHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_notification_click(&self) {
        self.clicks.send_modify(|clicks| *clicks = clicks.wrapping_add(1));
    }

    /// Starts listening for clicks. Clicks before this call are not seen.
    fn listen(&self) -> watch::Receiver<u64> {
        self.clicks.subscribe()
    }
}

/// Shows a diagnostic notification and waits for the user to click it.
pub struct NotificationTest<D> {
    displayer: D,
    click_handler: NotificationClickHandler,
    user_response_timeout: Duration,
    status_tx: watch::Sender<TroubleshootStatus>,
}

impl<D: NotificationDisplayer> NotificationTest<D> {
    pub fn new(
        displayer: D,
        click_handler: NotificationClickHandler,
        user_response_timeout: Duration,
    ) -> Self {
        let (status_tx, _) = watch::channel(TroubleshootStatus::Idle { visible: true });
        Self {
            displayer,
            click_handler,
            user_response_timeout,
            status_tx,
        }
    }

    pub fn status(&self) -> TroubleshootStatus {
        self.status_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TroubleshootStatus> {
        self.status_tx.subscribe()
    }

    pub async fn run(&self) {
        self.set_status(TroubleshootStatus::InProgress);
        if !self.displayer.display_diagnostic_notification() {
            warn!("diagnostic notification could not be displayed");
            self.set_status(TroubleshootStatus::Failure {
                reason: "the notification cannot be displayed".to_owned(),
            });
            return;
        }

        let mut clicks = self.click_handler.listen();
        self.set_status(TroubleshootStatus::WaitingForUser);
        match tokio::time::timeout(self.user_response_timeout, clicks.changed()).await {
            // the handler owns the sender, so `changed` cannot fail here
            Ok(_) => self.set_status(TroubleshootStatus::Success),
            Err(_) => {
                self.displayer.dismiss_diagnostic_notification();
                self.set_status(TroubleshootStatus::Failure {
                    reason: "the notification was not clicked".to_owned(),
                });
            }
        }
    }

    pub fn reset(&self) {
        self.set_status(TroubleshootStatus::Idle { visible: true });
    }

    fn set_status(&self, status: TroubleshootStatus) {
        debug!(?status, "notification test");
        self.status_tx.send_replace(status);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[derive(Debug, Default)]
    struct FakeDisplayer {
        cannot_display: bool,
        dismissed: AtomicBool,
    }

    impl NotificationDisplayer for Arc<FakeDisplayer> {
        fn display_diagnostic_notification(&self) -> bool {
            !self.cannot_display
        }

        fn dismiss_diagnostic_notification(&self) {
            self.dismissed.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn notification_cannot_be_displayed() {
        let displayer = Arc::new(FakeDisplayer {
            cannot_display: true,
            ..Default::default()
        });
        let test = NotificationTest::new(
            displayer,
            NotificationClickHandler::new(),
            DEFAULT_USER_RESPONSE_TIMEOUT,
        );
        assert_eq!(test.status(), TroubleshootStatus::Idle { visible: true });

        test.run().await;
        assert!(matches!(test.status(), TroubleshootStatus::Failure { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn user_does_not_click() {
        let displayer = Arc::new(FakeDisplayer::default());
        let test = NotificationTest::new(
            displayer.clone(),
            NotificationClickHandler::new(),
            DEFAULT_USER_RESPONSE_TIMEOUT,
        );

        test.run().await;
        assert!(matches!(test.status(), TroubleshootStatus::Failure { .. }));
        assert!(displayer.dismissed.load(Ordering::SeqCst));

        test.reset();
        assert_eq!(test.status(), TroubleshootStatus::Idle { visible: true });
    }

    #[tokio::test]
    async fn user_clicks() {
        let click_handler = NotificationClickHandler::new();
        let test = Arc::new(NotificationTest::new(
            Arc::new(FakeDisplayer::default()),
            click_handler.clone(),
            DEFAULT_USER_RESPONSE_TIMEOUT,
        ));
        let mut status = test.subscribe();

        let task = tokio::spawn({
            let test = test.clone();
            async move { test.run().await }
        });
        status
            .wait_for(|status| *status == TroubleshootStatus::WaitingForUser)
            .await
            .unwrap();
        click_handler.handle_notification_click();
        task.await.unwrap();

        assert_eq!(test.status(), TroubleshootStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn late_click_does_not_pass_next_run() {
        let displayer = Arc::new(FakeDisplayer::default());
        let click_handler = NotificationClickHandler::new();
        let test = NotificationTest::new(
            displayer.clone(),
            click_handler.clone(),
            DEFAULT_USER_RESPONSE_TIMEOUT,
        );

        test.run().await;
        assert!(matches!(test.status(), TroubleshootStatus::Failure { .. }));

        // clicked after the test gave up
        click_handler.handle_notification_click();
        test.reset();
        displayer.dismissed.store(false, Ordering::SeqCst);

        test.run().await;
        assert_eq!(
            test.status(),
            TroubleshootStatus::Failure {
                reason: "the notification was not clicked".to_owned()
            }
        );
        assert!(displayer.dismissed.load(Ordering::SeqCst));
    }
}
