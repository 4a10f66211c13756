//! The "Upgrade now" action
//!
//! Activation runs the session call on a background thread; the result is
//! picked up by [`UpgradeAction::poll`] on the UI thread.

use std::sync::Arc;

use flume::{Receiver, TryRecvError};
use log::{error, info};

use crate::notification::NotificationManager;

use super::client::{BillingError, CheckoutSession, Navigator, SessionClient};

pub const UPGRADE_ERROR_TITLE: &str = "Upgrade failed";
pub const UPGRADE_ERROR_DESCRIPTION: &str = "Could not start checkout, please try again later";

/// How a finished activation ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// The browser was sent to this URL
    Redirected(String),
    Failed(String),
}

pub struct UpgradeAction<C: SessionClient, N: Navigator> {
    client: Arc<C>,
    navigator: N,
    fallback_url: String,
    in_flight: Option<Receiver<Result<CheckoutSession, BillingError>>>,
}

impl<C: SessionClient, N: Navigator> UpgradeAction<C, N> {
    pub fn new(client: C, navigator: N, fallback_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            navigator,
            fallback_url: fallback_url.into(),
            in_flight: None,
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start creating a checkout session.
    ///
    /// Returns `false` if a call is already in flight.
    pub fn activate(&mut self) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        info!("Starting upgrade checkout");

        let (tx, rx) = flume::bounded(1);
        let client = self.client.clone();
        std::thread::spawn(move || {
            let _ = tx.send(client.create_session());
        });
        self.in_flight = Some(rx);
        true
    }

    /// Finish a completed call, if any.
    ///
    /// Failures are logged and reported with one error notification; they
    /// are not retried.
    pub fn poll(&mut self, notifications: &mut NotificationManager) -> Option<UpgradeOutcome> {
        let rx = self.in_flight.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(BillingError::Network(
                "session call ended without a response".to_string(),
            )),
        };
        self.in_flight = None;

        let outcome = result.and_then(|session| {
            let target = session.url.unwrap_or_else(|| self.fallback_url.clone());
            self.navigator.navigate(&target).map(|()| target)
        });

        match outcome {
            Ok(target) => {
                info!("Redirected to {target}");
                Some(UpgradeOutcome::Redirected(target))
            }
            Err(e) => {
                error!("Upgrade failed: {e}");
                notifications.error(UPGRADE_ERROR_TITLE, UPGRADE_ERROR_DESCRIPTION);
                Some(UpgradeOutcome::Failed(e.to_string()))
            }
        }
    }
}
