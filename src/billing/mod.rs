//! Billing upgrade call-to-action

mod client;
mod upgrade;

pub use client::{
    BillingError, BrowserNavigator, CheckoutSession, HttpSessionClient, Navigator, SessionClient,
    parse_session,
};
pub use upgrade::{UPGRADE_ERROR_DESCRIPTION, UPGRADE_ERROR_TITLE, UpgradeAction, UpgradeOutcome};
