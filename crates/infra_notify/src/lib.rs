//! Notification collaborators
//!
//! SMS and WhatsApp thank-you messages sent after a bill commits. These are
//! strictly fire-and-forget: sends run as detached tasks, their failures are
//! logged and swallowed, and nothing here can affect a committed bill.
//!
//! The default [`LogNotifier`] is a gateway stub that only emits structured
//! log lines; a real SMS provider slots in behind the [`Notifier`] trait
//! without touching the billing paths.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use domain_billing::Bill;

/// Errors from a notification gateway
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Gateway error: {message}")]
    Gateway { message: String },
}

/// Port for outbound customer notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a plain SMS
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError>;

    /// Sends a WhatsApp message
    async fn send_whatsapp(&self, to: &str, body: &str) -> Result<(), NotifyError>;
}

/// Gateway stub that logs instead of dialing a provider
///
/// Mirrors what the POS does out of the box: no external dependency, every
/// send recorded with a correlation id so a real gateway can be wired in
/// later without changing call sites.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(
            message_id = %Uuid::new_v4(),
            channel = "sms",
            %to,
            body,
            "outbound notification"
        );
        Ok(())
    }

    async fn send_whatsapp(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(
            message_id = %Uuid::new_v4(),
            channel = "whatsapp",
            %to,
            body,
            "outbound notification"
        );
        Ok(())
    }
}

/// Builds the thank-you text for a committed bill
///
/// Includes the public invoice link when a base URL is configured.
pub fn thank_you_message(bill: &Bill, firm_name: &str, public_base_url: Option<&str>) -> String {
    let mut message = format!(
        "Thanks for shopping at {}! Invoice #{}. Amount: {}.",
        firm_name, bill.invoice_no, bill.grand_total
    );
    if let Some(base) = public_base_url {
        let base = base.trim_end_matches('/');
        message.push_str(&format!(" View: {}/invoice/{}", base, bill.invoice_no));
    }
    message
}

/// Fires thank-you notifications for a bill without blocking the caller
///
/// No-op when the bill has no stored customer phone. Each channel is sent
/// from its own detached task; failures are logged at `warn` and dropped.
pub fn spawn_thank_you(
    notifier: Arc<dyn Notifier>,
    bill: Bill,
    firm_name: String,
    public_base_url: Option<String>,
) {
    let Some(phone) = bill.customer_phone.clone() else {
        return;
    };
    if phone.trim().is_empty() {
        return;
    }

    let body = thank_you_message(&bill, &firm_name, public_base_url.as_deref());
    let invoice_no = bill.invoice_no;

    let sms = notifier.clone();
    let sms_phone = phone.clone();
    let sms_body = body.clone();
    tokio::spawn(async move {
        if let Err(err) = sms.send_sms(&sms_phone, &sms_body).await {
            tracing::warn!(%invoice_no, %err, "thank-you SMS failed");
        }
    });

    tokio::spawn(async move {
        if let Err(err) = notifier.send_whatsapp(&phone, &body).await {
            tracing::warn!(%invoice_no, %err, "thank-you WhatsApp failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::{InvoiceNo, Money};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bill(phone: Option<&str>) -> Bill {
        Bill {
            invoice_no: InvoiceNo::new(104),
            customer_name: Some("Asha".to_string()),
            customer_phone: phone.map(String::from),
            date: Utc::now(),
            items: vec![],
            discount: Money::zero(),
            grand_total: Money::new(dec!(340)),
        }
    }

    #[test]
    fn test_message_includes_invoice_and_amount() {
        let message = thank_you_message(&bill(None), "Taheri Fireworks", None);
        assert!(message.contains("Invoice #104"));
        assert!(message.contains("₹340.00"));
        assert!(!message.contains("View:"));
    }

    #[test]
    fn test_message_appends_link_without_double_slash() {
        let message =
            thank_you_message(&bill(None), "Taheri Fireworks", Some("https://pos.example/"));
        assert!(message.ends_with("View: https://pos.example/invoice/104"));
    }

    struct FailingNotifier {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send_sms(&self, _to: &str, _body: &str) -> Result<(), NotifyError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError::Gateway {
                message: "provider down".to_string(),
            })
        }

        async fn send_whatsapp(&self, _to: &str, _body: &str) -> Result<(), NotifyError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError::Gateway {
                message: "provider down".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let notifier = Arc::new(FailingNotifier {
            attempts: AtomicUsize::new(0),
        });

        spawn_thank_you(
            notifier.clone(),
            bill(Some("9999999999")),
            "Taheri Fireworks".to_string(),
            None,
        );

        // Both channels attempted, neither failure surfaced
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(notifier.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_phone_means_no_send() {
        let notifier = Arc::new(FailingNotifier {
            attempts: AtomicUsize::new(0),
        });

        spawn_thank_you(notifier.clone(), bill(None), "Firm".to_string(), None);
        spawn_thank_you(notifier.clone(), bill(Some("  ")), "Firm".to_string(), None);

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(notifier.attempts.load(Ordering::SeqCst), 0);
    }
}
