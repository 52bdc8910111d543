use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use accountgate_core::{AppError, AppResult};
use accountgate_domain::EmailAddress;

use super::{
    EmailService, NotificationService, OutgoingEmail, TEST_SUBJECT, WELCOME_SUBJECT, escape_html,
};

#[derive(Default)]
struct RecordingEmailService {
    sent: Mutex<Vec<(String, String, String, Option<String>)>>,
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        self.sent
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock email state: {error}")))?
            .push((
                to.to_owned(),
                subject.to_owned(),
                text_body.to_owned(),
                html_body.map(ToOwned::to_owned),
            ));
        Ok(())
    }
}

#[tokio::test]
async fn welcome_email_addresses_user_by_first_name() -> AppResult<()> {
    let email = Arc::new(RecordingEmailService::default());
    let service = NotificationService::new(email.clone());

    service
        .send_welcome(&EmailAddress::new("alice@x.com")?, Some("Alice"))
        .await?;

    let sent = email
        .sent
        .lock()
        .map_err(|error| AppError::Internal(error.to_string()))?
        .clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "alice@x.com");
    assert_eq!(sent[0].1, WELCOME_SUBJECT);
    assert!(sent[0].2.starts_with("Hello Alice,"));
    assert!(sent[0].3.is_some());
    Ok(())
}

#[tokio::test]
async fn welcome_email_escapes_name_in_html() -> AppResult<()> {
    let email = Arc::new(RecordingEmailService::default());
    let service = NotificationService::new(email.clone());

    service
        .send_welcome(&EmailAddress::new("eve@x.com")?, Some("<script>"))
        .await?;

    let html = email
        .sent
        .lock()
        .map_err(|error| AppError::Internal(error.to_string()))?
        .first()
        .and_then(|message| message.3.clone())
        .unwrap_or_default();
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
    Ok(())
}

#[tokio::test]
async fn missing_first_name_falls_back_to_greeting() -> AppResult<()> {
    let email = Arc::new(RecordingEmailService::default());
    let service = NotificationService::new(email.clone());

    service
        .send_welcome(&EmailAddress::new("bob@x.com")?, Some("  "))
        .await?;

    let text = email
        .sent
        .lock()
        .map_err(|error| AppError::Internal(error.to_string()))?
        .first()
        .map(|message| message.2.clone())
        .unwrap_or_default();
    assert!(text.starts_with("Hello there,"));
    Ok(())
}

#[tokio::test]
async fn direct_message_goes_to_canonical_recipient() -> AppResult<()> {
    let email = Arc::new(RecordingEmailService::default());
    let service = NotificationService::new(email.clone());

    let recipient = service
        .send_message(OutgoingEmail {
            to: " Carol@X.com ".to_owned(),
            subject: " Invoice ".to_owned(),
            text_body: "Your invoice is ready.".to_owned(),
            html_body: Some("   ".to_owned()),
        })
        .await?;

    assert_eq!(recipient.as_str(), "carol@x.com");
    let sent = email
        .sent
        .lock()
        .map_err(|error| AppError::Internal(error.to_string()))?
        .clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "carol@x.com");
    assert_eq!(sent[0].1, "Invoice");
    assert!(sent[0].3.is_none());
    Ok(())
}

#[tokio::test]
async fn direct_message_without_subject_or_body_is_rejected() {
    let email = Arc::new(RecordingEmailService::default());
    let service = NotificationService::new(email.clone());

    let no_subject = service
        .send_message(OutgoingEmail {
            to: "carol@x.com".to_owned(),
            text_body: "body".to_owned(),
            ..OutgoingEmail::default()
        })
        .await;
    let no_body = service
        .send_message(OutgoingEmail {
            to: "carol@x.com".to_owned(),
            subject: "Hello".to_owned(),
            ..OutgoingEmail::default()
        })
        .await;

    assert!(matches!(no_subject, Err(AppError::Validation(_))));
    assert!(matches!(no_body, Err(AppError::Validation(_))));
    let sent = email.sent.lock().map(|guard| guard.len()).unwrap_or(0);
    assert_eq!(sent, 0);
}

#[tokio::test]
async fn test_message_uses_fixed_subject() -> AppResult<()> {
    let email = Arc::new(RecordingEmailService::default());
    let service = NotificationService::new(email.clone());

    service.send_test(&EmailAddress::new("ops@x.com")?).await?;

    let sent = email
        .sent
        .lock()
        .map_err(|error| AppError::Internal(error.to_string()))?
        .clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, TEST_SUBJECT);
    assert!(sent[0].3.as_deref().is_some_and(|html| html.contains("Email Test")));
    Ok(())
}

#[test]
fn escape_html_handles_quotes_and_ampersands() {
    assert_eq!(escape_html(r#"a & "b""#), "a &amp; &quot;b&quot;");
}
