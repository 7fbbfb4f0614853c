use hero_core::{
    is_email_shaped, looks_like_spam, sanitize_input, send_contact_email, validate_contact_form,
    text_len, ContactForm, EmailRequest, EmailSettings, EmailTransport, HeroError, SEND_FAILED,
};
use std::cell::RefCell;

fn form(name: &str, email: &str, message: &str) -> ContactForm {
    ContactForm {
        name: name.into(),
        email: email.into(),
        message: message.into(),
        honeypot: None,
    }
}

fn error_of(f: &ContactForm) -> Option<String> {
    validate_contact_form(f).error
}

#[test]
fn valid_form_passes() {
    let r = validate_contact_form(&form("Ada", "ada@example.com", "Hello there, nice portfolio."));
    assert!(r.is_valid);
    assert_eq!(r.error, None);
}

#[test]
fn rules_apply_in_order() {
    assert_eq!(error_of(&form(" ", "", "")).as_deref(), Some("Name is required"));
    assert_eq!(error_of(&form("Ada", "  ", "")).as_deref(), Some("Email is required"));
    assert_eq!(error_of(&form("Ada", "bad", "")).as_deref(), Some("Message is required"));
    assert_eq!(
        error_of(&form("Ada", "bad", "long enough message")).as_deref(),
        Some("Please enter a valid email address")
    );
    assert_eq!(
        error_of(&form(&"a".repeat(101), "ada@example.com", "long enough message")).as_deref(),
        Some("Name must be less than 100 characters")
    );
    let long_email = format!("{}@example.com", "a".repeat(95));
    assert_eq!(
        error_of(&form("Ada", &long_email, "long enough message")).as_deref(),
        Some("Email must be less than 100 characters")
    );
    assert_eq!(
        error_of(&form("Ada", "ada@example.com", &"ab ".repeat(334))).as_deref(),
        Some("Message must be less than 1000 characters")
    );
    assert_eq!(
        error_of(&form("Ada", "ada@example.com", "short")).as_deref(),
        Some("Message must be at least 10 characters long")
    );
    assert_eq!(
        error_of(&form("Ada", "ada@example.com", "You are a WINNER today")).as_deref(),
        Some("Message content appears to be spam")
    );
}

#[test]
fn lengths_count_utf16_units_like_the_browser() {
    assert_eq!(text_len("héllo"), 5);
    assert_eq!(text_len("😀"), 2);

    // 60 emoji are 120 code units: over the name limit.
    let name = "😀".repeat(60);
    assert_eq!(
        error_of(&form(&name, "ada@example.com", "long enough message")).as_deref(),
        Some("Name must be less than 100 characters")
    );
    // Five distinct emoji reach the 10-unit message minimum.
    assert!(validate_contact_form(&form("Ada", "ada@example.com", "😀😁😂🤣😃")).is_valid);
}

#[test]
fn honeypot_rejects_bots() {
    let mut f = form("Ada", "ada@example.com", "Hello there, nice portfolio.");
    f.honeypot = Some("http://spam".into());
    assert_eq!(error_of(&f).as_deref(), Some("Submission rejected"));
    f.honeypot = Some(String::new());
    assert!(validate_contact_form(&f).is_valid);
}

#[test]
fn email_shape() {
    assert!(is_email_shaped("a@b.co"));
    assert!(is_email_shaped("first.last@sub.example.org"));
    assert!(!is_email_shaped("a@b"));
    assert!(!is_email_shaped("a b@c.com"));
    assert!(!is_email_shaped("@c.com"));
    assert!(!is_email_shaped("a@@c.com"));
    assert!(!is_email_shaped("a@.com"));
    assert!(!is_email_shaped("a@c."));
}

#[test]
fn spam_heuristics() {
    assert!(looks_like_spam("see https://x.test"));
    assert!(looks_like_spam("casino night"));
    assert!(looks_like_spam("heyyyyy"));
    assert!(!looks_like_spam("winners and casinos are substrings only"));
    assert!(!looks_like_spam("aaaa\naaaa"));
    assert!(!looks_like_spam("https:// alone is not a link"));
}

#[test]
fn sanitize_strips_markup_and_collapses_space() {
    assert_eq!(sanitize_input("  <b>Hi</b>   there  "), "Hi there");
    assert_eq!(sanitize_input("Tom & \"Jerry\" 'x'"), "Tom Jerry x");
    assert_eq!(sanitize_input("a\u{7}b"), "ab");
    assert_eq!(sanitize_input("line1\n\tline2"), "line1 line2");
}

#[derive(Default)]
struct MockTransport {
    sent: RefCell<Vec<(String, EmailRequest)>>,
    fail: bool,
}

impl EmailTransport for MockTransport {
    async fn send(&self, endpoint: &str, request: &EmailRequest) -> hero_core::Result<()> {
        if self.fail {
            return Err(HeroError::Transport("HTTP 500".into()));
        }
        self.sent.borrow_mut().push((endpoint.to_owned(), request.clone()));
        Ok(())
    }
}

#[test]
fn send_posts_sanitized_template_params() {
    let transport = MockTransport::default();
    let settings = EmailSettings::default();
    let f = form("  <i>Ada</i> ", "ada@example.com", "Hello   there, nice portfolio.");
    pollster::block_on(send_contact_email(&transport, &settings, &f)).unwrap();

    let sent = transport.sent.borrow();
    assert_eq!(sent.len(), 1);
    let (endpoint, req) = &sent[0];
    assert_eq!(endpoint, &settings.endpoint);
    assert_eq!(req.service_id, settings.service_id);
    assert_eq!(req.user_id, settings.public_key);
    assert_eq!(req.template_params.from_name, "Ada");
    assert_eq!(req.template_params.from_email, "ada@example.com");
    assert_eq!(req.template_params.message, "Hello there, nice portfolio.");
    assert_eq!(req.template_params.to_name, settings.recipient_name);
}

#[test]
fn send_validates_before_transport() {
    let transport = MockTransport::default();
    let err = pollster::block_on(send_contact_email(
        &transport,
        &EmailSettings::default(),
        &form("Ada", "nope", "Hello there, nice portfolio."),
    ))
    .unwrap_err();
    assert!(matches!(err, HeroError::Validation(ref m) if m == "Please enter a valid email address"));
    assert!(transport.sent.borrow().is_empty());
}

#[test]
fn transport_failure_has_one_user_message() {
    let transport = MockTransport {
        fail: true,
        ..Default::default()
    };
    let err = pollster::block_on(send_contact_email(
        &transport,
        &EmailSettings::default(),
        &form("Ada", "ada@example.com", "Hello there, nice portfolio."),
    ))
    .unwrap_err();
    assert_eq!(err.to_string(), SEND_FAILED);
}
