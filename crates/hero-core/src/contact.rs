//! Contact form validation, input sanitizing and the e-mail transport seam.

use crate::constants::{
    CONTACT_EMAIL_MAX_CHARS, CONTACT_MESSAGE_MAX_CHARS, CONTACT_MESSAGE_MIN_CHARS,
    CONTACT_NAME_MAX_CHARS, SPAM_REPEAT_RUN, SPAM_WORDS,
};
use crate::error::{HeroError, Result};
use serde::{Deserialize, Serialize};

pub const SEND_FAILED: &str = "Failed to send email";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Hidden field; humans leave it empty.
    #[serde(default)]
    pub honeypot: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn fail(msg: &str) -> Self {
        Self {
            is_valid: false,
            error: Some(msg.to_owned()),
        }
    }
}

/// Length as the browser's `String.length` reports it (UTF-16 code units),
/// so limits agree with the form's `maxlength`.
pub fn text_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Rules run in order and the first failure wins.
pub fn validate_contact_form(form: &ContactForm) -> ValidationResult {
    if form.name.trim().is_empty() {
        return ValidationResult::fail("Name is required");
    }
    if form.email.trim().is_empty() {
        return ValidationResult::fail("Email is required");
    }
    if form.message.trim().is_empty() {
        return ValidationResult::fail("Message is required");
    }
    if form.honeypot.as_deref().is_some_and(|h| !h.is_empty()) {
        return ValidationResult::fail("Submission rejected");
    }
    if !is_email_shaped(&form.email) {
        return ValidationResult::fail("Please enter a valid email address");
    }
    if text_len(&form.name) > CONTACT_NAME_MAX_CHARS {
        return ValidationResult::fail("Name must be less than 100 characters");
    }
    if text_len(&form.email) > CONTACT_EMAIL_MAX_CHARS {
        return ValidationResult::fail("Email must be less than 100 characters");
    }
    let message_len = text_len(&form.message);
    if message_len > CONTACT_MESSAGE_MAX_CHARS {
        return ValidationResult::fail("Message must be less than 1000 characters");
    }
    if message_len < CONTACT_MESSAGE_MIN_CHARS {
        return ValidationResult::fail("Message must be at least 10 characters long");
    }
    let full = format!("{} {} {}", form.name, form.email, form.message).to_lowercase();
    if looks_like_spam(&full) {
        return ValidationResult::fail("Message content appears to be spam");
    }
    ValidationResult::ok()
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot in the
/// domain with something on both sides.
pub fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn has_url(text: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        text.match_indices(scheme).any(|(i, _)| {
            text[i + scheme.len()..]
                .chars()
                .next()
                .is_some_and(|c| !c.is_whitespace())
        })
    })
}

fn has_spam_word(text: &str) -> bool {
    SPAM_WORDS.iter().any(|word| {
        text.match_indices(word).any(|(i, _)| {
            let before = text[..i].chars().next_back();
            let after = text[i + word.len()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
    })
}

fn has_repeated_run(text: &str) -> bool {
    let mut prev = None;
    let mut run = 0;
    for c in text.chars() {
        if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
            prev = None;
            run = 0;
            continue;
        }
        if Some(c) == prev {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run >= SPAM_REPEAT_RUN {
            return true;
        }
    }
    false
}

/// Links, known spam words, or any character repeated five times in a row.
pub fn looks_like_spam(text: &str) -> bool {
    has_url(text) || has_spam_word(text) || has_repeated_run(text)
}

/// Trim, strip tags and markup characters, collapse whitespace and drop
/// control characters.
pub fn sanitize_input(input: &str) -> String {
    let trimmed = input.trim();

    let mut untagged = String::with_capacity(trimmed.len());
    let mut rest = trimmed;
    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                untagged.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    untagged.push_str(rest);

    let mut out = String::with_capacity(untagged.len());
    let mut in_space = false;
    for c in untagged.chars() {
        if matches!(c, '<' | '>' | '\'' | '"' | '&') {
            continue;
        }
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_control() {
            continue;
        }
        out.push(c);
    }
    out
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub recipient_name: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".into(),
            service_id: "YOUR_SERVICE_ID".into(),
            template_id: "YOUR_TEMPLATE_ID".into(),
            public_key: "YOUR_PUBLIC_KEY".into(),
            recipient_name: "Mark Anthony Alvarez".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    pub to_name: String,
}

/// Body posted to the transactional e-mail endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub template_params: EmailTemplateParams,
}

impl EmailRequest {
    pub fn new(settings: &EmailSettings, form: &ContactForm) -> Self {
        Self {
            service_id: settings.service_id.clone(),
            template_id: settings.template_id.clone(),
            user_id: settings.public_key.clone(),
            template_params: EmailTemplateParams {
                from_name: sanitize_input(&form.name),
                from_email: form.email.trim().to_owned(),
                message: sanitize_input(&form.message),
                to_name: settings.recipient_name.clone(),
            },
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait EmailTransport {
    async fn send(&self, endpoint: &str, request: &EmailRequest) -> Result<()>;
}

/// Validate, then hand the message to the transport. Transport failures are
/// logged and reported with a single user-facing message.
pub async fn send_contact_email<T: EmailTransport>(
    transport: &T,
    settings: &EmailSettings,
    form: &ContactForm,
) -> Result<()> {
    let verdict = validate_contact_form(form);
    if !verdict.is_valid {
        return Err(HeroError::Validation(
            verdict.error.unwrap_or_else(|| "invalid form".into()),
        ));
    }
    let request = EmailRequest::new(settings, form);
    transport
        .send(&settings.endpoint, &request)
        .await
        .map_err(|e| {
            log::error!("[contact] send failed: {e}");
            HeroError::Transport(SEND_FAILED.into())
        })
}
