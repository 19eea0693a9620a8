/// An outgoing plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// Recipient
    pub to: String,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body: String,
    /// Message-ID this email answers, for threading
    pub in_reply_to: Option<String>,
}

impl Email {
    /// Create a new email with a single recipient.
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            in_reply_to: None,
        }
    }

    /// Mark this email as a reply to `message_id`.
    pub fn in_reply_to(mut self, message_id: impl Into<String>) -> Self {
        self.in_reply_to = Some(message_id.into());
        self
    }
}

/// A received email message from the inbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboxMessage {
    /// Unique identifier (UID) of the message in its folder
    pub uid: u32,
    /// Message ID header
    pub message_id: Option<String>,
    /// Sender email address
    pub from: Option<String>,
    /// Sender display name
    pub from_name: Option<String>,
    /// Email subject, decoded
    pub subject: String,
    /// Subject header as received, before RFC 2047 decoding
    pub raw_subject: Option<String>,
    /// Plain text body
    pub body: Option<String>,
    /// HTML body
    pub html_body: Option<String>,
    /// Date header (RFC 2822 format)
    pub date: Option<String>,
    /// Auto-Submitted header (RFC 3834)
    pub auto_submitted: Option<String>,
    /// Precedence header
    pub precedence: Option<String>,
    /// Content-Type of the top-level part, lower case
    pub content_type: Option<String>,
}

impl InboxMessage {
    /// Create a new inbox message with minimal fields.
    pub fn new(uid: u32, from: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            uid,
            from: Some(from.into()),
            subject: subject.into(),
            body: Some(body.into()),
            ..Default::default()
        }
    }

    /// Stable key for deduplication: Message-ID when present, else the UID.
    pub fn dedup_key(&self) -> String {
        match self.message_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("imap-uid-{}", self.uid),
        }
    }

    /// Best-effort plain text: the text part, or the HTML part with tags removed.
    pub fn text(&self) -> String {
        if let Some(body) = self.body.as_deref().filter(|b| !b.trim().is_empty()) {
            return body.to_string();
        }
        self.html_body.as_deref().map(strip_tags).unwrap_or_default()
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}
