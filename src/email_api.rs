use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Client for the auxiliary email store, used to recover a subject line when
/// the raw message text lacks one. Every failure here is recoverable: the
/// caller falls back to heuristic extraction, so nothing is surfaced beyond a
/// debug log.
pub struct EmailStoreClient {
    http: reqwest::Client,
    base_url: String,
}

/// Shape of one entry in the store's `/api/emails` array. Field names vary
/// between store versions, hence the aliases.
#[derive(Debug, Deserialize)]
struct StoredEmail {
    #[serde(default, alias = "sender")]
    from: String,
    #[serde(default, alias = "message")]
    body: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    headers: Option<HashMap<String, String>>,
}

impl EmailStoreClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(EmailStoreClient { http, base_url })
    }

    /// Look up the stored email matching `sender`/`message` and return its
    /// `(subject, body)`. `None` on any fetch, parse, or match failure.
    pub async fn find(&self, sender: &str, message: &str) -> Option<(String, String)> {
        let url = format!("{}/api/emails", self.base_url.trim_end_matches('/'));

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("email store fetch failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            log::debug!("email store answered HTTP {}", response.status());
            return None;
        }

        let emails: Vec<StoredEmail> = match response.json().await {
            Ok(emails) => emails,
            Err(e) => {
                log::debug!("email store returned unexpected shape: {e}");
                return None;
            }
        };

        match_stored(&emails, sender, message)
    }
}

/// Match an entry whose sender contains the queried sender and whose body
/// contains (or is contained by) the queried message. The recovered subject
/// prefers the entry's own subject field, then its headers, then the
/// `(No Subject)` placeholder.
fn match_stored(
    emails: &[StoredEmail],
    sender: &str,
    message: &str,
) -> Option<(String, String)> {
    for email in emails {
        if !email.from.contains(sender) {
            continue;
        }
        if !(email.body.contains(message) || message.contains(&email.body)) {
            continue;
        }

        let mut subject = email.subject.clone();
        if subject.is_empty() {
            if let Some(headers) = &email.headers {
                subject = headers
                    .get("Subject")
                    .or_else(|| headers.get("subject"))
                    .cloned()
                    .unwrap_or_default();
            }
        }
        if subject.is_empty() {
            subject = "(No Subject)".to_string();
        }
        return Some((subject, email.body.clone()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(from: &str, body: &str, subject: &str) -> StoredEmail {
        StoredEmail {
            from: from.to_string(),
            body: body.to_string(),
            subject: subject.to_string(),
            headers: None,
        }
    }

    #[test]
    fn matches_by_sender_and_body() {
        let emails = vec![
            stored("other@example.com", "nothing in common", "Skip"),
            stored("alice@example.com", "please review the attached report", "Review"),
        ];
        let (subject, body) = match_stored(&emails, "alice@example.com", "attached report").unwrap();
        assert_eq!(subject, "Review");
        assert_eq!(body, "please review the attached report");
    }

    #[test]
    fn matches_when_message_contains_body() {
        let emails = vec![stored("bob@example.com", "short", "Hi")];
        assert!(match_stored(&emails, "bob@example.com", "a short message").is_some());
    }

    #[test]
    fn no_match_returns_none() {
        let emails = vec![stored("alice@example.com", "hello", "Hi")];
        assert!(match_stored(&emails, "carol@example.com", "hello").is_none());
        assert!(match_stored(&emails, "alice@example.com", "unrelated").is_none());
    }

    #[test]
    fn subject_recovered_from_headers() {
        let mut email = stored("alice@example.com", "hello", "");
        email.headers = Some(HashMap::from([(
            "Subject".to_string(),
            "From headers".to_string(),
        )]));
        let (subject, _) = match_stored(&[email], "alice@example.com", "hello").unwrap();
        assert_eq!(subject, "From headers");
    }

    #[test]
    fn missing_subject_uses_placeholder() {
        let email = stored("alice@example.com", "hello", "");
        let (subject, _) = match_stored(&[email], "alice@example.com", "hello").unwrap();
        assert_eq!(subject, "(No Subject)");
    }

    #[test]
    fn stored_email_accepts_aliased_fields() {
        let entry: StoredEmail =
            serde_json::from_str(r#"{"sender":"a@b.com","message":"hi","subject":"S"}"#).unwrap();
        assert_eq!(entry.from, "a@b.com");
        assert_eq!(entry.body, "hi");

        let canonical: StoredEmail =
            serde_json::from_str(r#"{"from":"a@b.com","body":"hi"}"#).unwrap();
        assert_eq!(canonical.from, "a@b.com");
        assert_eq!(canonical.body, "hi");
        assert!(canonical.subject.is_empty());
    }
}
