/// Subject used when a generated email carries no `Subject:` line
pub const NO_SUBJECT: &str = "No Subject";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitEmail {
    pub subject: String,
    pub body: String,
}

/// Split generated email text on the literal `Subject:` marker.
///
/// The subject is the rest of the marker's line; the body is everything after
/// that line. Without a marker the whole text is the body.
pub fn split_generated_email(text: &str) -> SplitEmail {
    match text.split_once("Subject:") {
        Some((_, rest)) => {
            let rest = rest.trim();
            let (subject, body) = rest.split_once('\n').unwrap_or((rest, ""));
            SplitEmail {
                subject: subject.trim().to_string(),
                body: body.trim().to_string(),
            }
        }
        None => SplitEmail {
            subject: NO_SUBJECT.to_string(),
            body: text.trim().to_string(),
        },
    }
}
