//! Isolates the structured payload embedded in a reply and decodes it.
//!
//! Replies arrive either as a bare JSON document or with the document wrapped
//! in a `json`-tagged code fence:
//!
//! ````text
//! Here is the report:
//! ```json
//! { "cover_letter": { ... }, ... }
//! ```
//! ````
//!
//! [`Payload::locate`] classifies the reply into one of those two forms and
//! [`extract`] decodes the located payload strictly with `serde_json`.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::ExtractError;
use crate::report::MedicalReport;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Where the payload of a reply was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadForm {
    Fenced,
    Bare,
}

impl fmt::Display for PayloadForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadForm::Fenced => write!(f, "fenced"),
            PayloadForm::Bare => write!(f, "unfenced"),
        }
    }
}

/// Payload located inside a reply, borrowed from the reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    Fenced { inner: &'a str },
    Bare { text: &'a str },
}

impl<'a> Payload<'a> {
    /// Finds the first complete `json` fence in `raw`, falling back to the
    /// whole text when there is none.
    pub fn locate(raw: &'a str) -> Self {
        let mut search_from = 0;
        while let Some(offset) = raw[search_from..].find(FENCE_OPEN) {
            let tag_end = search_from + offset + FENCE_OPEN.len();
            if let Some(inner) = fenced_body(raw, tag_end) {
                return Payload::Fenced { inner };
            }
            search_from = tag_end;
        }
        Payload::Bare { text: raw }
    }

    pub fn form(&self) -> PayloadForm {
        match self {
            Payload::Fenced { .. } => PayloadForm::Fenced,
            Payload::Bare { .. } => PayloadForm::Bare,
        }
    }

    pub fn text(&self) -> &'a str {
        match *self {
            Payload::Fenced { inner } => inner,
            Payload::Bare { text } => text,
        }
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ExtractError> {
        serde_json::from_str(self.text()).map_err(|source| ExtractError::Decode {
            form: self.form(),
            source,
        })
    }
}

/// Body of a fence whose opening tag ends at `tag_end`.
///
/// The rest of the opening line must be blank and a closing marker must start
/// a later line; otherwise this is not a complete fence.
fn fenced_body(raw: &str, tag_end: usize) -> Option<&str> {
    let rest = &raw[tag_end..];
    let newline = rest.find('\n')?;
    if !rest[..newline].trim().is_empty() {
        return None;
    }
    let body_start = tag_end + newline + 1;
    let body = &raw[body_start..];

    if body.starts_with(FENCE_CLOSE) {
        return Some("");
    }
    let close = body.find(&format!("\n{FENCE_CLOSE}"))?;
    Some(body[..close].trim_end_matches('\r'))
}

/// Decodes the payload of `raw` into any structured record.
pub fn extract<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractError> {
    if raw.is_empty() {
        return Err(ExtractError::EmptyPayload);
    }
    Payload::locate(raw).decode()
}

/// Decodes the payload of `raw` into a [`MedicalReport`].
pub fn extract_report(raw: &str) -> Result<MedicalReport, ExtractError> {
    extract(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::SAMPLE_REPORT_JSON;

    fn fenced(body: &str) -> String {
        format!("Here is the report you asked for:\n```json\n{body}\n```\nLet me know if anything is missing.")
    }

    #[test]
    fn locates_fenced_payload() {
        let raw = "intro\n```json\n{\"a\": 1}\n```\noutro";
        assert_eq!(Payload::locate(raw), Payload::Fenced { inner: "{\"a\": 1}" });
    }

    #[test]
    fn falls_back_to_bare_text() {
        let raw = "{\"a\": 1}";
        assert_eq!(Payload::locate(raw), Payload::Bare { text: raw });
    }

    #[test]
    fn unclosed_fence_is_bare() {
        let raw = "```json\n{\"a\": 1}";
        assert_eq!(Payload::locate(raw).form(), PayloadForm::Bare);
    }

    #[test]
    fn other_language_tag_is_not_a_json_fence() {
        let raw = "```jsonc\n{\"a\": 1}\n```";
        assert_eq!(Payload::locate(raw).form(), PayloadForm::Bare);
    }

    #[test]
    fn first_complete_fence_wins() {
        let raw = "```json\n{\"a\": 1}\n```\nand\n```json\n{\"a\": 2}\n```";
        assert_eq!(Payload::locate(raw).text(), "{\"a\": 1}");
    }

    #[test]
    fn crlf_fences_are_recognised() {
        let raw = "```json\r\n{\"a\": 1}\r\n```\r\n";
        assert_eq!(Payload::locate(raw), Payload::Fenced { inner: "{\"a\": 1}" });
    }

    #[test]
    fn fenced_and_bare_forms_decode_equally() {
        let from_fence = extract_report(&fenced(SAMPLE_REPORT_JSON)).unwrap();
        let from_bare = extract_report(SAMPLE_REPORT_JSON).unwrap();
        assert_eq!(from_fence, from_bare);
    }

    #[test]
    fn bare_extraction_matches_direct_decode() {
        let direct: MedicalReport = serde_json::from_str(SAMPLE_REPORT_JSON).unwrap();
        assert_eq!(extract_report(SAMPLE_REPORT_JSON).unwrap(), direct);
    }

    #[test]
    fn empty_reply_is_empty_payload() {
        assert!(matches!(
            extract_report(""),
            Err(ExtractError::EmptyPayload)
        ));
    }

    #[test]
    fn malformed_bare_text_reports_unfenced_form() {
        let err = extract_report("I could not produce a report today.").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Decode {
                form: PayloadForm::Bare,
                ..
            }
        ));
        assert!(err.to_string().starts_with("unfenced payload"));
    }

    #[test]
    fn malformed_fenced_payload_reports_fenced_form() {
        let err = extract_report(&fenced("{\"cover_letter\": }")).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Decode {
                form: PayloadForm::Fenced,
                ..
            }
        ));
    }

    #[test]
    fn trailing_commas_are_rejected() {
        let err = extract::<serde_json::Value>("{\"a\": 1,}").unwrap_err();
        assert!(matches!(err, ExtractError::Decode { .. }));
    }

    #[test]
    fn comments_are_rejected() {
        let err = extract::<serde_json::Value>("{\"a\": 1 // one\n}").unwrap_err();
        assert!(matches!(err, ExtractError::Decode { .. }));
    }
}
