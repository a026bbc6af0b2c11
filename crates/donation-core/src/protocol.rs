//! Messages exchanged between the flow and its host
//!
//! Requests and responses serialize to the tagged JSON shapes hosts already
//! speak: requests carry a kebab-case `type`, responses a `type` of the
//! `Payload*` family with an optional `value`.

use crate::i18n::Translatable;
use serde::{Deserialize, Serialize};

/// Page header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub title: Translatable,
}

/// Page footer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    /// Progress percentage, 0-100
    pub progress: u8,
}

/// A table shown on the consent form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentTable {
    pub id: String,
    pub title: Translatable,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Body of a donation page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PromptBody {
    /// Ask for a single file
    FileInput {
        description: Translatable,
        accepted_types: String,
    },
    /// Ask a yes/no question
    Confirm {
        text: Translatable,
        ok: Translatable,
        cancel: Translatable,
    },
    /// Show extracted data and ask for consent
    ConsentForm {
        tables: Vec<ConsentTable>,
        meta_tables: Vec<ConsentTable>,
    },
}

/// Something the host must display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiRequest {
    DonationPage {
        platform: String,
        header: Header,
        body: PromptBody,
        footer: Footer,
    },
    EndPage,
}

/// Which step of the flow a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    FilePrompt,
    RetryPrompt,
    ConsentPrompt,
    EndPage,
}

impl UiRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            UiRequest::DonationPage { body, .. } => match body {
                PromptBody::FileInput { .. } => RequestKind::FilePrompt,
                PromptBody::Confirm { .. } => RequestKind::RetryPrompt,
                PromptBody::ConsentForm { .. } => RequestKind::ConsentPrompt,
            },
            UiRequest::EndPage => RequestKind::EndPage,
        }
    }

    /// Footer progress, absent on the end page
    pub fn progress(&self) -> Option<u8> {
        match self {
            UiRequest::DonationPage { footer, .. } => Some(footer.progress),
            UiRequest::EndPage => None,
        }
    }

    pub fn body(&self) -> Option<&PromptBody> {
        match self {
            UiRequest::DonationPage { body, .. } => Some(body),
            UiRequest::EndPage => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UiRequest::EndPage)
    }
}

/// The participant's answer to one request.
///
/// The flow looks at the variant only. Decoding goes by the `type` tag
/// alone: `value` is ignored on tags that carry no data, and any tag the
/// flow does not know becomes [`UiResponse::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum UiResponse {
    /// A file was chosen; the value locates it
    #[serde(rename = "PayloadString")]
    FileSubmitted(String),
    /// Confirm prompt answered with "ok"
    #[serde(rename = "PayloadTrue")]
    Accepted,
    /// Confirm prompt answered with "cancel", or consent declined
    #[serde(rename = "PayloadFalse")]
    Declined,
    /// Consent given; the value is the data to donate
    #[serde(rename = "PayloadJSON")]
    ConsentGiven(String),
    /// Skip pressed
    #[serde(rename = "PayloadVoid")]
    Skipped,
    Unrecognized,
}

/// Response as it arrives, before the tag is interpreted
#[derive(Deserialize)]
struct RawResponse {
    #[serde(rename = "type")]
    tag: String,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

impl From<RawResponse> for UiResponse {
    fn from(raw: RawResponse) -> Self {
        match raw.tag.as_str() {
            "PayloadTrue" => UiResponse::Accepted,
            "PayloadFalse" => UiResponse::Declined,
            "PayloadVoid" => UiResponse::Skipped,
            "PayloadString" => match value_text(raw.value) {
                Some(location) => UiResponse::FileSubmitted(location),
                None => UiResponse::Unrecognized,
            },
            "PayloadJSON" => match value_text(raw.value) {
                Some(payload) => UiResponse::ConsentGiven(payload),
                None => UiResponse::Unrecognized,
            },
            _ => UiResponse::Unrecognized,
        }
    }
}

/// A string value as is, any other JSON value re-encoded; nothing for null
fn value_text(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

impl<'de> Deserialize<'de> for UiResponse {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawResponse::deserialize(deserializer).map(UiResponse::from)
    }
}

impl UiResponse {
    /// Answer to a confirm prompt
    pub fn confirm(ok: bool) -> Self {
        if ok {
            UiResponse::Accepted
        } else {
            UiResponse::Declined
        }
    }

    /// Wire tag of this response
    pub fn tag(&self) -> &'static str {
        match self {
            UiResponse::FileSubmitted(_) => "PayloadString",
            UiResponse::Accepted => "PayloadTrue",
            UiResponse::Declined => "PayloadFalse",
            UiResponse::ConsentGiven(_) => "PayloadJSON",
            UiResponse::Skipped => "PayloadVoid",
            UiResponse::Unrecognized => "Unrecognized",
        }
    }
}

/// Hand-off of consented data to the host's storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationCommand {
    pub key: String,
    pub payload: String,
}

impl DonationCommand {
    pub fn new(participant_id: &str, platform: &str, payload: impl Into<String>) -> Self {
        Self {
            key: donation_key(participant_id, platform),
            payload: payload.into(),
        }
    }
}

/// Storage key of a donation: `{participant_id}-{platform}`
pub fn donation_key(participant_id: &str, platform: &str) -> String {
    format!("{}-{}", participant_id, platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_wire_tags() {
        let file: UiResponse =
            serde_json::from_str(r#"{"type":"PayloadString","value":"/tmp/x.zip"}"#).unwrap();
        assert_eq!(file, UiResponse::FileSubmitted("/tmp/x.zip".to_string()));

        let yes: UiResponse = serde_json::from_str(r#"{"type":"PayloadTrue"}"#).unwrap();
        assert_eq!(yes, UiResponse::confirm(true));

        let no: UiResponse = serde_json::from_str(r#"{"type":"PayloadFalse"}"#).unwrap();
        assert_eq!(no, UiResponse::confirm(false));

        let skip: UiResponse = serde_json::from_str(r#"{"type":"PayloadVoid"}"#).unwrap();
        assert_eq!(skip, UiResponse::Skipped);
    }

    #[test]
    fn test_unknown_tag_is_unrecognized() {
        for json in [
            r#"{"type":"PayloadFile"}"#,
            r#"{"type":"PayloadFile","value":"x"}"#,
            r#"{"type":"PayloadInt","value":3}"#,
            r#"{"type":"Unrecognized"}"#,
        ] {
            let response: UiResponse = serde_json::from_str(json).unwrap();
            assert_eq!(response, UiResponse::Unrecognized, "{}", json);
        }
    }

    #[test]
    fn test_value_ignored_on_unit_tags() {
        let yes: UiResponse =
            serde_json::from_str(r#"{"type":"PayloadTrue","value":true}"#).unwrap();
        assert_eq!(yes, UiResponse::Accepted);

        let no: UiResponse =
            serde_json::from_str(r#"{"type":"PayloadFalse","value":false}"#).unwrap();
        assert_eq!(no, UiResponse::Declined);

        let skip: UiResponse =
            serde_json::from_str(r#"{"type":"PayloadVoid","value":null}"#).unwrap();
        assert_eq!(skip, UiResponse::Skipped);
    }

    #[test]
    fn test_non_string_consent_value_is_reencoded() {
        let consent: UiResponse =
            serde_json::from_str(r#"{"type":"PayloadJSON","value":{"a":[1,2]}}"#).unwrap();
        assert_eq!(consent, UiResponse::ConsentGiven(r#"{"a":[1,2]}"#.to_string()));

        let file: UiResponse =
            serde_json::from_str(r#"{"type":"PayloadString","value":42}"#).unwrap();
        assert_eq!(file, UiResponse::FileSubmitted("42".to_string()));
    }

    #[test]
    fn test_missing_value_fails_closed() {
        for json in [
            r#"{"type":"PayloadJSON"}"#,
            r#"{"type":"PayloadJSON","value":null}"#,
            r#"{"type":"PayloadString"}"#,
        ] {
            let response: UiResponse = serde_json::from_str(json).unwrap();
            assert_eq!(response, UiResponse::Unrecognized, "{}", json);
        }
    }

    #[test]
    fn test_responses_survive_encoding() {
        for response in [
            UiResponse::FileSubmitted("/tmp/export.zip".into()),
            UiResponse::Accepted,
            UiResponse::Declined,
            UiResponse::ConsentGiven(r#"{"zip_contents":[]}"#.into()),
            UiResponse::Skipped,
            UiResponse::Unrecognized,
        ] {
            let json = serde_json::to_string(&response).unwrap();
            let decoded: UiResponse = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, response);
        }
    }

    #[test]
    fn test_response_without_tag_is_an_error() {
        assert!(serde_json::from_str::<UiResponse>(r#"{"value":"x"}"#).is_err());
        assert!(serde_json::from_str::<UiResponse>(r#""PayloadTrue""#).is_err());
    }

    #[test]
    fn test_consent_value_is_opaque() {
        let json = serde_json::to_string(&UiResponse::ConsentGiven("[1,2]".into())).unwrap();
        assert_eq!(json, r#"{"type":"PayloadJSON","value":"[1,2]"}"#);
        assert_eq!(UiResponse::ConsentGiven(String::new()).tag(), "PayloadJSON");
    }

    #[test]
    fn test_end_page_wire_shape() {
        let json = serde_json::to_value(&UiRequest::EndPage).unwrap();
        assert_eq!(json, serde_json::json!({"type": "end-page"}));
        assert!(UiRequest::EndPage.is_terminal());
        assert_eq!(UiRequest::EndPage.progress(), None);
    }

    #[test]
    fn test_donation_key() {
        let command = DonationCommand::new("p1", "Twitter", "{}");
        assert_eq!(command.key, "p1-Twitter");
        assert_eq!(command.payload, "{}");
    }
}
