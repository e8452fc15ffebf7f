//! # Consent Prompt
//!
//! Turns verified consent-token claims into the page a user sees: one
//! checkbox per consentable item, each labelled with its display message.
//! Submitting the form posts the decisions to `consents` (relative to the
//! prompt) and follows the returned callback URI.

use payee_consent_core::{build_consent_message, consent_record_id, ConsentMetadataRecord};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::token::ConsentClaims;

pub const PROMPT_TITLE: &str = "Consent request";

/// Keys the prompt sets on every record; engine-supplied values under
/// these names are dropped so each key serializes once.
const ENRICHED_KEYS: [&str; 5] = ["id", "message", "customAttributes", "subjectId", "applicationId"];

/// One consentable item, enriched for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    #[serde(flatten)]
    pub record: ConsentMetadataRecord,
    /// Concatenation of the item's identifying fields.
    pub id: String,
    pub message: String,
    pub custom_attributes: Option<Map<String, Value>>,
    pub subject_id: Option<String>,
    pub application_id: Option<String>,
}

/// Everything the consent prompt renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptView {
    pub title: String,
    pub consents: Vec<PromptRecord>,
    pub callback_uri: String,
    pub tpp_client_id: Option<String>,
}

impl PromptView {
    pub fn new(
        claims: ConsentClaims,
        callback_uri: String,
        custom: Option<Map<String, Value>>,
    ) -> Self {
        let consents = claims
            .metadata
            .default
            .into_iter()
            .map(|mut record| {
                for key in ENRICHED_KEYS {
                    record.extra.remove(key);
                }
                PromptRecord {
                    id: consent_record_id(&record),
                    message: build_consent_message(&record),
                    custom_attributes: custom.clone(),
                    subject_id: claims.uid.clone(),
                    application_id: claims.app_id.clone(),
                    record,
                }
            })
            .collect();

        Self {
            title: PROMPT_TITLE.to_string(),
            consents,
            callback_uri,
            tpp_client_id: claims.client_id,
        }
    }
}

/// Render the prompt as a standalone HTML page.
///
/// Every interpolated value passes through [`html_escape`]; each record is
/// also embedded as escaped JSON for the submit script.
pub fn render_html(view: &PromptView) -> Result<String, serde_json::Error> {
    let mut items = String::new();
    for consent in &view.consents {
        let payload = serde_json::to_string(consent)?;
        items.push_str(&format!(
            "      <li><label><input type=\"checkbox\" name=\"consent\" id=\"{id}\" data-consent=\"{payload}\" checked> {message}</label></li>\n",
            id = html_escape(&consent.id),
            payload = html_escape(&payload),
            message = html_escape(&consent.message),
        ));
    }

    let title = html_escape(&view.title);
    let mut page = String::with_capacity(1024 + items.len());
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("  <meta charset=\"utf-8\">\n");
    page.push_str(&format!("  <title>{title}</title>\n"));
    page.push_str("</head>\n<body>\n");
    page.push_str(&format!("  <h1>{title}</h1>\n"));
    page.push_str(&format!(
        "  <form id=\"consent-form\" data-callback-uri=\"{}\" data-tpp-client-id=\"{}\">\n",
        html_escape(&view.callback_uri),
        html_escape(view.tpp_client_id.as_deref().unwrap_or_default()),
    ));
    page.push_str("    <ul>\n");
    page.push_str(&items);
    page.push_str("    </ul>\n");
    page.push_str("    <button type=\"submit\">Submit</button>\n");
    page.push_str("  </form>\n");
    page.push_str(SUBMIT_SCRIPT);
    page.push_str("</body>\n</html>\n");
    Ok(page)
}

/// Posts every item with state 1 (allow) or 2 (deny), then follows the
/// callback URI the broker answers with.
const SUBMIT_SCRIPT: &str = r#"  <script>
    document.getElementById('consent-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const form = event.target;
      const consents = Array.from(form.querySelectorAll('input[name=consent]')).map((input) => {
        const record = JSON.parse(input.dataset.consent);
        return {
          purposeId: record.purposeId,
          attributeId: record.attributeId,
          attributeValue: record.attributeValue,
          accessTypeId: record.accessTypeId,
          subjectId: record.subjectId,
          applicationId: record.applicationId,
          customAttributes: record.customAttributes,
          state: input.checked ? 1 : 2,
        };
      });
      const response = await fetch('consents', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({
          tppClientId: form.dataset.tppClientId,
          callbackUri: form.dataset.callbackUri,
          consents,
        }),
      });
      const body = await response.json();
      window.location.assign(body.callbackUri);
    });
  </script>
"#;

/// Escape text for HTML element content and double- or single-quoted attributes.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
