// crates/survey-dash-service/tests/common/mod.rs
// ============================================================================
// Module: Service Test Support
// Description: In-memory form source and recording audit sink.
// Purpose: Drive the dashboard service without a network.
// Dependencies: survey-dash-core, survey-dash-source
// ============================================================================

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;
use serde_json::json;
use survey_dash_core::FormId;
use survey_dash_core::FormSource;
use survey_dash_core::PageRequest;
use survey_dash_core::RawForm;
use survey_dash_core::RawSubmission;
use survey_dash_core::RemoteError;
use survey_dash_core::SubmissionPage;
use survey_dash_source::AuditSink;
use survey_dash_source::FetchAuditEvent;
use survey_dash_source::ServiceAuditEvent;

// ============================================================================
// SECTION: Fake Source
// ============================================================================

/// In-memory platform with per-form failure injection.
#[derive(Default)]
pub struct FakeSource {
    /// Forms in platform order.
    pub forms: Vec<RawForm>,
    /// Submissions keyed by form identifier.
    pub submissions: BTreeMap<String, Vec<RawSubmission>>,
    /// Errors returned by submission fetches, keyed by form identifier.
    pub failing: BTreeMap<String, RemoteError>,
    /// Calls observed, as `"<method>:<form>"`.
    pub calls: Mutex<Vec<String>>,
}

impl FakeSource {
    /// Adds a form with the given submission payloads.
    pub fn with_form(mut self, id: &str, title: &str, payloads: Vec<Value>) -> Self {
        self.forms.push(raw_form(id, title));
        let submissions = payloads
            .into_iter()
            .enumerate()
            .map(|(index, payload)| raw_submission(id, index, payload))
            .collect();
        self.submissions.insert(id.to_string(), submissions);
        self
    }

    /// Makes submission fetches for `id` fail with `error`.
    pub fn failing(mut self, id: &str, error: RemoteError) -> Self {
        self.failing.insert(id.to_string(), error);
        self
    }

    /// Returns the calls observed so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl FormSource for FakeSource {
    fn fetch_forms(&self) -> Result<Vec<RawForm>, RemoteError> {
        self.log("forms".to_string());
        Ok(self.forms.clone())
    }

    fn fetch_form(&self, form_id: &FormId) -> Result<RawForm, RemoteError> {
        self.log(format!("form:{form_id}"));
        self.forms.iter().find(|form| form.id.as_deref() == Some(form_id.as_str())).cloned().ok_or(
            RemoteError::Status {
                status: 404,
                status_text: "Not Found".to_string(),
            },
        )
    }

    fn fetch_submissions_page(
        &self,
        form_id: &FormId,
        page: &PageRequest,
    ) -> Result<SubmissionPage, RemoteError> {
        self.log(format!("submissions:{form_id}"));
        if let Some(error) = self.failing.get(form_id.as_str()) {
            return Err(error.clone());
        }
        let all = self.submissions.get(form_id.as_str()).cloned().unwrap_or_default();
        let offset: usize = page.cursor.as_deref().map_or(0, |cursor| cursor.parse().unwrap());
        let items: Vec<RawSubmission> = all.iter().skip(offset).take(page.limit).cloned().collect();
        let next = offset + items.len();
        Ok(SubmissionPage {
            next_token: (next < all.len()).then(|| next.to_string()),
            items,
        })
    }

    fn page_size(&self) -> usize {
        2
    }
}

/// Builds an open raw form.
pub fn raw_form(id: &str, title: &str) -> RawForm {
    serde_json::from_value(json!({
        "xmlFormId": id,
        "title": title,
        "state": "open",
        "createdAt": "2024-01-01T08:00:00Z",
        "submissions": 3
    }))
    .unwrap()
}

/// Builds a raw submission; `submittedAt` is taken from the payload when set.
pub fn raw_submission(form_id: &str, index: usize, payload: Value) -> RawSubmission {
    let created_at = payload
        .get("submittedAt")
        .and_then(Value::as_str)
        .unwrap_or("2024-01-10T12:00:00Z")
        .to_string();
    let mut data = payload;
    if let Some(map) = data.as_object_mut() {
        map.remove("submittedAt");
    }
    serde_json::from_value(json!({
        "instanceId": format!("uuid:{form_id}-{index}"),
        "submitterId": 7,
        "createdAt": created_at,
        "formId": form_id,
        "data": data
    }))
    .unwrap()
}

// ============================================================================
// SECTION: Audit Capture
// ============================================================================

/// Audit sink that keeps service events in memory.
#[derive(Default)]
pub struct RecordingSink {
    /// Service events in arrival order.
    pub services: Mutex<Vec<ServiceAuditEvent>>,
}

impl AuditSink for RecordingSink {
    fn record_fetch(&self, _event: &FetchAuditEvent) {}

    fn record_service(&self, event: &ServiceAuditEvent) {
        self.services.lock().unwrap().push(event.clone());
    }
}
