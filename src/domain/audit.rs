use serde::Serialize;

/// Outcome of one remux job as persisted in the audit log.
///
/// An empty `error` means the job succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub input_key: String,
    /// Epoch seconds at the time the record was built
    pub timestamp: i64,
    /// Milliseconds since the job started
    pub duration: u64,
    pub request_id: String,
    pub output_key: String,
    pub error: String,
}

impl AuditRecord {
    pub fn new(
        input_key: &str,
        duration: u64,
        request_id: &str,
        output_key: &str,
        error: &str,
    ) -> Self {
        Self {
            input_key: input_key.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            duration,
            request_id: request_id.to_string(),
            output_key: output_key.to_string(),
            error: error.to_string(),
        }
    }

    pub fn successful(&self) -> bool {
        self.error.is_empty()
    }
}

/// JSON shape written by line-oriented audit sinks.
#[derive(Serialize)]
pub(crate) struct AuditRow<'a> {
    #[serde(flatten)]
    pub record: &'a AuditRecord,
    pub successful: bool,
}

impl<'a> From<&'a AuditRecord> for AuditRow<'a> {
    fn from(record: &'a AuditRecord) -> Self {
        Self {
            record,
            successful: record.successful(),
        }
    }
}
