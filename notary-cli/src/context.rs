use chrono::{DateTime, Local};

/// Who asked for a calculation and when. Built once per request and passed
/// to the renderer and the audit log; the calculator never sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Caller identity recorded in the audit log (an email or user name).
    pub identity: String,
    /// Name printed on the report header, if any.
    pub preparer: Option<String>,
    pub requested_at: DateTime<Local>,
}

impl RequestContext {
    pub fn new(
        identity: impl Into<String>,
        preparer: Option<String>,
    ) -> Self {
        Self::at(identity, preparer, Local::now())
    }

    pub fn at(
        identity: impl Into<String>,
        preparer: Option<String>,
        requested_at: DateTime<Local>,
    ) -> Self {
        let preparer = preparer
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        Self {
            identity: identity.into(),
            preparer,
            requested_at,
        }
    }
}
