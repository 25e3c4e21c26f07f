use crate::domain::document::SalesOrderDocument;
use crate::domain::model::{CapturedRecord, Credentials, SubmissionResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of "now" for the document builder, so renders are reproducible under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Supplies one raw scan or one manually keyed form per run.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn capture(&self) -> Result<CapturedRecord>;
}

/// Asks the operator for credentials. `Ok(None)` means the operator cancelled;
/// an error means no answer could be read at all.
pub trait CredentialPrompt: Send + Sync {
    fn request_credentials(&self) -> Result<Option<Credentials>>;
}

#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Fails with a transport error when the server cannot be reached at all.
    async fn check_reachable(&self) -> Result<()>;

    async fn submit(
        &self,
        document: &SalesOrderDocument,
        credentials: &Credentials,
    ) -> Result<SubmissionResponse>;
}
