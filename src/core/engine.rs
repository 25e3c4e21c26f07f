use crate::core::{builder, parser};
use crate::core::parser::Discard;
use crate::domain::document::SalesOrderDocument;
use crate::domain::model::{CapturedRecord, Order, OrderDefaults, SubmissionResponse};
use crate::domain::ports::{Clock, CredentialPrompt, OrderSubmitter, RecordSource};
use crate::utils::error::{OrderEntryError, Result};

/// 已建構、尚未送出的訂單
#[derive(Debug, Clone)]
pub struct PreparedOrder {
    pub order: Order,
    pub document: SalesOrderDocument,
    pub discards: Vec<Discard>,
}

/// Drives one capture → build → authenticate → submit cycle.
pub struct OrderEntryEngine<S, T, P, C>
where
    S: RecordSource,
    T: OrderSubmitter,
    P: CredentialPrompt,
    C: Clock,
{
    source: S,
    submitter: T,
    prompt: P,
    clock: C,
    defaults: OrderDefaults,
    check_before_submit: bool,
}

impl<S, T, P, C> OrderEntryEngine<S, T, P, C>
where
    S: RecordSource,
    T: OrderSubmitter,
    P: CredentialPrompt,
    C: Clock,
{
    pub fn new(source: S, submitter: T, prompt: P, clock: C, defaults: OrderDefaults) -> Self {
        Self {
            source,
            submitter,
            prompt,
            clock,
            defaults,
            check_before_submit: true,
        }
    }

    pub fn with_connectivity_check(mut self, enabled: bool) -> Self {
        self.check_before_submit = enabled;
        self
    }

    pub fn submitter(&self) -> &T {
        &self.submitter
    }

    /// Capture one record and render it. Nothing leaves the process.
    pub async fn prepare(&self) -> Result<PreparedOrder> {
        tracing::info!("📥 Capturing order record...");
        let (order, discards) = match self.source.capture().await? {
            CapturedRecord::Scan(raw) => {
                let report = parser::parse_with_report(&raw)?;
                (report.order, report.discards)
            }
            CapturedRecord::Manual(form) => (form.into_order()?, Vec::new()),
        };

        for discard in &discards {
            tracing::warn!("⚠️ Ignored scan input: {:?}", discard);
        }
        tracing::info!(
            "🔄 Parsed order with {} item(s), BOL {:?}",
            order.items.len(),
            order.header.bol_number
        );

        let document = builder::build(&order, &self.defaults, &self.clock)?;
        Ok(PreparedOrder {
            order,
            document,
            discards,
        })
    }

    pub async fn run(&self) -> Result<SubmissionResponse> {
        let prepared = self.prepare().await?;
        self.submit(&prepared.document).await
    }

    /// Authenticate and send an already rendered document.
    pub async fn submit(&self, document: &SalesOrderDocument) -> Result<SubmissionResponse> {
        let credentials = self
            .prompt
            .request_credentials()?
            .ok_or(OrderEntryError::Cancelled)?;

        if self.check_before_submit {
            self.submitter.check_reachable().await?;
        }

        tracing::info!(
            "📤 Submitting {} row(s) to ERP (rid {})...",
            document.rows().len(),
            document.rid().unwrap_or("-")
        );
        let response = self.submitter.submit(document, &credentials).await?;
        tracing::info!(
            "✅ Order accepted ({}, HTTP {})",
            response.orchestrator_status,
            response.http_status
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::source::ScanTextSource;
    use crate::domain::manual_entry::{ManualEntryForm, ManualItem};
    use crate::domain::model::Credentials;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockSubmitter {
        reachable: bool,
        submitted: Mutex<Vec<(SalesOrderDocument, Credentials)>>,
        checks: AtomicUsize,
    }

    impl MockSubmitter {
        fn new(reachable: bool) -> Self {
            Self {
                reachable,
                submitted: Mutex::new(Vec::new()),
                checks: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl OrderSubmitter for MockSubmitter {
        async fn check_reachable(&self) -> Result<()> {
            self.checks.fetch_add(1, Ordering::SeqCst);
            if self.reachable {
                Ok(())
            } else {
                Err(OrderEntryError::TransportError {
                    message: "connection refused".to_string(),
                })
            }
        }

        async fn submit(
            &self,
            document: &SalesOrderDocument,
            credentials: &Credentials,
        ) -> Result<SubmissionResponse> {
            self.submitted
                .lock()
                .unwrap()
                .push((document.clone(), credentials.clone()));
            Ok(SubmissionResponse {
                http_status: 200,
                orchestrator_status: "SUCCESS".to_string(),
                body: serde_json::json!({ "jde__status": "SUCCESS" }),
            })
        }
    }

    struct MockPrompt(Option<Credentials>);

    impl CredentialPrompt for MockPrompt {
        fn request_credentials(&self) -> Result<Option<Credentials>> {
            Ok(self.0.clone())
        }
    }

    struct ClosedPrompt;

    impl CredentialPrompt for ClosedPrompt {
        fn request_credentials(&self) -> Result<Option<Credentials>> {
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed").into())
        }
    }

    struct ManualSource(ManualEntryForm);

    #[async_trait]
    impl RecordSource for ManualSource {
        async fn capture(&self) -> Result<CapturedRecord> {
            Ok(CapturedRecord::Manual(self.0.clone()))
        }
    }

    fn defaults() -> OrderDefaults {
        OrderDefaults {
            business_unit: "       53080".to_string(),
            order_type: "SA".to_string(),
            unit_of_measure: "EA".to_string(),
            unit_cost: serde_json::Number::from(500),
            address_number_1: "15212".to_string(),
            address_number_2: "15219".to_string(),
        }
    }

    fn clock() -> FixedClock {
        FixedClock::new(chrono::Utc.with_ymd_and_hms(2025, 3, 4, 8, 15, 0).unwrap())
    }

    fn operator() -> MockPrompt {
        MockPrompt(Some(Credentials::new("operator", "hunter2")))
    }

    #[tokio::test]
    async fn test_scan_is_parsed_built_and_submitted() {
        let engine = OrderEntryEngine::new(
            ScanTextSource::new("<B12345><T77><L2><PR1001><Q5><PN55-22><PR1002><Q1><PN55-23>"),
            MockSubmitter::new(true),
            operator(),
            clock(),
            defaults(),
        );

        let response = engine.run().await.unwrap();
        assert_eq!(response.orchestrator_status, "SUCCESS");
        assert_eq!(engine.submitter().checks.load(Ordering::SeqCst), 1);

        let submitted = engine.submitter().submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        let (document, credentials) = &submitted[0];
        assert_eq!(credentials.username, "operator");
        assert_eq!(document.rows().len(), 2);
        assert_eq!(document.rows()[0].item_number.value, "1001");
        assert_eq!(document.rows()[1].customer_po.value, "55-23");
    }

    #[tokio::test]
    async fn test_prepare_reports_discards() {
        let engine = OrderEntryEngine::new(
            ScanTextSource::new("<Q9><XYZ><PR1001><Q5>"),
            MockSubmitter::new(true),
            operator(),
            clock(),
            defaults(),
        );

        let prepared = engine.prepare().await.unwrap();
        assert_eq!(prepared.discards.len(), 2);
        assert_eq!(prepared.document.rows().len(), 1);
        assert!(engine.submitter().submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_valid_items_never_prompts_or_submits() {
        let engine = OrderEntryEngine::new(
            ScanTextSource::new("<PN9987><Q3><PR100>"),
            MockSubmitter::new(true),
            operator(),
            clock(),
            defaults(),
        );

        assert!(matches!(
            engine.run().await,
            Err(OrderEntryError::ValidationError { .. })
        ));
        assert_eq!(engine.submitter().checks.load(Ordering::SeqCst), 0);
        assert!(engine.submitter().submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsegmented_scan_is_format_error() {
        let engine = OrderEntryEngine::new(
            ScanTextSource::new("just some text"),
            MockSubmitter::new(true),
            operator(),
            clock(),
            defaults(),
        );

        assert!(matches!(
            engine.run().await,
            Err(OrderEntryError::FormatError { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancelled_prompt_stops_submission() {
        let engine = OrderEntryEngine::new(
            ScanTextSource::new("<PR1001><Q5>"),
            MockSubmitter::new(true),
            MockPrompt(None),
            clock(),
            defaults(),
        );

        assert!(matches!(engine.run().await, Err(OrderEntryError::Cancelled)));
        assert!(engine.submitter().submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_prompt_is_error_not_cancel() {
        let engine = OrderEntryEngine::new(
            ScanTextSource::new("<PR1001><Q5>"),
            MockSubmitter::new(true),
            ClosedPrompt,
            clock(),
            defaults(),
        );

        match engine.run().await {
            Err(e @ OrderEntryError::IoError(_)) => assert_ne!(e.exit_code(), 0),
            other => panic!("expected io error, got {:?}", other.map(|_| ())),
        }
        assert!(engine.submitter().submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_blocks_submit() {
        let engine = OrderEntryEngine::new(
            ScanTextSource::new("<PR1001><Q5>"),
            MockSubmitter::new(false),
            operator(),
            clock(),
            defaults(),
        );

        assert!(matches!(
            engine.run().await,
            Err(OrderEntryError::TransportError { .. })
        ));
        assert!(engine.submitter().submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connectivity_check_can_be_disabled() {
        let engine = OrderEntryEngine::new(
            ScanTextSource::new("<PR1001><Q5>"),
            MockSubmitter::new(false),
            operator(),
            clock(),
            defaults(),
        )
        .with_connectivity_check(false);

        engine.run().await.unwrap();
        assert_eq!(engine.submitter().checks.load(Ordering::SeqCst), 0);
        assert_eq!(engine.submitter().submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_manual_form_uses_same_builder() {
        let form = ManualEntryForm {
            bol_number: "B-77".to_string(),
            trailer_number: "TR9".to_string(),
            lines: Some(1),
            items: vec![ManualItem {
                item_number: "100".to_string(),
                quantity: Some(4),
                po_number: "9987".to_string(),
            }],
        };
        let scanned = OrderEntryEngine::new(
            ScanTextSource::new("<BB-77><TTR9><L1><PR100><Q4><PN9987>"),
            MockSubmitter::new(true),
            operator(),
            clock(),
            defaults(),
        )
        .prepare()
        .await
        .unwrap();
        let keyed = OrderEntryEngine::new(
            ManualSource(form),
            MockSubmitter::new(true),
            operator(),
            clock(),
            defaults(),
        )
        .prepare()
        .await
        .unwrap();

        assert_eq!(keyed.document.without_rid(), scanned.document.without_rid());
    }

    #[tokio::test]
    async fn test_invalid_manual_form_is_rejected() {
        let form = ManualEntryForm {
            bol_number: String::new(),
            trailer_number: String::new(),
            lines: Some(1),
            items: vec![ManualItem {
                item_number: String::new(),
                quantity: Some(0),
                po_number: String::new(),
            }],
        };
        let engine = OrderEntryEngine::new(
            ManualSource(form),
            MockSubmitter::new(true),
            operator(),
            clock(),
            defaults(),
        );

        match engine.prepare().await {
            Err(OrderEntryError::FormValidationError { errors }) => assert!(errors.len() >= 3),
            other => panic!("expected form validation error, got {:?}", other.map(|_| ())),
        }
    }
}
