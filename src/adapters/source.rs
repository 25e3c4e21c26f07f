use crate::domain::manual_entry::ManualEntryForm;
use crate::domain::model::CapturedRecord;
use crate::domain::ports::RecordSource;
use crate::utils::error::{OrderEntryError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// A scan already in hand, e.g. passed on the command line.
#[derive(Debug, Clone)]
pub struct ScanTextSource {
    raw: String,
}

impl ScanTextSource {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

#[async_trait]
impl RecordSource for ScanTextSource {
    async fn capture(&self) -> Result<CapturedRecord> {
        Ok(CapturedRecord::Scan(self.raw.trim().to_string()))
    }
}

/// Reads one scan from standard input. Wedge scanners type the label followed by Enter.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinScanSource;

#[async_trait]
impl RecordSource for StdinScanSource {
    async fn capture(&self) -> Result<CapturedRecord> {
        let raw = read_scan(tokio::io::stdin()).await?;
        Ok(CapturedRecord::Scan(raw))
    }
}

/// One Enter-terminated line; the stream may stay open afterwards.
pub async fn read_scan<R: AsyncRead + Unpin>(reader: R) -> Result<String> {
    let mut raw = String::new();
    BufReader::new(reader).read_line(&mut raw).await?;
    Ok(raw.trim().to_string())
}

/// Manual-entry form stored as TOML.
#[derive(Debug, Clone)]
pub struct ManualFormSource {
    path: PathBuf,
}

impl ManualFormSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for ManualFormSource {
    async fn capture(&self) -> Result<CapturedRecord> {
        tracing::debug!("📝 Loading manual entry form from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(OrderEntryError::IoError)?;
        let mut form = ManualEntryForm::from_toml_str(&content)?;

        // The declared line count sizes the item list, as on the entry screen.
        if let Some(lines) = form.lines.filter(|lines| *lines >= 1) {
            if form.items.len() as i64 > lines {
                tracing::warn!(
                    "⚠️ Form lists {} item(s) but declares {} line(s); extra items are removed",
                    form.items.len(),
                    lines
                );
            }
            form.adjust_to_lines(lines);
        }

        Ok(CapturedRecord::Manual(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_scan_text_source_trims() {
        let source = ScanTextSource::new("  <PR1><Q2>\n");
        assert_eq!(
            source.capture().await.unwrap(),
            CapturedRecord::Scan("<PR1><Q2>".to_string())
        );
    }

    #[tokio::test]
    async fn test_read_scan_from_reader() {
        let input: &[u8] = b"<B1><PR2><Q3>\r\n";
        assert_eq!(read_scan(input).await.unwrap(), "<B1><PR2><Q3>");
    }

    #[tokio::test]
    async fn test_read_scan_returns_at_end_of_line() {
        use tokio::io::AsyncWriteExt;

        let (mut scanner, terminal) = tokio::io::duplex(64);
        scanner.write_all(b"<PR1001><Q5>\n<PR2002>").await.unwrap();

        let raw = tokio::time::timeout(std::time::Duration::from_secs(2), read_scan(terminal))
            .await
            .expect("read_scan should not wait for end of stream")
            .unwrap();

        assert_eq!(raw, "<PR1001><Q5>");
        drop(scanner);
    }

    #[tokio::test]
    async fn test_manual_form_source() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
bol_number = "1001"
trailer_number = "55"
lines = 1

[[items]]
item_number = "100"
quantity = 3
po_number = "9987"
"#,
            )
            .unwrap();

        let source = ManualFormSource::new(temp_file.path());
        match source.capture().await.unwrap() {
            CapturedRecord::Manual(form) => {
                assert_eq!(form.bol_number, "1001");
                assert_eq!(form.items[0].quantity, Some(3));
            }
            other => panic!("expected manual form, got {:?}", other),
        }
    }

    async fn capture_form(content: &str) -> ManualEntryForm {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        match ManualFormSource::new(temp_file.path()).capture().await.unwrap() {
            CapturedRecord::Manual(form) => form,
            other => panic!("expected manual form, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_manual_form_grows_to_declared_lines() {
        let form = capture_form(
            r#"
bol_number = "1001"
trailer_number = "55"
lines = 2

[[items]]
item_number = "100"
quantity = 3
po_number = "9987"
"#,
        )
        .await;

        assert_eq!(form.items.len(), 2);
        match form.into_order() {
            Err(OrderEntryError::FormValidationError { errors }) => {
                assert!(errors.contains(&"Item 2: Item Number is required".to_string()));
            }
            other => panic!("expected form validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_manual_form_shrinks_to_declared_lines() {
        let form = capture_form(
            r#"
bol_number = "1001"
trailer_number = "55"
lines = 1

[[items]]
item_number = "100"
quantity = 3
po_number = "9987"

[[items]]
item_number = "200"
quantity = 1
po_number = "9988"
"#,
        )
        .await;

        let order = form.into_order().unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].item_number.as_deref(), Some("100"));
    }

    #[tokio::test]
    async fn test_manual_form_without_lines_is_left_for_validation() {
        let form = capture_form(
            r#"
bol_number = "1001"
trailer_number = "55"
lines = 0
"#,
        )
        .await;

        assert!(form.items.is_empty());
        assert_eq!(form.lines, Some(0));
    }

    #[tokio::test]
    async fn test_manual_form_source_missing_file() {
        let source = ManualFormSource::new("/definitely/not/here.toml");
        assert!(matches!(
            source.capture().await,
            Err(OrderEntryError::IoError(_))
        ));
    }
}
