use crate::domain::model::{LineItem, Order, OrderHeader};
use crate::utils::error::{OrderEntryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Order keyed in by hand instead of scanned, loaded from a TOML form file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManualEntryForm {
    #[serde(default)]
    pub bol_number: String,
    #[serde(default)]
    pub trailer_number: String,
    pub lines: Option<i64>,
    #[serde(default)]
    pub items: Vec<ManualItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManualItem {
    #[serde(default)]
    pub item_number: String,
    pub quantity: Option<i64>,
    #[serde(default)]
    pub po_number: String,
}

impl ManualEntryForm {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OrderEntryError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| OrderEntryError::FormValidationError {
            errors: vec![format!("Form file could not be read: {}", e)],
        })
    }

    /// Every problem with the form, in field order. Empty means the form can be submitted.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.bol_number.trim().is_empty() {
            errors.push("BOL Number is required".to_string());
        }
        if self.trailer_number.trim().is_empty() {
            errors.push("Trailer Number is required".to_string());
        }
        if self.lines.map_or(true, |lines| lines < 1) {
            errors.push("Number of lines must be at least 1".to_string());
        }

        for (index, item) in self.items.iter().enumerate() {
            let number = index + 1;
            if item.item_number.trim().is_empty() {
                errors.push(format!("Item {}: Item Number is required", number));
            }
            if item.quantity.map_or(true, |quantity| quantity < 1) {
                errors.push(format!("Item {}: Quantity must be at least 1", number));
            }
            if item.po_number.trim().is_empty() {
                errors.push(format!("Item {}: PO Number is required", number));
            }
        }

        errors
    }

    pub fn validate(&self) -> Result<()> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(OrderEntryError::FormValidationError { errors })
        }
    }

    /// Grow or shrink the item list to `lines` entries. Blank items are appended,
    /// surplus items are removed from the end, and anything below 1 counts as 1.
    pub fn adjust_to_lines(&mut self, lines: i64) {
        let desired = usize::try_from(lines.max(1)).unwrap_or(1);
        self.items.resize_with(desired, ManualItem::default);
        self.lines = Some(desired as i64);
    }

    /// Validated conversion into the same [`Order`] shape the scan parser produces.
    pub fn into_order(self) -> Result<Order> {
        self.validate()?;

        let items = self
            .items
            .into_iter()
            .map(|item| LineItem {
                item_number: Some(item.item_number),
                quantity: item.quantity,
                po_number: Some(item.po_number),
            })
            .collect();

        Ok(Order {
            header: OrderHeader {
                bol_number: Some(self.bol_number),
                trailer_number: Some(self.trailer_number),
                declared_line_count: self.lines,
            },
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ManualEntryForm {
        ManualEntryForm {
            bol_number: "1001".to_string(),
            trailer_number: "55".to_string(),
            lines: Some(1),
            items: vec![ManualItem {
                item_number: "100".to_string(),
                quantity: Some(3),
                po_number: "9987".to_string(),
            }],
        }
    }

    #[test]
    fn test_parse_form_toml() {
        let content = r#"
bol_number = "1001"
trailer_number = "55"
lines = 2

[[items]]
item_number = "100"
quantity = 3
po_number = "9987"

[[items]]
item_number = "200"
quantity = 1
po_number = "9988"
"#;

        let form = ManualEntryForm::from_toml_str(content).unwrap();
        assert_eq!(form.lines, Some(2));
        assert_eq!(form.items.len(), 2);
        assert_eq!(form.items[1].item_number, "200");
        assert!(form.validation_errors().is_empty());
    }

    #[test]
    fn test_validation_collects_every_problem() {
        let form = ManualEntryForm {
            bol_number: String::new(),
            trailer_number: "55".to_string(),
            lines: Some(0),
            items: vec![
                ManualItem::default(),
                ManualItem {
                    item_number: "200".to_string(),
                    quantity: Some(2),
                    po_number: "1".to_string(),
                },
            ],
        };

        assert_eq!(
            form.validation_errors(),
            vec![
                "BOL Number is required",
                "Number of lines must be at least 1",
                "Item 1: Item Number is required",
                "Item 1: Quantity must be at least 1",
                "Item 1: PO Number is required",
            ]
        );
    }

    #[test]
    fn test_into_order_keeps_item_order() {
        let mut form = filled_form();
        form.items.push(ManualItem {
            item_number: "200".to_string(),
            quantity: Some(7),
            po_number: "PO-2".to_string(),
        });
        form.lines = Some(2);

        let order = form.into_order().unwrap();
        assert_eq!(order.header.bol_number.as_deref(), Some("1001"));
        assert_eq!(order.header.declared_line_count, Some(2));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].item_number.as_deref(), Some("200"));
        assert_eq!(order.items[1].quantity, Some(7));
    }

    #[test]
    fn test_into_order_rejects_invalid_form() {
        let mut form = filled_form();
        form.items[0].quantity = None;

        match form.into_order() {
            Err(OrderEntryError::FormValidationError { errors }) => {
                assert_eq!(errors, vec!["Item 1: Quantity must be at least 1"]);
            }
            other => panic!("expected form validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_adjust_to_lines() {
        let mut form = filled_form();

        form.adjust_to_lines(3);
        assert_eq!(form.items.len(), 3);
        assert_eq!(form.items[0].item_number, "100");
        assert_eq!(form.items[2], ManualItem::default());

        form.adjust_to_lines(0);
        assert_eq!(form.items.len(), 1);
        assert_eq!(form.lines, Some(1));
        assert_eq!(form.items[0].item_number, "100");
    }

    #[test]
    fn test_unknown_form_keys_rejected() {
        let content = r#"
bol_number = "1"
password = "nope"
"#;
        assert!(ManualEntryForm::from_toml_str(content).is_err());
    }
}
