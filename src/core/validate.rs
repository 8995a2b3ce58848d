//! Purpose: Editor-side validation rules for menu items and stall settings.
//! Exports: Field validators, `validate_item`, `ValidationReport`, `ValidationIssue`, `format_price`.
//! Role: Guards the add/update/settings paths; the decoder deliberately does not call these.
//! Invariants: Character limits count Unicode scalar values.
//! Invariants: Messages are user-facing and stable; `field` names match the JSON document keys.
use crate::core::error::{Error, ErrorKind};
use crate::core::menu::{Category, MenuItem, Price, StallInfo, WaitTime};

pub const ITEM_NAME_MAX_LENGTH: usize = 50;
pub const DESCRIPTION_MAX_LENGTH: usize = 100;
pub const PRICE_MIN: f64 = 0.0;
pub const PRICE_MAX: f64 = 999_999.99;
pub const PRICE_DECIMALS: usize = 2;
pub const STALL_NAME_MAX_LENGTH: usize = 50;
pub const WAIT_TIME_MAX_LENGTH: usize = 20;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn into_error(self) -> Error {
        Error::new(ErrorKind::Invalid)
            .with_message(self.message)
            .with_field(self.field)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    fn check(&mut self, result: Result<(), ValidationIssue>) {
        if let Err(issue) = result {
            self.issues.push(issue);
        }
    }

    /// First issue becomes the error; the rest are folded into the hint.
    pub fn into_result(self) -> Result<(), Error> {
        let mut issues = self.issues.into_iter();
        let Some(first) = issues.next() else {
            return Ok(());
        };
        let rest = issues
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect::<Vec<_>>();
        let err = first.into_error();
        if rest.is_empty() {
            Err(err)
        } else {
            Err(err.with_hint(format!("Also: {}", rest.join("; "))))
        }
    }
}

pub fn validate_item_name(name: &str) -> Result<(), ValidationIssue> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationIssue::new("name", "Item name cannot be empty"));
    }
    if trimmed.chars().count() > ITEM_NAME_MAX_LENGTH {
        return Err(ValidationIssue::new(
            "name",
            format!("Item name must not exceed {ITEM_NAME_MAX_LENGTH} characters"),
        ));
    }
    Ok(())
}

/// Parses raw form input into a price and applies the bounds in one step.
pub fn parse_price(text: &str) -> Result<Price, ValidationIssue> {
    if text.trim().is_empty() {
        return Err(ValidationIssue::new("price", "Price is required"));
    }
    let price: Price = text
        .parse()
        .map_err(|_| ValidationIssue::new("price", "Price must be a valid number"))?;
    validate_price(&price)?;
    Ok(price)
}

pub fn validate_price(price: &Price) -> Result<(), ValidationIssue> {
    let value = price.as_f64();
    if !value.is_finite() {
        return Err(ValidationIssue::new("price", "Price must be a valid number"));
    }
    if value < PRICE_MIN {
        return Err(ValidationIssue::new("price", "Price must be positive"));
    }
    if value > PRICE_MAX {
        return Err(ValidationIssue::new(
            "price",
            format!("Price must not exceed {PRICE_MAX}"),
        ));
    }
    if decimal_places(value) > PRICE_DECIMALS {
        return Err(ValidationIssue::new(
            "price",
            format!("Price can have at most {PRICE_DECIMALS} decimal places"),
        ));
    }
    Ok(())
}

// Shortest round-trip rendering, so 0.1 + 0.2 counts as 17 places like a browser would.
fn decimal_places(value: f64) -> usize {
    let rendered = value.to_string();
    rendered
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0)
}

pub fn validate_description(description: &str) -> Result<(), ValidationIssue> {
    if description.chars().count() > DESCRIPTION_MAX_LENGTH {
        return Err(ValidationIssue::new(
            "description",
            format!("Description must not exceed {DESCRIPTION_MAX_LENGTH} characters"),
        ));
    }
    Ok(())
}

/// Strict counterpart of `Category::from_label`; an empty label means "use the default".
pub fn parse_category(label: &str) -> Result<Category, ValidationIssue> {
    if label.is_empty() {
        return Ok(Category::default());
    }
    Category::parse(label).ok_or_else(|| {
        let labels = Category::ALL
            .iter()
            .map(|category| category.as_str())
            .collect::<Vec<_>>();
        ValidationIssue::new(
            "category",
            format!("Category must be one of: {}", labels.join(", ")),
        )
    })
}

pub fn validate_stall_name(stall_name: &str) -> Result<(), ValidationIssue> {
    let trimmed = stall_name.trim();
    if trimmed.is_empty() {
        return Err(ValidationIssue::new("stallName", "Stall name is required"));
    }
    if trimmed.chars().count() > STALL_NAME_MAX_LENGTH {
        return Err(ValidationIssue::new(
            "stallName",
            format!("Stall name must not exceed {STALL_NAME_MAX_LENGTH} characters"),
        ));
    }
    Ok(())
}

pub fn validate_wait_time(wait_time: &WaitTime) -> Result<(), ValidationIssue> {
    match wait_time {
        WaitTime::Minutes(_) => Ok(()),
        WaitTime::Text(text) if text.chars().count() > WAIT_TIME_MAX_LENGTH => {
            Err(ValidationIssue::new(
                "waitTime",
                format!("Wait time must not exceed {WAIT_TIME_MAX_LENGTH} characters"),
            ))
        }
        WaitTime::Text(_) => Ok(()),
    }
}

pub fn validate_item(item: &MenuItem) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check(validate_item_name(&item.name));
    report.check(validate_price(&item.price));
    report.check(validate_description(&item.description));
    report
}

pub fn validate_stall(stall: &StallInfo) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check(validate_stall_name(&stall.stall_name));
    if let Some(wait_time) = &stall.wait_time {
        report.check(validate_wait_time(wait_time));
    }
    report
}

pub fn format_price(price: &Price) -> String {
    let value = price.as_f64();
    if !value.is_finite() {
        return "0.00".to_string();
    }
    format!("{:.*}", PRICE_DECIMALS, value)
}
