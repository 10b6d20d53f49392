#![forbid(unsafe_code)]

//! Sample data types for bound properties.
//!
//! Enough to exercise parse failures and constraint violations from tests
//! and benches.

use std::sync::Arc;

use formwalk_core::{ConstraintError, DataType, ParseError, Value};

// ---------------------------------------------------------------------------
// IntegerType
// ---------------------------------------------------------------------------

/// Whole numbers with optional bounds. Blank input parses to `Null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerType {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntegerType {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn between(min: i64, max: i64) -> Arc<Self> {
        Arc::new(Self {
            min: Some(min),
            max: Some(max),
        })
    }
}

impl DataType for IntegerType {
    fn name(&self) -> &str {
        "Integer"
    }

    fn parse_value(&self, external: &Value) -> Result<Value, ParseError> {
        match external {
            v if v.is_blank() => Ok(Value::Null),
            Value::Int(i) => Ok(Value::Int(*i)),
            other => {
                let text = other.to_string();
                text.trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| ParseError::new(format!("\"{text}\" is not a whole number")))
            }
        }
    }

    fn validate_value(&self, internal: &Value) -> Result<(), ConstraintError> {
        let Value::Int(n) = internal else {
            return Ok(());
        };
        if let Some(min) = self.min.filter(|min| n < min) {
            return Err(
                ConstraintError::new(format!("Enter a number of at least {min}"))
                    .with_violated("minimum"),
            );
        }
        if let Some(max) = self.max.filter(|max| n > max) {
            return Err(
                ConstraintError::new(format!("Enter a number of at most {max}"))
                    .with_violated("maximum"),
            );
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DateType
// ---------------------------------------------------------------------------

/// Calendar dates written as `YYYY-MM-DD`. Blank input parses to `Null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateType;

impl DateType {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        _ => 0,
    }
}

fn parse_date(text: &str) -> Option<(u32, u32, u32)> {
    let mut parts = text.split('-');
    let (y, m, d) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || y.len() != 4 || m.len() != 2 || d.len() != 2 {
        return None;
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !(all_digits(y) && all_digits(m) && all_digits(d)) {
        return None;
    }
    let (year, month, day) = (y.parse().ok()?, m.parse().ok()?, d.parse().ok()?);
    (day >= 1 && day <= days_in_month(year, month)).then_some((year, month, day))
}

impl DataType for DateType {
    fn name(&self) -> &str {
        "Date"
    }

    fn parse_value(&self, external: &Value) -> Result<Value, ParseError> {
        if external.is_blank() {
            return Ok(Value::Null);
        }
        let text = external.to_string();
        match parse_date(text.trim()) {
            Some((y, m, d)) => Ok(Value::Text(format!("{y:04}-{m:02}-{d:02}"))),
            None => Err(ParseError::new(format!(
                "\"{text}\" is not a valid date (expected YYYY-MM-DD)"
            ))),
        }
    }

    fn validate_value(&self, _internal: &Value) -> Result<(), ConstraintError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StringType
// ---------------------------------------------------------------------------

/// Text with optional length bounds, counted in characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl StringType {
    #[must_use]
    pub fn max_length(max: usize) -> Arc<Self> {
        Arc::new(Self {
            min_length: None,
            max_length: Some(max),
        })
    }

    #[must_use]
    pub fn length_between(min: usize, max: usize) -> Arc<Self> {
        Arc::new(Self {
            min_length: Some(min),
            max_length: Some(max),
        })
    }
}

impl DataType for StringType {
    fn name(&self) -> &str {
        "String"
    }

    fn parse_value(&self, external: &Value) -> Result<Value, ParseError> {
        Ok(Value::Text(external.to_string()))
    }

    fn validate_value(&self, internal: &Value) -> Result<(), ConstraintError> {
        let len = internal.to_string().chars().count();
        if let Some(min) = self.min_length.filter(|&min| len < min) {
            return Err(
                ConstraintError::new(format!("Enter at least {min} characters"))
                    .with_violated("minLength"),
            );
        }
        if let Some(max) = self.max_length.filter(|&max| len > max) {
            return Err(
                ConstraintError::new(format!("Enter at most {max} characters"))
                    .with_violated("maxLength"),
            );
        }
        Ok(())
    }
}
