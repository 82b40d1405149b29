use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SkipReason;
use crate::period::{resolve_period, Period};

/// Which end of the six-digit filing-period code holds the month.
/// Chosen explicitly per batch; the code format is never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodConvention {
    /// "042024" — the portal's own export format.
    #[default]
    MonthFirst,
    /// "202404" or "2024-04".
    YearFirst,
}

/// One month's filing, parsed and period-resolved.
/// Immutable; discarded once its tables have been extracted.
#[derive(Debug, Clone)]
pub struct Filing {
    pub file_name: String,
    pub gstin: Option<String>,
    pub period: Period,
    pub document: Value,
}

impl Filing {
    /// Parse one uploaded export and resolve its filing period.
    pub fn parse(
        file_name: &str,
        bytes: &[u8],
        convention: PeriodConvention,
    ) -> Result<Filing, SkipReason> {
        let document: Value =
            serde_json::from_slice(bytes).map_err(|e| SkipReason::Unparseable(e.to_string()))?;
        if !document.is_object() {
            return Err(SkipReason::Unparseable(
                "top level is not a JSON object".to_string(),
            ));
        }
        let code = document
            .get("fp")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let period = resolve_period(code, convention)
            .ok_or_else(|| SkipReason::UnresolvedPeriod(code.to_string()))?;
        let gstin = document
            .get("gstin")
            .and_then(Value::as_str)
            .map(str::to_owned);
        Ok(Filing {
            file_name: file_name.to_string(),
            gstin,
            period,
            document,
        })
    }
}

/// One uploaded file left out of the consolidation, with the reason.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFiling {
    pub file_name: String,
    /// Machine tag: "unreadable", "unparseable" or "unresolved_period".
    pub reason: &'static str,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_resolves_period_and_gstin() {
        let bytes = br#"{"gstin": "27AAACC1234F1Z5", "fp": "042024", "b2b": []}"#;
        let filing = Filing::parse("apr.json", bytes, PeriodConvention::MonthFirst).unwrap();
        assert_eq!(filing.period.label(), "Apr 2024");
        assert_eq!(filing.gstin.as_deref(), Some("27AAACC1234F1Z5"));
        assert_eq!(filing.file_name, "apr.json");
    }

    #[test]
    fn bad_json_is_unparseable_not_unresolved() {
        let err = Filing::parse("x.json", b"{nope", PeriodConvention::MonthFirst).unwrap_err();
        assert_eq!(err.kind(), "unparseable");
        let err = Filing::parse("x.json", b"[1, 2]", PeriodConvention::MonthFirst).unwrap_err();
        assert_eq!(err.kind(), "unparseable");
    }

    #[test]
    fn missing_or_bad_period_code_is_unresolved() {
        let err = Filing::parse("x.json", br#"{"b2b": []}"#, PeriodConvention::MonthFirst)
            .unwrap_err();
        assert_eq!(err.kind(), "unresolved_period");
        let err = Filing::parse(
            "x.json",
            br#"{"fp": "132024"}"#,
            PeriodConvention::MonthFirst,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "unresolved_period");
    }
}
