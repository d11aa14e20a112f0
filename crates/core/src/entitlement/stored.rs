//! Persisted shapes of entitlement tables.
//!
//! `leave_defaults.table_json` exists in two shapes:
//!
//! - legacy: a plain `{"1": 14, ..., "50": 14}` year map, with the carry
//!   policy taken from the `yearly_reset` column;
//! - versioned: `{"years": {...}, "_meta": {"carry_policy": "reset" | "bring",
//!   "carry_limit_enabled": bool, "carry_limit": number}}`.
//!
//! Both are read; only the versioned shape is written.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

use super::error::EntitlementError;
use super::service_year::ServiceYear;
use super::table::{CarryPolicy, CarryRule, EntitlementTable, YearTable};

const YEARS_KEY: &str = "years";
const META_KEY: &str = "_meta";

/// A `leave_defaults` row as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLeaveDefault {
    /// Leave type name.
    pub leave_type: String,
    /// Pro-ration flag.
    pub prorated: bool,
    /// Legacy year-end flag; authoritative only for legacy blobs.
    pub yearly_reset: bool,
    /// The table blob.
    pub table_json: String,
}

impl EntitlementTable {
    /// Reads a persisted row in either blob shape.
    ///
    /// Year keys that are not integers in 1..=50, and values that are not
    /// numbers, are skipped with a warning; their bands stay zero.
    pub fn from_stored(row: &StoredLeaveDefault) -> Result<Self, EntitlementError> {
        let leave_type = row.leave_type.trim();
        if leave_type.is_empty() {
            return Err(EntitlementError::BlankLeaveType);
        }

        let raw = row.table_json.trim();
        let root: Value = if raw.is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(raw)
                .map_err(|e| EntitlementError::InvalidTableConfig(e.to_string()))?
        };
        let Value::Object(root) = root else {
            return Err(EntitlementError::InvalidTableConfig(
                "table must be a JSON object".to_string(),
            ));
        };

        let legacy_carry = if row.yearly_reset {
            CarryRule::reset()
        } else {
            CarryRule::bring_unlimited()
        };

        let (years, carry) = match root.get(YEARS_KEY) {
            Some(Value::Object(years)) => {
                let carry = match root.get(META_KEY) {
                    Some(Value::Object(meta)) => parse_meta(meta, legacy_carry),
                    _ => legacy_carry,
                };
                (parse_years(leave_type, years), carry)
            }
            _ => (parse_years(leave_type, &root), legacy_carry),
        };

        Ok(Self {
            leave_type: leave_type.to_string(),
            prorated: row.prorated,
            carry,
            years,
        })
    }

    /// Produces the persisted row, always in the versioned shape.
    #[must_use]
    pub fn to_stored(&self) -> StoredLeaveDefault {
        let years: Map<String, Value> = self
            .years
            .iter()
            .map(|(year, days)| (year.to_string(), decimal_to_json(days)))
            .collect();

        let mut meta = Map::new();
        let policy = match self.carry.policy {
            CarryPolicy::Reset => "reset",
            CarryPolicy::Bring => "bring",
        };
        meta.insert("carry_policy".to_string(), Value::from(policy));
        meta.insert(
            "carry_limit_enabled".to_string(),
            Value::Bool(self.carry.limit_enabled),
        );
        meta.insert("carry_limit".to_string(), decimal_to_json(self.carry.limit));

        let mut root = Map::new();
        root.insert(YEARS_KEY.to_string(), Value::Object(years));
        root.insert(META_KEY.to_string(), Value::Object(meta));

        StoredLeaveDefault {
            leave_type: self.leave_type.clone(),
            prorated: self.prorated,
            yearly_reset: self.yearly_reset(),
            table_json: Value::Object(root).to_string(),
        }
    }
}

fn parse_years(leave_type: &str, map: &Map<String, Value>) -> YearTable {
    let mut years = YearTable::zeros();
    for (key, value) in map {
        if key == META_KEY {
            continue;
        }
        let Ok(year) = key.parse::<ServiceYear>() else {
            warn!(leave_type, key = %key, "ignoring entitlement key outside 1..=50");
            continue;
        };
        match json_to_decimal(value) {
            Some(days) => years.set(year, days),
            None => warn!(leave_type, year = %year, "ignoring non-numeric entitlement value"),
        }
    }
    years
}

fn parse_meta(meta: &Map<String, Value>, fallback: CarryRule) -> CarryRule {
    let policy = match meta.get("carry_policy").and_then(Value::as_str) {
        Some(p) if p.eq_ignore_ascii_case("bring") => CarryPolicy::Bring,
        Some(p) if p.eq_ignore_ascii_case("reset") => CarryPolicy::Reset,
        _ => fallback.policy,
    };
    let limit_enabled = match meta.get("carry_limit_enabled") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
        _ => false,
    };
    let limit = meta
        .get("carry_limit")
        .and_then(json_to_decimal)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);

    CarryRule {
        policy,
        limit_enabled,
        limit,
    }
}

fn json_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn decimal_to_json(days: Decimal) -> Value {
    let text = days.normalize().to_string();
    Number::from_str(&text).map_or(Value::String(text), Value::Number)
}
