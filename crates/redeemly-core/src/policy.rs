//! Redemption policy: whether an incoming barcode may be used again.
//!
//! The decision is a pure function of the barcode's existing rows
//! ([`decide`]); [`register`] wraps it with the ledger read, the limit
//! prompt for barcodes without a limit, the append, and operator notices.
//!
//! Reaching the limit exactly is an accepted use tagged
//! [`Remark::LimitReached`]; only the use after that is refused.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{
    DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT, Remark, UsageRecord, normalize_barcode, timestamp_now,
    validate_limit,
};
use crate::operator::{IntegerPrompt, NoticeKind, Operator};
use crate::store::LedgerStore;

/// What the policy makes of a barcode's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// A limit has to be chosen before use number `sequence` is written:
    /// the barcode is new, or its first row predates the limit column.
    NeedsLimit { sequence: u32 },
    /// Write a row with this sequence, remark, and limit.
    Accept {
        sequence: u32,
        remark: Remark,
        limit: u32,
    },
    /// The barcode has used up its limit.
    Reject { limit: u32, attempted: u32 },
}

/// Decide from a barcode's existing rows, oldest first.
///
/// The limit always comes from the first row, whatever later rows or the
/// caller say.
pub fn decide(history: &[UsageRecord]) -> Decision {
    let sequence = u32::try_from(history.len())
        .unwrap_or(u32::MAX)
        .saturating_add(1);

    match history.first().and_then(|first| first.limit) {
        Some(limit) => judge(sequence, limit),
        None => Decision::NeedsLimit { sequence },
    }
}

/// Place use number `sequence` against `limit`.
///
/// Reaching the limit wins over being new, so a limit of one makes the
/// first use the last.
pub fn judge(sequence: u32, limit: u32) -> Decision {
    if sequence > limit {
        return Decision::Reject {
            limit,
            attempted: sequence,
        };
    }
    let remark = if sequence == limit {
        Remark::LimitReached
    } else if sequence == 1 {
        Remark::New
    } else {
        Remark::Reused
    };
    Decision::Accept {
        sequence,
        remark,
        limit,
    }
}

/// Result of a registration attempt. Only `Accepted` wrote a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Registration {
    Accepted(UsageRecord),
    LimitExceeded { barcode: String, limit: u32 },
    Cancelled { barcode: String },
}

impl Registration {
    pub fn record(&self) -> Option<&UsageRecord> {
        match self {
            Self::Accepted(record) => Some(record),
            Self::LimitExceeded { .. } | Self::Cancelled { .. } => None,
        }
    }

    pub fn barcode(&self) -> &str {
        match self {
            Self::Accepted(record) => &record.barcode,
            Self::LimitExceeded { barcode, .. } | Self::Cancelled { barcode } => barcode,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted(record) => write!(
                f,
                "barcode {} {} ({})",
                record.barcode,
                record.summary(),
                record.remark
            ),
            Self::LimitExceeded { barcode, limit } => write!(
                f,
                "limit exceeded: barcode {barcode} has already been used {limit} of {limit} times"
            ),
            Self::Cancelled { barcode } => {
                write!(f, "registration cancelled for barcode {barcode}")
            }
        }
    }
}

/// Record a usage of `barcode` stamped with the current local time.
///
/// `preset` is the limit to use if the barcode is new, or if its first row
/// has no limit; without one the operator is prompted. It is ignored for
/// barcodes whose first row fixed a limit.
pub fn register(
    store: &LedgerStore,
    barcode: &str,
    preset: Option<u32>,
    operator: &mut dyn Operator,
) -> Result<Registration, CoreError> {
    register_at(store, barcode, preset, operator, timestamp_now())
}

/// [`register`] with an explicit timestamp.
pub fn register_at(
    store: &LedgerStore,
    barcode: &str,
    preset: Option<u32>,
    operator: &mut dyn Operator,
    timestamp: String,
) -> Result<Registration, CoreError> {
    let barcode = normalize_barcode(barcode)?;
    let preset = preset.map(validate_limit).transpose()?;

    let history = store.scan_by_barcode(&barcode)?;

    let mut decision = decide(&history);
    if let Decision::NeedsLimit { sequence } = decision {
        let limit = match preset {
            Some(limit) => limit,
            None => match prompt_limit(&barcode, operator)? {
                Some(limit) => limit,
                None => {
                    tracing::info!(%barcode, "registration cancelled at limit prompt");
                    operator.notify(
                        NoticeKind::Info,
                        "Registration cancelled",
                        &format!("Barcode {barcode} was not registered."),
                    );
                    return Ok(Registration::Cancelled { barcode });
                }
            },
        };
        if sequence > 1 {
            tracing::info!(%barcode, limit, "first row has no limit, using the chosen one");
        }
        decision = judge(sequence, limit);
    }

    let (sequence, remark, limit) = match decision {
        Decision::Accept {
            sequence,
            remark,
            limit,
        } => (sequence, remark, limit),
        Decision::Reject { limit, attempted } => {
            tracing::warn!(%barcode, limit, attempted, "redemption limit exceeded");
            operator.notify(
                NoticeKind::Warning,
                "Registration refused",
                &format!("Barcode {barcode} has reached its limit of {limit} uses."),
            );
            return Ok(Registration::LimitExceeded { barcode, limit });
        }
        Decision::NeedsLimit { .. } => {
            return Err(CoreError::validation(format!(
                "no redemption limit for barcode {barcode}"
            )));
        }
    };

    let record = UsageRecord {
        barcode,
        timestamp,
        sequence,
        remark,
        limit: Some(limit),
    };
    store.append(&record)?;

    tracing::info!(
        barcode = %record.barcode,
        sequence,
        limit,
        remark = ?remark,
        "usage registered"
    );

    match remark {
        Remark::New => operator.notify(
            NoticeKind::Info,
            "New registration",
            &format!(
                "Barcode {} registered with a limit of {limit} uses.",
                record.barcode
            ),
        ),
        Remark::LimitReached => operator.notify(
            NoticeKind::Info,
            "Limit reached",
            &format!(
                "Barcode {} has now used all {limit} of its uses.",
                record.barcode
            ),
        ),
        Remark::Reused => {}
    }

    Ok(Registration::Accepted(record))
}

fn prompt_limit(barcode: &str, operator: &mut dyn Operator) -> Result<Option<u32>, CoreError> {
    let prompt = IntegerPrompt {
        title: "Redemption limit".into(),
        message: format!("Barcode {barcode} has no limit yet. How many uses are allowed?"),
        default: DEFAULT_LIMIT,
        min: MIN_LIMIT,
        max: MAX_LIMIT,
        step: 1,
    };

    match operator.prompt_integer(&prompt)? {
        Some(limit) if prompt.accepts(limit) => Ok(Some(limit)),
        Some(limit) => Err(CoreError::validation(format!(
            "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit}"
        ))),
        None => Ok(None),
    }
}
