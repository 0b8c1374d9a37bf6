// ── Domain model ──

pub mod record;
pub mod remark;

pub use record::{
    DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT, RowKey, TIMESTAMP_FORMAT, UsageRecord, format_limit,
    format_sequence, normalize_barcode, parse_count, timestamp_now, validate_limit,
};
pub use remark::Remark;
