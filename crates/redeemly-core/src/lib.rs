//! Coupon redemption ledger for barcode-based discount coupons.
//!
//! This crate owns the record keeping behind the `redeemly` CLI, with no
//! terminal or GUI code of its own:
//!
//! - **[`LedgerStore`]** — Append-only usage log kept in the first sheet of
//!   an `.xlsx` workbook. Every operation re-reads the file; every mutation
//!   rewrites it through a temp file and an atomic rename.
//!
//! - **[`policy`]** — Decides whether a barcode may be used again, fixes its
//!   redemption limit on first use, and tags each row `NEW`, `REUSED`, or
//!   `LIMIT_REACHED`.
//!
//! - **[`report`]** / **[`search`]** — Recent-activity tail and per-barcode
//!   history, handed to hosts as structured records. Deletion works on exact
//!   [`RowKey`]s behind two confirmations.
//!
//! - **[`Session`]** — Explicit context holding the active ledger and the
//!   operator's settings; the entry point hosts drive.
//!
//! - **[`Operator`]** — The prompt / notify / confirm collaborator a host
//!   implements.

pub mod error;
pub mod model;
pub mod operator;
pub mod policy;
pub mod report;
pub mod search;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use model::{
    DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT, Remark, RowKey, TIMESTAMP_FORMAT, UsageRecord,
};
pub use operator::{IntegerPrompt, NoticeKind, Operator};
pub use policy::{Decision, Registration};
pub use report::{DEFAULT_RECENT, DisplayOrder, RecentOptions, RecentReport};
pub use search::{DeleteOutcome, SearchResult};
pub use session::{Session, SessionSettings, Submission};
pub use store::{HEADERS, LedgerInit, LedgerStore};
