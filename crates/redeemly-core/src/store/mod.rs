// ── Ledger persistence ──
//
// `sheet` owns the xlsx encoding and atomic replacement; `ledger` maps the
// first sheet's rows onto `UsageRecord`s.

mod ledger;
mod sheet;

pub use ledger::{HEADERS, LedgerInit, LedgerStore};
