// ── Remark domain type ──

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Status label written on every ledger row.
///
/// The ledger stores the Korean labels used by the shop floor; the English
/// tags are accepted on read so hand-edited sheets still decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Remark {
    /// First usage of a barcode.
    #[strum(to_string = "신규 등록", serialize = "NEW")]
    New,
    /// A later usage that still leaves uses available.
    #[strum(to_string = "중복 사용", serialize = "REUSED")]
    Reused,
    /// The usage that completes the allowed count.
    #[strum(to_string = "사용 완료", serialize = "LIMIT_REACHED")]
    LimitReached,
}

impl Remark {
    /// Cell text for this remark.
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "신규 등록",
            Self::Reused => "중복 사용",
            Self::LimitReached => "사용 완료",
        }
    }
}

impl fmt::Display for Remark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
