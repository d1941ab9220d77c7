pub mod security;

use chrono::{DateTime, SubsecRound, Utc};

/// Current instant truncated to the microsecond precision of a `timestamptz` column.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
