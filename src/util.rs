use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;

pub fn ensure_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p).with_context(|| format!("create_dir_all {}", p.display()))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    format!("{:x}", h.finalize())
}

pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

static LAST_STAMP_MICROS: AtomicI64 = AtomicI64::new(0);

/// UTC `YYYYMMDD_HHMMSS_ffffff`, strictly increasing within the process even
/// when two calls land in the same microsecond.
pub fn unique_timestamp() -> Result<String> {
    let now = i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000)
        .unwrap_or(i64::MAX - 1);
    let prev = LAST_STAMP_MICROS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|prev| prev);
    let micros = now.max(prev + 1);

    let stamp = OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000)
        .with_context(|| format!("timestamp out of range: {micros}us"))?;
    let formatted = stamp.format(format_description!(
        "[year][month][day]_[hour][minute][second]_[subsecond digits:6]"
    ))?;
    Ok(formatted)
}
