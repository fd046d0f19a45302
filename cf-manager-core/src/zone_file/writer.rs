//! Zone-file writer

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::{ZoneRecord, TTL_AUTOMATIC};

/// TTL written for records whose TTL is automatic
pub const EXPORT_DEFAULT_TTL: u32 = 3600;

/// Serializes records in input order.
///
/// Output is fully determined by the arguments. Automatic TTLs become
/// [`EXPORT_DEFAULT_TTL`], so re-importing an export does not restore them.
pub fn write_zone_file(zone_id: &str, records: &[ZoneRecord], exported_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "; DNS Zone export for {zone_id}");
    let _ = writeln!(
        out,
        "; Exported at {}",
        exported_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    out.push('\n');
    out.push_str("$ORIGIN .\n");
    let _ = writeln!(out, "$TTL {EXPORT_DEFAULT_TTL}");
    out.push('\n');

    for record in records {
        let ttl = if record.ttl == TTL_AUTOMATIC {
            EXPORT_DEFAULT_TTL
        } else {
            record.ttl
        };
        let _ = write!(out, "{}.\t{ttl}\tIN\t{}", record.name, record.record_type);
        if let Some(priority) = record.priority {
            let _ = write!(out, "\t{priority}");
        }
        let _ = writeln!(out, "\t{}", record.content);
    }

    out
}
