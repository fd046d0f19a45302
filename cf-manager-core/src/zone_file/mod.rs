//! Zone-file import/export
//!
//! A small BIND-like text format: `$ORIGIN`/`$TTL` directives and one
//! `name [ttl] [IN] type [priority] content` record per line.

mod parser;
mod writer;

pub use parser::{parse_zone_file, ParsedZoneFile, SkipReason, SkippedLine};
pub use writer::{write_zone_file, EXPORT_DEFAULT_TTL};

use crate::error::{CoreError, CoreResult};

/// Content type of exported zone files
pub const ZONE_FILE_CONTENT_TYPE: &str = "text/plain";

/// 导出文件名
pub fn export_filename(zone_id: &str) -> String {
    format!("dns-export-{zone_id}.txt")
}

/// Decodes an uploaded zone file; the format is UTF-8 text only.
pub fn decode_upload(bytes: &[u8]) -> CoreResult<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| CoreError::ValidationError(format!("zone file is not valid UTF-8: {e}")))
}
