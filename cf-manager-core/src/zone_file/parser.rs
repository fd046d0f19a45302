//! Zone-file parser
//!
//! Line-oriented reader for the simplified BIND subset the exporter writes.
//! A malformed line never fails the parse; it is reported in
//! [`ParsedZoneFile::skipped`] and omitted.

use std::fmt;

use crate::types::{RecordType, ZoneRecord, TTL_AUTOMATIC};

/// 解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedZoneFile {
    pub records: Vec<ZoneRecord>,
    pub skipped: Vec<SkippedLine>,
}

/// 被跳过的行（行号从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than three tokens after comment stripping
    TooFewTokens,
    /// TTL token does not fit a 32-bit TTL
    InvalidTtl,
    MissingType,
    MissingContent,
    /// Apex SOA/NS records are managed upstream
    ApexRecord(String),
    /// `$INCLUDE`, `$GENERATE` and other directives
    UnsupportedDirective(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewTokens => write!(f, "fewer than 3 tokens"),
            Self::InvalidTtl => write!(f, "TTL out of range"),
            Self::MissingType => write!(f, "missing record type"),
            Self::MissingContent => write!(f, "missing record content"),
            Self::ApexRecord(t) => write!(f, "apex {t} record is not importable"),
            Self::UnsupportedDirective(d) => write!(f, "unsupported directive {d}"),
        }
    }
}

/// 解析状态，仅在单次解析内存在
struct ParserState {
    origin: String,
    default_ttl: u32,
}

impl Default for ParserState {
    fn default() -> Self {
        Self {
            origin: "@".to_string(),
            default_ttl: TTL_AUTOMATIC,
        }
    }
}

enum LineOutcome {
    Record(ZoneRecord),
    Skip(SkipReason),
    Ignored,
}

/// Parses zone-file text into records.
///
/// Directives: `$TTL <n>` replaces the default TTL (non-numeric values are
/// ignored), `$ORIGIN <name>` is tracked but names are not rewritten with it.
/// Record lines are `name [ttl] [IN] type content...`.
pub fn parse_zone_file(input: &str) -> ParsedZoneFile {
    let mut state = ParserState::default();
    let mut parsed = ParsedZoneFile::default();

    for (index, raw_line) in input.lines().enumerate() {
        let line_number = index + 1;
        match parse_line(raw_line, &mut state) {
            LineOutcome::Record(record) => parsed.records.push(record),
            LineOutcome::Skip(reason) => {
                log::debug!("Skipping zone-file line {line_number}: {reason}");
                parsed.skipped.push(SkippedLine {
                    line_number,
                    reason,
                });
            }
            LineOutcome::Ignored => {}
        }
    }

    log::debug!(
        "Parsed zone file: {} records, {} skipped, last origin '{}'",
        parsed.records.len(),
        parsed.skipped.len(),
        state.origin
    );
    parsed
}

fn parse_line(raw_line: &str, state: &mut ParserState) -> LineOutcome {
    let line = raw_line.trim();
    if line.is_empty() || line.starts_with(';') {
        return LineOutcome::Ignored;
    }

    let line = strip_comment(line);
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return LineOutcome::Ignored;
    };

    if first.starts_with('$') {
        return parse_directive(first, tokens.get(1).copied(), state);
    }

    if tokens.len() < 3 {
        return LineOutcome::Skip(SkipReason::TooFewTokens);
    }

    let name = tokens[0];
    let mut index = 1;
    let mut ttl = state.default_ttl;

    if is_numeric(tokens[index]) {
        match tokens[index].parse::<u32>() {
            Ok(value) => ttl = value,
            Err(_) => return LineOutcome::Skip(SkipReason::InvalidTtl),
        }
        index += 1;
    }

    if tokens
        .get(index)
        .is_some_and(|t| t.eq_ignore_ascii_case("IN"))
    {
        index += 1;
    }

    let Some(type_token) = tokens.get(index) else {
        return LineOutcome::Skip(SkipReason::MissingType);
    };
    let record_type = RecordType::parse(type_token);
    index += 1;

    let mut content_tokens = tokens.get(index..).unwrap_or_default();
    if content_tokens.is_empty() {
        return LineOutcome::Skip(SkipReason::MissingContent);
    }

    if name == "@" && matches!(record_type, RecordType::Soa | RecordType::Ns) {
        return LineOutcome::Skip(SkipReason::ApexRecord(record_type.to_string()));
    }

    // MX/SRV/URI 的优先级在内容之前
    let mut priority = None;
    if record_type.has_priority() && content_tokens.len() > 1 {
        if let Ok(value) = content_tokens[0].parse::<u16>() {
            priority = Some(value);
            content_tokens = &content_tokens[1..];
        }
    }

    let content = content_tokens.join(" ").replace('"', "");
    if content.is_empty() {
        return LineOutcome::Skip(SkipReason::MissingContent);
    }

    LineOutcome::Record(ZoneRecord {
        record_type,
        name: normalize_name(name),
        content,
        ttl,
        proxied: false,
        priority,
    })
}

fn parse_directive(directive: &str, argument: Option<&str>, state: &mut ParserState) -> LineOutcome {
    if directive.eq_ignore_ascii_case("$ORIGIN") {
        if let Some(origin) = argument {
            state.origin = origin.to_string();
        }
        LineOutcome::Ignored
    } else if directive.eq_ignore_ascii_case("$TTL") {
        match argument.map(str::parse::<u32>) {
            Some(Ok(ttl)) => state.default_ttl = ttl,
            _ => log::debug!("Ignoring malformed $TTL directive: {argument:?}"),
        }
        LineOutcome::Ignored
    } else {
        LineOutcome::Skip(SkipReason::UnsupportedDirective(directive.to_ascii_uppercase()))
    }
}

/// 去掉行尾注释；双引号内的 `;` 属于内容
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => return line[..i].trim_end(),
            _ => {}
        }
    }
    line
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// `@` 保持不变；绝对名称去掉一个结尾的 `.`
fn normalize_name(name: &str) -> String {
    if name == "@" {
        return name.to_string();
    }
    name.strip_suffix('.').unwrap_or(name).to_string()
}
