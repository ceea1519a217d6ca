//! Line codecs: how one claim is written as one line of the store file.
//!
//! Two formats are supported:
//!
//! - [`LegacyLineCodec`] — the default human-readable grammar
//!   `[<timestamp>] ID: <id>, Claim Date: <date>, Category: <category>, Description: <text>`.
//!   Fields are not escaped. A `claimDate` or `category` containing
//!   `", Category: "` or `", Description: "` is read back with shifted field
//!   boundaries. Fields containing line breaks are rejected on write.
//! - [`JsonLineCodec`] — one JSON object per line; every field is escaped.
//!
//! Decoding never fails loudly: a line that does not fit the format yields
//! `None` and the store decides what to do with it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::types::{Claim, ClaimId};

/// The on-disk record format of a store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineFormat {
    /// `[ts] ID: .., Claim Date: .., Category: .., Description: ..`
    #[default]
    Legacy,
    /// One JSON object per line.
    JsonLines,
}

impl LineFormat {
    /// Returns the codec implementing this format.
    #[must_use]
    pub fn codec(self) -> Box<dyn LineCodec> {
        match self {
            Self::Legacy => Box::new(LegacyLineCodec),
            Self::JsonLines => Box::new(JsonLineCodec),
        }
    }

    /// Returns the configuration name of this format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::JsonLines => "json-lines",
        }
    }
}

impl fmt::Display for LineFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineFormat {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "json-lines" | "jsonl" => Ok(Self::JsonLines),
            _ => Err(StoreError::InvalidConfig(format!("unknown line format: {s}"))),
        }
    }
}

/// Encodes claims to single lines and decodes them back.
pub trait LineCodec: Send + Sync + fmt::Debug {
    /// The format this codec implements.
    fn format(&self) -> LineFormat;

    /// Encodes one claim stamped with `written_at`, without the trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the claim cannot be represented
    /// on one line in this format.
    fn encode(&self, claim: &Claim, written_at: DateTime<Utc>) -> Result<String>;

    /// Decodes one line (without its newline). Returns `None` if the line
    /// does not match the format.
    fn decode(&self, line: &str) -> Option<Claim>;
}

/// Timestamp rendering shared by both formats: UTC, milliseconds, `Z` suffix.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Legacy grammar. `Claim Date` and `Category` are matched non-greedily,
/// `Description` takes the rest of the line.
static LEGACY_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\[(?P<ts>[^\]]*)\] ID: (?P<id>\d+), Claim Date: (?P<date>.*?), Category: (?P<category>.*?), Description: (?P<description>.*)$",
    )
    .unwrap_or_else(|_| unreachable!())
});

/// The default human-readable line grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyLineCodec;

impl LineCodec for LegacyLineCodec {
    fn format(&self) -> LineFormat {
        LineFormat::Legacy
    }

    fn encode(&self, claim: &Claim, written_at: DateTime<Utc>) -> Result<String> {
        let fields = [
            ("claimDate", &claim.claim_date),
            ("category", &claim.category),
            ("description", &claim.description),
        ];
        for (name, value) in fields {
            if value.contains(['\n', '\r']) {
                return Err(StoreError::Validation(format!(
                    "{name} must not contain line breaks"
                )));
            }
        }

        Ok(format!(
            "[{}] ID: {}, Claim Date: {}, Category: {}, Description: {}",
            format_timestamp(written_at),
            claim.id,
            claim.claim_date,
            claim.category,
            claim.description,
        ))
    }

    fn decode(&self, line: &str) -> Option<Claim> {
        let caps = LEGACY_LINE_REGEX.captures(line)?;
        let id = caps.name("id")?.as_str().parse::<ClaimId>().ok()?;

        Some(Claim {
            id,
            claim_date: caps.name("date")?.as_str().to_string(),
            category: caps.name("category")?.as_str().to_string(),
            description: caps.name("description")?.as_str().to_string(),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonLineOut<'a> {
    id: ClaimId,
    claim_date: &'a str,
    category: &'a str,
    description: &'a str,
    written_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonLineIn {
    id: ClaimId,
    claim_date: String,
    category: String,
    description: String,
}

/// One JSON object per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLineCodec;

impl LineCodec for JsonLineCodec {
    fn format(&self) -> LineFormat {
        LineFormat::JsonLines
    }

    fn encode(&self, claim: &Claim, written_at: DateTime<Utc>) -> Result<String> {
        let line = JsonLineOut {
            id: claim.id,
            claim_date: &claim.claim_date,
            category: &claim.category,
            description: &claim.description,
            written_at: format_timestamp(written_at),
        };
        Ok(serde_json::to_string(&line)?)
    }

    fn decode(&self, line: &str) -> Option<Claim> {
        let parsed: JsonLineIn = serde_json::from_str(line.trim()).ok()?;
        Some(Claim {
            id: parsed.id,
            claim_date: parsed.claim_date,
            category: parsed.category,
            description: parsed.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClaimFields;
    use chrono::TimeZone;
    use test_case::test_case;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 45).unwrap()
    }

    fn claim(id: u64, date: &str, category: &str, description: &str) -> Claim {
        Claim::new(ClaimId(id), ClaimFields::new(date, category, description))
    }

    #[test]
    fn legacy_encode_matches_grammar() {
        let line = LegacyLineCodec
            .encode(&claim(42, "2024-01-01", "Auto", "Fender dent"), fixed_time())
            .unwrap();

        assert_eq!(
            line,
            "[2024-01-01T12:30:45.000Z] ID: 42, Claim Date: 2024-01-01, Category: Auto, Description: Fender dent"
        );
    }

    #[test]
    fn legacy_decode_reads_fields() {
        let decoded = LegacyLineCodec.decode(
            "[2024-01-01T12:30:45.000Z] ID: 42, Claim Date: 2024-01-01, Category: Auto, Description: Fender dent",
        );
        assert_eq!(decoded, Some(claim(42, "2024-01-01", "Auto", "Fender dent")));
    }

    #[test]
    fn legacy_description_may_contain_delimiters() {
        let original = claim(1, "2024-01-01", "Auto", "hit, Category: pole, Description: bent");
        let line = LegacyLineCodec.encode(&original, fixed_time()).unwrap();
        assert_eq!(LegacyLineCodec.decode(&line), Some(original));
    }

    #[test]
    fn legacy_category_delimiter_shifts_fields() {
        let original = claim(1, "2024-01-01", "Auto, Description: oops", "Fender dent");
        let line = LegacyLineCodec.encode(&original, fixed_time()).unwrap();
        let decoded = LegacyLineCodec.decode(&line).unwrap();

        assert_eq!(decoded.category, "Auto");
        assert_eq!(decoded.description, "oops, Description: Fender dent");
    }

    #[test_case("line\nbreak", "Auto", "x" ; "date newline")]
    #[test_case("d", "Au\rto", "x" ; "category carriage return")]
    #[test_case("d", "Auto", "multi\nline" ; "description newline")]
    fn legacy_rejects_line_breaks(date: &str, category: &str, description: &str) {
        let result = LegacyLineCodec.encode(&claim(1, date, category, description), fixed_time());
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test_case("" ; "empty")]
    #[test_case("garbage" ; "free text")]
    #[test_case("[2024-01-01T00:00:00.000Z] Claim Date: d, Category: c, Description: x" ; "no id")]
    #[test_case("[2024-01-01T00:00:00.000Z] ID: abc, Claim Date: d, Category: c, Description: x" ; "non numeric id")]
    #[test_case("[2024-01-01T00:00:00.000Z] ID: 99999999999999999999999, Claim Date: d, Category: c, Description: x" ; "id overflow")]
    #[test_case("ID: 1, Claim Date: d, Category: c, Description: x" ; "no timestamp")]
    fn legacy_decode_rejects_malformed(line: &str) {
        assert!(LegacyLineCodec.decode(line).is_none());
    }

    #[test]
    fn json_encode_includes_timestamp() {
        let line = JsonLineCodec
            .encode(&claim(5, "2024-01-01", "Auto", "Fender dent"), fixed_time())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["id"], 5);
        assert_eq!(value["claimDate"], "2024-01-01");
        assert_eq!(value["writtenAt"], "2024-01-01T12:30:45.000Z");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn json_preserves_delimiters_and_line_breaks() {
        let original = claim(9, "a, Category: b", "c, Description: d", "multi\nline\r\ntext");
        let line = JsonLineCodec.encode(&original, fixed_time()).unwrap();

        assert!(!line.contains('\n'));
        assert_eq!(JsonLineCodec.decode(&line), Some(original));
    }

    #[test]
    fn json_decode_rejects_legacy_line() {
        let line = "[2024-01-01T00:00:00.000Z] ID: 1, Claim Date: d, Category: c, Description: x";
        assert!(JsonLineCodec.decode(line).is_none());
    }

    #[test]
    fn format_parse_and_display() {
        assert_eq!("legacy".parse::<LineFormat>().ok(), Some(LineFormat::Legacy));
        assert_eq!("JSON-LINES".parse::<LineFormat>().ok(), Some(LineFormat::JsonLines));
        assert_eq!("jsonl".parse::<LineFormat>().ok(), Some(LineFormat::JsonLines));
        assert!("csv".parse::<LineFormat>().is_err());
        assert_eq!(LineFormat::JsonLines.to_string(), "json-lines");
    }

    #[test]
    fn format_selects_codec() {
        assert_eq!(LineFormat::Legacy.codec().format(), LineFormat::Legacy);
        assert_eq!(LineFormat::JsonLines.codec().format(), LineFormat::JsonLines);
    }
}
