use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::SUMMARY_CHARS;
use crate::dates::{day_key, day_start_millis, parse_day};

/// Diary record stored in redb, keyed by `{username}/{YYYYMMDD}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryRecord {
    pub content: String,
    /// Day start in milliseconds
    pub date: i64,
    /// Milliseconds
    pub created_at: i64,
    /// Milliseconds
    pub updated_at: i64,
}

/// One entry as it appears in a month listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiaryListItem {
    pub date: i64,
    /// `YYYY-MM-DD`
    pub day: String,
    pub summary: String,
    pub word_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiaryMonthResData {
    /// `YYYYMM`
    pub month: String,
    pub entries: Vec<DiaryListItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiaryDetail {
    pub date: i64,
    pub day: String,
    pub content: String,
    pub word_count: u64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteDiaryRequest {
    pub content: String,
}

impl DiaryRecord {
    pub fn list_item(&self, day: NaiveDate) -> DiaryListItem {
        DiaryListItem {
            date: self.date,
            day: day_key(day),
            summary: summarize(&self.content),
            word_count: word_count(&self.content),
        }
    }

    pub fn detail(&self, day: NaiveDate) -> DiaryDetail {
        DiaryDetail {
            date: self.date,
            day: day_key(day),
            content: self.content.clone(),
            word_count: word_count(&self.content),
            updated_at: self.updated_at,
        }
    }
}

/// Non-whitespace characters, so CJK and latin text count alike
pub fn word_count(content: &str) -> u64 {
    content.chars().filter(|c| !c.is_whitespace()).count() as u64
}

/// First line of the content, cut to `SUMMARY_CHARS` characters
pub fn summarize(content: &str) -> String {
    let first_line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    first_line.trim().chars().take(SUMMARY_CHARS).collect()
}

// =============================================================================
// JSON Export
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportRange {
    #[default]
    All,
    Part,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    #[default]
    Text,
    /// Day start in milliseconds
    Timestamp,
}

/// Options submitted by the export form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JsonExportForm {
    #[serde(default)]
    pub range: ExportRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub date_key: String,
    pub content_key: String,
    #[serde(default)]
    pub date_format: DateFormat,
}

pub type ExportRow = Map<String, Value>;

impl JsonExportForm {
    /// Inclusive date bounds, `None` for the whole diary
    pub fn bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>, String> {
        if self.date_key.trim().is_empty() || self.content_key.trim().is_empty() {
            return Err("dateKey and contentKey must not be empty".to_string());
        }
        if self.date_key == self.content_key {
            return Err("dateKey and contentKey must differ".to_string());
        }

        match self.range {
            ExportRange::All => Ok(None),
            ExportRange::Part => {
                let start = self
                    .start_date
                    .as_deref()
                    .and_then(parse_day)
                    .ok_or("startDate must be formatted as YYYY-MM-DD")?;
                let end = self
                    .end_date
                    .as_deref()
                    .and_then(parse_day)
                    .ok_or("endDate must be formatted as YYYY-MM-DD")?;
                if start > end {
                    return Err("startDate must not be after endDate".to_string());
                }
                Ok(Some((start, end)))
            }
        }
    }
}

/// Flatten entries (already in date order) into export rows
pub fn build_export_rows(entries: &[(NaiveDate, String)], form: &JsonExportForm) -> Vec<ExportRow> {
    entries
        .iter()
        .map(|(day, content)| {
            let date = match form.date_format {
                DateFormat::Text => Value::from(day_key(*day)),
                DateFormat::Timestamp => Value::from(day_start_millis(*day)),
            };
            let mut row = Map::new();
            row.insert(form.date_key.clone(), date);
            row.insert(form.content_key.clone(), Value::from(content.clone()));
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form(range: ExportRange) -> JsonExportForm {
        JsonExportForm {
            range,
            start_date: None,
            end_date: None,
            date_key: "date".to_string(),
            content_key: "content".to_string(),
            date_format: DateFormat::Text,
        }
    }

    #[test]
    fn test_word_count_ignores_whitespace() {
        assert_eq!(word_count("hello world"), 10);
        assert_eq!(word_count("今天 天气\n很好"), 6);
        assert_eq!(word_count("   \n\t"), 0);
    }

    #[test]
    fn test_summarize_uses_first_non_empty_line() {
        assert_eq!(summarize("\n\n  first line  \nsecond"), "first line");
        let long = "x".repeat(SUMMARY_CHARS + 20);
        assert_eq!(summarize(&long).chars().count(), SUMMARY_CHARS);
        assert_eq!(summarize(""), "");
    }

    #[test]
    fn test_export_form_defaults_from_json() {
        let parsed: JsonExportForm =
            serde_json::from_str(r#"{"dateKey":"d","contentKey":"c"}"#).unwrap();
        assert_eq!(parsed.range, ExportRange::All);
        assert_eq!(parsed.date_format, DateFormat::Text);
        assert_eq!(parsed.bounds().unwrap(), None);
    }

    #[test]
    fn test_export_bounds_part() {
        let mut f = form(ExportRange::Part);
        f.start_date = Some("2024-01-01".to_string());
        f.end_date = Some("2024-01-31".to_string());
        assert_eq!(
            f.bounds().unwrap(),
            Some((date(2024, 1, 1), date(2024, 1, 31)))
        );
    }

    #[test]
    fn test_export_bounds_rejects_bad_input() {
        let mut f = form(ExportRange::Part);
        assert!(f.bounds().is_err());

        f.start_date = Some("2024-02-01".to_string());
        f.end_date = Some("2024-01-01".to_string());
        assert!(f.bounds().is_err());

        let mut same_keys = form(ExportRange::All);
        same_keys.content_key = "date".to_string();
        assert!(same_keys.bounds().is_err());
    }

    #[test]
    fn test_build_export_rows() {
        let entries = vec![
            (date(2024, 1, 1), "first".to_string()),
            (date(2024, 1, 2), "second".to_string()),
        ];

        let rows = build_export_rows(&entries, &form(ExportRange::All));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], "2024-01-01");
        assert_eq!(rows[1]["content"], "second");

        let mut ts = form(ExportRange::All);
        ts.date_format = DateFormat::Timestamp;
        let rows = build_export_rows(&entries, &ts);
        assert_eq!(rows[0]["date"], day_start_millis(date(2024, 1, 1)));
    }
}
