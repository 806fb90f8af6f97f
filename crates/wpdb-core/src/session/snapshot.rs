//! Snapshot of the remote session as delivered by `/frame-data`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Line number meaning "not stopped at a line".
pub const NO_LINE: i64 = -1;

/// Raw `/frame-data` body.
///
/// Every field may be missing or `null`. Older backends used `listing`,
/// `curr_line` and `breaklist`; those names are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameData {
    pub dirname: Option<String>,
    pub filename: Option<String>,
    #[serde(alias = "listing")]
    pub file_listing: Option<String>,
    #[serde(alias = "curr_line")]
    pub current_line: Option<i64>,
    #[serde(alias = "breaklist")]
    pub breakpoints: Option<Vec<i64>>,
    pub globals: Option<String>,
    pub locals: Option<String>,
    pub console_history: Option<String>,
}

/// Globals and locals as preformatted text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableScopes {
    pub globals: Option<String>,
    pub locals: Option<String>,
}

/// One tick's view of the remote session.
///
/// `None` fields were absent on the wire and mean "no change".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Console text produced since the previous snapshot.
    pub console_delta: String,
    pub breakpoints: Option<BTreeSet<u32>>,
    pub dirname: Option<String>,
    pub current_file: Option<String>,
    /// Current line, or [`NO_LINE`].
    pub current_line: Option<i64>,
    pub variable_scopes: VariableScopes,
    pub file_listing: Option<String>,
}

impl Snapshot {
    /// Parses a `/frame-data` response body.
    ///
    /// # Errors
    /// Returns an error if the body is not a JSON object.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<FrameData>(body).map(Self::from)
    }

    /// Current line with absence folded into [`NO_LINE`].
    pub fn line(&self) -> i64 {
        self.current_line.unwrap_or(NO_LINE)
    }
}

impl From<FrameData> for Snapshot {
    fn from(data: FrameData) -> Self {
        // Line numbers are 1-based; anything else cannot mark a listing row.
        let breakpoints = data.breakpoints.map(|lines| {
            lines
                .into_iter()
                .filter_map(|line| u32::try_from(line).ok())
                .filter(|line| *line > 0)
                .collect()
        });

        Self {
            console_delta: data.console_history.unwrap_or_default(),
            breakpoints,
            dirname: data.dirname,
            current_file: data.filename,
            current_line: data.current_line,
            variable_scopes: VariableScopes {
                globals: data.globals,
                locals: data.locals,
            },
            file_listing: data.file_listing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_body() {
        let body = r#"{
            "dirname": "/srv/app/",
            "filename": "a.py",
            "file_listing": "x = 1\ny = 2\n",
            "current_line": 2,
            "breakpoints": [1, 2],
            "globals": "__name__ = '__main__'",
            "locals": "x = 1",
            "console_history": "> a.py(2)\n"
        }"#;

        let snapshot = Snapshot::parse(body).unwrap();
        assert_eq!(snapshot.current_file.as_deref(), Some("a.py"));
        assert_eq!(snapshot.line(), 2);
        assert_eq!(snapshot.breakpoints, Some(BTreeSet::from([1, 2])));
        assert_eq!(snapshot.console_delta, "> a.py(2)\n");
        assert_eq!(snapshot.variable_scopes.locals.as_deref(), Some("x = 1"));
    }

    #[test]
    fn test_parse_missing_fields_means_no_change() {
        let snapshot = Snapshot::parse("{}").unwrap();
        assert_eq!(snapshot, Snapshot::default());
        assert_eq!(snapshot.line(), NO_LINE);

        let snapshot = Snapshot::parse(r#"{"breakpoints": null, "current_line": null}"#).unwrap();
        assert!(snapshot.breakpoints.is_none());
        assert!(snapshot.current_line.is_none());
    }

    #[test]
    fn test_parse_accepts_legacy_field_names() {
        let body = r#"{"filename": "b.py", "listing": "pass", "curr_line": 1, "breaklist": [1]}"#;
        let snapshot = Snapshot::parse(body).unwrap();
        assert_eq!(snapshot.file_listing.as_deref(), Some("pass"));
        assert_eq!(snapshot.line(), 1);
        assert_eq!(snapshot.breakpoints, Some(BTreeSet::from([1])));
    }

    #[test]
    fn test_non_positive_breakpoints_are_dropped() {
        let snapshot = Snapshot::parse(r#"{"breakpoints": [0, -3, 7]}"#).unwrap();
        assert_eq!(snapshot.breakpoints, Some(BTreeSet::from([7])));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(Snapshot::parse("<html>Forbidden</html>").is_err());
    }
}
