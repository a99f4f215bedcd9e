//! Parser for shell-style `KEY=value` assignment files.
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A single `KEY=value` assignment.
///
/// # Examples
///
/// ```
/// use jtools::config::keyvalue::parse_str;
///
/// let parsed = parse_str("REMOTE_HOST=nas\n").unwrap();
/// assert_eq!(parsed[0].key, "REMOTE_HOST");
/// assert_eq!(parsed[0].value, "nas");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Variable name.
    pub key: String,
    /// Unquoted value.
    pub value: String,
    /// 1-based line number in the source.
    pub line: usize,
}

/// Errors from reading or parsing an assignment file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A line is not a valid assignment.
    #[error("line {line}: {message}")]
    InvalidSyntax {
        /// 1-based line number.
        line: usize,
        /// What is wrong with it.
        message: String,
    },
}

/// Read and parse the assignment file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::InvalidSyntax`] for malformed lines.
pub fn parse_file(path: &Path) -> Result<Vec<Assignment>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&content)
}

/// Parse assignment file content with `dotenvy`.
///
/// Accepted forms, one per line:
///
/// ```text
/// # comment
/// KEY=value            # trailing comment
/// export KEY="double quoted \"value\""
/// KEY='single quoted'
/// ```
///
/// `$NAME` references in unquoted and double-quoted values are substituted
/// from earlier assignments and the environment.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSyntax`] with the 1-based line where parsing
/// stopped: a line without `=`, an invalid variable name, an unterminated
/// quote, or unquoted whitespace inside a value.
pub fn parse_str(content: &str) -> Result<Vec<Assignment>, ConfigError> {
    let lines: Vec<&str> = content.lines().collect();
    let mut cursor = 0;
    let mut out = Vec::new();
    for item in dotenvy::from_read_iter(content.as_bytes()) {
        match item {
            Ok((key, value)) => {
                let line = locate(&lines, cursor, |l| assigns(l, &key)).unwrap_or(cursor);
                cursor = line + 1;
                out.push(Assignment {
                    key,
                    value,
                    line: line + 1,
                });
            }
            Err(dotenvy::Error::LineParse(text, _)) => {
                let first = text.lines().next().unwrap_or_default().trim();
                let line = locate(&lines, cursor, |l| !first.is_empty() && l.contains(first))
                    .unwrap_or(cursor);
                return Err(ConfigError::InvalidSyntax {
                    line: line + 1,
                    message: format!("cannot parse '{first}'"),
                });
            }
            Err(other) => {
                return Err(ConfigError::InvalidSyntax {
                    line: cursor + 1,
                    message: other.to_string(),
                });
            }
        }
    }
    Ok(out)
}

/// Index of the first line at or after `from` matching `pred`.
fn locate(lines: &[&str], from: usize, pred: impl Fn(&str) -> bool) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, l)| pred(l))
        .map(|(i, _)| i)
}

/// Whether `line` is an assignment to `key`.
fn assigns(line: &str, key: &str) -> bool {
    let body = line.trim_start();
    let body = body.strip_prefix("export ").map_or(body, str::trim_start);
    body.strip_prefix(key)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn values(content: &str) -> Vec<(String, String)> {
        parse_str(content)
            .unwrap()
            .into_iter()
            .map(|a| (a.key, a.value))
            .collect()
    }

    #[test]
    fn parses_plain_assignments() {
        assert_eq!(
            values("REMOTE_HOST=nas\nREMOTE_PATH=docker/compose.yml\n"),
            vec![
                ("REMOTE_HOST".into(), "nas".into()),
                ("REMOTE_PATH".into(), "docker/compose.yml".into()),
            ]
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let parsed = parse_str("# jcp config\n\n   \nEDITOR=nano\n").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].line, 4);
    }

    #[test]
    fn strips_export_prefix() {
        assert_eq!(values("export EDITOR=vim"), vec![("EDITOR".into(), "vim".into())]);
    }

    #[test]
    fn double_quotes_keep_spaces() {
        assert_eq!(
            values(r#"EDITOR="code --wait" # GUI editor"#),
            vec![("EDITOR".into(), "code --wait".into())]
        );
        assert_eq!(
            values(r#"X="say \"hi\"""#),
            vec![("X".into(), r#"say "hi""#.into())]
        );
    }

    #[test]
    fn single_quotes_are_literal() {
        assert_eq!(values(r"X='a \n # b'"), vec![("X".into(), r"a \n # b".into())]);
    }

    #[test]
    fn unquoted_trailing_comment_is_stripped() {
        assert_eq!(values("X=value # note"), vec![("X".into(), "value".into())]);
        assert_eq!(values("X=a#b"), vec![("X".into(), "a#b".into())]);
    }

    #[test]
    fn earlier_assignments_are_substituted() {
        assert_eq!(
            values("BASE=/srv\nREMOTE_PATH=${BASE}/compose.yml\n")[1].1,
            "/srv/compose.yml"
        );
    }

    #[test]
    fn empty_value_is_allowed() {
        assert_eq!(values("REMOTE_HOST="), vec![("REMOTE_HOST".into(), String::new())]);
    }

    #[test]
    fn repeated_keys_keep_their_lines() {
        let parsed = parse_str("EDITOR=nano\n# switch\nEDITOR=vim\n").unwrap();
        assert_eq!(parsed[0].line, 1);
        assert_eq!(parsed[1].line, 3);
    }

    #[test]
    fn missing_equals_is_an_error() {
        let err = parse_str("A=1\nnot an assignment\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSyntax { line: 2, .. }), "{err}");
    }

    #[test]
    fn invalid_name_is_an_error() {
        assert!(parse_str("1ABC=x").is_err());
        assert!(parse_str("A-B=x").is_err());
        assert!(parse_str("=x").is_err());
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert!(parse_str("X=\"open").is_err());
        assert!(parse_str("X='open").is_err());
    }

    #[test]
    fn unquoted_space_is_an_error() {
        let err = parse_str("A=1\nREMOTES=gdrive: work:\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSyntax { line: 2, .. }), "{err}");
    }

    #[test]
    fn parse_file_reports_missing_file() {
        let err = parse_file(Path::new("/nonexistent/jtools.conf")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
