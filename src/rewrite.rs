//! File-name substitution capability.
//!
//! The planner only depends on [`FilenameRewriter`]; the regex dialect lives
//! behind [`RegexRewriter`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

/// Maps a file name to its new name, or `None` when the name does not match.
pub trait FilenameRewriter {
    fn rewrite(&self, file_name: &str) -> Option<String>;
}

impl<F> FilenameRewriter for F
where
    F: Fn(&str) -> Option<String>,
{
    fn rewrite(&self, file_name: &str) -> Option<String> {
        self(file_name)
    }
}

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error(transparent)]
    Pattern(#[from] regex::Error),

    #[error("invalid group reference {index}: pattern has {groups} group(s)")]
    InvalidGroupIndex { index: String, groups: usize },

    #[error("unknown group name '{0}'")]
    UnknownGroupName(String),
}

// Backslash backreferences: \1, \12, \g<name>, \g<0>, and an escaped backslash.
static BACKSLASH_REF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\\(?:(?P<num>\d{1,2})|g<(?P<named>[A-Za-z_][A-Za-z0-9_]*|\d+)>|(?P<escaped>\\))",
    )
    .unwrap()
});

// `$name`, `${name}` and `$$` in the regex crate's replacement syntax.
static DOLLAR_REF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:\$|\{(?P<braced>[^}]*)\}|(?P<bare>[A-Za-z0-9_]+))").unwrap()
});

/// Regex search-and-replace over a file name.
///
/// Every non-overlapping match is replaced. The template accepts the regex
/// crate's `$1` / `${name}` syntax as well as `\1` / `\g<name>`. Every group
/// reference must exist in the pattern; `$$` is a literal dollar.
#[derive(Debug, Clone)]
pub struct RegexRewriter {
    regex: Regex,
    template: String,
    replacement: String,
}

impl RegexRewriter {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, RewriteError> {
        let regex = Regex::new(pattern)?;
        let template = translate_template(replacement);
        check_group_refs(&regex, &template)?;

        Ok(Self {
            regex,
            template,
            replacement: replacement.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// The replacement exactly as the user supplied it.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

impl FilenameRewriter for RegexRewriter {
    fn rewrite(&self, file_name: &str) -> Option<String> {
        if !self.regex.is_match(file_name) {
            return None;
        }
        Some(
            self.regex
                .replace_all(file_name, self.template.as_str())
                .into_owned(),
        )
    }
}

/// Reject references to groups the pattern does not define.
///
/// Without this the regex crate expands them to "", silently truncating names.
fn check_group_refs(regex: &Regex, template: &str) -> Result<(), RewriteError> {
    for caps in DOLLAR_REF_REGEX.captures_iter(template) {
        let Some(reference) = caps.name("braced").or_else(|| caps.name("bare")) else {
            continue;
        };
        let reference = reference.as_str();

        if !reference.is_empty() && reference.bytes().all(|b| b.is_ascii_digit()) {
            let in_range = reference
                .parse::<usize>()
                .is_ok_and(|index| index < regex.captures_len());
            if !in_range {
                return Err(RewriteError::InvalidGroupIndex {
                    index: reference.to_string(),
                    groups: regex.captures_len() - 1,
                });
            }
        } else if !regex.capture_names().flatten().any(|name| name == reference) {
            return Err(RewriteError::UnknownGroupName(reference.to_string()));
        }
    }
    Ok(())
}

/// Rewrite backslash backreferences into `${..}` form.
fn translate_template(template: &str) -> String {
    BACKSLASH_REF_REGEX
        .replace_all(template, |caps: &Captures| {
            match caps.name("num").or_else(|| caps.name("named")) {
                Some(group) => format!("${{{}}}", group.as_str()),
                None => "\\".to_string(),
            }
        })
        .into_owned()
}
