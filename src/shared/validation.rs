use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use validator::ValidationErrors;

lazy_static! {
    /// Runs of characters that are not safe inside a stored filename
    /// - Kept: ASCII letters, digits, '.', '_', '-'
    /// - Replaced: spaces, quotes, unicode, shell metacharacters
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

/// Field name -> list of messages, as shown next to form inputs
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Flatten `validator` errors into a per-field message map
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Append a message for `field`
pub fn push_field_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

/// Reduce a client-supplied filename to a safe base name.
///
/// Path components are dropped (both `/` and `\` separators), unsafe runs become `_`,
/// and leading dots are removed so the result can never be hidden or traverse upward.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Lowercased extension of a filename, handling double extensions like `.tar.gz` as `gz`
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Case-insensitive "contains" pattern for the connection's `REGEXP` function.
///
/// The term is matched literally; folding follows Unicode rules, so "É" matches "é".
pub fn contains_pattern(term: &str) -> String {
    format!("(?i){}", regex::escape(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("setup.exe"), "setup.exe");
        assert_eq!(sanitize_filename("C:\\Users\\me\\tool.zip"), "tool.zip");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("dir/sub/app-1.2.tar.gz"), "app-1.2.tar.gz");
    }

    #[test]
    fn test_sanitize_filename_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("my app (x64).msi"), "my_app_x64_.msi");
        assert_eq!(sanitize_filename("\"quoted\".zip"), "_quoted_.zip");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }

    #[test]
    fn test_sanitize_filename_fallback() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("///"), "file");
        assert_eq!(sanitize_filename("???"), "file");
    }

    #[test]
    fn test_contains_pattern_escapes_and_folds() {
        let re = Regex::new(&contains_pattern("Émul (x64)")).unwrap();
        assert!(re.is_match("the émul (X64) build"));
        assert!(!re.is_match("émul x64"));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("logo.PNG").as_deref(), Some("png"));
        assert_eq!(file_extension("pkg.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension(".bashrc"), None);
    }
}
