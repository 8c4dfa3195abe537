//! Path templates with `{name}` placeholders.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{Error, Result};

// Encodes everything a value must not leak into a path segment:
// controls, space, quoting/bracketing characters, separators, and `%`
// itself so already-encoded input is not double-interpreted.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// A per-method URL path pattern, possibly empty.
///
/// Placeholders use `{name}` syntax and are scanned once at construction;
/// expansion substitutes percent-encoded values at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    placeholders: Vec<String>,
}

impl PathTemplate {
    /// Parse a template, collecting its placeholders.
    ///
    /// # Errors
    ///
    /// Returns a binding error on unbalanced or empty braces.
    pub fn parse(template: impl Into<String>) -> Result<Self> {
        let raw = template.into();
        let placeholders = scan_placeholders(&raw)?;
        Ok(Self { raw, placeholders })
    }

    /// The template text as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in order of appearance.
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Returns `true` if the template is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns `true` if the template declares a placeholder of this name.
    #[must_use]
    pub fn has_placeholder(&self, name: &str) -> bool {
        self.placeholders.iter().any(|p| p == name)
    }

    /// Substitute placeholder values, percent-encoding each one.
    ///
    /// # Errors
    ///
    /// Returns a binding error if any placeholder has no value.
    pub fn expand(&self, values: &[(String, String)]) -> Result<String> {
        let mut path = self.raw.clone();
        for name in &self.placeholders {
            let value = values
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value)
                .ok_or_else(|| {
                    Error::binding(format!("no argument supplies path parameter `{name}`"))
                })?;
            let encoded = utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET).to_string();
            path = path.replace(&format!("{{{name}}}"), &encoded);
        }
        Ok(path)
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn scan_placeholders(template: &str) -> Result<Vec<String>> {
    let mut placeholders: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for ch in template.chars() {
        match (ch, current.as_mut()) {
            ('{', None) => current = Some(String::new()),
            ('{', Some(_)) | ('}', None) => {
                return Err(Error::binding(format!(
                    "malformed placeholder in path template `{template}`"
                )));
            }
            ('}', Some(name)) => {
                if name.is_empty() {
                    return Err(Error::binding(format!(
                        "malformed placeholder in path template `{template}`"
                    )));
                }
                if !placeholders.iter().any(|p| p == name) {
                    placeholders.push(name.clone());
                }
                current = None;
            }
            (c, Some(name)) => name.push(c),
            (_, None) => {}
        }
    }

    if current.is_some() {
        return Err(Error::binding(format!(
            "unclosed placeholder in path template `{template}`"
        )));
    }

    Ok(placeholders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_template() {
        let template = PathTemplate::parse("").expect("empty");
        assert!(template.is_empty());
        assert!(template.placeholders().is_empty());
        assert_eq!(template.expand(&[]).expect("expand"), "");
    }

    #[test]
    fn template_without_placeholders() {
        let template = PathTemplate::parse("/users").expect("plain");
        assert!(template.placeholders().is_empty());
        assert_eq!(template.expand(&[]).expect("expand"), "/users");
    }

    #[test]
    fn template_scans_placeholders_in_order() {
        let template = PathTemplate::parse("/users/{id}/posts/{post_id}").expect("template");
        assert_eq!(template.placeholders(), ["id", "post_id"]);
        assert!(template.has_placeholder("id"));
        assert!(!template.has_placeholder("name"));
    }

    #[test]
    fn expand_substitutes_values() {
        let template = PathTemplate::parse("/users/{id}/posts/{post_id}").expect("template");
        let path = template
            .expand(&[
                ("id".to_string(), "42".to_string()),
                ("post_id".to_string(), "7".to_string()),
            ])
            .expect("expand");
        assert_eq!(path, "/users/42/posts/7");
    }

    #[test]
    fn expand_percent_encodes() {
        let template = PathTemplate::parse("/search/{q}").expect("template");
        let path = template
            .expand(&[("q".to_string(), "a b/c?d".to_string())])
            .expect("expand");
        assert_eq!(path, "/search/a%20b%2Fc%3Fd");
    }

    #[test]
    fn expand_missing_value_fails() {
        let template = PathTemplate::parse("/users/{id}").expect("template");
        let err = template.expand(&[]).expect_err("missing value");
        assert!(err.is_binding());
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn unclosed_placeholder_fails() {
        let err = PathTemplate::parse("/users/{id").expect_err("unclosed");
        assert!(err.is_binding());
    }

    #[test]
    fn empty_placeholder_fails() {
        let err = PathTemplate::parse("/users/{}").expect_err("empty name");
        assert!(err.is_binding());
    }

    #[test]
    fn repeated_placeholder_listed_once() {
        let template = PathTemplate::parse("/{id}/copy/{id}").expect("template");
        assert_eq!(template.placeholders(), ["id"]);

        let path = template
            .expand(&[("id".to_string(), "9".to_string())])
            .expect("expand");
        assert_eq!(path, "/9/copy/9");
    }
}
