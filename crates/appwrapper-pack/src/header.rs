use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

pub const DEFAULT_API_VERSION: &str = "workload.codeflare.dev/v1beta2";
pub const DEFAULT_KIND: &str = "AppWrapper";
pub const DEFAULT_NAME: &str = "sample-appwrapper";
pub const DEFAULT_QUEUE_LABEL: &str = "kueue.x-k8s.io/queue-name";
pub const DEFAULT_QUEUE_NAME: &str = "default-queue";
pub const DEFAULT_ITEM_INDENT: &str = "  ";

/// Extra indentation applied to wrapped content beyond the item indent.
pub const CONTENT_INDENT: &str = "    ";

const MAX_NAME_LEN: usize = 253;

/// Boilerplate values for the enclosing AppWrapper resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppWrapperHeader {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub queue_label: String,
    pub queue_name: String,
    pub item_indent: String,
}

impl Default for AppWrapperHeader {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            kind: DEFAULT_KIND.to_string(),
            name: DEFAULT_NAME.to_string(),
            queue_label: DEFAULT_QUEUE_LABEL.to_string(),
            queue_name: DEFAULT_QUEUE_NAME.to_string(),
            item_indent: DEFAULT_ITEM_INDENT.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must not contain line breaks: {value:?}")]
    LineBreak { field: &'static str, value: String },

    #[error("item_indent must contain only spaces: {0:?}")]
    InvalidIndent(String),
}

impl AppWrapperHeader {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_queue_name(mut self, queue_name: impl Into<String>) -> Self {
        self.queue_name = queue_name.into();
        self
    }

    /// Renders the header, one element per line, each ending in `\n`.
    pub fn lines(&self) -> Vec<String> {
        let indent = &self.item_indent;
        vec![
            format!("apiVersion: {}\n", self.api_version),
            format!("kind: {}\n", self.kind),
            "metadata:\n".to_string(),
            format!("{indent}name: {}\n", self.name),
            format!("{indent}labels:\n"),
            format!("{indent}{indent}{}: {}\n", self.queue_label, self.queue_name),
            "spec:\n".to_string(),
            format!("{indent}components:\n"),
        ]
    }

    pub fn document_marker(&self) -> String {
        document_marker(&self.item_indent)
    }

    pub fn content_indent(&self) -> String {
        content_indent(&self.item_indent)
    }

    /// Rejects values that would break the rendered header text.
    pub fn validate(&self) -> Result<(), HeaderError> {
        let fields = [
            ("api_version", &self.api_version),
            ("kind", &self.kind),
            ("name", &self.name),
            ("queue_label", &self.queue_label),
            ("queue_name", &self.queue_name),
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(HeaderError::Empty { field });
            }
            if value.contains(['\n', '\r']) {
                return Err(HeaderError::LineBreak {
                    field,
                    value: value.clone(),
                });
            }
        }

        if self.item_indent.is_empty() || !self.item_indent.chars().all(|ch| ch == ' ') {
            return Err(HeaderError::InvalidIndent(self.item_indent.clone()));
        }

        Ok(())
    }

    /// Advisory checks on the resource name; the API server has the final say.
    pub fn name_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.name.len() > MAX_NAME_LEN {
            warnings.push(format!(
                "name is {} characters long, Kubernetes allows at most {MAX_NAME_LEN}",
                self.name.len()
            ));
        }

        if !dns_subdomain().is_match(&self.name) {
            warnings.push(format!(
                "name '{}' is not a valid DNS-1123 subdomain (lowercase alphanumerics, '-' and '.')",
                self.name
            ));
        }

        warnings
    }
}

/// The line that opens each wrapped component.
pub(crate) fn document_marker(item_indent: &str) -> String {
    format!("{item_indent}- template:\n")
}

pub(crate) fn content_indent(item_indent: &str) -> String {
    format!("{item_indent}{CONTENT_INDENT}")
}

fn dns_subdomain() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
            .expect("static DNS-1123 pattern")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_default_header() {
        let header = AppWrapperHeader::default().with_name("demo");
        assert_eq!(
            header.lines().concat(),
            "apiVersion: workload.codeflare.dev/v1beta2\n\
             kind: AppWrapper\n\
             metadata:\n  \
               name: demo\n  \
               labels:\n    \
                 kueue.x-k8s.io/queue-name: default-queue\n\
             spec:\n  \
               components:\n"
        );
    }

    #[test]
    fn marker_and_content_indent_follow_item_indent() {
        let header = AppWrapperHeader::default();
        assert_eq!(header.document_marker(), "  - template:\n");
        assert_eq!(header.content_indent(), "      ");
    }

    #[test]
    fn rejects_line_breaks_in_name() {
        let header = AppWrapperHeader::default().with_name("bad\nname");
        assert!(matches!(
            header.validate(),
            Err(HeaderError::LineBreak { field: "name", .. })
        ));
    }

    #[test]
    fn rejects_tab_indent() {
        let header = AppWrapperHeader {
            item_indent: "\t".to_string(),
            ..AppWrapperHeader::default()
        };
        assert_eq!(
            header.validate(),
            Err(HeaderError::InvalidIndent("\t".to_string()))
        );
    }

    #[test]
    fn warns_on_non_dns_names() {
        assert!(AppWrapperHeader::default().name_warnings().is_empty());
        assert!(AppWrapperHeader::default()
            .with_name("my.job-1")
            .name_warnings()
            .is_empty());
        assert_eq!(
            AppWrapperHeader::default()
                .with_name("My_Job")
                .name_warnings()
                .len(),
            1
        );
    }
}
