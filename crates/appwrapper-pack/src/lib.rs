//! Wraps multi-document Kubernetes YAML into the `components` list of an
//! AppWrapper resource.
//!
//! The transformation is purely line-oriented: documents are delimited by
//! `---` lines, blank lines are dropped, and every other line is re-indented
//! under a `- template:` marker. Nothing is parsed as YAML.

pub mod config;
pub mod fs;
mod header;
mod line;
mod state;

pub use config::{Config, ConfigError, ConfigSource, ConfigSourceKind, LoadOptions};
pub use header::{AppWrapperHeader, HeaderError};

use line::LineRecord;
use state::{Action, State};

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
};
use tracing::debug;

/// Counts gathered during a single wrapping pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrapSummary {
    pub documents: usize,
    pub content_lines: usize,
    pub blank_lines: usize,
    pub separators: usize,
}

/// Wraps `lines` under `header`, returning one element per output line.
///
/// Input lines may or may not carry their terminator. Content lines keep the
/// terminator they had; an unterminated line gets `\n` unless it is the last
/// input line, so the concatenated output is always well-formed.
pub fn wrap<I, S>(lines: I, header: &[String], item_indent: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let marker = header::document_marker(item_indent);
    let content_indent = header::content_indent(item_indent);

    let mut output: Vec<String> = header.to_vec();
    let mut state = State::new();
    let mut lines = lines.into_iter().peekable();

    while let Some(raw) = lines.next() {
        let line = LineRecord::new(raw.as_ref());
        if let Action::Content { start_document } = state.observe(&line) {
            if start_document {
                output.push(marker.clone());
            }
            let ending = match line.ending {
                "" if lines.peek().is_some() => "\n",
                ending => ending,
            };
            output.push(format!("{content_indent}{}{ending}", line.text));
        }
    }

    output
}

/// Wraps a whole input string.
pub fn wrap_str(input: &str, header: &AppWrapperHeader) -> String {
    wrap(
        line::split_lines(input),
        &header.lines(),
        &header.item_indent,
    )
    .concat()
}

/// Streams `reader` into `writer`, one line at a time.
pub fn wrap_reader<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    header: &AppWrapperHeader,
) -> io::Result<WrapSummary> {
    for header_line in header.lines() {
        writer.write_all(header_line.as_bytes())?;
    }

    let marker = header.document_marker();
    let content_indent = header.content_indent();
    let mut state = State::new();
    let mut buffer = String::new();

    while let Some(line) = line::read_line(reader, &mut buffer)? {
        if let Action::Content { start_document } = state.observe(&line) {
            if start_document {
                writer.write_all(marker.as_bytes())?;
            }
            writer.write_all(content_indent.as_bytes())?;
            writer.write_all(line.text.as_bytes())?;
            writer.write_all(line.ending.as_bytes())?;
        }
    }

    let summary = state.finalize();
    debug!(
        documents = summary.documents,
        content_lines = summary.content_lines,
        blank_lines = summary.blank_lines,
        separators = summary.separators,
        "wrapped input"
    );
    Ok(summary)
}

pub fn wrap_path(path: &Path, header: &AppWrapperHeader) -> io::Result<(String, WrapSummary)> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut output = Vec::new();
    let summary = wrap_reader(&mut reader, &mut output, header)?;
    let text = String::from_utf8(output)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok((text, summary))
}
