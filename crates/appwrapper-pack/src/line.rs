use std::io::{self, BufRead};

pub const SEPARATOR: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Separator,
    Blank,
    Content,
}

/// One input line with its terminator split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub text: String,
    pub ending: &'static str,
}

impl LineRecord {
    pub fn new(raw: &str) -> Self {
        let (text, ending) = split_ending(raw);
        Self {
            text: text.to_string(),
            ending,
        }
    }

    pub fn kind(&self) -> LineKind {
        classify(&self.text)
    }
}

/// Classifies a line whose terminator has already been removed.
pub fn classify(text: &str) -> LineKind {
    if text == SEPARATOR {
        LineKind::Separator
    } else if text.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Content
    }
}

pub fn split_ending(raw: &str) -> (&str, &'static str) {
    if let Some(stripped) = raw.strip_suffix("\r\n") {
        (stripped, "\r\n")
    } else if let Some(stripped) = raw.strip_suffix('\n') {
        (stripped, "\n")
    } else {
        (raw, "")
    }
}

/// Splits a string into raw lines, each keeping its own terminator.
pub fn split_lines(input: &str) -> impl Iterator<Item = &str> {
    input.split_inclusive('\n')
}

/// Reads the next line into `buffer`, returning `None` at end of input.
pub fn read_line<R: BufRead>(reader: &mut R, buffer: &mut String) -> io::Result<Option<LineRecord>> {
    buffer.clear();
    let bytes_read = reader.read_line(buffer)?;
    if bytes_read == 0 {
        return Ok(None);
    }
    Ok(Some(LineRecord::new(buffer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str) -> Vec<LineRecord> {
        let mut reader = Cursor::new(input);
        let mut buffer = String::new();
        let mut lines = Vec::new();
        while let Some(line) = read_line(&mut reader, &mut buffer).unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn classifies_separator_only_on_exact_match() {
        assert_eq!(classify("---"), LineKind::Separator);
        assert_eq!(classify("--- # comment"), LineKind::Content);
        assert_eq!(classify(" ---"), LineKind::Content);
        assert_eq!(classify("----"), LineKind::Content);
    }

    #[test]
    fn whitespace_only_lines_are_content() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("  "), LineKind::Content);
        assert_eq!(classify("\t"), LineKind::Content);
    }

    #[test]
    fn keeps_original_terminator() {
        let lines = read_all("a: 1\r\n---\r\n\nb: 2");

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].text, "a: 1");
        assert_eq!(lines[0].ending, "\r\n");
        assert_eq!(lines[1].kind(), LineKind::Separator);
        assert_eq!(lines[2].kind(), LineKind::Blank);
        assert_eq!(lines[3].text, "b: 2");
        assert_eq!(lines[3].ending, "");
    }

    #[test]
    fn split_lines_matches_reader() {
        let input = "a\n\nb";
        let split: Vec<LineRecord> = split_lines(input).map(LineRecord::new).collect();
        let read = read_all(input);
        assert_eq!(split, read);
    }
}
