//! Logical-line tokenizer for Wavefront statement files.
//!
//! Both `.obj` and `.mtl` are line-oriented statement languages. The reader
//! turns a byte stream into logical lines:
//! - physical lines ending in `\` (trailing whitespace permitted after it)
//!   are joined with the following physical line, before comment stripping,
//! - `#` starts a comment running to end of line,
//! - tokens are split on runs of spaces and tabs; blank lines are skipped,
//! - a UTF-8 byte-order mark at stream start is discarded.
//!
//! Token byte spans are retained so a consumer can recover the raw remainder
//! of a line verbatim (the material reader needs this for map filenames).
//!
//! When header capture is enabled, a contiguous run of comment-only lines at
//! the very start of the stream is collected as free-text header (leading `#`
//! and one following space stripped per line); a blank comment or the first
//! non-comment line ends the run.

use std::io::BufRead;

use crate::error::WavefrontError;

/// A logical (continuation-joined, comment-stripped) line with at least one
/// token.
#[derive(Debug, Clone)]
pub struct LogicalLine {
    number: usize,
    text: String,
    spans: Vec<(usize, usize)>,
}

impl LogicalLine {
    /// Physical line number where this logical line starts (1-indexed).
    pub fn number(&self) -> usize {
        self.number
    }

    /// The first token, selecting the statement handler.
    pub fn keyword(&self) -> &str {
        self.token(0).unwrap_or("")
    }

    /// Number of tokens on the line (keyword included).
    pub fn token_count(&self) -> usize {
        self.spans.len()
    }

    /// Get the `i`-th token.
    pub fn token(&self, i: usize) -> Option<&str> {
        self.spans.get(i).map(|&(start, end)| &self.text[start..end])
    }

    /// All tokens on the line, keyword included.
    pub fn tokens(&self) -> Vec<&str> {
        self.spans
            .iter()
            .map(|&(start, end)| &self.text[start..end])
            .collect()
    }

    /// The raw line text from the start of token `from` through the end of
    /// the line, trailing whitespace removed. Internal whitespace runs are
    /// preserved exactly as written.
    pub fn rest_verbatim(&self, from: usize) -> &str {
        match self.spans.get(from) {
            Some(&(start, _)) => self.text[start..].trim_end_matches([' ', '\t']),
            None => "",
        }
    }
}

/// Reader producing a lazy sequence of [`LogicalLine`]s from a byte stream.
pub struct LineReader<R> {
    inner: R,
    line_number: usize,
    in_header: bool,
    header: String,
}

impl<R: BufRead> LineReader<R> {
    /// Create a line reader with header capture disabled.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line_number: 0,
            in_header: false,
            header: String::new(),
        }
    }

    /// Create a line reader that captures a leading comment run as header
    /// text, retrievable through [`LineReader::header`].
    pub fn with_header_capture(inner: R) -> Self {
        Self {
            inner,
            line_number: 0,
            in_header: true,
            header: String::new(),
        }
    }

    /// The captured header text, if any line contributed to it.
    pub fn header(&self) -> Option<&str> {
        if self.header.is_empty() {
            None
        } else {
            Some(&self.header)
        }
    }

    /// Read the next physical line, without its line terminator.
    /// Returns `None` at end of input.
    fn read_physical(&mut self) -> Result<Option<String>, WavefrontError> {
        let mut buf = String::new();
        if self.inner.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        while buf.ends_with('\n') || buf.ends_with('\r') {
            buf.pop();
        }
        if self.line_number == 1 {
            if let Some(stripped) = buf.strip_prefix('\u{feff}') {
                buf = stripped.to_string();
            }
        }
        Ok(Some(buf))
    }

    /// Get the next logical line, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<LogicalLine>, WavefrontError> {
        loop {
            let mut text = match self.read_physical()? {
                Some(line) => line,
                None => return Ok(None),
            };
            let number = self.line_number;

            // Join continuations before stripping comments, chaining across
            // as many physical lines as end in a backslash.
            loop {
                let trimmed_len = text.trim_end_matches([' ', '\t']).len();
                if !text[..trimmed_len].ends_with('\\') {
                    break;
                }
                text.truncate(trimmed_len - 1);
                match self.read_physical()? {
                    Some(next) => text.push_str(&next),
                    None => break,
                }
            }

            if self.in_header {
                let lead = text.trim_start_matches([' ', '\t']);
                if let Some(comment) = lead.strip_prefix('#') {
                    if comment.trim().is_empty() {
                        // A blank comment ends the header run.
                        self.in_header = false;
                    } else {
                        let stripped = comment.strip_prefix(' ').unwrap_or(comment);
                        if !self.header.is_empty() {
                            self.header.push('\n');
                        }
                        self.header.push_str(stripped);
                    }
                    continue;
                }
                self.in_header = false;
            }

            if let Some(pos) = text.find('#') {
                text.truncate(pos);
            }

            let spans = token_spans(&text);
            if spans.is_empty() {
                continue;
            }
            return Ok(Some(LogicalLine {
                number,
                text,
                spans,
            }));
        }
    }
}

/// Byte spans of whitespace-delimited tokens in `text`.
fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        if c == ' ' || c == '\t' {
            if let Some(s) = start.take() {
                spans.push((s, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &str) -> Vec<Vec<String>> {
        let mut reader = LineReader::new(input.as_bytes());
        let mut out = Vec::new();
        while let Some(line) = reader.next_line().unwrap() {
            out.push(line.tokens().iter().map(|t| t.to_string()).collect());
        }
        out
    }

    #[test]
    fn test_tokens_and_blank_lines() {
        let got = lines("v 1 2 3\n\n  \t\nf 1 2 3\n");
        assert_eq!(got, vec![vec!["v", "1", "2", "3"], vec!["f", "1", "2", "3"]]);
    }

    #[test]
    fn test_comment_stripping() {
        let got = lines("v 1 2 3 # a comment\n# whole line\nvn 0 1 0");
        assert_eq!(got, vec![vec!["v", "1", "2", "3"], vec!["vn", "0", "1", "0"]]);
    }

    #[test]
    fn test_continuation_joining() {
        let got = lines("f 1 2 \\\n3 4\n");
        assert_eq!(got, vec![vec!["f", "1", "2", "3", "4"]]);
    }

    #[test]
    fn test_continuation_chains_and_allows_trailing_whitespace() {
        let got = lines("f 1 \\  \n2 \\\n3\n");
        assert_eq!(got, vec![vec!["f", "1", "2", "3"]]);
    }

    #[test]
    fn test_continuation_joined_before_comment() {
        // The comment on the continued line hides the rest of the join.
        let got = lines("f 1 2 \\\n3 # 4\n");
        assert_eq!(got, vec![vec!["f", "1", "2", "3"]]);
    }

    #[test]
    fn test_line_numbers() {
        let mut reader = LineReader::new("v 0 0 0\n\nf 1 \\\n2\np 1".as_bytes());
        let mut numbers = Vec::new();
        while let Some(line) = reader.next_line().unwrap() {
            numbers.push(line.number());
        }
        assert_eq!(numbers, vec![1, 3, 5]);
    }

    #[test]
    fn test_bom_stripped() {
        let got = lines("\u{feff}v 1 2 3\n");
        assert_eq!(got, vec![vec!["v", "1", "2", "3"]]);
    }

    #[test]
    fn test_rest_verbatim() {
        let mut reader = LineReader::new("map_Ka -o 1 2 3 b   b  \n".as_bytes());
        let line = reader.next_line().unwrap().unwrap();
        assert_eq!(line.rest_verbatim(5), "b   b");
        assert_eq!(line.rest_verbatim(99), "");
    }

    #[test]
    fn test_header_capture() {
        let input = "# first line\n# second line\n#\nnewmtl a\n";
        let mut reader = LineReader::with_header_capture(input.as_bytes());
        let line = reader.next_line().unwrap().unwrap();
        assert_eq!(line.keyword(), "newmtl");
        assert_eq!(reader.header(), Some("first line\nsecond line"));
    }

    #[test]
    fn test_header_ends_at_first_statement() {
        let input = "# head\nnewmtl a\n# not header\nKa 1 1 1\n";
        let mut reader = LineReader::with_header_capture(input.as_bytes());
        let mut keywords = Vec::new();
        while let Some(line) = reader.next_line().unwrap() {
            keywords.push(line.keyword().to_string());
        }
        assert_eq!(keywords, vec!["newmtl", "Ka"]);
        assert_eq!(reader.header(), Some("head"));
    }

    #[test]
    fn test_no_header_capture_by_default() {
        let mut reader = LineReader::new("# head\nv 0 0 0\n".as_bytes());
        reader.next_line().unwrap();
        assert_eq!(reader.header(), None);
    }
}
