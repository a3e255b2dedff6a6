use crate::header::{Header, HeaderEntry, HeaderValue};
use crate::prelude::FormatError;
use crate::telemetry::log::LogManager;

const EOH_MARKER: &[u8] = b"EOH";
const LINE_TERMINATOR: &str = "\r\n";

/// Splits a raw capture at the EOH marker and parses the text header.
pub struct HeaderParser {
    logger: LogManager,
}

impl HeaderParser {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }

    /// Parses the header region and returns it with the remaining image bytes.
    ///
    /// The header region runs up to and including the line terminator that
    /// follows the `EOH` marker; everything after it is the image region.
    pub fn parse<'a>(&self, raw: &'a [u8]) -> Result<(Header, &'a [u8]), FormatError> {
        let marker = find(raw, EOH_MARKER).ok_or(FormatError::MissingEohMarker)?;
        let terminator = find(&raw[marker..], LINE_TERMINATOR.as_bytes())
            .ok_or(FormatError::MissingEohMarker)?;
        let boundary = marker + terminator + LINE_TERMINATOR.len();

        let header = self.parse_lines(&raw[..boundary], boundary);
        Ok((header, &raw[boundary..]))
    }

    fn parse_lines(&self, region: &[u8], boundary: usize) -> Header {
        let mut header = Header::new();
        let mut missing_descriptions: Vec<String> = Vec::new();

        // Header text is Latin-1, so a byte-to-char widening is lossless.
        let text: String = region.iter().map(|&byte| byte as char).collect();
        let mut lines: Vec<&str> = text.split(LINE_TERMINATOR).collect();
        if lines.last() == Some(&"") {
            lines.pop();
        }

        for line in lines {
            if line.starts_with("CC") || line.starts_with("**") {
                continue;
            }

            let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
            let Some((key, rest)) = collapsed.split_once(' ') else {
                self.logger
                    .debug(&format!("found no value, skipping: {:?}", collapsed));
                continue;
            };

            let (value, description) = match rest.find("CC") {
                Some(index) => (rest[..index].trim(), rest[index + 2..].trim()),
                None => {
                    missing_descriptions.push(key.to_string());
                    (rest.trim(), "N/A")
                }
            };

            header.insert(key, HeaderEntry::new(auto_type(value), description));
        }

        header.insert(
            "EOH",
            HeaderEntry::new(
                HeaderValue::Int(boundary as i64),
                "End of Header character position",
            ),
        );

        if !missing_descriptions.is_empty() {
            self.logger.debug(&format!(
                "no description for header keys: {:?}",
                missing_descriptions
            ));
        }

        header
    }
}

impl Default for HeaderParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Coerces a header value string into its natural scalar type.
///
/// Tried in order: integer, float, boolean, text. A string of decimal digits
/// must land on the integer branch and never fall through to float.
pub fn auto_type(text: &str) -> HeaderValue {
    if !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit()) {
        // A digit string is an integer or nothing; letting one wider than
        // i64 reach the float branch would round it.
        return match text.parse::<i64>() {
            Ok(value) => HeaderValue::Int(value),
            Err(_) => HeaderValue::Text(text.to_string()),
        };
    }
    if let Ok(value) = text.parse::<f64>() {
        return HeaderValue::Float(value);
    }
    if text.eq_ignore_ascii_case("true") {
        return HeaderValue::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return HeaderValue::Bool(false);
    }
    HeaderValue::Text(text.to_string())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
