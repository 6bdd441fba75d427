//! HTTP request decoding and representation
//!
//! The decoder is best-effort by design: malformed input never produces an
//! error or a panic, it degrades to a partially populated (or empty)
//! [`Request`] and at most logs what it skipped. The connection handler owns
//! error reporting; by the time bytes reach [`Request::decode`] there is
//! nothing left to fail.

use std::collections::HashMap;

use super::constants::{headers, CRLF, DOUBLE_CRLF};

/// Request headers, folded to unique keys
pub type Headers = HashMap<String, String>;

/// A decoded multipart file: flat map of `name`, `filename` (when present)
/// and the reserved `content` key holding the raw file bytes-as-string.
pub type FileRecord = HashMap<String, String>;

/// A decoded HTTP request
///
/// Built once per accepted connection and immutable afterwards. When the
/// request line is unparsable, `method`, `url` and `http_version` stay empty;
/// that is not a decode error.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Header map; repeated wire headers are folded into one value joined by `"; "`
    pub headers: Headers,
    /// Decoded form/multipart key-value pairs
    pub map_params: HashMap<String, String>,
    /// Decoded files, in order of appearance
    pub files: Vec<FileRecord>,
    /// Raw body, preserved verbatim regardless of content type
    pub params: String,
    pub method: String,
    pub url: String,
    pub http_version: String,
}

impl Request {
    /// Decode raw bytes received from one connection into a `Request`.
    ///
    /// Never fails: an empty buffer yields an all-empty request, an
    /// unparsable request line leaves method/url/version empty, and body
    /// decode faults are logged and degrade to empty params/files.
    pub fn decode(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);

        // Everything after the FIRST double separator is body, embedded
        // double separators included - multipart encodings contain them.
        let (header_block, body) = match text.split_once(DOUBLE_CRLF) {
            Some((header_block, body)) => (header_block, body),
            None => (text.as_ref(), ""),
        };

        let mut lines = header_block.split(CRLF);

        let mut method = String::new();
        let mut url = String::new();
        let mut http_version = String::new();
        if let Some(request_line) = lines.next() {
            if request_line.contains("HTTP/1") {
                let mut tokens = request_line.split(' ');
                if let (Some(m), Some(u), Some(v)) = (tokens.next(), tokens.next(), tokens.next())
                {
                    method = m.to_string();
                    url = u.to_string();
                    http_version = v.to_string();
                }
            }
        }

        let request_headers = parse_headers(lines);

        let content_type =
            request_headers.get(headers::CONTENT_TYPE).map(String::as_str).unwrap_or("");
        let (map_params, files) = decode_body(body, content_type);

        Request {
            headers: request_headers,
            map_params,
            files,
            params: body.to_string(),
            method,
            url,
            http_version,
        }
    }

    /// Get a header value by its exact (folded) key
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Fold header lines into a unique-key map.
///
/// Lines without a `": "` separator (including blank ones) are ignored.
/// Duplicate keys keep one entry, values joined by `"; "` in wire order.
fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Headers {
    let mut parsed = Headers::new();

    for line in lines {
        if let Some((key, value)) = line.split_once(": ") {
            parsed
                .entry(key.to_string())
                .and_modify(|existing| {
                    existing.push_str("; ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
    }

    parsed
}

/// Decode the body according to the folded `Content-Type` value.
///
/// Matching is by substring containment so parameter-bearing values like
/// `application/json; charset=utf-8` still match. JSON (and any unknown
/// type) is left for the handler to decode from the raw body.
fn decode_body(body: &str, content_type: &str) -> (HashMap<String, String>, Vec<FileRecord>) {
    if content_type.contains("application/json") {
        (HashMap::new(), Vec::new())
    } else if content_type.contains("application/x-www-form-urlencoded") {
        (decode_form_params(body), Vec::new())
    } else if content_type.contains("multipart/form-data") {
        match parse_boundary(content_type) {
            Some(boundary) => decode_multipart(body, &boundary),
            None => {
                log::error!("multipart request without a boundary parameter, body not decoded");
                (HashMap::new(), Vec::new())
            }
        }
    } else {
        (HashMap::new(), Vec::new())
    }
}

/// Decode an `application/x-www-form-urlencoded` body.
///
/// Each `&`-separated segment is split once at the first `=`; a value
/// containing further `=` characters is kept as-is. Segments without `=`
/// are skipped.
fn decode_form_params(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for segment in body.split('&') {
        if let Some((key, value)) = segment.split_once('=') {
            params.insert(key.to_string(), value.to_string());
        }
    }

    params
}

/// Extract the `boundary` parameter from a `multipart/form-data` content type.
///
/// Takes the second `"; "`-separated segment and everything after its `=`.
/// Returns `None` when the parameter is missing or empty.
fn parse_boundary(content_type: &str) -> Option<String> {
    let segment = content_type.split("; ").nth(1)?;
    let (_, value) = segment.split_once('=')?;

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Decode a `multipart/form-data` body by splitting on the literal boundary.
///
/// Empty segments and the `"--"` terminator artifact are discarded. A
/// segment carrying a `filename` token becomes a [`FileRecord`] with all its
/// attribute tokens plus the raw field content under `content`; any other
/// segment contributes its `name` token as a `map_params` key with the field
/// content (trailing line separator trimmed) as value.
fn decode_multipart(body: &str, boundary: &str) -> (HashMap<String, String>, Vec<FileRecord>) {
    let mut params = HashMap::new();
    let mut files = Vec::new();

    for segment in body.split(boundary) {
        if segment.is_empty() || segment == "--" {
            continue;
        }

        let Some((field_header, field_content)) = segment.split_once(DOUBLE_CRLF) else {
            log::warn!("multipart segment without a header/content separator, skipped");
            continue;
        };

        // First token is the `Content-Disposition: form-data` prefix.
        let tokens: Vec<(&str, &str)> = field_header
            .split("; ")
            .skip(1)
            .filter_map(|token| token.split_once('='))
            .map(|(key, value)| (trim_quotes(key), trim_quotes(value)))
            .collect();

        if tokens.iter().any(|(key, _)| *key == "filename") {
            let mut file = FileRecord::new();
            for (key, value) in &tokens {
                file.insert((*key).to_string(), (*value).to_string());
            }
            file.insert("content".to_string(), field_content.to_string());
            files.push(file);
        } else if let Some((_, name)) = tokens.iter().find(|(key, _)| *key == "name") {
            params.insert(
                (*name).to_string(),
                field_content.trim_end_matches(CRLF).to_string(),
            );
        }
    }

    (params, files)
}

fn trim_quotes(token: &str) -> &str {
    token.trim_matches('"')
}
