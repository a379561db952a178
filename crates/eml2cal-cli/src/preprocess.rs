//! Header rewriting applied before extraction.
//!
//! Some forwarding setups bury the interesting headers (the original
//! sender, mostly) under custom names the extractor does not look at. The
//! `preprocess.headers` table maps a source header to the destination
//! header whose value it should replace.

use std::collections::HashMap;

use tracing::debug;

/// Applies the configured header copies to a raw email.
///
/// For each `source -> destination` entry whose source header is present,
/// the destination header is overwritten with the source's value (or
/// appended if the email has no such header). The body is left untouched.
pub fn preprocess_email(raw: &[u8], headers: &HashMap<String, String>) -> Vec<u8> {
    if headers.is_empty() {
        return raw.to_vec();
    }
    let (header_block, body) = split_message(raw);
    let mut parsed = parse_headers(header_block);

    // Sort for a deterministic outcome when several copies target the
    // same destination.
    let mut sources: Vec<&String> = headers.keys().collect();
    sources.sort();
    for source in sources {
        let destination = &headers[source];
        let Some(value) = parsed
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(source))
            .map(|(_, value)| value.clone())
        else {
            continue;
        };
        debug!(from = %source, to = %destination, "copying header");
        match parsed
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(destination))
        {
            Some(entry) => entry.1 = value,
            None => parsed.push((destination.clone(), value)),
        }
    }

    let mut rebuilt = Vec::with_capacity(raw.len());
    for (name, value) in &parsed {
        rebuilt.extend_from_slice(name.as_bytes());
        rebuilt.extend_from_slice(b": ");
        rebuilt.extend_from_slice(value.as_bytes());
        rebuilt.extend_from_slice(b"\r\n");
    }
    rebuilt.extend_from_slice(b"\r\n");
    rebuilt.extend_from_slice(body);
    rebuilt
}

/// Splits a message into its header block and body (excluding the blank
/// separator line).
fn split_message(raw: &[u8]) -> (&[u8], &[u8]) {
    if let Some(pos) = find(raw, b"\r\n\r\n") {
        (&raw[..pos], &raw[pos + 4..])
    } else if let Some(pos) = find(raw, b"\n\n") {
        (&raw[..pos], &raw[pos + 2..])
    } else {
        (raw, &[])
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Parses logical header lines, folding continuation lines into the
/// preceding header's value.
fn parse_headers(block: &[u8]) -> Vec<(String, String)> {
    let mut parsed: Vec<(String, String)> = Vec::new();
    for line in String::from_utf8_lossy(block).lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = parsed.last_mut() {
                last.1.push(' ');
                last.1.push_str(line.trim_start());
            }
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            parsed.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const EMAIL: &[u8] = b"From: forwarder@example.com\r\n\
X-Original-From: Airline <noreply@airline.example>\r\n\
Subject: Fwd: Your booking\r\n\
\r\n\
Body text here.\r\n";

    #[test]
    fn copies_header_over_existing() {
        let headers = header_map(&[("X-Original-From", "From")]);
        let result = preprocess_email(EMAIL, &headers);
        let text = String::from_utf8(result).unwrap();
        assert!(text.contains("From: Airline <noreply@airline.example>\r\n"));
        assert!(!text.contains("forwarder@example.com"));
        assert!(text.contains("X-Original-From: Airline <noreply@airline.example>\r\n"));
        assert!(text.ends_with("\r\n\r\nBody text here.\r\n"));
    }

    #[test]
    fn appends_header_when_destination_absent() {
        let headers = header_map(&[("Subject", "X-Derived-Subject")]);
        let result = preprocess_email(EMAIL, &headers);
        let text = String::from_utf8(result).unwrap();
        assert!(text.contains("X-Derived-Subject: Fwd: Your booking\r\n"));
    }

    #[test]
    fn absent_source_is_a_no_op() {
        let headers = header_map(&[("X-No-Such-Header", "From")]);
        let result = preprocess_email(EMAIL, &headers);
        let text = String::from_utf8(result).unwrap();
        assert!(text.contains("From: forwarder@example.com\r\n"));
    }

    #[test]
    fn empty_config_returns_input_unchanged() {
        let result = preprocess_email(EMAIL, &HashMap::new());
        assert_eq!(result, EMAIL);
    }

    #[test]
    fn continuation_lines_are_folded() {
        let email = b"Subject: a very\r\n long subject\r\nFrom: a@b.c\r\n\r\nbody";
        let headers = header_map(&[("Subject", "X-Copy")]);
        let result = preprocess_email(email, &headers);
        let text = String::from_utf8(result).unwrap();
        assert!(text.contains("X-Copy: a very long subject\r\n"));
    }

    #[test]
    fn handles_lf_only_messages() {
        let email = b"From: a@b.c\nX-Real: real@b.c\n\nbody\n";
        let headers = header_map(&[("X-Real", "From")]);
        let result = preprocess_email(email, &headers);
        let text = String::from_utf8(result).unwrap();
        assert!(text.contains("From: real@b.c\r\n"));
        assert!(text.ends_with("\r\n\r\nbody\n"));
    }
}
