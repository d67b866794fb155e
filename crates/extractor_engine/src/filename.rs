use sha2::{Digest, Sha256};

/// Filename for a downloaded file: the server's suggestion when usable,
/// otherwise `audio--{short_hash(task_id)}.mp3`.
pub fn download_filename(content_disposition: Option<&str>, task_id: &str) -> String {
    content_disposition
        .and_then(filename_from_disposition)
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("audio--{}.mp3", short_hash(task_id)))
}

/// Extracts the filename from a `Content-Disposition` header value.
///
/// `filename*=UTF-8''...` wins over plain `filename=`, matching how browsers
/// pick the name.
pub fn filename_from_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;
    for param in split_params(value) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let raw = raw.trim();
                let encoded = match raw.split_once("''") {
                    Some((charset, rest)) if charset.eq_ignore_ascii_case("utf-8") => rest,
                    Some(_) => continue,
                    None => raw,
                };
                if let Ok(decoded) = urlencoding::decode(encoded) {
                    extended = Some(decoded.into_owned());
                }
            }
            "filename" => {
                plain = Some(unquote(raw.trim()));
            }
            _ => {}
        }
    }
    extended.or(plain).filter(|name| !name.trim().is_empty())
}

/// Splits header parameters on `;`, leaving `;` inside quoted strings alone.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(value[start..].trim());
    params
}

/// Strips surrounding quotes and resolves `\x` escapes of a quoted string.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .map(|rest| rest.strip_suffix('"').unwrap_or(rest))
    else {
        return raw.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn sanitize_filename(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    // Collapse multiple underscores
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    if compacted.chars().count() > 120 {
        compacted = compacted.chars().take(120).collect();
    }
    let stem = compacted.split('.').next().unwrap_or_default();
    if is_reserved_windows_name(stem) {
        compacted.insert(stem.len(), '_');
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
