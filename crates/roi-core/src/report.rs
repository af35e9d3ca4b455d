//! Report download helpers
//!
//! Email pattern check, the report request body, and filename extraction
//! from a `Content-Disposition` header.

use crate::error::ValidationError;
use crate::inputs::{SimulationInputs, SimulationRequest};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Filename used when the server does not provide a usable one
pub const DEFAULT_REPORT_FILENAME: &str = "roi_report.pdf";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]+$")
        .expect("email pattern is valid")
});

/// Simple email shape check: `local@domain.tld`
///
/// This is not policy enforcement; the server has the final word. A
/// single-letter top-level segment is accepted, so `a@b.c` passes.
#[inline]
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Body of `POST /api/report/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub email: String,
    #[serde(flatten)]
    pub inputs: SimulationRequest,
}

impl ReportRequest {
    /// Validate the email and inputs
    pub fn new(email: &str, inputs: &SimulationInputs) -> Result<Self, ValidationError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }
        Ok(Self {
            email: email.to_string(),
            inputs: inputs.to_request()?,
        })
    }
}

/// Extract a filename from a `Content-Disposition` value
///
/// The RFC 5987 `filename*=charset'lang'value` form wins over the plain
/// `filename=` form. The result is reduced to its last path component;
/// `None` when nothing usable is present.
#[must_use]
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in split_params(header).into_iter().skip(1) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "filename*" => extended = decode_extended(value.trim()),
            "filename" => plain = Some(unquote(value.trim())),
            _ => {}
        }
    }

    extended
        .and_then(|name| sanitize_filename(&name))
        .or_else(|| plain.and_then(|name| sanitize_filename(&name)))
}

/// Filename for a downloaded report, falling back to `default`
#[must_use]
pub fn report_filename(header: Option<&str>, default: &str) -> String {
    header
        .and_then(filename_from_content_disposition)
        .unwrap_or_else(|| default.to_string())
}

/// Split on `;` outside of quoted strings
fn split_params(header: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for ch in header.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => {
                current.push(ch);
                escaped = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ';' if !in_quotes => params.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    params.push(current);
    params
}

fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn decode_extended(value: &str) -> Option<String> {
    let value = value.trim_matches('"');
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?.to_ascii_lowercase();
    let _language = parts.next()?;
    let encoded = parts.next()?;

    let bytes = percent_decode(encoded)?;
    match charset.as_str() {
        "utf-8" | "" => String::from_utf8(bytes).ok(),
        "iso-8859-1" => Some(bytes.into_iter().map(char::from).collect()),
        _ => None,
    }
}

fn percent_decode(encoded: &str) -> Option<Vec<u8>> {
    let raw = encoded.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let hex = encoded.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    Some(out)
}

fn sanitize_filename(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    if last.is_empty() || last == "." || last == ".." || last.chars().any(char::is_control) {
        return None;
    }
    Some(last.to_string())
}
