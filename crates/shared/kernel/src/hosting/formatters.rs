use super::error::ErrorBody;
use crate::domain::constants::{JSON_MEDIA_TYPE, XML_MEDIA_TYPE};
use axum::http::HeaderValue;
use std::fmt::Write;

/// Body serializers available for content negotiation of error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTypeFormatter {
    Json,
    Xml,
}

impl MediaTypeFormatter {
    #[must_use]
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Json => JSON_MEDIA_TYPE,
            Self::Xml => XML_MEDIA_TYPE,
        }
    }

    #[must_use]
    pub fn format(self, body: &ErrorBody<'_>) -> Vec<u8> {
        match self {
            Self::Json => serde_json::to_vec(body).unwrap_or_default(),
            Self::Xml => format_xml(body).into_bytes(),
        }
    }
}

/// Ordered formatter collection; the first entry is the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTypeFormatters {
    formatters: Vec<MediaTypeFormatter>,
}

impl Default for MediaTypeFormatters {
    fn default() -> Self {
        Self { formatters: vec![MediaTypeFormatter::Json, MediaTypeFormatter::Xml] }
    }
}

impl MediaTypeFormatters {
    /// Removes a formatter. Returns `true` when it was present.
    pub fn remove(&mut self, formatter: MediaTypeFormatter) -> bool {
        let before = self.formatters.len();
        self.formatters.retain(|f| *f != formatter);
        before != self.formatters.len()
    }

    #[must_use]
    pub fn contains(&self, formatter: MediaTypeFormatter) -> bool {
        self.formatters.contains(&formatter)
    }

    pub fn iter(&self) -> impl Iterator<Item = MediaTypeFormatter> + '_ {
        self.formatters.iter().copied()
    }

    /// Picks the first registered formatter named in `Accept`, falling back to
    /// the first registered one (JSON when the collection is empty).
    #[must_use]
    pub fn negotiate(&self, accept: Option<&HeaderValue>) -> MediaTypeFormatter {
        let fallback = self.formatters.first().copied().unwrap_or(MediaTypeFormatter::Json);
        let Some(accept) = accept.and_then(|v| v.to_str().ok()) else {
            return fallback;
        };

        accept
            .split(',')
            .filter_map(|range| range.split(';').next())
            .map(str::trim)
            .find_map(|range| self.iter().find(|f| f.media_type().eq_ignore_ascii_case(range)))
            .unwrap_or(fallback)
    }
}

fn format_xml(body: &ErrorBody<'_>) -> String {
    let mut out = String::from("<Error>");
    let _ = write!(out, "<Code>{}</Code>", escape_xml(body.error.code));
    let _ = write!(out, "<Message>{}</Message>", escape_xml(body.error.message));
    if let Some(detail) = body.error.detail {
        let _ = write!(out, "<Detail>{}</Detail>", escape_xml(detail));
    }
    out.push_str("</Error>");
    out
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::error::{ErrorBody, ErrorBodyInner};

    fn body() -> ErrorBody<'static> {
        ErrorBody {
            error: ErrorBodyInner { code: "BAD_REQUEST", message: "a < b", detail: None },
        }
    }

    #[test]
    fn removing_xml_leaves_json_only() {
        let mut formatters = MediaTypeFormatters::default();
        assert!(formatters.remove(MediaTypeFormatter::Xml));
        assert!(!formatters.remove(MediaTypeFormatter::Xml));
        assert_eq!(formatters.iter().collect::<Vec<_>>(), vec![MediaTypeFormatter::Json]);

        let xml = HeaderValue::from_static("application/xml");
        assert_eq!(formatters.negotiate(Some(&xml)), MediaTypeFormatter::Json);
    }

    #[test]
    fn negotiation_honours_accept_order() {
        let formatters = MediaTypeFormatters::default();
        let accept = HeaderValue::from_static("text/html, application/xml;q=0.9, */*;q=0.1");
        assert_eq!(formatters.negotiate(Some(&accept)), MediaTypeFormatter::Xml);
        assert_eq!(formatters.negotiate(None), MediaTypeFormatter::Json);
    }

    #[test]
    fn xml_output_is_escaped() {
        let xml = String::from_utf8(MediaTypeFormatter::Xml.format(&body())).expect("utf8");
        assert_eq!(xml, "<Error><Code>BAD_REQUEST</Code><Message>a &lt; b</Message></Error>");
    }

    #[test]
    fn json_output_omits_missing_detail() {
        let json: serde_json::Value =
            serde_json::from_slice(&MediaTypeFormatter::Json.format(&body())).expect("json");
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"].get("detail").is_none());
    }
}
