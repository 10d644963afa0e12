// Option bag sent to the /convert/ endpoint

use crate::models::{Auth, Cookie, Margin, PageSection, Protection};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Conversion parameters, serialized as one flat JSON object.
///
/// Typed setters cover the structured options. Anything else the service
/// understands (`landscape`, `format`, `sandbox`, ...) goes through
/// [`ConversionRequest::set`]. Setters never validate; malformed values are
/// reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionRequest {
    options: Map<String, Value>,
}

impl ConversionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing option mapping
    pub fn from_options(options: Map<String, Value>) -> Self {
        Self { options }
    }

    /// Write any option by key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.options.insert(key.into(), value.into());
    }

    /// Read any option by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.options.remove(key)
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// URL or raw HTML to convert
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.set("source", source.into());
    }

    pub fn source(&self) -> Option<&str> {
        self.get("source").and_then(Value::as_str)
    }

    pub fn set_margin(&mut self, margin: Margin) {
        self.set_record("margin", &margin);
    }

    /// Basic auth the service uses to fetch the source URL
    pub fn set_auth(&mut self, username: impl Into<String>, password: impl Into<String>) {
        let auth = Auth {
            username: username.into(),
            password: password.into(),
        };
        self.set_record("auth", &auth);
    }

    pub fn add_cookie(&mut self, cookie: Cookie) {
        let record = to_record(&cookie);
        let cookies = self
            .options
            .entry("cookies")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !cookies.is_array() {
            *cookies = Value::Array(Vec::new());
        }
        if let Value::Array(list) = cookies {
            list.push(record);
        }
    }

    /// Append each cookie in order
    pub fn set_cookies<I>(&mut self, cookies: I)
    where
        I: IntoIterator<Item = Cookie>,
    {
        for cookie in cookies {
            self.add_cookie(cookie);
        }
    }

    pub fn clear_cookies(&mut self) {
        self.set("cookies", Value::Array(Vec::new()));
    }

    /// Cookies currently queued, in insertion order
    pub fn cookies(&self) -> Vec<Cookie> {
        match self.get("cookies") {
            Some(Value::Array(list)) => list
                .iter()
                .filter_map(|record| serde_json::from_value(record.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Header forwarded to the source URL; a later value for the same name
    /// replaces the earlier one
    pub fn add_http_header(&mut self, name: impl Into<String>, value: Option<String>) {
        let headers = self
            .options
            .entry("http_headers")
            .or_insert_with(|| Value::Object(Map::new()));
        if !headers.is_object() {
            *headers = Value::Object(Map::new());
        }
        if let Value::Object(map) = headers {
            map.insert(name.into(), value.map_or(Value::Null, Value::String));
        }
    }

    /// Add each header in order; a `None` value is sent as `null`
    pub fn set_http_headers<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<HeaderValue>,
    {
        for (name, value) in headers {
            self.add_http_header(name, value.into().0);
        }
    }

    pub fn clear_http_headers(&mut self) {
        self.set("http_headers", Value::Object(Map::new()));
    }

    pub fn http_headers(&self) -> Option<&Map<String, Value>> {
        self.get("http_headers").and_then(Value::as_object)
    }

    pub fn set_header(&mut self, source: impl Into<String>, spacing: Option<String>) {
        let section = PageSection {
            source: source.into(),
            spacing,
        };
        self.set_record("header", &section);
    }

    pub fn set_footer(&mut self, source: impl Into<String>, spacing: Option<String>) {
        let section = PageSection {
            source: source.into(),
            spacing,
        };
        self.set_record("footer", &section);
    }

    /// Password-protect the document and restrict what readers may do with it
    pub fn protect(&mut self, protection: Protection) {
        self.set_record("protection", &protection);
    }

    /// Stored as given: `image`, `text` or `source` plus placement keys
    pub fn watermark(&mut self, options: Map<String, Value>) {
        self.set("watermark", Value::Object(options));
    }

    /// Ask the service to keep the document under `filename` and answer with
    /// JSON metadata instead of the document bytes
    pub fn save_remotely(&mut self, filename: impl Into<String>) {
        self.set("filename", filename.into());
    }

    pub fn is_stored_remotely(&self) -> bool {
        matches!(self.get("filename"), Some(value) if !value.is_null())
    }

    fn set_record<T: Serialize>(&mut self, key: &str, record: &T) {
        let value = to_record(record);
        self.set(key, value);
    }
}

/// Value accepted by [`ConversionRequest::set_http_headers`]: a string, or
/// `None` for a header without value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderValue(pub Option<String>);

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self(Some(value.to_string()))
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self(Some(value))
    }
}

impl From<Option<String>> for HeaderValue {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

impl From<Option<&str>> for HeaderValue {
    fn from(value: Option<&str>) -> Self {
        Self(value.map(str::to_string))
    }
}

impl From<Map<String, Value>> for ConversionRequest {
    fn from(options: Map<String, Value>) -> Self {
        Self::from_options(options)
    }
}

// Option records are plain structs of strings, bools and options; converting
// them to a JSON value cannot fail.
fn to_record<T: Serialize>(record: &T) -> Value {
    serde_json::to_value(record).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generic_set_get_roundtrip() {
        let mut request = ConversionRequest::new();
        let value = json!({"width": 1200, "nested": [1, "two", null, true]});

        request.set("viewport", value.clone());

        assert_eq!(request.get("viewport"), Some(&value));
        assert_eq!(request.get("missing"), None);
    }

    #[test]
    fn test_set_margin_fills_missing_sides_with_null() {
        let mut request = ConversionRequest::new();
        request.set_margin(Margin {
            top: Some("20px".to_string()),
            left: Some("1cm".to_string()),
            ..Default::default()
        });

        assert_eq!(
            request.get("margin"),
            Some(&json!({"top": "20px", "right": null, "bottom": null, "left": "1cm"}))
        );
    }

    #[test]
    fn test_set_auth() {
        let mut request = ConversionRequest::new();
        request.set_auth("admin", "s3cret");

        assert_eq!(
            request.get("auth"),
            Some(&json!({"username": "admin", "password": "s3cret"}))
        );
    }

    #[test]
    fn test_set_cookies_preserves_order_and_defaults() {
        let mut request = ConversionRequest::new();
        let cookies: Vec<Cookie> = serde_json::from_value(json!([
            {"name": "a"},
            {"name": "b", "value": "v", "secure": true}
        ]))
        .unwrap();

        request.set_cookies(cookies);

        assert_eq!(
            request.get("cookies"),
            Some(&json!([
                {"name": "a", "value": null, "secure": false, "http_only": false},
                {"name": "b", "value": "v", "secure": true, "http_only": false}
            ]))
        );
        let read_back = request.cookies();
        assert_eq!(read_back.len(), 2);
        assert_eq!(read_back[0].name, "a");
        assert_eq!(read_back[1].value.as_deref(), Some("v"));
    }

    #[test]
    fn test_add_cookie_appends_and_clear_resets() {
        let mut request = ConversionRequest::new();
        request.add_cookie(Cookie::new("first").with_value("1"));
        request.add_cookie(Cookie::new("second").http_only(true));

        assert_eq!(request.cookies().len(), 2);
        assert!(request.cookies()[1].http_only);

        request.clear_cookies();
        assert_eq!(request.get("cookies"), Some(&json!([])));
    }

    #[test]
    fn test_add_cookie_replaces_non_array_value() {
        let mut request = ConversionRequest::new();
        request.set("cookies", "garbage");

        request.add_cookie(Cookie::new("session"));

        assert_eq!(request.cookies(), vec![Cookie::new("session")]);
    }

    #[test]
    fn test_http_headers_last_write_wins() {
        let mut request = ConversionRequest::new();
        request.set_http_headers([("X-Original-Header", "Awesome value")]);
        request.add_http_header("user-agent", Some("first".to_string()));
        request.add_http_header("user-agent", Some("second".to_string()));
        request.add_http_header("X-Empty", None);

        assert_eq!(
            request.get("http_headers"),
            Some(&json!({
                "X-Original-Header": "Awesome value",
                "user-agent": "second",
                "X-Empty": null
            }))
        );

        request.clear_http_headers();
        assert_eq!(request.http_headers(), Some(&Map::new()));
    }

    #[test]
    fn test_set_http_headers_accepts_missing_values() {
        let mut request = ConversionRequest::new();
        request.set_http_headers([("X-Forwarded", Some("yes")), ("X-Flag", None)]);
        request.set_http_headers(vec![("X-Owned".to_string(), "value".to_string())]);

        assert_eq!(
            request.http_headers(),
            Some(
                json!({"X-Forwarded": "yes", "X-Flag": null, "X-Owned": "value"})
                    .as_object()
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_header_and_footer() {
        let mut request = ConversionRequest::new();
        request.set_header("<div>Title</div>", Some("50px".to_string()));
        request.set_footer("https://example.com/footer.html", None);

        assert_eq!(
            request.get("header"),
            Some(&json!({"source": "<div>Title</div>", "spacing": "50px"}))
        );
        assert_eq!(
            request.get("footer"),
            Some(&json!({"source": "https://example.com/footer.html", "spacing": null}))
        );
    }

    #[test]
    fn test_protect_renames_to_snake_case() {
        let mut request = ConversionRequest::new();
        let protection: Protection = serde_json::from_value(json!({"noPrint": true})).unwrap();

        request.protect(protection);

        let serialized = serde_json::to_value(&request).unwrap();
        assert_eq!(serialized["protection"]["no_print"], json!(true));
        assert_eq!(
            serialized["protection"],
            json!({
                "author": null,
                "user_password": null,
                "owner_password": null,
                "no_print": true,
                "no_copy": null,
                "no_modify": null
            })
        );
    }

    #[test]
    fn test_watermark_is_passed_through() {
        let mut request = ConversionRequest::new();
        let options = json!({
            "text": "CONFIDENTIAL",
            "rotate": 45,
            "offset_x": "center"
        });

        request.watermark(options.as_object().cloned().unwrap());

        assert_eq!(request.get("watermark"), Some(&options));
    }

    #[test]
    fn test_save_remotely_flag() {
        let mut request = ConversionRequest::new();
        assert!(!request.is_stored_remotely());

        request.save_remotely("invoice.pdf");
        assert!(request.is_stored_remotely());

        request.set("filename", Value::Null);
        assert!(!request.is_stored_remotely());
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut request = ConversionRequest::new();
        request.set_source("https://example.com");
        request.set("landscape", true);

        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"source":"https://example.com","landscape":true}"#
        );
        assert_eq!(request.source(), Some("https://example.com"));
    }
}
