// Typed option records for PDFShift conversion requests

use serde::{Deserialize, Serialize};

/// Watermark type discriminator: text watermark
pub const WATERMARK_TEXT: u8 = 1;
/// Watermark type discriminator: image watermark
pub const WATERMARK_IMAGE: u8 = 2;
/// Watermark type discriminator: PDF watermark
pub const WATERMARK_PDF: u8 = 3;

/// Kind of watermark source.
///
/// Informational only: the request never checks that a watermark payload
/// matches one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatermarkType {
    Text,
    Image,
    Pdf,
}

impl WatermarkType {
    /// Numeric code understood by the service
    pub fn code(self) -> u8 {
        match self {
            WatermarkType::Text => WATERMARK_TEXT,
            WatermarkType::Image => WATERMARK_IMAGE,
            WatermarkType::Pdf => WATERMARK_PDF,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            WATERMARK_TEXT => Some(WatermarkType::Text),
            WATERMARK_IMAGE => Some(WatermarkType::Image),
            WATERMARK_PDF => Some(WatermarkType::Pdf),
            _ => None,
        }
    }
}

/// Page margins, serialized under `margin`.
///
/// Values are CSS lengths ("10px", "2cm"). Unset sides serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: Option<String>,
    pub right: Option<String>,
    pub bottom: Option<String>,
    pub left: Option<String>,
}

impl Margin {
    /// Same margin on all four sides
    pub fn uniform(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            top: Some(value.clone()),
            right: Some(value.clone()),
            bottom: Some(value.clone()),
            left: Some(value),
        }
    }
}

/// Content repeated at the top (header) or bottom (footer) of every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSection {
    /// URL or raw HTML; the service decides which
    pub source: String,

    /// Space between the section and the document body
    pub spacing: Option<String>,
}

/// Basic-auth credentials the service uses when fetching the source URL.
///
/// Unrelated to the API key used to authenticate against the service itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub username: String,
    pub password: String,
}

/// Password protection and usage restrictions for the generated document.
///
/// Serialized with snake_case keys (`user_password`, `no_print`, ...). When
/// read from caller JSON the camelCase names (`userPassword`, `noPrint`, ...)
/// are accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Protection {
    pub author: Option<String>,

    #[serde(alias = "userPassword")]
    pub user_password: Option<String>,

    #[serde(alias = "ownerPassword")]
    pub owner_password: Option<String>,

    #[serde(alias = "noPrint")]
    pub no_print: Option<bool>,

    #[serde(alias = "noCopy")]
    pub no_copy: Option<bool>,

    #[serde(alias = "noModify")]
    pub no_modify: Option<bool>,
}

/// Cookie forwarded to the source URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,

    #[serde(default)]
    pub value: Option<String>,

    /// Only sent over https
    #[serde(default)]
    pub secure: bool,

    #[serde(default, alias = "httpOnly")]
    pub http_only: bool,
}

impl Cookie {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            secure: false,
            http_only: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    /// The generated document
    Binary(Vec<u8>),

    /// Metadata returned instead of the document when the request asked the
    /// service to keep the file (`filename` option)
    Stored(serde_json::Value),
}

impl ConversionResult {
    /// Document bytes, if the service returned the document itself
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ConversionResult::Binary(data) => Some(data),
            ConversionResult::Stored(_) => None,
        }
    }

    /// Storage metadata, if the document was kept by the service
    pub fn metadata(&self) -> Option<&serde_json::Value> {
        match self {
            ConversionResult::Binary(_) => None,
            ConversionResult::Stored(metadata) => Some(metadata),
        }
    }

    /// Bytes written to disk when saving this result.
    ///
    /// Stored metadata is written as its JSON serialization.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            ConversionResult::Binary(data) => Ok(data.clone()),
            ConversionResult::Stored(metadata) => serde_json::to_vec(metadata),
        }
    }
}
