//! Gemini wire types and content normalization
//!
//! Request fragments follow the Gemini REST protocol (camelCase field names)
//! since the shim only rewrites values handed to the existing HTTP transport.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::error::{GembridgeError, Result};

/// Declared media type for every buffered payload.
///
/// All intercepted uploads are labeled PNG regardless of their actual
/// content, matching upstream relay behavior this shim was built against.
/// TODO: derive the media type from the upload source instead of assuming PNG.
pub const INLINE_MIME_TYPE: &str = "image/png";

/// A single content block in a generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Producer role ("user" or "model")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Ordered parts making up the block
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user-role block from parts
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

/// A request fragment: text, inline bytes, or a reference to an uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Plain text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Raw bytes carried directly in the request body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
    /// Reference to a previously uploaded file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Create an inline-data part carrying base64-encoded bytes
    pub fn from_bytes(data: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            inline_data: Some(Blob {
                mime_type: mime_type.into(),
                data: BASE64.encode(data),
            }),
            ..Self::default()
        }
    }

    /// Create a file-reference part
    pub fn from_uri(file_uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            file_data: Some(FileData {
                mime_type: Some(mime_type.into()),
                file_uri: file_uri.into(),
            }),
            ..Self::default()
        }
    }
}

impl From<&File> for Part {
    fn from(file: &File) -> Self {
        Part::from_uri(file.uri.as_str(), file.mime_type.as_str())
    }
}

/// Inline bytes with their declared media type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// Declared media type of the bytes
    pub mime_type: String,
    /// Base64-encoded payload
    pub data: String,
}

impl Blob {
    /// Decode the base64 payload back into raw bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.data)
            .map_err(|e| GembridgeError::Serialization(format!("Invalid inline data: {e}")))
    }
}

/// Reference to a previously uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// Declared media type, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// URI (or shim handle) identifying the file
    pub file_uri: String,
}

/// An upload result as seen by callers.
///
/// The shim fabricates these with `name == uri == handle`; they satisfy the
/// same structural contract as a real Files API result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Resource name
    pub name: String,
    /// URI used to reference the file in generation requests
    pub uri: String,
    /// Declared media type
    #[serde(default)]
    pub mime_type: String,
}

/// Body of a `models/{model}:generateContent` call
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    /// Normalized content blocks
    pub contents: Vec<Content>,
}

/// Response of a `models/{model}:generateContent` call, returned unmodified
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// A single generated candidate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content block
    pub content: Content,
    /// Reason generation stopped, if reported
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// Caller-supplied content in any of the accepted shapes.
///
/// Normalization into an ordered block list is shared by the intercepted and
/// non-intercepted paths, so downstream behavior matches for content the
/// rewriter never touches.
#[derive(Debug, Clone)]
pub enum Contents {
    /// A bare string, wrapped in a user-role text block
    Text(String),
    /// A single part, wrapped in a user-role block
    Part(Part),
    /// A list of parts forming one user-role block
    Parts(Vec<Part>),
    /// A complete block, taken as-is
    Content(Content),
    /// A complete ordered block list, taken as-is
    List(Vec<Content>),
}

impl Contents {
    /// Normalize into the canonical ordered block list
    pub fn into_contents(self) -> Vec<Content> {
        match self {
            Contents::Text(text) => vec![Content::user(vec![Part::text(text)])],
            Contents::Part(part) => vec![Content::user(vec![part])],
            Contents::Parts(parts) => vec![Content::user(parts)],
            Contents::Content(content) => vec![content],
            Contents::List(contents) => contents,
        }
    }
}

impl From<&str> for Contents {
    fn from(text: &str) -> Self {
        Contents::Text(text.to_string())
    }
}

impl From<String> for Contents {
    fn from(text: String) -> Self {
        Contents::Text(text)
    }
}

impl From<Part> for Contents {
    fn from(part: Part) -> Self {
        Contents::Part(part)
    }
}

impl From<Vec<Part>> for Contents {
    fn from(parts: Vec<Part>) -> Self {
        Contents::Parts(parts)
    }
}

impl From<Content> for Contents {
    fn from(content: Content) -> Self {
        Contents::Content(content)
    }
}

impl From<Vec<Content>> for Contents {
    fn from(contents: Vec<Content>) -> Self {
        Contents::List(contents)
    }
}

impl From<&File> for Contents {
    fn from(file: &File) -> Self {
        Contents::Part(Part::from(file))
    }
}
