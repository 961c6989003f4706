//! Masterplan documents and the API specs embedded in them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::json_block::balanced_array_at;

// Start of a JSON array whose first object opens with a "name" key.
static API_SPEC_ARRAY_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\[\s*\{\s*"name"\s*:"#).expect("api spec regex"));

// A markdown ATX header line.
static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s{0,3}#{1,6}\s+\S").expect("header regex"));

/// One endpoint of a recommended API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub purpose: String,
}

/// A build-vs-integrate recommendation for one core API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub endpoints: Vec<ApiEndpoint>,
    pub build_in_house: bool,
    #[serde(default)]
    pub reason: String,
}

/// Why API specs could not be read from a masterplan reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiSpecParseError {
    #[error("API spec array is never closed")]
    Unterminated,

    #[error("API spec array is not valid: {0}")]
    Invalid(String),
}

/// Generated markdown masterplan plus any API specs found in it.
///
/// `markdown` is the model reply exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterplanDocument {
    markdown: String,
    api_specs: Vec<ApiSpec>,
}

impl MasterplanDocument {
    pub fn new(markdown: String, api_specs: Vec<ApiSpec>) -> Self {
        Self {
            markdown,
            api_specs,
        }
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn api_specs(&self) -> &[ApiSpec] {
        &self.api_specs
    }

    pub fn into_parts(self) -> (String, Vec<ApiSpec>) {
        (self.markdown, self.api_specs)
    }

    /// True when the markdown has at least one `#`-style header.
    pub fn has_section_headers(&self) -> bool {
        SECTION_HEADER.is_match(&self.markdown)
    }
}

/// Extracts the API spec array the masterplan prompt asks for.
///
/// Returns `Ok(vec![])` when the reply contains no such array.
pub fn extract_api_specs(reply: &str) -> Result<Vec<ApiSpec>, ApiSpecParseError> {
    let Some(found) = API_SPEC_ARRAY_START.find(reply) else {
        return Ok(Vec::new());
    };

    let span = balanced_array_at(reply, found.start()).ok_or(ApiSpecParseError::Unterminated)?;

    serde_json::from_str(span).map_err(|e| ApiSpecParseError::Invalid(e.to_string()))
}

/// Renders API specs as a markdown appendix.
pub fn render_api_specs(specs: &[ApiSpec]) -> String {
    let mut out = String::from("## API Specifications\n\n");
    for spec in specs {
        out.push_str(&format!("### {}\n{}\n\n", spec.name, spec.description));
        out.push_str("**Endpoints:**\n");
        for endpoint in &spec.endpoints {
            out.push_str(&format!(
                "- `{} {}`: {}\n",
                endpoint.method, endpoint.path, endpoint.purpose
            ));
        }
        out.push_str(&format!(
            "\n**Build In-House:** {}\n",
            if spec.build_in_house { "Yes" } else { "No" }
        ));
        out.push_str(&format!("**Reason:** {}\n\n", spec.reason));
    }
    out
}
