use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::authorize;
use crate::auth::Authorizer;
use crate::constants::FAILING_SITE_MARKER;
use crate::error::ErrorCode;
use crate::response::{ExtractBody, ExtractResponse};
use crate::validation::{is_https_url, option_flag};

const EXAMPLE_HOST: &str = "example.com";
const EXAMPLE_TITLE: &str = "Example Site";
const FALLBACK_TITLE: &str = "Document";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractMetadata {
    pub source_url: String,
    pub title: Option<String>,
    pub token_count: usize,
    pub word_count: usize,
}

/// Turn a page into agent-ready markdown.
///
/// `options` may carry `render_js` and `include_links`; both are read with
/// JSON truthiness and default to off.
pub fn extract_markdown(
    authorizer: &Authorizer,
    url: Option<&str>,
    options: &Value,
    credential: Option<&str>,
) -> ExtractResponse {
    extract(authorizer, url, options, credential).into()
}

fn extract(
    authorizer: &Authorizer,
    url: Option<&str>,
    options: &Value,
    credential: Option<&str>,
) -> Result<ExtractBody, ErrorCode> {
    authorize(authorizer, credential)?;
    let url = url
        .filter(|u| is_https_url(Some(*u)))
        .ok_or(ErrorCode::InvalidUrl)?;
    if url.contains(FAILING_SITE_MARKER) {
        tracing::debug!(url, "simulated extraction failure");
        return Err(ErrorCode::ExtractionFailed);
    }

    let render_js = option_flag(options, "render_js");
    let include_links = option_flag(options, "include_links");

    let title = url.contains(EXAMPLE_HOST).then(|| EXAMPLE_TITLE.to_string());
    let mut markdown = format!(
        "# {}\n\nExtracted content.",
        title.as_deref().unwrap_or(FALLBACK_TITLE)
    );
    if render_js {
        markdown.push_str(" Rendered.");
    }
    if include_links {
        markdown.push_str(" Source: ");
        markdown.push_str(url);
    }

    let token_count = markdown.split_whitespace().count().max(1);

    Ok(ExtractBody {
        metadata: Some(ExtractMetadata {
            source_url: url.to_string(),
            title,
            token_count,
            word_count: token_count,
        }),
        markdown: Some(markdown),
    })
}
