use super::authorize;
use crate::auth::Authorizer;
use crate::constants::FAILING_SITE_MARKER;
use crate::error::ErrorCode;
use crate::response::{LlmTxtBody, LlmTxtResponse};

/// A bare domain: no scheme, no path separator, no spaces.
fn is_bare_domain(domain: &str) -> bool {
    !(domain.contains("http") || domain.contains('/') || domain.contains(' '))
}

/// Generate the `llm.txt` and `llm-full.txt` documents for a domain.
pub fn generate_llm_txt(
    authorizer: &Authorizer,
    domain: Option<&str>,
    credential: Option<&str>,
) -> LlmTxtResponse {
    generate(authorizer, domain, credential).into()
}

fn generate(
    authorizer: &Authorizer,
    domain: Option<&str>,
    credential: Option<&str>,
) -> Result<LlmTxtBody, ErrorCode> {
    authorize(authorizer, credential)?;
    let domain = domain
        .filter(|d| is_bare_domain(d))
        .ok_or(ErrorCode::InvalidDomain)?;
    if domain.contains(FAILING_SITE_MARKER) {
        tracing::debug!(domain, "simulated crawl failure");
        return Err(ErrorCode::CrawlFailed);
    }

    Ok(LlmTxtBody {
        llm_txt: Some(format!("site: {domain}\nsummary: agentic-ready")),
        llm_full_txt: Some(format!("site: {domain}\npaths:\n- /\n- /docs")),
    })
}
