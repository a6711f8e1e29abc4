use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::response::{ListingBody, ListingResponse};
use crate::validation::is_https_url;

/// Discovery record for a service: its OpenAPI document and its llm.txt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub service_id: String,
    pub openapi_url: String,
    pub llm_txt_url: String,
}

/// Acknowledge a listing. Nothing is stored; the validated listing is echoed.
///
/// `INVALID_SERVICE` takes precedence over `INVALID_URL`.
pub fn publish_listing(
    service_id: Option<&str>,
    openapi_url: Option<&str>,
    llm_txt_url: Option<&str>,
) -> ListingResponse {
    publish(service_id, openapi_url, llm_txt_url).into()
}

fn publish(
    service_id: Option<&str>,
    openapi_url: Option<&str>,
    llm_txt_url: Option<&str>,
) -> Result<ListingBody, ErrorCode> {
    let service_id = service_id
        .filter(|s| !s.trim().is_empty())
        .ok_or(ErrorCode::InvalidService)?;
    let (Some(openapi_url), Some(llm_txt_url)) = (
        openapi_url.filter(|u| is_https_url(Some(*u))),
        llm_txt_url.filter(|u| is_https_url(Some(*u))),
    ) else {
        return Err(ErrorCode::InvalidUrl);
    };

    tracing::info!(service_id, "listing published");
    Ok(ListingBody {
        listing: Some(Listing {
            service_id: service_id.to_string(),
            openapi_url: openapi_url.to_string(),
            llm_txt_url: llm_txt_url.to_string(),
        }),
    })
}
