use serde::{Deserialize, Serialize};

use crate::billing::Charge;
use crate::capability::extract::ExtractMetadata;
use crate::capability::skills::SkillResult;
use crate::error::ErrorCode;
use crate::listing::Listing;

/// `{success, <body fields>, error}` as returned by every operation.
///
/// On failure every body field is `null`; on success `error` is `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
    pub error: Option<ErrorCode>,
}

impl<T: Default> Envelope<T> {
    pub fn ok(body: T) -> Self {
        Self {
            success: true,
            body,
            error: None,
        }
    }

    pub fn fail(code: ErrorCode) -> Self {
        Self {
            success: false,
            body: T::default(),
            error: Some(code),
        }
    }
}

impl<T: Default> From<Result<T, ErrorCode>> for Envelope<T> {
    fn from(result: Result<T, ErrorCode>) -> Self {
        match result {
            Ok(body) => Self::ok(body),
            Err(code) => Self::fail(code),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractBody {
    pub markdown: Option<String>,
    pub metadata: Option<ExtractMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillBody {
    pub result: Option<SkillResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmTxtBody {
    pub llm_txt: Option<String>,
    pub llm_full_txt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeBody {
    pub charge: Option<Charge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingBody {
    pub listing: Option<Listing>,
}

pub type ExtractResponse = Envelope<ExtractBody>;
pub type SkillResponse = Envelope<SkillBody>;
pub type LlmTxtResponse = Envelope<LlmTxtBody>;
pub type ChargeResponse = Envelope<ChargeBody>;
pub type ListingResponse = Envelope<ListingBody>;
