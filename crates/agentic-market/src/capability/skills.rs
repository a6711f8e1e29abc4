use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::authorize;
use crate::auth::Authorizer;
use crate::constants::{FAILING_PAYLOAD_MARKER, PDF_FINANCIALS_SKILL};
use crate::error::ErrorCode;
use crate::response::{SkillBody, SkillResponse};

/// Standard alphabet with required padding; non-zero trailing bits in the
/// last symbol are ignored rather than rejected.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Summary of a financial-table extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillResult {
    pub tables: u32,
    pub rows: u32,
}

/// Run a named skill over a base64 payload.
pub fn run_skill(
    authorizer: &Authorizer,
    skill_id: Option<&str>,
    payload_b64: Option<&str>,
    credential: Option<&str>,
) -> SkillResponse {
    run(authorizer, skill_id, payload_b64, credential).into()
}

fn run(
    authorizer: &Authorizer,
    skill_id: Option<&str>,
    payload_b64: Option<&str>,
    credential: Option<&str>,
) -> Result<SkillBody, ErrorCode> {
    authorize(authorizer, credential)?;
    if skill_id != Some(PDF_FINANCIALS_SKILL) {
        return Err(ErrorCode::UnknownSkill);
    }
    let payload = payload_b64
        .filter(|p| !p.is_empty())
        .ok_or(ErrorCode::InvalidPayload)?;
    // The failure marker wins over decoding so a marked payload never reaches the decoder.
    if payload.contains(FAILING_PAYLOAD_MARKER) {
        tracing::debug!("simulated skill failure");
        return Err(ErrorCode::SkillFailed);
    }
    PAYLOAD_ENGINE
        .decode(payload)
        .map_err(|_| ErrorCode::InvalidPayload)?;

    Ok(SkillBody {
        result: Some(SkillResult { tables: 1, rows: 10 }),
    })
}
