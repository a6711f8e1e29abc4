//! Stub capability handlers, one per vector.
//!
//! Every handler walks the same short-circuit chain: authorization, input
//! shape, simulated failure marker, then a deterministic result derived only
//! from the input strings. No handler performs network I/O.

pub mod extract;
pub mod llm_txt;
pub mod skills;

use crate::auth::Authorizer;
use crate::error::ErrorCode;

pub use extract::{extract_markdown, ExtractMetadata};
pub use llm_txt::generate_llm_txt;
pub use skills::{run_skill, SkillResult};

pub(crate) fn authorize(authorizer: &Authorizer, credential: Option<&str>) -> Result<(), ErrorCode> {
    if authorizer.is_authorized(credential) {
        Ok(())
    } else {
        Err(ErrorCode::Unauthorized)
    }
}
