use serde::{Deserialize, Serialize};

use crate::auth::AuthScheme;
use crate::constants::{
    BILLING_SERVICE, EXTRACT_PRICE_PER_UNIT, LISTING_SERVICE, LLM_TXT_PRICE_PER_UNIT,
    SKILLS_PRICE_PER_UNIT,
};

/// One of the three independently deployable services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vector {
    /// Vector 1: markdown extraction ("data pre-chewing").
    Extract,
    /// Vector 2: agent skill execution.
    Skills,
    /// Vector 3: llm.txt generation.
    LlmTxt,
}

impl Vector {
    pub const ALL: [Vector; 3] = [Vector::Extract, Vector::Skills, Vector::LlmTxt];

    /// Service id of the vector's own capability.
    pub fn capability(self) -> &'static str {
        match self {
            Vector::Extract => "extract_markdown",
            Vector::Skills => "run_skill",
            Vector::LlmTxt => "generate_llm_txt",
        }
    }

    /// HTTP path of the capability endpoint.
    pub fn capability_path(self) -> &'static str {
        match self {
            Vector::Extract => "/v1/extract",
            Vector::Skills => "/v1/skills/run",
            Vector::LlmTxt => "/v1/llm-txt",
        }
    }

    /// Unit price in ten-thousandths of a dollar.
    pub fn unit_price(self) -> u64 {
        match self {
            Vector::Extract => EXTRACT_PRICE_PER_UNIT,
            Vector::Skills => SKILLS_PRICE_PER_UNIT,
            Vector::LlmTxt => LLM_TXT_PRICE_PER_UNIT,
        }
    }

    /// How this vector normalizes incoming credentials.
    ///
    /// Vector 1 insists on a literal `Bearer ` prefix while the other two
    /// accept bare tokens. The divergence is kept as deployed.
    pub fn auth_scheme(self) -> AuthScheme {
        match self {
            Vector::Extract => AuthScheme::RequireBearer,
            Vector::Skills | Vector::LlmTxt => AuthScheme::OptionalBearer,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Vector::Extract => "Vector 1 - Data Pre-Chewing",
            Vector::Skills => "Vector 2 - Agent Skills",
            Vector::LlmTxt => "Vector 3 - LLM.TXT Generator",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Vector::Extract => 8001,
            Vector::Skills => 8002,
            Vector::LlmTxt => 8003,
        }
    }

    /// Service ids accepted by the usage biller.
    pub fn allowed_services(self) -> [&'static str; 3] {
        [self.capability(), BILLING_SERVICE, LISTING_SERVICE]
    }

    pub fn allows_service(self, service_id: &str) -> bool {
        self.allowed_services().contains(&service_id)
    }
}

impl std::fmt::Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Vector::Extract => "extract",
            Vector::Skills => "skills",
            Vector::LlmTxt => "llm_txt",
        })
    }
}
