//! Fixed names, prices and markers shared by the three vectors.

/// Version reported by every vector.
pub const SERVICE_VERSION: &str = "1.1";

/// Service id of the usage billing operation.
pub const BILLING_SERVICE: &str = "create_usage_charge";

/// Service id of the listing publication operation.
pub const LISTING_SERVICE: &str = "publish_listing";

/// Unit prices are held in ten-thousandths of a dollar so that
/// `units * price` is exact at 4 decimal places.
pub const AMOUNT_SCALE: u64 = 10_000;

/// Ten-thousandths per minor currency unit (cent).
pub const MINOR_UNIT_DIVISOR: u64 = 100;

pub const EXTRACT_PRICE_PER_UNIT: u64 = 200; // $0.02
pub const SKILLS_PRICE_PER_UNIT: u64 = 500; // $0.05
pub const LLM_TXT_PRICE_PER_UNIT: u64 = 300; // $0.03

/// Any URL or domain containing this marker simulates an upstream failure.
pub const FAILING_SITE_MARKER: &str = "site-que-falla";

/// Skill payloads containing this marker simulate a skill failure.
pub const FAILING_PAYLOAD_MARKER: &str = "BAD";

/// The only skill the skills vector can run.
pub const PDF_FINANCIALS_SKILL: &str = "pdf_financials";

pub const HTTPS_PREFIX: &str = "https://";

pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_RATE_LIMIT_RPM: u64 = 60;
