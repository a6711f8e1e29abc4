//! Core of the agentic market vectors.
//!
//! Three independently deployed services ("vectors") each expose one metered
//! capability plus shared usage billing and listing publication:
//!
//! - **Extract** ([`extract_markdown`]): page to agent-ready markdown
//! - **Skills** ([`run_skill`]): run a named skill over a base64 payload
//! - **LlmTxt** ([`generate_llm_txt`]): generate `llm.txt` for a domain
//!
//! Every operation is a pure function of its inputs and the immutable
//! [`MarketConfig`], except charge confirmation, which goes through the
//! [`PaymentProvider`] chosen at startup as a [`Settlement`] strategy.
//!
//! # Modules
//!
//! - [`auth`]: credential normalization and the [`Authorizer`]
//! - [`capability`]: the three stub capability handlers
//! - [`billing`]: the [`UsageBiller`] and [`Charge`] pricing
//! - [`listing`]: listing publication
//! - [`provider`] / [`stripe`]: payment provider seam and its Stripe client
//! - [`config`]: environment configuration

pub mod auth;
pub mod billing;
pub mod capability;
pub mod config;
pub mod constants;
pub mod error;
pub mod listing;
pub mod provider;
pub mod response;
pub mod security;
pub mod stripe;
pub mod validation;
pub mod vector;

pub use auth::{normalize_credential, AuthScheme, Authorizer};
pub use billing::{Charge, ChargeStatus, Settlement, UsageBiller};
pub use capability::{extract_markdown, generate_llm_txt, run_skill};
pub use config::MarketConfig;
pub use error::{ConfigError, ErrorCode, ProviderError};
pub use listing::{publish_listing, Listing};
pub use provider::{ChargeMetadata, ChargeRequest, PaymentProvider, ProviderCharge};
pub use response::*;
pub use stripe::StripeClient;
pub use vector::Vector;
