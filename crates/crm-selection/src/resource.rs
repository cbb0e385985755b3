//! Paginated CRM tables and the wire keys their bulk endpoints expect.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload keys for the explicit id list and the select-all exclusion list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdFieldNames {
    pub include: String,
    pub exclude: String,
}

impl IdFieldNames {
    pub fn new(include: impl Into<String>, exclude: impl Into<String>) -> Self {
        Self {
            include: include.into(),
            exclude: exclude.into(),
        }
    }
}

impl Default for IdFieldNames {
    fn default() -> Self {
        TargetResource::Customers.id_fields()
    }
}

/// A server-paginated table backed by the selection engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetResource {
    Customers,
    IbRequests,
    Affiliates,
    Agents,
}

impl TargetResource {
    pub const ALL: [TargetResource; 4] = [
        TargetResource::Customers,
        TargetResource::IbRequests,
        TargetResource::Affiliates,
        TargetResource::Agents,
    ];

    pub fn id_fields(&self) -> IdFieldNames {
        match self {
            Self::Customers => IdFieldNames::new("client_ids", "non_client_ids"),
            Self::IbRequests => IdFieldNames::new("request_ids", "non_request_ids"),
            Self::Affiliates => IdFieldNames::new("affiliate_ids", "non_affiliate_ids"),
            Self::Agents => IdFieldNames::new("agent_ids", "non_agent_ids"),
        }
    }

    /// Parse from a CLI or config name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "customers" | "clients" => Some(Self::Customers),
            "ib_requests" => Some(Self::IbRequests),
            "affiliates" => Some(Self::Affiliates),
            "agents" => Some(Self::Agents),
            _ => None,
        }
    }
}

impl fmt::Display for TargetResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetResource::Customers => write!(f, "customers"),
            TargetResource::IbRequests => write!(f, "ib_requests"),
            TargetResource::Affiliates => write!(f, "affiliates"),
            TargetResource::Agents => write!(f, "agents"),
        }
    }
}
