//! Resource records returned by CaaS driver calls.
//!
//! Records are plain values. Identifiers are stored as strings whatever scalar
//! type the caller had, since the two API generations disagree on id types.

use serde::{Deserialize, Serialize};

/// Snapshot of a long-running provider operation.
///
/// Polling for updates is the caller's job; this only records one response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatus {
    /// Operation being performed (e.g. `DEPLOY_SERVER`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// When the operation was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_time: Option<String>,
    /// User who requested the operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Total number of steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_steps: Option<u32>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    /// Name of the current step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_name: Option<String>,
    /// Number of the current step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_number: Option<u32>,
    /// Completion of the current step, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_percent_complete: Option<u32>,
    /// Why the operation failed, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Legacy (API 1) network with location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Network id.
    pub id: String,
    /// Network name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Data center location id.
    pub location: String,
    /// Private network base address.
    pub private_net: String,
    /// Multicast enabled.
    pub multicast: bool,
    /// Provider state.
    pub status: String,
}

impl Network {
    /// Creates a network record.
    pub fn new(
        id: impl ToString,
        name: impl Into<String>,
        description: Option<String>,
        location: impl Into<String>,
        private_net: impl Into<String>,
        multicast: bool,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
            description,
            location: location.into(),
            private_net: private_net.into(),
            multicast,
            status: status.into(),
        }
    }
}

/// Network domain (API 2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDomain {
    /// Network domain id.
    pub id: String,
    /// Network domain name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Data center location id.
    pub location: String,
    /// Provider state.
    pub status: String,
}

impl NetworkDomain {
    /// Creates a network domain record.
    pub fn new(
        id: impl ToString,
        name: impl Into<String>,
        description: Option<String>,
        location: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
            description,
            location: location.into(),
            status: status.into(),
        }
    }
}

/// VLAN inside a network domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    /// VLAN id.
    pub id: String,
    /// VLAN name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Data center location id.
    pub location: String,
    /// Provider state.
    pub status: String,
}

impl Vlan {
    /// Creates a VLAN record.
    pub fn new(
        id: impl ToString,
        name: impl Into<String>,
        description: Option<String>,
        location: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
            description,
            location: location.into(),
            status: status.into(),
        }
    }
}

/// Load-balancer pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Pool id.
    pub id: String,
    /// Pool name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Provider state.
    pub status: String,
}

impl Pool {
    /// Creates a pool record.
    pub fn new(
        id: impl ToString,
        name: impl Into<String>,
        description: Option<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
            description,
            status: status.into(),
        }
    }
}

/// Membership of a VIP node in a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMember {
    /// Pool member id.
    pub id: String,
    /// Member name.
    pub name: String,
    /// Provider state.
    pub status: String,
    /// Node IP address.
    pub ip: String,
    /// Service port; absent means any port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Id of the [`VipNode`] this member points at.
    pub node_id: String,
}

impl PoolMember {
    /// Creates a pool member record.
    pub fn new(
        id: impl ToString,
        name: impl Into<String>,
        status: impl Into<String>,
        ip: impl Into<String>,
        port: Option<u16>,
        node_id: impl ToString,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
            status: status.into(),
            ip: ip.into(),
            port,
            node_id: node_id.to_string(),
        }
    }
}

/// Load-balancer node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VipNode {
    /// Node id.
    pub id: String,
    /// Node name.
    pub name: String,
    /// Provider state.
    pub status: String,
    /// Node IP address.
    pub ip: String,
}

impl VipNode {
    /// Creates a VIP node record.
    pub fn new(
        id: impl ToString,
        name: impl Into<String>,
        status: impl Into<String>,
        ip: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
            status: status.into(),
            ip: ip.into(),
        }
    }
}

/// Load-balancer virtual listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualListener {
    /// Listener id.
    pub id: String,
    /// Listener name.
    pub name: String,
    /// Provider state.
    pub status: String,
    /// Listener IP address.
    pub ip: String,
}

impl VirtualListener {
    /// Creates a virtual listener record.
    pub fn new(
        id: impl ToString,
        name: impl Into<String>,
        status: impl Into<String>,
        ip: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
            status: status.into(),
            ip: ip.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stringified() {
        assert_eq!(Vlan::new(42, "v", None, "NA9", "NORMAL").id, "42");
        assert_eq!(Pool::new(7u64, "p", None, "NORMAL").id, "7");
        assert_eq!(VipNode::new(-3i32, "n", "NORMAL", "10.0.0.1").id, "-3");
        assert_eq!(
            NetworkDomain::new("abc-123", "nd", None, "NA9", "NORMAL").id,
            "abc-123"
        );
        let member = PoolMember::new(1, "m", "NORMAL", "10.0.0.2", Some(80), 99);
        assert_eq!(member.id, "1");
        assert_eq!(member.node_id, "99");
    }

    #[test]
    fn debug_lists_every_field() {
        let network = Network::new(
            5,
            "web",
            Some("front end".into()),
            "NA1",
            "10.162.1.0",
            false,
            "NORMAL",
        );
        let debug = format!("{network:?}");
        for needle in [
            "id: \"5\"",
            "name: \"web\"",
            "front end",
            "location: \"NA1\"",
            "private_net: \"10.162.1.0\"",
            "multicast: false",
            "status: \"NORMAL\"",
        ] {
            assert!(debug.contains(needle), "{needle} missing from {debug}");
        }

        let listener = VirtualListener::new("vl-1", "https", "NORMAL", "168.128.13.126");
        let debug = format!("{listener:?}");
        assert!(debug.starts_with("VirtualListener {"));
        assert!(debug.contains("ip: \"168.128.13.126\""));
    }

    #[test]
    fn operation_status_defaults_and_fields() {
        let status = OperationStatus::default();
        assert!(status.action.is_none());
        assert!(status.failure_reason.is_none());

        let status = OperationStatus {
            action: Some("DEPLOY_SERVER".into()),
            step_name: Some("WAIT_FOR_OPERATION".into()),
            step_number: Some(3),
            step_percent_complete: Some(50),
            failure_reason: Some("Timed out".into()),
            ..OperationStatus::default()
        };
        assert_eq!(status.failure_reason.as_deref(), Some("Timed out"));
        let debug = format!("{status:?}");
        assert!(debug.contains("step_percent_complete: Some(50)"));
        assert!(debug.contains("request_time: None"));
    }

    #[test]
    fn records_serialize_with_string_ids() {
        let vlan = Vlan::new(12, "vlan-a", None, "EU6", "PENDING_ADD");
        let json = serde_json::to_value(&vlan).unwrap();
        assert_eq!(json["id"], "12");
        assert!(json.get("description").is_none());

        let back: Vlan = serde_json::from_value(json).unwrap();
        assert_eq!(back, vlan);
    }
}
