//! Policy configuration and negotiation.

use crate::error::{Result, StrandPolicyError};
use crate::policy::StreamPolicyKind;

/// Multiple streams per peer are enabled unless configured otherwise.
pub const DEFAULT_MULTISTREAMS_ENABLED: bool = true;

/// Default policy preference order, most preferred first.
pub const DEFAULT_POLICY_LIST: &str = "BlockPriority,Default";

/// Local stream policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Allow policies that open more than one stream per peer.
    pub multistreams_enabled: bool,
    /// Locally supported policies, most preferred first.
    pub policy_preferences: Vec<StreamPolicyKind>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            multistreams_enabled: DEFAULT_MULTISTREAMS_ENABLED,
            policy_preferences: vec![StreamPolicyKind::BlockPriority, StreamPolicyKind::Default],
        }
    }
}

impl PolicyConfig {
    /// Parse a comma-separated preference list such as `"BlockPriority,Default"`.
    ///
    /// Whitespace around names is ignored and repeated names keep their first
    /// position.
    pub fn from_policy_list(list: &str) -> Result<Self> {
        let mut policy_preferences = Vec::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let kind: StreamPolicyKind = name.parse()?;
            if !policy_preferences.contains(&kind) {
                policy_preferences.push(kind);
            }
        }
        Ok(Self {
            multistreams_enabled: DEFAULT_MULTISTREAMS_ENABLED,
            policy_preferences,
        })
    }

    /// Names to advertise to a peer, in preference order.
    pub fn advertised_names(&self) -> Vec<&'static str> {
        if !self.multistreams_enabled {
            return vec![StreamPolicyKind::Default.name()];
        }
        self.policy_preferences.iter().map(|k| k.name()).collect()
    }

    /// Choose the policy for a connection given the names the peer supports.
    ///
    /// Picks the first local preference the peer also lists. Names we do not
    /// recognise are ignored. A peer that shares nothing still gets `Default`
    /// if we allow it, since every peer can run a single stream.
    pub fn negotiate<T: AsRef<str>>(&self, remote: &[T]) -> Result<StreamPolicyKind> {
        if !self.multistreams_enabled {
            return Ok(StreamPolicyKind::Default);
        }

        let common = self
            .policy_preferences
            .iter()
            .copied()
            .find(|kind| remote.iter().any(|r| r.as_ref() == kind.name()));
        if let Some(kind) = common {
            return Ok(kind);
        }

        if self.policy_preferences.contains(&StreamPolicyKind::Default) {
            Ok(StreamPolicyKind::Default)
        } else {
            Err(StrandPolicyError::NoCommonPolicy)
        }
    }
}
