//! Tag → IP-set naming convention.

use memberset_core::{IpSetId, PipelineConfig, Tag};

/// Derives the IP-set identifier for a tag by prefixing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpSetNaming {
    prefix: String,
}

impl IpSetNaming {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.ip_set_prefix.clone())
    }

    /// The IP set that holds the addresses of endpoints matching `tag`.
    pub fn ip_set_for(&self, tag: &Tag) -> IpSetId {
        if self.prefix.is_empty() {
            IpSetId::new(tag.as_str())
        } else {
            IpSetId::new(format!("{}{}", self.prefix, tag))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_tag_verbatim() {
        let naming = IpSetNaming::default();
        assert_eq!(naming.ip_set_for(&Tag::new("foo")), IpSetId::new("foo"));
    }

    #[test]
    fn test_prefix_from_config() {
        let config = PipelineConfig {
            ip_set_prefix: "tag-".into(),
            log_filter: None,
        };
        let naming = IpSetNaming::from_config(&config);
        assert_eq!(naming.ip_set_for(&Tag::new("web")), IpSetId::new("tag-web"));
    }
}
