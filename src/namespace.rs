//! Key and tag id derivation
//!
//! Every id handed to a backend is derived here from the facade's domain.
//! Ids are lowercase, so `App`/`KEY` and `app`/`key` address the same entry.

/// Suffix appended to a tag's key id to form its tag id
pub const TAG_SUFFIX: &str = "#tag";

/// Separator between domain and key
const SEPARATOR: char = '_';

/// Derive the backend id for `key` inside `domain`
pub fn key_id(domain: &str, key: &str) -> String {
    let mut id = String::with_capacity(domain.len() + key.len() + 1);
    id.push_str(domain);
    id.push(SEPARATOR);
    id.push_str(key);
    id.to_lowercase()
}

/// Derive the backend id holding the member list of `tag` inside `domain`
pub fn tag_id(domain: &str, tag: &str) -> String {
    let mut id = key_id(domain, tag);
    id.push_str(TAG_SUFFIX);
    id
}

/// Prefix shared by every id derived for `domain`
///
/// Note that domain `app` also matches ids of a domain named `app_x`.
pub fn domain_prefix(domain: &str) -> String {
    let mut prefix = domain.to_lowercase();
    prefix.push(SEPARATOR);
    prefix
}

/// Whether `id` carries the reserved tag suffix
pub fn is_tag_id(id: &str) -> bool {
    id.ends_with(TAG_SUFFIX)
}

/// Domain-bound id derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNamespacer {
    domain: String,
}

impl KeyNamespacer {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn key_id(&self, key: &str) -> String {
        key_id(&self.domain, key)
    }

    pub fn tag_id(&self, tag: &str) -> String {
        tag_id(&self.domain, tag)
    }

    pub fn prefix(&self) -> String {
        domain_prefix(&self.domain)
    }

    /// Whether a backend id belongs to this domain
    pub fn owns(&self, id: &str) -> bool {
        id.starts_with(&self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_id_joins_and_lowercases() {
        assert_eq!(key_id("MyApp", "Batman"), "myapp_batman");
    }

    #[test]
    fn key_id_is_case_insensitive() {
        assert_eq!(key_id("APP", "KEY"), key_id("app", "key"));
    }

    #[test]
    fn tag_id_appends_suffix() {
        assert_eq!(tag_id("myapp", "Heroes"), "myapp_heroes#tag");
        assert!(is_tag_id(&tag_id("myapp", "heroes")));
        assert!(!is_tag_id(&key_id("myapp", "heroes")));
    }

    #[test]
    fn distinct_domains_yield_distinct_ids() {
        assert_ne!(key_id("app1", "k"), key_id("app2", "k"));
    }

    #[test]
    fn namespacer_owns_only_its_domain() {
        let ns = KeyNamespacer::new("App1");
        assert_eq!(ns.prefix(), "app1_");
        assert!(ns.owns(&ns.key_id("k")));
        assert!(ns.owns(&ns.tag_id("t")));
        assert!(!ns.owns(&key_id("app2", "k")));
    }

    #[test]
    fn empty_key_still_derives() {
        assert_eq!(key_id("app", ""), "app_");
    }
}
