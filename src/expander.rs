/// Context expansion: attach taxonomy paths and sibling context to
/// retrieved passages.
use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::corpus::{ContentHash, Passage};
use crate::hierarchy::{BroaderContext, TopicHierarchy, TopicPath, breadcrumb};

/// A retrieval hit located in the taxonomy, bundled with its path and the
/// sibling topics visible along that path.
#[derive(Debug, Clone)]
pub struct ExpandedPassage {
    pub passage: Passage,
    pub path: TopicPath,
    pub broader: BroaderContext,
}

/// One entry per successfully located passage, keyed by content hash.
/// Ordered map so downstream rendering is deterministic.
pub type Expansion = BTreeMap<ContentHash, ExpandedPassage>;

/// Turns retrieval hits into [`Expansion`] maps against a fixed hierarchy.
pub struct ContextExpander<'a> {
    hierarchy: &'a TopicHierarchy,
}

impl<'a> ContextExpander<'a> {
    #[must_use]
    pub fn new(hierarchy: &'a TopicHierarchy) -> Self {
        Self { hierarchy }
    }

    /// Locate each passage in the hierarchy and attach its broader context.
    ///
    /// Passages not filed in the taxonomy are skipped with a log line; an
    /// empty result map is a valid outcome ("no taxonomy context"), never
    /// an error. Output is a pure function of the input passages and the
    /// (immutable) hierarchy.
    #[must_use]
    pub fn expand(&self, passages: &[Passage]) -> Expansion {
        let mut expansion = Expansion::new();

        for passage in passages {
            let hash = passage.hash();
            match self.hierarchy.find_path(&hash) {
                Some(path) => {
                    info!("Passage {} located at {}", hash.short(), breadcrumb(path));
                    let broader = self.hierarchy.broader_context(path);
                    expansion.insert(
                        hash,
                        ExpandedPassage {
                            passage: passage.clone(),
                            path: path.clone(),
                            broader,
                        },
                    );
                }
                None => {
                    debug!("Passage {} not in taxonomy, no expansion", hash.short());
                }
            }
        }

        expansion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::TopicSpec;

    fn tree() -> TopicHierarchy {
        let spec = TopicSpec::category([
            (
                "Healthcare Regulations",
                TopicSpec::category([
                    (
                        "United States",
                        TopicSpec::category([(
                            "HIPAA",
                            TopicSpec::leaf([ContentHash::of("hipaa passage")]),
                        )]),
                    ),
                    (
                        "General Privacy Principles",
                        TopicSpec::leaf([ContentHash::of("general passage")]),
                    ),
                ]),
            ),
        ]);
        TopicHierarchy::build(spec).unwrap()
    }

    #[test]
    fn test_expand_one_located_one_not() {
        let hierarchy = tree();
        let expander = ContextExpander::new(&hierarchy);

        let located = Passage::new("hipaa passage");
        let unlocated = Passage::new("passage nobody filed");
        let expansion = expander.expand(&[located.clone(), unlocated]);

        assert_eq!(expansion.len(), 1, "only the located passage contributes");
        let entry = expansion.get(&located.hash()).unwrap();
        assert_eq!(entry.path, vec!["Healthcare Regulations", "United States", "HIPAA"]);
        assert_eq!(entry.broader.len(), 3);
    }

    #[test]
    fn test_expand_nothing_located() {
        let hierarchy = tree();
        let expander = ContextExpander::new(&hierarchy);
        let expansion = expander.expand(&[Passage::new("stranger")]);
        assert!(expansion.is_empty());
    }

    #[test]
    fn test_expand_idempotent() {
        let hierarchy = tree();
        let expander = ContextExpander::new(&hierarchy);
        let passages = vec![Passage::new("hipaa passage"), Passage::new("general passage")];

        let first = expander.expand(&passages);
        let second = expander.expand(&passages);

        assert_eq!(first.len(), second.len());
        for (hash, entry) in &first {
            let other = second.get(hash).unwrap();
            assert_eq!(entry.path, other.path);
            assert_eq!(entry.broader, other.broader);
            assert_eq!(entry.passage, other.passage);
        }
    }

    #[test]
    fn test_expand_empty_input() {
        let hierarchy = tree();
        let expander = ContextExpander::new(&hierarchy);
        assert!(expander.expand(&[]).is_empty());
    }
}
