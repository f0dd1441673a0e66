/// Topic hierarchy: a static tree of named categories whose leaves file
/// passages by content hash, plus the lookups the pipeline runs per query.
///
/// The tree is built once from a declarative [`TopicSpec`] and is read-only
/// afterwards. Construction validates the two invariants everything else
/// relies on: sibling names are unique, and a hash is filed in at most one
/// leaf. A `hash → path` index is built alongside the tree, so
/// [`TopicHierarchy::find_path`] is a map lookup rather than a tree walk.
use std::collections::{BTreeSet, HashMap};

use thiserror::Error;
use tracing::debug;

use crate::corpus::ContentHash;

/// Errors detected while building a [`TopicHierarchy`].
#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("hash {hash} filed under both '{first}' and '{second}'")]
    DuplicateHash {
        hash: String,
        first: String,
        second: String,
    },

    #[error("duplicate topic name '{name}' under '{parent}'")]
    DuplicateTopic { name: String, parent: String },
}

/// Declarative shape of the hierarchy: nested named categories terminating
/// in hash lists. This is source data, consumed once by
/// [`TopicHierarchy::build`].
#[derive(Debug, Clone)]
pub enum TopicSpec {
    Category(Vec<(String, TopicSpec)>),
    Leaf(Vec<ContentHash>),
}

impl TopicSpec {
    /// A category node with the given named children, in declaration order.
    #[must_use]
    pub fn category<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = (S, TopicSpec)>,
        S: Into<String>,
    {
        Self::Category(children.into_iter().map(|(n, s)| (n.into(), s)).collect())
    }

    /// A leaf filing the given passage hashes.
    #[must_use]
    pub fn leaf<I>(hashes: I) -> Self
    where
        I: IntoIterator<Item = ContentHash>,
    {
        Self::Leaf(hashes.into_iter().collect())
    }
}

/// A node of the built tree. The variant is decided at construction, so no
/// runtime shape inspection is ever needed past this enum.
#[derive(Debug, Clone)]
pub enum TopicNode {
    /// Named children in insertion order, names unique among siblings.
    Category { children: Vec<(String, TopicNode)> },
    /// Passage hashes filed under this topic.
    Leaf { hashes: BTreeSet<ContentHash> },
}

impl TopicNode {
    fn child(&self, name: &str) -> Option<&TopicNode> {
        match self {
            Self::Category { children } => children
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, node)| node),
            Self::Leaf { .. } => None,
        }
    }
}

/// Topic names from the first named child of the root down to the category
/// immediately containing the matching leaf. The root itself carries no name
/// and contributes no element.
pub type TopicPath = Vec<String>;

/// What a sibling at some level of a path contributes to the broader context:
/// a sibling category contributes each of its child topic names, a sibling
/// leaf contributes each of its hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sibling {
    Topic(String),
    Passage(ContentHash),
}

/// Per-level sibling values along a path, in path order. A level whose
/// category has no other children appears with an empty sibling list —
/// "no related topics", not an omitted level.
pub type BroaderContext = Vec<(String, Vec<Sibling>)>;

/// The built, validated, read-only tree plus its hash index.
#[derive(Debug)]
pub struct TopicHierarchy {
    root: TopicNode,
    index: HashMap<ContentHash, TopicPath>,
}

impl TopicHierarchy {
    /// Build and validate a hierarchy from its declarative spec.
    ///
    /// Fails fast on a duplicate sibling name or on a hash filed in more
    /// than one leaf; both would make later lookups ambiguous.
    pub fn build(spec: TopicSpec) -> Result<Self, HierarchyError> {
        let root = build_node(&spec, &[])?;
        let mut index = HashMap::new();
        index_hashes(&root, &mut Vec::new(), &mut index)?;
        debug!(
            topics = count_categories(&root),
            passages = index.len(),
            "topic hierarchy built"
        );
        Ok(Self { root, index })
    }

    /// Locate a passage in the tree.
    ///
    /// `None` means the hash is not filed anywhere — expected for passages
    /// outside the taxonomy's coverage, and callers degrade to "no taxonomy
    /// context" rather than treating it as an error.
    #[must_use]
    pub fn find_path(&self, hash: &ContentHash) -> Option<&TopicPath> {
        self.index.get(hash)
    }

    /// Number of passages filed anywhere in the tree.
    #[must_use]
    pub fn coverage(&self) -> usize {
        self.index.len()
    }

    /// Collect the sibling values visible at each level of `path`.
    ///
    /// Walks the root category downward. At each level the branch the path
    /// continues into is excluded; every other child contributes its child
    /// names (category) or its hashes (leaf). If a path element is not found
    /// as a child the walk stops and returns what was accumulated so far.
    #[must_use]
    pub fn broader_context(&self, path: &[String]) -> BroaderContext {
        let mut context = Vec::with_capacity(path.len());
        let mut current = &self.root;

        for level in path {
            let TopicNode::Category { children } = current else {
                break;
            };
            let Some(next) = current.child(level) else {
                // Path inconsistent with the tree: truncate, don't error.
                break;
            };

            let mut siblings = Vec::new();
            for (name, node) in children {
                if name == level {
                    continue;
                }
                match node {
                    TopicNode::Category { children } => {
                        siblings.extend(children.iter().map(|(n, _)| Sibling::Topic(n.clone())));
                    }
                    TopicNode::Leaf { hashes } => {
                        siblings.extend(hashes.iter().copied().map(Sibling::Passage));
                    }
                }
            }

            context.push((level.clone(), siblings));
            current = next;
        }

        context
    }
}

fn build_node(spec: &TopicSpec, path: &[String]) -> Result<TopicNode, HierarchyError> {
    match spec {
        TopicSpec::Leaf(hashes) => Ok(TopicNode::Leaf {
            hashes: hashes.iter().copied().collect(),
        }),
        TopicSpec::Category(entries) => {
            let mut children: Vec<(String, TopicNode)> = Vec::with_capacity(entries.len());
            for (name, child_spec) in entries {
                if children.iter().any(|(n, _)| n == name) {
                    return Err(HierarchyError::DuplicateTopic {
                        name: name.clone(),
                        parent: breadcrumb(path),
                    });
                }
                let mut child_path = path.to_vec();
                child_path.push(name.clone());
                children.push((name.clone(), build_node(child_spec, &child_path)?));
            }
            Ok(TopicNode::Category { children })
        }
    }
}

fn index_hashes(
    node: &TopicNode,
    path: &mut TopicPath,
    index: &mut HashMap<ContentHash, TopicPath>,
) -> Result<(), HierarchyError> {
    match node {
        TopicNode::Leaf { hashes } => {
            for hash in hashes {
                if let Some(existing) = index.insert(*hash, path.clone()) {
                    return Err(HierarchyError::DuplicateHash {
                        hash: hash.short(),
                        first: breadcrumb(&existing),
                        second: breadcrumb(path),
                    });
                }
            }
        }
        TopicNode::Category { children } => {
            for (name, child) in children {
                path.push(name.clone());
                index_hashes(child, path, index)?;
                path.pop();
            }
        }
    }
    Ok(())
}

fn count_categories(node: &TopicNode) -> usize {
    match node {
        TopicNode::Leaf { .. } => 0,
        TopicNode::Category { children } => {
            1 + children.iter().map(|(_, c)| count_categories(c)).sum::<usize>()
        }
    }
}

/// Render a path as `A → B → C` for error messages and logs.
#[must_use]
pub fn breadcrumb(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(" → ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(text: &str) -> ContentHash {
        ContentHash::of(text)
    }

    /// Two-level tree: `{"A": {"B": [h1]}, "C": [h2]}`.
    fn scenario_tree() -> TopicHierarchy {
        let spec = TopicSpec::category([
            ("A", TopicSpec::category([("B", TopicSpec::leaf([h("one")]))])),
            ("C", TopicSpec::leaf([h("two")])),
        ]);
        TopicHierarchy::build(spec).unwrap()
    }

    #[test]
    fn test_find_path_located() {
        let tree = scenario_tree();
        assert_eq!(tree.find_path(&h("one")), Some(&vec!["A".to_string(), "B".to_string()]));
        assert_eq!(tree.find_path(&h("two")), Some(&vec!["C".to_string()]));
    }

    #[test]
    fn test_find_path_absent() {
        let tree = scenario_tree();
        assert_eq!(tree.find_path(&h("missing")), None);
    }

    #[test]
    fn test_broader_context_scenario() {
        let tree = scenario_tree();
        let ctx = tree.broader_context(&["A".to_string(), "B".to_string()]);
        assert_eq!(ctx.len(), 2);

        // At level "A" the only sibling is the leaf "C", contributing h2.
        assert_eq!(ctx[0].0, "A");
        assert_eq!(ctx[0].1, vec![Sibling::Passage(h("two"))]);

        // "B" has no other children: explicit empty entry, not an omission.
        assert_eq!(ctx[1].0, "B");
        assert!(ctx[1].1.is_empty());
    }

    #[test]
    fn test_broader_context_excludes_own_branch() {
        let spec = TopicSpec::category([
            (
                "Regulations",
                TopicSpec::category([
                    ("US", TopicSpec::category([("HIPAA", TopicSpec::leaf([h("hipaa")]))])),
                    ("EU", TopicSpec::category([("GDPR", TopicSpec::leaf([h("gdpr")]))])),
                    ("General", TopicSpec::leaf([h("general")])),
                ]),
            ),
            ("Security", TopicSpec::category([("Safeguards", TopicSpec::leaf([h("safe")]))])),
        ]);
        let tree = TopicHierarchy::build(spec).unwrap();

        let path = tree.find_path(&h("hipaa")).unwrap().clone();
        assert_eq!(path, vec!["Regulations", "US", "HIPAA"]);

        let ctx = tree.broader_context(&path);
        assert_eq!(ctx.len(), 3);

        // Top level: sibling category "Security" contributes its child names.
        assert_eq!(ctx[0].0, "Regulations");
        assert_eq!(ctx[0].1, vec![Sibling::Topic("Safeguards".to_string())]);

        // Second level: sibling "EU" contributes "GDPR", sibling leaf
        // "General" contributes its hash. Never the path's own branch.
        assert_eq!(ctx[1].0, "US");
        assert!(ctx[1].1.contains(&Sibling::Topic("GDPR".to_string())));
        assert!(ctx[1].1.contains(&Sibling::Passage(h("general"))));
        assert!(!ctx[1].1.contains(&Sibling::Topic("HIPAA".to_string())));
        assert_eq!(ctx[1].1.len(), 2);
    }

    #[test]
    fn test_broader_context_truncates_on_bad_path() {
        let tree = scenario_tree();
        let ctx = tree.broader_context(&["A".to_string(), "Nope".to_string(), "Deeper".to_string()]);
        // "A" resolves, "Nope" does not: one accumulated level, no error.
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx[0].0, "A");
    }

    #[test]
    fn test_broader_context_at_most_path_len_levels() {
        let tree = scenario_tree();
        let path = vec!["A".to_string(), "B".to_string()];
        assert!(tree.broader_context(&path).len() <= path.len());
    }

    #[test]
    fn test_duplicate_hash_rejected() {
        let spec = TopicSpec::category([
            ("X", TopicSpec::leaf([h("dup")])),
            ("Y", TopicSpec::leaf([h("dup")])),
        ]);
        let err = TopicHierarchy::build(spec).unwrap_err();
        assert!(matches!(err, HierarchyError::DuplicateHash { .. }), "got {err:?}");
    }

    #[test]
    fn test_duplicate_topic_rejected() {
        let spec = TopicSpec::category([
            ("Same", TopicSpec::leaf([h("a")])),
            ("Same", TopicSpec::leaf([h("b")])),
        ]);
        let err = TopicHierarchy::build(spec).unwrap_err();
        assert!(matches!(err, HierarchyError::DuplicateTopic { .. }), "got {err:?}");
    }

    #[test]
    fn test_multi_hash_leaf() {
        let spec = TopicSpec::category([("Both", TopicSpec::leaf([h("a"), h("b")]))]);
        let tree = TopicHierarchy::build(spec).unwrap();
        assert_eq!(tree.find_path(&h("a")), tree.find_path(&h("b")));
        assert_eq!(tree.coverage(), 2);
    }

    #[test]
    fn test_breadcrumb() {
        assert_eq!(breadcrumb(&[]), "<root>");
        assert_eq!(breadcrumb(&["A".to_string(), "B".to_string()]), "A → B");
    }
}
