/// Prompt assembly: deterministic rendering of the query, the expanded
/// context bundles, and the fixed instruction footer.
use crate::corpus::Corpus;
use crate::expander::Expansion;
use crate::hierarchy::{Sibling, breadcrumb};

const HEADER: &str =
    "You are an expert assistant answering questions based on the following context:";

const NO_CONTEXT_BLOCK: &str = "**No specific relevant context chunks were found to directly answer this question.**\n\
You should use your general knowledge to answer the question, but explicitly state that \
the answer is not derived from the provided context. If the question is nonsensical or \
you cannot answer it, state that clearly.";

const INSTRUCTIONS: &str = "\
1. **If relevant context is provided:** Answer the query accurately and comprehensively using *only* the provided context.\n\
   - When relevant, acknowledge the source hierarchy (e.g., 'According to the section on X within Y...').\n\
   - If different chunks provide conflicting information, explicitly note the conflict and explain possible reasons or perspectives.\n\
   - Explain how information from a specific chunk fits into its broader hierarchical context.\n\
2. **If *no* relevant context is provided:** Clearly state that the answer is based on your general knowledge and not the provided context. Then, answer the question to the best of your ability. If you cannot answer the question, state that you don't have enough information.\n\
3. Do not introduce external information or make assumptions beyond the given context unless explicitly stated in instruction 2.\n\
4. Your response should be helpful and informative.";

/// Renders prompts against a fixed corpus (needed to resolve passage-hash
/// siblings back to their text). Pure formatting, no I/O, no side effects.
pub struct PromptAssembler<'a> {
    corpus: &'a Corpus,
}

impl<'a> PromptAssembler<'a> {
    #[must_use]
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    /// Serialize the query, the expansion map, and the fixed instructions
    /// into a single prompt.
    ///
    /// The query string appears verbatim. An empty expansion map renders
    /// the explicit "no context found, use general knowledge" block.
    #[must_use]
    pub fn assemble(&self, query: &str, expansion: &Expansion) -> String {
        let mut parts: Vec<String> = vec![
            HEADER.to_string(),
            "\n=== QUERY ===\n".to_string(),
            query.to_string(),
            "\n=== RELEVANT CONTEXT ===\n".to_string(),
        ];

        if expansion.is_empty() {
            parts.push(NO_CONTEXT_BLOCK.to_string());
        } else {
            for entry in expansion.values() {
                parts.push(format!(
                    "\n**Document Chunk** (Source: {}):",
                    breadcrumb(&entry.path)
                ));
                parts.push(entry.passage.content.clone());

                if !entry.passage.metadata.is_empty() {
                    parts.push("\n**Metadata**:".to_string());
                    for (key, value) in &entry.passage.metadata {
                        parts.push(format!("- {key}: {value}"));
                    }
                }

                if entry.broader.is_empty() {
                    parts.push(
                        "\n**Broader Context from Hierarchy**: No broader context derived for this chunk."
                            .to_string(),
                    );
                } else {
                    parts.push("\n**Broader Context from Hierarchy**:".to_string());
                    for (level, siblings) in &entry.broader {
                        if siblings.is_empty() {
                            parts.push(format!(
                                "- At '{level}' level: No explicit related topics found."
                            ));
                        } else {
                            let rendered: Vec<String> =
                                siblings.iter().map(|s| self.render_sibling(s)).collect();
                            parts.push(format!(
                                "- At '{level}' level: Related to {}",
                                rendered.join(", ")
                            ));
                        }
                    }
                }
            }
        }

        parts.push("\n=== INSTRUCTIONS ===\n".to_string());
        parts.push(INSTRUCTIONS.to_string());

        parts.join("\n")
    }

    /// Sibling topics render as their name; sibling passages resolve to
    /// their text, falling back to a truncated hash when unresolvable.
    fn render_sibling(&self, sibling: &Sibling) -> String {
        match sibling {
            Sibling::Topic(name) => name.clone(),
            Sibling::Passage(hash) => self
                .corpus
                .resolve(hash)
                .map_or_else(|| hash.short(), str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{ContentHash, Passage};
    use crate::expander::ContextExpander;
    use crate::hierarchy::{TopicHierarchy, TopicSpec};

    fn fixture() -> (Corpus, TopicHierarchy) {
        let mut corpus = Corpus::new();
        let h_filed = corpus.insert(Passage::new("Filed passage text."));
        let h_sibling = corpus.insert(Passage::new("Sibling passage text."));

        let spec = TopicSpec::category([
            ("A", TopicSpec::category([("B", TopicSpec::leaf([h_filed]))])),
            ("C", TopicSpec::leaf([h_sibling])),
        ]);
        (corpus, TopicHierarchy::build(spec).unwrap())
    }

    #[test]
    fn test_query_appears_verbatim() {
        let (corpus, _) = fixture();
        let assembler = PromptAssembler::new(&corpus);
        let query = "What about <tags> & \"quotes\" and 日本語?";
        let prompt = assembler.assemble(query, &Expansion::new());
        assert!(prompt.contains(query), "query must appear unmodified and unescaped");
    }

    #[test]
    fn test_empty_expansion_renders_no_context_block() {
        let (corpus, _) = fixture();
        let assembler = PromptAssembler::new(&corpus);
        let prompt = assembler.assemble("anything", &Expansion::new());
        assert!(prompt.contains("No specific relevant context chunks were found"));
        assert!(prompt.contains("=== INSTRUCTIONS ==="));
    }

    #[test]
    fn test_renders_path_content_and_siblings() {
        let (corpus, hierarchy) = fixture();
        let expander = ContextExpander::new(&hierarchy);
        let expansion = expander.expand(&[Passage::new("Filed passage text.")]);

        let assembler = PromptAssembler::new(&corpus);
        let prompt = assembler.assemble("a query", &expansion);

        assert!(prompt.contains("Filed passage text."));
        assert!(prompt.contains("A → B"), "breadcrumb path must render");
        // Sibling hash under "C" resolves back to its passage text
        assert!(prompt.contains("Sibling passage text."));
        // Level with no other children is rendered, not omitted
        assert!(prompt.contains("At 'B' level: No explicit related topics found."));
    }

    #[test]
    fn test_unresolvable_sibling_falls_back_to_short_hash() {
        let (_, hierarchy) = fixture();
        // Corpus missing the sibling passage, so it cannot resolve
        let mut corpus = Corpus::new();
        corpus.insert(Passage::new("Filed passage text."));
        let expander = ContextExpander::new(&hierarchy);
        let expansion = expander.expand(&[Passage::new("Filed passage text.")]);

        let assembler = PromptAssembler::new(&corpus);
        let prompt = assembler.assemble("q", &expansion);

        let missing = ContentHash::of("Sibling passage text.");
        assert!(prompt.contains(&missing.short()));
        assert!(!prompt.contains("Sibling passage text."));
    }

    #[test]
    fn test_deterministic() {
        let (corpus, hierarchy) = fixture();
        let expander = ContextExpander::new(&hierarchy);
        let expansion = expander.expand(&[Passage::new("Filed passage text.")]);
        let assembler = PromptAssembler::new(&corpus);
        assert_eq!(
            assembler.assemble("q", &expansion),
            assembler.assemble("q", &expansion)
        );
    }
}
