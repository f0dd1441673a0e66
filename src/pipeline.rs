/// Query pipeline: retrieve → expand → assemble → generate → post-process.
///
/// No retries, no caching, no state carried between calls. Collaborator
/// failures are caught here and surfaced as a typed error naming the stage
/// that failed.
use thiserror::Error;
use tracing::{debug, info};

use crate::corpus::Corpus;
use crate::expander::ContextExpander;
use crate::generator::{Generator, GeneratorError};
use crate::hierarchy::TopicHierarchy;
use crate::prompt::PromptAssembler;
use crate::retriever::{Retriever, RetrieverError};

/// A query failed at a specific pipeline stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrieverError),

    #[error("generation failed: {0}")]
    Generation(#[from] GeneratorError),
}

pub struct Pipeline {
    corpus: Corpus,
    hierarchy: TopicHierarchy,
    retriever: Box<dyn Retriever>,
    generator: Box<dyn Generator>,
    top_k: usize,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        corpus: Corpus,
        hierarchy: TopicHierarchy,
        retriever: Box<dyn Retriever>,
        generator: Box<dyn Generator>,
        top_k: usize,
    ) -> Self {
        Self {
            corpus,
            hierarchy,
            retriever,
            generator,
            top_k,
        }
    }

    /// Answer a query end to end.
    ///
    /// One retrieval, one generation, both blocking; a failure of either
    /// aborts this query only and names the stage in the returned error.
    pub fn answer(&self, query: &str) -> Result<String, PipelineError> {
        info!("Retrieving top {} passages", self.top_k);
        let passages = self.retriever.query(query, self.top_k)?;
        debug!("Retrieved {} passage(s)", passages.len());

        let expander = ContextExpander::new(&self.hierarchy);
        let expansion = expander.expand(&passages);
        info!(
            "Expanded {} of {} retrieved passage(s)",
            expansion.len(),
            passages.len()
        );

        let assembler = PromptAssembler::new(&self.corpus);
        let prompt = assembler.assemble(query, &expansion);
        debug!("Prompt assembled, {} chars", prompt.len());

        let response = self.generator.complete(&prompt)?;
        Ok(until_last_stop(&response))
    }
}

/// Cut the text after its last sentence-terminating period. Text with no
/// period at all is returned unchanged.
#[must_use]
pub fn until_last_stop(text: &str) -> String {
    match text.rfind('.') {
        Some(idx) => text[..=idx].to_string(),
        None => text.to_string(),
    }
}
