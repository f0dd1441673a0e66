/// Built-in demo dataset: ten short passages on healthcare data privacy and
/// the hand-authored topic hierarchy that files them.
///
/// In a real deployment passages would come from an ingestion pipeline and
/// the taxonomy from curation tooling; for the demo both are source data.
use crate::corpus::{ContentHash, Corpus, Passage};
use crate::hierarchy::TopicSpec;

pub const PASSAGES: [&str; 10] = [
    "Healthcare data privacy refers to the protection of sensitive patient information from unauthorized access, use, or disclosure. This includes medical records, billing information, and any personal health information (PHI).",
    "HIPAA (Health Insurance Portability and Accountability Act) is a key legislation in the United States that sets standards for the protection of patient health information. It outlines rules for covered entities like healthcare providers and health plans.",
    "GDPR (General Data Protection Regulation) is a data protection law in the European Union that impacts healthcare organizations handling data of EU citizens. It emphasizes consent, transparency, and data minimization.",
    "Data breaches in healthcare can lead to significant financial penalties, reputational damage, and loss of patient trust. Protecting patient data is paramount for ethical and legal compliance.",
    "Encryption and access controls are essential technical safeguards for healthcare data. Data should be encrypted both in transit and at rest, and access should be granted only on a 'need-to-know' basis.",
    "The data lifecycle in healthcare involves creation, collection, processing, storage, use, sharing, retention, and ultimate destruction of patient information. Each stage requires specific privacy and security considerations.",
    "Common threats to healthcare data include phishing attacks, ransomware, insider threats, and lost or stolen devices. Organizations must implement robust defenses against these vectors.",
    "Privacy Impact Assessments (PIAs) are crucial tools used to identify and mitigate privacy risks associated with new projects, systems, or processes that involve personal health information.",
    "De-identification of health data involves removing or obscuring identifiers that could link information to a specific individual. This allows data to be used for research or public health without compromising privacy.",
    "Emerging technologies like Artificial Intelligence (AI) and blockchain present both opportunities and challenges for healthcare data privacy. Careful governance frameworks are needed to leverage their benefits while mitigating risks.",
];

/// Build the demo corpus, one passage per entry with a source id.
#[must_use]
pub fn builtin_corpus() -> Corpus {
    let mut corpus = Corpus::new();
    for (i, text) in PASSAGES.iter().enumerate() {
        corpus.insert(
            Passage::new(*text).with_metadata("source_chunk_id", format!("chunk_{}", i + 1)),
        );
    }
    corpus
}

fn h(index: usize) -> ContentHash {
    ContentHash::of(PASSAGES[index])
}

/// The demo taxonomy over the built-in passages, keyed by their hashes.
/// Not every passage is filed here; unfiled ones simply get no expansion.
#[must_use]
pub fn topic_spec() -> TopicSpec {
    TopicSpec::category([
        (
            "Healthcare Regulations",
            TopicSpec::category([
                (
                    "United States",
                    TopicSpec::category([("HIPAA", TopicSpec::leaf([h(1)]))]),
                ),
                (
                    "European Union",
                    TopicSpec::category([("GDPR", TopicSpec::leaf([h(2)]))]),
                ),
                ("General Privacy Principles", TopicSpec::leaf([h(0)])),
            ]),
        ),
        (
            "Data Security Measures",
            TopicSpec::category([
                ("Technical Safeguards", TopicSpec::leaf([h(4)])),
                ("Risks and Consequences", TopicSpec::leaf([h(3)])),
                ("Common Threats", TopicSpec::leaf([h(6)])),
            ]),
        ),
        (
            "Data Management Lifecycle",
            TopicSpec::category([
                ("Data Flow and Stages", TopicSpec::leaf([h(5)])),
                ("Risk Assessment", TopicSpec::leaf([h(7)])),
                ("Data Anonymization", TopicSpec::leaf([h(8)])),
            ]),
        ),
        (
            "Emerging Technologies",
            TopicSpec::category([("AI and Blockchain Impacts", TopicSpec::leaf([h(9)]))]),
        ),
    ])
}
