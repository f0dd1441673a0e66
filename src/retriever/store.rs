//! Vector store over SQLite + sqlite-vec, keyed by passage content hash.
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Once;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use super::{Retriever, RetrieverError};
use crate::corpus::{Corpus, Passage};
use crate::embedder::Embedder;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS passages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hash TEXT NOT NULL UNIQUE,
    content TEXT NOT NULL,
    metadata TEXT NOT NULL DEFAULT '{}'
);

CREATE INDEX IF NOT EXISTS idx_hash ON passages(hash);

CREATE VIRTUAL TABLE IF NOT EXISTS vec_passages USING vec0(
    embedding FLOAT[384]
);
"#;

static INIT_VEC: Once = Once::new();

/// Initialize the sqlite-vec extension. Safe to call multiple times.
fn init_sqlite_vec() {
    INIT_VEC.call_once(|| unsafe {
        rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
            sqlite_vec::sqlite3_vec_init as *const (),
        )));
    });
}

/// SQLite-backed passage index. Rows are keyed by content hash, so
/// re-ingesting the same corpus is a no-op.
pub struct VectorStore {
    conn: Connection,
    embedder: Box<dyn Embedder>,
}

impl VectorStore {
    /// Open (or create) the store at the given path and initialize the schema.
    pub fn open<P: AsRef<Path>>(path: P, embedder: Box<dyn Embedder>) -> rusqlite::Result<Self> {
        let path = path.as_ref();
        info!("Initializing vector store: {}", path.display());
        init_sqlite_vec();
        let conn = Connection::open(path)?;
        Self::init(conn, embedder)
    }

    /// In-memory store, used by the tests.
    pub fn open_in_memory(embedder: Box<dyn Embedder>) -> rusqlite::Result<Self> {
        init_sqlite_vec();
        let conn = Connection::open_in_memory()?;
        Self::init(conn, embedder)
    }

    fn init(conn: Connection, embedder: Box<dyn Embedder>) -> rusqlite::Result<Self> {
        let vec_version: String = conn.query_row("SELECT vec_version()", [], |row| row.get(0))?;
        debug!("sqlite-vec version: {vec_version}");
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn, embedder })
    }

    /// Ingest every passage of the corpus, skipping hashes already present.
    ///
    /// Returns the number of passages actually added.
    pub fn ingest(&mut self, corpus: &Corpus) -> Result<usize, RetrieverError> {
        let tx = self.conn.transaction()?;
        let mut added = 0;

        for (hash, passage) in corpus.iter() {
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM passages WHERE hash = ?",
                    params![hash.to_hex()],
                    |row| row.get(0),
                )
                .optional()?;
            if existing.is_some() {
                continue;
            }

            let metadata = serde_json::to_string(&passage.metadata)?;
            tx.execute(
                "INSERT INTO passages (hash, content, metadata) VALUES (?, ?, ?)",
                params![hash.to_hex(), passage.content, metadata],
            )?;
            let row_id = tx.last_insert_rowid();

            let embedding = self.embedder.embed(&passage.content)?;
            tx.execute(
                "INSERT INTO vec_passages (rowid, embedding) VALUES (?, ?)",
                params![row_id, serialize_vector(&embedding)],
            )?;
            added += 1;
        }

        tx.commit()?;
        if added > 0 {
            info!("Ingested {added} passage(s)");
        } else {
            debug!("Corpus already ingested, nothing to add");
        }
        Ok(added)
    }

    /// Number of passages currently stored.
    pub fn len(&self) -> rusqlite::Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT count(*) FROM passages", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

impl Retriever for VectorStore {
    /// Cosine-distance top-k over the stored embeddings.
    fn query(&self, text: &str, k: usize) -> Result<Vec<Passage>, RetrieverError> {
        let query_vector = self.embedder.embed(text)?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                p.content,
                p.metadata,
                vec_distance_cosine(v.embedding, ?) as distance
            FROM vec_passages v
            JOIN passages p ON v.rowid = p.id
            ORDER BY distance ASC
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(
            params![serialize_vector(&query_vector), k as i64],
            |row| {
                let content: String = row.get(0)?;
                let metadata: String = row.get(1)?;
                Ok((content, metadata))
            },
        )?;

        let mut passages = Vec::new();
        for row in rows {
            let (content, metadata) = row?;
            let metadata: BTreeMap<String, String> = serde_json::from_str(&metadata)?;
            passages.push(Passage { content, metadata });
        }

        debug!("Retrieved {} passage(s) for query", passages.len());
        Ok(passages)
    }
}

/// Serialize a float32 vector into bytes for the vec0 virtual table.
fn serialize_vector(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashEmbedder;

    fn store_with(corpus: &Corpus) -> VectorStore {
        let mut store = VectorStore::open_in_memory(Box::new(HashEmbedder::default())).unwrap();
        store.ingest(corpus).unwrap();
        store
    }

    fn small_corpus() -> Corpus {
        let mut corpus = Corpus::new();
        corpus.insert(Passage::new("First passage about privacy."));
        corpus.insert(Passage::new("Second passage about encryption."));
        corpus.insert(Passage::new("Third passage about regulations."));
        corpus
    }

    #[test]
    fn test_ingest_idempotent() {
        let corpus = small_corpus();
        let mut store = VectorStore::open_in_memory(Box::new(HashEmbedder::default())).unwrap();
        assert_eq!(store.ingest(&corpus).unwrap(), 3);
        assert_eq!(store.ingest(&corpus).unwrap(), 0, "second ingest must skip all");
        assert_eq!(store.len().unwrap(), 3);
    }

    #[test]
    fn test_query_returns_at_most_k() {
        let store = store_with(&small_corpus());
        assert_eq!(store.query("privacy", 2).unwrap().len(), 2);
        assert_eq!(store.query("privacy", 10).unwrap().len(), 3);
    }

    #[test]
    fn test_exact_text_ranks_first() {
        // HashEmbedder maps identical text to an identical vector, so the
        // verbatim passage has distance zero and must rank first.
        let store = store_with(&small_corpus());
        let hits = store.query("Second passage about encryption.", 3).unwrap();
        assert_eq!(hits[0].content, "Second passage about encryption.");
    }

    #[test]
    fn test_metadata_round_trips() {
        let mut corpus = Corpus::new();
        corpus.insert(Passage::new("tagged passage").with_metadata("source_chunk_id", "chunk_7"));
        let store = store_with(&corpus);
        let hits = store.query("tagged passage", 1).unwrap();
        assert_eq!(hits[0].metadata.get("source_chunk_id").map(String::as_str), Some("chunk_7"));
    }

    #[test]
    fn test_serialize_vector() {
        let bytes = serialize_vector(&[1.0, 2.0]);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x80, 0x3f]);
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x40]);
    }
}
