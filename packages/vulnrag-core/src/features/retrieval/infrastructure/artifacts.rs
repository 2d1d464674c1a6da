//! Index artifact files
//!
//! One set per pattern type, all JSON:
//!
//! | file                          | content                                |
//! |-------------------------------|----------------------------------------|
//! | `<prefix>_entries.json`       | `[IndexEntry]`                         |
//! | `<prefix>_struct.json`        | scaled structural matrix `[[f64; 12]]` |
//! | `<prefix>_struct_scaler.json` | `StandardScaler`                       |
//! | `<prefix>_tfidf.json`         | vectorizer + sparse document matrix    |
//! | `<prefix>_embeddings.json`    | dense embedding matrix                 |

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::features::lexical::{SparseVector, TfidfVectorizer};
use crate::features::retrieval::domain::{IndexEntry, PatternType};
use crate::features::retrieval::error::RetrievalError;
use crate::features::retrieval::infrastructure::scaler::StandardScaler;
use crate::features::retrieval::infrastructure::similarity_index::SimilarityIndex;

/// Artifact kinds of one index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Entries,
    Structural,
    Scaler,
    Tfidf,
    Embeddings,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Entries,
        ArtifactKind::Structural,
        ArtifactKind::Scaler,
        ArtifactKind::Tfidf,
        ArtifactKind::Embeddings,
    ];

    fn suffix(&self) -> &'static str {
        match self {
            ArtifactKind::Entries => "entries",
            ArtifactKind::Structural => "struct",
            ArtifactKind::Scaler => "struct_scaler",
            ArtifactKind::Tfidf => "tfidf",
            ArtifactKind::Embeddings => "embeddings",
        }
    }
}

/// `<dir>/<prefix>_<suffix>.json`
pub fn artifact_path(dir: &Path, pattern_type: PatternType, kind: ArtifactKind) -> PathBuf {
    dir.join(format!("{}_{}.json", pattern_type.prefix(), kind.suffix()))
}

#[derive(Serialize, Deserialize)]
struct TfidfArtifact {
    vectorizer: TfidfVectorizer,
    matrix: Vec<SparseVector>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, RetrievalError> {
    if !path.exists() {
        return Err(RetrievalError::MissingArtifact {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| RetrievalError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| RetrievalError::corrupt(path, e.to_string()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), RetrievalError> {
    let file = File::create(path).map_err(|e| RetrievalError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .map_err(|e| RetrievalError::corrupt(path, e.to_string()))?;
    writer.flush().map_err(|e| RetrievalError::io(path, e))
}

/// Load and cross-check one index
pub fn load_index(dir: &Path, pattern_type: PatternType) -> Result<SimilarityIndex, RetrievalError> {
    let path = |kind| artifact_path(dir, pattern_type, kind);

    // all files present before anything is parsed
    if let Some(missing) = ArtifactKind::ALL.into_iter().map(path).find(|p| !p.exists()) {
        return Err(RetrievalError::MissingArtifact { path: missing });
    }

    let entries: Vec<IndexEntry> = read_json(&path(ArtifactKind::Entries))?;
    let structural: Vec<Vec<f64>> = read_json(&path(ArtifactKind::Structural))?;
    let scaler: StandardScaler = read_json(&path(ArtifactKind::Scaler))?;
    let tfidf: TfidfArtifact = read_json(&path(ArtifactKind::Tfidf))?;
    let embeddings: Vec<Vec<f64>> = read_json(&path(ArtifactKind::Embeddings))?;

    let index = SimilarityIndex::from_parts(
        pattern_type,
        entries,
        structural,
        scaler,
        tfidf.vectorizer,
        tfidf.matrix,
        embeddings,
    )
    .map_err(|reason| RetrievalError::corrupt(dir, format!("{pattern_type} index: {reason}")))?;

    info!(
        pattern = %pattern_type,
        entries = index.len(),
        vocabulary = index.tfidf.dimension(),
        embedding_dimension = index.embedding_dimension(),
        "loaded index"
    );
    Ok(index)
}

/// Write one index, creating `dir` if needed
pub fn save_index(dir: &Path, index: &SimilarityIndex) -> Result<(), RetrievalError> {
    std::fs::create_dir_all(dir).map_err(|e| RetrievalError::io(dir, e))?;
    let pattern_type = index.pattern_type();
    let path = |kind| artifact_path(dir, pattern_type, kind);

    write_json(&path(ArtifactKind::Entries), &index.entries)?;
    write_json(&path(ArtifactKind::Structural), &index.structural)?;
    write_json(&path(ArtifactKind::Scaler), &index.scaler)?;
    write_json(
        &path(ArtifactKind::Tfidf),
        &TfidfArtifact {
            vectorizer: index.tfidf.clone(),
            matrix: index.tfidf_rows.clone(),
        },
    )?;
    write_json(&path(ArtifactKind::Embeddings), &index.embeddings)?;

    debug!(pattern = %pattern_type, dir = %dir.display(), "saved index artifacts");
    Ok(())
}
