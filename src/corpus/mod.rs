use std::fs;
use std::path::Path;

use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::Deserialize;
use tracing::info;

use crate::error::{EngineError, Result};

static CORPUS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/corpus/data");

/// Corpora compiled into the binary
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BundledCorpus {
    /// ten sentences drawn at random until the paragraph is long enough
    Classics,
    /// sentences grouped by chapter, never repeated within a chapter cycle
    Chapters,
}

impl BundledCorpus {
    pub fn load(&self) -> Result<Corpus> {
        Corpus::bundled(&self.to_string())
    }
}

/// A named group of sentences, kept in stored order
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Chapter {
    pub title: String,
    pub sentences: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CorpusShape {
    Flat(Vec<String>),
    Grouped(Vec<Chapter>),
}

/// Static pool of sentences used to build target text
#[derive(Clone, Debug, PartialEq)]
pub struct Corpus {
    pub name: String,
    shape: CorpusShape,
}

#[derive(Deserialize)]
struct CorpusFile {
    name: String,
    #[serde(default)]
    sentences: Vec<String>,
    #[serde(default)]
    chapters: Vec<Chapter>,
}

impl Corpus {
    pub fn flat<S: Into<String>>(name: S, sentences: Vec<String>) -> Result<Self> {
        let sentences = clean(sentences);
        if sentences.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }

        Ok(Self {
            name: name.into(),
            shape: CorpusShape::Flat(sentences),
        })
    }

    pub fn grouped<S: Into<String>>(name: S, chapters: Vec<Chapter>) -> Result<Self> {
        if chapters.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }

        let chapters = chapters
            .into_iter()
            .map(|chapter| {
                let sentences = clean(chapter.sentences);
                if sentences.is_empty() {
                    Err(EngineError::EmptyGroup(chapter.title))
                } else {
                    Ok(Chapter {
                        title: chapter.title,
                        sentences,
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.into(),
            shape: CorpusShape::Grouped(chapters),
        })
    }

    /// Look up one of the corpora embedded in the binary
    pub fn bundled(name: &str) -> Result<Self> {
        let file = CORPUS_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| EngineError::UnknownCorpus(name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| EngineError::UnknownCorpus(name.to_string()))?;

        Self::from_json(contents)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| EngineError::CorpusFile {
            path: path.to_path_buf(),
            source,
        })?;

        let corpus = Self::from_json(&contents)?;
        info!(corpus = %corpus.name, path = %path.display(), "loaded corpus file");
        Ok(corpus)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: CorpusFile = serde_json::from_str(json)?;

        if !file.sentences.is_empty() && !file.chapters.is_empty() {
            return Err(EngineError::MixedCorpus(file.name));
        }

        if file.chapters.is_empty() {
            Self::flat(file.name, file.sentences)
        } else {
            Self::grouped(file.name, file.chapters)
        }
    }

    pub fn shape(&self) -> &CorpusShape {
        &self.shape
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self.shape, CorpusShape::Grouped(_))
    }

    /// Total number of sentences across all groups
    pub fn len(&self) -> usize {
        match &self.shape {
            CorpusShape::Flat(sentences) => sentences.len(),
            CorpusShape::Grouped(chapters) => chapters.iter().map(|c| c.sentences.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn clean(sentences: Vec<String>) -> Vec<String> {
    sentences
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bundled_classics_is_flat() {
        let corpus = Corpus::bundled("classics").unwrap();

        assert_eq!(corpus.name, "classics");
        assert!(!corpus.is_grouped());
        assert_eq!(corpus.len(), 10);
    }

    #[test]
    fn test_bundled_chapters_is_grouped() {
        let corpus = BundledCorpus::Chapters.load().unwrap();

        assert_eq!(corpus.name, "chapters");
        assert!(corpus.is_grouped());
        match corpus.shape() {
            CorpusShape::Grouped(chapters) => {
                assert!(chapters.len() > 1);
                assert!(chapters.iter().all(|c| !c.sentences.is_empty()));
            }
            CorpusShape::Flat(_) => panic!("expected grouped corpus"),
        }
    }

    #[test]
    fn test_bundled_corpus_display() {
        assert_eq!(BundledCorpus::Classics.to_string(), "classics");
        assert_eq!(BundledCorpus::Chapters.to_string(), "chapters");
    }

    #[test]
    fn test_unknown_bundled_corpus() {
        assert_matches!(
            Corpus::bundled("nonexistent"),
            Err(EngineError::UnknownCorpus(name)) if name == "nonexistent"
        );
    }

    #[test]
    fn test_flat_drops_blank_sentences() {
        let corpus = Corpus::flat(
            "test",
            vec!["  one  ".to_string(), "".to_string(), "   ".to_string()],
        )
        .unwrap();

        assert_eq!(corpus.shape(), &CorpusShape::Flat(vec!["one".to_string()]));
    }

    #[test]
    fn test_flat_empty_is_rejected() {
        assert_matches!(Corpus::flat("test", vec![]), Err(EngineError::EmptyCorpus));
        assert_matches!(
            Corpus::flat("test", vec![" ".to_string()]),
            Err(EngineError::EmptyCorpus)
        );
    }

    #[test]
    fn test_grouped_empty_group_is_rejected() {
        let chapters = vec![
            Chapter {
                title: "full".to_string(),
                sentences: vec!["a sentence".to_string()],
            },
            Chapter {
                title: "hollow".to_string(),
                sentences: vec!["".to_string()],
            },
        ];

        assert_matches!(
            Corpus::grouped("test", chapters),
            Err(EngineError::EmptyGroup(title)) if title == "hollow"
        );
        assert_matches!(Corpus::grouped("test", vec![]), Err(EngineError::EmptyCorpus));
    }

    #[test]
    fn test_from_json_flat_and_grouped() {
        let flat = Corpus::from_json(r#"{ "name": "f", "sentences": ["a b", "c d"] }"#).unwrap();
        assert!(!flat.is_grouped());
        assert_eq!(flat.len(), 2);

        let grouped = Corpus::from_json(
            r#"{ "name": "g", "chapters": [ { "title": "one", "sentences": ["x", "y", "z"] } ] }"#,
        )
        .unwrap();
        assert!(grouped.is_grouped());
        assert_eq!(grouped.len(), 3);
    }

    #[test]
    fn test_from_json_invalid() {
        assert_matches!(Corpus::from_json("not json"), Err(EngineError::Json(_)));
        assert_matches!(
            Corpus::from_json(r#"{ "name": "empty" }"#),
            Err(EngineError::EmptyCorpus)
        );
    }

    #[test]
    fn test_from_json_rejects_sentences_with_chapters() {
        let json = r#"{
            "name": "both",
            "sentences": ["a loose sentence."],
            "chapters": [{ "title": "One", "sentences": ["inside a chapter."] }]
        }"#;

        assert_matches!(
            Corpus::from_json(json),
            Err(EngineError::MixedCorpus(name)) if name == "both"
        );
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "name": "mine", "sentences": ["typing is fun."] }}"#).unwrap();

        let corpus = Corpus::from_path(file.path()).unwrap();
        assert_eq!(corpus.name, "mine");
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        assert_matches!(
            Corpus::from_path(&path),
            Err(EngineError::CorpusFile { path: p, .. }) if p == path
        );
    }
}
