use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::debug;

use crate::corpus::{Chapter, Corpus, CorpusShape};
use crate::error::{EngineError, Result};

pub const DEFAULT_MIN_PARAGRAPH_CHARS: usize = 200;
pub const DEFAULT_SENTENCES_PER_PARAGRAPH: usize = 10;

/// Configuration for paragraph generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenConfig {
    /// flat corpora keep drawing until the paragraph reaches this many chars
    pub min_paragraph_chars: usize,
    /// grouped corpora take at most this many unused sentences per paragraph
    pub sentences_per_paragraph: usize,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            min_paragraph_chars: DEFAULT_MIN_PARAGRAPH_CHARS,
            sentences_per_paragraph: DEFAULT_SENTENCES_PER_PARAGRAPH,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub group: Option<String>,
}

/// Sentences already emitted in the current exhaustion cycle, per group
#[derive(Debug, Default, Clone)]
pub struct GenerationCursor {
    used: HashMap<usize, HashSet<usize>>,
}

impl GenerationCursor {
    pub fn is_used(&self, group: usize, sentence: usize) -> bool {
        self.used
            .get(&group)
            .is_some_and(|set| set.contains(&sentence))
    }

    pub fn used_in(&self, group: usize) -> usize {
        self.used.get(&group).map_or(0, HashSet::len)
    }

    fn mark(&mut self, group: usize, sentence: usize) {
        self.used.entry(group).or_default().insert(sentence);
    }

    fn clear(&mut self, group: usize) {
        self.used.remove(&group);
    }
}

/// Draws text segments from a corpus without immediate repetition
pub struct ParagraphGenerator {
    corpus: Corpus,
    config: GenConfig,
    cursor: GenerationCursor,
    rng: StdRng,
}

impl ParagraphGenerator {
    pub fn new(corpus: Corpus, config: GenConfig) -> Self {
        Self::with_rng(corpus, config, StdRng::from_entropy())
    }

    pub fn with_seed(corpus: Corpus, config: GenConfig, seed: u64) -> Self {
        Self::with_rng(corpus, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(corpus: Corpus, config: GenConfig, rng: StdRng) -> Self {
        Self {
            corpus,
            config,
            cursor: GenerationCursor::default(),
            rng,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn cursor(&self) -> &GenerationCursor {
        &self.cursor
    }

    pub fn generate(&mut self) -> Result<Paragraph> {
        match self.corpus.shape() {
            CorpusShape::Flat(sentences) => {
                let text = fill_to_length(sentences, self.config.min_paragraph_chars, &mut self.rng)?;
                Ok(Paragraph { text, group: None })
            }
            CorpusShape::Grouped(chapters) => draw_from_group(
                chapters,
                self.config.sentences_per_paragraph,
                &mut self.cursor,
                &mut self.rng,
            ),
        }
    }
}

fn fill_to_length(sentences: &[String], min_chars: usize, rng: &mut StdRng) -> Result<String> {
    let mut paragraph = String::new();
    let mut chars = 0;
    while chars < min_chars || paragraph.is_empty() {
        let sentence = sentences.choose(rng).ok_or(EngineError::EmptyCorpus)?;
        if !paragraph.is_empty() {
            paragraph.push(' ');
            chars += 1;
        }
        paragraph.push_str(sentence);
        chars += sentence.chars().count();
    }

    Ok(paragraph)
}

fn draw_from_group(
    chapters: &[Chapter],
    per_paragraph: usize,
    cursor: &mut GenerationCursor,
    rng: &mut StdRng,
) -> Result<Paragraph> {
    if chapters.is_empty() {
        return Err(EngineError::EmptyCorpus);
    }
    let per_paragraph = per_paragraph.max(1);

    // one pass per group plus one retry after a cursor reset
    for _ in 0..=chapters.len() {
        let group = rng.gen_range(0..chapters.len());
        let chapter = &chapters[group];

        let mut available = (0..chapter.sentences.len())
            .filter(|&idx| !cursor.is_used(group, idx))
            .collect::<Vec<_>>();

        if available.is_empty() {
            debug!(group = %chapter.title, "group exhausted, starting a new cycle");
            cursor.clear(group);
            available = (0..chapter.sentences.len()).collect();
            if available.is_empty() {
                continue;
            }
        }

        available.truncate(per_paragraph);
        for &idx in &available {
            cursor.mark(group, idx);
        }

        let text = available
            .iter()
            .map(|&idx| chapter.sentences[idx].as_str())
            .join(" ");

        return Ok(Paragraph {
            text,
            group: Some(chapter.title.clone()),
        });
    }

    Err(EngineError::EmptyCorpus)
}
