use std::collections::{BTreeMap, HashMap, HashSet};

use crate::segment::Unit;
use crate::stopwords::STOP_WORDS;

/// Sparse term -> weight mapping in the per-invocation vector space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    weights: BTreeMap<String, f32>,
}

impl SparseVector {
    pub fn norm(&self) -> f32 {
        self.weights
            .values()
            .map(|w| w * w)
            .sum::<f32>()
            .sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        // Iterate the smaller side; both maps are term-keyed.
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (&self.weights, &other.weights)
        } else {
            (&other.weights, &self.weights)
        };
        small
            .iter()
            .filter_map(|(term, w)| large.get(term).map(|v| w * v))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }
}

impl FromIterator<(String, f32)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (String, f32)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}

/// A unit paired with its vector so downstream stages cannot misalign the
/// two by index.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitVector {
    pub unit: Unit,
    pub vector: SparseVector,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VectorizeOutcome {
    Vectorized {
        query_vector: SparseVector,
        unit_vectors: Vec<UnitVector>,
    },
    /// Every candidate term was a stop word (or too short); no similarity is
    /// computable for this corpus.
    EmptyVocabulary,
}

/// Lower-cases and cuts text into alphanumeric/underscore runs of at least
/// two characters. Single-character fragments and punctuation are dropped.
fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;
    for c in lowered.chars() {
        if c.is_alphanumeric() || c == '_' {
            current.push(c);
            current_chars += 1;
        } else {
            if current_chars >= 2 {
                tokens.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            current_chars = 0;
        }
    }
    if current_chars >= 2 {
        tokens.push(current);
    }
    tokens
}

/// Unigrams plus adjacent bigrams, with stop words removed before the
/// n-grams are formed (so bigrams bridge over dropped function words).
fn ngram_terms(text: &str, stop: &HashSet<&str>) -> Vec<String> {
    let kept: Vec<String> = tokenize(text)
        .into_iter()
        .filter(|t| !stop.contains(t.as_str()))
        .collect();
    let mut terms = kept.clone();
    for pair in kept.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

fn weigh(terms: &[String], idf: &HashMap<String, f32>) -> SparseVector {
    let mut tf: BTreeMap<&str, u32> = BTreeMap::new();
    for t in terms {
        *tf.entry(t.as_str()).or_insert(0) += 1;
    }
    tf.into_iter()
        .filter_map(|(term, count)| {
            idf.get(term)
                .map(|w| (term.to_string(), count as f32 * w))
        })
        .collect()
}

/// Builds the shared vector space over the units plus the query and weighs
/// both sides in it.
///
/// The query deliberately participates in the document-frequency counts;
/// dropping it from the corpus would change every ranking. Inverse document
/// frequency is smoothed: `ln((1 + n) / (1 + df)) + 1`.
pub fn build(units: &[Unit], question: &str) -> VectorizeOutcome {
    let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();

    let unit_terms: Vec<Vec<String>> = units
        .iter()
        .map(|u| ngram_terms(&u.text, &stop))
        .collect();
    let query_terms = ngram_terms(question, &stop);

    let mut df: HashMap<String, u32> = HashMap::new();
    for terms in unit_terms.iter().chain(std::iter::once(&query_terms)) {
        let distinct: HashSet<&String> = terms.iter().collect();
        for term in distinct {
            *df.entry(term.clone()).or_insert(0) += 1;
        }
    }
    if df.is_empty() {
        return VectorizeOutcome::EmptyVocabulary;
    }

    let n_docs = (units.len() + 1) as f32;
    let idf: HashMap<String, f32> = df
        .into_iter()
        .map(|(term, d)| (term, ((1.0 + n_docs) / (1.0 + d as f32)).ln() + 1.0))
        .collect();

    let unit_vectors = units
        .iter()
        .zip(unit_terms.iter())
        .map(|(unit, terms)| UnitVector {
            unit: unit.clone(),
            vector: weigh(terms, &idf),
        })
        .collect();

    VectorizeOutcome::Vectorized {
        query_vector: weigh(&query_terms, &idf),
        unit_vectors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit(ordinal: u32, text: &str) -> Unit {
        Unit {
            ordinal,
            text: text.to_string(),
        }
    }

    #[test]
    fn tokenize_lowercases_and_drops_short_fragments() {
        assert_eq!(
            tokenize("The sky, is BLUE-ish (v2)!"),
            vec!["the", "sky", "is", "blue", "ish", "v2"]
        );
        assert_eq!(tokenize("a b c"), Vec::<String>::new());
    }

    #[test]
    fn bigrams_are_formed_after_stop_word_removal() {
        let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();
        assert_eq!(
            ngram_terms("the sky is blue", &stop),
            vec!["sky", "blue", "sky blue"]
        );
    }

    #[test]
    fn query_participates_in_document_frequency() {
        // "sky" appears in one unit and in the query: df = 2 of n = 2 docs,
        // so idf = ln(3/3) + 1 = 1 and the weight is exactly the raw count.
        let units = vec![unit(0, "sky sky")];
        match build(&units, "sky") {
            VectorizeOutcome::Vectorized {
                query_vector,
                unit_vectors,
            } => {
                assert_eq!(query_vector.dot(&query_vector), 1.0);
                assert_eq!(unit_vectors[0].vector.dot(&query_vector), 2.0);
            }
            VectorizeOutcome::EmptyVocabulary => panic!("expected vocabulary"),
        }
    }

    #[test]
    fn all_stop_words_yield_empty_vocabulary() {
        let units = vec![unit(0, "the of and"), unit(1, "to in that")];
        assert_eq!(build(&units, "what is the"), VectorizeOutcome::EmptyVocabulary);
    }

    #[test]
    fn query_terms_alone_keep_the_vocabulary_alive() {
        // Units contribute nothing, but the query still defines terms; the
        // unit vectors are zero and score 0 downstream.
        let units = vec![unit(0, "of the and")];
        match build(&units, "quantum entanglement") {
            VectorizeOutcome::Vectorized {
                query_vector,
                unit_vectors,
            } => {
                assert!(query_vector.len() > 0);
                assert!(unit_vectors[0].vector.is_empty());
            }
            VectorizeOutcome::EmptyVocabulary => panic!("expected vocabulary"),
        }
    }

    #[test]
    fn unit_and_vector_stay_paired() {
        let units = vec![unit(0, "water is wet"), unit(1, "sky is blue")];
        match build(&units, "blue sky") {
            VectorizeOutcome::Vectorized { unit_vectors, .. } => {
                assert_eq!(unit_vectors.len(), 2);
                assert_eq!(unit_vectors[0].unit.text, "water is wet");
                assert_eq!(unit_vectors[1].unit.text, "sky is blue");
            }
            VectorizeOutcome::EmptyVocabulary => panic!("expected vocabulary"),
        }
    }
}
