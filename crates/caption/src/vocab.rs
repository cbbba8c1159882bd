use crate::CaptionError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Sentinel marking the start of every token sequence. Never emitted.
pub const START_TOKEN: &str = "startseq";
/// Sentinel the model produces to end a caption. Never emitted.
pub const END_TOKEN: &str = "endseq";

/// On-disk shape of the vocabulary artifact.
#[derive(Debug, Deserialize)]
struct VocabularyArtifact {
    word_index: HashMap<String, usize>,
    max_caption_length: usize,
}

/// Closed, immutable word↔index mapping with reserved sentinels.
///
/// Index 0 is padding and maps to no word. The reverse table is precomputed
/// at load time so `word(index)` is a slice lookup, not a scan.
///
/// Out-of-vocabulary policy: `encode` silently drops unknown words. The
/// artifact comes from a tokenizer trained without an OOV slot, so there is
/// no index the model has ever seen for an unknown word.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    word_index: HashMap<String, usize>,
    index_word: Vec<Option<String>>,
    max_length: usize,
}

impl Vocabulary {
    /// Build a vocabulary from an explicit word→index map.
    ///
    /// Validates the invariants the decoder relies on: both sentinels
    /// present, index 0 unused, and the mapping injective.
    pub fn from_word_index(
        word_index: HashMap<String, usize>,
        max_length: usize,
    ) -> Result<Self, CaptionError> {
        for sentinel in [START_TOKEN, END_TOKEN] {
            if !word_index.contains_key(sentinel) {
                return Err(CaptionError::InvalidVocabulary(format!(
                    "missing sentinel token `{sentinel}`"
                )));
            }
        }

        let max_index = word_index.values().copied().max().unwrap_or(0);
        let mut index_word: Vec<Option<String>> = vec![None; max_index + 1];
        for (word, &index) in &word_index {
            if index == 0 {
                return Err(CaptionError::InvalidVocabulary(format!(
                    "word `{word}` uses reserved padding index 0"
                )));
            }
            if let Some(existing) = &index_word[index] {
                return Err(CaptionError::InvalidVocabulary(format!(
                    "index {index} maps to both `{existing}` and `{word}`"
                )));
            }
            index_word[index] = Some(word.clone());
        }

        Ok(Self {
            word_index,
            index_word,
            max_length,
        })
    }

    /// Deserialize a vocabulary artifact from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CaptionError> {
        let artifact: VocabularyArtifact = serde_json::from_reader(reader)?;
        Self::from_word_index(artifact.word_index, artifact.max_caption_length)
    }

    /// Load the vocabulary artifact from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CaptionError> {
        let file = File::open(path.as_ref())?;
        let vocab = Self::from_reader(BufReader::new(file))?;
        tracing::info!(
            words = vocab.len(),
            max_length = vocab.max_length,
            "vocabulary loaded"
        );
        Ok(vocab)
    }

    /// Map tokens to indices, dropping out-of-vocabulary words.
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<i64> {
        tokens
            .iter()
            .filter_map(|t| self.word_index.get(t.as_ref()))
            .map(|&i| i as i64)
            .collect()
    }

    /// Encode and right-pad with 0 up to `len`.
    ///
    /// Padding goes at the end, never truncation at the front: a sequence
    /// longer than `len` is an error the caller must have prevented.
    pub fn encode_padded<S: AsRef<str>>(
        &self,
        tokens: &[S],
        len: usize,
    ) -> Result<Vec<i64>, CaptionError> {
        let mut encoded = self.encode(tokens);
        if encoded.len() > len {
            return Err(CaptionError::SequenceTooLong {
                len: encoded.len(),
                max: len,
            });
        }
        encoded.resize(len, 0);
        Ok(encoded)
    }

    /// Exact reverse lookup. `None` for the padding index, out-of-range
    /// indices, and gaps; callers handle the miss explicitly.
    pub fn word(&self, index: usize) -> Option<&str> {
        self.index_word.get(index).and_then(|w| w.as_deref())
    }

    /// Whether the word was present at load time.
    pub fn contains(&self, word: &str) -> bool {
        self.word_index.contains_key(word)
    }

    /// Number of known words, sentinels included.
    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }

    /// Maximum caption length the sequence model was trained with.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Size of the index space the model predicts over (highest index + 1).
    pub fn index_space(&self) -> usize {
        self.index_word.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(words: &[(&str, usize)], max_length: usize) -> Vocabulary {
        let map = words
            .iter()
            .map(|(w, i)| (w.to_string(), *i))
            .collect::<HashMap<_, _>>();
        Vocabulary::from_word_index(map, max_length).unwrap()
    }

    fn small_vocab() -> Vocabulary {
        vocab(
            &[("startseq", 1), ("endseq", 2), ("a", 3), ("cat", 4)],
            10,
        )
    }

    #[test]
    fn round_trip_law_holds_for_every_word() {
        let v = small_vocab();
        for word in ["startseq", "endseq", "a", "cat"] {
            let encoded = v.encode(&[word]);
            assert_eq!(encoded.len(), 1);
            assert_eq!(v.word(encoded[0] as usize), Some(word));
        }
    }

    #[test]
    fn unknown_words_are_dropped() {
        let v = small_vocab();
        assert_eq!(v.encode(&["a", "zebra", "cat"]), vec![3, 4]);
        assert_eq!(v.encode(&["zebra"]), Vec::<i64>::new());
    }

    #[test]
    fn padding_is_appended_never_prepended() {
        let v = small_vocab();
        let padded = v.encode_padded(&["startseq", "a"], 5).unwrap();
        assert_eq!(padded, vec![1, 3, 0, 0, 0]);
    }

    #[test]
    fn over_long_sequence_is_an_error_not_a_truncation() {
        let v = small_vocab();
        let err = v.encode_padded(&["a", "cat", "a"], 2).unwrap_err();
        assert!(matches!(
            err,
            CaptionError::SequenceTooLong { len: 3, max: 2 }
        ));
    }

    #[test]
    fn padding_index_resolves_to_no_word() {
        let v = small_vocab();
        assert_eq!(v.word(0), None);
    }

    #[test]
    fn out_of_range_index_resolves_to_no_word() {
        let v = small_vocab();
        assert_eq!(v.word(999), None);
    }

    #[test]
    fn gap_index_resolves_to_no_word() {
        let v = vocab(&[("startseq", 1), ("endseq", 2), ("dog", 7)], 5);
        assert_eq!(v.word(5), None);
        assert_eq!(v.word(7), Some("dog"));
    }

    #[test]
    fn missing_start_sentinel_is_rejected() {
        let map = HashMap::from([("endseq".to_string(), 1), ("cat".to_string(), 2)]);
        let err = Vocabulary::from_word_index(map, 5).unwrap_err();
        assert!(err.to_string().contains("startseq"));
    }

    #[test]
    fn missing_end_sentinel_is_rejected() {
        let map = HashMap::from([("startseq".to_string(), 1), ("cat".to_string(), 2)]);
        let err = Vocabulary::from_word_index(map, 5).unwrap_err();
        assert!(err.to_string().contains("endseq"));
    }

    #[test]
    fn reserved_padding_index_is_rejected() {
        let map = HashMap::from([
            ("startseq".to_string(), 0),
            ("endseq".to_string(), 1),
        ]);
        let err = Vocabulary::from_word_index(map, 5).unwrap_err();
        assert!(err.to_string().contains("index 0"));
    }

    #[test]
    fn duplicate_index_is_rejected() {
        let map = HashMap::from([
            ("startseq".to_string(), 1),
            ("endseq".to_string(), 2),
            ("cat".to_string(), 2),
        ]);
        let err = Vocabulary::from_word_index(map, 5).unwrap_err();
        assert!(err.to_string().contains("index 2"));
    }

    #[test]
    fn artifact_round_trips_through_json() {
        let json = r#"{
            "word_index": {"startseq": 1, "endseq": 2, "dog": 3},
            "max_caption_length": 74
        }"#;
        let v = Vocabulary::from_reader(json.as_bytes()).unwrap();
        assert_eq!(v.max_length(), 74);
        assert_eq!(v.len(), 3);
        assert_eq!(v.word(3), Some("dog"));
        assert!(v.contains("dog"));
        assert!(!v.contains("zebra"));
    }

    #[test]
    fn artifact_loads_from_disk() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"word_index": {{"startseq": 1, "endseq": 2, "cat": 3}}, "max_caption_length": 20}}"#
        )
        .unwrap();
        let v = Vocabulary::from_file(file.path()).unwrap();
        assert_eq!(v.max_length(), 20);
        assert_eq!(v.word(3), Some("cat"));
    }

    #[test]
    fn missing_artifact_file_is_an_io_error() {
        let err = Vocabulary::from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, CaptionError::Io(_)));
    }

    #[test]
    fn malformed_artifact_is_rejected() {
        let err = Vocabulary::from_reader(&b"{not json"[..]).unwrap_err();
        assert!(matches!(err, CaptionError::Malformed(_)));
    }

    #[test]
    fn index_space_covers_highest_index() {
        let v = vocab(&[("startseq", 1), ("endseq", 2), ("dog", 9)], 5);
        assert_eq!(v.index_space(), 10);
    }
}
