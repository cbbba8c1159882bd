use crate::model::SequenceModel;
use crate::vocab::{Vocabulary, END_TOKEN, START_TOKEN};
use crate::CaptionError;

/// Generate a caption for one embedding, greedily, one token at a time.
///
/// The loop runs at most `max_length` iterations. Each iteration encodes the
/// live sequence padded to `max_length`, asks the model for the next-token
/// distribution, takes the arg-max, and reverse-maps it. A reverse-lookup
/// miss or the end sentinel stops the loop without appending; exhausting the
/// bound is also a valid terminal state. The leading start sentinel is
/// dropped and the remaining tokens joined with single spaces, so the result
/// never contains `startseq` or `endseq`.
///
/// Deterministic for a fixed (embedding, vocabulary, model): ties in the
/// distribution resolve to the lowest index, and nothing here is random.
/// `max_length == 0` returns an empty caption without invoking the model.
pub fn generate(
    model: &dyn SequenceModel,
    vocabulary: &Vocabulary,
    features: &[f32],
    max_length: usize,
) -> Result<String, CaptionError> {
    let mut tokens: Vec<String> = vec![START_TOKEN.to_string()];

    for _ in 0..max_length {
        // The loop appends at most one in-vocabulary token per iteration, so
        // the sequence length stays within the padded width.
        let sequence = vocabulary.encode_padded(&tokens, max_length)?;
        let distribution = model.predict_next(features, &sequence)?;
        let index = argmax(&distribution).ok_or_else(|| {
            CaptionError::Inference("caption model returned an empty distribution".into())
        })?;

        match vocabulary.word(index) {
            None => break,
            Some(word) if word == END_TOKEN => break,
            Some(word) => tokens.push(word.to_string()),
        }
    }

    Ok(tokens[1..].join(" "))
}

/// First maximal element wins, so ties break toward the lowest index. This
/// mirrors the arg-max the trained artifact was validated against; it is a
/// reproducibility guarantee, not a public contract of the math.
fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, max)) if v <= max => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Test double that replays a fixed list of predicted indices, then
    /// repeats the last one. Counts invocations so tests can assert the
    /// model was never touched.
    struct ScriptedModel {
        script: Mutex<Vec<usize>>,
        index_space: usize,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(script: &[usize], index_space: usize) -> Self {
            let mut reversed = script.to_vec();
            reversed.reverse();
            Self {
                script: Mutex::new(reversed),
                index_space,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SequenceModel for ScriptedModel {
        fn predict_next(&self, _: &[f32], _: &[i64]) -> Result<Vec<f32>, CaptionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            let index = if script.len() > 1 {
                script.pop().unwrap()
            } else {
                *script.last().expect("script must not be empty")
            };
            let mut distribution = vec![0.0; self.index_space];
            distribution[index] = 1.0;
            Ok(distribution)
        }
    }

    struct FailingModel;

    impl SequenceModel for FailingModel {
        fn predict_next(&self, _: &[f32], _: &[i64]) -> Result<Vec<f32>, CaptionError> {
            Err(CaptionError::Inference("forward pass exploded".into()))
        }
    }

    fn vocab(words: &[(&str, usize)], max_length: usize) -> Vocabulary {
        let map: HashMap<String, usize> =
            words.iter().map(|(w, i)| (w.to_string(), *i)).collect();
        Vocabulary::from_word_index(map, max_length).unwrap()
    }

    #[test]
    fn immediate_end_sentinel_yields_empty_caption() {
        // Scenario A: zero embedding, {startseq, endseq, dog}, model always
        // predicts endseq first.
        let v = vocab(&[("startseq", 1), ("endseq", 2), ("dog", 3)], 10);
        let model = ScriptedModel::new(&[2], 4);
        let caption = generate(&model, &v, &[0.0; 8], v.max_length()).unwrap();
        assert_eq!(caption, "");
        assert_eq!(model.calls(), 1);
    }

    #[test]
    fn scripted_tokens_join_into_a_caption() {
        // Scenario B: "a", "cat", endseq → "a cat".
        let v = vocab(&[("startseq", 1), ("endseq", 2), ("a", 3), ("cat", 4)], 10);
        let model = ScriptedModel::new(&[3, 4, 2], 5);
        let caption = generate(&model, &v, &[0.5; 8], v.max_length()).unwrap();
        assert_eq!(caption, "a cat");
        assert_eq!(model.calls(), 3);
    }

    #[test]
    fn unknown_index_stops_decoding() {
        let v = vocab(&[("startseq", 1), ("endseq", 2), ("a", 3)], 10);
        // Index 7 was never assigned a word.
        let model = ScriptedModel::new(&[3, 7], 8);
        let caption = generate(&model, &v, &[0.5; 8], v.max_length()).unwrap();
        assert_eq!(caption, "a");
    }

    #[test]
    fn padding_index_stops_decoding() {
        let v = vocab(&[("startseq", 1), ("endseq", 2), ("a", 3)], 10);
        let model = ScriptedModel::new(&[3, 0], 4);
        let caption = generate(&model, &v, &[0.5; 8], v.max_length()).unwrap();
        assert_eq!(caption, "a");
    }

    #[test]
    fn loop_terminates_at_the_length_bound() {
        // A model that never emits endseq: the bound is the only exit.
        let v = vocab(&[("startseq", 1), ("endseq", 2), ("dog", 3)], 6);
        let model = ScriptedModel::new(&[3], 4);
        let caption = generate(&model, &v, &[0.5; 8], v.max_length()).unwrap();
        assert_eq!(caption, "dog dog dog dog dog dog");
        assert_eq!(caption.split_whitespace().count(), v.max_length());
        assert_eq!(model.calls(), v.max_length());
    }

    #[test]
    fn zero_max_length_returns_empty_without_invoking_model() {
        let v = vocab(&[("startseq", 1), ("endseq", 2), ("dog", 3)], 10);
        let model = ScriptedModel::new(&[3], 4);
        let caption = generate(&model, &v, &[0.5; 8], 0).unwrap();
        assert_eq!(caption, "");
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn caption_never_contains_sentinels() {
        let v = vocab(
            &[("startseq", 1), ("endseq", 2), ("a", 3), ("red", 4), ("bus", 5)],
            10,
        );
        let model = ScriptedModel::new(&[3, 4, 5, 2], 6);
        let caption = generate(&model, &v, &[0.5; 8], v.max_length()).unwrap();
        assert!(!caption.contains(START_TOKEN));
        assert!(!caption.contains(END_TOKEN));
        assert_eq!(caption, caption.trim());
    }

    #[test]
    fn decoding_is_deterministic() {
        let v = vocab(&[("startseq", 1), ("endseq", 2), ("a", 3), ("cat", 4)], 10);
        let features = [0.25; 16];
        let first = {
            let model = ScriptedModel::new(&[3, 4, 2], 5);
            generate(&model, &v, &features, v.max_length()).unwrap()
        };
        let second = {
            let model = ScriptedModel::new(&[3, 4, 2], 5);
            generate(&model, &v, &features, v.max_length()).unwrap()
        };
        assert_eq!(first, second);
    }

    #[test]
    fn inference_errors_propagate_untouched() {
        let v = vocab(&[("startseq", 1), ("endseq", 2)], 10);
        let err = generate(&FailingModel, &v, &[0.5; 8], v.max_length()).unwrap_err();
        assert!(matches!(err, CaptionError::Inference(_)));
    }

    #[test]
    fn argmax_breaks_ties_toward_lowest_index() {
        assert_eq!(argmax(&[0.1, 0.9, 0.9, 0.2]), Some(1));
        assert_eq!(argmax(&[0.5, 0.5, 0.5]), Some(0));
    }

    #[test]
    fn argmax_of_empty_distribution_is_none() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn argmax_picks_the_single_maximum() {
        assert_eq!(argmax(&[0.0, 0.2, 0.7, 0.1]), Some(2));
    }
}
