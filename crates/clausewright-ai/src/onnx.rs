//! ONNX Runtime token-classification recognizer.
//!
//! Runs a BERT-style NER model (e.g. dslim/bert-base-NER exported to ONNX).
//! The model directory must contain `model.onnx`, `tokenizer.json`, and the
//! Hugging Face `config.json` carrying `id2label`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use clausewright_core::{Entity, EntityExtractor, ExtractError};
use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use tokenizers::{Encoding, Tokenizer};
use tracing::{debug, error, info};

use crate::bio::{self, TaggedToken};

const MAX_TOKENS: usize = 512;
/// Tokens shared by consecutive windows of a long input.
const WINDOW_STRIDE: usize = 64;

#[derive(Deserialize)]
struct ModelConfig {
    id2label: HashMap<String, String>,
}

/// Named-entity recognizer backed by an ONNX token-classification model.
///
/// Loaded once at startup. The session is guarded by a mutex so that
/// [`extract`](EntityExtractor::extract) can be called through a shared
/// reference from any thread. Inputs longer than the model's context are
/// tagged in overlapping windows.
pub struct OnnxRecognizer {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    uses_token_types: bool,
    failures: AtomicU64,
}

impl OnnxRecognizer {
    /// Load a model from a directory containing `model.onnx`, `tokenizer.json`, and `config.json`.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let config_path = model_dir.join("config.json");

        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );
        anyhow::ensure!(config_path.exists(), "config.json not found in {model_dir:?}");

        let session = Session::builder()?.commit_from_file(&model_path)?;
        let uses_token_types = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_TOKENS,
                stride: WINDOW_STRIDE,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;

        let config: ModelConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let labels = labels_by_index(config.id2label)?;

        info!(
            labels = labels.len(),
            model = %model_path.display(),
            "loaded NER model"
        );
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
            uses_token_types,
            failures: AtomicU64::new(0),
        })
    }

    /// Tag set in model output order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Inputs on which inference has failed since load.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn recognize(&self, text: &str) -> anyhow::Result<Vec<Entity>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let windows: Vec<&Encoding> = std::iter::once(&encoding)
            .chain(encoding.get_overflowing())
            .filter(|window| !window.get_ids().is_empty())
            .collect();
        if windows.len() > 1 {
            debug!(windows = windows.len(), "tagging long input in windows");
        }

        // A poisoned lock only means another request panicked mid-inference;
        // the session itself holds no per-request state.
        let mut session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut tagged = Vec::with_capacity(windows.len());
        for window in windows {
            tagged.push(self.tag_window(&mut session, window)?);
        }
        drop(session);

        Ok(bio::decode(text, &bio::merge_windows(tagged)))
    }

    /// Run the model over one window and tag each of its tokens.
    fn tag_window(
        &self,
        session: &mut Session,
        encoding: &Encoding,
    ) -> anyhow::Result<Vec<TaggedToken<'_>>> {
        let seq_len = encoding.get_ids().len();

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&t| t as i64).collect();

        let shape = [1i64, seq_len as i64];
        let ids_tensor = Tensor::from_array((shape, input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.into_boxed_slice()))?;

        let outputs = if self.uses_token_types {
            let type_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?;
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
                "token_type_ids" => type_tensor,
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
            ])?
        };

        // Logits: [1, seq_len, num_labels].
        let (output_shape, logits) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        let num_labels = self.labels.len();
        anyhow::ensure!(
            dims.len() == 3 && dims[1] as usize == seq_len && dims[2] as usize == num_labels,
            "unexpected output shape: {dims:?}, expected [1, {seq_len}, {num_labels}]"
        );

        let offsets = encoding.get_offsets();
        let word_ids = encoding.get_word_ids();
        Ok((0..seq_len)
            .map(|i| {
                let row = &logits[i * num_labels..(i + 1) * num_labels];
                TaggedToken {
                    tag: &self.labels[argmax(row)],
                    start: offsets[i].0,
                    end: offsets[i].1,
                    word: word_ids[i],
                }
            })
            .collect())
    }
}

impl EntityExtractor for OnnxRecognizer {
    fn extract(&self, text: &str) -> Vec<Entity> {
        self.try_extract(text).unwrap_or_default()
    }

    /// Inference failures after a successful load are counted and reported;
    /// the assembler then drafts on the fallback parties.
    fn try_extract(&self, text: &str) -> Result<Vec<Entity>, ExtractError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.recognize(text).map_err(|e| {
            let failures = self.failures.fetch_add(1, Ordering::Relaxed) + 1;
            error!(error = %e, chars = text.len(), failures, "NER inference failed");
            ExtractError::new(e)
        })
    }
}

/// Order `id2label` (`{"0": "O", "1": "B-PER", ...}`) into a dense vector.
fn labels_by_index(id2label: HashMap<String, String>) -> anyhow::Result<Vec<String>> {
    let mut indexed = id2label
        .into_iter()
        .map(|(id, label)| -> anyhow::Result<(usize, String)> { Ok((id.parse()?, label)) })
        .collect::<anyhow::Result<Vec<_>>>()?;
    indexed.sort_by_key(|(id, _)| *id);

    anyhow::ensure!(!indexed.is_empty(), "config.json has an empty id2label");
    for (expected, (id, _)) in indexed.iter().enumerate() {
        anyhow::ensure!(*id == expected, "id2label is missing index {expected}");
    }
    Ok(indexed.into_iter().map(|(_, label)| label).collect())
}

fn argmax(row: &[f32]) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, best_val), (i, &v)| {
            if v > best_val { (i, v) } else { (best, best_val) }
        })
        .0
}
