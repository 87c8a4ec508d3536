//! Multi-model querying and answer selection.
//!
//! [`query_multi`] fans one prompt out to several models on a bounded
//! number of concurrent workers, waits for every call to finish or time
//! out, then picks one answer according to a [`Strategy`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::InterpreterConfig;
use crate::error::LlmError;
use crate::llm::{GenerationRequest, TextGenerator};
use crate::repair::parse_lenient;

/// Similarity at or above which two answers count as the same vote.
pub const MAJORITY_THRESHOLD: f64 = 0.9;

/// How one answer is picked among several successful responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Highest average similarity to all other answers
    #[default]
    Consensus,
    /// Largest cluster of near-identical answers
    Majority,
    /// First model in the priority list that answered
    Best,
    /// Lowest latency
    Fastest,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Consensus => "consensus",
            Self::Majority => "majority",
            Self::Best => "best",
            Self::Fastest => "fastest",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "consensus" => Ok(Self::Consensus),
            "majority" => Ok(Self::Majority),
            "best" => Ok(Self::Best),
            "fastest" => Ok(Self::Fastest),
            other => Err(LlmError::Config(format!("unknown strategy '{}'", other))),
        }
    }
}

/// Outcome of one model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAttempt {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

impl ModelAttempt {
    pub fn succeeded(&self) -> bool {
        self.output.is_some()
    }
}

/// Result of a multi-model query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ConsensusResult {
    #[serde(rename_all = "camelCase")]
    Selected {
        result: String,
        model_used: String,
        score: f64,
        raw: Vec<ModelAttempt>,
    },
    AllFailed { raw: Vec<ModelAttempt> },
}

impl ConsensusResult {
    pub fn attempts(&self) -> &[ModelAttempt] {
        match self {
            Self::Selected { raw, .. } | Self::AllFailed { raw } => raw,
        }
    }

    /// Selected text and the model that produced it.
    pub fn selected(&self) -> Option<(&str, &str)> {
        match self {
            Self::Selected {
                result, model_used, ..
            } => Some((result, model_used)),
            Self::AllFailed { .. } => None,
        }
    }
}

/// Parameters for [`query_multi`].
#[derive(Debug, Clone)]
pub struct MultiQuery {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub models: Vec<String>,
    pub strategy: Strategy,
    pub timeout: Duration,
    pub max_workers: usize,
    pub priority: Vec<String>,
}

impl MultiQuery {
    pub fn new(prompt: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            models,
            strategy: Strategy::default(),
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            max_workers: crate::config::DEFAULT_MAX_WORKERS,
            priority: Vec::new(),
        }
    }

    /// Strategy, timeout, workers and priority from `config`.
    pub fn configured(mut self, config: &InterpreterConfig) -> Self {
        self.strategy = config.strategy;
        self.timeout = config.timeout();
        self.max_workers = config.max_workers;
        self.priority = config.priority.clone();
        self
    }

    pub fn system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn priority(mut self, priority: Vec<String>) -> Self {
        self.priority = priority;
        self
    }
}

/// Query every model concurrently and select one answer.
pub async fn query_multi(generator: Arc<dyn TextGenerator>, query: &MultiQuery) -> ConsensusResult {
    let permits = Arc::new(Semaphore::new(query.max_workers.max(1)));

    let calls = query.models.iter().map(|model| {
        let generator = Arc::clone(&generator);
        let permits = Arc::clone(&permits);
        let mut request = GenerationRequest::new(model.clone(), query.prompt.clone())
            .timeout(query.timeout);
        request.system_prompt = query.system_prompt.clone();

        async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    return ModelAttempt {
                        model: request.model,
                        output: None,
                        error: Some(e.to_string()),
                        latency_ms: 0,
                    }
                }
            };

            let started = Instant::now();
            let outcome = tokio::time::timeout(request.timeout, generator.generate(&request)).await;
            let latency_ms = started.elapsed().as_millis() as u64;

            let (output, error) = match outcome {
                Ok(Ok(text)) => (Some(text), None),
                Ok(Err(e)) => (None, Some(e.to_string())),
                Err(_) => (
                    None,
                    Some(
                        LlmError::Timeout {
                            model: request.model.clone(),
                            seconds: request.timeout.as_secs(),
                        }
                        .to_string(),
                    ),
                ),
            };
            if let Some(error) = &error {
                warn!("Model {} failed: {}", request.model, error);
            }

            ModelAttempt {
                model: request.model,
                output,
                error,
                latency_ms,
            }
        }
    });

    let attempts = join_all(calls).await;
    select(attempts, query.strategy, &query.priority)
}

/// Pick one answer among `attempts`.
pub fn select(attempts: Vec<ModelAttempt>, strategy: Strategy, priority: &[String]) -> ConsensusResult {
    let successes: Vec<usize> = attempts
        .iter()
        .enumerate()
        .filter(|(_, a)| a.succeeded())
        .map(|(i, _)| i)
        .collect();

    if successes.is_empty() {
        warn!("All {} models failed", attempts.len());
        return ConsensusResult::AllFailed { raw: attempts };
    }

    let outputs: Vec<&str> = successes
        .iter()
        .map(|&i| attempts[i].output.as_deref().unwrap_or_default())
        .collect();
    let rank = |pos: usize| priority_rank(priority, &attempts[successes[pos]].model);

    let (chosen, score) = if successes.len() == 1 {
        (0, 1.0)
    } else {
        let matrix = similarity_matrix(&outputs);
        let average = |pos: usize| {
            let others = matrix.len() - 1;
            matrix[pos]
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != pos)
                .map(|(_, s)| s)
                .sum::<f64>()
                / others as f64
        };

        match strategy {
            Strategy::Consensus => {
                let chosen = (0..outputs.len())
                    .min_by(|&a, &b| {
                        average(b)
                            .total_cmp(&average(a))
                            .then_with(|| rank(a).cmp(&rank(b)))
                    })
                    .unwrap_or(0);
                (chosen, average(chosen))
            }
            Strategy::Majority => {
                let clusters = cluster(&matrix);
                let best = clusters
                    .iter()
                    .min_by(|a, b| {
                        b.len().cmp(&a.len()).then_with(|| {
                            let ra = a.iter().map(|&p| rank(p)).min();
                            let rb = b.iter().map(|&p| rank(p)).min();
                            ra.cmp(&rb)
                        })
                    })
                    .cloned()
                    .unwrap_or_else(|| vec![0]);
                let chosen = best
                    .iter()
                    .copied()
                    .min_by_key(|&p| (rank(p), p))
                    .unwrap_or(0);
                (chosen, best.len() as f64 / outputs.len() as f64)
            }
            Strategy::Best => {
                let chosen = (0..outputs.len()).min_by_key(|&p| (rank(p), p)).unwrap_or(0);
                (chosen, average(chosen))
            }
            Strategy::Fastest => {
                let chosen = (0..outputs.len())
                    .min_by_key(|&p| (attempts[successes[p]].latency_ms, p))
                    .unwrap_or(0);
                (chosen, average(chosen))
            }
        }
    };

    let attempt = &attempts[successes[chosen]];
    let result = outputs[chosen].to_string();
    let model_used = attempt.model.clone();
    info!(
        "Selected {} ({} strategy, score {:.2}, {}/{} answered)",
        model_used,
        strategy,
        score,
        successes.len(),
        attempts.len()
    );

    ConsensusResult::Selected {
        result,
        model_used,
        score,
        raw: attempts,
    }
}

fn priority_rank(priority: &[String], model: &str) -> usize {
    priority
        .iter()
        .position(|p| p == model)
        .unwrap_or(usize::MAX)
}

fn similarity_matrix(outputs: &[&str]) -> Vec<Vec<f64>> {
    let n = outputs.len();
    let mut matrix = vec![vec![1.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let s = similarity(outputs[i], outputs[j]);
            matrix[i][j] = s;
            matrix[j][i] = s;
        }
    }
    matrix
}

/// Group positions whose similarity to a cluster's first member reaches
/// [`MAJORITY_THRESHOLD`].
fn cluster(matrix: &[Vec<f64>]) -> Vec<Vec<usize>> {
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for pos in 0..matrix.len() {
        match clusters
            .iter_mut()
            .find(|c| matrix[c[0]][pos] >= MAJORITY_THRESHOLD)
        {
            Some(cluster) => cluster.push(pos),
            None => clusters.push(vec![pos]),
        }
    }
    debug!("Formed {} answer clusters", clusters.len());
    clusters
}

/// Similarity of two answers in `[0, 1]`.
///
/// JSON objects compare by key overlap and matching values of shared keys
/// (nested objects flattened to dotted paths); anything else by word-set
/// Jaccard.
pub fn similarity(a: &str, b: &str) -> f64 {
    let objects = (
        parse_lenient(a).filter(Value::is_object),
        parse_lenient(b).filter(Value::is_object),
    );
    match objects {
        (Some(x), Some(y)) => json_similarity(&x, &y),
        _ => jaccard(a, b),
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, inner, out);
            }
        }
        other => {
            out.insert(prefix.to_string(), other.clone());
        }
    }
}

fn json_similarity(a: &Value, b: &Value) -> f64 {
    let mut left = BTreeMap::new();
    let mut right = BTreeMap::new();
    flatten("", a, &mut left);
    flatten("", b, &mut right);

    let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();
    if keys.is_empty() {
        return 1.0;
    }
    let common: Vec<&String> = left.keys().filter(|k| right.contains_key(*k)).collect();
    let key_overlap = common.len() as f64 / keys.len() as f64;
    let value_match = if common.is_empty() {
        0.0
    } else {
        common.iter().filter(|k| left.get(**k) == right.get(**k)).count() as f64
            / common.len() as f64
    };
    (key_overlap + value_match) / 2.0
}

fn words(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn jaccard(a: &str, b: &str) -> f64 {
    let (a, b) = (words(a), words(b));
    let union = a.union(&b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}
