//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Serves a cassette's interactions in recorded order, independently per
/// `port::method` pair.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Index the interactions of `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Interactions not yet served, across all pairs.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Take the next interaction for `port::method`.
    ///
    /// # Panics
    ///
    /// Panics with the requested pair and the pairs still available when the
    /// cassette has nothing (left) for the pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        if let Some(interaction) = self.queues.get_mut(&key).and_then(VecDeque::pop_front) {
            return interaction;
        }

        let mut available: Vec<String> = self
            .queues
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|((p, m), queue)| format!("{p}::{m} ({} left)", queue.len()))
            .collect();
        available.sort();
        panic!(
            "Cassette exhausted: no interactions left for {port}::{method}. Available: [{}]",
            available.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input: json!({}),
            output,
        }
    }

    fn cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "t".into(),
            recorded_at: Utc::now(),
            commit: "c".into(),
            interactions,
        }
    }

    #[test]
    fn serves_each_pair_in_recorded_order() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![
            interaction(0, "http", "get", json!("issue")),
            interaction(1, "http", "get", json!("comments")),
            interaction(2, "llm", "complete", json!("analysis")),
        ]));
        assert_eq!(replayer.remaining(), 3);

        assert_eq!(replayer.next_interaction("llm", "complete").seq, 2);
        assert_eq!(
            replayer.next_interaction("http", "get").output,
            json!("issue")
        );
        assert_eq!(
            replayer.next_interaction("http", "get").output,
            json!("comments")
        );
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "no interactions left for llm::complete")]
    fn exhausted_pair_panics() {
        let recorded = cassette(vec![interaction(0, "llm", "complete", json!(1))]);
        let mut replayer = CassetteReplayer::new(&recorded);
        let _ = replayer.next_interaction("llm", "complete");
        let _ = replayer.next_interaction("llm", "complete");
    }

    #[test]
    #[should_panic(expected = "http::get (1 left)")]
    fn panic_lists_what_is_left() {
        let recorded = cassette(vec![interaction(0, "http", "get", json!(1))]);
        let mut replayer = CassetteReplayer::new(&recorded);
        let _ = replayer.next_interaction("llm", "complete");
    }
}
