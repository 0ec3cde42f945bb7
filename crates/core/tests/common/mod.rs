#![allow(dead_code)]

use async_trait::async_trait;
use schemascope_api::{Direction, LookupError, LookupResult, LookupService, Relation, SUBCLASS_OF};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// In-memory subclass hierarchy with failure injection and call accounting.
#[derive(Default)]
pub struct MockLookup {
    edges: HashMap<String, Vec<String>>,
    failures: Mutex<HashMap<String, usize>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    calls: Mutex<Vec<String>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(mut self, node: &str, children: &[&str]) -> Self {
        self.edges.insert(
            node.to_string(),
            children.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    /// Every lookup of `node` fails.
    pub fn failing(self, node: &str) -> Self {
        self.fail_times(node, usize::MAX);
        self
    }

    /// The next `times` lookups of `node` fail, later ones succeed.
    pub fn fail_times(&self, node: &str, times: usize) {
        self.failures
            .lock()
            .unwrap()
            .insert(node.to_string(), times);
    }

    /// Hold the next lookup of `node` open until a permit is added to the returned gate.
    pub fn arm_gate(&self, node: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates
            .lock()
            .unwrap()
            .insert(node.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn calls_for(&self, node: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.as_str() == node)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn into_service(self) -> (Arc<Self>, Arc<dyn LookupService>) {
        let mock = Arc::new(self);
        let service: Arc<dyn LookupService> = mock.clone();
        (mock, service)
    }
}

#[async_trait]
impl LookupService for MockLookup {
    async fn related(&self, node: &str, relation: &Relation) -> LookupResult<Vec<String>> {
        self.calls.lock().unwrap().push(node.to_string());

        let gate = self.gates.lock().unwrap().remove(node);
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }

        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(node) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(LookupError::Transport(format!("lookup of {} failed", node)));
                }
            }
        }

        if relation.property != SUBCLASS_OF || relation.direction != Direction::Incoming {
            return Ok(Vec::new());
        }
        Ok(self.edges.get(node).cloned().unwrap_or_default())
    }
}

/// Thing -> Person, Place; Person -> Athlete, Student; Student -> Graduate
pub fn sample_hierarchy() -> MockLookup {
    MockLookup::new()
        .with_children("Thing", &["Person", "Place"])
        .with_children("Person", &["Athlete", "Student"])
        .with_children("Student", &["Graduate"])
}
