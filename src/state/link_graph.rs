use crate::storage::CheckpointSnapshot;
use crate::url::{Rejection, UrlValidator};
use std::collections::{HashMap, VecDeque};

/// Link counters of one discovered URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkNode {
    /// Number of links pointing at this URL
    pub incoming: u64,

    /// Number of in-scope links found on this page
    pub outgoing: u64,

    /// Discovery order; keeps output stable across checkpoints
    pub seq: u64,
}

/// What `record` did with a discovered link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The link failed validation and was dropped
    Rejected(Rejection),
    /// The target was already known; its incoming counter went up
    Counted,
    /// The target was new; a node was created and it was queued
    Enqueued,
}

/// Mutable crawl progress: the work queue, the node mapping and the visit counter
///
/// A URL is queued at most once per crawl; presence in the node mapping is
/// the only deduplication key.
#[derive(Debug, Clone)]
pub struct CrawlState {
    validator: UrlValidator,
    queue: VecDeque<String>,
    nodes: HashMap<String, LinkNode>,
    visited: u64,
    next_seq: u64,
}

impl CrawlState {
    /// Creates a state seeded with the root (`incoming = 0`, `outgoing = 0`)
    pub fn new(validator: UrlValidator) -> Self {
        let root = validator.target().root().to_string();

        let mut state = Self {
            validator,
            queue: VecDeque::new(),
            nodes: HashMap::new(),
            visited: 0,
            next_seq: 0,
        };
        state.insert_node(root.clone(), 0);
        state.queue.push_back(root);
        state
    }

    /// Replaces queue, mapping and counter with a stored snapshot
    pub fn restore(&mut self, snapshot: CheckpointSnapshot) {
        self.queue = snapshot.queue.into_iter().collect();
        self.next_seq = snapshot
            .nodes
            .iter()
            .map(|(_, node)| node.seq + 1)
            .max()
            .unwrap_or(0);
        self.nodes = snapshot.nodes.into_iter().collect();
        self.visited = snapshot.visited;
    }

    /// Captures the current progress, nodes ordered by discovery
    pub fn snapshot(&self) -> CheckpointSnapshot {
        CheckpointSnapshot {
            queue: self.queue.iter().cloned().collect(),
            nodes: self.nodes_in_order(),
            visited: self.visited,
            config_hash: None,
            saved_at: None,
        }
    }

    /// Counts one visit and dequeues the next URL (FIFO)
    ///
    /// Returns the visit number and the URL, or `None` when the queue is empty.
    pub fn begin_visit(&mut self) -> Option<(u64, String)> {
        let url = self.queue.pop_front()?;
        self.visited += 1;
        Some((self.visited, url))
    }

    /// Records a link from `source` to `target`
    ///
    /// Links failing validation are dropped. Otherwise the source's outgoing
    /// counter goes up, and the target's incoming counter goes up or the
    /// target is created with `incoming = 1` and queued.
    pub fn record(&mut self, source: &str, target: &str) -> RecordOutcome {
        if let Err(rejection) = self.validator.check(target) {
            return RecordOutcome::Rejected(rejection);
        }

        if let Some(node) = self.nodes.get_mut(source) {
            node.outgoing += 1;
        }

        if let Some(node) = self.nodes.get_mut(target) {
            node.incoming += 1;
            RecordOutcome::Counted
        } else {
            self.insert_node(target.to_string(), 1);
            self.queue.push_back(target.to_string());
            RecordOutcome::Enqueued
        }
    }

    /// Ends the accumulation phase; counters can no longer change
    pub fn finish(self) -> CompletedCrawl {
        CompletedCrawl {
            validator: self.validator,
            nodes: self.nodes,
            visited: self.visited,
        }
    }

    pub fn validator(&self) -> &UrlValidator {
        &self.validator
    }

    pub fn visited(&self) -> u64 {
        self.visited
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, url: &str) -> Option<&LinkNode> {
        self.nodes.get(url)
    }

    fn insert_node(&mut self, url: String, incoming: u64) {
        let node = LinkNode {
            incoming,
            outgoing: 0,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.nodes.insert(url, node);
    }

    fn nodes_in_order(&self) -> Vec<(String, LinkNode)> {
        sorted_by_seq(&self.nodes)
    }
}

/// Final link counts of a crawl that reached `Completed`
///
/// Only this type can be classified, so priorities are never derived from
/// counters that are still changing.
#[derive(Debug, Clone)]
pub struct CompletedCrawl {
    validator: UrlValidator,
    nodes: HashMap<String, LinkNode>,
    visited: u64,
}

impl CompletedCrawl {
    pub fn validator(&self) -> &UrlValidator {
        &self.validator
    }

    /// Number of pages visited across all execution cycles
    pub fn visited(&self) -> u64 {
        self.visited
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, url: &str) -> Option<&LinkNode> {
        self.nodes.get(url)
    }

    /// All discovered URLs with their counters, in discovery order
    pub fn nodes(&self) -> Vec<(String, LinkNode)> {
        sorted_by_seq(&self.nodes)
    }
}

fn sorted_by_seq(nodes: &HashMap<String, LinkNode>) -> Vec<(String, LinkNode)> {
    let mut nodes: Vec<(String, LinkNode)> = nodes
        .iter()
        .map(|(url, node)| (url.clone(), *node))
        .collect();
    nodes.sort_by_key(|(_, node)| node.seq);
    nodes
}
