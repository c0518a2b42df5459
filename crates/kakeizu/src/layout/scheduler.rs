//! Background layout passes with token-based staleness
//!
//! Every request gets a strictly increasing [`LayoutToken`] and runs on its
//! own thread. Results come back over a channel and are applied on
//! [`LayoutScheduler::poll`] or [`LayoutScheduler::wait`]:
//!
//! - only the result for the newest request is applied; older ones are stale
//! - a failed pass is logged and the previous graph stays rendered
//! - nodes and edges are replaced together, never one without the other

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, warn};

use super::GroupingLayout;
use crate::core::TreeError;
use crate::flow::{FlowBuilder, FlowGraph};
use crate::tree::Tree;

/// Version of a layout request
///
/// Token 0 is never issued; the first request gets 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LayoutToken(u64);

impl LayoutToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayoutToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to one finished request
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOutcome {
    /// Result became the rendered graph
    Applied(LayoutToken),
    /// A newer request was issued; result dropped
    Stale(LayoutToken),
    /// Engine failed; rendered graph untouched
    Failed { token: LayoutToken, message: String },
}

impl LayoutOutcome {
    pub fn token(&self) -> LayoutToken {
        match self {
            LayoutOutcome::Applied(token) | LayoutOutcome::Stale(token) => *token,
            LayoutOutcome::Failed { token, .. } => *token,
        }
    }
}

type Finished = (LayoutToken, Result<FlowGraph, TreeError>);

/// Runs layout passes off the caller's thread
pub struct LayoutScheduler {
    layout: GroupingLayout,
    tx: mpsc::Sender<Finished>,
    rx: mpsc::Receiver<Finished>,
    latest: LayoutToken,
    applied: Option<LayoutToken>,
    pending: usize,
    rendered: FlowGraph,
}

impl LayoutScheduler {
    pub fn new(layout: GroupingLayout) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            layout,
            tx,
            rx,
            latest: LayoutToken::default(),
            applied: None,
            pending: 0,
            rendered: FlowGraph::default(),
        }
    }

    /// Start laying out `graph`; supersedes every earlier request
    pub fn request(&mut self, graph: FlowGraph) -> LayoutToken {
        self.latest = LayoutToken(self.latest.0 + 1);
        let token = self.latest;
        let layout = self.layout.clone();
        let tx = self.tx.clone();
        debug!(%token, nodes = graph.nodes.len(), "Layout requested");

        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| layout.layout(graph)))
                .unwrap_or_else(|_| Err(TreeError::engine(layout.engine_name(), "engine panicked")));
            // Receiver gone means the scheduler was dropped; nothing to report to.
            let _ = tx.send((token, result));
        });

        self.pending += 1;
        token
    }

    /// Build the flow graph for `tree` with this scheduler's config and request it
    pub fn request_tree(&mut self, tree: &Tree) -> LayoutToken {
        let graph = FlowBuilder::with_config(self.layout.config().clone()).build(tree);
        self.request(graph)
    }

    /// Apply every result that has already arrived
    pub fn poll(&mut self) -> Vec<LayoutOutcome> {
        let mut outcomes = Vec::new();
        while let Ok((token, result)) = self.rx.try_recv() {
            outcomes.push(self.finish(token, result));
        }
        outcomes
    }

    /// Block until every in-flight request has finished, applying as they come
    pub fn wait(&mut self) -> Vec<LayoutOutcome> {
        let mut outcomes = Vec::new();
        while self.pending > 0 {
            match self.rx.recv() {
                Ok((token, result)) => outcomes.push(self.finish(token, result)),
                Err(_) => break,
            }
        }
        outcomes
    }

    fn finish(&mut self, token: LayoutToken, result: Result<FlowGraph, TreeError>) -> LayoutOutcome {
        self.pending = self.pending.saturating_sub(1);
        match result {
            Err(err) => {
                warn!(%token, error = %err, "Layout failed; keeping previous layout");
                LayoutOutcome::Failed {
                    token,
                    message: err.to_string(),
                }
            }
            Ok(_) if token != self.latest => {
                debug!(%token, latest = %self.latest, "Dropping stale layout");
                LayoutOutcome::Stale(token)
            }
            Ok(graph) => {
                self.rendered = graph;
                self.applied = Some(token);
                debug!(%token, nodes = self.rendered.nodes.len(), "Layout applied");
                LayoutOutcome::Applied(token)
            }
        }
    }

    /// The graph currently on screen
    pub fn rendered(&self) -> &FlowGraph {
        &self.rendered
    }

    /// Token of the rendered graph, if any pass has succeeded
    pub fn applied_token(&self) -> Option<LayoutToken> {
        self.applied
    }

    pub fn latest_token(&self) -> LayoutToken {
        self.latest
    }

    /// Requests not yet finished
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn layout(&self) -> &GroupingLayout {
        &self.layout
    }
}

impl fmt::Debug for LayoutScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutScheduler")
            .field("layout", &self.layout)
            .field("latest", &self.latest)
            .field("applied", &self.applied)
            .field("pending", &self.pending)
            .finish()
    }
}
