//! Control-flow graph of basic blocks.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::block::{Block, check_name};
use crate::error::{IrError, IrResult};
use crate::register::{Condition, RegisterFile};

/// Node index type for the control-flow graph.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the control-flow graph.
///
/// Nesting is one level deep: every arm or body is a plain [`Block`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlNode {
    /// Straight-line block.
    Block(Block),
    /// Two-armed conditional.
    IfElse {
        /// Branch condition.
        condition: Condition,
        /// Block taken when the condition holds.
        then_block: Block,
        /// Block taken otherwise.
        else_block: Block,
    },
    /// Counted loop.
    For {
        /// Loop body.
        body: Block,
        /// Number of iterations; zero means the body never runs.
        iterations: u32,
    },
    /// Post-tested loop: the body runs once, then repeats while the condition holds.
    DoWhile {
        /// Loop body.
        body: Block,
        /// Continuation condition.
        condition: Condition,
    },
}

impl ControlNode {
    /// Short name of the construct.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ControlNode::Block(_) => "block",
            ControlNode::IfElse { .. } => "if-else",
            ControlNode::For { .. } => "for",
            ControlNode::DoWhile { .. } => "do-while",
        }
    }

    /// The blocks owned by this node, in lowering order.
    pub fn blocks(&self) -> Vec<&Block> {
        match self {
            ControlNode::Block(block) => vec![block],
            ControlNode::IfElse {
                then_block,
                else_block,
                ..
            } => vec![then_block, else_block],
            ControlNode::For { body, .. } | ControlNode::DoWhile { body, .. } => vec![body],
        }
    }

    /// The branch or loop condition, if the node has one.
    pub fn condition(&self) -> Option<&Condition> {
        match self {
            ControlNode::IfElse { condition, .. } | ControlNode::DoWhile { condition, .. } => {
                Some(condition)
            }
            ControlNode::Block(_) | ControlNode::For { .. } => None,
        }
    }

    /// Check if this node carries a back edge.
    #[inline]
    pub fn is_loop(&self) -> bool {
        matches!(self, ControlNode::For { .. } | ControlNode::DoWhile { .. })
    }
}

/// An edge in the control-flow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowEdge {
    /// Fall-through to the next node in program order.
    Next,
    /// Counted-loop back edge.
    Repeat {
        /// Iteration count of the loop.
        iterations: u32,
    },
    /// Post-tested loop back edge, taken while the condition holds.
    LoopWhile(Condition),
}

impl FlowEdge {
    /// Check if this is a loop back edge.
    #[inline]
    pub fn is_back_edge(&self) -> bool {
        !matches!(self, FlowEdge::Next)
    }
}

/// A quantum program: declared sizes plus a control-flow graph.
///
/// Nodes are appended in program order and chained by [`FlowEdge::Next`]
/// edges. Loop nodes additionally carry a self edge recording their back
/// edge. Every qubit and register index is validated when its node is added,
/// so a `Program` that exists is always well-formed.
///
/// ```rust
/// use qlower_ir::{Block, CmpOp, Condition, Program, QubitId, RegisterId};
///
/// let mut program = Program::new("classical_flow", 2, 2);
///
/// let mut init = Block::new("init");
/// init.prepz(QubitId(0)).prepz(QubitId(1));
/// program.add_block(init).unwrap();
///
/// let mut then_block = Block::new("then");
/// then_block.x(QubitId(0));
/// let mut else_block = Block::new("else");
/// else_block.y(QubitId(1));
/// let cond = Condition::new(RegisterId(0), CmpOp::Eq, RegisterId(1));
/// program.add_if_else(then_block, else_block, cond).unwrap();
///
/// assert_eq!(program.len(), 2);
/// assert!(program.verify_integrity().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Program {
    name: String,
    num_qubits: u32,
    num_registers: u32,
    graph: DiGraph<ControlNode, FlowEdge, u32>,
    entry: Option<NodeIndex>,
    tail: Option<NodeIndex>,
}

impl Program {
    /// Create an empty program with the given declared sizes.
    ///
    /// The name is checked with [`is_valid_name`](crate::is_valid_name)
    /// when the first node is added.
    pub fn new(name: impl Into<String>, num_qubits: u32, num_registers: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_registers,
            graph: DiGraph::default(),
            entry: None,
            tail: None,
        }
    }

    /// Append a straight-line block.
    pub fn add_block(&mut self, block: Block) -> IrResult<NodeIndex> {
        self.push_node(ControlNode::Block(block))
    }

    /// Append an if/else construct.
    pub fn add_if_else(
        &mut self,
        then_block: Block,
        else_block: Block,
        condition: Condition,
    ) -> IrResult<NodeIndex> {
        self.push_node(ControlNode::IfElse {
            condition,
            then_block,
            else_block,
        })
    }

    /// Append a counted loop running `body` exactly `iterations` times.
    pub fn add_for(&mut self, body: Block, iterations: u32) -> IrResult<NodeIndex> {
        self.push_node(ControlNode::For { body, iterations })
    }

    /// Append a post-tested loop.
    pub fn add_do_while(&mut self, body: Block, condition: Condition) -> IrResult<NodeIndex> {
        self.push_node(ControlNode::DoWhile { body, condition })
    }

    /// Validate a node, then link it after the current tail.
    ///
    /// Validation runs before the graph is touched, so a rejected node
    /// leaves the program unchanged.
    fn push_node(&mut self, node: ControlNode) -> IrResult<NodeIndex> {
        check_name(&self.name)?;
        self.validate_node(&node)?;

        let back_edge = match &node {
            ControlNode::For { iterations, .. } => Some(FlowEdge::Repeat {
                iterations: *iterations,
            }),
            ControlNode::DoWhile { condition, .. } => Some(FlowEdge::LoopWhile(*condition)),
            ControlNode::Block(_) | ControlNode::IfElse { .. } => None,
        };

        let idx = self.graph.add_node(node);
        if let Some(edge) = back_edge {
            self.graph.add_edge(idx, idx, edge);
        }
        match self.tail {
            Some(prev) => {
                self.graph.add_edge(prev, idx, FlowEdge::Next);
            }
            None => self.entry = Some(idx),
        }
        self.tail = Some(idx);
        Ok(idx)
    }

    fn validate_node(&self, node: &ControlNode) -> IrResult<()> {
        for block in node.blocks() {
            block.validate(self.num_qubits)?;
        }
        if let Some(condition) = node.condition() {
            condition.validate(self.num_registers)?;
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Declared number of classical registers.
    pub fn num_registers(&self) -> u32 {
        self.num_registers
    }

    /// Number of control nodes.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Check if the program has no control nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Entry node, if any.
    pub fn entry(&self) -> Option<NodeIndex> {
        self.entry
    }

    /// Get a node by index.
    pub fn node(&self, idx: NodeIndex) -> Option<&ControlNode> {
        self.graph.node_weight(idx)
    }

    /// Iterate control nodes in program order.
    ///
    /// Walks the `Next` chain from the entry node.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &ControlNode)> + '_ {
        let mut current = self.entry;
        std::iter::from_fn(move || {
            let idx = current?;
            current = self.next_of(idx);
            Some((idx, &self.graph[idx]))
        })
    }

    fn next_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .find(|e| matches!(e.weight(), FlowEdge::Next))
            .map(|e| e.target())
    }

    /// Get the underlying graph.
    pub fn graph(&self) -> &DiGraph<ControlNode, FlowEdge, u32> {
        &self.graph
    }

    /// Fresh zero-initialised register bank of the declared size.
    pub fn register_file(&self) -> RegisterFile {
        RegisterFile::new(self.num_registers)
    }

    /// Total number of operations across every block (loops not unrolled).
    pub fn num_operations(&self) -> usize {
        self.graph
            .node_weights()
            .flat_map(ControlNode::blocks)
            .map(Block::len)
            .sum()
    }

    /// Verify the structural integrity of the control-flow graph.
    ///
    /// Checks that:
    /// - The program name is a valid listing name
    /// - A non-empty graph has an entry with no incoming `Next` edge
    /// - `Next` edges form a single linear chain covering every node
    /// - Back edges are self edges on loop nodes and match the node's data
    pub fn verify_integrity(&self) -> IrResult<()> {
        check_name(&self.name)?;

        let Some(entry) = self.entry else {
            if self.graph.node_count() == 0 {
                return Ok(());
            }
            return Err(IrError::InvalidGraph("Graph has nodes but no entry".into()));
        };

        // 1. Entry has no predecessor
        if self
            .graph
            .edges_directed(entry, Direction::Incoming)
            .any(|e| matches!(e.weight(), FlowEdge::Next))
        {
            return Err(IrError::InvalidGraph(format!(
                "Entry node {} has an incoming fall-through edge",
                entry.index()
            )));
        }

        // 2. Edge shape
        for edge in self.graph.edge_references() {
            let (src, dst) = (edge.source(), edge.target());
            match edge.weight() {
                FlowEdge::Next => {
                    if src == dst {
                        return Err(IrError::InvalidGraph(format!(
                            "Node {} falls through to itself",
                            src.index()
                        )));
                    }
                }
                back => {
                    if src != dst {
                        return Err(IrError::InvalidGraph(format!(
                            "Back edge {} -> {} is not a self edge",
                            src.index(),
                            dst.index()
                        )));
                    }
                    let consistent = match (&self.graph[src], back) {
                        (ControlNode::For { iterations, .. }, FlowEdge::Repeat { iterations: n }) => {
                            iterations == n
                        }
                        (ControlNode::DoWhile { condition, .. }, FlowEdge::LoopWhile(c)) => {
                            condition == c
                        }
                        _ => false,
                    };
                    if !consistent {
                        return Err(IrError::InvalidGraph(format!(
                            "Back edge on node {} does not match its {} construct",
                            src.index(),
                            self.graph[src].kind_name()
                        )));
                    }
                }
            }
        }

        // 3. Every loop node has exactly one back edge
        for idx in self.graph.node_indices() {
            let back_edges = self
                .graph
                .edges_directed(idx, Direction::Outgoing)
                .filter(|e| e.weight().is_back_edge())
                .count();
            let expected = usize::from(self.graph[idx].is_loop());
            if back_edges != expected {
                return Err(IrError::InvalidGraph(format!(
                    "Node {} has {back_edges} back edges, expected {expected}",
                    idx.index()
                )));
            }
        }

        // 4. The Next chain is linear and reaches every node
        let mut visited = FxHashSet::default();
        let mut current = Some(entry);
        while let Some(idx) = current {
            if !visited.insert(idx) {
                return Err(IrError::InvalidGraph(format!(
                    "Fall-through chain revisits node {}",
                    idx.index()
                )));
            }
            let successors = self
                .graph
                .edges_directed(idx, Direction::Outgoing)
                .filter(|e| matches!(e.weight(), FlowEdge::Next))
                .count();
            if successors > 1 {
                return Err(IrError::InvalidGraph(format!(
                    "Node {} has {successors} fall-through successors",
                    idx.index()
                )));
            }
            current = self.next_of(idx);
        }
        if visited.len() != self.graph.node_count() {
            return Err(IrError::InvalidGraph(format!(
                "{} node(s) unreachable from entry",
                self.graph.node_count() - visited.len()
            )));
        }

        // 5. Declared sizes still hold
        for node in self.graph.node_weights() {
            self.validate_node(node)?;
        }

        Ok(())
    }
}
