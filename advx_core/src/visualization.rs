//! Derived network-visualization state.
//!
//! The front end draws the pretend classifier as a five-layer graph and
//! highlights nodes the current attack has "reached". Which nodes light
//! up is pure derived state: a function of the current confidence and
//! the step seed, recomputed on demand and never stored in the engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::rng;

/// Node counts per rendered layer, input to output.
pub const TOPOLOGY: [usize; 5] = [4, 8, 8, 6, 3];

/// Confidence above which no node is rendered as attacked.
pub const ATTACK_DISPLAY_THRESHOLD: f64 = 80.0;

/// Reported parameter count of the pretend classifier.
pub const TOTAL_PARAMS: u64 = 1_234_567;

/// A single node in the rendered graph, ordered by layer then index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeRef {
    pub layer: usize,
    pub node: usize,
}

/// Computes the set of highlighted nodes for a confidence level.
///
/// Above the display threshold the set is empty. Below it, the number
/// of draws scales with lost confidence (5 at full confidence up to 30
/// near zero); each draw picks a layer at `seed + 11 + 3i` and a node
/// within it at `seed + 12 + 3i`. Collisions collapse, so the set is
/// usually smaller than the draw count.
pub fn attacked_node_set(confidence: f64, seed: f64) -> BTreeSet<NodeRef> {
    let mut nodes = BTreeSet::new();
    if confidence > ATTACK_DISPLAY_THRESHOLD {
        return nodes;
    }
    let draws = ((1.0 - confidence / 100.0) * 25.0 + 5.0) as usize;
    for i in 0..draws {
        let base = seed + 3.0 * i as f64;
        let layer = rng::index_hash(base + 11.0, TOPOLOGY.len());
        let node = rng::index_hash(base + 12.0, TOPOLOGY[layer]);
        nodes.insert(NodeRef { layer, node });
    }
    nodes
}

/// Pixel frame the graph is projected into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
        }
    }
}

/// One positioned node with its attack flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub layer: usize,
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub attacked: bool,
}

/// The full projected graph for one engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkView {
    pub frame: Frame,
    pub nodes: Vec<NodeView>,
}

impl NetworkView {
    /// Projects the topology onto a frame, spacing layers evenly on the
    /// x axis and nodes evenly on the y axis within each layer.
    pub fn project(frame: Frame, attacked: &BTreeSet<NodeRef>) -> Self {
        let layer_count = TOPOLOGY.len();
        let mut nodes = Vec::with_capacity(TOPOLOGY.iter().sum());
        for (layer, &width) in TOPOLOGY.iter().enumerate() {
            let x = frame.width * (layer + 1) as f64 / (layer_count + 1) as f64;
            for index in 0..width {
                let y = frame.height * (index + 1) as f64 / (width + 1) as f64;
                nodes.push(NodeView {
                    layer,
                    index,
                    x,
                    y,
                    attacked: attacked.contains(&NodeRef { layer, node: index }),
                });
            }
        }
        Self { frame, nodes }
    }

    pub fn attacked_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.attacked).count()
    }
}

/// One row of the descriptive architecture table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArchLayer {
    pub kind: &'static str,
    pub units: u32,
    pub activation: Option<&'static str>,
    pub kernel: Option<u32>,
    pub pool_size: Option<u32>,
    pub dropout_rate: Option<f64>,
}

impl ArchLayer {
    const fn new(kind: &'static str, units: u32, activation: Option<&'static str>) -> Self {
        Self {
            kind,
            units,
            activation,
            kernel: None,
            pool_size: None,
            dropout_rate: None,
        }
    }

    const fn with_kernel(mut self, kernel: u32) -> Self {
        self.kernel = Some(kernel);
        self
    }

    const fn with_pool(mut self, pool: u32) -> Self {
        self.pool_size = Some(pool);
        self
    }

    const fn with_dropout(mut self, rate: f64) -> Self {
        self.dropout_rate = Some(rate);
        self
    }
}

/// Fixed description of the pretend classifier, for architecture panels.
/// Purely cosmetic; the simulation never evaluates these layers.
pub const ARCHITECTURE: [ArchLayer; 9] = [
    ArchLayer::new("input", 784, None),
    ArchLayer::new("conv2d", 32, Some("relu")).with_kernel(3),
    ArchLayer::new("conv2d", 64, Some("relu")).with_kernel(3),
    ArchLayer::new("maxpool", 64, None).with_pool(2),
    ArchLayer::new("flatten", 1600, None),
    ArchLayer::new("dense", 256, Some("relu")),
    ArchLayer::new("dropout", 256, None).with_dropout(0.5),
    ArchLayer::new("dense", 128, Some("relu")),
    ArchLayer::new("output", 10, Some("softmax")),
];

pub fn model_architecture() -> &'static [ArchLayer] {
    &ARCHITECTURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn refs(pairs: &[(usize, usize)]) -> BTreeSet<NodeRef> {
        pairs
            .iter()
            .map(|&(layer, node)| NodeRef { layer, node })
            .collect()
    }

    #[test]
    fn test_high_confidence_has_no_attacked_nodes() {
        assert!(attacked_node_set(85.0, 47.0).is_empty());
        assert!(attacked_node_set(80.1, 99.0).is_empty());
    }

    #[test]
    fn test_attacked_set_golden_mid_confidence() {
        // 16 draws at confidence 55, collapsing to 12 distinct nodes.
        let set = attacked_node_set(55.0, 47.0);
        let expected = refs(&[
            (0, 2),
            (1, 0),
            (1, 5),
            (1, 6),
            (1, 7),
            (2, 0),
            (2, 3),
            (2, 4),
            (3, 3),
            (3, 5),
            (4, 0),
            (4, 1),
        ]);
        assert_eq!(set, expected);
    }

    #[test]
    fn test_attacked_set_golden_low_confidence() {
        // 26 draws at confidence 12.5 collapse to 18 distinct nodes.
        let set = attacked_node_set(12.5, 99.0);
        assert_eq!(set.len(), 18);
        assert!(set.contains(&NodeRef { layer: 0, node: 1 }));
        assert!(set.contains(&NodeRef { layer: 4, node: 2 }));
    }

    #[test]
    fn test_attacked_set_is_deterministic() {
        for seed in 0..20 {
            let a = attacked_node_set(40.0, seed as f64);
            let b = attacked_node_set(40.0, seed as f64);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_attacked_nodes_stay_in_topology() {
        for seed in 0..50 {
            for node in attacked_node_set(10.0, seed as f64) {
                assert!(node.layer < TOPOLOGY.len());
                assert!(node.node < TOPOLOGY[node.layer]);
            }
        }
    }

    #[test]
    fn test_projection_positions() {
        let view = NetworkView::project(Frame::default(), &BTreeSet::new());
        assert_eq!(view.nodes.len(), TOPOLOGY.iter().sum::<usize>());

        let first = &view.nodes[0];
        assert_eq!((first.layer, first.index), (0, 0));
        assert_relative_eq!(first.x, 800.0 / 6.0, max_relative = 1e-12);
        assert_relative_eq!(first.y, 100.0, max_relative = 1e-12);

        let mid = view
            .nodes
            .iter()
            .find(|n| n.layer == 2 && n.index == 3)
            .unwrap();
        assert_relative_eq!(mid.x, 400.0, max_relative = 1e-12);
        assert_relative_eq!(mid.y, 500.0 * 4.0 / 9.0, max_relative = 1e-12);

        let last = view.nodes.last().unwrap();
        assert_eq!((last.layer, last.index), (4, 2));
        assert_relative_eq!(last.y, 375.0, max_relative = 1e-12);
    }

    #[test]
    fn test_projection_flags_attacked_nodes() {
        let attacked = attacked_node_set(55.0, 47.0);
        let view = NetworkView::project(Frame::default(), &attacked);
        assert_eq!(view.attacked_count(), attacked.len());
        for node in &view.nodes {
            let expected = attacked.contains(&NodeRef {
                layer: node.layer,
                node: node.index,
            });
            assert_eq!(node.attacked, expected);
        }
    }

    #[test]
    fn test_architecture_table() {
        assert_eq!(ARCHITECTURE.len(), 9);
        assert_eq!(ARCHITECTURE[0].kind, "input");
        assert_eq!(ARCHITECTURE[0].units, 784);
        assert_eq!(ARCHITECTURE[8].activation, Some("softmax"));
        assert_eq!(ARCHITECTURE[8].units, 10);
        assert_eq!(TOTAL_PARAMS, 1_234_567);
    }
}
