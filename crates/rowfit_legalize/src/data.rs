//! The placement network: nodes (cells and terminals) and their pins.
//!
//! The legalizer only reads node attributes and writes node positions; it
//! never adds or removes nodes. Positions are in database units with `left`
//! and `bottom` giving the lower-left corner.

use crate::ids::{NodeId, PinId};
use rowfit_arch::{CellGeometry, PowerRail, RegionId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The set of nodes and pins being legalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Network {
    /// All nodes, indexed by [`NodeId`].
    pub nodes: Vec<Node>,
    /// All pins, indexed by [`PinId`].
    pub pins: Vec<Pin>,
    /// Auxiliary index: node name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub node_by_name: HashMap<String, NodeId>,
}

impl Network {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its ID.
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        node.id = id;
        self.node_by_name.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    /// Adds a pin to `node` and returns its ID.
    pub fn add_pin(&mut self, node: NodeId, mut pin: Pin) -> PinId {
        let id = PinId::from_raw(self.pins.len() as u32);
        pin.id = id;
        pin.node = node;
        self.pins.push(pin);
        self.nodes[node.index()].pins.push(id);
        id
    }

    /// Returns the node with the given ID.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns a mutable reference to the node with the given ID.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Returns the pin with the given ID.
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.index()]
    }

    /// Iterates over the pins of `node`.
    pub fn pins_of(&self, node: NodeId) -> impl Iterator<Item = &Pin> + '_ {
        self.node(node).pins.iter().map(move |&p| self.pin(p))
    }

    /// Looks up a node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.node_by_name.get(name).copied()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over all node IDs in index order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId::from_raw)
    }

    /// Rebuilds auxiliary indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.node_by_name.clear();
        for (i, node) in self.nodes.iter().enumerate() {
            self.node_by_name
                .insert(node.name.clone(), NodeId::from_raw(i as u32));
        }
    }
}

/// A placeable cell, a fixed macro, or an I/O terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// This node's ID (assigned by [`Network::add_node`]).
    pub id: NodeId,
    /// Instance name.
    pub name: String,
    /// Left edge.
    pub left: i32,
    /// Bottom edge.
    pub bottom: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
    /// Whether the node may not move.
    pub fixed: bool,
    /// Whether the node is an I/O terminal.
    pub terminal: bool,
    /// Whether the node is a terminal that movable cells may overlap.
    pub terminal_ni: bool,
    /// Whether the node's footprint is given by separate shape nodes.
    pub defined_by_shapes: bool,
    /// Fence region the node must stay in.
    pub region: RegionId,
    /// Edge type on the left side.
    pub left_edge_type: usize,
    /// Edge type on the right side.
    pub right_edge_type: usize,
    /// Padding on the left side.
    pub left_padding: i32,
    /// Padding on the right side.
    pub right_padding: i32,
    /// Rail along the bottom edge.
    pub bottom_power: PowerRail,
    /// Rail along the top edge.
    pub top_power: PowerRail,
    /// Pins on this node.
    pub pins: Vec<PinId>,
}

impl Node {
    /// Creates a movable node in the default region with no rules attached.
    pub fn new(name: impl Into<String>, left: i32, bottom: i32, width: i32, height: i32) -> Self {
        Self {
            id: NodeId::from_raw(0),
            name: name.into(),
            left,
            bottom,
            width,
            height,
            fixed: false,
            terminal: false,
            terminal_ni: false,
            defined_by_shapes: false,
            region: RegionId::DEFAULT,
            left_edge_type: 0,
            right_edge_type: 0,
            left_padding: 0,
            right_padding: 0,
            bottom_power: PowerRail::Unknown,
            top_power: PowerRail::Unknown,
            pins: Vec::new(),
        }
    }

    /// Marks the node fixed.
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Assigns the node to a fence region.
    pub fn in_region(mut self, region: RegionId) -> Self {
        self.region = region;
        self
    }

    /// Sets the left and right edge types.
    pub fn with_edge_types(mut self, left: usize, right: usize) -> Self {
        self.left_edge_type = left;
        self.right_edge_type = right;
        self
    }

    /// Sets the left and right padding.
    pub fn with_padding(mut self, left: i32, right: i32) -> Self {
        self.left_padding = left;
        self.right_padding = right;
        self
    }

    /// Sets the bottom and top rails.
    pub fn with_power(mut self, bottom: PowerRail, top: PowerRail) -> Self {
        self.bottom_power = bottom;
        self.top_power = top;
        self
    }

    /// Right edge.
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Top edge.
    pub fn top(&self) -> i32 {
        self.bottom + self.height
    }

    /// Twice the x-center, kept integral for ordering.
    pub fn center2(&self) -> i64 {
        2 * self.left as i64 + self.width as i64
    }

    /// Whether the legalizer may move this node.
    pub fn is_movable(&self) -> bool {
        !(self.fixed || self.terminal || self.terminal_ni)
    }
}

impl CellGeometry for Node {
    fn height(&self) -> i32 {
        self.height
    }

    fn left_edge_type(&self) -> usize {
        self.left_edge_type
    }

    fn right_edge_type(&self) -> usize {
        self.right_edge_type
    }

    fn left_padding(&self) -> i32 {
        self.left_padding
    }

    fn right_padding(&self) -> i32 {
        self.right_padding
    }

    fn bottom_power(&self) -> PowerRail {
        self.bottom_power
    }

    fn top_power(&self) -> PowerRail {
        self.top_power
    }
}

/// A pin shape on a node, positioned relative to the node's center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// This pin's ID (assigned by [`Network::add_pin`]).
    pub id: PinId,
    /// Owning node (assigned by [`Network::add_pin`]).
    pub node: NodeId,
    /// X offset of the pin center from the node center.
    pub offset_x: f64,
    /// Y offset of the pin center from the node center.
    pub offset_y: f64,
    /// Pin shape width.
    pub width: f64,
    /// Pin shape height.
    pub height: f64,
    /// Routing layer of the pin shape.
    pub layer: usize,
}

impl Pin {
    /// Creates a pin shape; the IDs are filled in by [`Network::add_pin`].
    pub fn new(offset_x: f64, offset_y: f64, width: f64, height: f64, layer: usize) -> Self {
        Self {
            id: PinId::from_raw(0),
            node: NodeId::from_raw(0),
            offset_x,
            offset_y,
            width,
            height,
            layer,
        }
    }

    /// Pin shape as `[xmin, ymin, xmax, ymax]` relative to the node center.
    pub fn bounds(&self) -> [f64; 4] {
        [
            self.offset_x - 0.5 * self.width,
            self.offset_y - 0.5 * self.height,
            self.offset_x + 0.5 * self.width,
            self.offset_y + 0.5 * self.height,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_node_assigns_ids() {
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 0, 0, 10, 10));
        let b = nw.add_node(Node::new("b", 20, 0, 10, 10));
        assert_eq!(a.as_raw(), 0);
        assert_eq!(b.as_raw(), 1);
        assert_eq!(nw.node(b).id, b);
        assert_eq!(nw.find("a"), Some(a));
        assert_eq!(nw.node_count(), 2);
    }

    #[test]
    fn add_pin_links_node() {
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 0, 0, 10, 10));
        let p = nw.add_pin(a, Pin::new(2.0, 0.0, 1.0, 2.0, 0));
        assert_eq!(nw.pin(p).node, a);
        assert_eq!(nw.node(a).pins, vec![p]);
        assert_eq!(nw.pins_of(a).count(), 1);
    }

    #[test]
    fn node_geometry() {
        let n = Node::new("a", 5, 10, 8, 20);
        assert_eq!(n.right(), 13);
        assert_eq!(n.top(), 30);
        assert_eq!(n.center2(), 18);
        assert!(n.is_movable());
        assert!(!n.clone().fixed().is_movable());
    }

    #[test]
    fn pin_bounds() {
        let p = Pin::new(1.0, -1.0, 2.0, 4.0, 1);
        assert_eq!(p.bounds(), [0.0, -3.0, 2.0, 1.0]);
    }

    #[test]
    fn serde_roundtrip_rebuilds_index() {
        let mut nw = Network::new();
        nw.add_node(Node::new("x", 0, 0, 4, 10).in_region(RegionId::from_raw(2)));
        let json = serde_json::to_string(&nw).unwrap();
        let mut back: Network = serde_json::from_str(&json).unwrap();
        assert!(back.find("x").is_none());
        back.rebuild_indices();
        assert_eq!(back.find("x"), Some(NodeId::from_raw(0)));
        assert_eq!(back.nodes[0].region, RegionId::from_raw(2));
    }
}
