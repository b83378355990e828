use crate::geometry::Geometry;
use crate::surface::Color;
use glam::{DMat4, DQuat, DVec3, EulerRot};
use std::rc::Rc;

/// Flat (unlit) surface appearance of a primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub opacity: f64,
    pub transparent: bool,
}

impl Material {
    pub fn opaque(color: Color) -> Self {
        Material {
            color,
            opacity: 1.0,
            transparent: false,
        }
    }

    pub fn translucent(color: Color, opacity: f64) -> Self {
        Material {
            color,
            opacity,
            transparent: true,
        }
    }

    /// Opacity actually applied when drawing; opaque materials ignore it
    pub fn alpha(&self) -> f64 {
        if self.transparent {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Role a primitive plays in its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Container,
    Fluid,
    Pearl,
    Cube,
}

/// Handle to a node in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A drawable primitive: geometry, material, and a transform relative to its parent
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub geometry: Rc<Geometry>,
    pub material: Material,
    pub position: DVec3,
    /// Euler angles in radians, applied in XYZ order
    pub rotation: DVec3,
    parent: Option<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind, geometry: Rc<Geometry>, material: Material) -> Self {
        Node {
            kind,
            geometry,
            material,
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            parent: None,
        }
    }

    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn local_matrix(&self) -> DMat4 {
        let rotation = DQuat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        DMat4::from_rotation_translation(rotation, self.position)
    }
}

/// All primitives drawn together, plus the background they are drawn over
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub background: Option<Color>,
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    /// Adds a node at the scene root
    pub fn add(&mut self, node: Node) -> NodeId {
        self.insert(node, None)
    }

    /// Adds a node whose transform is relative to `parent`
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        self.insert(node, Some(parent))
    }

    fn insert(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        node.parent = parent;
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(move |(_, node)| node.parent == Some(parent))
            .map(|(id, _)| id)
    }

    pub fn find(&self, kind: NodeKind) -> Option<NodeId> {
        self.iter().find(|(_, node)| node.kind == kind).map(|(id, _)| id)
    }

    /// Transform from the node's local space to world space
    pub fn world_matrix(&self, id: NodeId) -> DMat4 {
        let node = self.node(id);
        match node.parent {
            Some(parent) => self.world_matrix(parent) * node.local_matrix(),
            None => node.local_matrix(),
        }
    }

    pub fn world_position(&self, id: NodeId) -> DVec3 {
        self.world_matrix(id).transform_point3(DVec3::ZERO)
    }
}
