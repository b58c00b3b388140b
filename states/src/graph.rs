use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt::{Debug, Formatter},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError<T>
where
    T: Debug,
{
    #[error("Cycle detected in dependency graph, from {:?}", .0)]
    CycleDetected(DepRoute<T>),
    #[error("Duplicate edge detected in dependency graph, from {:?} to {:?}", .0.route[0], .0.route[1])]
    DuplicateEdge(DepRoute<T>),
}

pub struct DepRoute<T> {
    // first means the start node, last means the end node
    route: Vec<T>,
}

impl<T> DepRoute<T> {
    pub fn nodes(&self) -> &[T] {
        &self.route
    }
}

impl<T> Debug for DepRoute<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let len = self.route.len();
        if len == 0 {
            return write!(f, "[]");
        }
        for item in &self.route[..len - 1] {
            write!(f, "{item:?} -> ")?;
        }
        write!(f, "{:?}", self.route[len - 1])
    }
}

/// Dependency graph. An edge `from -> to` means `to` reads `from`.
#[derive(Debug)]
pub struct Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    nodes: BTreeSet<Node>,
    routes: Vec<(Node, Node)>,
}

impl<Node> Default for Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Node> Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    pub fn new() -> Self {
        Self {
            nodes: BTreeSet::new(),
            routes: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: BTreeSet::new(),
            routes: Vec::with_capacity(capacity),
        }
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node);
    }

    pub fn route_to(&mut self, from: Node, to: Node) {
        self.nodes.insert(from);
        self.nodes.insert(to);
        self.routes.push((from, to));
    }

    fn in_degrees(&self) -> BTreeMap<Node, usize> {
        let mut in_deg: BTreeMap<Node, usize> = self.nodes.iter().map(|n| (*n, 0)).collect();
        for (_from, to) in &self.routes {
            *in_deg.entry(*to).or_insert(0) += 1;
        }
        in_deg
    }

    /// Kahn's algorithm. Nodes come out dependencies-first; ties resolve in `Ord` order.
    pub fn topology_sort(&self) -> Result<Vec<Node>, TopologyError<Node>> {
        let mut in_deg = self.in_degrees();
        let mut order = Vec::with_capacity(in_deg.len());

        while !in_deg.is_empty() {
            let Some(node) = in_deg.iter().find(|(_, deg)| **deg == 0).map(|(n, _)| *n) else {
                let keys: Vec<Node> = in_deg.keys().copied().collect();
                let cycle = self.find_cycle(&keys).unwrap_or_default();
                return Err(TopologyError::CycleDetected(DepRoute { route: cycle }));
            };

            in_deg.remove(&node);
            order.push(node);

            for connected in self.direct_connected_nodes(node)? {
                if let Some(deg) = in_deg.get_mut(&connected) {
                    *deg -= 1;
                }
            }
        }

        Ok(order)
    }

    fn find_cycle(&self, nodes: &[Node]) -> Option<Vec<Node>> {
        let mut visited = BTreeSet::new();
        let mut path_set = BTreeSet::new();
        let mut path = Vec::new();
        let mut stack: Vec<(Node, std::vec::IntoIter<Node>)> = Vec::new();

        let neighbors_of = |node: Node| {
            self.direct_connected_nodes(node)
                .unwrap_or_default()
                .into_iter()
                .filter(|n| nodes.contains(n))
                .collect::<Vec<_>>()
                .into_iter()
        };

        for &start_node in nodes {
            if visited.contains(&start_node) {
                continue;
            }

            stack.push((start_node, neighbors_of(start_node)));
            visited.insert(start_node);
            path_set.insert(start_node);
            path.push(start_node);

            while let Some((current_node, neighbors)) = stack.last_mut() {
                if let Some(neighbor) = neighbors.next() {
                    if path_set.contains(&neighbor) {
                        let pos = path.iter().position(|&x| x == neighbor)?;
                        let mut cycle = path[pos..].to_vec();
                        cycle.push(neighbor);
                        return Some(cycle);
                    } else if !visited.contains(&neighbor) {
                        visited.insert(neighbor);
                        path_set.insert(neighbor);
                        path.push(neighbor);
                        stack.push((neighbor, neighbors_of(neighbor)));
                    }
                } else {
                    let node_to_remove = *current_node;
                    stack.pop();
                    path_set.remove(&node_to_remove);
                    path.pop();
                }
            }
        }
        None
    }

    fn direct_connected_nodes(&self, node: Node) -> Result<BTreeSet<Node>, TopologyError<Node>> {
        let mut collected = BTreeSet::new();

        for (from, to) in &self.routes {
            if from == &node && !collected.insert(*to) {
                return Err(TopologyError::DuplicateEdge(DepRoute {
                    route: vec![node, *to],
                }));
            }
        }

        Ok(collected)
    }

    /// Every node that transitively reads `node`.
    pub fn dependents(&self, node: Node) -> BTreeSet<Node> {
        let mut collected = BTreeSet::new();
        let mut queue = VecDeque::new();

        queue.push_back(node);

        while let Some(current) = queue.pop_front() {
            for (from, to) in &self.routes {
                // `collected` guards against cycles.
                if from == &current && collected.insert(*to) {
                    queue.push_back(*to);
                }
            }
        }

        collected
    }
}
