use super::types::DeclKey;

use std::collections::HashMap;

/// Directed graph from a declaration to the declarations it needs.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    keys: Vec<DeclKey>,
    index: HashMap<DeclKey, usize>,
    edges: Vec<Vec<usize>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` if it is not present yet and return its node id.
    pub fn add_node(&mut self, key: DeclKey) -> usize {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.keys.len();
        self.index.insert(key.clone(), id);
        self.keys.push(key);
        self.edges.push(Vec::new());
        id
    }

    /// `from` depends on `to`.
    pub fn add_edge(&mut self, from: DeclKey, to: DeclKey) {
        let from = self.add_node(from);
        let to = self.add_node(to);
        if !self.edges[from].contains(&to) {
            self.edges[from].push(to);
        }
    }

    pub fn key(&self, id: usize) -> &DeclKey {
        &self.keys[id]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Tarjan's algorithm.
    ///
    /// Components come out in reverse topological order: every node's
    /// dependencies are in the same or an earlier component. Roots are visited
    /// in insertion order, which keeps the result deterministic.
    pub fn strongly_connected_components(&self) -> Vec<Vec<usize>> {
        let mut tarjan = Tarjan {
            graph: self,
            indices: vec![None; self.len()],
            lowlinks: vec![0; self.len()],
            on_stack: vec![false; self.len()],
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        };
        for node in 0..self.len() {
            if tarjan.indices[node].is_none() {
                tarjan.visit(node);
            }
        }
        tarjan.components
    }
}

struct Tarjan<'g> {
    graph: &'g DependencyGraph,
    indices: Vec<Option<usize>>,
    lowlinks: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

impl Tarjan<'_> {
    fn enter(&mut self, node: usize) {
        let index = self.next_index;
        self.next_index += 1;
        self.indices[node] = Some(index);
        self.lowlinks[node] = index;
        self.stack.push(node);
        self.on_stack[node] = true;
    }

    /// Depth-first walk from `root` with an explicit stack of
    /// `(node, next edge)` frames, so long reference chains cannot exhaust
    /// the thread stack.
    fn visit(&mut self, root: usize) {
        let graph = self.graph;
        self.enter(root);
        let mut work = vec![(root, 0)];

        while let Some(frame) = work.last_mut() {
            let node = frame.0;
            if let Some(&dep) = graph.edges[node].get(frame.1) {
                frame.1 += 1;
                match self.indices[dep] {
                    None => {
                        self.enter(dep);
                        work.push((dep, 0));
                    }
                    Some(dep_index) if self.on_stack[dep] => {
                        self.lowlinks[node] = self.lowlinks[node].min(dep_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            work.pop();
            if let Some(&(caller, _)) = work.last() {
                self.lowlinks[caller] = self.lowlinks[caller].min(self.lowlinks[node]);
            }

            if self.indices[node] == Some(self.lowlinks[node]) {
                let mut component = Vec::new();
                while let Some(member) = self.stack.pop() {
                    self.on_stack[member] = false;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                component.reverse();
                self.components.push(component);
            }
        }
    }
}
