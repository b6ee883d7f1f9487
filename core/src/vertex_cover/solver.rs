//! Exact minimum vertex cover by iterative deepening over a bounded search tree.
//!
//! Input format: a header line `<vertices> <edges>`, then one `u v` edge per line with 1-based ids.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Missing header line '<vertices> <edges>'")]
    MissingHeader,

    #[error("Invalid header line: {0:?}")]
    InvalidHeader(String),

    #[error("Invalid edge on line {0}: {1:?}")]
    InvalidEdge(usize, String),

    #[error("Vertex {1} on line {0} is out of range 1..={2}")]
    VertexOutOfRange(usize, usize, usize),

    #[error("No self loops are allowed, got edge {{{1}, {1}}} on line {0}")]
    SelfLoop(usize, usize),
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// Undirected simple graph over vertices `0..n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    adj: Vec<Vec<usize>>,
}

impl Graph {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            adj: vec![Vec::new(); num_vertices],
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate();
        let (_, header) = lines.next().ok_or(GraphError::MissingHeader)?;
        let num_vertices = {
            let nums: Vec<usize> = header
                .split_whitespace()
                .map(str::parse)
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| GraphError::InvalidHeader(header.to_owned()))?;
            match nums.as_slice() {
                &[n, _m] => n,
                _ => return Err(GraphError::InvalidHeader(header.to_owned())),
            }
        };

        let mut g = Self::new(num_vertices);
        for (i, line) in lines {
            let lineno = i + 1;
            if line.trim().is_empty() {
                continue;
            }
            let ends: Vec<usize> = line
                .split_whitespace()
                .take(2)
                .map(str::parse)
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| GraphError::InvalidEdge(lineno, line.to_owned()))?;
            let &[u, v] = ends.as_slice() else {
                return Err(GraphError::InvalidEdge(lineno, line.to_owned()));
            };
            for x in [u, v] {
                if x == 0 || x > num_vertices {
                    return Err(GraphError::VertexOutOfRange(lineno, x, num_vertices));
                }
            }
            if u == v {
                return Err(GraphError::SelfLoop(lineno, u));
            }
            g.add_edge(u - 1, v - 1);
        }
        Ok(g)
    }

    /// Parallel edges collapse into one.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        if !self.adj[u].contains(&v) {
            self.adj[u].push(v);
            self.adj[v].push(u);
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.adj.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(u, ns)| ns.iter().filter(move |&&v| u < v).map(move |&v| (u, v)))
    }

    pub fn is_cover(&self, cover: &[usize]) -> bool {
        let mut taken = vec![false; self.num_vertices()];
        cover.iter().for_each(|&v| taken[v] = true);
        self.edges().all(|(u, v)| taken[u] || taken[v])
    }
}

struct Search<'g> {
    g: &'g Graph,
    taken: Vec<bool>,
}

impl<'g> Search<'g> {
    fn new(g: &'g Graph) -> Self {
        Self {
            g,
            taken: vec![false; g.num_vertices()],
        }
    }

    fn uncovered_neighbours(&self, u: usize) -> impl Iterator<Item = usize> + '_ {
        self.g.adj[u].iter().copied().filter(move |&v| !self.taken[v])
    }

    fn uncovered_degree(&self, u: usize) -> usize {
        self.uncovered_neighbours(u).count()
    }

    fn free_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.g.num_vertices()).filter(move |&u| !self.taken[u])
    }

    /// A free vertex with exactly one uncovered edge, and that edge's other end.
    fn pendant(&self) -> Option<(usize, usize)> {
        self.free_vertices().find_map(|u| {
            let mut ns = self.uncovered_neighbours(u);
            match (ns.next(), ns.next()) {
                (Some(v), None) => Some((u, v)),
                _ => None,
            }
        })
    }

    fn set(&mut self, vs: &[usize], taken: bool) {
        vs.iter().for_each(|&v| self.taken[v] = taken);
    }

    /// Tries to cover every remaining edge with at most `k` more vertices.
    fn branch(&mut self, k: usize) -> bool {
        // Some optimal cover always contains the neighbour of a degree-one vertex.
        if let Some((_, v)) = self.pendant() {
            if k == 0 {
                return false;
            }
            self.set(&[v], true);
            if self.branch(k - 1) {
                return true;
            }
            self.set(&[v], false);
            return false;
        }

        let best = self
            .free_vertices()
            .map(|u| (self.uncovered_degree(u), u))
            .max();
        let u = match best {
            Some((deg, u)) if deg > 0 => u,
            _ => return true,
        };
        if k == 0 {
            return false;
        }

        self.set(&[u], true);
        if self.branch(k - 1) {
            return true;
        }
        self.set(&[u], false);

        // Otherwise every uncovered neighbour of u must be in the cover.
        let ns: Vec<usize> = self.uncovered_neighbours(u).collect();
        if ns.len() <= k {
            self.set(&ns, true);
            if self.branch(k - ns.len()) {
                return true;
            }
            self.set(&ns, false);
        }
        false
    }

    fn cover(&self) -> Vec<usize> {
        (0..self.taken.len()).filter(|&v| self.taken[v]).collect()
    }
}

/// Returns a minimum vertex cover as ascending 0-based vertex ids.
pub fn minimum_vertex_cover(g: &Graph) -> Vec<usize> {
    for k in 0..=g.num_vertices() {
        let mut search = Search::new(g);
        if search.branch(k) {
            log::debug!("Found vertex cover of size {}", k);
            return search.cover();
        }
        log::trace!("No vertex cover of size {}", k);
    }
    // k = n always succeeds, so this is never reached.
    (0..g.num_vertices()).collect()
}

/// One 1-based vertex id per line.
pub fn format_cover(cover: &[usize]) -> String {
    cover.iter().map(|v| format!("{}\n", v + 1)).collect()
}
