//! Exact planarity test.
//!
//! A graph is planar iff each of its biconnected components is. Components
//! are tested with the Demoucron-Malgrange-Pertuiset face-embedding
//! algorithm: start from a cycle, then repeatedly embed a path of some
//! fragment into a face that contains all of the fragment's attachment
//! vertices. A fragment with no such face proves the graph non-planar.

use std::collections::{HashSet, VecDeque};

/// Returns `true` iff the simple undirected graph given by `adjacency`
/// admits a planar embedding.
///
/// A nonzero entry in either `[i][j]` or `[j][i]` counts as the edge
/// `{i, j}`; the diagonal is ignored.
pub fn is_planar(adjacency: &[Vec<u8>]) -> bool {
    let n = adjacency.len();
    let mut adj = vec![Vec::new(); n];
    let mut edge_count = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            let linked = adjacency[i].get(j).is_some_and(|&x| x != 0)
                || adjacency[j].get(i).is_some_and(|&x| x != 0);
            if linked {
                adj[i].push(j);
                adj[j].push(i);
                edge_count += 1;
            }
        }
    }

    // Euler bound for simple planar graphs
    if n >= 3 && edge_count > 3 * n - 6 {
        return false;
    }

    biconnected_components(&adj)
        .iter()
        .all(|block| block_is_planar(block))
}

/// Edge sets of the biconnected components (iterative Tarjan).
fn biconnected_components(adj: &[Vec<usize>]) -> Vec<Vec<(usize, usize)>> {
    const UNSEEN: usize = usize::MAX;

    let n = adj.len();
    let mut disc = vec![UNSEEN; n];
    let mut low = vec![0; n];
    let mut time = 0;
    let mut edge_stack: Vec<(usize, usize)> = Vec::new();
    let mut blocks = Vec::new();

    for root in 0..n {
        if disc[root] != UNSEEN {
            continue;
        }
        disc[root] = time;
        low[root] = time;
        time += 1;

        // (vertex, parent, next neighbor index)
        let mut stack = vec![(root, UNSEEN, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (v, parent) = (top.0, top.1);

            if top.2 < adj[v].len() {
                let w = adj[v][top.2];
                top.2 += 1;

                if disc[w] == UNSEEN {
                    edge_stack.push((v, w));
                    disc[w] = time;
                    low[w] = time;
                    time += 1;
                    stack.push((w, v, 0));
                } else if w != parent && disc[w] < disc[v] {
                    edge_stack.push((v, w));
                    low[v] = low[v].min(disc[w]);
                }
                continue;
            }

            stack.pop();
            if let Some(&(p, _, _)) = stack.last() {
                low[p] = low[p].min(low[v]);
                if low[v] >= disc[p] {
                    let mut block = Vec::new();
                    while let Some(edge) = edge_stack.pop() {
                        block.push(edge);
                        if edge == (p, v) {
                            break;
                        }
                    }
                    blocks.push(block);
                }
            }
        }
    }

    blocks
}

/// A piece of the graph not yet embedded.
enum Fragment {
    /// Unembedded edge between two embedded vertices
    Chord(usize, usize),
    /// Connected set of unembedded vertices
    Bridge(Vec<usize>),
}

fn block_is_planar(block: &[(usize, usize)]) -> bool {
    // A single edge, or a triangle at most
    if block.len() < 4 {
        return true;
    }

    // Relabel to 0..k
    let mut labels = std::collections::HashMap::new();
    for &(u, v) in block {
        let next = labels.len();
        labels.entry(u).or_insert(next);
        let next = labels.len();
        labels.entry(v).or_insert(next);
    }
    let k = labels.len();
    if block.len() > 3 * k - 6 {
        return false;
    }

    let mut adj = vec![Vec::new(); k];
    for &(u, v) in block {
        let (a, b) = (labels[&u], labels[&v]);
        adj[a].push(b);
        adj[b].push(a);
    }

    let Some(cycle) = find_cycle(&adj) else {
        return true;
    };

    let mut embedded = vec![false; k];
    let mut embedded_edges = HashSet::new();
    for (i, &v) in cycle.iter().enumerate() {
        embedded[v] = true;
        embedded_edges.insert(undirected(v, cycle[(i + 1) % cycle.len()]));
    }
    let mut faces = vec![cycle.clone(), cycle];

    loop {
        let fragments = fragments(&adj, &embedded, &embedded_edges);
        if fragments.is_empty() {
            return true;
        }

        // Pick the most constrained fragment
        let mut choice: Option<(usize, usize, usize)> = None;
        for (index, (_, attachments)) in fragments.iter().enumerate() {
            let admissible: Vec<usize> = faces
                .iter()
                .enumerate()
                .filter(|(_, face)| attachments.iter().all(|a| face.contains(a)))
                .map(|(f, _)| f)
                .collect();

            match admissible.first() {
                None => return false,
                Some(&face) => {
                    let better = choice.map_or(true, |(_, _, count)| admissible.len() < count);
                    if better {
                        choice = Some((index, face, admissible.len()));
                    }
                }
            }
        }
        let Some((index, face_index, _)) = choice else {
            return true;
        };

        let (fragment, _) = &fragments[index];
        let Some(path) = fragment_path(fragment, &adj, &embedded) else {
            return false;
        };

        for pair in path.windows(2) {
            embedded_edges.insert(undirected(pair[0], pair[1]));
        }
        for &v in &path {
            embedded[v] = true;
        }

        let (first, second) = split_face(&faces[face_index], &path);
        faces[face_index] = first;
        faces.push(second);
    }
}

fn undirected(u: usize, v: usize) -> (usize, usize) {
    (u.min(v), u.max(v))
}

/// Finds a simple cycle through a BFS non-tree edge.
fn find_cycle(adj: &[Vec<usize>]) -> Option<Vec<usize>> {
    let n = adj.len();
    let mut parent = vec![usize::MAX; n];
    let mut depth = vec![0usize; n];
    let mut seen = vec![false; n];
    let mut queue = VecDeque::from([0]);
    seen[0] = true;

    while let Some(v) = queue.pop_front() {
        for &w in &adj[v] {
            if !seen[w] {
                seen[w] = true;
                parent[w] = v;
                depth[w] = depth[v] + 1;
                queue.push_back(w);
            }
        }
    }

    let (u, v) = (0..n)
        .flat_map(|u| adj[u].iter().map(move |&v| (u, v)))
        .find(|&(u, v)| u < v && parent[u] != v && parent[v] != u)?;

    let (mut x, mut y) = (u, v);
    let mut left = vec![u];
    let mut right = vec![v];
    while x != y {
        if depth[x] >= depth[y] {
            x = parent[x];
            left.push(x);
        } else {
            y = parent[y];
            right.push(y);
        }
    }

    right.pop();
    left.extend(right.into_iter().rev());
    Some(left)
}

/// Fragments of the graph relative to the embedded subgraph, each with its
/// sorted attachment vertices.
fn fragments(
    adj: &[Vec<usize>],
    embedded: &[bool],
    embedded_edges: &HashSet<(usize, usize)>,
) -> Vec<(Fragment, Vec<usize>)> {
    let mut result = Vec::new();

    for u in 0..adj.len() {
        for &v in &adj[u] {
            if u < v && embedded[u] && embedded[v] && !embedded_edges.contains(&(u, v)) {
                result.push((Fragment::Chord(u, v), vec![u, v]));
            }
        }
    }

    let mut visited = vec![false; adj.len()];
    for start in 0..adj.len() {
        if embedded[start] || visited[start] {
            continue;
        }
        let mut component = Vec::new();
        let mut attachments = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(v) = queue.pop_front() {
            component.push(v);
            for &w in &adj[v] {
                if embedded[w] {
                    attachments.push(w);
                } else if !visited[w] {
                    visited[w] = true;
                    queue.push_back(w);
                }
            }
        }

        attachments.sort_unstable();
        attachments.dedup();
        result.push((Fragment::Bridge(component), attachments));
    }

    result
}

/// A path through the fragment joining two distinct attachment vertices.
fn fragment_path(fragment: &Fragment, adj: &[Vec<usize>], embedded: &[bool]) -> Option<Vec<usize>> {
    let component = match fragment {
        Fragment::Chord(u, v) => return Some(vec![*u, *v]),
        Fragment::Bridge(component) => component,
    };
    let members: HashSet<usize> = component.iter().copied().collect();
    let start = component
        .iter()
        .flat_map(|&v| adj[v].iter().copied())
        .find(|&w| embedded[w])?;

    let mut prev = std::collections::HashMap::new();
    let mut queue = VecDeque::new();
    for &w in &adj[start] {
        if members.contains(&w) && !prev.contains_key(&w) {
            prev.insert(w, start);
            queue.push_back(w);
        }
    }

    while let Some(v) = queue.pop_front() {
        for &w in &adj[v] {
            if embedded[w] && w != start {
                let mut path = vec![w, v];
                let mut cursor = v;
                while let Some(&p) = prev.get(&cursor) {
                    path.push(p);
                    if p == start {
                        break;
                    }
                    cursor = p;
                }
                path.reverse();
                return Some(path);
            }
            if members.contains(&w) && !prev.contains_key(&w) {
                prev.insert(w, v);
                queue.push_back(w);
            }
        }
    }

    None
}

/// Splits a face along a path whose endpoints lie on it.
fn split_face(face: &[usize], path: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let len = face.len();
    let start = path[0];
    let end = path[path.len() - 1];
    let i = face.iter().position(|&v| v == start).unwrap_or(0);
    let j = face.iter().position(|&v| v == end).unwrap_or(0);
    let interior = &path[1..path.len() - 1];

    let walk = |from: usize, to: usize| {
        let mut out = Vec::new();
        let mut idx = from;
        loop {
            out.push(face[idx]);
            if idx == to {
                break;
            }
            idx = (idx + 1) % len;
        }
        out
    };

    let mut first = walk(i, j);
    first.extend(interior.iter().rev());
    let mut second = walk(j, i);
    second.extend(interior.iter());
    (first, second)
}
