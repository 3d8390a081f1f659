//! Thin/thick segmentation of the skeleton.
//!
//! A depth-first walk over the skeleton splits it into parts wherever the
//! local island width crosses the hysteresis thresholds, then three merge
//! passes normalize the partition: middle parts dissolve into their
//! biggest neighbor, same-type neighbors fuse, and parts shorter than
//! `min_part_length` collapse into their surroundings. What remains is an
//! alternating set of thin and thick parts, each handed to its own
//! sampler.

use super::config::SampleConfig;
use super::error::SampleError;
use super::skeleton::{twin, EdgeId, NodeId, Position, SkeletonGraph, SkeletonPath};
use crate::{Coord, CoordF};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IslandPartType {
    Thin,
    Middle,
    Thick,
}

/// Transition out of one part into a neighbor part.
///
/// The position's edge points out of the owning part; its source node lies
/// inside.
#[derive(Debug, Clone)]
pub struct IslandPartChange {
    pub position: Position,
    pub part_index: usize,
}

#[derive(Debug, Clone)]
pub struct IslandPart {
    pub part_type: IslandPartType,
    pub changes: Vec<IslandPartChange>,
    /// Sum of traversed edge lengths; the merge-middle pass picks the
    /// biggest neighbor by this.
    pub sum_lengths: Coord,
}

/// A narrow region sampled along its skeleton.
#[derive(Debug, Clone)]
pub struct ThinPart {
    /// Middle of the longest path inside the part.
    pub center: Position,
    /// Transitions into thick parts, sorted by edge identity.
    pub ends: Vec<Position>,
}

/// A wide region sampled through its polygonal field.
#[derive(Debug, Clone)]
pub struct ThickPart {
    /// Edge leading into the part; its target node lies inside.
    pub start: EdgeId,
    /// Transitions into thin parts, sorted by edge identity.
    pub ends: Vec<Position>,
}

/// Split the skeleton into thin and thick parts.
pub fn separate_thin_thick(
    graph: &SkeletonGraph,
    path: &SkeletonPath,
    config: &SampleConfig,
) -> Result<(Vec<ThinPart>, Vec<ThickPart>), SampleError> {
    let start = graph
        .traversal_root()
        .ok_or_else(|| SampleError::Segmentation("no traversal root".into()))?;
    if graph.reachable_count(start) != graph.node_count() {
        return Err(SampleError::Segmentation("disconnected skeleton".into()));
    }

    let mut parts = collect_parts(graph, start, config);
    merge_middle_into_biggest_neighbor(&mut parts);
    if parts.len() > 1 {
        merge_same_type_neighbors(&mut parts);
    }
    if parts.len() > 1 {
        merge_short_parts(&mut parts, graph, config.min_part_length);
    }
    Ok(convert_parts(parts, graph, path))
}

/// One step of the segmentation DFS.
#[derive(Debug, Clone, Copy)]
struct ProcessItem {
    prev_node: Option<NodeId>,
    node: NodeId,
    part: usize,
}

fn collect_parts(graph: &SkeletonGraph, start: NodeId, config: &SampleConfig) -> Vec<IslandPart> {
    let mut parts = vec![IslandPart {
        part_type: IslandPartType::Thin,
        changes: Vec::new(),
        sum_lengths: 0,
    }];
    let mut item = ProcessItem {
        prev_node: None,
        node: start,
        part: 0,
    };
    let mut process: Vec<ProcessItem> = Vec::new();
    loop {
        let mut next_item: Option<ProcessItem> = None;
        for &edge in &graph.node(item.node).edges {
            let target = graph.edge(edge).to;
            if Some(target) == item.prev_node {
                continue;
            }
            if let Some(queued) = next_item.take() {
                process.push(queued);
            }
            let next_part = detect_interface(&mut parts, item.part, edge, graph, config);
            let candidate = ProcessItem {
                prev_node: Some(item.node),
                node: target,
                part: next_part,
            };
            // a queued traversal of this edge from the other side means the
            // walk closed a cycle: merge the parts that met
            if let Some(queued_at) = process
                .iter()
                .position(|p| p.node == item.node && p.prev_node == Some(target))
            {
                let queued_part = process[queued_at].part;
                merge_cycle_parts(&mut parts, &mut item, queued_part, candidate.part, &mut process);
                process.remove(queued_at);
                continue;
            }
            next_item = Some(candidate);
        }
        match next_item {
            Some(next) => item = next,
            None => match process.pop() {
                Some(next) => item = next,
                None => break,
            },
        }
    }
    parts
}

/// Classify `edge` against the hysteresis band and split the current part
/// at each threshold crossing. Returns the part index valid past the edge.
fn detect_interface(
    parts: &mut Vec<IslandPart>,
    part: usize,
    edge: EdgeId,
    graph: &SkeletonGraph,
    config: &SampleConfig,
) -> usize {
    let lower = config.thick_min_width;
    let upper = config.thin_max_width;
    let min_width = graph.edge(edge).min_width();
    let max_width = graph.edge(edge).max_width();

    let next = match parts[part].part_type {
        IslandPartType::Thin => {
            if max_width < lower {
                None
            } else {
                let middle = add_part(parts, part, IslandPartType::Middle, edge, lower, graph, config);
                Some(if max_width < upper {
                    middle
                } else {
                    add_part(parts, middle, IslandPartType::Thick, edge, upper, graph, config)
                })
            }
        }
        IslandPartType::Middle => {
            if min_width < lower {
                Some(add_part(parts, part, IslandPartType::Thin, edge, lower, graph, config))
            } else if max_width > upper {
                Some(add_part(parts, part, IslandPartType::Thick, edge, upper, graph, config))
            } else {
                None
            }
        }
        IslandPartType::Thick => {
            if max_width > upper {
                None
            } else {
                let middle = add_part(parts, part, IslandPartType::Middle, edge, upper, graph, config);
                Some(if min_width > lower {
                    middle
                } else {
                    add_part(parts, middle, IslandPartType::Thin, edge, lower, graph, config)
                })
            }
        }
    };
    match next {
        Some(next) => next,
        None => {
            parts[part].sum_lengths += graph.edge(edge).length.round() as Coord;
            part
        }
    }
}

/// Open a new part at the width crossing on `edge`, unless the crossing
/// sits within `min_part_length` of a skeleton end.
fn add_part(
    parts: &mut Vec<IslandPart>,
    part: usize,
    to_type: IslandPartType,
    edge: EdgeId,
    limit: Coord,
    graph: &SkeletonGraph,
    config: &SampleConfig,
) -> usize {
    let position = graph.position_with_width(edge, limit);
    if graph.ends_within_distance(position, config.min_part_length) {
        return part; // too close to the contour to split
    }

    let new_index = parts.len();
    let twin_position = position.reversed();
    if new_index == 1
        && parts[0].changes.is_empty()
        && graph.ends_within_distance(twin_position, config.min_part_length)
    {
        // the initial part is shorter than min_part_length; it adopts the
        // type seen past the crossing instead of splitting
        parts[0].part_type = to_type;
        return part;
    }

    let out_distance = position.distance_from_source(graph).round() as Coord;
    parts[part].changes.push(IslandPartChange {
        position,
        part_index: new_index,
    });
    parts[part].sum_lengths += out_distance;

    let back_distance = twin_position.distance_from_source(graph).round() as Coord;
    parts.push(IslandPart {
        part_type: to_type,
        changes: vec![IslandPartChange {
            position: twin_position,
            part_index: part,
        }],
        sum_lengths: back_distance,
    });
    new_index
}

/// Merge `part_b` into `part_a` (cycle closure), fixing the DFS state.
fn merge_cycle_parts(
    parts: &mut Vec<IslandPart>,
    item: &mut ProcessItem,
    part_a: usize,
    part_b: usize,
    process: &mut [ProcessItem],
) {
    if part_a == part_b {
        return;
    }
    let (keep, remove) = if part_a < part_b {
        (part_a, part_b)
    } else {
        (part_b, part_a)
    };
    debug_assert_eq!(parts[keep].part_type, parts[remove].part_type);
    parts[keep].sum_lengths += parts[remove].sum_lengths;
    merge_parts(parts, keep, remove);
    for p in process.iter_mut() {
        if p.part == remove {
            p.part = keep;
        } else if p.part > remove {
            p.part -= 1;
        }
    }
    if item.part == remove {
        item.part = keep;
    } else if item.part > remove {
        item.part -= 1;
    }
}

/// Merge part `remove` into part `keep < remove` and renumber every
/// change reference.
fn merge_parts(parts: &mut Vec<IslandPart>, keep: usize, remove: usize) {
    debug_assert!(keep < remove);
    let mut moved = std::mem::take(&mut parts[remove].changes);
    moved.retain(|c| c.part_index != keep);
    parts[keep].changes.retain(|c| c.part_index != remove);
    parts[keep].changes.extend(moved);
    parts.remove(remove);
    for part in parts.iter_mut() {
        for change in &mut part.changes {
            if change.part_index == remove {
                change.part_index = keep;
            } else if change.part_index > remove {
                change.part_index -= 1;
            }
        }
    }
}

/// Dissolve every middle part into its neighbor with the greatest
/// `sum_lengths`; ties go to the lower part index.
fn merge_middle_into_biggest_neighbor(parts: &mut Vec<IslandPart>) {
    let mut index = 0;
    while index < parts.len() {
        if parts[index].part_type != IslandPartType::Middle || parts[index].changes.is_empty() {
            index += 1;
            continue;
        }
        let mut biggest = parts[index].changes[0].part_index;
        for change in &parts[index].changes[1..] {
            let candidate = change.part_index;
            if parts[candidate].sum_lengths > parts[biggest].sum_lengths
                || (parts[candidate].sum_lengths == parts[biggest].sum_lengths
                    && candidate < biggest)
            {
                biggest = candidate;
            }
        }
        parts[index].part_type = parts[biggest].part_type;
        let (keep, remove) = if index < biggest {
            (index, biggest)
        } else {
            (biggest, index)
        };
        let sum = parts[keep].sum_lengths + parts[remove].sum_lengths;
        merge_parts(parts, keep, remove);
        parts[keep].sum_lengths = sum;
        // the slot at `index` now holds a different part
        index = index.min(keep);
    }
}

/// Fuse adjacent parts of equal type until the partition alternates.
fn merge_same_type_neighbors(parts: &mut Vec<IslandPart>) {
    let mut index = 0;
    while index < parts.len() {
        let same = parts[index]
            .changes
            .iter()
            .map(|c| c.part_index)
            .find(|&other| parts[other].part_type == parts[index].part_type);
        match same {
            Some(other) => {
                let (keep, remove) = if index < other { (index, other) } else { (other, index) };
                let sum = parts[keep].sum_lengths + parts[remove].sum_lengths;
                merge_parts(parts, keep, remove);
                parts[keep].sum_lengths = sum;
                index = 0;
            }
            None => index += 1,
        }
    }
}

/// Collapse parts whose longest internal distance stays below
/// `min_part_length`, shortest first.
fn merge_short_parts(parts: &mut Vec<IslandPart>, graph: &SkeletonGraph, min_part_length: Coord) {
    let mut lengths: Vec<Coord> = parts
        .iter()
        .map(|p| longest_internal_distance(graph, &p.changes, None))
        .collect();
    loop {
        let mut smallest = 0;
        for (i, &len) in lengths.iter().enumerate() {
            if len < lengths[smallest] {
                smallest = i;
            }
        }
        if lengths[smallest] >= min_part_length || parts.len() <= 1 {
            return;
        }
        if parts[smallest].changes.is_empty() {
            return; // isolated part, nothing to merge it into
        }
        let (kept, removed) = merge_all_neighbors(parts, smallest);
        if parts.len() == 1 {
            return;
        }
        for &r in removed.iter().rev() {
            lengths.remove(r);
        }
        lengths[kept] = longest_internal_distance(graph, &parts[kept].changes, None);
    }
}

/// Remove part `index` by fusing it and all of its neighbors into one part
/// of the neighbors' type. Returns the surviving index and the removed
/// original indices in ascending order.
fn merge_all_neighbors(parts: &mut Vec<IslandPart>, index: usize) -> (usize, Vec<usize>) {
    let neighbor_indices: Vec<usize> = parts[index].changes.iter().map(|c| c.part_index).collect();
    let mut removed: Vec<usize> = neighbor_indices.clone();
    removed.push(index);
    removed.sort_unstable();
    removed.dedup();
    let kept = removed.remove(0);

    let neighbor_type = parts[neighbor_indices[0]].part_type;
    let mut merged_changes = Vec::new();
    for &neighbor in neighbor_indices.iter() {
        for change in &parts[neighbor].changes {
            if change.part_index == index || neighbor_indices.contains(&change.part_index) {
                continue;
            }
            merged_changes.push(change.clone());
        }
    }

    parts[kept].part_type = neighbor_type;
    parts[kept].changes = merged_changes;
    parts[kept].sum_lengths = 0;

    for &r in removed.iter().rev() {
        parts.remove(r);
    }
    for part in parts.iter_mut() {
        for change in &mut part.changes {
            if removed.binary_search(&change.part_index).is_ok() {
                change.part_index = kept;
            } else {
                change.part_index -= removed.partition_point(|&r| r < change.part_index);
            }
        }
    }
    (kept, removed)
}

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    dist: CoordF,
    node: NodeId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist && self.node == other.node
    }
}
impl Eq for HeapEntry {}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap over distance, tie-broken by node id
        other
            .dist
            .partial_cmp(&self.dist)
            .unwrap_or(Ordering::Equal)
            .then(other.node.cmp(&self.node))
    }
}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest distances inside a part from one change crossing, not
/// traversing any change edge.
struct ChangeSweep {
    dist: Vec<CoordF>,
    pred: Vec<Option<EdgeId>>,
}

fn sweep_from_change(
    graph: &SkeletonGraph,
    change: &IslandPartChange,
    blocked: &[bool],
) -> ChangeSweep {
    let mut dist = vec![CoordF::INFINITY; graph.node_count()];
    let mut pred: Vec<Option<EdgeId>> = vec![None; graph.node_count()];
    let seed = graph.edge(change.position.edge).from;
    let seed_dist = change.position.distance_from_source(graph);
    dist[seed] = seed_dist;
    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry {
        dist: seed_dist,
        node: seed,
    });
    while let Some(HeapEntry { dist: d, node }) = heap.pop() {
        if d > dist[node] {
            continue;
        }
        for &edge in &graph.node(node).edges {
            if blocked[edge] {
                continue;
            }
            let target = graph.edge(edge).to;
            let candidate = d + graph.edge(edge).length;
            if candidate < dist[target] {
                dist[target] = candidate;
                pred[target] = Some(edge);
                heap.push(HeapEntry {
                    dist: candidate,
                    node: target,
                });
            }
        }
    }
    ChangeSweep { dist, pred }
}

/// Longest shortest-path distance inside a part: between two of its
/// change crossings or from a crossing to its farthest interior node.
/// When `center` is given it receives the midpoint of the realizing path.
pub fn longest_internal_distance(
    graph: &SkeletonGraph,
    changes: &[IslandPartChange],
    center: Option<&mut Position>,
) -> Coord {
    if changes.is_empty() {
        return 0;
    }
    // part living on a single edge: the span between its two crossings
    if changes.len() == 2 && twin(changes[0].position.edge) == changes[1].position.edge {
        let a = &changes[0].position;
        let b = &changes[1].position;
        let length = graph.edge(a.edge).length;
        let arc_a = a.ratio;
        let arc_b = 1.0 - b.ratio; // b in a's coordinates
        let span = (arc_a - arc_b).abs() * length;
        if let Some(center) = center {
            *center = Position::new(a.edge, (arc_a + arc_b) / 2.0);
        }
        return span.round() as Coord;
    }

    let mut blocked = vec![false; graph.edge_count()];
    for change in changes {
        blocked[change.position.edge] = true;
        blocked[twin(change.position.edge)] = true;
    }
    let sweeps: Vec<ChangeSweep> = changes
        .iter()
        .map(|c| sweep_from_change(graph, c, &blocked))
        .collect();
    let seeds: Vec<NodeId> = changes
        .iter()
        .map(|c| graph.edge(c.position.edge).from)
        .collect();
    let stubs: Vec<CoordF> = changes
        .iter()
        .map(|c| c.position.distance_from_source(graph))
        .collect();

    // best = (total, source change, end node, extra stub of a second change)
    let mut best = (0.0, 0usize, seeds[0], None::<usize>);
    for (i, sweep) in sweeps.iter().enumerate() {
        for node in 0..graph.node_count() {
            let d = sweep.dist[node];
            if d.is_finite() && d > best.0 {
                best = (d, i, node, None);
            }
        }
        for (j, &seed_j) in seeds.iter().enumerate() {
            if i == j || !sweep.dist[seed_j].is_finite() {
                continue;
            }
            let total = sweep.dist[seed_j] + stubs[j];
            if total > best.0 {
                best = (total, i, seed_j, Some(j));
            }
        }
    }

    let (total, source, end_node, pair) = best;
    if let Some(center) = center {
        *center = path_midpoint(graph, changes, &sweeps[source], source, end_node, pair, total);
    }
    total.round() as Coord
}

/// Midpoint of the path realizing the longest internal distance.
fn path_midpoint(
    graph: &SkeletonGraph,
    changes: &[IslandPartChange],
    sweep: &ChangeSweep,
    source: usize,
    end_node: NodeId,
    pair: Option<usize>,
    total: CoordF,
) -> Position {
    let half = total / 2.0;
    let source_position = changes[source].position;
    let stub = source_position.distance_from_source(graph);
    if half <= stub || total <= 0.0 {
        // midpoint sits on the source change edge, between crossing and
        // interior node
        let length = graph.edge(source_position.edge).length.max(1.0);
        let ratio = (source_position.ratio - half / length).clamp(0.0, 1.0);
        return Position::new(source_position.edge, ratio);
    }

    // interior chain from the source seed to the end node
    let mut edges: Vec<EdgeId> = Vec::new();
    let mut node = end_node;
    while let Some(edge) = sweep.pred[node] {
        edges.push(edge);
        node = graph.edge(edge).from;
    }
    edges.reverse();

    let mut walked = stub;
    for edge in edges {
        let length = graph.edge(edge).length;
        if walked + length >= half {
            let ratio = if length > 0.0 {
                ((half - walked) / length).clamp(0.0, 1.0)
            } else {
                0.0
            };
            return Position::new(edge, ratio);
        }
        walked += length;
    }

    // midpoint lies on the paired change's stub
    if let Some(j) = pair {
        let end_position = changes[j].position;
        let length = graph.edge(end_position.edge).length.max(1.0);
        let ratio = ((half - walked) / length).clamp(0.0, end_position.ratio);
        return Position::new(end_position.edge, ratio);
    }
    Position::new(source_position.edge, source_position.ratio)
}

/// Turn the merged partition into the sampler-facing part lists.
fn convert_parts(
    parts: Vec<IslandPart>,
    graph: &SkeletonGraph,
    path: &SkeletonPath,
) -> (Vec<ThinPart>, Vec<ThickPart>) {
    if parts.len() == 1 {
        return match parts[0].part_type {
            IslandPartType::Thin => {
                let center = graph
                    .position_on_path(path, path.length / 2.0)
                    .unwrap_or(Position::new(graph.node(path.nodes[0]).edges[0], 0.0));
                (
                    vec![ThinPart {
                        center,
                        ends: Vec::new(),
                    }],
                    Vec::new(),
                )
            }
            _ => {
                let start = graph.node(path.nodes[0]).edges[0];
                (
                    Vec::new(),
                    vec![ThickPart {
                        start,
                        ends: Vec::new(),
                    }],
                )
            }
        };
    }

    let mut thin = Vec::new();
    let mut thick = Vec::new();
    for part in &parts {
        let mut ends: Vec<Position> = part.changes.iter().map(|c| c.position).collect();
        ends.sort_by_key(|p| p.edge);
        debug_assert!(!ends.is_empty());
        if ends.is_empty() {
            continue;
        }
        match part.part_type {
            IslandPartType::Thin => {
                let mut center = ends[0];
                longest_internal_distance(graph, &part.changes, Some(&mut center));
                thin.push(ThinPart { center, ends });
            }
            _ => {
                let start = twin(ends[0].edge);
                thick.push(ThickPart { start, ends });
            }
        }
    }
    (thin, thick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    /// Dumbbell: thin bar between two leaf stubs, widths force a single
    /// thin part.
    fn thin_chain_graph() -> SkeletonGraph {
        let mut g = SkeletonGraph::new();
        let n0 = g.add_node(Point::new(0, 0));
        let n1 = g.add_node(Point::new(10_000, 0));
        let n2 = g.add_node(Point::new(20_000, 0));
        g.add_edge_pair(n0, n1, 0, 500, 0, 1);
        g.add_edge_pair(n1, n2, 500, 0, 0, 1);
        g
    }

    fn config() -> SampleConfig {
        let mut cfg = SampleConfig::default();
        cfg.thick_min_width = 1_000;
        cfg.thin_max_width = 2_000;
        cfg.min_part_length = 1_000;
        cfg
    }

    fn path_of(g: &SkeletonGraph) -> SkeletonPath {
        g.longest_path(g.first_contour_node().unwrap())
    }

    #[test]
    fn test_all_thin_single_part() {
        let g = thin_chain_graph();
        let (thin, thick) = separate_thin_thick(&g, &path_of(&g), &config()).unwrap();
        assert_eq!(thin.len(), 1);
        assert!(thick.is_empty());
        assert!(thin[0].ends.is_empty());
        // center sits at the middle of the 20k chain
        let center_point = thin[0].center.point(&g);
        assert!((center_point.x - 10_000).abs() < 500);
    }

    #[test]
    fn test_all_thick_single_part() {
        let mut g = SkeletonGraph::new();
        let n0 = g.add_node(Point::new(0, 0));
        let n1 = g.add_node(Point::new(10_000, 0));
        let n2 = g.add_node(Point::new(20_000, 0));
        g.add_edge_pair(n0, n1, 0, 5_000, 0, 1);
        g.add_edge_pair(n1, n2, 5_000, 0, 0, 1);
        let mut cfg = config();
        cfg.min_part_length = 6_000; // crossings sit closer than this to the ends
        let (thin, thick) = separate_thin_thick(&g, &path_of(&g), &cfg).unwrap();
        // crossing suppression keeps one part; it adopted the thick type
        assert!(thin.is_empty());
        assert_eq!(thick.len(), 1);
    }

    #[test]
    fn test_thin_thick_split() {
        // widths: 500 (thin) rising through both thresholds to 8000 (thick)
        let mut g = SkeletonGraph::new();
        let n0 = g.add_node(Point::new(0, 0));
        let n1 = g.add_node(Point::new(20_000, 0));
        let n2 = g.add_node(Point::new(40_000, 0));
        let n3 = g.add_node(Point::new(60_000, 0));
        g.add_edge_pair(n0, n1, 0, 500, 0, 1);
        g.add_edge_pair(n1, n2, 500, 8_000, 0, 1);
        g.add_edge_pair(n2, n3, 8_000, 8_000, 0, 1);
        let (thin, thick) = separate_thin_thick(&g, &path_of(&g), &config()).unwrap();
        assert_eq!(thin.len(), 1);
        assert_eq!(thick.len(), 1);
        assert_eq!(thin[0].ends.len(), 1);
        assert_eq!(thick[0].ends.len(), 1);
        // the two ends describe the same crossing from both sides
        assert_eq!(twin(thin[0].ends[0].edge), thick[0].ends[0].edge);
        // thick start edge leads into the thick part
        assert_eq!(thick[0].start, twin(thick[0].ends[0].edge));
    }

    #[test]
    fn test_merge_parts_renumbers() {
        let mk_change = |edge, part_index| IslandPartChange {
            position: Position::new(edge, 0.5),
            part_index,
        };
        let mut parts = vec![
            IslandPart {
                part_type: IslandPartType::Thin,
                changes: vec![mk_change(0, 1), mk_change(2, 2)],
                sum_lengths: 10,
            },
            IslandPart {
                part_type: IslandPartType::Thin,
                changes: vec![mk_change(1, 0)],
                sum_lengths: 20,
            },
            IslandPart {
                part_type: IslandPartType::Thick,
                changes: vec![mk_change(3, 0)],
                sum_lengths: 30,
            },
        ];
        merge_parts(&mut parts, 0, 1);
        assert_eq!(parts.len(), 2);
        // change to part 2 renumbered to 1
        assert!(parts[0].changes.iter().any(|c| c.part_index == 1));
        // mutual changes removed
        assert!(!parts[0].changes.iter().any(|c| c.part_index == 0));
        assert!(parts[1].changes.iter().all(|c| c.part_index == 0));
    }

    #[test]
    fn test_longest_internal_distance_single_edge_part() {
        let g = thin_chain_graph();
        // part on edge 0 between x = 2500 and x = 7500
        let changes = vec![
            IslandPartChange {
                position: Position::new(1, 0.75), // pointing back to n0
                part_index: 1,
            },
            IslandPartChange {
                position: Position::new(0, 0.75), // pointing on to n1
                part_index: 2,
            },
        ];
        let mut center = changes[0].position;
        let span = longest_internal_distance(&g, &changes, Some(&mut center));
        assert_eq!(span, 5_000);
        let c = center.point(&g);
        assert!((c.x - 5_000).abs() < 10);
    }
}
