//! Support sampling along thin-part skeletons.

use super::config::SampleConfig;
use super::point::{SupportPointKind, SupportPoints};
use super::segmentation::ThinPart;
use super::skeleton::{twin, EdgeId, Position, SkeletonGraph};
use crate::CoordF;

/// A sampling cursor: the edge it will walk next and the arc length still
/// owed before the next support point.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    support_in: CoordF,
    edge: EdgeId,
}

/// Distribute support points along the skeleton of one thin part.
///
/// Two cursors start at the part center and walk outward, emitting a point
/// every `thin_max_distance` of arc length. Branch nodes split the cursor,
/// part ends emit a final point when the walk got far enough from the last
/// one, and a cursor meeting the mirror image of another walk closes a
/// skeleton cycle.
pub fn sample_thin_part(
    graph: &SkeletonGraph,
    part: &ThinPart,
    results: &mut SupportPoints,
    config: &SampleConfig,
) {
    let support_distance = config.thin_max_distance as CoordF;
    let half_support_distance = support_distance / 2.0;

    let center_distance = part.center.distance_from_source(graph);
    let mut current = Some(Cursor {
        support_in: half_support_distance + center_distance,
        edge: part.center.edge,
    });
    let twin_start = twin(part.center.edge);
    let twin_support_in =
        graph.edge(twin_start).length - (half_support_distance + center_distance)
            + support_distance;
    let mut process = vec![Cursor {
        support_in: twin_support_in,
        edge: twin_start,
    }];
    let mut is_first_edge = true;

    loop {
        let mut cursor = match current.take().or_else(|| process.pop()) {
            Some(cursor) => cursor,
            None => break,
        };

        let part_end = part
            .ends
            .binary_search_by_key(&cursor.edge, |p| p.edge)
            .ok()
            .map(|i| part.ends[i]);
        let edge_length = match part_end {
            Some(end) => end.distance_from_source(graph),
            None => graph.edge(cursor.edge).length,
        };

        // regular spacing along the edge
        while edge_length >= cursor.support_in {
            let ratio = cursor.support_in / graph.edge(cursor.edge).length;
            let position = Position::new(cursor.edge, ratio);
            results.push_skeleton(
                position.point(graph),
                cursor.edge,
                SupportPointKind::ThinPartChange,
            );
            cursor.support_in += support_distance;
        }
        cursor.support_in -= edge_length;

        if let Some(end) = part_end {
            // transition into a thick part: support it when the walk got
            // far enough from the previous point
            if cursor.support_in < half_support_distance {
                results.push_skeleton(end.point(graph), end.edge, SupportPointKind::ThinPart);
            }
            continue;
        }

        let cursor_twin = twin(cursor.edge);
        if is_first_edge {
            // the second center cursor legitimately sits in the queue
            is_first_edge = false;
        } else if let Some(queued_at) = process.iter().position(|c| c.edge == cursor_twin) {
            // the walks met on opposite sides of one edge: a skeleton cycle
            if cursor.support_in < half_support_distance {
                let position = Position::new(cursor.edge, 1.0);
                results.push_skeleton(
                    position.point(graph),
                    cursor.edge,
                    SupportPointKind::ThinPartLoop,
                );
            }
            process.remove(queued_at);
            continue;
        }

        // continue into the successors; the first one keeps this cursor
        let mut next_edge = None;
        for &successor in &graph.node(graph.edge(cursor.edge).to).edges {
            if successor == cursor_twin {
                continue;
            }
            if next_edge.is_none() {
                next_edge = Some(successor);
            } else {
                process.push(Cursor {
                    support_in: cursor.support_in,
                    edge: successor,
                });
            }
        }
        current = next_edge.map(|edge| Cursor {
            support_in: cursor.support_in,
            edge,
        });
    }
}
