use std::collections::HashMap;

/// A group of markers whose projected positions share a screen-space cell,
/// drawn as one ring with a count once it holds more than one member.
#[derive(Debug)]
pub struct Cluster {
    /// Centroid in braille pixels
    pub px: i32,
    pub py: i32,
    /// Indices into the renderer's marker list, in input order
    pub members: Vec<usize>,
}

impl Cluster {
    /// Squared pixel distance from the centroid.
    fn dist2(&self, px: i32, py: i32) -> i64 {
        let dx = (self.px - px) as i64;
        let dy = (self.py - py) as i64;
        dx * dx + dy * dy
    }

    pub fn contains(&self, px: i32, py: i32, radius: i32) -> bool {
        self.dist2(px, py) <= (radius as i64) * (radius as i64)
    }
}

/// Bucket projected markers into screen-space cells of `cell_size` pixels.
/// Markers landing in the same cell merge; the cluster sits at the member
/// centroid. Cluster order is first-appearance order and members keep input
/// order, so results are deterministic.
pub fn cluster_markers(positions: &[(usize, i32, i32)], cell_size: i32) -> Vec<Cluster> {
    let cell_size = cell_size.max(1);
    let mut by_cell: HashMap<(i32, i32), usize> = HashMap::new();
    let mut clusters: Vec<Cluster> = Vec::new();
    // Running position sums for centroid updates
    let mut sums: Vec<(i64, i64)> = Vec::new();

    for &(idx, px, py) in positions {
        let cell = (px.div_euclid(cell_size), py.div_euclid(cell_size));
        match by_cell.get(&cell) {
            Some(&slot) => {
                let cluster = &mut clusters[slot];
                cluster.members.push(idx);
                sums[slot].0 += px as i64;
                sums[slot].1 += py as i64;
                let n = cluster.members.len() as i64;
                cluster.px = (sums[slot].0 / n) as i32;
                cluster.py = (sums[slot].1 / n) as i32;
            }
            None => {
                by_cell.insert(cell, clusters.len());
                sums.push((px as i64, py as i64));
                clusters.push(Cluster {
                    px,
                    py,
                    members: vec![idx],
                });
            }
        }
    }

    clusters
}

/// Nearest cluster whose centroid lies within `radius` pixels of the pick
/// point, if any.
pub fn pick<'a>(clusters: &'a [Cluster], px: i32, py: i32, radius: i32) -> Option<&'a Cluster> {
    clusters
        .iter()
        .filter(|c| c.contains(px, py, radius))
        .min_by_key(|c| c.dist2(px, py))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_cell_merges() {
        let positions = [(0, 10, 10), (1, 12, 11), (2, 100, 100)];
        let clusters = cluster_markers(&positions, 16);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![0, 1]);
        assert_eq!(clusters[1].members, vec![2]);
    }

    #[test]
    fn centroid_averages_members() {
        let clusters = cluster_markers(&[(0, 10, 10), (1, 14, 10)], 16);
        assert_eq!(clusters.len(), 1);
        assert_eq!((clusters[0].px, clusters[0].py), (12, 10));
    }

    #[test]
    fn distant_markers_stay_apart() {
        let clusters = cluster_markers(&[(0, 0, 0), (1, 64, 0), (2, 0, 64)], 16);
        assert_eq!(clusters.len(), 3);
    }

    #[test]
    fn empty_input_is_fine() {
        assert!(cluster_markers(&[], 16).is_empty());
    }

    #[test]
    fn pick_finds_nearest_within_radius() {
        let clusters = cluster_markers(&[(0, 0, 0), (1, 40, 0)], 16);
        let hit = pick(&clusters, 6, 0, 8).expect("within radius of first");
        assert_eq!(hit.members, vec![0]);
        assert!(pick(&clusters, 20, 20, 8).is_none());
    }

    #[test]
    fn negative_coordinates_bucket_consistently() {
        // div_euclid keeps cells aligned across zero instead of folding
        // -1 and 1 into the same cell
        let clusters = cluster_markers(&[(0, -2, -2), (1, 2, 2)], 16);
        assert_eq!(clusters.len(), 2);
    }
}
