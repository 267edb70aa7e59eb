use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::domain::AthleteId;

/// Undirected multigraph of athletes joined by direct comparisons
#[derive(Debug, Clone, Default)]
pub struct ComparisonGraph {
    adjacency: BTreeMap<AthleteId, BTreeMap<AthleteId, u32>>,
}

impl ComparisonGraph {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (AthleteId, AthleteId)>,
    {
        let mut graph = Self::default();
        for (a, b) in pairs {
            graph.add(a, b);
        }
        graph
    }

    pub fn add(&mut self, a: AthleteId, b: AthleteId) {
        if a == b {
            return;
        }
        *self.adjacency.entry(a).or_default().entry(b).or_insert(0) += 1;
        *self.adjacency.entry(b).or_default().entry(a).or_insert(0) += 1;
    }

    pub fn degree(&self, athlete_id: AthleteId) -> usize {
        self.adjacency.get(&athlete_id).map_or(0, |n| n.len())
    }

    pub fn comparisons(&self, athlete_id: AthleteId) -> u32 {
        self.adjacency
            .get(&athlete_id)
            .map_or(0, |n| n.values().sum())
    }

    /// Most-connected athlete: most distinct partners, then most comparisons, then lowest id
    pub fn hub(&self) -> Option<AthleteId> {
        self.adjacency
            .keys()
            .copied()
            .max_by_key(|&id| (self.degree(id), self.comparisons(id), Reverse(id)))
    }

    /// Shortest path lengths, in comparisons, from `origin` to every reachable athlete
    pub fn distances_from(&self, origin: AthleteId) -> HashMap<AthleteId, usize> {
        let mut distances = HashMap::new();
        if !self.adjacency.contains_key(&origin) {
            return distances;
        }

        let mut queue = VecDeque::from([origin]);
        distances.insert(origin, 0);

        while let Some(current) = queue.pop_front() {
            let next_distance = distances[&current] + 1;
            for &neighbour in self.adjacency[&current].keys() {
                if !distances.contains_key(&neighbour) {
                    distances.insert(neighbour, next_distance);
                    queue.push_back(neighbour);
                }
            }
        }

        distances
    }

    /// True when every listed athlete can reach every other through comparisons
    pub fn is_connected(&self, athletes: &[AthleteId]) -> bool {
        let Some(&first) = athletes.first() else {
            return true;
        };
        if athletes.len() == 1 {
            return true;
        }

        let reachable = self.distances_from(first);
        athletes.iter().all(|id| reachable.contains_key(id))
    }
}
