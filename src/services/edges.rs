//! Random relationship graph generation.

use crate::models::schema::names;
use crate::models::NodeId;
use crate::storage::{StoreBackend, StoreTransaction};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds a simple directed graph with a fixed out-degree per vertex.
///
/// For every vertex in the id population, `out_degree` distinct targets
/// are drawn from the rest of the population by sampling without
/// replacement, so the result has no self-loops and no duplicate target
/// per source. Reverse-direction duplicates and unbounded in-degrees are
/// allowed by construction.
///
/// The generator is deterministic for a given seed, which keeps test runs
/// and repeated benchmarks comparable.
pub struct RandomEdgeGenerator {
    store: Arc<dyn StoreBackend>,
    rng: StdRng,
}

impl RandomEdgeGenerator {
    /// Creates a generator with a fixed seed.
    #[must_use]
    pub fn new(store: Arc<dyn StoreBackend>, seed: u64) -> Self {
        Self {
            store,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy(store: Arc<dyn StoreBackend>) -> Self {
        Self {
            store,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Connects every vertex with id in `lower_id..=upper_id` to
    /// `out_degree` distinct other vertices of the population, in one
    /// atomic unit of work. Returns the number of edges created.
    ///
    /// Vertex ids are matched against the string form of the numeric id,
    /// the same encoding the seeding step uses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the range is empty or
    /// `out_degree` is not smaller than the population size (no edges are
    /// created), or [`Error::NotFound`] if a population id does not
    /// resolve to a vertex.
    pub fn generate(
        &mut self,
        vertex_type: &str,
        edge_type: &str,
        lower_id: u64,
        upper_id: u64,
        out_degree: usize,
    ) -> Result<usize> {
        if lower_id > upper_id {
            return Err(Error::InvalidArgument(format!(
                "empty id range {lower_id}..={upper_id}"
            )));
        }
        let population: Vec<u64> = (lower_id..=upper_id).collect();
        if out_degree >= population.len() {
            return Err(Error::InvalidArgument(format!(
                "out-degree {out_degree} must be smaller than the population size {}",
                population.len()
            )));
        }

        let mut tx = self.store.begin()?;
        let mut created = 0_usize;
        for &source_id in &population {
            let source = Self::require_vertex(tx.as_ref(), vertex_type, source_id)?;

            // Shrinking candidate pool: no self-loop, no duplicate target.
            let mut pool: Vec<u64> =
                population.iter().copied().filter(|&c| c != source_id).collect();
            for _ in 0..out_degree {
                let picked = pool.swap_remove(self.rng.random_range(0..pool.len()));
                let target = Self::require_vertex(tx.as_ref(), vertex_type, picked)?;
                tx.create_edge(edge_type, source, target, false)?;
                created += 1;
            }
            debug!(source_id, out_degree, "connected vertex");
        }
        tx.commit()?;
        info!(created, edge_type, "random graph generated");
        Ok(created)
    }

    fn require_vertex(
        tx: &dyn StoreTransaction,
        vertex_type: &str,
        numeric_id: u64,
    ) -> Result<NodeId> {
        tx.lookup_by_key(vertex_type, names::ID, &json!(numeric_id.to_string()))?
            .ok_or_else(|| Error::NotFound(format!("{vertex_type} '{numeric_id}'")))
    }
}
