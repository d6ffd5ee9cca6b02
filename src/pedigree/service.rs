//! Pedigree Service
//!
//! Record management on top of a [`PedigreeRepository`], with memoized
//! statistics and next-ID suggestions.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::{CacheStats, SharedCache};
use crate::error::{AppError, Result};
use crate::models::{CreatePedigreeRequest, PageMeta, PaginatedResponse, UpdatePedigreeRequest};
use crate::pedigree::{
    AncestorPosition, AncestorSummary, IdScheme, NewPedigree, Pedigree, PedigreeDetails,
    PedigreeIdGenerator, PedigreeQuery, PedigreeRepository, PedigreeUpdate,
};

/// Cache key of the memoized statistics report.
pub const STATISTICS_CACHE_KEY: &str = "pedigree:statistics";
/// Everything derived from pedigree records; dropped after every write.
const PEDIGREE_CACHE_PATTERN: &str = "^pedigree:";

pub const DEFAULT_FAMILY_TREE_GENERATIONS: u32 = 3;
pub const MAX_FAMILY_TREE_GENERATIONS: u32 = 5;
const RECENT_WINDOW_DAYS: i64 = 30;

// == Statistics ==
/// Aggregate counts over all pedigree records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PedigreeStatistics {
    pub total: u64,
    /// Records created in the last 30 days
    pub recent: u64,
    /// Count per breed code; records without a code are not counted
    pub by_breed: BTreeMap<String, u64>,
    /// Count per gender code; records without a code are not counted
    pub by_gender: BTreeMap<String, u64>,
}

impl PedigreeStatistics {
    fn compute(records: &[Pedigree]) -> Self {
        let cutoff = Utc::now() - chrono::Duration::days(RECENT_WINDOW_DAYS);
        let mut stats = Self {
            total: records.len() as u64,
            ..Default::default()
        };

        for record in records {
            if record.created_at >= cutoff {
                stats.recent += 1;
            }
            if let Some(code) = record.details.breed_code {
                *stats.by_breed.entry(code.to_string()).or_default() += 1;
            }
            if let Some(code) = record.details.gender_code {
                *stats.by_gender.entry(code.to_string()).or_default() += 1;
            }
        }
        stats
    }
}

// == Family Tree ==
/// One cat in a family tree and, recursively, its parents.
///
/// Nodes backed by a stored record carry its `id`; nodes rebuilt from the
/// flat ancestor columns do not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTreeNode {
    pub id: Option<u64>,
    pub pedigree_id: Option<String>,
    /// 0 for the subject, 1 for parents, 2 for grandparents, ...
    pub generation: u32,
    #[serde(flatten)]
    pub summary: AncestorSummary,
    pub father: Option<Box<FamilyTreeNode>>,
    pub mother: Option<Box<FamilyTreeNode>>,
}

impl FamilyTreeNode {
    fn from_record(record: &Pedigree, generation: u32) -> Self {
        let details = &record.details;
        Self {
            id: Some(record.id),
            pedigree_id: Some(record.pedigree_id.clone()),
            generation,
            summary: AncestorSummary {
                title: details.title.clone(),
                cat_name: details.cat_name.clone(),
                color: details.coat_color_code.map(|c| c.to_string()),
                registration: Some(record.pedigree_id.clone()),
            },
            father: None,
            mother: None,
        }
    }

    /// Rebuilds an ancestor from the denormalized columns of `details`.
    fn from_columns(
        details: &PedigreeDetails,
        position: AncestorPosition,
        generation: u32,
        max_generation: u32,
    ) -> Option<Self> {
        let (father, mother) = match position.parents() {
            Some((f, m)) if generation < max_generation => (
                Self::from_columns(details, f, generation + 1, max_generation),
                Self::from_columns(details, m, generation + 1, max_generation),
            ),
            _ => (None, None),
        };

        let summary = details.ancestor(position);
        if summary.is_none() && father.is_none() && mother.is_none() {
            return None;
        }

        Some(Self {
            id: None,
            pedigree_id: None,
            generation,
            summary: summary.unwrap_or_default(),
            father: father.map(Box::new),
            mother: mother.map(Box::new),
        })
    }
}

type BoxedNode<'a> = Pin<Box<dyn Future<Output = Result<FamilyTreeNode>> + Send + 'a>>;

// == Service ==
#[derive(Clone)]
pub struct PedigreeService {
    repository: Arc<dyn PedigreeRepository>,
    cache: SharedCache<PedigreeStatistics>,
    ids: PedigreeIdGenerator,
    statistics_ttl: Duration,
    /// Bumped by every write before it invalidates the cache
    writes: Arc<AtomicU64>,
}

impl PedigreeService {
    pub fn new(
        repository: Arc<dyn PedigreeRepository>,
        cache: SharedCache<PedigreeStatistics>,
        scheme: IdScheme,
        statistics_ttl: Duration,
    ) -> Self {
        let ids = PedigreeIdGenerator::new(scheme, repository.clone());
        Self {
            repository,
            cache,
            ids,
            statistics_ttl,
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn cache(&self) -> &SharedCache<PedigreeStatistics> {
        &self.cache
    }

    // == Next ID ==
    /// Suggests the identifier for the next record. Advisory only.
    pub async fn next_pedigree_id(&self) -> Result<String> {
        self.ids.next_id().await
    }

    // == Create ==
    pub async fn create(&self, req: CreatePedigreeRequest) -> Result<Pedigree> {
        if let Some(error_msg) = req.validate() {
            return Err(AppError::InvalidRequest(error_msg));
        }
        self.check_parent_links(None, req.father_pedigree_id, req.mother_pedigree_id)
            .await?;

        let pedigree = self
            .repository
            .insert(NewPedigree {
                pedigree_id: req.pedigree_id.trim().to_string(),
                details: req.details,
                father_pedigree_id: req.father_pedigree_id,
                mother_pedigree_id: req.mother_pedigree_id,
            })
            .await?;

        info!("Created pedigree {} (id {})", pedigree.pedigree_id, pedigree.id);
        self.invalidate().await?;
        Ok(pedigree)
    }

    // == Update ==
    pub async fn update(&self, id: u64, req: UpdatePedigreeRequest) -> Result<Pedigree> {
        if let Some(error_msg) = req.validate() {
            return Err(AppError::InvalidRequest(error_msg));
        }
        self.check_parent_links(
            Some(id),
            req.father_pedigree_id.flatten(),
            req.mother_pedigree_id.flatten(),
        )
        .await?;

        let pedigree = self
            .repository
            .update(
                id,
                PedigreeUpdate {
                    pedigree_id: req.pedigree_id.map(|p| p.trim().to_string()),
                    details: req.details,
                    father_pedigree_id: req.father_pedigree_id,
                    mother_pedigree_id: req.mother_pedigree_id,
                },
            )
            .await?;

        info!("Updated pedigree {} (id {})", pedigree.pedigree_id, pedigree.id);
        self.invalidate().await?;
        Ok(pedigree)
    }

    // == Remove ==
    pub async fn remove(&self, id: u64) -> Result<Pedigree> {
        let pedigree = self.repository.delete(id).await?;

        info!("Deleted pedigree {} (id {})", pedigree.pedigree_id, pedigree.id);
        self.invalidate().await?;
        Ok(pedigree)
    }

    // == Reads ==
    pub async fn find_one(&self, id: u64) -> Result<Pedigree> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pedigree {}", id)))
    }

    pub async fn find_by_pedigree_id(&self, pedigree_id: &str) -> Result<Pedigree> {
        self.repository
            .find_by_pedigree_id(pedigree_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("PedigreeID {}", pedigree_id)))
    }

    pub async fn find_all(&self, query: &PedigreeQuery) -> Result<PaginatedResponse<Pedigree>> {
        let (page, limit) = query.normalized_paging();
        let (data, total) = self.repository.list(query).await?;
        Ok(PaginatedResponse {
            data,
            meta: PageMeta::new(total, page, limit),
        })
    }

    // == Statistics ==
    /// Returns the statistics report, recomputing it when the cached copy
    /// is missing or expired.
    pub async fn statistics(&self) -> Result<PedigreeStatistics> {
        if let Some(cached) = self.cache.write().await.get(STATISTICS_CACHE_KEY) {
            return Ok(cached);
        }

        // The lock is not held across the store read, so a write may land
        // in between; its report is returned but not cached.
        let seen = self.writes.load(Ordering::SeqCst);
        let records = self.repository.all().await?;
        let statistics = PedigreeStatistics::compute(&records);
        debug!("Computed pedigree statistics over {} records", statistics.total);

        let mut cache = self.cache.write().await;
        if self.writes.load(Ordering::SeqCst) == seen {
            cache.set(STATISTICS_CACHE_KEY, statistics.clone(), self.statistics_ttl);
        } else {
            debug!("Pedigree statistics outdated by a concurrent write, not cached");
        }
        Ok(statistics)
    }

    // == Family Tree ==
    /// Builds the ancestry of a record down to `generations` levels.
    ///
    /// Stored parent links are followed first; positions without a link
    /// fall back to the record's flat ancestor columns.
    pub async fn family_tree(&self, id: u64, generations: Option<u32>) -> Result<FamilyTreeNode> {
        let generations = generations
            .unwrap_or(DEFAULT_FAMILY_TREE_GENERATIONS)
            .clamp(1, MAX_FAMILY_TREE_GENERATIONS);
        let record = self.find_one(id).await?;
        self.build_node(record, 0, generations).await
    }

    fn build_node(&self, record: Pedigree, generation: u32, max_generation: u32) -> BoxedNode<'_> {
        Box::pin(async move {
            let mut node = FamilyTreeNode::from_record(&record, generation);
            if generation >= max_generation {
                return Ok(node);
            }

            node.father = self
                .parent_node(
                    &record,
                    record.father_pedigree_id,
                    AncestorPosition::Father,
                    generation + 1,
                    max_generation,
                )
                .await?;
            node.mother = self
                .parent_node(
                    &record,
                    record.mother_pedigree_id,
                    AncestorPosition::Mother,
                    generation + 1,
                    max_generation,
                )
                .await?;
            Ok(node)
        })
    }

    async fn parent_node(
        &self,
        child: &Pedigree,
        link: Option<u64>,
        position: AncestorPosition,
        generation: u32,
        max_generation: u32,
    ) -> Result<Option<Box<FamilyTreeNode>>> {
        if let Some(parent_id) = link {
            if let Some(parent) = self.repository.find_by_id(parent_id).await? {
                let node = self.build_node(parent, generation, max_generation).await?;
                return Ok(Some(Box::new(node)));
            }
        }

        Ok(
            FamilyTreeNode::from_columns(&child.details, position, generation, max_generation)
                .map(Box::new),
        )
    }

    // == Cache Administration ==
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    pub async fn clear_cache(&self) -> usize {
        let removed = self.cache.write().await.clear();
        info!("Cache cleared ({} entries)", removed);
        removed
    }

    async fn invalidate(&self) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.cache
            .write()
            .await
            .delete_pattern(PEDIGREE_CACHE_PATTERN)?;
        Ok(())
    }

    async fn check_parent_links(
        &self,
        child: Option<u64>,
        father: Option<u64>,
        mother: Option<u64>,
    ) -> Result<()> {
        for (role, link) in [("father", father), ("mother", mother)] {
            let Some(parent_id) = link else { continue };
            if Some(parent_id) == child {
                return Err(AppError::InvalidRequest(format!(
                    "A pedigree cannot be its own {}",
                    role
                )));
            }
            if self.repository.find_by_id(parent_id).await?.is_none() {
                return Err(AppError::InvalidRequest(format!(
                    "{} pedigree {} does not exist",
                    role, parent_id
                )));
            }
        }
        Ok(())
    }
}
