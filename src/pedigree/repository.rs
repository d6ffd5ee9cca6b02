//! Pedigree Repository
//!
//! Storage seam for pedigree records. The bundled implementation keeps
//! records in memory; a database-backed store implements the same trait.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::pedigree::{NewPedigree, Pedigree, PedigreeUpdate};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

// == Query ==
/// Filtering, sorting and paging for list reads.
#[derive(Debug, Clone, Default)]
pub struct PedigreeQuery {
    /// 1-based page number
    pub page: u32,
    /// Page size, clamped to 1..=MAX_PAGE_SIZE
    pub limit: u32,
    /// Case-insensitive substring over cat name, pedigree ID, breeder and owner
    pub search: Option<String>,
    pub gender_code: Option<i32>,
    pub eye_color: Option<String>,
    pub cat_name2: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl PedigreeQuery {
    /// Page and limit after defaults and clamping.
    pub fn normalized_paging(&self) -> (u32, u32) {
        let page = self.page.max(1);
        let limit = match self.limit {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };
        (page, limit)
    }

    fn matches(&self, record: &Pedigree) -> bool {
        let details = &record.details;

        if let Some(search) = non_empty(&self.search) {
            let needle = search.to_lowercase();
            let hit = [
                details.cat_name.as_deref(),
                Some(record.pedigree_id.as_str()),
                details.breeder_name.as_deref(),
                details.owner_name.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(code) = self.gender_code {
            if details.gender_code != Some(code) {
                return false;
            }
        }

        contains_ci(&details.eye_color, &self.eye_color)
            && contains_ci(&details.cat_name2, &self.cat_name2)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn contains_ci(field: &Option<String>, filter: &Option<String>) -> bool {
    match non_empty(filter) {
        None => true,
        Some(needle) => field
            .as_deref()
            .map(|f| f.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    PedigreeId,
    CatName,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            "pedigreeId" => Some(Self::PedigreeId),
            "catName" => Some(Self::CatName),
            _ => None,
        }
    }

    fn compare(self, a: &Pedigree, b: &Pedigree) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::PedigreeId => a.pedigree_id.cmp(&b.pedigree_id),
            SortField::CatName => a.details.cat_name.cmp(&b.details.cat_name),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

// == Repository Trait ==
#[async_trait]
pub trait PedigreeRepository: Send + Sync {
    /// Stores a new record. Fails with `Conflict` on a duplicate pedigree ID.
    async fn insert(&self, new: NewPedigree) -> Result<Pedigree>;

    /// Applies a partial update. Fails with `NotFound` or `Conflict`.
    async fn update(&self, id: u64, update: PedigreeUpdate) -> Result<Pedigree>;

    /// Removes and returns the record.
    async fn delete(&self, id: u64) -> Result<Pedigree>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Pedigree>>;

    async fn find_by_pedigree_id(&self, pedigree_id: &str) -> Result<Option<Pedigree>>;

    /// Greatest pedigree ID under string ordering, if any record exists.
    async fn latest_pedigree_id(&self) -> Result<Option<String>>;

    /// One page of matching records and the total match count.
    async fn list(&self, query: &PedigreeQuery) -> Result<(Vec<Pedigree>, u64)>;

    async fn all(&self) -> Result<Vec<Pedigree>>;
}

// == In-Memory Repository ==
#[derive(Debug, Default)]
struct Records {
    by_id: BTreeMap<u64, Pedigree>,
    next_id: u64,
}

impl Records {
    fn pedigree_id_taken(&self, pedigree_id: &str, except: Option<u64>) -> bool {
        self.by_id
            .values()
            .any(|p| p.pedigree_id == pedigree_id && Some(p.id) != except)
    }
}

/// Process-local record store.
#[derive(Debug, Default)]
pub struct InMemoryPedigreeRepository {
    records: RwLock<Records>,
}

impl InMemoryPedigreeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate(pedigree_id: &str) -> AppError {
    AppError::Conflict(format!("PedigreeID {} is already registered", pedigree_id))
}

#[async_trait]
impl PedigreeRepository for InMemoryPedigreeRepository {
    async fn insert(&self, new: NewPedigree) -> Result<Pedigree> {
        let mut records = self.records.write().await;

        if records.pedigree_id_taken(&new.pedigree_id, None) {
            return Err(duplicate(&new.pedigree_id));
        }

        records.next_id += 1;
        let now = Utc::now();
        let pedigree = Pedigree {
            id: records.next_id,
            pedigree_id: new.pedigree_id,
            details: new.details,
            father_pedigree_id: new.father_pedigree_id,
            mother_pedigree_id: new.mother_pedigree_id,
            created_at: now,
            updated_at: now,
        };
        records.by_id.insert(pedigree.id, pedigree.clone());
        Ok(pedigree)
    }

    async fn update(&self, id: u64, update: PedigreeUpdate) -> Result<Pedigree> {
        let mut records = self.records.write().await;

        if !records.by_id.contains_key(&id) {
            return Err(AppError::NotFound(format!("Pedigree {}", id)));
        }
        if let Some(pid) = &update.pedigree_id {
            if records.pedigree_id_taken(pid, Some(id)) {
                return Err(duplicate(pid));
            }
        }

        let record = records
            .by_id
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Pedigree {}", id)))?;

        if let Some(pid) = update.pedigree_id {
            record.pedigree_id = pid;
        }
        record.details.apply(update.details);
        if let Some(link) = update.father_pedigree_id {
            record.father_pedigree_id = link;
        }
        if let Some(link) = update.mother_pedigree_id {
            record.mother_pedigree_id = link;
        }
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn delete(&self, id: u64) -> Result<Pedigree> {
        self.records
            .write()
            .await
            .by_id
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Pedigree {}", id)))
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Pedigree>> {
        Ok(self.records.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_pedigree_id(&self, pedigree_id: &str) -> Result<Option<Pedigree>> {
        Ok(self
            .records
            .read()
            .await
            .by_id
            .values()
            .find(|p| p.pedigree_id == pedigree_id)
            .cloned())
    }

    async fn latest_pedigree_id(&self) -> Result<Option<String>> {
        Ok(self
            .records
            .read()
            .await
            .by_id
            .values()
            .map(|p| &p.pedigree_id)
            .max()
            .cloned())
    }

    async fn list(&self, query: &PedigreeQuery) -> Result<(Vec<Pedigree>, u64)> {
        let records = self.records.read().await;
        let (page, limit) = query.normalized_paging();

        let mut matched: Vec<&Pedigree> = records
            .by_id
            .values()
            .filter(|p| query.matches(p))
            .collect();

        matched.sort_by(|a, b| {
            let ordering = query.sort_by.compare(a, b).then(a.id.cmp(&b.id));
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matched.len() as u64;
        let skip = (page as usize - 1).saturating_mul(limit as usize);
        let data = matched
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok((data, total))
    }

    async fn all(&self) -> Result<Vec<Pedigree>> {
        Ok(self.records.read().await.by_id.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedigree::{PedigreeDetails, PedigreeDetailsPatch};

    fn new_pedigree(pid: &str, cat_name: &str) -> NewPedigree {
        NewPedigree {
            pedigree_id: pid.to_string(),
            details: PedigreeDetails {
                cat_name: Some(cat_name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let repo = InMemoryPedigreeRepository::new();

        let a = repo.insert(new_pedigree("JCU0000001", "Sora")).await.unwrap();
        let b = repo.insert(new_pedigree("JCU0000002", "Umi")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[tokio::test]
    async fn test_insert_duplicate_pedigree_id() {
        let repo = InMemoryPedigreeRepository::new();
        repo.insert(new_pedigree("JCU0000001", "Sora")).await.unwrap();

        let result = repo.insert(new_pedigree("JCU0000001", "Umi")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_applies_and_checks_uniqueness() {
        let repo = InMemoryPedigreeRepository::new();
        let a = repo.insert(new_pedigree("JCU0000001", "Sora")).await.unwrap();
        repo.insert(new_pedigree("JCU0000002", "Umi")).await.unwrap();

        let updated = repo
            .update(
                a.id,
                PedigreeUpdate {
                    details: PedigreeDetailsPatch {
                        owner_name: Some(Some("Tanaka".to_string())),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.details.cat_name.as_deref(), Some("Sora"));
        assert_eq!(updated.details.owner_name.as_deref(), Some("Tanaka"));

        let clash = repo
            .update(
                a.id,
                PedigreeUpdate {
                    pedigree_id: Some("JCU0000002".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(clash, Err(AppError::Conflict(_))));

        // Keeping its own ID is not a clash
        let same = repo
            .update(
                a.id,
                PedigreeUpdate {
                    pedigree_id: Some("JCU0000001".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(same.is_ok());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repo = InMemoryPedigreeRepository::new();
        repo.insert(new_pedigree("JCU0000001", "Sora")).await.unwrap();

        let update = repo.update(99, PedigreeUpdate::default()).await;
        assert!(matches!(update, Err(AppError::NotFound(_))));

        // A missing record wins over a clashing identifier
        let update = repo
            .update(
                99,
                PedigreeUpdate {
                    pedigree_id: Some("JCU0000001".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(update, Err(AppError::NotFound(_))));

        let delete = repo.delete(99).await;
        assert!(matches!(delete, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_clears_link_and_column() {
        let repo = InMemoryPedigreeRepository::new();
        let sire = repo.insert(new_pedigree("JCU0000001", "Taro")).await.unwrap();
        let mut kitten = new_pedigree("JCU0000002", "Mochi");
        kitten.details.owner_name = Some("Tanaka".to_string());
        kitten.father_pedigree_id = Some(sire.id);
        let kitten = repo.insert(kitten).await.unwrap();

        // Absent keys keep their values
        let kept = repo.update(kitten.id, PedigreeUpdate::default()).await.unwrap();
        assert_eq!(kept.father_pedigree_id, Some(sire.id));
        assert_eq!(kept.details.owner_name.as_deref(), Some("Tanaka"));

        let cleared = repo
            .update(
                kitten.id,
                PedigreeUpdate {
                    details: PedigreeDetailsPatch {
                        owner_name: Some(None),
                        ..Default::default()
                    },
                    father_pedigree_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.father_pedigree_id.is_none());
        assert!(cleared.details.owner_name.is_none());
        assert_eq!(cleared.details.cat_name.as_deref(), Some("Mochi"));
    }

    #[tokio::test]
    async fn test_latest_pedigree_id_is_string_max() {
        let repo = InMemoryPedigreeRepository::new();
        assert_eq!(repo.latest_pedigree_id().await.unwrap(), None);

        for pid in ["JCU0000009", "JCU0000100", "JCU0000010"] {
            repo.insert(new_pedigree(pid, "x")).await.unwrap();
        }

        assert_eq!(
            repo.latest_pedigree_id().await.unwrap().as_deref(),
            Some("JCU0000100")
        );
    }

    #[tokio::test]
    async fn test_list_search_filters_and_paging() {
        let repo = InMemoryPedigreeRepository::new();
        for i in 1..=25 {
            let mut new = new_pedigree(&format!("JCU{:07}", i), &format!("Cat {}", i));
            new.details.gender_code = Some(if i % 2 == 0 { 2 } else { 1 });
            repo.insert(new).await.unwrap();
        }

        let query = PedigreeQuery {
            page: 2,
            limit: 10,
            sort_by: SortField::PedigreeId,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let (page, total) = repo.list(&query).await.unwrap();
        assert_eq!(total, 25);
        assert_eq!(page.len(), 10);
        assert_eq!(page[0].pedigree_id, "JCU0000011");

        let query = PedigreeQuery {
            search: Some("cat 1".to_string()),
            gender_code: Some(2),
            ..Default::default()
        };
        let (page, total) = repo.list(&query).await.unwrap();
        // Cat 10, 12, 14, 16, 18
        assert_eq!(total, 5);
        assert!(page.iter().all(|p| p.details.gender_code == Some(2)));
    }

    #[test]
    fn test_normalized_paging() {
        let query = PedigreeQuery::default();
        assert_eq!(query.normalized_paging(), (1, DEFAULT_PAGE_SIZE));

        let query = PedigreeQuery {
            page: 3,
            limit: 500,
            ..Default::default()
        };
        assert_eq!(query.normalized_paging(), (3, MAX_PAGE_SIZE));
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(SortField::parse("catName"), Some(SortField::CatName));
        assert_eq!(SortField::parse("nope"), None);
        assert_eq!(SortOrder::parse("ASC"), Some(SortOrder::Asc));
    }
}
