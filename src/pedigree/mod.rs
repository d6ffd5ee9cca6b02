//! Pedigree Module
//!
//! Pedigree records, their storage, the sequential ID generator and the
//! service that ties them to the statistics cache.

mod model;
mod repository;
mod sequence;
mod service;

#[cfg(test)]
mod property_tests;

pub use model::{
    deserialize_present, AncestorPosition, AncestorSummary, NewPedigree, Pedigree,
    PedigreeDetails, PedigreeDetailsPatch, PedigreeUpdate,
};
pub use repository::{
    InMemoryPedigreeRepository, PedigreeQuery, PedigreeRepository, SortField, SortOrder,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use sequence::{IdScheme, PedigreeIdGenerator, DEFAULT_PREFIX, DEFAULT_WIDTH};
pub use service::{
    FamilyTreeNode, PedigreeService, PedigreeStatistics, DEFAULT_FAMILY_TREE_GENERATIONS,
    MAX_FAMILY_TREE_GENERATIONS, STATISTICS_CACHE_KEY,
};
