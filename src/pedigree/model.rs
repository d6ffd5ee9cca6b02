//! Pedigree Model
//!
//! A pedigree record keeps its ancestry denormalized: the parents and the
//! four grandparents are stored as flat text columns per position instead
//! of as links to other records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// == Pedigree ==
/// A stored pedigree record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pedigree {
    /// Internal storage key assigned by the repository
    pub id: u64,
    /// Business identifier, e.g. `JCU0000123`
    pub pedigree_id: String,
    #[serde(flatten)]
    pub details: PedigreeDetails,
    /// Stored record of the sire, when it is registered here
    pub father_pedigree_id: Option<u64>,
    /// Stored record of the dam, when it is registered here
    pub mother_pedigree_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a record that has not been stored yet.
#[derive(Debug, Clone, Default)]
pub struct NewPedigree {
    pub pedigree_id: String,
    pub details: PedigreeDetails,
    pub father_pedigree_id: Option<u64>,
    pub mother_pedigree_id: Option<u64>,
}

/// Partial update.
///
/// For the parent links the outer `Option` says whether the key was sent;
/// `Some(None)` removes the link.
#[derive(Debug, Clone, Default)]
pub struct PedigreeUpdate {
    pub pedigree_id: Option<String>,
    pub details: PedigreeDetailsPatch,
    pub father_pedigree_id: Option<Option<u64>>,
    pub mother_pedigree_id: Option<Option<u64>>,
}

/// Deserializes a key that may be absent, `null` or set.
///
/// Used with `#[serde(default)]`: an absent key stays `None`, an explicit
/// `null` becomes `Some(None)`.
pub fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// == Pedigree Details ==
/// Declares `PedigreeDetails` and its patch type from one column list.
macro_rules! pedigree_details {
    ($( $(#[$meta:meta])* $field:ident: $ty:ty, )+) => {
        /// Descriptive columns of a pedigree, including the flat ancestor columns.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct PedigreeDetails {
            $( $(#[$meta])* pub $field: Option<$ty>, )+
        }

        /// Partial update of [`PedigreeDetails`].
        ///
        /// `None`: the key was absent, the column is kept.
        /// `Some(None)`: the key was `null`, the column is cleared.
        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct PedigreeDetailsPatch {
            $(
                $(#[$meta])*
                #[serde(default, deserialize_with = "deserialize_present")]
                pub $field: Option<Option<$ty>>,
            )+
        }

        impl PedigreeDetails {
            /// Writes every column present in `patch`; explicit nulls clear.
            pub fn apply(&mut self, patch: PedigreeDetailsPatch) {
                $(
                    if let Some(value) = patch.$field {
                        self.$field = value;
                    }
                )+
            }
        }
    };
}

pedigree_details! {
    title: String,
    cat_name: String,
    /// Cattery name
    cat_name2: String,
    breed_code: i32,
    /// 1: male, 2: female
    gender_code: i32,
    eye_color: String,
    coat_color_code: i32,
    birth_date: String,
    breeder_name: String,
    owner_name: String,
    registration_date: String,
    brother_count: i32,
    sister_count: i32,
    notes: String,
    notes2: String,
    other_no: String,
    old_code: String,
    cat_id: String,

    // Generation 1: sire
    father_title: String,
    father_cat_name: String,
    father_cat_name2: String,
    father_coat_color: String,
    father_eye_color: String,
    #[serde(rename = "fatherJCU")]
    father_jcu: String,
    father_other_code: String,

    // Generation 1: dam
    mother_title: String,
    mother_cat_name: String,
    mother_cat_name2: String,
    mother_coat_color: String,
    mother_eye_color: String,
    #[serde(rename = "motherJCU")]
    mother_jcu: String,
    mother_other_code: String,

    // Generation 2: paternal grandparents
    ff_title: String,
    ff_cat_name: String,
    ff_cat_color: String,
    #[serde(rename = "ffJCU")]
    ff_jcu: String,
    fm_title: String,
    fm_cat_name: String,
    fm_cat_color: String,
    #[serde(rename = "fmJCU")]
    fm_jcu: String,

    // Generation 2: maternal grandparents
    mf_title: String,
    mf_cat_name: String,
    mf_cat_color: String,
    #[serde(rename = "mfJCU")]
    mf_jcu: String,
    mm_title: String,
    mm_cat_name: String,
    mm_cat_color: String,
    #[serde(rename = "mmJCU")]
    mm_jcu: String,
}

impl PedigreeDetails {
    /// Reads the flat columns of one ancestor position.
    ///
    /// Returns `None` when every column for that position is empty.
    pub fn ancestor(&self, position: AncestorPosition) -> Option<AncestorSummary> {
        let (title, name, color, registration) = match position {
            AncestorPosition::Father => (
                &self.father_title,
                &self.father_cat_name,
                &self.father_coat_color,
                &self.father_jcu,
            ),
            AncestorPosition::Mother => (
                &self.mother_title,
                &self.mother_cat_name,
                &self.mother_coat_color,
                &self.mother_jcu,
            ),
            AncestorPosition::PaternalGrandfather => {
                (&self.ff_title, &self.ff_cat_name, &self.ff_cat_color, &self.ff_jcu)
            }
            AncestorPosition::PaternalGrandmother => {
                (&self.fm_title, &self.fm_cat_name, &self.fm_cat_color, &self.fm_jcu)
            }
            AncestorPosition::MaternalGrandfather => {
                (&self.mf_title, &self.mf_cat_name, &self.mf_cat_color, &self.mf_jcu)
            }
            AncestorPosition::MaternalGrandmother => {
                (&self.mm_title, &self.mm_cat_name, &self.mm_cat_color, &self.mm_jcu)
            }
        };

        let summary = AncestorSummary {
            title: non_blank(title),
            cat_name: non_blank(name),
            color: non_blank(color),
            registration: non_blank(registration),
        };

        if summary.is_empty() {
            None
        } else {
            Some(summary)
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// == Ancestor Positions ==
/// Slots of the two denormalized generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncestorPosition {
    Father,
    Mother,
    PaternalGrandfather,
    PaternalGrandmother,
    MaternalGrandfather,
    MaternalGrandmother,
}

impl AncestorPosition {
    /// The two parent slots of this position's own parents, if the flat
    /// scheme stores them.
    pub fn parents(self) -> Option<(AncestorPosition, AncestorPosition)> {
        match self {
            AncestorPosition::Father => Some((
                AncestorPosition::PaternalGrandfather,
                AncestorPosition::PaternalGrandmother,
            )),
            AncestorPosition::Mother => Some((
                AncestorPosition::MaternalGrandfather,
                AncestorPosition::MaternalGrandmother,
            )),
            _ => None,
        }
    }
}

/// Text columns of one ancestor slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestorSummary {
    pub title: Option<String>,
    pub cat_name: Option<String>,
    pub color: Option<String>,
    /// Registration number in the registry (JCU column)
    pub registration: Option<String>,
}

impl AncestorSummary {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.cat_name.is_none()
            && self.color.is_none()
            && self.registration.is_none()
    }
}
