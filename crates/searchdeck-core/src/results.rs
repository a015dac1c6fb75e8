use crate::answer::{ResultBucket, SourceHit};

pub const RRF_WITHOUT_INDEX_WARNING: &str =
    "rank fusion requires at least one enabled index";
pub const NO_INDEX_WARNING: &str = "no index selected";

/// Which per-source hit list the result view reads, decided purely from the
/// three retrieval toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelection {
    RankFusion,
    VectorDb,
    SparseIndex,
}

impl SourceSelection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RankFusion => "rrf",
            Self::VectorDb => "vectordb",
            Self::SparseIndex => "sparseindex",
        }
    }
}

/// Maps the toggle combination to a hit source. Rank fusion is only read
/// when both indexes fed it; with a single index enabled the fused list
/// falls back to that index, and with no index enabled there is nothing to
/// show regardless of the fusion toggle.
pub fn select_source(
    rrf_enabled: bool,
    vector_enabled: bool,
    sparse_enabled: bool,
) -> Option<SourceSelection> {
    match (rrf_enabled, vector_enabled, sparse_enabled) {
        (true, true, true) => Some(SourceSelection::RankFusion),
        (true, true, false) => Some(SourceSelection::VectorDb),
        (true, false, true) => Some(SourceSelection::SparseIndex),
        (false, true, _) => Some(SourceSelection::VectorDb),
        (false, false, true) => Some(SourceSelection::SparseIndex),
        (_, false, false) => None,
    }
}

impl ResultBucket {
    /// Hit list for one source within this ranked slot.
    pub fn hits_for(&self, selection: SourceSelection) -> &[SourceHit] {
        match selection {
            SourceSelection::RankFusion => &self.rrf,
            SourceSelection::VectorDb => &self.vectordb,
            SourceSelection::SparseIndex => &self.sparseindex,
        }
    }
}

/// Flattens the selected source's hits across every ranked slot, keeping
/// slot order.
pub fn flatten_hits(buckets: &[ResultBucket], selection: SourceSelection) -> Vec<SourceHit> {
    buckets
        .iter()
        .flat_map(|bucket| bucket.hits_for(selection).iter().cloned())
        .collect()
}

/// Outcome of the result filter: the hits to render, plus a warning when the
/// toggle combination selects nothing. An unusable combination is not an
/// error; the view just has nothing to show.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredHits {
    pub hits: Vec<SourceHit>,
    pub warning: Option<&'static str>,
}

pub fn filter_hits(
    buckets: &[ResultBucket],
    rrf_enabled: bool,
    vector_enabled: bool,
    sparse_enabled: bool,
) -> FilteredHits {
    match select_source(rrf_enabled, vector_enabled, sparse_enabled) {
        Some(selection) => FilteredHits {
            hits: flatten_hits(buckets, selection),
            warning: None,
        },
        None => FilteredHits {
            hits: Vec::new(),
            warning: Some(if rrf_enabled {
                RRF_WITHOUT_INDEX_WARNING
            } else {
                NO_INDEX_WARNING
            }),
        },
    }
}
