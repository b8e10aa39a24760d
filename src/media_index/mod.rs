//! Media index access.
//!
//! [`MediaIndex`] is the queryable catalog of image records. [`MediaIndexGateway`]
//! issues the one query the gallery needs and turns rows into resource identifiers.

use crate::error::Result;
use crate::identifier::ResourceIdentifier;
use log::{debug, warn};
use std::sync::Arc;

pub mod directory;

pub use directory::DirectoryIndex;

/// Columns of the image records table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    RecordId,
    DateAdded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: Column,
    pub descending: bool,
}

/// A read-only query without a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    pub projection: Vec<Column>,
    pub sort: SortOrder,
}

/// One image record. Columns outside the projection are left at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRow {
    pub record_id: u64,
    pub date_added: i64,
}

impl IndexQuery {
    /// Record ids only, newest addition first.
    pub fn images_by_date_added_desc() -> Self {
        Self {
            projection: vec![Column::RecordId],
            sort: SortOrder {
                column: Column::DateAdded,
                descending: true,
            },
        }
    }

    /// Sorts `rows` by this query's order. Ties on `date_added` fall back to
    /// `record_id` in the same direction.
    pub fn order(&self, rows: &mut [IndexRow]) {
        let SortOrder { column, descending } = self.sort;
        rows.sort_by(|a, b| {
            let ord = match column {
                Column::DateAdded => a
                    .date_added
                    .cmp(&b.date_added)
                    .then(a.record_id.cmp(&b.record_id)),
                Column::RecordId => a.record_id.cmp(&b.record_id),
            };
            if descending { ord.reverse() } else { ord }
        });
    }

    /// Applies the projection, zeroing columns that were not requested.
    pub fn project(&self, row: IndexRow) -> IndexRow {
        let keep = |column| self.projection.contains(&column);
        IndexRow {
            record_id: if keep(Column::RecordId) { row.record_id } else { 0 },
            date_added: if keep(Column::DateAdded) { row.date_added } else { 0 },
        }
    }
}

/// Queryable catalog of image records.
pub trait MediaIndex {
    /// Address of the images collection; record ids are appended to it.
    fn collection_address(&self) -> &str;

    /// Runs `query` and returns every matching row, already ordered.
    ///
    /// An `Err` means the index could not be opened at all.
    fn query(&self, query: &IndexQuery) -> Result<Vec<IndexRow>>;
}

impl<I: MediaIndex + ?Sized> MediaIndex for Arc<I> {
    fn collection_address(&self) -> &str {
        (**self).collection_address()
    }

    fn query(&self, query: &IndexQuery) -> Result<Vec<IndexRow>> {
        (**self).query(query)
    }
}

/// Turns the media index into an ordered list of resource identifiers.
pub struct MediaIndexGateway<I> {
    index: I,
}

impl<I: MediaIndex> MediaIndexGateway<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    /// Lists every image, newest addition first.
    ///
    /// An index that cannot be opened yields an empty list, same as an empty
    /// library.
    pub fn list_images(&self) -> Vec<ResourceIdentifier> {
        let query = IndexQuery::images_by_date_added_desc();
        let rows = match self.index.query(&query) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Media index query failed, treating as empty: {}", e);
                return Vec::new();
            }
        };

        let base = self.index.collection_address();
        let identifiers: Vec<_> = rows
            .into_iter()
            .map(|row| ResourceIdentifier::with_appended_id(base, row.record_id))
            .collect();

        debug!("Media index returned {} images", identifiers.len());
        identifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;

    const BASE: &str = "content://media/external/images/media";

    struct RowsIndex(Vec<IndexRow>);

    impl MediaIndex for RowsIndex {
        fn collection_address(&self) -> &str {
            BASE
        }

        fn query(&self, query: &IndexQuery) -> Result<Vec<IndexRow>> {
            let mut rows = self.0.clone();
            query.order(&mut rows);
            Ok(rows)
        }
    }

    struct BrokenIndex;

    impl MediaIndex for BrokenIndex {
        fn collection_address(&self) -> &str {
            BASE
        }

        fn query(&self, _query: &IndexQuery) -> Result<Vec<IndexRow>> {
            Err(GalleryError::IndexUnavailable("no volume mounted".to_string()))
        }
    }

    fn row(record_id: u64, date_added: i64) -> IndexRow {
        IndexRow {
            record_id,
            date_added,
        }
    }

    #[test]
    fn lists_newest_addition_first() {
        let gateway = MediaIndexGateway::new(RowsIndex(vec![row(1, 10), row(2, 30), row(3, 20)]));

        let ids: Vec<_> = gateway
            .list_images()
            .iter()
            .map(|id| id.record_id().unwrap())
            .collect();

        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn identifiers_extend_the_collection_address() {
        let gateway = MediaIndexGateway::new(RowsIndex(vec![row(42, 1)]));
        let ids = gateway.list_images();
        assert_eq!(ids[0].as_str(), "content://media/external/images/media/42");
    }

    #[test]
    fn empty_index_is_an_empty_list() {
        let gateway = MediaIndexGateway::new(RowsIndex(Vec::new()));
        assert!(gateway.list_images().is_empty());
    }

    #[test]
    fn unavailable_index_is_an_empty_list() {
        let gateway = MediaIndexGateway::new(BrokenIndex);
        assert!(gateway.list_images().is_empty());
    }

    #[test]
    fn ties_on_date_break_by_record_id() {
        let query = IndexQuery::images_by_date_added_desc();
        let mut rows = vec![row(5, 10), row(9, 10), row(7, 20)];
        query.order(&mut rows);
        assert_eq!(rows, vec![row(7, 20), row(9, 10), row(5, 10)]);
    }

    #[test]
    fn projection_keeps_only_requested_columns() {
        let query = IndexQuery::images_by_date_added_desc();
        assert_eq!(query.project(row(3, 99)), row(3, 0));
    }
}
