//! Turn parsed rows into [`NormalizedRecord`]s

use csvproc_common::{NormalizedRecord, SourceType};

use super::aliases::AliasProfile;
use super::parser::{Row, Table};

/// Normalize every row of `table`, keeping input order.
///
/// Aliases are resolved per row. Rows whose url and headline are both blank
/// after trimming are dropped.
pub fn normalize_rows(table: &Table, source_type: SourceType) -> Vec<NormalizedRecord> {
    let profile = AliasProfile::for_source(source_type);
    table
        .rows()
        .filter_map(|row| normalize_row(&row, profile, source_type))
        .collect()
}

/// Normalize a single row, or `None` when it has neither url nor headline
pub fn normalize_row(
    row: &Row<'_>,
    profile: &AliasProfile,
    source_type: SourceType,
) -> Option<NormalizedRecord> {
    let fields = profile.resolve(row);

    if fields.url.trim().is_empty() && fields.headline.trim().is_empty() {
        return None;
    }

    Some(NormalizedRecord::new(
        source_type,
        fields.url,
        fields.headline,
        fields.author,
        fields.date,
    ))
}
