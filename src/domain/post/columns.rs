//! Tabular layout of posts shared by CSV imports and spreadsheets

use crate::domain::DomainError;

/// Column order of a post sheet. Timestamps and the delete flag are not
/// part of the tabular layout.
pub const POST_COLUMNS: [&str; 13] = [
    "uuid",
    "id",
    "text",
    "file_1",
    "file_2",
    "file_3",
    "file_4",
    "with_files",
    "checked",
    "priority",
    "count",
    "post_url",
    "is_schedule",
];

/// Verifies that a sheet's header row matches [`POST_COLUMNS`] exactly
pub fn check_columns<S: AsRef<str>>(headers: &[S]) -> Result<(), DomainError> {
    let matches = headers.len() == POST_COLUMNS.len()
        && headers
            .iter()
            .zip(POST_COLUMNS.iter())
            .all(|(given, expected)| given.as_ref() == *expected);

    if matches {
        return Ok(());
    }

    let given: Vec<&str> = headers.iter().map(AsRef::as_ref).collect();
    Err(DomainError::validation(format!(
        "Columns do not match, expected: {:?}, given: {:?}",
        POST_COLUMNS, given
    )))
}

/// 1-based sheet row where the next post should be appended, given the
/// number of data rows (header excluded)
pub fn next_append_row(data_rows: usize) -> usize {
    data_rows + 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_columns_ok() {
        assert!(check_columns(&POST_COLUMNS).is_ok());

        let owned: Vec<String> = POST_COLUMNS.iter().map(|c| c.to_string()).collect();
        assert!(check_columns(&owned).is_ok());
    }

    #[test]
    fn test_check_columns_wrong_count() {
        let result = check_columns(&["uuid", "id", "text"]);
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_check_columns_wrong_order() {
        let mut headers = POST_COLUMNS;
        headers.swap(3, 4);

        let err = check_columns(&headers).unwrap_err();
        assert!(err.to_string().contains("file_2"));
    }

    #[test]
    fn test_next_append_row() {
        assert_eq!(next_append_row(0), 2);
        assert_eq!(next_append_row(10), 12);
    }
}
