use crate::utils::error::{DashError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        if let Some(extension) = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            if !allowed_set.contains(extension) {
                return Err(DashError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(DashError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 檢查表頭是否包含所有必要欄位
pub fn validate_columns(file: &str, headers: &[String], required: &[&str]) -> Result<()> {
    let present: HashSet<&str> = headers.iter().map(|h| h.as_str()).collect();
    for column in required {
        if !present.contains(column) {
            return Err(DashError::MissingColumn {
                column: column.to_string(),
                file: file.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["las_file.csv".to_string(), "points.csv".to_string()];
        assert!(validate_file_extensions("survey_file", &files, &["csv"]).is_ok());

        let invalid_files = vec!["las_file.xlsx".to_string()];
        assert!(validate_file_extensions("survey_file", &invalid_files, &["csv"]).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("survey_file", "las_file.csv").is_ok());
        assert!(validate_non_empty_string("survey_file", "   ").is_err());
    }

    #[test]
    fn test_validate_columns() {
        let headers = vec!["HOLEID".to_string(), "REGION".to_string()];
        assert!(validate_columns("las.csv", &headers, &["HOLEID"]).is_ok());

        let err = validate_columns("las.csv", &headers, &["HOLEID", "SURVEY_STATUS"]).unwrap_err();
        match err {
            DashError::MissingColumn { column, .. } => assert_eq!(column, "SURVEY_STATUS"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
