use actix_web::http::StatusCode;
use siteglue::errors::{Result, SiteGlueError};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SiteGlueError::validation("invalid source url");

        assert!(matches!(error, SiteGlueError::Validation(_)));
        assert_eq!(error.message(), "invalid source url");
        assert!(error.to_string().contains("Validation Error"));
    }

    #[test]
    fn test_unauthorized_error() {
        let error = SiteGlueError::unauthorized("missing token");

        assert!(matches!(error, SiteGlueError::Unauthorized(_)));
        assert_eq!(error.to_string(), "Unauthorized: missing token");
    }

    #[test]
    fn test_remote_error() {
        let error = SiteGlueError::remote("wallabag down");
        assert!(matches!(error, SiteGlueError::Remote(_)));
        assert_eq!(error.error_type(), "Remote Service Error");
    }

    #[test]
    fn test_error_codes_are_unique() {
        let errors = [
            SiteGlueError::config(""),
            SiteGlueError::invalid_rule(""),
            SiteGlueError::database_connection(""),
            SiteGlueError::database_operation(""),
            SiteGlueError::file_operation(""),
            SiteGlueError::validation(""),
            SiteGlueError::unauthorized(""),
            SiteGlueError::remote(""),
            SiteGlueError::serialization(""),
            SiteGlueError::template(""),
            SiteGlueError::mail(""),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}

#[cfg(test)]
mod http_status_tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert_eq!(SiteGlueError::validation("x").http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(SiteGlueError::unauthorized("x").http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(SiteGlueError::remote("x").http_status().as_u16(), 421);
        assert_eq!(
            SiteGlueError::serialization("x").http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_server_errors() {
        for error in [
            SiteGlueError::config("x"),
            SiteGlueError::database_connection("x"),
            SiteGlueError::file_operation("x"),
            SiteGlueError::template("x"),
            SiteGlueError::mail("x"),
        ] {
            assert!(error.http_status().is_server_error(), "{}", error);
        }
    }
}

#[cfg(test)]
mod conversion_tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: SiteGlueError = io.into();
        assert!(matches!(error, SiteGlueError::FileOperation(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: SiteGlueError = parse.into();
        assert!(matches!(error, SiteGlueError::Serialization(_)));
    }

    #[test]
    fn test_from_regex_error() {
        let bad = regex::Regex::new("(").unwrap_err();
        let error: SiteGlueError = bad.into();
        assert!(matches!(error, SiteGlueError::InvalidRule(_)));
    }

    #[test]
    fn test_question_mark_propagates() {
        fn read() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here")?)
        }
        let error = read().unwrap_err();
        assert!(error.source().is_none());
        assert_eq!(error.code(), "E005");
    }
}
