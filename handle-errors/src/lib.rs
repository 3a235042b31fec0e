use warp::{Rejection, Reply, filters::cors::CorsForbidden, http::StatusCode, reject::Reject};

use tracing::{Level, event, instrument};

#[derive(Debug)]
pub enum Error {
    ParseError(std::num::ParseIntError),
    ConfigError(config::ConfigError),
    DatabaseConnectionError(sqlx::Error),
    MigrationError(sqlx::migrate::MigrateError),
    DatabaseQueryError(sqlx::Error),
    TemplateError(askama::Error),
    QuestionNotFound, // 기본 키로 질문을 찾지 못한 경우. 본문 없이 404로 바뀐다.
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &*self {
            Error::ParseError(err) => {
                write!(f, "Cannot parse parameter: {}", err)
            }
            Error::ConfigError(err) => {
                write!(f, "Cannot read configuration: {}", err)
            }
            Error::DatabaseConnectionError(err) => {
                write!(f, "Cannot connect to database: {}", err)
            }
            Error::MigrationError(err) => {
                write!(f, "Cannot run migration: {}", err)
            }
            Error::DatabaseQueryError(_) => {
                write!(f, "Cannot query data")
            }
            Error::TemplateError(_) => {
                write!(f, "Cannot render template")
            }
            Error::QuestionNotFound => {
                write!(f, "Question does not exist")
            }
        }
    }
}

impl Reject for Error {}

fn not_found() -> warp::reply::WithStatus<&'static str> {
    // 사용자 정의 메시지 없이 표준 404 응답을 돌려준다.
    warp::reply::with_status(
        StatusCode::NOT_FOUND.canonical_reason().unwrap_or_default(),
        StatusCode::NOT_FOUND,
    )
}

fn internal_server_error() -> warp::reply::WithStatus<&'static str> {
    warp::reply::with_status("Internal Server Error", StatusCode::INTERNAL_SERVER_ERROR)
}

#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(crate::Error::QuestionNotFound) = r.find() {
        event!(Level::INFO, "Question does not exist");
        Ok(not_found())
    } else if let Some(crate::Error::DatabaseQueryError(e)) = r.find() {
        event!(Level::ERROR, "Database query error: {:?}", e);
        Ok(internal_server_error())
    } else if let Some(crate::Error::TemplateError(e)) = r.find() {
        event!(Level::ERROR, "Template render error: {}", e);
        Ok(internal_server_error())
    } else if let Some(error) = r.find::<CorsForbidden>() {
        event!(Level::ERROR, "CORS forbidden error: {}", error);
        Ok(warp::reply::with_status("Forbidden", StatusCode::FORBIDDEN))
    } else if let Some(error) = r.find::<Error>() {
        event!(Level::ERROR, "{}", error);
        Ok(internal_server_error())
    } else {
        event!(Level::WARN, "Requested route was not found");
        Ok(not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn reply_for(rejection: Rejection) -> (StatusCode, String) {
        let response = match return_error(rejection).await {
            Ok(reply) => reply.into_response(),
            Err(_) => panic!("return_error must recover every rejection"),
        };
        let status = response.status();
        let body = warp::hyper::body::to_bytes(response.into_body())
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn question_not_found_is_a_plain_404() {
        let (status, body) = reply_for(warp::reject::custom(Error::QuestionNotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found");
    }

    #[tokio::test]
    async fn unmatched_route_is_the_same_404() {
        let (status, body) = reply_for(warp::reject::not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found");
    }

    #[tokio::test]
    async fn database_errors_hide_details() {
        let (status, body) = reply_for(warp::reject::custom(Error::DatabaseQueryError(
            sqlx::Error::RowNotFound,
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal Server Error");
    }

    #[test]
    fn display_messages() {
        assert_eq!(Error::QuestionNotFound.to_string(), "Question does not exist");
        let parse_error = "abc".parse::<u16>().unwrap_err();
        assert_eq!(
            Error::ParseError(parse_error).to_string(),
            "Cannot parse parameter: invalid digit found in string"
        );
    }
}
