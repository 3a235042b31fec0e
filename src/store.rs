use std::future::Future;

use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use crate::types::question::{Question, QuestionId};

use handle_errors::Error;

/// 경로 핸들러가 질문을 읽어 오는 저장소 인터페이스
///
/// 핸들러는 전역 상태 대신 이 트레이트를 구현한 값을 필터로 주입 받는다.
/// 실제 서비스는 PostgreSQL 연결 풀을 쓰는 [`Store`]를, 테스트는 메모리 저장소를 쓴다.
pub trait QuestionRepository: Clone + Send + Sync + 'static {
    /// pub_date 내림차순으로 최대 `limit`개의 질문을 돌려준다.
    fn latest_questions(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Question>, Error>> + Send;

    /// 기본 키로 질문 하나를 찾는다. 없으면 `Ok(None)`이다.
    fn get_question(
        &self,
        id: QuestionId,
    ) -> impl Future<Output = Result<Option<Question>, Error>> + Send;
}

#[derive(Debug, Clone)]
pub struct Store {
    pub connection: PgPool,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self, Error> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await
            .map_err(Error::DatabaseConnectionError)?;

        Ok(Store {
            connection: db_pool,
        })
    }
}

fn question_from_row(row: PgRow) -> Question {
    Question {
        id: QuestionId(row.get("id")),
        question_text: row.get("question_text"),
        pub_date: row.get("pub_date"),
    }
}

impl QuestionRepository for Store {
    async fn latest_questions(&self, limit: u32) -> Result<Vec<Question>, Error> {
        match sqlx::query(
            "SELECT id, question_text, pub_date FROM questions
            ORDER BY pub_date DESC
            LIMIT $1",
        )
        .bind(i64::from(limit)) // PostgreSQL에는 부호 없는 정수 타입이 없다.
        .map(question_from_row)
        .fetch_all(&self.connection)
        .await
        {
            Ok(questions) => Ok(questions),
            Err(error) => {
                tracing::event!(tracing::Level::ERROR, "{:?}", error);
                Err(Error::DatabaseQueryError(error))
            }
        }
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, Error> {
        match sqlx::query("SELECT id, question_text, pub_date FROM questions WHERE id = $1")
            .bind(id.0)
            .map(question_from_row)
            .fetch_optional(&self.connection) // fetch_optional은 None이나 결과 값 하나를 돌려준다.
            .await
        {
            Ok(question) => Ok(question),
            Err(error) => {
                tracing::event!(tracing::Level::ERROR, "{:?}", error);
                Err(Error::DatabaseQueryError(error))
            }
        }
    }
}
