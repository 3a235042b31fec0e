use askama::Template;
use tracing::{Level, event, instrument};

use crate::store::QuestionRepository;
use crate::types::question::{Question, QuestionId};

use handle_errors::Error;

/// 목록 페이지에 보여 줄 최근 질문 수. 페이지 매기기는 하지 않는다.
pub const LATEST_QUESTIONS_LIMIT: u32 = 5;

#[derive(Template)]
#[template(path = "polls/index.html")]
struct IndexTemplate {
    latest_question_list: Vec<Question>,
}

#[derive(Template)]
#[template(path = "polls/detail.html")]
struct DetailTemplate {
    question: Question,
}

fn render<T: Template>(template: T) -> Result<warp::reply::Html<String>, warp::Rejection> {
    match template.render() {
        Ok(body) => Ok(warp::reply::html(body)),
        Err(e) => Err(warp::reject::custom(Error::TemplateError(e))),
    }
}

#[instrument(skip(store))]
pub async fn index<R: QuestionRepository>(store: R) -> Result<impl warp::Reply, warp::Rejection> {
    event!(target: "polls", Level::INFO, "querying latest questions");
    match store.latest_questions(LATEST_QUESTIONS_LIMIT).await {
        // 질문이 하나도 없어도 빈 목록으로 렌더링한다.
        Ok(latest_question_list) => render(IndexTemplate {
            latest_question_list,
        }),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

#[instrument(skip(store))]
pub async fn detail<R: QuestionRepository>(
    question_id: i32,
    store: R,
) -> Result<impl warp::Reply, warp::Rejection> {
    match store.get_question(QuestionId(question_id)).await {
        Ok(Some(question)) => render(DetailTemplate { question }),
        Ok(None) => Err(warp::reject::custom(Error::QuestionNotFound)), // return_error에서 404로 바뀐다.
        Err(e) => Err(warp::reject::custom(e)),
    }
}

// results와 vote는 아직 저장소를 조회하지 않는다.
#[instrument]
pub async fn results(question_id: i32) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(format!(
        "You're looking at the results of question {}.",
        question_id
    ))
}

#[instrument]
pub async fn vote(question_id: i32) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(format!("You're voting on question {}.", question_id))
}
