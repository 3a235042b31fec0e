use handle_errors::return_error;
use warp::{Filter, http::Method};

use crate::store::QuestionRepository;

pub mod question;

/// 질문 id 경로 조각. 부호 없이 숫자로만 이뤄져야 하고 i32 범위를 넘으면 404가 된다.
fn question_id() -> impl Filter<Extract = (i32,), Error = warp::Rejection> + Clone {
    warp::path::param::<String>().and_then(|segment: String| async move {
        // "+3", "-3" 같은 부호는 i32 파싱에서는 통과하므로 먼저 걸러 낸다.
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return Err(warp::reject::not_found());
        }
        segment.parse::<i32>().map_err(|_| warp::reject::not_found())
    })
}

/// HEAD 요청은 GET과 같은 핸들러로 보낸다.
fn get_or_head() -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::get().or(warp::head()).unify()
}

/// /polls 아래 네 경로를 묶고 CORS, 요청 추적, 에러 처리를 붙인다.
pub fn polls<R>(
    store: R,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
where
    R: QuestionRepository,
{
    let store_filter = warp::any().map(move || store.clone());

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("Content-Type")
        .allow_methods(&[Method::GET, Method::HEAD, Method::POST]);

    // /polls/
    let index = get_or_head()
        .and(warp::path("polls"))
        .and(warp::path::end())
        .and(store_filter.clone())
        .and_then(question::index::<R>);

    // /polls/5/
    let detail = get_or_head()
        .and(warp::path("polls"))
        .and(question_id())
        .and(warp::path::end())
        .and(store_filter.clone())
        .and_then(question::detail::<R>);

    // /polls/5/results/
    let results = get_or_head()
        .and(warp::path("polls"))
        .and(question_id())
        .and(warp::path("results"))
        .and(warp::path::end())
        .and_then(question::results);

    // /polls/5/vote/
    // 본문은 읽지 않는다.
    let vote = get_or_head()
        .or(warp::post())
        .unify()
        .and(warp::path("polls"))
        .and(question_id())
        .and(warp::path("vote"))
        .and(warp::path::end())
        .and_then(question::vote);

    index
        .or(detail)
        .or(results)
        .or(vote)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "polls request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }))
        .with(cors)
        .with(warp::trace::request())
        .recover(return_error)
}
