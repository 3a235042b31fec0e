use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub question_text: String,
    pub pub_date: DateTime<Utc>, // 정렬에만 쓰인다.
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub struct QuestionId(pub i32);

// 템플릿에서 {{ question.id }}로 링크를 만들 때 필요하다.
impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
