use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use area_tutor_algo::sanitize;
use area_tutor_algo::session::{SessionPhase, SessionStats, Submission};
use area_tutor_algo::{Session, Shape};

use crate::response::{ok, AppError};
use crate::services::SessionEntry;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/problem", get(get_problem))
        .route("/:id/answer", post(submit_answer))
        .route("/:id/hint/:level", get(get_hint))
        .route("/:id/next", post(next_problem))
        .route("/:id/mastery", get(get_mastery))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerRequest {
    /// Number or numeric string; anything else is rejected as invalid input.
    value: serde_json::Value,
    unit: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProblemDto {
    session_id: Uuid,
    shape: Shape,
    statement: String,
    unit: &'static str,
    answer_unit: &'static str,
    params: BTreeMap<&'static str, f64>,
    phase: SessionPhase,
}

impl ProblemDto {
    fn from_session(session_id: Uuid, session: &Session) -> Self {
        let problem = session.problem();
        Self {
            session_id,
            shape: problem.shape(),
            statement: problem.statement(),
            unit: problem.unit().symbol(),
            answer_unit: problem.canonical_area_unit(),
            params: problem.params(),
            phase: session.phase(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionDto {
    session_id: Uuid,
    created_at: String,
    problem: ProblemDto,
    stats: SessionStats,
}

impl SessionDto {
    fn from_entry(session_id: Uuid, entry: &SessionEntry) -> Self {
        Self {
            session_id,
            created_at: entry.created_at.to_rfc3339(),
            problem: ProblemDto::from_session(session_id, &entry.session),
            stats: entry.session.stats(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionDto {
    session_id: Uuid,
    correct: bool,
    #[serde(flatten)]
    submission: Submission,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HintDto {
    level: u8,
    hint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShapeMasteryDto {
    shape: Shape,
    mastery: f64,
    percent: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MasteryDto {
    session_id: Uuid,
    shapes: Vec<ShapeMasteryDto>,
    weakest: Shape,
    stats: SessionStats,
    accuracy: f64,
}

async fn create_session(State(state): State<AppState>) -> Response {
    let (_, dto) = state
        .sessions()
        .create(|id, entry| SessionDto::from_entry(id, entry));
    (StatusCode::CREATED, ok(dto)).into_response()
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id)?;
    let dto = state
        .sessions()
        .with_session(id, |entry| SessionDto::from_entry(id, entry))
        .ok_or_else(AppError::session_not_found)?;
    Ok(ok(dto).into_response())
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_session_id(&id)?;
    if state.sessions().remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::session_not_found())
    }
}

async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id)?;
    let dto = state
        .sessions()
        .with_session(id, |entry| ProblemDto::from_session(id, &entry.session))
        .ok_or_else(AppError::session_not_found)?;
    Ok(ok(dto).into_response())
}

async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id)?;
    let Json(request) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let value = parse_answer_value(&request.value)?;

    // The oracle call can block up to its deadline.
    let sessions = state.sessions();
    let submission = tokio::task::spawn_blocking(move || {
        sessions.with_session(id, |entry| entry.session.submit_answer(value, &request.unit))
    })
    .await
    .map_err(|e| AppError::internal(format!("answer evaluation task failed: {e}")))?
    .ok_or_else(AppError::session_not_found)??;

    Ok(ok(SubmissionDto {
        session_id: id,
        correct: submission.result.is_correct(),
        submission,
    })
    .into_response())
}

async fn get_hint(
    State(state): State<AppState>,
    Path((id, level)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id)?;
    let level: u8 = level
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("hint level must be 1, 2 or 3, got {level}")))?;

    let hint = state
        .sessions()
        .with_session(id, |entry| entry.session.request_hint(level))
        .ok_or_else(AppError::session_not_found)??;

    Ok(ok(HintDto { level, hint }).into_response())
}

async fn next_problem(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id)?;
    let dto = state
        .sessions()
        .with_session(id, |entry| {
            entry.session.request_next_problem();
            ProblemDto::from_session(id, &entry.session)
        })
        .ok_or_else(AppError::session_not_found)?;
    Ok(ok(dto).into_response())
}

async fn get_mastery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id)?;
    let dto = state
        .sessions()
        .with_session(id, |entry| {
            let session = &entry.session;
            let stats = session.stats();
            MasteryDto {
                session_id: id,
                shapes: session
                    .mastery_snapshot()
                    .into_iter()
                    .map(|(shape, mastery)| ShapeMasteryDto {
                        shape,
                        mastery,
                        percent: mastery_percent(mastery),
                    })
                    .collect(),
                weakest: session.mastery().weakest(),
                accuracy: stats.accuracy(),
                stats,
            }
        })
        .ok_or_else(AppError::session_not_found)?;
    Ok(ok(dto).into_response())
}

/// Whole percent shown to the learner, truncated toward zero.
fn mastery_percent(mastery: f64) -> u32 {
    (mastery * 100.0).floor() as u32
}

/// Malformed ids cannot name a session, so they are reported as not found.
fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::session_not_found())
}

fn parse_answer_value(value: &serde_json::Value) -> Result<f64, AppError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| AppError::invalid_input("answer must be a finite number")),
        serde_json::Value::String(s) => sanitize::parse_value(s).map_err(AppError::from),
        _ => Err(AppError::invalid_input("answer must be a number")),
    }?;
    sanitize::validate_value(parsed).map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_answer_value() {
        assert_eq!(parse_answer_value(&json!(50)).unwrap(), 50.0);
        assert_eq!(parse_answer_value(&json!(78.54)).unwrap(), 78.54);
        assert_eq!(parse_answer_value(&json!(" 26,5 ")).unwrap(), 26.5);

        for bad in [json!("abc"), json!(null), json!(true), json!([1]), json!("NaN"), json!("1,000")] {
            let err = parse_answer_value(&bad).unwrap_err();
            assert_eq!(err.code(), "INVALID_INPUT", "{bad}");
        }
    }

    #[test]
    fn test_mastery_percent_truncates() {
        assert_eq!(mastery_percent(0.3872), 38);
        assert_eq!(mastery_percent(0.999), 99);
        assert_eq!(mastery_percent(0.5), 50);
        assert_eq!(mastery_percent(1.0), 100);
        assert_eq!(mastery_percent(0.0), 0);
    }

    #[test]
    fn test_parse_session_id() {
        assert!(parse_session_id("not-a-uuid").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_session_id(&id.to_string()).unwrap(), id);
    }
}
