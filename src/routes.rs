use crate::error::AppError;
use crate::ledger::Ledger;
use crate::lineup::{Formation, Lineup, LineupCommand, Target};
use crate::schemas::{DepositStatus, Month, UserName, VoteStatus};
use crate::summary::summarize;
use crate::votes::attendees;
use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

pub struct AppState {
    pub ledger: Ledger,
    pub payment_url: Option<String>,
}

#[derive(Deserialize)]
struct VoteJson {
    name: Option<String>,
    status: Option<VoteStatus>,
}

#[derive(Deserialize)]
struct NameQuery {
    name: Option<String>,
}

#[derive(Deserialize)]
struct DepositJson {
    name: Option<String>,
    status: Option<DepositStatus>,
    month: Option<Month>,
}

#[derive(Deserialize)]
struct DepositQuery {
    name: Option<String>,
    month: Option<Month>,
}

#[derive(Deserialize)]
struct MonthQuery {
    month: Option<Month>,
}

#[derive(Deserialize)]
struct FormationQuery {
    formation: Option<String>,
}

#[derive(Deserialize)]
struct MoveJson {
    name: UserName,
    target: Target,
}

#[derive(Deserialize)]
struct LineupJson {
    formation: Option<String>,
    #[serde(default)]
    moves: Vec<MoveJson>,
}

#[derive(Serialize)]
struct PositionInfo {
    label: &'static str,
    capacity: usize,
}

#[derive(Serialize)]
struct FormationInfo {
    name: &'static str,
    positions: Vec<PositionInfo>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn formation_or_default(name: Option<String>) -> Result<Formation, AppError> {
    match non_empty(name) {
        Some(name) => Ok(name.parse::<Formation>()?),
        None => Ok(Formation::default()),
    }
}

#[post("/vote")]
async fn cast_vote(
    state: web::Data<AppState>,
    json: web::Json<VoteJson>,
) -> Result<HttpResponse, AppError> {
    let VoteJson { name, status } = json.into_inner();
    let (Some(name), Some(status)) = (non_empty(name), status) else {
        return Err(AppError::missing("name and status are"));
    };
    let document = web::block(move || state.ledger.cast_vote(&name, status)).await??;
    Ok(HttpResponse::Ok().json(document))
}

#[delete("/vote")]
async fn withdraw_vote(
    state: web::Data<AppState>,
    query: web::Query<NameQuery>,
) -> Result<HttpResponse, AppError> {
    let Some(name) = non_empty(query.into_inner().name) else {
        return Err(AppError::missing("name is"));
    };
    let document = web::block(move || state.ledger.withdraw_vote(&name)).await??;
    Ok(HttpResponse::Ok().json(document))
}

#[post("/deposit")]
async fn record_deposit(
    state: web::Data<AppState>,
    json: web::Json<DepositJson>,
) -> Result<HttpResponse, AppError> {
    let DepositJson {
        name,
        status,
        month,
    } = json.into_inner();
    let (Some(name), Some(status), Some(month)) = (non_empty(name), status, month) else {
        return Err(AppError::missing("name, status and month are"));
    };
    let document =
        web::block(move || state.ledger.record_deposit(&name, status, &month)).await??;
    Ok(HttpResponse::Ok().json(document))
}

#[delete("/deposit")]
async fn remove_deposit(
    state: web::Data<AppState>,
    query: web::Query<DepositQuery>,
) -> Result<HttpResponse, AppError> {
    let DepositQuery { name, month } = query.into_inner();
    let (Some(name), Some(month)) = (non_empty(name), month) else {
        return Err(AppError::missing("name and month are"));
    };
    let document = web::block(move || state.ledger.remove_deposit(&name, &month)).await??;
    Ok(HttpResponse::Ok().json(document))
}

#[get("/status")]
async fn get_status(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let document = web::block(move || state.ledger.status()).await??;
    Ok(HttpResponse::Ok().json(document))
}

#[get("/summary")]
async fn get_summary(
    state: web::Data<AppState>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, AppError> {
    let month = query.into_inner().month.unwrap_or_else(Month::current);
    let payment_url = state.payment_url.clone();
    let document = web::block(move || state.ledger.status()).await??;
    Ok(HttpResponse::Ok().json(summarize(&document, month, payment_url)))
}

#[get("/formations")]
async fn list_formations() -> HttpResponse {
    let formations: Vec<FormationInfo> = Formation::ALL
        .into_iter()
        .map(|formation| FormationInfo {
            name: formation.name(),
            positions: formation
                .positions()
                .iter()
                .map(|(position, capacity)| PositionInfo {
                    label: position.label(),
                    capacity: *capacity,
                })
                .collect(),
        })
        .collect();
    HttpResponse::Ok().json(formations)
}

#[get("/lineup")]
async fn initial_lineup(
    state: web::Data<AppState>,
    query: web::Query<FormationQuery>,
) -> Result<HttpResponse, AppError> {
    let formation = formation_or_default(query.into_inner().formation)?;
    let document = web::block(move || state.ledger.status()).await??;
    Ok(HttpResponse::Ok().json(Lineup::new(formation, attendees(&document))))
}

// The board lives on the client; it sends its moves and gets the board back.
#[post("/lineup")]
async fn replay_lineup(
    state: web::Data<AppState>,
    json: web::Json<LineupJson>,
) -> Result<HttpResponse, AppError> {
    let LineupJson { formation, moves } = json.into_inner();
    let formation = formation_or_default(formation)?;
    let document = web::block(move || state.ledger.status()).await??;

    let mut lineup = Lineup::new(formation, attendees(&document));
    for MoveJson { name, target } in moves {
        lineup = lineup.apply(&LineupCommand::Move { name, target })?;
    }
    Ok(HttpResponse::Ok().json(lineup))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    )
    .service(cast_vote)
    .service(withdraw_vote)
    .service(record_deposit)
    .service(remove_deposit)
    .service(get_status)
    .service(get_summary)
    .service(list_formations)
    .service(initial_lineup)
    .service(replay_lineup);
}
