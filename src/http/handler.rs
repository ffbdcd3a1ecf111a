//! HTTP handlers for the initiatives API

use super::response::{body, envelope, ok, to_value, ApiError, ApiResult};
use super::server::AppState;
use crate::enhance::{enhance_initiative, enhance_initiatives};
use crate::filter::{self, FilterCriteria, SortKey};
use crate::model::{
    EnhancedInitiative, Initiative, InitiativeStatus, NewUser, ParticipationKind, PublicUser,
};
use crate::repository::Change;
use crate::services::{
    DashboardLayout, MetricsSnapshot, Notification, NotificationKind, UserPreferences,
};
use crate::users;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

/// Query string for the enhanced list. Everything arrives as text and is
/// parsed here so bad values turn into a 400 with a useful message.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub theme: Option<String>,
    pub region: Option<String>,
    pub phase: Option<String>,
    pub status: Option<String>,
    pub public: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    fn criteria(&self) -> Result<FilterCriteria, ApiError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<InitiativeStatus>().map_err(ApiError::BadRequest)?),
        };
        let public_only = match self.public.as_deref().map(str::trim) {
            None | Some("") | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => {
                return Err(ApiError::BadRequest(format!("invalid public flag: {}", other)))
            }
        };
        Ok(FilterCriteria {
            search: self.search.clone(),
            theme: self.theme.clone(),
            region: self.region.clone(),
            phase: self.phase.clone(),
            status,
            public_only,
        })
    }

    fn sort(&self, fallback: SortKey) -> Result<SortKey, ApiError> {
        match self.sort.as_deref().map(str::trim) {
            None | Some("") => Ok(fallback),
            Some(raw) => raw.parse().map_err(ApiError::BadRequest),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationRequest {
    pub user_id: String,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub author: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchRequest {
    pub user_id: String,
}

async fn enhanced_all(state: &AppState) -> Result<Vec<EnhancedInitiative>, ApiError> {
    let raw = state.repository.load_all().await?;
    Ok(enhance_initiatives(&raw, state.reference()))
}

async fn require_initiative(state: &AppState, uid: &str) -> Result<Initiative, ApiError> {
    state
        .repository
        .find(uid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Initiative not found: {}", uid)))
}

/// Notifications and metrics are best-effort side channels
fn notify(state: &AppState, notification: Notification) {
    if let Err(e) = state.services.notifications.push(notification) {
        warn!("Dropped notification: {}", e);
    }
}

async fn record_metrics(state: &AppState) {
    match enhanced_all(state).await {
        Ok(all) => {
            let snapshot =
                MetricsSnapshot::from_summary(&filter::summarize(&all), chrono::Utc::now());
            if let Err(e) = state.services.metrics.record(snapshot) {
                warn!("Dropped metrics snapshot: {}", e);
            }
        }
        Err(e) => warn!("Skipped metrics snapshot: {}", e.message()),
    }
}

pub async fn status_handler(State(state): State<AppState>) -> ApiResult {
    let initiatives = state.repository.load_all().await?.len();
    let users = state.users.list().await?.len();
    ok(
        "healthy",
        json!({
            "status": "healthy",
            "version": crate::VERSION,
            "storage": {
                "available": state.services.storage_available(),
                "initiatives": initiatives,
                "users": users,
                "unreadNotifications": state.services.notifications.unread_count(),
            }
        }),
    )
}

pub async fn list_challenges(State(state): State<AppState>) -> ApiResult {
    let challenges = state.repository.load_all().await?;
    ok(
        format!("Loaded {} challenges", challenges.len()),
        json!({ "challenges": to_value(&challenges)? }),
    )
}

pub async fn create_challenge(
    State(state): State<AppState>,
    payload: Result<Json<Initiative>, JsonRejection>,
) -> ApiResult {
    let initiative = state.repository.append(body(payload)?).await?;
    info!("Created challenge {}", initiative.uid);

    notify(
        &state,
        Notification::new(
            NotificationKind::Info,
            "New initiative",
            format!("{} launched \"{}\"", initiative.company, initiative.title),
        )
        .for_initiative(initiative.uid.as_str()),
    );
    record_metrics(&state).await;

    envelope(
        StatusCode::CREATED,
        "Challenge created",
        json!({ "challenge": to_value(&initiative)? }),
    )
}

pub async fn update_challenge(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    payload: Result<Json<Initiative>, JsonRejection>,
) -> ApiResult {
    let initiative = body(payload)?;
    if initiative.uid.as_str() != uid {
        return Err(ApiError::BadRequest(format!(
            "uid in body ({}) does not match path ({})",
            initiative.uid, uid
        )));
    }
    let updated = state.repository.update(initiative).await?;
    ok("Challenge updated", json!({ "challenge": to_value(&updated)? }))
}

pub async fn list_initiatives(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult {
    let Query(params) = params?;
    let criteria = params.criteria()?;
    let sort = params.sort(state.services.preferences.get().default_sort)?;

    let all = enhanced_all(&state).await?;
    let selected = filter::apply(&all, &criteria, sort);
    ok(
        format!("{} of {} initiatives", selected.len(), all.len()),
        json!({
            "total": all.len(),
            "count": selected.len(),
            "sort": sort,
            "initiatives": to_value(&selected)?,
        }),
    )
}

pub async fn facets_handler(State(state): State<AppState>) -> ApiResult {
    let all = enhanced_all(&state).await?;
    ok("Facets", json!({ "facets": to_value(&filter::facets(&all))? }))
}

pub async fn summary_handler(State(state): State<AppState>) -> ApiResult {
    let all = enhanced_all(&state).await?;
    ok("Summary", json!({ "summary": to_value(&filter::summarize(&all))? }))
}

pub async fn metrics_history(State(state): State<AppState>) -> ApiResult {
    let history = state.services.metrics.history();
    ok("Metrics history", json!({ "history": to_value(&history)? }))
}

pub async fn get_initiative(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult {
    let initiative = require_initiative(&state, &uid).await?;
    let enhanced = enhance_initiative(&initiative, state.reference());
    ok("Initiative", json!({ "initiative": to_value(&enhanced)? }))
}

async fn participate(
    state: &AppState,
    uid: &str,
    request: ParticipationRequest,
    kind: ParticipationKind,
) -> ApiResult {
    let amount = match kind {
        ParticipationKind::Donate => Some(users::validate_donation(request.amount)?),
        ParticipationKind::Support => None,
    };
    if state.users.get(&request.user_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("User not found: {}", request.user_id)));
    }

    let change: Change = match amount {
        Some(amount) => Box::new(move |i: &mut Initiative| {
            i.donations = Some(i.donations() + amount)
        }),
        None => Box::new(|i: &mut Initiative| {
            i.supporters = Some(i.supporters().saturating_add(1))
        }),
    };
    let initiative = state.repository.modify(uid, change).await?;
    let user = state
        .users
        .record_participation(&request.user_id, uid, kind, amount)
        .await?;

    notify(
        state,
        Notification::new(
            NotificationKind::Support,
            "New supporter",
            format!("{} chose to {} \"{}\"", user.name, kind, initiative.title),
        )
        .for_initiative(uid),
    );

    let enhanced = enhance_initiative(&initiative, state.reference());
    ok(
        format!("Recorded {}", kind),
        json!({
            "initiative": to_value(&enhanced)?,
            "user": to_value(&PublicUser::from(&user))?,
        }),
    )
}

pub async fn support_initiative(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    payload: Result<Json<ParticipationRequest>, JsonRejection>,
) -> ApiResult {
    participate(&state, &uid, body(payload)?, ParticipationKind::Support).await
}

pub async fn donate_initiative(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    payload: Result<Json<ParticipationRequest>, JsonRejection>,
) -> ApiResult {
    participate(&state, &uid, body(payload)?, ParticipationKind::Donate).await
}

pub async fn get_collaboration(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult {
    require_initiative(&state, &uid).await?;
    let collaboration = state.services.collaboration.get(&uid);
    ok("Collaboration", json!({ "collaboration": to_value(&collaboration)? }))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult {
    let request = body(payload)?;
    if request.author.trim().is_empty() || request.body.trim().is_empty() {
        return Err(ApiError::BadRequest("author and body are required".to_string()));
    }
    require_initiative(&state, &uid).await?;
    let comment = state
        .services
        .collaboration
        .add_comment(&uid, request.author.trim(), request.body.trim())?;
    envelope(
        StatusCode::CREATED,
        "Comment added",
        json!({ "comment": to_value(&comment)? }),
    )
}

pub async fn toggle_watch(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    payload: Result<Json<WatchRequest>, JsonRejection>,
) -> ApiResult {
    let request = body(payload)?;
    require_initiative(&state, &uid).await?;
    let watching = state
        .services
        .collaboration
        .toggle_watcher(&uid, &request.user_id)?;
    ok(
        if watching { "Watching" } else { "Stopped watching" },
        json!({ "watching": watching }),
    )
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult {
    let users: Vec<PublicUser> = state.users.list().await?.iter().map(PublicUser::from).collect();
    ok(format!("Loaded {} users", users.len()), json!({ "users": to_value(&users)? }))
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let user = state
        .users
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", id)))?;
    ok("User", json!({ "user": to_value(&PublicUser::from(&user))? }))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult {
    let user = state.users.create(body(payload)?).await?;
    envelope(
        StatusCode::CREATED,
        "User created",
        json!({ "user": to_value(&PublicUser::from(&user))? }),
    )
}

pub async fn list_notifications(State(state): State<AppState>) -> ApiResult {
    let notifications = state.services.notifications.list();
    let unread = notifications.iter().filter(|n| !n.read).count();
    ok(
        format!("{} unread", unread),
        json!({ "unread": unread, "notifications": to_value(&notifications)? }),
    )
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let notification = state.services.notifications.mark_read(&id)?;
    ok("Marked read", json!({ "notification": to_value(&notification)? }))
}

pub async fn mark_all_notifications_read(State(state): State<AppState>) -> ApiResult {
    let changed = state.services.notifications.mark_all_read()?;
    ok(format!("Marked {} read", changed), json!({ "changed": changed }))
}

pub async fn get_preferences(State(state): State<AppState>) -> ApiResult {
    let preferences = state.services.preferences.get();
    ok("Preferences", json!({ "preferences": to_value(&preferences)? }))
}

pub async fn put_preferences(
    State(state): State<AppState>,
    payload: Result<Json<UserPreferences>, JsonRejection>,
) -> ApiResult {
    let preferences = body(payload)?;
    state.services.preferences.save(&preferences)?;
    ok("Preferences saved", json!({ "preferences": to_value(&preferences)? }))
}

pub async fn get_layout(State(state): State<AppState>) -> ApiResult {
    let layout = state.services.layout.get();
    ok("Layout", json!({ "layout": to_value(&layout)? }))
}

pub async fn put_layout(
    State(state): State<AppState>,
    payload: Result<Json<DashboardLayout>, JsonRejection>,
) -> ApiResult {
    let layout = body(payload)?;
    state.services.layout.save(&layout)?;
    ok("Layout saved", json!({ "layout": to_value(&layout)? }))
}
