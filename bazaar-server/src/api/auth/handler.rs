//! Auth API Handlers

use axum::{Json, extract::State};
use shared::models::{
    Account, AccountCreate, AccountStatus, LoginRequest, LoginResponse, RegisterResponse, Role,
};

use crate::api::extract::ValidJson;
use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::{RepoError, account::{self, NewAccount}};
use crate::security_log;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

fn validate_registration(payload: &AccountCreate) -> AppResult<()> {
    if payload.role == Role::Admin {
        return Err(AppError::permission_denied("Admin accounts cannot be self-registered"));
    }
    validate_required_text(&payload.full_name, "full_name", MAX_NAME_LEN)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    validate_optional_text(&payload.mobile, "mobile", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    if payload.role == Role::Shopkeeper {
        validate_required_text(
            payload.shop_name.as_deref().unwrap_or_default(),
            "shop_name",
            MAX_NAME_LEN,
        )?;
    }
    Ok(())
}

/// Register a customer (active) or shopkeeper (pending approval)
pub async fn register(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<AccountCreate>,
) -> AppResult<Json<RegisterResponse>> {
    validate_registration(&payload)?;

    let status = match payload.role {
        Role::Shopkeeper => AccountStatus::Pending,
        _ => AccountStatus::Active,
    };

    let created = account::create(
        state.pool(),
        NewAccount {
            role: payload.role,
            full_name: payload.full_name,
            email: payload.email,
            mobile: payload.mobile,
            password_hash: password::hash_password(&payload.password)?,
            shop_name: payload.shop_name.filter(|_| payload.role == Role::Shopkeeper),
            address: payload.address,
            status,
        },
    )
    .await
    .map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::EmailAlreadyRegistered, msg),
        other => other.into(),
    })?;

    tracing::info!(account_id = %created.id, role = %created.role, "Account registered");

    Ok(Json(RegisterResponse {
        id: created.id,
        role: created.role,
        status: created.status,
    }))
}

/// Exchange email and password for a bearer token
pub async fn login(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let found = account::find_by_email(state.pool(), &payload.email).await?;

    let user = match found {
        Some(user) if password::verify_password(&payload.password, &user.password_hash) => user,
        _ => {
            security_log!("WARN", "login_failed", email = payload.email.as_str());
            return Err(AppError::invalid_credentials());
        }
    };

    match user.status {
        AccountStatus::Active => {}
        AccountStatus::Blocked => {
            security_log!("WARN", "login_blocked", user_id = user.id.as_str());
            return Err(AppError::new(ErrorCode::AccountBlocked));
        }
        AccountStatus::Pending => {
            return Err(AppError::new(ErrorCode::AccountPending));
        }
    }

    let token = state
        .get_jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(account_id = %user.id, role = %user.role, "Login succeeded");

    Ok(Json(LoginResponse {
        token,
        role: user.role,
        user,
    }))
}

/// The caller's own account
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<Account>> {
    let account = account::find_by_id(state.pool(), &user.id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::AccountNotFound, "Account not found"))?;
    Ok(Json(account))
}
