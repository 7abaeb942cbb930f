use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangePasswordRequest, DeleteAccountRequest, ForgotPasswordRequest,
            LoginRequest, MessageResponse, ProfileResponse, RegisterRequest, ResetPasswordRequest,
        },
        repo::User,
        services::{
            check_reset_otp, generate_otp, hash_password, is_valid_email, verify_password,
            AuthUser, JwtKeys, OtpCheck,
        },
    },
    error::ApiError,
    expenses::repo::Expense,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/profile", get(profile))
        .route("/auth/change-password", put(change_password))
        .route("/auth/delete-account", delete(delete_account))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.name = payload.name.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.name, &payload.email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(ProfileResponse::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.new_password.len() < 8 {
        return Err(ApiError::Validation("Password too short".into()));
    }

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    if !verify_password(&payload.old_password, &user.password_hash)? {
        warn!(user_id = %user.id, "change password with wrong old password");
        return Err(ApiError::WrongPassword("Old password incorrect"));
    }

    let hash = hash_password(&payload.new_password)?;
    User::update_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password changed");
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(mut payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or(ApiError::NotFound("No account found with this email"))?;

    let otp = generate_otp();
    let expiry = OffsetDateTime::now_utc() + Duration::minutes(state.config.otp_ttl_minutes);
    User::set_reset_otp(&state.db, user.id, &otp, expiry).await?;

    state.mailer.send_reset_otp(&user.email, &otp).await?;

    info!(user_id = %user.id, "reset OTP issued");
    Ok(Json(MessageResponse::new("OTP sent to your email address")))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(mut payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    let now = OffsetDateTime::now_utc();
    match check_reset_otp(
        user.reset_otp.as_deref(),
        user.reset_otp_expiry,
        &payload.otp,
        now,
    ) {
        OtpCheck::NotRequested => Err(ApiError::Validation(
            "No OTP requested. Please request a new one.".into(),
        )),
        OtpCheck::Expired => {
            User::clear_reset_otp(&state.db, user.id).await?;
            warn!(user_id = %user.id, "reset attempted with expired OTP");
            Err(ApiError::Validation(
                "OTP has expired. Please request a new one.".into(),
            ))
        }
        OtpCheck::Mismatch => {
            warn!(user_id = %user.id, "reset attempted with wrong OTP");
            Err(ApiError::Validation("Invalid OTP".into()))
        }
        OtpCheck::Valid => {
            if payload.new_password.len() < 8 {
                return Err(ApiError::Validation("Password too short".into()));
            }
            let hash = hash_password(&payload.new_password)?;
            User::complete_password_reset(&state.db, user.id, &hash).await?;
            info!(user_id = %user.id, "password reset completed");
            Ok(Json(MessageResponse::new("Password reset successfully")))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "account deletion with wrong password");
        return Err(ApiError::WrongPassword("Incorrect password"));
    }

    // Not transactional: a failure between the two deletes leaves orphaned
    // expense rows and an intact user, which a retry cleans up.
    let removed = Expense::delete_by_user(&state.db, user.id).await?;
    User::delete(&state.db, user.id).await?;

    info!(user_id = %user.id, expenses_removed = removed, "account deleted");
    Ok(Json(MessageResponse::new("Account deleted successfully")))
}
