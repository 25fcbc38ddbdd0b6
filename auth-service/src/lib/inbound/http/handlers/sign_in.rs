use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::PlaintextPassword;
use crate::domain::user::models::SignInCommand;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<ApiSuccess<SignInResponseData>, ApiError> {
    // An empty password can never match, so it fails like any other bad credential.
    let password = PlaintextPassword::new(body.password)
        .map_err(|_| ApiError::from(UserError::InvalidCredentials))?;

    let result = state
        .auth_service
        .sign_in(SignInCommand::new(body.username, password))
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SignInResponseData {
            access_token: result.access_token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponseData {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_uses_camel_case() {
        let data = SignInResponseData {
            access_token: "a.b.c".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            serde_json::json!({ "accessToken": "a.b.c" })
        );
    }
}
