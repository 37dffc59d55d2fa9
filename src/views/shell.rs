use serde_json::Value;

use super::notify::Notifier;
use crate::api::{endpoints, ApiClient, Session};
use crate::models::User;

pub const LOGIN_PATH: &str = "/dashboard/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Outcome of the dashboard route guard.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellState {
    /// The login route; rendered without the dashboard chrome.
    Public,
    Authenticated(User),
    Redirect { to: String },
}

pub fn is_login_path(path: &str) -> bool {
    path.trim_end_matches('/') == LOGIN_PATH
}

/// Validates the session for a dashboard navigation. Runs on every navigation
/// except the login route; there is no retry.
pub async fn check(path: &str, client: &ApiClient, notifier: &mut Notifier) -> ShellState {
    if is_login_path(path) {
        return ShellState::Public;
    }

    match client.fetch::<User>(&endpoints::me(), "user").await {
        Ok(user) => ShellState::Authenticated(user),
        Err(e) => {
            tracing::info!(path = %path, error = %e, "dashboard auth check failed");
            notifier.error("Authentication Error", "Please log in to access the dashboard");
            ShellState::Redirect {
                to: LOGIN_PATH.to_string(),
            }
        }
    }
}

fn token_from(value: &Value) -> Option<String> {
    ["token", "accessToken"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Exchanges credentials for a session.
pub async fn login(
    client: &ApiClient,
    email: &str,
    password: &str,
    notifier: &mut Notifier,
) -> Option<Session> {
    if email.trim().is_empty() || password.is_empty() {
        notifier.error("Error", "Please enter your email and password");
        return None;
    }

    match client.send(&endpoints::login(email.trim(), password)).await {
        Ok(value) => match token_from(&value) {
            Some(token) => {
                tracing::info!(email = %email.trim(), "admin logged in");
                Some(Session::with_token(token))
            }
            None => {
                tracing::warn!("login response carried no token");
                notifier.error("Error", "Login response did not include a token");
                None
            }
        },
        Err(e) => {
            notifier.error("Login Failed", e.to_string());
            None
        }
    }
}

/// Ends the session server-side. The caller clears its stored token on success.
pub async fn logout(client: &ApiClient, notifier: &mut Notifier) -> bool {
    match client.send(&endpoints::logout()).await {
        Ok(_) => {
            notifier.success("Logged Out", "You have been successfully logged out");
            true
        }
        Err(e) => {
            notifier.error("Error", e.to_string());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_path_detection() {
        assert!(is_login_path("/dashboard/login"));
        assert!(is_login_path("/dashboard/login/"));
        assert!(!is_login_path("/dashboard"));
    }

    #[test]
    fn test_token_shapes() {
        assert_eq!(token_from(&json!({"token": "t1"})).as_deref(), Some("t1"));
        assert_eq!(token_from(&json!({"accessToken": "t2"})).as_deref(), Some("t2"));
        assert_eq!(token_from(&json!({"token": ""})), None);
    }
}
