use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse};

/// Session cookies set by the admin sign-in page.
const ADMIN_COOKIES: [&str; 2] = ["sb-access-token", "sb-refresh-token"];

const SIGN_IN_PATH: &str = "/admin/signin";

/// GET /api/auth/admin-sign-out
///
/// Expires the admin session cookies and sends the browser to the sign-in page.
pub async fn admin_sign_out() -> impl IntoResponse {
    let headers = ADMIN_COOKIES
        .iter()
        .map(|name| (SET_COOKIE, expired_cookie(name)))
        .chain(std::iter::once((LOCATION, SIGN_IN_PATH.to_string())));

    (StatusCode::FOUND, AppendHeaders(headers))
}

fn expired_cookie(name: &str) -> String {
    format!("{name}=; Path=/admin; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_cookie_is_scoped_to_admin() {
        let cookie = expired_cookie("sb-access-token");
        assert!(cookie.starts_with("sb-access-token=;"));
        assert!(cookie.contains("Path=/admin"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
