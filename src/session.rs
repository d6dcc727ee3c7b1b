use std::fs;
use std::io;
use std::path::Path;

/// Cookie flag set by the server after a completed Google login.
pub const SESSION_COOKIE: &str = "google_token_present";

pub const LOGIN_PATH: &str = "/auth/login/google";
pub const LOGOUT_PATH: &str = "/auth/logout";

pub const MSG_LOGIN_PROMPT: &str = "Zaloguj się przez Google, aby korzystać z grafiku:";

/// Checks a `Cookie`-header style string (`name=value; name=value`) for the
/// session flag. The flag is client-visible and taken on trust; the server
/// re-checks the real credentials on every submission.
pub fn has_session_flag(cookies: &str) -> bool {
    cookies
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            Some((parts.next()?.trim(), parts.next()?.trim()))
        })
        .any(|(name, value)| name == SESSION_COOKIE && value == "true")
}

/// Reads the cookie file exported from the browser session and reports
/// whether the calendar UI may be shown.
pub fn load_session(path: &Path) -> io::Result<bool> {
    let cookies = fs::read_to_string(path)?;
    Ok(cookies.lines().any(has_session_flag))
}

pub fn login_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), LOGIN_PATH)
}

pub fn logout_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), LOGOUT_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_found_among_other_cookies() {
        assert!(has_session_flag(
            "session=abc123; google_token_present=true; theme=dark"
        ));
        assert!(has_session_flag("google_token_present=true"));
    }

    #[test]
    fn missing_or_false_flag_denies_access() {
        assert!(!has_session_flag(""));
        assert!(!has_session_flag("session=abc123"));
        assert!(!has_session_flag("google_token_present=false"));
        // value must match exactly, not merely contain "true"
        assert!(!has_session_flag("google_token_present_old=true"));
    }

    #[test]
    fn login_urls_do_not_double_the_slash() {
        assert_eq!(
            login_url("http://127.0.0.1:8000/"),
            "http://127.0.0.1:8000/auth/login/google"
        );
        assert_eq!(
            logout_url("http://127.0.0.1:8000"),
            "http://127.0.0.1:8000/auth/logout"
        );
    }
}
