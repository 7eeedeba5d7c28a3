use actix_web::{HttpRequest, HttpResponse, http::header};

/// 303 so the browser follows up with a GET.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Path and query of `req`, used as the `next` target after login.
pub fn requested_path(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str())
        .to_string()
}

/// Returns `next` when it is a same-site path, otherwise `/`.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => "/",
    }
}

/// `/login?next=<path>` with the path form-encoded.
pub fn login_url(next: &str) -> String {
    match serde_urlencoded::to_string([("next", next)]) {
        Ok(query) if next != "/" => format!("/login?{query}"),
        _ => "/login".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_local_paths() {
        assert_eq!(safe_next(Some("/")), "/");
        assert_eq!(safe_next(Some("/verlof?x=1")), "/verlof?x=1");
    }

    #[test]
    fn drops_offsite_targets() {
        assert_eq!(safe_next(None), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
        assert_eq!(safe_next(Some("/a\r\nSet-Cookie: x")), "/");
    }

    #[test]
    fn login_url_encodes_next() {
        assert_eq!(login_url("/"), "/login");
        assert_eq!(login_url("/a b"), "/login?next=%2Fa+b");
    }

    #[test]
    fn requested_path_keeps_the_query() {
        let req = actix_web::test::TestRequest::get()
            .uri("/?week=12")
            .to_http_request();
        assert_eq!(requested_path(&req), "/?week=12");
        assert_eq!(login_url(&requested_path(&req)), "/login?next=%2F%3Fweek%3D12");
    }
}
