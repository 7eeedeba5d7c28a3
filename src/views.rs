use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use tera::{Context, Tera};
use tracing::error;

use crate::error::AppError;

/// Compiled page templates.
pub struct Views {
    tera: Tera,
}

impl Views {
    /// Loads every `*.html` below `dir`.
    pub fn load(dir: &str) -> Result<Self, tera::Error> {
        let pattern = format!("{}/**/*.html", dir.trim_end_matches('/'));
        let tera = Tera::new(&pattern)?;
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<HttpResponse, AppError> {
        let body = self.tera.render(name, context).map_err(|e| {
            error!(template = name, error = %e, "Template rendering failed");
            AppError::from(e)
        })?;

        Ok(HttpResponse::Ok().content_type(ContentType::html()).body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_templates_compile() {
        let views = Views::load(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")).unwrap();
        let names: Vec<&str> = views.tera.get_template_names().collect();
        for expected in ["base.html", "login.html", "attendance.html", "leave.html"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn login_page_escapes_next() {
        let views = Views::load(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")).unwrap();
        let mut context = Context::new();
        context.insert("csrf_token", "tok");
        context.insert("next", "/\"><script>");
        let html = views.tera.render("login.html", &context).unwrap();
        assert!(html.contains("value=\"tok\""));
        assert!(!html.contains("<script>"));
    }
}
