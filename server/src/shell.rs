//! The presentation shell: one state machine over everything a visitor
//! can see, and the HTML for each state.
//!
//! `Invalid` and `NotFound` deliberately render byte-identical pages; a
//! probing client learns nothing about whether a token ever existed.
//! Every page, every state, carries the crawler-exclusion directive in its
//! `<head>` (the router additionally sets it as a response header).

use axum::http::StatusCode;
use folio_model::{ProfileData, SectionData};
use folio_resolver::Resolution;
use folio_types::sanitize;

/// Crawler-exclusion directive for shared pages.
pub const ROBOTS_DIRECTIVE: &str = "noindex, nofollow, noarchive, nosnippet";

/// Fallback document title while no owner name is available.
const GENERIC_TITLE: &str = "Shared Portfolio";

/// Render state of a shared portfolio page.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellState {
    /// Identifier failed validation; no fetch was attempted.
    Invalid,
    /// Fetch in flight; renders a structural placeholder.
    Loading,
    /// Resolution came back negative (missing, inactive, or failed).
    NotFound,
    /// Live snapshot with zero sections.
    ReadyEmpty { profile: ProfileData },
    /// Live snapshot with the ordered section list.
    ReadyWithSections {
        profile: ProfileData,
        sections: Vec<SectionData>,
    },
}

impl ShellState {
    /// Maps a resolver outcome into a render state.
    #[must_use]
    pub fn from_resolution(resolution: Resolution) -> Self {
        match resolution {
            Resolution::NotFound => ShellState::NotFound,
            Resolution::Ready { profile, sections } => {
                if sections.is_empty() {
                    ShellState::ReadyEmpty { profile }
                } else {
                    ShellState::ReadyWithSections { profile, sections }
                }
            }
        }
    }

    /// True for the states that carry owner data.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            ShellState::ReadyEmpty { .. } | ShellState::ReadyWithSections { .. }
        )
    }

    /// Document title: the sanitized owner name when ready, a generic
    /// fallback otherwise.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            ShellState::ReadyEmpty { profile }
            | ShellState::ReadyWithSections { profile, .. } => {
                let name = sanitize(&profile.name);
                if name.is_empty() {
                    GENERIC_TITLE.to_string()
                } else {
                    format!("{GENERIC_TITLE}: {name}")
                }
            }
            _ => GENERIC_TITLE.to_string(),
        }
    }

    /// HTTP status for this state.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShellState::Invalid | ShellState::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::OK,
        }
    }

    /// Renders the full HTML document for this state.
    #[must_use]
    pub fn render(&self) -> String {
        let body = match self {
            ShellState::Invalid | ShellState::NotFound => not_found_body(),
            ShellState::Loading => loading_body(),
            ShellState::ReadyEmpty { profile } => {
                let mut html = profile_body(&profile.sanitized());
                html.push_str(
                    "<div class=\"empty-state\"><p>No projects to display</p></div>\n",
                );
                html
            }
            ShellState::ReadyWithSections { profile, sections } => {
                let mut html = profile_body(&profile.sanitized());
                for section in sections {
                    html.push_str(&section_body(section));
                }
                html
            }
        };
        page(&self.title(), &body)
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <meta name=\"robots\" content=\"{ROBOTS_DIRECTIVE}\">\n\
         <title>{title}</title>\n\
         </head>\n<body>\n<main class=\"portfolio\">\n{body}</main>\n</body>\n</html>\n"
    )
}

fn not_found_body() -> String {
    "<section class=\"not-found\">\n\
     <h1>Portfolio not found</h1>\n\
     <p>This link is invalid or no longer active.</p>\n\
     </section>\n"
        .to_string()
}

/// Structural placeholder matching the shape of the ready layout, so the
/// swap to real content causes no layout shift.
fn loading_body() -> String {
    "<section class=\"profile skeleton\">\n\
     <div class=\"skeleton-avatar\"></div>\n\
     <div class=\"skeleton-line wide\"></div>\n\
     <div class=\"skeleton-line\"></div>\n\
     </section>\n\
     <section class=\"section skeleton\">\n\
     <div class=\"skeleton-block\"></div>\n\
     <div class=\"skeleton-block\"></div>\n\
     </section>\n"
        .to_string()
}

fn profile_body(profile: &ProfileData) -> String {
    let mut html = String::from("<section class=\"profile\">\n");
    if !profile.photo.is_empty() {
        html.push_str(&format!(
            "<img class=\"photo\" src=\"{}\" alt=\"{}\">\n",
            profile.photo, profile.name
        ));
    }
    html.push_str(&format!("<h1>{}</h1>\n", profile.name));
    if !profile.role.is_empty() {
        html.push_str(&format!("<p class=\"role\">{}</p>\n", profile.role));
    }
    if !profile.tagline.is_empty() {
        html.push_str(&format!("<p class=\"tagline\">{}</p>\n", profile.tagline));
    }
    if !profile.description.is_empty() {
        html.push_str(&format!(
            "<p class=\"description\">{}</p>\n",
            profile.description
        ));
    }
    let mut contact = Vec::new();
    if !profile.email.is_empty() {
        contact.push(format!("<span class=\"email\">{}</span>", profile.email));
    }
    if !profile.telephone.is_empty() {
        contact.push(format!(
            "<span class=\"telephone\">{}</span>",
            profile.telephone
        ));
    }
    if !contact.is_empty() {
        html.push_str(&format!(
            "<p class=\"contact\">{}</p>\n",
            contact.join(" · ")
        ));
    }
    html.push_str("</section>\n<hr>\n");
    html
}

fn section_body(section: &SectionData) -> String {
    let mut html = format!(
        "<section class=\"section\">\n<h2>{}</h2>\n",
        sanitize(&section.title)
    );
    for project in &section.projects {
        html.push_str(&format!(
            "<article class=\"project\">\n<h3>{}</h3>\n",
            sanitize(&project.title)
        ));
        if !project.description.is_empty() {
            html.push_str(&format!("<p>{}</p>\n", sanitize(&project.description)));
        }
        if !project.features.is_empty() {
            html.push_str("<ul class=\"features\">\n");
            for feature in &project.features {
                html.push_str(&format!("<li>{}</li>\n", sanitize(&feature.title)));
            }
            html.push_str("</ul>\n");
        }
        if !project.links.is_empty() {
            html.push_str("<p class=\"links\">\n");
            for link in &project.links {
                html.push_str(&format!(
                    "<a href=\"{}\" rel=\"nofollow noopener\">{}</a>\n",
                    sanitize(&link.url),
                    sanitize(&link.title)
                ));
            }
            html.push_str("</p>\n");
        }
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");
    html
}
