//! Demo Mode Placeholders
//!
//! Canned illustrative HTML rendered on the static-only path when no
//! session credential has been supplied. Content mirrors the sample panels
//! the original UI showed while AI was unconfigured.

use crate::types::ArtifactKind;

/// User-facing note attached to every demo-mode result
pub const DEMO_MESSAGE: &str =
    "Demo mode: no API key configured. Add your OpenAI API key to enable live AI generation.";

/// Non-empty placeholder HTML for a kind
pub fn placeholder_for(kind: ArtifactKind) -> String {
    let body = match kind {
        ArtifactKind::Analysis => {
            "<h3>Sample Project Analysis</h3>\
             <p><strong>Scope &amp; Goals:</strong> Deliver a responsive web application \
             serving the described concept with a phased rollout.</p>\
             <ul>\
             <li><strong>Target Audience:</strong> Ages 25-45, comfortable with digital tools</li>\
             <li><strong>User Stories:</strong> As a visitor, I can browse content without an account</li>\
             <li><strong>Functional:</strong> Account management, content creation, search</li>\
             <li><strong>Non-Functional:</strong> Sub-second page loads, WCAG AA accessibility</li>\
             </ul>"
        }
        ArtifactKind::Design => {
            "<h3>Sample High Level Design</h3>\
             <p><strong>Architecture:</strong> Three-tier layout with a single-page frontend, \
             a stateless API layer, and a relational store.</p>\
             <ul>\
             <li><strong>Components:</strong> Auth service, content service, notification worker</li>\
             <li><strong>Stack:</strong> TypeScript frontend, managed PostgreSQL</li>\
             <li><strong>Integration:</strong> REST between frontend and API, queue for async work</li>\
             </ul>"
        }
        ArtifactKind::Erd => {
            "<h3>Sample Entity-Relationship Diagram</h3>\
             <pre>users (id PK, email UNIQUE, created_at)\n\
posts (id PK, user_id FK -> users.id, title, body)\n\
comments (id PK, post_id FK -> posts.id, user_id FK, body)</pre>\
             <p>One user has many posts; one post has many comments (1:N).</p>"
        }
        ArtifactKind::LowLevel => {
            "<h3>Sample Low Level Diagrams</h3>\
             <pre>+-------------+        +-------------+\n\
| Controller  | -----> |  Service    |\n\
+-------------+        +-------------+\n\
       |                      |\n\
       v                      v\n\
  validate()             repository.save()</pre>\
             <p>Sequence: Controller --&gt; Service --&gt; Repository --&gt; Database.</p>"
        }
        ArtifactKind::WebsiteStructure => {
            "<h3>Sample Website Structure</h3>\
             <pre>project/\n\
  index.html\n\
  css/styles.css\n\
  js/app.js\n\
  assets/images/\n\
  docs/README.md</pre>"
        }
        ArtifactKind::UserStories => {
            "<h3>Sample User Stories</h3>\
             <ul>\
             <li>As a visitor, I can browse public content without creating an account.</li>\
             <li>As a registered user, I can save items to a personal collection.</li>\
             <li>As an administrator, I can review and remove reported content.</li>\
             </ul>"
        }
        ArtifactKind::Requirements => {
            "<h3>Sample Requirements Document</h3>\
             <p><strong>Executive Summary:</strong> A phased delivery of the described \
             product with measurable acceptance criteria per feature.</p>\
             <ol>\
             <li><strong>Functional:</strong> Account management, content CRUD, search</li>\
             <li><strong>Non-Functional:</strong> Sub-second page loads, WCAG AA</li>\
             <li><strong>Interface:</strong> REST API with JSON payloads</li>\
             </ol>"
        }
        ArtifactKind::Generic(phase) => {
            return format!(
                "<h3>Sample {} Plan</h3>\
                 <p>Illustrative {} guidance appears here. Configure an API key for a \
                 response tailored to your project.</p>\
                 <div class=\"demo-note\"><p><strong>Demo Mode:</strong> {}</p></div>",
                capitalize(phase.as_str()),
                phase,
                DEMO_MESSAGE
            );
        }
    };
    format!(
        "{}<div class=\"demo-note\"><p><strong>Demo Mode:</strong> {}</p></div>",
        body, DEMO_MESSAGE
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_non_empty_for_all_kinds() {
        for kind in ArtifactKind::all() {
            let html = placeholder_for(kind);
            assert!(!html.is_empty(), "{}", kind);
            assert!(html.contains("Demo Mode"), "{}", kind);
        }
    }

    #[test]
    fn test_lowlevel_placeholder_is_text_only() {
        let html = placeholder_for(ArtifactKind::LowLevel);
        assert!(!html.contains("<img"));
        assert!(html.contains("<pre>"));
    }
}
