#![forbid(unsafe_code)]

//! Popup markup rendering.
//!
//! Pure string substitution over a fixed placeholder set. Substitution is a
//! single left-to-right pass: inserted values are never rescanned, so step
//! content containing `{{...}}` text is emitted verbatim. Unknown
//! placeholders are left intact.
//!
//! Step content is trusted markup and inserted as-is; sanitization belongs
//! to the popup library's allow list.

use onboard_core::PopupAction;

/// Outer popup markup. `{{stepLine}}`, `{{content}}`, `{{prevButton}}` and
/// `{{nextButton}}` are filled by [`render`].
pub const POPUP_TEMPLATE: &str = concat!(
    r#"<div class="overlay-template">"#,
    r#"<div class="d-flex flex-row justify-content-between">"#,
    r#"<h1>{{stepLine}}</h1>"#,
    r#"<button type="button" class="btn-close onboard-close" aria-label="Close"></button>"#,
    r#"</div>"#,
    r#"<p>{{content}}</p>"#,
    r#"<div class="d-flex flex-row justify-content-between">"#,
    r#"{{prevButton}}{{nextButton}}"#,
    r#"</div>"#,
    r#"</div>"#,
);

/// Text for the counter line and the three navigation buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLabels {
    /// Counter line; `{{current}}` and `{{total}}` are substituted.
    pub step_line: String,
    pub next: String,
    pub done: String,
    pub prev: String,
}

impl Default for TemplateLabels {
    fn default() -> Self {
        Self {
            step_line: "Step {{current}} of {{total}}".to_string(),
            next: "Next".to_string(),
            done: "Done!".to_string(),
            prev: "Prev".to_string(),
        }
    }
}

/// Render the popup body for a step.
///
/// `step_number` is one-based. The previous button appears only when
/// `step_number > 1`; the last step (`step_number >= total_steps`) gets the
/// done button in place of next.
#[must_use]
pub fn render(
    step_number: usize,
    total_steps: usize,
    content: &str,
    labels: &TemplateLabels,
) -> String {
    let current = step_number.to_string();
    let total = total_steps.to_string();
    let step_line = substitute(
        &labels.step_line,
        &[("current", current.as_str()), ("total", total.as_str())],
    );

    let prev_button = if step_number > 1 {
        button("btn-secondary", PopupAction::Prev, &labels.prev)
    } else {
        String::new()
    };
    let next_button = if step_number >= total_steps {
        button("btn-primary", PopupAction::Done, &labels.done)
    } else {
        button("btn-primary", PopupAction::Next, &labels.next)
    };

    substitute(
        POPUP_TEMPLATE,
        &[
            ("stepLine", step_line.as_str()),
            ("content", content),
            ("prevButton", prev_button.as_str()),
            ("nextButton", next_button.as_str()),
        ],
    )
}

fn button(variant: &str, action: PopupAction, label: &str) -> String {
    format!(
        r#"<button class="btn {variant} {}">{label}</button>"#,
        action.class_name()
    )
}

/// Replace every `{{name}}` whose name appears in `values`.
fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after_open[..close];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after_open[close + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> TemplateLabels {
        TemplateLabels::default()
    }

    #[test]
    fn first_of_two_has_next_and_no_prev() {
        let html = render(1, 2, "Hello", &labels());
        assert!(html.contains("<h1>Step 1 of 2</h1>"));
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains(r#"<button class="btn btn-primary onboard-next">Next</button>"#));
        assert!(!html.contains("onboard-prev"));
        assert!(!html.contains("onboard-finish"));
    }

    #[test]
    fn last_of_two_has_done_and_prev() {
        let html = render(2, 2, "World", &labels());
        assert!(html.contains("<h1>Step 2 of 2</h1>"));
        assert!(html.contains(r#"<button class="btn btn-secondary onboard-prev">Prev</button>"#));
        assert!(html.contains(r#"<button class="btn btn-primary onboard-finish">Done!</button>"#));
        assert!(!html.contains("onboard-next"));
    }

    #[test]
    fn single_step_has_done_only() {
        let html = render(1, 1, "Only", &labels());
        assert!(html.contains("onboard-finish"));
        assert!(!html.contains("onboard-prev"));
        assert!(!html.contains("onboard-next"));
    }

    #[test]
    fn close_button_always_present() {
        for (n, total) in [(1, 1), (1, 3), (2, 3), (3, 3)] {
            assert!(render(n, total, "", &labels()).contains("btn-close onboard-close"));
        }
    }

    #[test]
    fn every_counter_placeholder_is_replaced() {
        let labels = TemplateLabels {
            step_line: "{{current}}/{{total}} ({{current}})".to_string(),
            ..labels()
        };
        let html = render(3, 4, "", &labels);
        assert!(html.contains("<h1>3/4 (3)</h1>"));
    }

    #[test]
    fn content_is_not_rescanned() {
        let html = render(1, 2, "literal {{nextButton}} and {{current}}", &labels());
        assert!(html.contains("<p>literal {{nextButton}} and {{current}}</p>"));
        assert_eq!(html.matches("onboard-next").count(), 1);
    }

    #[test]
    fn markup_content_passes_through() {
        let html = render(1, 1, "<b>bold</b> text", &labels());
        assert!(html.contains("<p><b>bold</b> text</p>"));
    }

    #[test]
    fn custom_labels_used() {
        let labels = TemplateLabels {
            step_line: "Stage {{current}}".to_string(),
            next: "Onward".to_string(),
            done: "Finish".to_string(),
            prev: "Back".to_string(),
        };
        let mid = render(2, 3, "", &labels);
        assert!(mid.contains("<h1>Stage 2</h1>"));
        assert!(mid.contains(">Onward</button>"));
        assert!(mid.contains(">Back</button>"));
        let last = render(3, 3, "", &labels);
        assert!(last.contains(">Finish</button>"));
    }

    #[test]
    fn substitute_keeps_unknown_and_unterminated() {
        assert_eq!(substitute("a {{x}} b", &[]), "a {{x}} b");
        assert_eq!(substitute("a {{x", &[("x", "1")]), "a {{x");
        assert_eq!(substitute("{{x}}{{x}}", &[("x", "1")]), "11");
    }
}
