//! Server-rendered HTML for a session. Same data as the JSON view, drawn
//! through `templates/session.html`.

use askama::Template;

use crate::view::{Panel, ProgressStep, ResultPanel, SessionView};

#[derive(Template)]
#[template(path = "session.html")]
pub struct SessionPage<'a> {
    view: &'a SessionView,
    refresh: bool,
    uploaded_at: Option<String>,
    idle_message: Option<&'a str>,
    matching_title: Option<&'a str>,
    steps: &'a [ProgressStep],
    results: Option<&'a ResultPanel>,
}

impl<'a> SessionPage<'a> {
    pub fn new(view: &'a SessionView) -> Self {
        let mut page = Self {
            view,
            refresh: false,
            uploaded_at: view
                .resume_uploaded_at
                .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string()),
            idle_message: None,
            matching_title: None,
            steps: &[],
            results: None,
        };
        match &view.panel {
            Panel::Idle { message } => page.idle_message = Some(*message),
            Panel::Matching { title, steps } => {
                // Reload every second until the match lands.
                page.refresh = true;
                page.matching_title = Some(*title);
                page.steps = steps.as_slice();
            }
            Panel::Results(panel) => page.results = Some(panel),
        }
        page
    }
}

pub fn render_page(view: &SessionView) -> Result<String, askama::Error> {
    SessionPage::new(view).render()
}
