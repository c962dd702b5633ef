use log::{debug, warn};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::{
    error::{Error, Result},
    event::EventDescriptor,
};

macro_rules! selector {
    ($query:expr) => {{
        static SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse($query).unwrap());
        &SELECTOR
    }};
}

pub const DEFAULT_CONTAINER: &str = "calendar";

/// Page used when no template is configured. Loads the widget and its
/// bootstrap theme from a CDN and provides the `#calendar` mount point.
pub const DEFAULT_TEMPLATE: &str = include_str!("template.html");

/// Static widget configuration, independent of the event data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarOptions {
    pub selectable: bool,
    pub initial_view: String,
    pub theme_system: String,
    pub editable: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            selectable: true,
            initial_view: "dayGridMonth".to_string(),
            theme_system: "bootstrap".to_string(),
            editable: true,
        }
    }
}

#[derive(Serialize)]
struct WidgetConfig<'a> {
    #[serde(flatten)]
    options: &'a CalendarOptions,
    events: &'a [EventDescriptor],
}

/// Binds a calendar widget to a mount point in a page template.
///
/// A binder is created per page render and owns nothing beyond its inputs,
/// so independent instances never observe each other.
#[derive(Debug, Clone)]
pub struct ViewBinder {
    template: String,
    container: String,
    options: CalendarOptions,
    events: Vec<EventDescriptor>,
}

impl ViewBinder {
    pub fn initialize<S: Into<String>>(
        template: S,
        container: &str,
        options: CalendarOptions,
    ) -> Result<Self> {
        let template = template.into();
        let mount_point = container_selector(container)?;
        let html = Html::parse_document(&template);

        if html.select(&mount_point).next().is_none() {
            debug!("Mount point `#{container}` not found in page template");
            return Err(Error::MountPointNotFound {
                container: container.to_string(),
            });
        }

        if html
            .select(selector!("script[src*=fullcalendar]"))
            .next()
            .is_none()
        {
            warn!("Page template does not load a FullCalendar script");
        }

        debug!("Bound calendar to `#{container}`");

        Ok(Self {
            template,
            container: container.to_string(),
            options,
            events: Vec::new(),
        })
    }

    /// Replaces the whole event collection.
    pub fn set_events(&mut self, events: Vec<EventDescriptor>) {
        self.events = events;
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn options(&self) -> &CalendarOptions {
        &self.options
    }

    pub fn events(&self) -> &[EventDescriptor] {
        &self.events
    }

    /// Produces the final page: the template with the widget configuration
    /// as a JSON payload and a bootstrap script inserted before `</body>`.
    pub fn render(&self) -> Result<String> {
        let config = serde_json::to_string(&WidgetConfig {
            options: &self.options,
            events: &self.events,
        })?;

        let container_js = serde_json::to_string(&self.container)?;

        // The bootstrap script reads the payload from the element right before
        // it, so no id in the template can shadow it.
        let script = format!(
            r#"<script type="application/json">{payload}</script>
<script>
(function () {{
  var el = document.getElementById({container_js});
  if (!el) {{
    console.error("calendar mount point not found: #" + {container_js});
    return;
  }}
  var config = JSON.parse(document.currentScript.previousElementSibling.textContent);
  new FullCalendar.Calendar(el, config).render();
}})();
</script>
"#,
            payload = escape_script_json(&config),
        );

        let mut page = String::with_capacity(self.template.len() + script.len());
        match self.template.to_ascii_lowercase().rfind("</body>") {
            Some(idx) => {
                page.push_str(&self.template[..idx]);
                page.push_str(&script);
                page.push_str(&self.template[idx..]);
            }
            None => {
                page.push_str(&self.template);
                page.push_str(&script);
            }
        }

        Ok(page)
    }

    pub fn destroy(self) {
        debug!(
            "Released calendar at `#{}` ({} events)",
            self.container,
            self.events.len()
        );
    }
}

fn container_selector(container: &str) -> Result<Selector> {
    let valid = !container.is_empty()
        && container
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));

    if !valid {
        return Err(Error::InvalidContainerId(container.to_string()));
    }

    Selector::parse(&format!("[id=\"{container}\"]"))
        .map_err(|_| Error::InvalidContainerId(container.to_string()))
}

// JSON only contains these characters inside strings, where `\uXXXX` is
// equivalent. Escaping them keeps the payload from closing the script element.
fn escape_script_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }
    escaped
}
