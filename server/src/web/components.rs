use askama::Template;

/// A submit control that reflects the in-flight state of its enclosing form.
///
/// The rendered button carries an idle-content span and, when configured, a
/// pending-content span shown only while the enclosing form has a request in
/// flight (htmx marks the form with the `htmx-request` class and, through
/// `hx-disabled-elt`, disables the control for the duration). The component
/// owns no state of its own: pending starts with the submission and ends
/// when it completes, success and failure alike. A caller-supplied
/// `disabled` pre-disables the control independently of submission status,
/// so the effective disabled state is the OR of the two.
#[derive(Template, Debug, Clone)]
#[template(path = "components/submit_button.html")]
pub struct SubmitButton {
    label: String,
    pending_label: Option<String>,
    disabled: bool,
    class: String,
    extra_attrs: Vec<(String, String)>,
}

impl SubmitButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pending_label: None,
            disabled: false,
            class: String::new(),
            extra_attrs: Vec::new(),
        }
    }

    /// Sets the alternate content shown only while the submission is pending.
    pub fn pending_label(mut self, pending_label: impl Into<String>) -> Self {
        self.pending_label = Some(pending_label.into());
        self
    }

    /// Pre-disables the control regardless of submission status.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Adds extra CSS classes to the control.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Passes an arbitrary attribute through to the rendered button.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_attrs.push((name.into(), value.into()));
        self
    }
}
