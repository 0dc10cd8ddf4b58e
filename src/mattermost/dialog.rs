use serde_json::{Value, json};

pub const CREATE_CALLBACK_ID: &str = "mbotc_create_notification";

/// Build the interactive dialog opened by `/mbotc create`.
///
/// `state` travels back untouched in the submission and is checked there.
#[must_use]
pub fn build_create_dialog(state: &str) -> Value {
    json!({
        "callback_id": CREATE_CALLBACK_ID,
        "title": "Create Notification",
        "introduction_text": "Times use the `YYYY-MM-DD hh:mm` format. Leave *End Time* empty for a deadline.",
        "submit_label": "Register",
        "notify_on_cancel": false,
        "state": state,
        "elements": [
            {
                "display_name": "Start Time",
                "name": "start_time",
                "type": "text",
                "placeholder": "YYYY-MM-DD hh:mm",
                "optional": false
            },
            {
                "display_name": "End Time",
                "name": "end_time",
                "type": "text",
                "placeholder": "YYYY-MM-DD hh:mm",
                "optional": true
            },
            {
                "display_name": "Message",
                "name": "message",
                "type": "textarea",
                "help_text": "Markdown is supported.",
                "optional": false,
                "max_length": 3000
            }
        ]
    })
}
