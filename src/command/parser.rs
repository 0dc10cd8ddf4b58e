use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

/// Fields Mattermost sends when a user runs a slash command.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SlashCommand {
    pub token: String,
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
}

impl SlashCommand {
    /// The command line as typed, e.g. `/mbotc create`.
    #[must_use]
    pub fn command_line(&self) -> String {
        format!("{} {}", self.command, self.text)
    }
}

/// Decodes a URL-encoded form component, treating `+` as a space.
///
/// # Errors
///
/// Returns an error if the decoded bytes are not UTF-8.
///
/// # Examples
///
/// ```
/// use mbotc::command::parser::decode_url_component;
///
/// assert_eq!(decode_url_component("hello%20world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("hello+world").unwrap(), "hello world");
/// ```
pub fn decode_url_component(input: &str) -> Result<String, String> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.to_string())
        .map_err(|e| format!("Failed to decode URL component: {e}"))
}

/// Splits an `application/x-www-form-urlencoded` body into decoded pairs.
///
/// # Errors
///
/// Returns an error if a key or value is not valid UTF-8 once decoded.
pub fn parse_form(form_data: &str) -> Result<HashMap<String, String>, String> {
    let mut map = HashMap::new();
    for pair in form_data.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            let key = decode_url_component(key).map_err(|e| format!("Failed to decode key: {e}"))?;
            let value =
                decode_url_component(value).map_err(|e| format!("Failed to decode value: {e}"))?;
            map.insert(key, value);
        }
    }
    Ok(map)
}

/// Parses the form body of a slash command. Missing fields stay empty.
///
/// # Errors
///
/// Returns an error if the body cannot be decoded.
///
/// # Examples
///
/// ```
/// use mbotc::command::parser::parse_form_data;
///
/// let form_data = "token=abc123&team_id=T1&channel_id=C1&user_id=U1&\
///                  command=%2Fmbotc&text=today&trigger_id=tr1";
///
/// let command = parse_form_data(form_data).unwrap();
/// assert_eq!(command.command, "/mbotc");
/// assert_eq!(command.command_line(), "/mbotc today");
/// ```
pub fn parse_form_data(form_data: &str) -> Result<SlashCommand, String> {
    let mut map = parse_form(form_data)?;
    let mut take = |key: &str| map.remove(key).unwrap_or_default();

    Ok(SlashCommand {
        token: take("token"),
        team_id: take("team_id"),
        team_domain: take("team_domain"),
        channel_id: take("channel_id"),
        channel_name: take("channel_name"),
        user_id: take("user_id"),
        user_name: take("user_name"),
        command: take("command"),
        text: take("text"),
        response_url: take("response_url"),
        trigger_id: take("trigger_id"),
    })
}
