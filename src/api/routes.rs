pub const SLASH_COMMAND: &str = "/command";
pub const CREATE_WITH_COMMAND: &str = "/api/v1/create-notification-with-command";
pub const CREATE_WITH_EDITOR: &str = "/api/v1/create-notification-with-editor";
pub const CREATE_WITH_BUTTON: &str = "/api/v1/create-notification-with-button";
