pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn channel_ban_usage(prefix: &str, command: &str) -> String {
    format!("Usage is `{prefix}{command} [@UserName]`")
}

pub fn channel_ban_not_configured(command: &str) -> String {
    format!("`{command}` has no role configured.")
}

pub const BAN_LIFTED: &str = "Ban lifted successfully";
pub const BAN_APPLIED: &str = "Ban applied successfully";

pub const SOFTBAN_ISSUED: &str = "Ban issued successfully";
pub const SOFTBAN_REASON_REQUIRED: &str = "Please specify a ban reason";
pub const SOFTBAN_BAD_DURATION: &str = "Ban duration must be a whole number of minutes.";
pub const FORM_INVALID: &str = "This form is no longer valid.";
