//! Anarchy Online markup language (AOML) helpers (component C9).
//!
//! These build the small HTML-like markup dialect the client embeds in
//! chat text — colors, links, and icons — as plain strings. Callers pass
//! the result as the `text` field of an outgoing message.

/// Wrap `text` in a `<font color>` tag. `color` is a `#RRGGBB` string.
pub fn color(text: &str, color: &str) -> String {
    format!(r#"<font color="{}">{}</font>"#, color, text)
}

/// Underline `text`.
pub fn underline(text: &str) -> String {
    format!("<u>{}</u>", text)
}

/// Center-align `text`.
pub fn center(text: &str) -> String {
    format!(r#"<div align="center">{}</div>"#, text)
}

/// Right-align `text`.
pub fn right(text: &str) -> String {
    format!(r#"<div align="right">{}</div>"#, text)
}

/// Repeat a line break `count` times.
pub fn br(count: usize) -> String {
    "<br>".repeat(count)
}

/// A clickable link that opens `text` as read-only window text.
pub fn link_text(window_text: &str, link_label: &str) -> String {
    format!(
        r#"<a href="text://{}">{}</a>"#,
        window_text.replace('"', "\\\""),
        link_label
    )
}

/// A clickable link that issues `command` as a slash-command when
/// clicked. A leading `/` is added if missing.
pub fn link_command(command: &str, link_label: &str) -> String {
    let command = if command.starts_with('/') {
        command.to_string()
    } else {
        format!("/{}", command)
    };
    format!(r#"<a href="chatcmd://{}">{}</a>"#, command, link_label)
}

/// An inline client GUI icon by its texture database id.
pub fn gui_icon(id: &str) -> String {
    format!(r#"<img src="tdb://id:{}">"#, id.to_uppercase())
}

/// An inline item/nano icon by its numeric resource database id.
pub fn icon(id: u32) -> String {
    format!(r#"<img src="rdb://{}">"#, id)
}
