use crate::post::Post;

/// Placeholder the journaling tool replaces with the attached files.
pub const ATTACHMENT_MARKER: &str = "[{attachment}]";

/// Text handed to the journaling command on stdin.
pub fn render(post: &Post) -> String {
    let mut rendered = String::new();

    if !post.title.is_empty() {
        rendered.push_str("# ");
        rendered.push_str(&post.title);
        rendered.push('\n');
    }

    if !post.attachments.is_empty() {
        rendered.push_str(ATTACHMENT_MARKER);
        rendered.push('\n');
    }

    rendered.push_str(&post.body);
    rendered
}
