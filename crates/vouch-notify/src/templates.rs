//! Email templates for invitation notices.

/// Content for invitation emails.
pub struct InvitationEmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl InvitationEmailContent {
    /// Build invitation email content for a token. When an accept URL base is
    /// given, the token is appended to form a clickable link.
    pub fn new(token: &str, accept_url_base: Option<&str>) -> Self {
        let accept_line = match accept_url_base {
            Some(base) => format!("Accept it here: {}{}", base, token),
            None => format!("Your invitation code is: {}", token),
        };
        Self {
            subject: "You have been invited".to_string(),
            text: Self::text_template(&accept_line),
            html: Self::html_template(&accept_line),
        }
    }

    fn text_template(accept_line: &str) -> String {
        format!(
            r#"Hello!

You have been invited to create an account.

{}

If you weren't expecting this invitation, please ignore this email.

--
Vouch"#,
            accept_line
        )
    }

    fn html_template(accept_line: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 0; background: #f5f5f5; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 40px 20px; }}
        .card {{ background: white; border-radius: 8px; padding: 40px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        h1 {{ color: #1a1a1a; margin-top: 0; font-size: 24px; }}
        .invite {{ font-size: 16px; color: #2563eb; text-align: center; padding: 24px; background: #f0f7ff; border-radius: 8px; margin: 24px 0; font-family: 'SF Mono', Monaco, monospace; word-break: break-all; }}
        .footer {{ margin-top: 32px; padding-top: 20px; border-top: 1px solid #eee; color: #888; font-size: 12px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="card">
            <h1>You have been invited</h1>
            <p>You have been invited to create an account.</p>
            <div class="invite">{}</div>
            <div class="footer">
                <p>If you weren't expecting this invitation, please ignore this email.</p>
            </div>
        </div>
    </div>
</body>
</html>"#,
            accept_line
        )
    }
}
