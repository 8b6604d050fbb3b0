//! Email templates for OTP delivery.

/// Content for verification emails.
pub struct OtpEmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl OtpEmailContent {
    /// Create verification email content with the given recipient name and code.
    pub fn new(recipient_name: &str, code: &str) -> Self {
        let greeting = if recipient_name.is_empty() {
            "there"
        } else {
            recipient_name
        };
        Self {
            subject: "Verify Your Email - CFD Transport System".to_string(),
            text: Self::text_template(greeting, code),
            html: Self::html_template(greeting, code),
        }
    }

    fn text_template(name: &str, code: &str) -> String {
        format!(
            r#"Hello {},

Thank you for registering with the CFD Transport System. Your verification code is:

{}

This code will expire in 30 minutes. For your security, never share this code with anyone.

If you didn't request this code, please ignore this email.

--
CFD Transport System"#,
            name, code
        )
    }

    fn html_template(name: &str, code: &str) -> String {
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
        h1 {{ color: #5e35b1; margin-top: 0; font-size: 24px; }}
        .code {{ font-size: 36px; font-weight: bold; letter-spacing: 8px; color: #5e35b1; text-align: center; padding: 24px; background: #f6f2fc; border-radius: 8px; margin: 24px 0; font-family: 'SF Mono', Monaco, monospace; }}
        .expires {{ color: #666; font-size: 14px; text-align: center; }}
        .footer {{ margin-top: 32px; padding-top: 20px; border-top: 1px solid #eee; color: #888; font-size: 12px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="card">
            <h1>CFD Transport System</h1>
            <p>Hello {},</p>
            <p>Thank you for registering. Your verification code is:</p>
            <div class="code">{}</div>
            <p class="expires">This code will expire in 30 minutes. Never share it with anyone.</p>
            <div class="footer">
                <p>If you didn't request this code, please ignore this email.</p>
                <p>This is an automated message, please do not reply.</p>
            </div>
        </div>
    </div>
</body>
</html>"#,
            name, code
        )
    }
}
