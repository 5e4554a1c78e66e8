//! HTML consent page for OAuth authorization.

use super::types::ConsentRequest;

/// Render the consent prompt for a validated authorization request.
///
/// All parameters are HTML-escaped to prevent XSS. Both buttons submit to
/// `/oauth2/consent`, carrying the consent reference and the echoed request values.
pub fn render_consent_page(request: &ConsentRequest, consent_ref: &str) -> String {
    let scope_html = if request.scope.trim().is_empty() {
        String::new()
    } else {
        format!(
            r#"<p class="scope">Requested scope: <code>{}</code></p>"#,
            html_escape(&request.scope)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>Authorize {client_name}</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f5f5f5; margin: 0; display: flex; justify-content: center; align-items: center; min-height: 100vh; }}
.card {{ background: #fff; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); padding: 32px; max-width: 400px; width: 100%; }}
h1 {{ font-size: 20px; margin: 0 0 8px; color: #333; }}
.subtitle {{ color: #666; font-size: 14px; margin: 0 0 24px; }}
.scope {{ color: #333; font-size: 14px; }}
.actions {{ display: flex; gap: 12px; margin-top: 16px; }}
button {{ flex: 1; padding: 10px; border: none; border-radius: 4px; font-size: 14px; font-weight: 500; cursor: pointer; }}
button.approve {{ background: #4a90d9; color: #fff; }}
button.approve:hover {{ background: #357abd; }}
button.deny {{ background: #eee; color: #333; }}
</style>
</head>
<body>
<div class="card">
<h1>Authorize access</h1>
<p class="subtitle"><strong>{client_name}</strong> is requesting access to your account</p>
{scope_html}
<form method="GET" action="/oauth2/consent">
<input type="hidden" name="consent" value="{consent_ref}">
<input type="hidden" name="client_id" value="{client_id}">
<input type="hidden" name="redirect_uri" value="{redirect_uri}">
<input type="hidden" name="state" value="{state}">
<div class="actions">
<button type="submit" name="approved" value="false" class="deny">Deny</button>
<button type="submit" name="approved" value="true" class="approve">Approve</button>
</div>
</form>
</div>
</body>
</html>"#,
        client_name = html_escape(&request.client_name),
        scope_html = scope_html,
        consent_ref = html_escape(consent_ref),
        client_id = html_escape(&request.client_id),
        redirect_uri = html_escape(&request.redirect_uri),
        state = html_escape(&request.state),
    )
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
