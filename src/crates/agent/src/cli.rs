//! Terminal rendering of envelopes.

use crate::envelope::OutcomeEnvelope;

/// Show only the first and last four characters of a secret.
///
/// Secrets of eight characters or fewer are masked entirely.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}

/// Human-readable rendering; the client secret is masked.
pub fn render_text(envelope: &OutcomeEnvelope) -> String {
    if !envelope.success {
        return format!("\n❌ {}", envelope.message);
    }

    let mut out = format!("\n✅ {}", envelope.message);

    if let Some(data) = &envelope.data {
        out.push_str("\n\nDetails:");
        out.push_str(&format!("\n  applicationId: {}", data.application_id));
        out.push_str(&format!("\n  objectId: {}", data.object_id));
        out.push_str(&format!("\n  servicePrincipalId: {}", data.service_principal_id));
        out.push_str(&format!("\n  clientSecret: {}", mask_secret(&data.client_secret)));
    }

    if !envelope.next_steps.is_empty() {
        out.push_str("\n\nNext Steps:");
        for step in &envelope.next_steps {
            out.push_str(&format!("\n  - {}", step));
        }
    }

    out
}

/// Pretty JSON rendering of the whole envelope, secret included.
pub fn render_json(envelope: &OutcomeEnvelope) -> serde_json::Result<String> {
    serde_json::to_string_pretty(envelope)
}
