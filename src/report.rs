// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Report text rendering.
//!
//! The full report goes out as a plain Telegram message. When a proof is
//! attached, the document carries only a short caption because Telegram caps
//! captions at 1024 characters, while messages allow 4096.

use crate::models::Submission;

const PLACEHOLDER: &str = "N/A";
const RULE: &str = "━━━━━━━━━━━━━━";

pub const DEFAULT_PROOF_NAME: &str = "proof.png";

/// Renders the full report message for a submission.
///
/// Missing optional fields render as `N/A`. The output has no trailing
/// newline.
pub fn render_report_text(submission: &Submission) -> String {
    format!(
        "🧾 CSB Agent Report Box\n\
         {RULE}\n\
         👤 রিপোর্টকারী নাম: {name}\n\
         📞 যোগাযোগ: {contact}\n\
         🪪 রিপোর্টকারী Agent ID: {agent}\n\
         🚨 অভিযুক্ত Agent ID: {complainer}\n\
         🧷 বিষয়: {subject}\n\
         📝 বিস্তারিত:\n\
         {details}\n\
         {RULE}",
        name = or_placeholder(&submission.name),
        contact = or_placeholder(&submission.contact),
        agent = or_placeholder(&submission.agent),
        complainer = or_placeholder(&submission.complainer),
        subject = submission.subject.as_deref().unwrap_or_default(),
        details = submission.details.as_deref().unwrap_or_default(),
    )
}

/// Renders the two-line caption sent with a proof document.
pub fn short_caption(subject: &str) -> String {
    format!("🧾 CSB Report\n🧷 বিষয়: {subject}")
}

/// Filename for the proof document, falling back to [`DEFAULT_PROOF_NAME`].
pub fn proof_file_name(submission: &Submission) -> &str {
    submission
        .proof_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_PROOF_NAME)
}

fn or_placeholder(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_submission() -> Submission {
        Submission {
            name: Some("Rahim Uddin".into()),
            contact: Some("01700000000".into()),
            agent: Some("AG-1001".into()),
            complainer: Some("AG-2002".into()),
            subject: Some("Cash-out fraud".into()),
            details: Some("Charged twice.\nNo refund given.".into()),
            ..Default::default()
        }
    }

    #[test]
    fn renders_all_fields_in_template_order() {
        let text = render_report_text(&full_submission());
        let expected = "🧾 CSB Agent Report Box\n\
                        ━━━━━━━━━━━━━━\n\
                        👤 রিপোর্টকারী নাম: Rahim Uddin\n\
                        📞 যোগাযোগ: 01700000000\n\
                        🪪 রিপোর্টকারী Agent ID: AG-1001\n\
                        🚨 অভিযুক্ত Agent ID: AG-2002\n\
                        🧷 বিষয়: Cash-out fraud\n\
                        📝 বিস্তারিত:\n\
                        Charged twice.\n\
                        No refund given.\n\
                        ━━━━━━━━━━━━━━";
        assert_eq!(text, expected);
    }

    #[test]
    fn missing_optional_fields_render_placeholder() {
        let submission = Submission {
            name: Some(String::new()),
            subject: Some("s".into()),
            details: Some("d".into()),
            ..Default::default()
        };
        let text = render_report_text(&submission);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[2], "👤 রিপোর্টকারী নাম: N/A");
        assert_eq!(lines[3], "📞 যোগাযোগ: N/A");
        assert_eq!(lines[4], "🪪 রিপোর্টকারী Agent ID: N/A");
        assert_eq!(lines[5], "🚨 অভিযুক্ত Agent ID: N/A");
        assert_eq!(lines[6], "🧷 বিষয়: s");
        assert_eq!(lines[8], "d");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn rendering_is_deterministic() {
        let submission = full_submission();
        assert_eq!(
            render_report_text(&submission),
            render_report_text(&submission)
        );
    }

    #[test]
    fn caption_has_subject_only() {
        assert_eq!(
            short_caption("Cash-out fraud"),
            "🧾 CSB Report\n🧷 বিষয়: Cash-out fraud"
        );
    }

    #[test]
    fn proof_name_defaults_when_absent_or_empty() {
        let mut submission = full_submission();
        assert_eq!(proof_file_name(&submission), "proof.png");

        submission.proof_name = Some(String::new());
        assert_eq!(proof_file_name(&submission), "proof.png");

        submission.proof_name = Some("receipt.pdf".into());
        assert_eq!(proof_file_name(&submission), "receipt.pdf");
    }
}
