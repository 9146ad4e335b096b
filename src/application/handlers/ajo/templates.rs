//! HTML email bodies for Ajo events.

use crate::domain::ajo::{Ajo, InvitationStatus};
use crate::ports::EmailMessage;

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(heading: &str, paragraphs: &[String]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<p style=\"margin:0 0 12px\">{}</p>", p))
        .collect();
    format!(
        "<!DOCTYPE html><html><body style=\"font-family:Arial,sans-serif;color:#1f2933\">\
         <h2 style=\"color:#0b6e4f\">{}</h2>{}\
         <p style=\"color:#7b8794;font-size:12px\">Sent by CoopManager</p></body></html>",
        escape(heading),
        body
    )
}

fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn greeting(name: &str) -> String {
    if name.trim().is_empty() {
        "Hello,".to_string()
    } else {
        format!("Hello {},", escape(name))
    }
}

/// Invitation sent to an online member when an Ajo is created.
pub fn invitation(to: &str, recipient: &str, inviter: &str, ajo: &Ajo) -> EmailMessage {
    let subject = format!("You've been invited to join {}", ajo.title);
    let html = layout(
        &subject,
        &[
            greeting(recipient),
            format!(
                "{} has invited you to the Ajo <strong>{}</strong>: {} {} per period, starting {}.",
                escape(inviter),
                escape(&ajo.title),
                money(ajo.amount),
                ajo.frequency,
                ajo.start_date.as_datetime().format("%d %b %Y"),
            ),
            "Open the CoopManager app to accept or decline the invitation.".to_string(),
        ],
    );
    EmailMessage {
        to: to.to_string(),
        subject,
        html,
    }
}

/// Tells an admin how a member answered an invitation.
pub fn invitation_response(
    to: &str,
    admin: &str,
    responder: &str,
    ajo: &Ajo,
    status: InvitationStatus,
) -> EmailMessage {
    let subject = format!("{} {} the invitation to {}", responder, status, ajo.title);
    let html = layout(
        &subject,
        &[
            greeting(admin),
            format!(
                "{} has <strong>{}</strong> the invitation to <strong>{}</strong>.",
                escape(responder),
                status,
                escape(&ajo.title)
            ),
        ],
    );
    EmailMessage {
        to: to.to_string(),
        subject,
        html,
    }
}

/// Receipt sent to a member when someone else records their payment.
pub fn payment_recorded(
    to: &str,
    payer: &str,
    ajo: &Ajo,
    amount: f64,
    payment_method: &str,
    total_paid: f64,
) -> EmailMessage {
    let subject = format!("Payment recorded for {}", ajo.title);
    let html = layout(
        &subject,
        &[
            greeting(payer),
            format!(
                "A payment of <strong>{}</strong> ({}) was recorded for you in <strong>{}</strong>.",
                money(amount),
                escape(payment_method),
                escape(&ajo.title)
            ),
            format!("Your total contribution is now {}.", money(total_paid)),
        ],
    );
    EmailMessage {
        to: to.to_string(),
        subject,
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ajo::aggregate::test_support::new_ajo_input;
    use crate::domain::foundation::CooperativeId;

    fn ajo(title: &str) -> Ajo {
        let mut input = new_ajo_input(CooperativeId::new());
        input.title = title.to_string();
        Ajo::create(input).unwrap()
    }

    #[test]
    fn invitation_mentions_ajo_and_amount() {
        let email = invitation("ada@example.com", "Ada Obi", "Chief Admin", &ajo("Market Ajo"));
        assert_eq!(email.to, "ada@example.com");
        assert_eq!(email.subject, "You've been invited to join Market Ajo");
        assert!(email.html.contains("1000.00"));
        assert!(email.html.contains("weekly"));
        assert!(email.html.contains("01 Jan 2026"));
    }

    #[test]
    fn user_text_is_escaped() {
        let email = invitation("a@b.c", "<script>", "Admin", &ajo("Tom & Jerry"));
        assert!(email.html.contains("Tom &amp; Jerry"));
        assert!(!email.html.contains("<script>"));
    }

    #[test]
    fn response_subject_names_answer() {
        let email = invitation_response(
            "boss@example.com",
            "Boss",
            "Ada Obi",
            &ajo("Market Ajo"),
            InvitationStatus::Declined,
        );
        assert_eq!(email.subject, "Ada Obi declined the invitation to Market Ajo");
    }

    #[test]
    fn payment_receipt_shows_running_total() {
        let email = payment_recorded("ada@example.com", "", &ajo("Market Ajo"), 250.0, "cash", 750.0);
        assert!(email.html.contains("Hello,"));
        assert!(email.html.contains("250.00"));
        assert!(email.html.contains("750.00"));
    }
}
