//! HTML email templates.
//!
//! One render function per email; [`render_confirmation`] picks among the
//! three confirmation-flow emails by [`EmailKind`].

use crate::core::models::{EmailKind, OrganizerNotice, PendingReceipt};

pub const LOGO_URL: &str = "https://i.postimg.cc/kVmmndJP/Untitled-2.png";
pub const DASHBOARD_URL: &str = "https://dowdarts.github.io/squaresfundraiser/admin.html";

const TEXT_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    /// Plain-text alternative derived from `html`.
    pub text: Option<String>,
}

impl RenderedEmail {
    fn new(subject: &str, html: String) -> Self {
        let text = html2text::from_read(html.as_bytes(), TEXT_WIDTH).ok();
        Self {
            subject: subject.to_string(),
            html,
            text,
        }
    }
}

/// Values shared by the confirmation-flow emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationContext {
    pub buyer_name: String,
    pub buyer_email: String,
    pub squares: String,
    pub fundraiser_title: String,
    pub organization_name: String,
    pub etransfer_email: String,
}

#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// `"3 Squares"`, `"1 Square"`.
#[must_use]
pub fn square_label(count: u32) -> String {
    let plural = if count > 1 { "s" } else { "" };
    format!("{count} Square{plural}")
}

#[must_use]
pub fn render_confirmation(kind: EmailKind, ctx: &ReservationContext) -> RenderedEmail {
    match kind {
        EmailKind::Pending => render_pending(ctx),
        EmailKind::AdminNotification => render_admin_notification(ctx),
        EmailKind::Approved => render_approved(ctx),
    }
}

// ============================================================================
// Confirmation flow (light theme)
// ============================================================================

fn light_shell(alt: &str, banner: &str, body: &str) -> String {
    format!(
        r#"<div style="background-color: #f8fafc; padding: 40px 20px; font-family: sans-serif;">
  <div style="max-width: 600px; margin: 0 auto; background: white; border-radius: 12px; overflow: hidden; border: 1px solid #e2e8f0;">
    <div style="padding: 30px; text-align: center; border-bottom: 1px solid #f1f5f9;">
      <img src="{LOGO_URL}" alt="{alt}" style="max-width: 180px;">
    </div>
{banner}{body}
  </div>
</div>"#
    )
}

#[must_use]
pub fn render_pending(ctx: &ReservationContext) -> RenderedEmail {
    let buyer = escape_html(&ctx.buyer_name);
    let title = escape_html(&ctx.fundraiser_title);
    let squares = escape_html(&ctx.squares);
    let org = escape_html(&ctx.organization_name);
    let etransfer = escape_html(&ctx.etransfer_email);

    let body = format!(
        r#"    <div style="padding: 40px; color: #334155; line-height: 1.6;">
      <h2 style="color: #1a2b4b; margin-top: 0;">Squares Reserved!</h2>
      <p>Hi <strong>{buyer}</strong>,</p>
      <p>Your spots in <strong>{title}</strong> are being held! We've reserved the following squares for you:</p>
      <div style="background: #fff8f0; border: 1px dashed #f7941d; padding: 20px; text-align: center; margin: 25px 0; border-radius: 8px;">
        <span style="font-size: 24px; font-weight: 800; color: #f7941d; letter-spacing: 2px;">#{squares}</span>
      </div>
      <p><strong>Next Step: Payment Verification</strong></p>
      <p>To finalize your purchase, please ensure your e-Transfer has been sent to <strong>{etransfer}</strong>.</p>
      <p>Once {org} verifies the transfer, you will receive a <strong>final confirmation email</strong>.</p>
      <p style="font-size: 14px; color: #64748b; margin-top: 30px;">Questions? Contact {org}.</p>
    </div>"#
    );

    RenderedEmail::new(
        "Action Required: Your SquareFund Reservation",
        light_shell(&org, "", &body),
    )
}

#[must_use]
pub fn render_admin_notification(ctx: &ReservationContext) -> RenderedEmail {
    let buyer = escape_html(&ctx.buyer_name);
    let buyer_email = escape_html(&ctx.buyer_email);
    let title = escape_html(&ctx.fundraiser_title);
    let squares = escape_html(&ctx.squares);
    let etransfer = escape_html(&ctx.etransfer_email);

    let banner = r#"    <div style="background-color: #f59e0b; padding: 20px; text-align: center; color: white; font-weight: bold;">
      🔔 New Purchase Requires Your Approval
    </div>
"#;
    let body = format!(
        r##"    <div style="padding: 40px; color: #334155; line-height: 1.6;">
      <h2 style="color: #1a2b4b; margin-top: 0;">Purchase Details</h2>
      <p><strong>Buyer:</strong> {buyer}</p>
      <p><strong>Email:</strong> {buyer_email}</p>
      <p><strong>Fundraiser:</strong> {title}</p>
      <div style="background: #fef3c7; border: 2px solid #f59e0b; padding: 20px; text-align: center; margin: 25px 0; border-radius: 8px;">
        <p style="margin: 0; color: #92400e; font-weight: bold;">SQUARES RESERVED</p>
        <p style="margin: 5px 0 0 0; font-size: 28px; font-weight: 900; color: #1a2b4b;">#{squares}</p>
      </div>
      <p><strong>Next Steps:</strong></p>
      <ol style="color: #374151;">
        <li>Verify e-Transfer has been received at <strong>{etransfer}</strong></li>
        <li>Log in to your admin dashboard</li>
        <li>Approve the payment to finalize the purchase</li>
      </ol>
      <div style="text-align: center; margin: 30px 0;">
        <a href="{DASHBOARD_URL}" style="display: inline-block; padding: 15px 30px; background: #f59e0b; color: white; text-decoration: none; border-radius: 8px; font-weight: bold;">Review &amp; Approve</a>
      </div>
      <p style="font-size: 14px; color: #64748b; margin-top: 30px;">This notification was sent because someone purchased squares in your fundraiser.</p>
    </div>"##
    );

    RenderedEmail::new(
        "🔔 New Purchase Pending Approval - SquareFund",
        light_shell("Square Fund", banner, &body),
    )
}

#[must_use]
pub fn render_approved(ctx: &ReservationContext) -> RenderedEmail {
    let buyer = escape_html(&ctx.buyer_name);
    let title = escape_html(&ctx.fundraiser_title);
    let squares = escape_html(&ctx.squares);
    let org = escape_html(&ctx.organization_name);

    let banner = r#"    <div style="background-color: #2e8b57; padding: 20px; text-align: center; color: white; font-weight: bold;">
      Success! Your payment is confirmed.
    </div>
"#;
    let body = format!(
        r#"    <div style="padding: 40px; text-align: center; color: #334155;">
      <p>Hi <strong>{buyer}</strong>, your payment has been verified for <strong>{title}</strong>!</p>
      <div style="background-color: #f0fdf4; border: 2px solid #2e8b57; padding: 30px; border-radius: 12px; margin: 20px 0;">
        <p style="margin: 0; color: #2e8b57; font-weight: bold;">ACTIVE NUMBERS</p>
        <p style="margin: 10px 0 0 0; font-size: 36px; font-weight: 900; color: #1a2b4b;">#{squares}</p>
      </div>
      <p>Stay tuned! {org} will notify you once the live draw begins. <strong>Good luck on your numbers!</strong></p>
      <p style="font-size: 14px; color: #64748b; margin-top: 30px;">Questions? Contact {org}.</p>
    </div>
    <div style="background: #2d2d2d; padding: 15px; text-align: center;">
      <p style="color: #999; font-size: 12px; margin: 0;">{org} Fundraiser</p>
    </div>"#
    );

    RenderedEmail::new(
        "✅ Confirmed: Your Squares are Secured!",
        light_shell(&org, banner, &body),
    )
}

// ============================================================================
// Purchase notices (dark theme)
// ============================================================================

const DARK_STYLE: &str = "
    body { margin: 0; padding: 0; background-color: #121212; font-family: 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; color: #ffffff; }
    table { border-spacing: 0; width: 100%; }
    td { padding: 0; }
    img { border: 0; }
    .container { width: 100%; max-width: 600px; margin: 40px auto; background-color: #1a1a1a; border: 1px solid rgba(255, 255, 255, 0.1); border-radius: 40px; overflow: hidden; }
    .header { padding: 40px; text-align: center; background-color: #000000; border-bottom: 1px solid rgba(255, 255, 255, 0.05); }
    .content { padding: 40px; }
    .brand-text { font-size: 20px; font-weight: 900; text-transform: uppercase; font-style: italic; letter-spacing: -1px; color: #ffffff; }
    .accent { color: #f97316; }
    .title { font-size: 32px; font-weight: 900; text-transform: uppercase; font-style: italic; letter-spacing: -1.5px; line-height: 1; margin: 0 0 20px 0; }
    .label { font-size: 10px; font-weight: 900; text-transform: uppercase; letter-spacing: 2px; color: #94a3b8; margin-bottom: 8px; }
    .body-text { font-size: 16px; line-height: 1.6; color: #cbd5e1; margin-bottom: 30px; }
    .details-box { background-color: rgba(0, 0, 0, 0.3); border: 1px solid rgba(255, 255, 255, 0.05); border-radius: 20px; padding: 25px; margin-bottom: 30px; }
    .detail-row { margin-bottom: 15px; }
    .detail-label { font-size: 11px; font-weight: 900; text-transform: uppercase; color: #64748b; display: block; }
    .detail-value { font-size: 18px; font-weight: 700; color: #ffffff; }
    .status-badge { display: inline-block; background-color: rgba(249, 115, 22, 0.1); border: 1px solid rgba(249, 115, 22, 0.2); color: #f97316; padding: 6px 12px; border-radius: 8px; font-size: 10px; font-weight: 900; text-transform: uppercase; letter-spacing: 1px; margin-bottom: 20px; }
    .button-container { text-align: center; margin-top: 20px; }
    .btn { background-color: #f97316; color: #ffffff !important; text-decoration: none; padding: 18px 35px; border-radius: 12px; font-size: 12px; font-weight: 900; text-transform: uppercase; letter-spacing: 2px; display: inline-block; }
    .footer { padding: 30px; text-align: center; font-size: 10px; font-weight: 700; text-transform: uppercase; letter-spacing: 3px; color: #475569; }
";

fn dark_shell(page_title: &str, header_extra: &str, content: &str, tagline: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{page_title}</title>
  <style>{DARK_STYLE}</style>
</head>
<body>
  <table role="presentation" width="100%">
    <tr>
      <td align="center">
        <div class="container">
          <div class="header">
            {header_extra}<span class="brand-text">SQUARE<span class="accent">FUND</span></span>
          </div>
          <div class="content">
{content}
          </div>
          <div class="footer">
            SQUARE<span class="accent">FUND</span> &bull; {tagline}
          </div>
        </div>
      </td>
    </tr>
  </table>
</body>
</html>"#
    )
}

fn details_box(rows: &[(&str, String)]) -> String {
    let last = rows.len().saturating_sub(1);
    let mut out = String::from("            <div class=\"details-box\">\n");
    for (i, (label, value)) in rows.iter().enumerate() {
        let (row_style, value_class) = if i == last {
            (r#" style="margin-bottom: 0;""#, "detail-value accent")
        } else {
            ("", "detail-value")
        };
        out.push_str(&format!(
            "              <div class=\"detail-row\"{row_style}>\n                <span class=\"detail-label\">{label}</span>\n                <span class=\"{value_class}\">{value}</span>\n              </div>\n"
        ));
    }
    out.push_str("            </div>");
    out
}

/// Tells the organizer that squares were claimed and payment should be checked.
#[must_use]
pub fn render_organizer_notice(notice: &OrganizerNotice) -> RenderedEmail {
    let organizer = escape_html(notice.organizer_name.as_deref().unwrap_or("there"));
    let buyer = escape_html(&notice.buyer_name);
    let fundraiser = escape_html(&notice.fundraiser_name);
    let squares = format!(
        "{} ({})",
        square_label(notice.square_count),
        escape_html(&notice.square_numbers)
    );
    let total = format!("${}", escape_html(&notice.total_amount));

    let details = details_box(&[
        ("Buyer", buyer.clone()),
        ("Squares", squares),
        ("Total to Receive", total),
    ]);
    let content = format!(
        r#"            <div class="label">Action Required</div>
            <h1 class="title">NEW SQUARES <span class="accent">CLAIMED</span></h1>
            <p class="body-text">
              Hey <strong>{organizer}</strong>,<br><br>
              Someone just stepped up for your fundraiser! A new purchase request has been submitted for <strong>{fundraiser}</strong>.
              Please verify your Interac e-Transfer to confirm these squares on the board.
            </p>
{details}
            <div class="label">Next Steps</div>
            <p class="body-text" style="font-size: 14px;">
              1. Verify the e-Transfer from <strong>{buyer}</strong>.<br>
              2. Log in to your dashboard.<br>
              3. Mark the squares as <strong>PAID</strong> to finalize the board.
            </p>
            <div class="button-container">
              <a href="{DASHBOARD_URL}" class="btn">Go To Dashboard</a>
            </div>"#
    );

    RenderedEmail::new(
        "🔔 New Squares Claimed - Payment Pending",
        dark_shell(
            "New Square Claimed",
            "",
            &content,
            "ZERO FEES &bull; HIGH PERFORMANCE",
        ),
    )
}

/// Tells the buyer their squares are held until the organizer confirms payment.
#[must_use]
pub fn render_reservation_receipt(receipt: &PendingReceipt) -> RenderedEmail {
    let buyer = escape_html(&receipt.buyer_name);
    let fundraiser = escape_html(&receipt.fundraiser_name);
    let squares = format!(
        "{} ({})",
        square_label(receipt.square_count),
        escape_html(&receipt.square_numbers)
    );
    let total = format!("${}", escape_html(&receipt.total_amount));

    let details = details_box(&[
        ("Reserved For", buyer.clone()),
        ("Your Squares", squares),
        ("Total Amount", total),
    ]);
    let payment_hint = receipt
        .organizer_email
        .as_deref()
        .map(|email| {
            format!(
                r#"
            <p class="body-text" style="font-size: 12px; color: #64748b;">
              If you haven't sent your e-Transfer yet, please send it to:<br>
              <strong style="color: #ffffff;">{}</strong>
            </p>"#,
                escape_html(email)
            )
        })
        .unwrap_or_default();

    let content = format!(
        r#"            <div class="status-badge">Payment Pending Verification</div>
            <h1 class="title">YOUR SQUARES ARE <span class="accent">RESERVED</span></h1>
            <p class="body-text">
              Thanks for your support, <strong>{buyer}</strong>!<br><br>
              We've received your request for <strong>{fundraiser}</strong>. Your chosen squares are currently reserved.
              The organizer has been notified to verify your payment.
            </p>
{details}
            <div class="label">What Happens Next?</div>
            <p class="body-text" style="font-size: 14px;">
              Once the organizer confirms your Interac e-Transfer, your squares will be officially locked in on the board.
              <strong>You will receive a follow-up email</strong> as soon as the confirmation is complete.
            </p>{payment_hint}"#
    );
    let logo = format!(
        r#"<img src="{LOGO_URL}" alt="SquareFund" style="max-width: 180px; margin-bottom: 15px;">
            <br>
            "#
    );

    RenderedEmail::new(
        "⏳ Squares Reserved - Payment Pending Verification",
        dark_shell(
            "Squares Reserved",
            &logo,
            &content,
            "NO PAPER GRIDS &bull; NO HASSLE",
        ),
    )
}
