//! Notification templates for the generic webhook route.
//!
//! A webhook payload picks a template with `type` (or `event`, or the `type`
//! query parameter). Unknown names fall back to [`WebhookTemplate::Notification`].
//!
//! Templates are Handlebars sources rendered against the payload data:
//! - `{{field}}` values are HTML-escaped in bodies
//! - subjects are plain text and use `{{{field}}}`
//! - fallbacks live in the templates as `{{#if}}` / `{{else}}`

use handlebars::{handlebars_helper, Handlebars};
use serde_json::{Map, Value};

use crate::error::ListenerError;

pub const DEFAULT_FROM_NAME: &str = "Webhook Notification";

const CELL_STYLE: &str = "padding: 8px; border: 1px solid #ddd;";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookTemplate {
    FormSubmission,
    UserSignup,
    OrderPlaced,
    PaymentReceived,
    AppointmentBooked,
    Notification,
}

/// Subject and HTML body ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

impl WebhookTemplate {
    pub const ALL: [WebhookTemplate; 6] = [
        Self::FormSubmission,
        Self::UserSignup,
        Self::OrderPlaced,
        Self::PaymentReceived,
        Self::AppointmentBooked,
        Self::Notification,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::FormSubmission => "form_submission",
            Self::UserSignup => "user_signup",
            Self::OrderPlaced => "order_placed",
            Self::PaymentReceived => "payment_received",
            Self::AppointmentBooked => "appointment_booked",
            Self::Notification => "notification",
        }
    }

    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .unwrap_or(Self::Notification)
    }

    /// Chooses the template from the payload, then from the query string.
    /// Blank `type` and `event` values are skipped.
    pub fn select(payload: &Map<String, Value>, query_type: Option<&str>) -> Self {
        ["type", "event"]
            .iter()
            .filter_map(|key| payload.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|name| !name.is_empty())
            .or(query_type)
            .map(Self::from_name)
            .unwrap_or(Self::Notification)
    }

    fn subject_source(self) -> &'static str {
        match self {
            Self::FormSubmission => {
                "New Form Submission: {{#if formName}}{{{formName}}}{{else}}Contact Form{{/if}}"
            }
            Self::UserSignup => "Welcome, {{#if name}}{{{name}}}{{else}}New User{{/if}}!",
            Self::OrderPlaced => {
                "Order Confirmation #{{#if orderId}}{{{orderId}}}{{else}}{{{id}}}{{/if}}"
            }
            Self::PaymentReceived => "Payment Received - {{{amount}}}",
            Self::AppointmentBooked => {
                "Appointment Confirmed - {{#if date}}{{{date}}}{{else}}{{{datetime}}}{{/if}}"
            }
            Self::Notification => "{{#if subject}}{{{subject}}}{{else}}Notification{{/if}}",
        }
    }

    fn html_source(self) -> String {
        match self {
            Self::FormSubmission => {
                let row = format!(
                    "<tr><td style=\"{CELL_STYLE}\"><strong>{{{{@key}}}}</strong></td>\
                     <td style=\"{CELL_STYLE}\">{{{{this}}}}</td></tr>"
                );
                format!(
                    "<h1>New Form Submission</h1>\
                     <p>Form: {{{{#if formName}}}}{{{{formName}}}}{{{{else}}}}Unknown{{{{/if}}}}</p>\
                     <h3>Submitted Data:</h3>\
                     <table style=\"border-collapse: collapse; width: 100%;\">\
                     {{{{#if fields}}}}{{{{#each fields}}}}{row}{{{{/each}}}}\
                     {{{{else}}}}{{{{#each this}}}}{row}{{{{/each}}}}{{{{/if}}}}\
                     </table>"
                )
            }
            Self::UserSignup => "<h1>Welcome to Our Platform!</h1>\
                 <p>Hi {{#if name}}{{name}}{{else}}there{{/if}},</p>\
                 <p>Thank you for signing up. We're excited to have you!</p>\
                 <p>Your account has been created with email: {{email}}</p>"
                .to_string(),
            Self::OrderPlaced => "<h1>Thank You for Your Order!</h1>\
                 <p>Order #{{#if orderId}}{{orderId}}{{else}}{{id}}{{/if}}</p>\
                 <p>Total: {{#if total}}{{total}}{{else}}{{amount}}{{/if}}</p>\
                 <p>We'll send you tracking information when it ships.</p>"
                .to_string(),
            Self::PaymentReceived => "<h1>Payment Confirmed</h1>\
                 <p>Amount: {{amount}}</p>\
                 <p>Transaction ID: {{#if transactionId}}{{transactionId}}{{else}}{{id}}{{/if}}</p>\
                 <p>Thank you for your payment!</p>"
                .to_string(),
            Self::AppointmentBooked => "<h1>Appointment Confirmed</h1>\
                 <p>Date: {{#if date}}{{date}}{{else}}{{datetime}}{{/if}}</p>\
                 <p>Time: {{time}}</p>\
                 <p>Service: {{#if service}}{{service}}{{else}}{{#if type}}{{type}}{{else}}Consultation{{/if}}{{/if}}</p>\
                 <p>We look forward to seeing you!</p>"
                .to_string(),
            // `html` is caller-supplied markup and is sent unchanged.
            Self::Notification => "{{#if html}}{{{html}}}\
                 {{else}}<p>{{#if message}}{{message}}{{else}}{{json this}}{{/if}}</p>{{/if}}"
                .to_string(),
        }
    }
}

handlebars_helper!(json: |value: Json| value.to_string());

/// Handlebars registry holding every [`WebhookTemplate`], built once per
/// server.
pub struct WebhookTemplates {
    handlebars: Handlebars<'static>,
}

impl WebhookTemplates {
    pub fn new() -> Result<Self, ListenerError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_helper("json", Box::new(json));

        for template in WebhookTemplate::ALL {
            let name = template.name();
            handlebars
                .register_template_string(&format!("{name}_subject"), template.subject_source())
                .map_err(|e| ListenerError::Template(format!("{name} subject: {e}")))?;
            handlebars
                .register_template_string(&format!("{name}_html"), template.html_source())
                .map_err(|e| ListenerError::Template(format!("{name} html: {e}")))?;
        }

        Ok(Self { handlebars })
    }

    pub fn render(
        &self,
        template: WebhookTemplate,
        data: &Value,
    ) -> Result<RenderedEmail, ListenerError> {
        let name = template.name();
        let render = |part: &str| {
            self.handlebars
                .render(&format!("{name}_{part}"), data)
                .map_err(|e| ListenerError::Template(format!("{name} {part}: {e}")))
        };

        Ok(RenderedEmail {
            subject: render("subject")?,
            html: render("html")?,
        })
    }
}
