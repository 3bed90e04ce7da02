//! Order notification message builder
//!
//! Renders the plain-text order summary sent to the store operator and
//! the `wa.me` link that opens it in WhatsApp.

use shared::cart::LineItem;
use shared::models::Customer;
use shared::pricing::PricingResult;

/// Render the order summary text
///
/// Layout: store banner, customer block, one `name xqty = total` line
/// per item, then subtotal/discount/total and optional notes.
pub fn build_order_message(
    store_name: &str,
    customer: &Customer,
    items: &[LineItem],
    pricing: &PricingResult,
) -> String {
    let mut message = String::new();

    message.push_str(&format!("*New order - {}*\n\n", store_name));

    message.push_str(&format!("*Customer:* {}\n", customer.name));
    message.push_str(&format!("*Phone:* {}\n", customer.phone));
    if let Some(email) = &customer.email {
        message.push_str(&format!("*Email:* {}\n", email));
    }
    message.push_str(&format!("*Address:* {}\n", customer.address));
    message.push('\n');

    message.push_str("*Items:*\n");
    for item in items {
        let name = match &item.variant {
            Some(variant) => format!("{} ({})", item.name, variant),
            None => item.name.clone(),
        };
        message.push_str(&format!(
            "- {} x{} = {:.2}\n",
            name,
            item.quantity,
            item.line_total()
        ));
    }
    message.push('\n');

    message.push_str(&format!("Subtotal: {:.2}\n", pricing.subtotal));
    if pricing.discount > 0.0 {
        if let Some(code) = &pricing.applied_coupon_code {
            message.push_str(&format!("Discount ({}): -{:.2}\n", code, pricing.discount));
        } else {
            message.push_str(&format!("Discount: -{:.2}\n", pricing.discount));
        }
    }
    message.push_str(&format!("*Total: {:.2}*\n", pricing.total));

    if let Some(notes) = &customer.notes
        && !notes.trim().is_empty()
    {
        message.push_str(&format!("\n*Notes:* {}\n", notes));
    }

    message
}

/// Build the `wa.me` link carrying the message as a URL-encoded query
pub fn wa_me_url(phone: &str, message: &str) -> String {
    format!("https://wa.me/{}?text={}", phone, urlencoding::encode(message))
}
