use url::{form_urlencoded, Url};

use crate::error::{AppError, Result};

const WHATSAPP_SHARE_URL: &str = "https://wa.me/";

/// `https://wa.me/?text=...` link that opens WhatsApp with `message` prefilled.
///
/// Spaces are sent as `%20`; some WhatsApp clients show a form-encoded `+` literally.
pub fn whatsapp_link(message: &str) -> Result<String> {
    let mut url = Url::parse(WHATSAPP_SHARE_URL)
        .map_err(|e| AppError::Internal(format!("Invalid share URL: {}", e)))?;

    // A literal '+' is already %2B here, so every '+' left stands for a space
    let text = form_urlencoded::byte_serialize(message.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    url.set_query(Some(&format!("text={}", text)));

    Ok(url.into())
}
